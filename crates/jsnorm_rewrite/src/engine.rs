//! The fixpoint driver.
//!
//! Each sweep walks the tree in document order and tries every rule at
//! every node. A replacement is spliced in and skipped over; whatever it
//! still contains is picked up by the next sweep, after the scopes are
//! resolved again. The loop ends on the first sweep that changes nothing.

use crate::checker::check_canonical;
use crate::context::RuleContext;
use crate::error::InvariantViolation;
use crate::guard::mark_direct_eval;
use crate::query::{count_nodes, prologue_len};
use crate::rules::explicit_return::append_return;
use crate::rules::implicit_globals::{declare_implicit_globals, report_strict_assignments, route_through_global_object};
use crate::rules::unify_returns::unify_returns;
use crate::rules::{as_single_statement, peel_labels, peel_labels_mut, RULES};
use jsnorm_ast::factory;
use jsnorm_ast::node::*;
use jsnorm_ast::types::ScopeId;
use jsnorm_diagnostics::DiagnosticCollection;
use jsnorm_resolver::{resolve, ScopeTree};
use tracing::debug;

/// Knobs for one normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Verify the result against the canonical grammar.
    pub check_canonical: bool,
    /// Append `return;` to function bodies that can complete normally.
    pub explicit_returns: bool,
    /// Override for the rewrite bound, `4 * nodes + 64` by default.
    pub max_rewrites: Option<usize>,
    /// Write assigned implicit globals through the global object instead
    /// of declaring them, so reads before the first write still throw
    /// `ReferenceError`.
    pub reference_errors: bool,
    /// Funnel every `return` through one final `return $ret;`.
    pub unify_returns: bool,
    /// Split `if`/`else` so that at most one branch of an `if` is non-empty.
    pub unfold_ifs: bool,
}

impl RewriteOptions {
    pub const DEFAULT: Self = Self {
        check_canonical: true,
        explicit_returns: true,
        max_rewrites: None,
        reference_errors: false,
        unify_returns: false,
        unfold_ifs: false,
    };
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What a successful normalization leaves behind besides the tree.
#[derive(Debug)]
pub struct RewriteOutcome {
    /// Scopes of the normalized tree.
    pub tree: ScopeTree,
    /// Warnings for constructs left unnormalized.
    pub diagnostics: DiagnosticCollection,
    pub sweeps: usize,
    pub rewrites: usize,
}

/// Rewrite `program` in place into the canonical subset.
#[tracing::instrument(level = "debug", skip_all)]
pub fn normalize(
    program: &mut Program,
    options: &RewriteOptions,
) -> Result<RewriteOutcome, InvariantViolation> {
    let mut diagnostics = DiagnosticCollection::new();
    mark_direct_eval(program, &mut diagnostics);
    let bound = options
        .max_rewrites
        .unwrap_or_else(|| 4 * count_nodes(program) + 64);

    let mut tree = resolve(program);
    if !program.data.is_preserved() {
        report_strict_assignments(&tree, &mut diagnostics);
    }
    let mut global = None;
    let mut rewrites = 0;
    let mut sweeps = 0;
    loop {
        sweeps += 1;
        let mut sweep = Sweep {
            tree: &mut tree,
            diagnostics: &mut diagnostics,
            options,
            scope: ScopeId::PROGRAM,
            global: &mut global,
            applied: 0,
        };
        sweep.program(program);
        let applied = sweep.applied;
        rewrites += applied;
        debug!(sweep = sweeps, applied, total = rewrites, "sweep finished");
        if rewrites > bound {
            return Err(InvariantViolation::Diverged { bound });
        }
        if applied == 0 {
            break;
        }
        tree = resolve(program);
    }

    if options.check_canonical {
        check_canonical(program, &tree, options)?;
    }
    Ok(RewriteOutcome {
        tree,
        diagnostics,
        sweeps,
        rewrites,
    })
}

struct Sweep<'a> {
    tree: &'a mut ScopeTree,
    diagnostics: &'a mut DiagnosticCollection,
    options: &'a RewriteOptions,
    /// The function (or program) scope being walked.
    scope: ScopeId,
    /// The program temporary holding the global object, once minted.
    global: &'a mut Option<String>,
    applied: usize,
}

impl Sweep<'_> {
    fn context(&mut self) -> RuleContext<'_> {
        RuleContext::new(self.tree, self.diagnostics, self.scope).with_options(self.options)
    }

    fn program(&mut self, program: &mut Program) {
        if program.data.is_preserved() {
            return;
        }
        let declared = if self.options.reference_errors {
            route_through_global_object(program, self.tree, self.global)
        } else {
            declare_implicit_globals(program, self.tree)
        };
        if declared > 0 {
            debug!(rule = "implicit-globals", declared, "applied");
            self.applied += declared;
        }
        self.statements(&mut program.statements);
        self.declare_temporaries(ScopeId::PROGRAM, &mut program.statements);
    }

    fn function(&mut self, func: &mut Function) {
        if func.data.is_preserved() {
            return;
        }
        let Some(scope) = func.scope else {
            return;
        };
        self.body(scope, &mut func.body);
    }

    fn arrow(&mut self, arrow: &mut ArrowFunction) {
        if arrow.data.is_preserved() {
            return;
        }
        let Some(scope) = arrow.scope else {
            return;
        };
        // A concise body has nowhere to declare temporaries; it is given a
        // block first.
        if let ArrowBody::Block(body) = &mut arrow.body {
            self.body(scope, body);
        }
    }

    fn body(&mut self, scope: ScopeId, body: &mut FunctionBody) {
        let outer = std::mem::replace(&mut self.scope, scope);
        if self.options.unify_returns && unify_returns(body, scope, self.tree) {
            debug!(rule = "unify-returns", "applied");
            self.applied += 1;
        }
        if self.options.explicit_returns && append_return(body) {
            debug!(rule = "explicit-return", "applied");
            self.applied += 1;
        }
        self.statements(&mut body.statements);
        self.declare_temporaries(scope, &mut body.statements);
        self.scope = outer;
    }

    /// `var $tmpN;` for the temporaries minted in `scope` this sweep, after
    /// any directive prologue.
    fn declare_temporaries(&mut self, scope: ScopeId, statements: &mut Vec<Statement>) {
        let minted = self.tree.take_temporaries_of(scope);
        if minted.is_empty() {
            return;
        }
        let at = prologue_len(statements);
        statements.splice(at..at, minted.into_iter().map(factory::temp_declaration));
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Try each rule at `stmt` in order; the first replacement wins.
    fn try_rules(&mut self, stmt: &mut Statement) -> Option<Vec<Statement>> {
        for rule in RULES.iter() {
            if stmt.data().is_preserved() || peel_labels(stmt).data().is_preserved() {
                return None;
            }
            let mut cx = self.context();
            if let Some(replacement) = rule.rewrite_statement(stmt, &mut cx) {
                debug!(rule = rule.name(), "applied");
                self.applied += 1;
                return Some(replacement);
            }
        }
        None
    }

    fn statements(&mut self, statements: &mut Vec<Statement>) {
        let mut i = 0;
        while i < statements.len() {
            match self.try_rules(&mut statements[i]) {
                Some(replacement) => {
                    let len = replacement.len();
                    statements.splice(i..=i, replacement);
                    i += len;
                }
                None => {
                    self.descend(&mut statements[i]);
                    i += 1;
                }
            }
        }
    }

    /// A statement in single-statement position (`if` branches, loop and
    /// label bodies).
    fn nested(&mut self, stmt: &mut Statement) {
        match self.try_rules(stmt) {
            Some(replacement) => *stmt = as_single_statement(replacement),
            None => self.descend(stmt),
        }
    }

    fn descend(&mut self, stmt: &mut Statement) {
        if stmt.data().is_preserved() {
            return;
        }
        match stmt {
            Statement::Variable(decl) => {
                for declarator in &mut decl.declarations {
                    if let Some(init) = &mut declarator.init {
                        self.expression(init, true);
                    }
                }
            }
            Statement::Function(func) => self.function(func),
            Statement::Block(block) => self.statements(&mut block.statements),
            Statement::Empty(_) | Statement::Debugger(_) => {}
            Statement::Continue(_) | Statement::Break(_) => {}
            Statement::Expression(n) => self.expression(&mut n.expression, false),
            Statement::If(n) => {
                self.expression(&mut n.test, true);
                self.nested(&mut n.consequent);
                if let Some(alternate) = &mut n.alternate {
                    self.nested(alternate);
                }
            }
            Statement::While(n) => {
                self.expression(&mut n.test, true);
                self.nested(&mut n.body);
            }
            Statement::DoWhile(n) => {
                self.nested(&mut n.body);
                self.expression(&mut n.test, true);
            }
            Statement::For(n) => {
                match &mut n.init {
                    Some(ForInit::Variable(decl)) => {
                        for declarator in &mut decl.declarations {
                            if let Some(init) = &mut declarator.init {
                                self.expression(init, true);
                            }
                        }
                    }
                    Some(ForInit::Expression(init)) => self.expression(init, false),
                    None => {}
                }
                if let Some(test) = &mut n.test {
                    self.expression(test, true);
                }
                if let Some(update) = &mut n.update {
                    self.expression(update, false);
                }
                self.nested(&mut n.body);
            }
            Statement::ForIn(n) => {
                self.expression(&mut n.right, true);
                self.nested(&mut n.body);
            }
            Statement::ForOf(n) => {
                self.expression(&mut n.right, true);
                self.nested(&mut n.body);
            }
            Statement::Return(n) => {
                if let Some(argument) = &mut n.argument {
                    self.expression(argument, true);
                }
            }
            Statement::With(n) => {
                self.expression(&mut n.object, true);
                self.nested(&mut n.body);
            }
            Statement::Switch(n) => {
                self.expression(&mut n.discriminant, true);
                for case in n.cases.iter_mut().filter(|case| !case.data.is_preserved()) {
                    if let Some(test) = &mut case.test {
                        self.expression(test, true);
                    }
                    self.statements(&mut case.consequent);
                }
            }
            Statement::Labeled(_) => {
                // Rules were tried with the labels in place; a labeled loop
                // or switch must keep them, anything else is a fresh
                // single-statement position.
                let core = peel_labels_mut(stmt);
                if core.is_iteration() || matches!(core, Statement::Switch(_)) {
                    self.descend(core);
                } else {
                    self.nested(core);
                }
            }
            Statement::Throw(n) => self.expression(&mut n.argument, true),
            Statement::Try(n) => {
                self.statements(&mut n.block.statements);
                if let Some(handler) = &mut n.handler {
                    self.statements(&mut handler.body.statements);
                }
                if let Some(finalizer) = &mut n.finalizer {
                    self.statements(&mut finalizer.statements);
                }
            }
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self, expr: &mut Expression, value_used: bool) {
        if expr.data().is_preserved() {
            return;
        }
        for rule in RULES.iter() {
            let mut cx = self.context();
            if rule.rewrite_expression(expr, value_used, &mut cx) {
                debug!(rule = rule.name(), "applied");
                self.applied += 1;
                return;
            }
        }
        match expr {
            Expression::Identifier(_)
            | Expression::This(_)
            | Expression::Null(_)
            | Expression::Boolean(_)
            | Expression::Number(_)
            | Expression::String(_)
            | Expression::RegExp(_) => {}
            Expression::Array(n) => {
                for element in n.elements.iter_mut().flatten() {
                    self.expression(element, true);
                }
            }
            Expression::Object(n) => {
                for property in &mut n.properties {
                    match &mut property.value {
                        PropertyValue::Init(value) => self.expression(value, true),
                        PropertyValue::Get(func) | PropertyValue::Set(func) => self.function(func),
                    }
                }
            }
            Expression::Function(func) => self.function(func),
            Expression::Arrow(arrow) => self.arrow(arrow),
            Expression::Unary(n) => self.expression(&mut n.operand, true),
            Expression::Update(n) => self.expression(&mut n.operand, true),
            Expression::Binary(n) => {
                self.expression(&mut n.left, true);
                self.expression(&mut n.right, true);
            }
            Expression::Logical(n) => {
                self.expression(&mut n.left, true);
                self.expression(&mut n.right, true);
            }
            Expression::Assignment(n) => {
                self.expression(&mut n.target, true);
                self.expression(&mut n.value, true);
            }
            Expression::Conditional(n) => {
                self.expression(&mut n.test, true);
                self.expression(&mut n.consequent, value_used);
                self.expression(&mut n.alternate, value_used);
            }
            Expression::Call(n) => {
                self.expression(&mut n.callee, true);
                for argument in &mut n.arguments {
                    self.expression(argument, true);
                }
            }
            Expression::New(n) => {
                self.expression(&mut n.callee, true);
                for argument in &mut n.arguments {
                    self.expression(argument, true);
                }
            }
            Expression::Member(n) => {
                self.expression(&mut n.object, true);
                if let MemberProperty::Computed(key) = &mut n.property {
                    self.expression(key, true);
                }
            }
            Expression::Sequence(n) => {
                let last = n.expressions.len().saturating_sub(1);
                for (i, element) in n.expressions.iter_mut().enumerate() {
                    self.expression(element, value_used && i == last);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RewriteOptions::default();
        assert!(options.check_canonical);
        assert!(options.explicit_returns);
        assert_eq!(options.max_rewrites, None);
        assert!(!options.reference_errors);
        assert!(!options.unify_returns);
        assert!(!options.unfold_ifs);
    }

    #[test]
    fn test_strict_assignment_warns_once() {
        let mut program = jsnorm_parser::parse("'use strict'; x = 1; x = 2;").expect("parses");
        let outcome = normalize(&mut program, &RewriteOptions::default()).expect("normalizes");
        let codes: Vec<u32> = outcome.diagnostics.diagnostics().iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![9007]);
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn test_divergence_bound() {
        let mut program = jsnorm_parser::parse("for (;;) { a && b; }").expect("parses");
        let options = RewriteOptions {
            max_rewrites: Some(1),
            ..RewriteOptions::default()
        };
        assert_eq!(
            normalize(&mut program, &options).err(),
            Some(InvariantViolation::Diverged { bound: 1 })
        );
    }
}
