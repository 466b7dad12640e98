//! The resolver implementation.
//!
//! Walks the AST once and builds the scope tree. Handles:
//! - Hoisting of `var` and function declarations per function
//! - Block scopes for `let`/`const`, including loop heads and `switch` cases
//! - Catch parameters
//! - Implicit globals for names referenced but never declared
//! - `"use strict"` prologues, inherited by nested scopes
//! - Label collection for fresh label minting

use crate::binding::{BindingFlags, BindingKind};
use crate::scope::{ScopeKind, ScopeTree};
use jsnorm_ast::node::*;
use jsnorm_ast::types::{BindingId, ScopeId};
use jsnorm_ast::visitor::{walk_mut_expression, walk_mut_statement, AstVisitorMut};
use tracing::trace;

/// Resolve every declaration and reference of `program` in place and return
/// the scope tree the annotations point into.
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve(program: &mut Program) -> ScopeTree {
    let mut resolver = Resolver::new();
    resolver.resolve_program(program);
    resolver.finish()
}

/// Builds a `ScopeTree` while annotating identifiers and function nodes.
pub struct Resolver {
    tree: ScopeTree,
    current_scope: ScopeId,
    /// Depth of `PRESERVED` subtrees around the current node.
    preserved_depth: u32,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            tree: ScopeTree::new(),
            current_scope: ScopeId::PROGRAM,
            preserved_depth: 0,
        }
    }

    pub fn finish(self) -> ScopeTree {
        self.tree
    }

    // ========================================================================
    // Program and functions
    // ========================================================================

    pub fn resolve_program(&mut self, program: &mut Program) {
        let preserved = program.data.is_preserved();
        if preserved {
            self.preserved_depth += 1;
        }
        if has_use_strict(&program.statements) {
            self.tree.mark_strict(ScopeId::PROGRAM);
        }
        self.hoist_declarations(ScopeId::PROGRAM, &program.statements);
        self.declare_lexical(ScopeId::PROGRAM, &program.statements);
        for stmt in program.statements.iter_mut() {
            self.visit_statement(stmt);
        }
        if preserved {
            self.preserved_depth -= 1;
        }
    }

    fn resolve_function(&mut self, func: &mut Function, is_expression: bool) {
        let preserved = func.data.is_preserved();
        if preserved {
            self.preserved_depth += 1;
        }
        let scope = self.enter_scope(ScopeKind::Function);
        if has_use_strict(&func.body.statements) {
            self.tree.mark_strict(scope);
        }
        self.tree.declare(scope, "arguments", BindingKind::Arguments);
        if is_expression {
            if let Some(name) = &mut func.name {
                name.binding = Some(self.tree.declare(scope, &name.name, BindingKind::FunctionName));
            }
        }
        for param in func.params.iter_mut() {
            param.binding = Some(self.tree.declare(scope, &param.name, BindingKind::Parameter));
        }
        self.hoist_declarations(scope, &func.body.statements);
        self.declare_lexical(scope, &func.body.statements);
        for stmt in func.body.statements.iter_mut() {
            self.visit_statement(stmt);
        }
        func.scope = Some(scope);
        self.exit_scope(scope);
        if preserved {
            self.preserved_depth -= 1;
        }
    }

    fn resolve_arrow(&mut self, arrow: &mut ArrowFunction) {
        let preserved = arrow.data.is_preserved();
        if preserved {
            self.preserved_depth += 1;
        }
        let scope = self.enter_scope(ScopeKind::Function);
        self.tree.mark_arrow(scope);
        for param in arrow.params.iter_mut() {
            param.binding = Some(self.tree.declare(scope, &param.name, BindingKind::Parameter));
        }
        match &mut arrow.body {
            ArrowBody::Expression(expr) => self.visit_expression(expr),
            ArrowBody::Block(body) => {
                if has_use_strict(&body.statements) {
                    self.tree.mark_strict(scope);
                }
                self.hoist_declarations(scope, &body.statements);
                self.declare_lexical(scope, &body.statements);
                for stmt in body.statements.iter_mut() {
                    self.visit_statement(stmt);
                }
            }
        }
        arrow.scope = Some(scope);
        self.exit_scope(scope);
        if preserved {
            self.preserved_depth -= 1;
        }
    }

    // ========================================================================
    // Hoisting
    // ========================================================================

    /// Declare every `var` and function declaration of a function body in
    /// `scope`, looking through blocks but not into nested functions.
    fn hoist_declarations(&mut self, scope: ScopeId, statements: &[Statement]) {
        for stmt in statements {
            self.hoist_statement(scope, stmt);
        }
    }

    fn hoist_statement(&mut self, scope: ScopeId, stmt: &Statement) {
        match stmt {
            Statement::Variable(decl) => self.hoist_var(scope, decl),
            Statement::Function(func) => {
                if let Some(name) = &func.name {
                    self.tree.declare(scope, &name.name, BindingKind::Function);
                }
            }
            Statement::Block(block) => self.hoist_declarations(scope, &block.statements),
            Statement::If(n) => {
                self.hoist_statement(scope, &n.consequent);
                if let Some(alt) = &n.alternate {
                    self.hoist_statement(scope, alt);
                }
            }
            Statement::While(n) => self.hoist_statement(scope, &n.body),
            Statement::DoWhile(n) => self.hoist_statement(scope, &n.body),
            Statement::For(n) => {
                if let Some(ForInit::Variable(decl)) = &n.init {
                    self.hoist_var(scope, decl);
                }
                self.hoist_statement(scope, &n.body);
            }
            Statement::ForIn(n) => {
                if let ForHead::Variable(decl) = &n.left {
                    self.hoist_var(scope, decl);
                }
                self.hoist_statement(scope, &n.body);
            }
            Statement::ForOf(n) => {
                if let ForHead::Variable(decl) = &n.left {
                    self.hoist_var(scope, decl);
                }
                self.hoist_statement(scope, &n.body);
            }
            Statement::With(n) => self.hoist_statement(scope, &n.body),
            Statement::Labeled(n) => self.hoist_statement(scope, &n.body),
            Statement::Switch(n) => {
                for case in n.cases.iter() {
                    self.hoist_declarations(scope, &case.consequent);
                }
            }
            Statement::Try(n) => {
                self.hoist_declarations(scope, &n.block.statements);
                if let Some(handler) = &n.handler {
                    self.hoist_declarations(scope, &handler.body.statements);
                }
                if let Some(finalizer) = &n.finalizer {
                    self.hoist_declarations(scope, &finalizer.statements);
                }
            }
            Statement::Empty(_)
            | Statement::Debugger(_)
            | Statement::Expression(_)
            | Statement::Continue(_)
            | Statement::Break(_)
            | Statement::Return(_)
            | Statement::Throw(_) => {}
        }
    }

    fn hoist_var(&mut self, scope: ScopeId, decl: &VariableDeclaration) {
        if decl.kind != VariableKind::Var {
            return;
        }
        for d in decl.declarations.iter() {
            let kind = if d.name.data.is_synthesized() {
                BindingKind::Temporary
            } else {
                BindingKind::Var
            };
            self.tree.declare(scope, &d.name.name, kind);
        }
    }

    /// Declare the `let`/`const` statements directly in `statements`.
    fn declare_lexical(&mut self, scope: ScopeId, statements: &[Statement]) {
        for stmt in statements {
            if let Statement::Variable(decl) = stmt {
                self.declare_lexical_declaration(scope, decl);
            }
        }
    }

    fn declare_lexical_declaration(&mut self, scope: ScopeId, decl: &VariableDeclaration) {
        let kind = match decl.kind {
            VariableKind::Var => return,
            VariableKind::Let => BindingKind::Let,
            VariableKind::Const => BindingKind::Const,
        };
        for d in decl.declarations.iter() {
            self.tree.declare(scope, &d.name.name, kind);
        }
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    fn resolve_block(&mut self, statements: &mut [Statement]) {
        let scope = self.enter_scope(ScopeKind::Block);
        self.declare_lexical(scope, statements);
        for stmt in statements.iter_mut() {
            self.visit_statement(stmt);
        }
        self.exit_scope(scope);
    }

    fn resolve_switch(&mut self, node: &mut SwitchStatement) {
        self.visit_expression(&mut node.discriminant);
        let scope = self.enter_scope(ScopeKind::Block);
        for case in node.cases.iter() {
            self.declare_lexical(scope, &case.consequent);
        }
        for case in node.cases.iter_mut() {
            let preserved = case.data.is_preserved();
            if preserved {
                self.preserved_depth += 1;
            }
            if let Some(test) = &mut case.test {
                self.visit_expression(test);
            }
            for stmt in case.consequent.iter_mut() {
                self.visit_statement(stmt);
            }
            if preserved {
                self.preserved_depth -= 1;
            }
        }
        self.exit_scope(scope);
    }

    fn resolve_for_head(&mut self, head: &mut ForHead) {
        match head {
            ForHead::Variable(decl) => {
                for d in decl.declarations.iter_mut() {
                    self.visit_binding(&mut d.name);
                    if let Some(id) = d.name.binding {
                        self.mark_assigned(id);
                    }
                }
            }
            ForHead::Target(Expression::Identifier(ident)) => self.resolve_reference(ident, true),
            ForHead::Target(target) => self.visit_expression(target),
        }
    }

    fn enter_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let scope = self.tree.push_scope(kind, Some(self.current_scope));
        self.current_scope = scope;
        scope
    }

    fn exit_scope(&mut self, scope: ScopeId) {
        self.current_scope = self.tree.scope(scope).parent.unwrap_or(ScopeId::PROGRAM);
    }

    // ========================================================================
    // References
    // ========================================================================

    fn resolve_reference(&mut self, ident: &mut Identifier, assigned: bool) {
        let key = self.tree.intern(&ident.name);
        self.tree.note_name(key);
        let id = match self.tree.lookup_interned(self.current_scope, key) {
            Some(id) => id,
            None => {
                trace!(name = %ident.name, "implicit global");
                self.tree.declare(ScopeId::PROGRAM, &ident.name, BindingKind::Implicit)
            }
        };
        self.tree.add_flags(id, BindingFlags::REFERENCED);
        if assigned {
            self.mark_assigned(id);
            if self.preserved_depth == 0 && self.tree.scope(self.current_scope).is_strict {
                self.tree.note_strict_assignment(id, ident.data.span);
            }
        }
        ident.binding = Some(id);
    }

    fn mark_assigned(&mut self, id: BindingId) {
        if self.preserved_depth == 0 {
            self.tree.add_flags(id, BindingFlags::ASSIGNED);
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AstVisitorMut for Resolver {
    fn visit_statement(&mut self, stmt: &mut Statement) {
        let preserved = stmt.data().is_preserved();
        if preserved {
            self.preserved_depth += 1;
        }

        // `for (let ...)` heads get a block scope around the whole loop.
        let loop_scope = match lexical_loop_declaration(stmt) {
            Some(decl) => {
                let scope = self.enter_scope(ScopeKind::Block);
                self.declare_lexical_declaration(scope, decl);
                Some(scope)
            }
            None => None,
        };

        match stmt {
            Statement::Function(func) => {
                if let Some(name) = &mut func.name {
                    self.visit_binding(name);
                }
                self.resolve_function(func, false);
            }
            Statement::Block(block) => self.resolve_block(&mut block.statements),
            Statement::ForIn(n) => {
                self.resolve_for_head(&mut n.left);
                self.visit_expression(&mut n.right);
                self.visit_statement(&mut n.body);
            }
            Statement::ForOf(n) => {
                self.resolve_for_head(&mut n.left);
                self.visit_expression(&mut n.right);
                self.visit_statement(&mut n.body);
            }
            Statement::Switch(n) => self.resolve_switch(n),
            Statement::Try(n) => {
                self.resolve_block(&mut n.block.statements);
                if let Some(handler) = &mut n.handler {
                    self.visit_catch_clause(handler);
                }
                if let Some(finalizer) = &mut n.finalizer {
                    self.resolve_block(&mut finalizer.statements);
                }
            }
            _ => walk_mut_statement(self, stmt),
        }

        if let Some(scope) = loop_scope {
            self.exit_scope(scope);
        }
        if preserved {
            self.preserved_depth -= 1;
        }
    }

    fn visit_expression(&mut self, expr: &mut Expression) {
        let preserved = expr.data().is_preserved();
        if preserved {
            self.preserved_depth += 1;
        }
        match expr {
            Expression::Function(func) => self.resolve_function(func, true),
            Expression::Arrow(arrow) => self.resolve_arrow(arrow),
            Expression::Assignment(n) => {
                match &mut *n.target {
                    Expression::Identifier(ident) => self.resolve_reference(ident, true),
                    target => self.visit_expression(target),
                }
                self.visit_expression(&mut n.value);
            }
            Expression::Update(n) => match &mut *n.operand {
                Expression::Identifier(ident) => self.resolve_reference(ident, true),
                operand => self.visit_expression(operand),
            },
            _ => walk_mut_expression(self, expr),
        }
        if preserved {
            self.preserved_depth -= 1;
        }
    }

    /// Accessor bodies; function expressions are handled in
    /// `visit_expression`.
    fn visit_function(&mut self, func: &mut Function) {
        self.resolve_function(func, true);
    }

    fn visit_arrow_function(&mut self, arrow: &mut ArrowFunction) {
        self.resolve_arrow(arrow);
    }

    fn visit_variable_declaration(&mut self, decl: &mut VariableDeclaration) {
        for d in decl.declarations.iter_mut() {
            self.visit_binding(&mut d.name);
            if let Some(init) = &mut d.init {
                if let Some(id) = d.name.binding {
                    self.mark_assigned(id);
                }
                self.visit_expression(init);
            }
        }
    }

    fn visit_catch_clause(&mut self, clause: &mut CatchClause) {
        let scope = self.enter_scope(ScopeKind::Catch);
        clause.param.binding = Some(self.tree.declare(
            scope,
            &clause.param.name,
            BindingKind::CatchParameter,
        ));
        self.declare_lexical(scope, &clause.body.statements);
        for stmt in clause.body.statements.iter_mut() {
            self.visit_statement(stmt);
        }
        self.exit_scope(scope);
    }

    fn visit_binding(&mut self, ident: &mut Identifier) {
        match self.tree.lookup(self.current_scope, &ident.name) {
            Some(id) => ident.binding = Some(id),
            None => self.resolve_reference(ident, false),
        }
    }

    fn visit_reference(&mut self, ident: &mut Identifier) {
        self.resolve_reference(ident, false);
    }

    fn visit_label(&mut self, label: &mut Identifier) {
        self.tree.add_label(self.current_scope, &label.name);
    }
}

/// Whether the directive prologue of a body contains `"use strict"`. The
/// directive must be spelled without escapes, so the raw text is compared.
fn has_use_strict(statements: &[Statement]) -> bool {
    statements
        .iter()
        .map_while(|stmt| match stmt {
            Statement::Expression(ExpressionStatement {
                expression: Expression::String(literal),
                ..
            }) => Some(literal),
            _ => None,
        })
        .any(|literal| literal.raw == "'use strict'" || literal.raw == "\"use strict\"")
}

fn lexical_loop_declaration(stmt: &Statement) -> Option<&VariableDeclaration> {
    let decl = match stmt {
        Statement::For(n) => match &n.init {
            Some(ForInit::Variable(decl)) => decl,
            _ => return None,
        },
        Statement::ForIn(ForInStatement {
            left: ForHead::Variable(decl),
            ..
        })
        | Statement::ForOf(ForOfStatement {
            left: ForHead::Variable(decl),
            ..
        }) => decl,
        _ => return None,
    };
    decl.kind.is_lexical().then_some(decl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsnorm_core::text::TextSpan;

    fn ident(name: &str) -> Identifier {
        Identifier::new(name, TextSpan::default())
    }

    fn assign(name: &str) -> Statement {
        Statement::Expression(ExpressionStatement {
            data: NodeData::default(),
            expression: Expression::Assignment(AssignmentExpression {
                data: NodeData::default(),
                operator: jsnorm_ast::AssignmentOperator::Assign,
                target: Box::new(Expression::Identifier(ident(name))),
                value: Box::new(Expression::Null(NodeData::default())),
            }),
        })
    }

    #[test]
    fn test_resolver_creation() {
        let resolver = Resolver::new();
        let tree = resolver.finish();
        assert_eq!(tree.scopes().len(), 1);
        assert!(tree.bindings().is_empty());
    }

    #[test]
    fn test_assignment_creates_assigned_implicit() {
        let mut program = Program {
            data: NodeData::default(),
            statements: vec![assign("counter")],
        };
        let tree = resolve(&mut program);
        let globals: Vec<_> = tree
            .assigned_implicit_globals()
            .map(|b| b.name_text.as_str())
            .collect();
        assert_eq!(globals, vec!["counter"]);
    }

    #[test]
    fn test_use_strict_prologue() {
        let program = jsnorm_parser::parse("'a'; \"use strict\"; f();").expect("parses");
        assert!(has_use_strict(&program.statements));
        let program = jsnorm_parser::parse("f(); 'use strict';").expect("parses");
        assert!(!has_use_strict(&program.statements));
        let program = jsnorm_parser::parse("'use\\x20strict';").expect("parses");
        assert!(!has_use_strict(&program.statements));
    }

    #[test]
    fn test_preserved_statement_does_not_assign() {
        let mut stmt = assign("counter");
        stmt.data_mut().flags |= jsnorm_ast::NodeFlags::PRESERVED;
        let mut program = Program {
            data: NodeData::default(),
            statements: vec![stmt],
        };
        let tree = resolve(&mut program);
        assert_eq!(tree.assigned_implicit_globals().count(), 0);
        let binding = tree.lookup(ScopeId::PROGRAM, "counter").and_then(|id| tree.binding(id));
        assert!(binding.is_some_and(|b| b.is_referenced() && b.is_implicit()));
    }
}
