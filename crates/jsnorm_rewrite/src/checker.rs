//! Verifies that a normalized tree lies in the canonical subset.

use crate::cflow::completes_normally;
use crate::engine::RewriteOptions;
use crate::error::InvariantViolation;
use crate::rules::loops::is_key_collector;
use crate::rules::unfold_ifs::has_two_branches;
use crate::rules::unify_returns::is_unified;
use jsnorm_ast::node::*;
use jsnorm_ast::visitor::{walk_arrow_function, walk_expression, walk_function, walk_program, walk_statement};
use jsnorm_ast::AstVisitor;
use jsnorm_core::text::TextSpan;
use jsnorm_resolver::{BindingKind, ScopeTree};

/// Check a normalized, re-resolved program. `PRESERVED` subtrees are not
/// looked into. Returns the first offending construct in document order.
#[tracing::instrument(level = "debug", skip_all)]
pub fn check_canonical(
    program: &Program,
    tree: &ScopeTree,
    options: &RewriteOptions,
) -> Result<(), InvariantViolation> {
    let mut checker = Checker {
        tree,
        options,
        violation: None,
    };
    checker.visit_program(program);
    match checker.violation {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

struct Checker<'t> {
    tree: &'t ScopeTree,
    options: &'t RewriteOptions,
    violation: Option<InvariantViolation>,
}

impl Checker<'_> {
    fn flag(&mut self, construct: impl Into<String>, span: TextSpan) {
        if self.violation.is_none() {
            self.violation = Some(InvariantViolation::NonCanonical {
                construct: construct.into(),
                span,
            });
        }
    }

    fn check_body(&mut self, body: &FunctionBody) {
        if self.options.explicit_returns && completes_normally(&body.statements) {
            self.flag("function body that completes normally", body.data.span);
        }
        if self.options.unify_returns && !is_unified(&body.statements) {
            self.flag("return statement before the end of the function", body.data.span);
        }
    }
}

impl AstVisitor for Checker<'_> {
    fn visit_program(&mut self, program: &Program) {
        if !program.data.is_preserved() {
            walk_program(self, program);
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        if self.violation.is_some() || stmt.data().is_preserved() {
            return;
        }
        match stmt {
            Statement::For(_) | Statement::ForOf(_) | Statement::DoWhile(_) | Statement::With(_) => {
                self.flag(stmt.describe(), stmt.span());
            }
            Statement::ForIn(_) if !is_key_collector(stmt) => self.flag(stmt.describe(), stmt.span()),
            Statement::Variable(decl) if decl.declarations.len() > 1 => {
                self.flag("multi-declarator declaration", decl.data.span);
            }
            Statement::If(n) if self.options.unfold_ifs && has_two_branches(n) => {
                self.flag("if statement with two non-empty branches", n.data.span);
            }
            Statement::Break(jump) | Statement::Continue(jump) if jump.label.is_none() => {
                self.flag(format!("unlabeled {}", stmt.describe()), jump.data.span);
            }
            Statement::Switch(n) => {
                self.visit_expression(&n.discriminant);
                for case in n.cases.iter().filter(|case| !case.data.is_preserved()) {
                    if let Some(test) = &case.test {
                        self.visit_expression(test);
                    }
                    for s in &case.consequent {
                        self.visit_statement(s);
                    }
                }
                return;
            }
            _ => {}
        }
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        if self.violation.is_some() || expr.data().is_preserved() {
            return;
        }
        match expr {
            Expression::Assignment(n) if n.operator.is_compound() => {
                self.flag(format!("compound assignment '{}'", n.operator), n.data.span);
            }
            Expression::Assignment(n) => {
                if let Expression::Identifier(target) = &*n.target {
                    let implicit = target
                        .binding
                        .and_then(|id| self.tree.binding(id))
                        .is_some_and(|b| b.kind == BindingKind::Implicit && !b.is_strict_assigned());
                    if implicit {
                        self.flag(format!("undeclared assignment target '{}'", target.name), target.data.span);
                    }
                }
            }
            Expression::Update(n) => self.flag(format!("update expression '{}'", n.operator), n.data.span),
            Expression::Logical(n) => self.flag(format!("logical expression '{}'", n.operator), n.data.span),
            Expression::Conditional(n) => self.flag("conditional expression", n.data.span),
            _ => {}
        }
        walk_expression(self, expr);
    }

    fn visit_function(&mut self, func: &Function) {
        if func.data.is_preserved() {
            return;
        }
        self.check_body(&func.body);
        walk_function(self, func);
    }

    fn visit_arrow_function(&mut self, arrow: &ArrowFunction) {
        if arrow.data.is_preserved() {
            return;
        }
        match &arrow.body {
            ArrowBody::Expression(body) => self.flag("concise arrow body", body.span()),
            ArrowBody::Block(body) => self.check_body(body),
        }
        walk_arrow_function(self, arrow);
    }
}
