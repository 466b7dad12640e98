//! One `return` per function, used when `RewriteOptions::unify_returns`
//! is set.
//!
//! ```text
//! function f(a) { if (a) { return 1; } g(); return 2; }
//! ```
//!
//! becomes
//!
//! ```text
//! function f(a) {
//!     $label0: {
//!         if (a) { { $tmp0 = 1; break $label0; } }
//!         g();
//!         { $tmp0 = 2; break $label0; }
//!     }
//!     return $tmp0;
//! }
//! ```
//!
//! A `break` out of a `try` runs its `finally` exactly as the `return` did.

use jsnorm_ast::factory;
use jsnorm_ast::node::*;
use jsnorm_ast::types::ScopeId;
use jsnorm_ast::visitor::{walk_mut_statement, walk_statement, AstVisitor, AstVisitorMut};
use jsnorm_ast::UnaryOperator;
use jsnorm_resolver::ScopeTree;

/// Rewrite `body` so its only `return` is its last statement. Returns
/// whether anything changed.
pub(crate) fn unify_returns(body: &mut FunctionBody, scope: ScopeId, tree: &mut ScopeTree) -> bool {
    if body.data.is_preserved() || is_unified(&body.statements) {
        return false;
    }
    let label = tree.mint_label(scope);
    let result = tree.mint_temporary(scope);
    let mut replacer = ReturnReplacer {
        label: &label,
        result: &result,
    };
    for stmt in body.statements.iter_mut() {
        replacer.visit_statement(stmt);
    }
    let statements = std::mem::take(&mut body.statements);
    body.statements = vec![
        factory::labeled(label, factory::block(statements)),
        factory::return_statement(Some(factory::temp_reference(result))),
    ];
    true
}

/// No `return` outside nested functions, or exactly one as the last
/// statement.
pub(crate) fn is_unified(statements: &[Statement]) -> bool {
    let mut counter = ReturnCounter::default();
    for stmt in statements {
        counter.visit_statement(stmt);
    }
    match counter.count {
        0 => true,
        1 => matches!(statements.last(), Some(Statement::Return(_))),
        _ => false,
    }
}

#[derive(Default)]
struct ReturnCounter {
    count: usize,
}

impl AstVisitor for ReturnCounter {
    fn visit_statement(&mut self, stmt: &Statement) {
        if matches!(stmt, Statement::Return(_)) {
            self.count += 1;
        }
        walk_statement(self, stmt);
    }

    fn visit_function(&mut self, _func: &Function) {}

    fn visit_arrow_function(&mut self, _arrow: &ArrowFunction) {}
}

struct ReturnReplacer<'n> {
    label: &'n str,
    result: &'n str,
}

impl AstVisitorMut for ReturnReplacer<'_> {
    fn visit_statement(&mut self, stmt: &mut Statement) {
        let Statement::Return(ret) = stmt else {
            walk_mut_statement(self, stmt);
            return;
        };
        let value = ret
            .argument
            .take()
            .unwrap_or_else(|| factory::unary(UnaryOperator::Void, factory::number(0)));
        *stmt = factory::block(vec![
            factory::expression_statement(factory::assign(factory::temp_reference(self.result), value)),
            factory::break_to(self.label),
        ]);
    }

    fn visit_function(&mut self, _func: &mut Function) {}

    fn visit_arrow_function(&mut self, _arrow: &mut ArrowFunction) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{resolved, statements};
    use pretty_assertions::assert_eq;

    fn body(source: &str) -> Vec<Statement> {
        match statements(source).into_iter().next() {
            Some(Statement::Function(func)) => func.body.statements,
            _ => panic!("expected a function declaration"),
        }
    }

    /// The first function declaration of `source`, unified.
    fn unified(source: &str) -> (bool, Vec<Statement>) {
        let (mut program, mut tree) = resolved(source);
        let Some(Statement::Function(func)) = program.statements.first_mut() else {
            panic!("expected a function declaration");
        };
        let scope = func.scope.expect("resolved");
        let changed = unify_returns(&mut func.body, scope, &mut tree);
        (changed, std::mem::take(&mut func.body.statements))
    }

    #[test]
    fn test_early_returns_break_to_one_exit() {
        assert_eq!(
            unified("function f(a) { if (a) { return 1; } g(); return; }"),
            (
                true,
                body(
                    "function f() {
                         $label0: { if (a) { { $tmp0 = 1; break $label0; } } g(); { $tmp0 = void 0; break $label0; } }
                         return $tmp0;
                     }"
                )
            )
        );
    }

    #[test]
    fn test_single_final_return_is_already_unified() {
        let (changed, _) = unified("function f(a) { g(a); return a; }");
        assert!(!changed);
        let (changed, _) = unified("function f(a) { g(a); }");
        assert!(!changed);
    }

    #[test]
    fn test_nested_functions_keep_their_returns() {
        let (changed, body) = unified("function f() { return function () { return 1; }; }");
        assert!(!changed);
        assert_eq!(body.len(), 1);

        let (changed, body) = unified("function f(a) { while (a) { return () => { return a; }; } }");
        assert!(changed);
        assert!(matches!(body.last(), Some(Statement::Return(_))));
    }

    #[test]
    fn test_is_unified() {
        assert!(is_unified(&body("function f() { g(); }")));
        assert!(is_unified(&body("function f() { g(); return 1; }")));
        assert!(!is_unified(&body("function f() { return 1; g(); }")));
        assert!(!is_unified(&body("function f(a) { if (a) { return 1; } return 2; }")));
    }
}
