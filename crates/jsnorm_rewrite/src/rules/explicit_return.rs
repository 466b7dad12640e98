use crate::cflow::completes_normally;
use jsnorm_ast::factory;
use jsnorm_ast::node::*;

/// Append `return;` to a function body whose end is reachable.
pub(crate) fn append_return(body: &mut FunctionBody) -> bool {
    if body.data.is_preserved() || !completes_normally(&body.statements) {
        return false;
    }
    body.statements.push(factory::return_statement(None));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::statements;

    fn body(source: &str) -> FunctionBody {
        match statements(source).into_iter().next() {
            Some(Statement::Function(func)) => func.body,
            _ => panic!("expected a function declaration"),
        }
    }

    #[test]
    fn test_reachable_end_gets_return() {
        let mut b = body("function f(a) { if (a) { return 1; } }");
        assert!(append_return(&mut b));
        assert!(matches!(b.statements.last(), Some(Statement::Return(r)) if r.argument.is_none()));
        // Now it ends in a return.
        assert!(!append_return(&mut b));
    }

    #[test]
    fn test_unreachable_end_is_left_alone() {
        let mut b = body("function f(a) { if (a) { return 1; } else { throw a; } }");
        assert!(!append_return(&mut b));
        let mut empty = body("function f() {}");
        assert!(append_return(&mut empty));
        assert_eq!(empty.statements.len(), 1);
    }
}
