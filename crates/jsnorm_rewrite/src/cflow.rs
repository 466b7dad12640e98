//! Conservative completion analysis for function bodies.

use jsnorm_ast::node::*;

/// Whether control may fall off the end of `statements`.
///
/// `return`, `throw`, `break` and `continue` never complete normally; a
/// list completes normally only if every statement does.
pub fn completes_normally(statements: &[Statement]) -> bool {
    statements.iter().all(statement_completes_normally)
}

fn statement_completes_normally(stmt: &Statement) -> bool {
    match stmt {
        Statement::Return(_) | Statement::Throw(_) | Statement::Break(_) | Statement::Continue(_) => {
            false
        }
        Statement::If(n) => {
            statement_completes_normally(&n.consequent)
                || n.alternate
                    .as_deref()
                    .map_or(true, statement_completes_normally)
        }
        Statement::Block(block) => completes_normally(&block.statements),
        Statement::Try(n) => {
            let body = completes_normally(&n.block.statements)
                || n.handler
                    .as_ref()
                    .is_some_and(|h| completes_normally(&h.body.statements));
            body && n
                .finalizer
                .as_ref()
                .map_or(true, |f| completes_normally(&f.statements))
        }
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsnorm_parser::parse;

    fn body_completes(source: &str) -> bool {
        let program = parse(source).expect("parses");
        completes_normally(&program.statements)
    }

    #[test]
    fn test_jumps_do_not_complete() {
        assert!(!body_completes("f(); throw e;"));
        assert!(body_completes("f();"));
        assert!(body_completes(""));
    }

    #[test]
    fn test_if_completes_when_either_branch_does() {
        assert!(body_completes("if (a) throw x;"));
        assert!(!body_completes("if (a) { throw x; } else { throw y; }"));
        assert!(body_completes("if (a) { throw x; } else { f(); }"));
    }

    #[test]
    fn test_try() {
        assert!(!body_completes("try { throw x; } catch (e) { throw e; }"));
        assert!(body_completes("try { throw x; } catch (e) { f(); }"));
        assert!(!body_completes("try { f(); } finally { throw y; }"));
        assert!(!body_completes("try { throw x; } finally { f(); }"));
    }

    #[test]
    fn test_loops_may_complete() {
        assert!(body_completes("while (true) { throw x; }"));
        assert!(body_completes("l: { break l; }"));
    }
}
