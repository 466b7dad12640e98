//! Direct `eval` can add bindings the resolver never sees, so code that
//! calls it is kept as written.

use jsnorm_ast::node::*;
use jsnorm_ast::types::NodeFlags;
use jsnorm_ast::visitor::{
    walk_expression, walk_mut_arrow_function, walk_mut_expression,
    walk_mut_function, walk_mut_program, walk_statement,
};
use jsnorm_ast::{AstVisitor, AstVisitorMut};
use jsnorm_core::text::TextSpan;
use jsnorm_diagnostics::{messages, Diagnostic, DiagnosticCollection};
use tracing::debug;

/// Mark every function (or the program) that makes a direct call to `eval`
/// as `PRESERVED`, with a warning. Returns how many were marked.
///
/// A call whose argument is a string literal that parses, declares nothing
/// and uses neither `eval` nor `with` is harmless and does not count.
#[tracing::instrument(level = "debug", skip_all)]
pub fn mark_direct_eval(program: &mut Program, diagnostics: &mut DiagnosticCollection) -> usize {
    let mut guard = EvalGuard {
        diagnostics,
        enclosing: Vec::new(),
        marked: 0,
    };
    guard.visit_program(program);
    guard.marked
}

struct EvalGuard<'d> {
    diagnostics: &'d mut DiagnosticCollection,
    /// The first unsafe `eval` seen in each enclosing function, innermost
    /// last.
    enclosing: Vec<Option<TextSpan>>,
    marked: usize,
}

impl EvalGuard<'_> {
    fn leave(&mut self, data: &mut NodeData, construct: &str) {
        if let Some(Some(span)) = self.enclosing.pop() {
            debug!(construct, "direct eval; leaving unnormalized");
            data.flags |= NodeFlags::PRESERVED;
            self.diagnostics.add(Diagnostic::with_span(
                span,
                &messages::DIRECT_EVAL_LEFT_UNNORMALIZED,
                &[construct],
            ));
            self.marked += 1;
        }
    }
}

impl AstVisitorMut for EvalGuard<'_> {
    fn visit_program(&mut self, program: &mut Program) {
        self.enclosing.push(None);
        walk_mut_program(self, program);
        self.leave(&mut program.data, "program");
    }

    fn visit_function(&mut self, func: &mut Function) {
        self.enclosing.push(None);
        walk_mut_function(self, func);
        self.leave(&mut func.data, "function");
    }

    fn visit_arrow_function(&mut self, arrow: &mut ArrowFunction) {
        self.enclosing.push(None);
        walk_mut_arrow_function(self, arrow);
        self.leave(&mut arrow.data, "arrow function");
    }

    fn visit_expression(&mut self, expr: &mut Expression) {
        if let Expression::Call(call) = expr {
            if call.callee.is_identifier_named("eval") && !is_harmless_eval(&call.arguments) {
                if let Some(slot) = self.enclosing.last_mut() {
                    slot.get_or_insert(call.data.span);
                }
            }
        }
        walk_mut_expression(self, expr);
    }
}

fn is_harmless_eval(arguments: &[Expression]) -> bool {
    match arguments.first() {
        None => true,
        Some(Expression::String(source)) => match jsnorm_parser::parse(&source.value) {
            Ok(program) => {
                let mut scan = EvalSourceScan::default();
                scan.visit_program(&program);
                !scan.unsafe_construct
            }
            Err(_) => false,
        },
        Some(_) => false,
    }
}

/// Looks for declarations, `with` and nested `eval` in eval'd source.
#[derive(Default)]
struct EvalSourceScan {
    unsafe_construct: bool,
}

impl AstVisitor for EvalSourceScan {
    fn visit_statement(&mut self, stmt: &Statement) {
        if matches!(
            stmt,
            Statement::Variable(_) | Statement::Function(_) | Statement::With(_)
        ) {
            self.unsafe_construct = true;
            return;
        }
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        if expr.is_identifier_named("eval") {
            self.unsafe_construct = true;
        }
        walk_expression(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsnorm_parser::parse;

    fn guard(source: &str) -> (Program, DiagnosticCollection, usize) {
        let mut program = parse(source).expect("parses");
        let mut diagnostics = DiagnosticCollection::new();
        let marked = mark_direct_eval(&mut program, &mut diagnostics);
        (program, diagnostics, marked)
    }

    #[test]
    fn test_eval_marks_innermost_function() {
        let (program, diagnostics, marked) = guard("function f(s) { eval(s); } g();");
        assert_eq!(marked, 1);
        assert!(!program.data.is_preserved());
        let Statement::Function(f) = &program.statements[0] else {
            panic!("expected a function");
        };
        assert!(f.data.is_preserved());
        assert_eq!(diagnostics.diagnostics()[0].code, 9001);
        assert!(diagnostics.diagnostics()[0].message_text.contains("function"));
    }

    #[test]
    fn test_eval_at_top_level_marks_program() {
        let (program, _, marked) = guard("eval(code);");
        assert_eq!(marked, 1);
        assert!(program.data.is_preserved());
    }

    #[test]
    fn test_harmless_literal_eval() {
        assert_eq!(guard("eval('1 + 2');").2, 0);
        assert_eq!(guard("eval();").2, 0);
        assert_eq!(guard("eval('var x = 1');").2, 1);
        assert_eq!(guard("eval('eval(y)');").2, 1);
        assert_eq!(guard("eval('with (o) {}');").2, 1);
        assert_eq!(guard("eval('if (');").2, 1);
    }

    #[test]
    fn test_indirect_eval_is_ignored() {
        assert_eq!(guard("(0, eval)(code); o.eval(code);").2, 0);
    }
}
