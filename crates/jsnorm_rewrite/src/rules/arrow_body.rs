use super::Rule;
use crate::context::RuleContext;
use jsnorm_ast::factory;
use jsnorm_ast::node::*;

/// `(x) => e` becomes `(x) => { return e; }`, giving the body a statement
/// context for later rewrites.
pub struct ArrowBodyRule;

impl Rule for ArrowBodyRule {
    fn name(&self) -> &'static str {
        "arrow-body"
    }

    fn rewrite_expression(
        &self,
        expr: &mut Expression,
        _value_used: bool,
        _cx: &mut RuleContext<'_>,
    ) -> bool {
        let Expression::Arrow(arrow) = expr else {
            return false;
        };
        if arrow.data.is_preserved() {
            return false;
        }
        let ArrowBody::Expression(body) = &mut arrow.body else {
            return false;
        };
        let span = body.span();
        let value = std::mem::take(&mut **body);
        arrow.body = ArrowBody::Block(FunctionBody {
            data: NodeData::new(span),
            statements: vec![factory::return_statement(Some(value))],
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsnorm_ast::types::ScopeId;
    use crate::test_support::resolved;
    use jsnorm_diagnostics::DiagnosticCollection;

    #[test]
    fn test_concise_body_gets_a_return() {
        let (mut program, mut tree) = resolved("f = x => x * 2;");
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM);

        let Statement::Expression(stmt) = &mut program.statements[0] else {
            panic!("expected an expression statement");
        };
        let Expression::Assignment(assign) = &mut stmt.expression else {
            panic!("expected an assignment");
        };
        assert!(ArrowBodyRule.rewrite_expression(&mut assign.value, true, &mut cx));
        let Expression::Arrow(arrow) = &*assign.value else {
            panic!("expected an arrow");
        };
        let ArrowBody::Block(body) = &arrow.body else {
            panic!("expected a block body");
        };
        assert!(matches!(body.statements[..], [Statement::Return(_)]));

        // Already a block: nothing to do.
        assert!(!ArrowBodyRule.rewrite_expression(&mut assign.value, true, &mut cx));
    }
}
