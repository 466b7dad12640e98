use super::Rule;
use crate::context::RuleContext;
use jsnorm_ast::node::*;

/// `var a = 1, b = 2;` becomes `var a = 1; var b = 2;`.
pub struct VarSplit;

impl Rule for VarSplit {
    fn name(&self) -> &'static str {
        "var-split"
    }

    fn rewrite_statement(
        &self,
        stmt: &mut Statement,
        _cx: &mut RuleContext<'_>,
    ) -> Option<Vec<Statement>> {
        let Statement::Variable(decl) = stmt else {
            return None;
        };
        if decl.declarations.len() < 2 {
            return None;
        }
        let kind = decl.kind;
        let data = decl.data;
        let split = std::mem::take(&mut decl.declarations)
            .into_iter()
            .map(|declarator| {
                Statement::Variable(VariableDeclaration {
                    data,
                    kind,
                    declarations: vec![declarator],
                })
            })
            .collect();
        Some(split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RuleContext;
    use jsnorm_ast::types::ScopeId;
    use crate::test_support::resolved;
    use jsnorm_diagnostics::DiagnosticCollection;

    #[test]
    fn test_split_keeps_order_and_kind() {
        let (mut program, mut tree) = resolved("let a = f(), b, c = g();");
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM);

        let out = VarSplit
            .rewrite_statement(&mut program.statements[0], &mut cx)
            .expect("applies");
        let names: Vec<&str> = out
            .iter()
            .map(|s| match s {
                Statement::Variable(d) => {
                    assert_eq!(d.kind, VariableKind::Let);
                    d.declarations[0].name.name.as_str()
                }
                _ => panic!("expected a declaration"),
            })
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_single_declarator_is_left_alone() {
        let (mut program, mut tree) = resolved("var a = 1;");
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM);
        assert!(VarSplit.rewrite_statement(&mut program.statements[0], &mut cx).is_none());
    }
}
