//! `&&`, `||` and `?:` as `if` statements over temporaries.

use super::{peel_labels_mut, take_labels, wrap_labels, Rule};
use crate::context::RuleContext;
use crate::query::has_short_circuit;
use crate::spill::{short_circuit_into, Spill};
use jsnorm_ast::factory;
use jsnorm_ast::node::*;
use jsnorm_ast::types::NodeFlags;
use jsnorm_ast::{AssignmentOperator, LogicalOperator};
use jsnorm_diagnostics::messages;

pub struct ShortCircuit;

impl Rule for ShortCircuit {
    fn name(&self) -> &'static str {
        "short-circuit"
    }

    fn rewrite_statement(
        &self,
        stmt: &mut Statement,
        cx: &mut RuleContext<'_>,
    ) -> Option<Vec<Statement>> {
        if stmt.data().is_preserved() {
            return None;
        }
        match stmt {
            Statement::Labeled(_) => {
                if matches!(peel_labels_mut(stmt), Statement::While(_)) {
                    return rewrite_while(stmt, cx);
                }
                let mut replacement = self.rewrite_statement(peel_labels_mut(stmt), cx)?;
                // Labels stay on the statement the jumps refer to.
                let (labels, _) = take_labels(std::mem::take(stmt));
                let last = replacement.pop()?;
                replacement.push(wrap_labels(labels, last));
                Some(replacement)
            }
            Statement::Expression(_) => rewrite_expression_statement(stmt, cx),
            Statement::Variable(_) => extract_before(stmt, cx, |s| match s {
                Statement::Variable(d) if d.declarations.len() == 1 => d.declarations[0].init.as_mut(),
                _ => None,
            }),
            Statement::Return(_) => extract_before(stmt, cx, |s| match s {
                Statement::Return(n) => n.argument.as_mut(),
                _ => None,
            }),
            Statement::Throw(_) => extract_before(stmt, cx, |s| match s {
                Statement::Throw(n) => Some(&mut n.argument),
                _ => None,
            }),
            Statement::If(_) => extract_before(stmt, cx, |s| match s {
                Statement::If(n) => Some(&mut n.test),
                _ => None,
            }),
            Statement::Switch(n) => {
                // Case tests run lazily, one after another; hoisting them
                // would change which run.
                for case in &mut n.cases {
                    let lazy = case.test.as_ref().is_some_and(has_short_circuit);
                    if lazy && !case.data.is_preserved() {
                        case.data.flags |= NodeFlags::PRESERVED;
                        cx.warn(case.data.span, &messages::CASE_TEST_LEFT_UNNORMALIZED, &[]);
                    }
                }
                extract_before(stmt, cx, |s| match s {
                    Statement::Switch(n) => Some(&mut n.discriminant),
                    _ => None,
                })
            }
            Statement::While(_) => rewrite_while(stmt, cx),
            _ => None,
        }
    }
}

/// Spill the expression `select` picks out of `stmt` and emit the collected
/// statements before it. `stmt` is left untouched when there is nothing to
/// extract.
fn extract_before(
    stmt: &mut Statement,
    cx: &mut RuleContext<'_>,
    select: impl FnOnce(&mut Statement) -> Option<&mut Expression>,
) -> Option<Vec<Statement>> {
    let mut spill = Spill::new(cx);
    if !select(stmt).is_some_and(|expr| spill.extract(expr)) {
        return None;
    }
    let mut out = spill.pre;
    out.push(std::mem::take(stmt));
    Some(out)
}

fn rewrite_expression_statement(
    stmt: &mut Statement,
    cx: &mut RuleContext<'_>,
) -> Option<Vec<Statement>> {
    let Statement::Expression(n) = stmt else {
        return None;
    };
    if !has_short_circuit(&n.expression) {
        return None;
    }
    match &mut n.expression {
        Expression::Logical(logical) => {
            let left = std::mem::take(&mut *logical.left);
            let right = std::mem::take(&mut *logical.right);
            let test = match logical.operator {
                LogicalOperator::And => left,
                LogicalOperator::Or => factory::not(left),
            };
            Some(vec![factory::if_statement(
                test,
                vec![factory::expression_statement(right)],
                None,
            )])
        }
        Expression::Conditional(cond) => Some(vec![factory::if_statement(
            std::mem::take(&mut *cond.test),
            vec![factory::expression_statement(std::mem::take(&mut *cond.consequent))],
            Some(vec![factory::expression_statement(std::mem::take(&mut *cond.alternate))]),
        )]),
        // A comma expression evaluated for effect is a list of statements.
        Expression::Sequence(seq) => Some(
            std::mem::take(&mut seq.expressions)
                .into_iter()
                .map(factory::expression_statement)
                .collect(),
        ),
        Expression::Assignment(assign)
            if assign.operator == AssignmentOperator::Assign
                && assign.target.is_temporary()
                && assign.value.is_short_circuit() =>
        {
            let Expression::Identifier(temp) = &*assign.target else {
                return None;
            };
            let temp = temp.name.clone();
            Some(short_circuit_into(&temp, std::mem::take(&mut *assign.value)))
        }
        _ => extract_before(stmt, cx, |s| match s {
            Statement::Expression(n) => Some(&mut n.expression),
            _ => None,
        }),
    }
}

/// `while (test) body` with a short-circuit test becomes
/// `L: while (true) { ...; if (!$t) { break L; } body }`.
fn rewrite_while(stmt: &mut Statement, cx: &mut RuleContext<'_>) -> Option<Vec<Statement>> {
    let Statement::While(n) = peel_labels_mut(stmt) else {
        return None;
    };
    if !has_short_circuit(&n.test) {
        return None;
    }
    let mut test = std::mem::take(&mut n.test);
    let mut spill = Spill::new(cx);
    if !spill.extract(&mut test) {
        n.test = test;
        return None;
    }
    let pre = spill.pre;

    let (mut labels, core) = take_labels(std::mem::take(stmt));
    let Statement::While(n) = core else {
        return None;
    };
    let label = match labels.first() {
        Some(first) => first.name.clone(),
        None => {
            let minted = cx.label();
            labels.push(factory::identifier(minted.clone()));
            minted
        }
    };
    let mut body = pre;
    body.push(factory::if_statement(
        factory::not(test),
        vec![factory::break_to(label)],
        None,
    ));
    body.extend(super::into_statements(*n.body));
    Some(vec![wrap_labels(
        labels,
        factory::while_statement(factory::boolean(true), body),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{expression, resolved, statements};
    use jsnorm_ast::types::ScopeId;
    use jsnorm_diagnostics::DiagnosticCollection;
    use pretty_assertions::assert_eq;

    fn rewrite(source: &str) -> (Option<Vec<Statement>>, DiagnosticCollection) {
        let (mut program, mut tree) = resolved(source);
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM);
        let out = ShortCircuit.rewrite_statement(&mut program.statements[0], &mut cx);
        (out, diagnostics)
    }

    #[test]
    fn test_logical_statements_become_ifs() {
        assert_eq!(rewrite("a && b();").0, Some(statements("if (a) { b(); }")));
        assert_eq!(rewrite("a || b();").0, Some(statements("if (!a) { b(); }")));
        assert_eq!(
            rewrite("c ? x() : y();").0,
            Some(statements("if (c) { x(); } else { y(); }"))
        );
    }

    #[test]
    fn test_operand_extraction() {
        assert_eq!(
            rewrite("f(g(), a && b);").0,
            Some(statements(
                "$tmp0 = f; $tmp1 = g(); $tmp2 = a; if ($tmp2) { $tmp2 = b; } $tmp0($tmp1, $tmp2);"
            ))
        );
        assert_eq!(
            rewrite("return_ = x || y;").0,
            Some(statements("$tmp0 = x; if (!$tmp0) { $tmp0 = y; } return_ = $tmp0;"))
        );
    }

    #[test]
    fn test_conditional_in_declaration() {
        assert_eq!(
            rewrite("var v = c ? 1 : 2;").0,
            Some(statements("if (c) { $tmp0 = 1; } else { $tmp0 = 2; } var v = $tmp0;"))
        );
    }

    #[test]
    fn test_temporary_target_is_reused() {
        let (_, mut tree) = resolved("a; b;");
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM);
        let mut stmt = factory::expression_statement(factory::assign(
            factory::temp_reference("$tmp9"),
            expression("a && b;"),
        ));
        let out = ShortCircuit.rewrite_statement(&mut stmt, &mut cx);
        assert_eq!(out, Some(statements("$tmp9 = a; if ($tmp9) { $tmp9 = b; }")));
    }

    #[test]
    fn test_while_test_moves_into_body() {
        assert_eq!(
            rewrite("while (a && b) { f(); }").0,
            Some(statements(
                "$label0: while (true) { $tmp0 = a; if ($tmp0) { $tmp0 = b; } if (!$tmp0) { break $label0; } f(); }"
            ))
        );
        assert_eq!(
            rewrite("outer: while (a || b) f();").0,
            Some(statements(
                "outer: while (true) { $tmp0 = a; if (!$tmp0) { $tmp0 = b; } if (!$tmp0) { break outer; } f(); }"
            ))
        );
    }

    #[test]
    fn test_case_test_is_preserved_with_warning() {
        let (mut program, mut tree) = resolved("switch (x) { case a && b: f(); }");
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM);
        assert!(ShortCircuit.rewrite_statement(&mut program.statements[0], &mut cx).is_none());
        assert_eq!(diagnostics.diagnostics()[0].code, 9006);
        let Statement::Switch(switch) = &program.statements[0] else {
            panic!("expected a switch");
        };
        assert!(switch.cases[0].data.is_preserved());
    }

    #[test]
    fn test_statement_without_short_circuit() {
        let (out, diagnostics) = rewrite("f(a + b);");
        assert!(out.is_none());
        assert!(diagnostics.is_empty());
    }
}
