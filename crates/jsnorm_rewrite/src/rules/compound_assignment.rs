//! Compound assignments and updates as explicit read-compute-assign.

use super::Rule;
use crate::context::RuleContext;
use crate::query::is_primitive_literal;
use jsnorm_ast::factory;
use jsnorm_ast::node::*;
use jsnorm_ast::{BinaryOperator, UnaryOperator, UpdateOperator};

pub struct CompoundAssignment;

impl Rule for CompoundAssignment {
    fn name(&self) -> &'static str {
        "compound-assignment"
    }

    fn rewrite_expression(
        &self,
        expr: &mut Expression,
        value_used: bool,
        cx: &mut RuleContext<'_>,
    ) -> bool {
        if expr.data().is_preserved() {
            return false;
        }
        let rewritten = match expr {
            Expression::Assignment(n) => {
                let Some(operator) = n.operator.to_binary() else {
                    return false;
                };
                let mut prelude = Vec::new();
                let (target, read) = split_target(std::mem::take(&mut *n.target), &mut prelude, cx);
                let value = std::mem::take(&mut *n.value);
                prelude.push(factory::assign(target, factory::binary(operator, read, value)));
                factory::sequence(prelude)
            }
            Expression::Update(n) => {
                let mut prelude = Vec::new();
                let (target, read) = split_target(std::mem::take(&mut *n.operand), &mut prelude, cx);
                let old = cx.temporary();
                prelude.push(factory::assign(factory::temp_reference(old.clone()), to_numeric(read)));
                prelude.push(factory::assign(target, step(n.operator, &old)));
                if !n.prefix && value_used {
                    prelude.push(factory::temp_reference(old));
                }
                factory::sequence(prelude)
            }
            _ => return false,
        };
        *expr = rewritten;
        true
    }
}

/// `- -x`: the operand converted once by ToNumeric. Unlike `+x` this keeps
/// a BigInt a BigInt.
fn to_numeric(read: Expression) -> Expression {
    factory::unary(UnaryOperator::Minus, factory::unary(UnaryOperator::Minus, read))
}

/// `$old - ~($old ^ $old)` for `++`, `$old + ~($old ^ $old)` for `--`.
///
/// `$old ^ $old` is a zero of the same numeric type as `$old` (`0` or `0n`),
/// so `~` of it is a typed `-1` and the step never mixes Number and BigInt.
fn step(operator: UpdateOperator, old: &str) -> Expression {
    let tmp = || factory::temp_reference(old.to_string());
    let minus_one = factory::unary(
        UnaryOperator::BitNot,
        factory::binary(BinaryOperator::BitXor, tmp(), tmp()),
    );
    let operator = match operator {
        UpdateOperator::Increment => BinaryOperator::Sub,
        UpdateOperator::Decrement => BinaryOperator::Add,
    };
    factory::binary(operator, tmp(), minus_one)
}

/// Split an assignment target into the expression written to and the
/// expression read from, evaluating its object and key once.
fn split_target(
    target: Expression,
    prelude: &mut Vec<Expression>,
    cx: &mut RuleContext<'_>,
) -> (Expression, Expression) {
    match target {
        Expression::Member(mut member) => {
            if !is_reusable_object(&member.object) {
                let object = std::mem::take(&mut *member.object);
                *member.object = spill(object, prelude, cx);
            }
            if let MemberProperty::Computed(key) = &mut member.property {
                if !is_reusable_key(key) {
                    let value = std::mem::take(&mut **key);
                    **key = spill(value, prelude, cx);
                }
            }
            let read = Expression::Member(member.clone());
            (Expression::Member(member), read)
        }
        other => {
            let read = other.clone();
            (other, read)
        }
    }
}

fn spill(value: Expression, prelude: &mut Vec<Expression>, cx: &mut RuleContext<'_>) -> Expression {
    let temp = cx.temporary();
    prelude.push(factory::assign(factory::temp_reference(temp.clone()), value));
    factory::temp_reference(temp)
}

/// Objects that read the same value again: names, `this`, literals and
/// temporaries.
fn is_reusable_object(object: &Expression) -> bool {
    matches!(object, Expression::Identifier(_) | Expression::This(_)) || is_primitive_literal(object)
}

fn is_reusable_key(key: &Expression) -> bool {
    key.is_literal() || matches!(key, Expression::Identifier(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{expression, resolved};
    use jsnorm_ast::types::ScopeId;
    use jsnorm_diagnostics::DiagnosticCollection;
    use pretty_assertions::assert_eq;

    /// Rewrite the expression of the first statement of `source`.
    fn rewrite(source: &str, value_used: bool) -> Option<Expression> {
        let (mut program, mut tree) = resolved(source);
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM);
        let Statement::Expression(stmt) = &mut program.statements[0] else {
            panic!("expected an expression statement");
        };
        CompoundAssignment
            .rewrite_expression(&mut stmt.expression, value_used, &mut cx)
            .then(|| std::mem::take(&mut stmt.expression))
    }

    #[test]
    fn test_identifier_target() {
        assert_eq!(rewrite("x += f();", false), Some(expression("x = x + f();")));
        assert_eq!(rewrite("x **= 2;", false), Some(expression("x = x ** 2;")));
    }

    #[test]
    fn test_simple_member_target_is_not_spilled() {
        assert_eq!(rewrite("o.p -= 1;", false), Some(expression("o.p = o.p - 1;")));
        assert_eq!(rewrite("this[k] |= 1;", false), Some(expression("this[k] = this[k] | 1;")));
    }

    #[test]
    fn test_complex_object_is_evaluated_once() {
        assert_eq!(
            rewrite("f().p += 1;", false),
            Some(expression("$tmp0 = f(), $tmp0.p = $tmp0.p + 1;"))
        );
        assert_eq!(
            rewrite("a.b[g()] *= 3;", false),
            Some(expression("$tmp0 = a.b, $tmp1 = g(), $tmp0[$tmp1] = $tmp0[$tmp1] * 3;"))
        );
    }

    #[test]
    fn test_prefix_update() {
        assert_eq!(
            rewrite("++x;", true),
            Some(expression("$tmp0 = - -x, x = $tmp0 - ~($tmp0 ^ $tmp0);"))
        );
        assert_eq!(
            rewrite("--o.n;", true),
            Some(expression("$tmp0 = - -o.n, o.n = $tmp0 + ~($tmp0 ^ $tmp0);"))
        );
    }

    #[test]
    fn test_postfix_update_keeps_old_value() {
        assert_eq!(
            rewrite("x++;", true),
            Some(expression("$tmp0 = - -x, x = $tmp0 - ~($tmp0 ^ $tmp0), $tmp0;"))
        );
        // Unused results take the prefix form.
        assert_eq!(
            rewrite("x--;", false),
            Some(expression("$tmp0 = - -x, x = $tmp0 + ~($tmp0 ^ $tmp0);"))
        );
    }

    #[test]
    fn test_update_never_converts_with_unary_plus() {
        // `+b` throws on a BigInt; the rewrite must not introduce it.
        let Some(Expression::Sequence(seq)) = rewrite("b++;", false) else {
            panic!("expected a sequence");
        };
        let Expression::Assignment(old) = &seq.expressions[0] else {
            panic!("expected the old value first");
        };
        assert!(matches!(&*old.value, Expression::Unary(u) if u.operator == UnaryOperator::Minus));
        let printed = jsnorm_printer::print_program(&Program {
            data: NodeData::default(),
            statements: vec![factory::expression_statement(Expression::Sequence(seq))],
        });
        assert!(!printed.contains("+b"), "{printed}");
    }

    #[test]
    fn test_plain_assignment_is_left_alone() {
        assert_eq!(rewrite("x = 1;", false), None);
    }
}
