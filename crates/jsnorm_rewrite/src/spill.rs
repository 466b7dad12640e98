//! Evaluation-order extraction of short-circuit expressions.
//!
//! `extract` finds the first `&&`, `||` or `?:` in evaluation order and
//! replaces it with a temporary computed by statements collected in
//! `pre`. Every operand evaluated before it is moved into a temporary
//! first, so the statements run in the original order.

use crate::context::RuleContext;
use crate::query::{has_short_circuit, is_delete_of_short_circuit, is_stable_operand};
use jsnorm_ast::factory;
use jsnorm_ast::node::*;
use jsnorm_ast::LogicalOperator;
use tracing::trace;

pub(crate) struct Spill<'c, 'a> {
    cx: &'c mut RuleContext<'a>,
    /// Statements that must run before the rewritten expression.
    pub pre: Vec<Statement>,
}

impl<'c, 'a> Spill<'c, 'a> {
    pub fn new(cx: &'c mut RuleContext<'a>) -> Self {
        Self {
            cx,
            pre: Vec::new(),
        }
    }

    /// Extract the first short-circuit expression in `expr`. Returns false,
    /// leaving `expr` untouched, when there is none.
    pub fn extract(&mut self, expr: &mut Expression) -> bool {
        if !has_short_circuit(expr) {
            return false;
        }
        if expr.is_short_circuit() {
            let temp = self.materialize(std::mem::take(expr));
            *expr = factory::temp_reference(temp);
            return true;
        }
        if is_delete_of_short_circuit(expr) {
            if let Expression::Unary(n) = expr {
                self.materialize(std::mem::take(&mut *n.operand));
            }
            *expr = factory::boolean(true);
            return true;
        }
        match expr {
            Expression::Array(n) => self.extract_in_order(n.elements.iter_mut().flatten()),
            Expression::Object(n) => {
                self.extract_in_order(n.properties.iter_mut().filter_map(|p| match &mut p.value {
                    PropertyValue::Init(e) => Some(e),
                    PropertyValue::Get(_) | PropertyValue::Set(_) => None,
                }))
            }
            Expression::Unary(n) => self.extract(&mut n.operand),
            Expression::Binary(n) => self.extract_in_order([&mut *n.left, &mut *n.right]),
            Expression::Assignment(n) => {
                let AssignmentExpression { target, value, .. } = n;
                match &mut **target {
                    Expression::Member(m) => {
                        let mut operands = member_operands(m);
                        operands.push(&mut **value);
                        self.extract_in_order(operands)
                    }
                    _ => self.extract(value),
                }
            }
            Expression::Call(n) => {
                let CallExpression {
                    callee, arguments, ..
                } = n;
                // A method callee keeps its member form so `this` is unchanged.
                let mut operands = match &mut **callee {
                    Expression::Member(m) => member_operands(m),
                    callee => vec![callee],
                };
                operands.extend(arguments.iter_mut());
                self.extract_in_order(operands)
            }
            Expression::New(n) => {
                let NewExpression {
                    callee, arguments, ..
                } = n;
                let mut operands = vec![&mut **callee];
                operands.extend(arguments.iter_mut());
                self.extract_in_order(operands)
            }
            Expression::Member(m) => self.extract_in_order(member_operands(m)),
            Expression::Sequence(n) => self.extract_from_sequence(&mut n.expressions),
            _ => false,
        }
    }

    fn extract_in_order<'e>(&mut self, operands: impl IntoIterator<Item = &'e mut Expression>) -> bool {
        let operands: Vec<&mut Expression> = operands.into_iter().collect();
        let Some(first) = operands.iter().position(|e| has_short_circuit(e)) else {
            return false;
        };
        for (i, operand) in operands.into_iter().enumerate() {
            if i < first {
                self.spill(operand);
            } else {
                return self.extract(operand);
            }
        }
        false
    }

    /// Elements before the short-circuit are only evaluated for effect, so
    /// they become statements of their own.
    fn extract_from_sequence(&mut self, expressions: &mut Vec<Expression>) -> bool {
        let Some(first) = expressions.iter().position(has_short_circuit) else {
            return false;
        };
        for expr in expressions.drain(..first) {
            self.pre.push(factory::expression_statement(expr));
        }
        match expressions.first_mut() {
            Some(expr) => self.extract(expr),
            None => false,
        }
    }

    /// Move an already-evaluated operand into a temporary.
    fn spill(&mut self, operand: &mut Expression) {
        if is_stable_operand(operand)
            || matches!(operand, Expression::Function(_) | Expression::Arrow(_))
        {
            return;
        }
        let temp = self.cx.temporary();
        trace!(temporary = %temp, "spilled operand");
        let value = std::mem::replace(operand, factory::temp_reference(temp.clone()));
        self.pre.push(assign_temporary(&temp, value));
    }

    /// Compute a short-circuit expression into a fresh temporary with
    /// statements, evaluating each branch only when it is taken.
    fn materialize(&mut self, expr: Expression) -> String {
        let temp = self.cx.temporary();
        trace!(temporary = %temp, "materialized short-circuit");
        self.pre.extend(short_circuit_into(&temp, expr));
        temp
    }
}

/// `$t = a; if ($t) { $t = b; }` and the `||`/`?:` counterparts.
pub(crate) fn short_circuit_into(temp: &str, expr: Expression) -> Vec<Statement> {
    match expr {
        Expression::Logical(n) => {
            let test = match n.operator {
                LogicalOperator::And => factory::temp_reference(temp),
                LogicalOperator::Or => factory::not(factory::temp_reference(temp)),
            };
            vec![
                assign_temporary(temp, *n.left),
                factory::if_statement(test, vec![assign_temporary(temp, *n.right)], None),
            ]
        }
        Expression::Conditional(n) => vec![factory::if_statement(
            *n.test,
            vec![assign_temporary(temp, *n.consequent)],
            Some(vec![assign_temporary(temp, *n.alternate)]),
        )],
        other => vec![assign_temporary(temp, other)],
    }
}

pub(crate) fn assign_temporary(temp: &str, value: Expression) -> Statement {
    factory::expression_statement(factory::assign(factory::temp_reference(temp), value))
}

fn member_operands(member: &mut MemberExpression) -> Vec<&mut Expression> {
    let MemberExpression {
        object, property, ..
    } = member;
    let mut operands = vec![&mut **object];
    if let MemberProperty::Computed(key) = property {
        operands.push(&mut **key);
    }
    operands
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsnorm_diagnostics::DiagnosticCollection;
    use jsnorm_parser::parse;
    use jsnorm_resolver::resolve;
    use jsnorm_ast::types::ScopeId;

    /// Extract from the first expression statement and describe the result
    /// as (statement kinds, remaining expression).
    fn extract(source: &str) -> (Vec<&'static str>, Expression) {
        let mut program = parse(source).expect("parses");
        let mut tree = resolve(&mut program);
        let mut diagnostics = DiagnosticCollection::new();
        let mut cx = RuleContext::new(&mut tree, &mut diagnostics, ScopeId::PROGRAM);
        let Some(Statement::Expression(stmt)) = program.statements.into_iter().next() else {
            panic!("expected an expression statement");
        };
        let mut expr = stmt.expression;
        let mut spill = Spill::new(&mut cx);
        assert!(spill.extract(&mut expr));
        let kinds = spill.pre.iter().map(|s| s.describe()).collect();
        (kinds, expr)
    }

    #[test]
    fn test_root_short_circuit() {
        let (kinds, expr) = extract("a && b;");
        assert_eq!(kinds, vec!["expression statement", "if statement"]);
        assert!(expr.is_identifier_named("$tmp0"));
    }

    #[test]
    fn test_earlier_operands_are_spilled() {
        let (kinds, expr) = extract("f(x, g(), a || b, h());");
        // x, g() and the short-circuit; the callee f is spilled too.
        assert_eq!(kinds.len(), 5);
        let Expression::Call(call) = expr else {
            panic!("expected a call");
        };
        assert!(call.callee.is_temporary());
        assert!(call.arguments[..3].iter().all(|a| a.is_temporary()));
        assert!(matches!(call.arguments[3], Expression::Call(_)));
    }

    #[test]
    fn test_method_callee_keeps_member_form() {
        let (_, expr) = extract("o.m(c ? 1 : 2);");
        let Expression::Call(call) = expr else {
            panic!("expected a call");
        };
        let Expression::Member(member) = &*call.callee else {
            panic!("expected a member callee");
        };
        assert!(member.object.is_temporary());
    }

    #[test]
    fn test_this_and_literals_are_not_spilled() {
        let (kinds, _) = extract("this.m(1, 'two', a && b);");
        assert_eq!(kinds.len(), 2);
    }

    #[test]
    fn test_sequence_prefix_becomes_statements() {
        let (kinds, expr) = extract("x = (f(), g(), a && b, h());");
        assert_eq!(kinds[..2], ["expression statement", "expression statement"]);
        let Expression::Assignment(assign) = expr else {
            panic!("expected an assignment");
        };
        let Expression::Sequence(seq) = &*assign.value else {
            panic!("expected a sequence");
        };
        assert_eq!(seq.expressions.len(), 2);
        assert!(seq.expressions[0].is_temporary());
    }

    #[test]
    fn test_delete_of_short_circuit_is_true() {
        let (_, expr) = extract("delete (a && b);");
        assert!(matches!(expr, Expression::Boolean(BooleanLiteral { value: true, .. })));
    }
}
