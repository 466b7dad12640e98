//! Read-only questions the rules ask about subtrees.

use jsnorm_ast::node::*;
use jsnorm_ast::types::BindingId;
use jsnorm_ast::visitor::{walk_expression, walk_statement, AstVisitor};
use jsnorm_ast::UnaryOperator;

/// `null`, booleans, numbers and strings. Regex literals allocate, so they
/// are not included.
pub(crate) fn is_primitive_literal(expr: &Expression) -> bool {
    matches!(
        expr,
        Expression::Null(_) | Expression::Boolean(_) | Expression::Number(_) | Expression::String(_)
    )
}

/// An operand whose later evaluation yields the same value with no side
/// effects.
pub(crate) fn is_stable_operand(expr: &Expression) -> bool {
    is_primitive_literal(expr) || matches!(expr, Expression::This(_)) || expr.is_temporary()
}

/// Whether `expr` holds a `&&`, `||` or `?:` the short-circuit rule can
/// extract. Nested functions, compound assignments, updates and preserved
/// subtrees are not looked into.
pub(crate) fn has_short_circuit(expr: &Expression) -> bool {
    if expr.data().is_preserved() {
        return false;
    }
    match expr {
        Expression::Logical(_) | Expression::Conditional(_) => true,
        Expression::Identifier(_)
        | Expression::This(_)
        | Expression::Null(_)
        | Expression::Boolean(_)
        | Expression::Number(_)
        | Expression::String(_)
        | Expression::RegExp(_)
        | Expression::Function(_)
        | Expression::Arrow(_)
        | Expression::Update(_) => false,
        Expression::Array(n) => n.elements.iter().flatten().any(has_short_circuit),
        Expression::Object(n) => n.properties.iter().any(|p| match &p.value {
            PropertyValue::Init(e) => has_short_circuit(e),
            PropertyValue::Get(_) | PropertyValue::Set(_) => false,
        }),
        Expression::Unary(n) => has_short_circuit(&n.operand),
        Expression::Binary(n) => has_short_circuit(&n.left) || has_short_circuit(&n.right),
        Expression::Assignment(n) => {
            !n.operator.is_compound() && (has_short_circuit(&n.target) || has_short_circuit(&n.value))
        }
        Expression::Call(n) => {
            has_short_circuit(&n.callee) || n.arguments.iter().any(has_short_circuit)
        }
        Expression::New(n) => has_short_circuit(&n.callee) || n.arguments.iter().any(has_short_circuit),
        Expression::Member(n) => {
            has_short_circuit(&n.object)
                || matches!(&n.property, MemberProperty::Computed(key) if has_short_circuit(key))
        }
        Expression::Sequence(n) => n.expressions.iter().any(has_short_circuit),
    }
}

/// `delete (a && b)` deletes nothing; the operand is evaluated for effect.
pub(crate) fn is_delete_of_short_circuit(expr: &Expression) -> bool {
    matches!(expr, Expression::Unary(n) if n.operator == UnaryOperator::Delete && n.operand.is_short_circuit())
}

// ============================================================================
// Subtree searches
// ============================================================================

#[derive(Default)]
struct FunctionFinder {
    found: bool,
}

impl AstVisitor for FunctionFinder {
    fn visit_function(&mut self, _func: &Function) {
        self.found = true;
    }

    fn visit_arrow_function(&mut self, _arrow: &ArrowFunction) {
        self.found = true;
    }
}

/// Whether a function, arrow or accessor appears anywhere in `stmt`.
pub(crate) fn contains_function(stmt: &Statement) -> bool {
    let mut finder = FunctionFinder::default();
    finder.visit_statement(stmt);
    finder.found
}

/// Finds references to a set of bindings from inside nested functions.
struct CaptureFinder<'b> {
    bindings: &'b [BindingId],
    function_depth: u32,
    captured: Option<String>,
}

impl AstVisitor for CaptureFinder<'_> {
    fn visit_function(&mut self, func: &Function) {
        self.function_depth += 1;
        jsnorm_ast::visitor::walk_function(self, func);
        self.function_depth -= 1;
    }

    fn visit_arrow_function(&mut self, arrow: &ArrowFunction) {
        self.function_depth += 1;
        jsnorm_ast::visitor::walk_arrow_function(self, arrow);
        self.function_depth -= 1;
    }

    fn visit_reference(&mut self, ident: &Identifier) {
        if self.function_depth > 0 && self.captured.is_none() {
            if let Some(id) = ident.binding {
                if self.bindings.contains(&id) {
                    self.captured = Some(ident.name.clone());
                }
            }
        }
    }
}

/// The first of `bindings` referenced from a closure in the test, update
/// or body of a `for`.
pub(crate) fn captured_by_for_loop(n: &ForStatement, bindings: &[BindingId]) -> Option<String> {
    let mut finder = CaptureFinder {
        bindings,
        function_depth: 0,
        captured: None,
    };
    for expr in n.test.iter().chain(n.update.iter()) {
        finder.visit_expression(expr);
    }
    finder.visit_statement(&n.body);
    finder.captured
}

#[derive(Default)]
struct NodeCounter {
    count: usize,
}

impl AstVisitor for NodeCounter {
    fn visit_statement(&mut self, stmt: &Statement) {
        self.count += 1;
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        self.count += 1;
        walk_expression(self, expr);
    }
}

/// Statements plus expressions; the measure the termination bound uses.
pub(crate) fn count_nodes(program: &Program) -> usize {
    let mut counter = NodeCounter::default();
    counter.visit_program(program);
    counter.count
}

/// Leading string-literal statements, which may be directives such as
/// `"use strict"` and must stay first.
pub(crate) fn prologue_len(statements: &[Statement]) -> usize {
    statements
        .iter()
        .take_while(|stmt| {
            matches!(stmt, Statement::Expression(n) if matches!(n.expression, Expression::String(_)))
        })
        .count()
}
