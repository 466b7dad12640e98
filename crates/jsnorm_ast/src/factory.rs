//! Constructors for synthesized nodes.
//!
//! Everything built here carries an empty span. Temporaries are the only
//! identifiers flagged `SYNTHESIZED`; other names (globals such as `Object`,
//! copies of user names) are plain references.

use crate::node::*;
use crate::operators::*;
use crate::types::NodeFlags;
use jsnorm_core::text::TextSpan;

#[inline]
fn data() -> NodeData {
    NodeData::new(TextSpan::default())
}

// ============================================================================
// Names and literals
// ============================================================================

pub fn identifier(name: impl Into<String>) -> Identifier {
    Identifier {
        data: data(),
        name: name.into(),
        binding: None,
    }
}

/// An identifier naming a temporary.
pub fn temporary(name: impl Into<String>) -> Identifier {
    Identifier {
        data: NodeData::synthesized(TextSpan::default()),
        name: name.into(),
        binding: None,
    }
}

pub fn reference(name: impl Into<String>) -> Expression {
    Expression::Identifier(identifier(name))
}

pub fn temp_reference(name: impl Into<String>) -> Expression {
    Expression::Identifier(temporary(name))
}

/// A reference to a builtin global (`Object`, `TypeError`, `Symbol`).
pub fn intrinsic(name: &str) -> Expression {
    let mut ident = identifier(name);
    ident.data.flags |= NodeFlags::INTRINSIC;
    Expression::Identifier(ident)
}

pub fn this() -> Expression {
    Expression::This(data())
}

pub fn null() -> Expression {
    Expression::Null(data())
}

pub fn boolean(value: bool) -> Expression {
    Expression::Boolean(BooleanLiteral {
        data: data(),
        value,
    })
}

pub fn number(value: u32) -> Expression {
    Expression::Number(NumericLiteral {
        data: data(),
        value: f64::from(value),
        raw: value.to_string(),
    })
}

pub fn string(value: impl Into<String>) -> Expression {
    Expression::String(string_literal(value))
}

pub fn string_literal(value: impl Into<String>) -> StringLiteral {
    let value = value.into();
    let raw = quote_string(&value);
    StringLiteral {
        data: data(),
        value,
        raw,
    }
}

/// Render a cooked string value as a double-quoted literal.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn empty_array() -> Expression {
    Expression::Array(ArrayLiteral {
        data: data(),
        elements: Vec::new(),
    })
}

// ============================================================================
// Expressions
// ============================================================================

pub fn member(object: Expression, name: impl Into<String>) -> Expression {
    Expression::Member(MemberExpression {
        data: data(),
        object: Box::new(object),
        property: MemberProperty::Named(identifier(name)),
    })
}

pub fn computed_member(object: Expression, key: Expression) -> Expression {
    Expression::Member(MemberExpression {
        data: data(),
        object: Box::new(object),
        property: MemberProperty::Computed(Box::new(key)),
    })
}

pub fn call(callee: Expression, arguments: Vec<Expression>) -> Expression {
    Expression::Call(CallExpression {
        data: data(),
        callee: Box::new(callee),
        arguments,
    })
}

pub fn new_expression(callee: Expression, arguments: Vec<Expression>) -> Expression {
    Expression::New(NewExpression {
        data: data(),
        callee: Box::new(callee),
        arguments,
    })
}

pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::Binary(BinaryExpression {
        data: data(),
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn unary(operator: UnaryOperator, operand: Expression) -> Expression {
    Expression::Unary(UnaryExpression {
        data: data(),
        operator,
        operand: Box::new(operand),
    })
}

pub fn not(operand: Expression) -> Expression {
    unary(UnaryOperator::Not, operand)
}

pub fn assign(target: Expression, value: Expression) -> Expression {
    Expression::Assignment(AssignmentExpression {
        data: data(),
        operator: AssignmentOperator::Assign,
        target: Box::new(target),
        value: Box::new(value),
    })
}

pub fn conditional(test: Expression, consequent: Expression, alternate: Expression) -> Expression {
    Expression::Conditional(ConditionalExpression {
        data: data(),
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    })
}

/// A comma expression; a single element is returned as is.
pub fn sequence(mut expressions: Vec<Expression>) -> Expression {
    if expressions.len() == 1 {
        if let Some(only) = expressions.pop() {
            return only;
        }
    }
    Expression::Sequence(SequenceExpression {
        data: data(),
        expressions,
    })
}

// ============================================================================
// Statements
// ============================================================================

pub fn expression_statement(expression: Expression) -> Statement {
    Statement::Expression(ExpressionStatement {
        data: data(),
        expression,
    })
}

pub fn declarator(name: Identifier, init: Option<Expression>) -> VariableDeclarator {
    VariableDeclarator {
        data: data(),
        name,
        init,
    }
}

pub fn declaration(kind: VariableKind, name: Identifier, init: Option<Expression>) -> Statement {
    Statement::Variable(VariableDeclaration {
        data: data(),
        kind,
        declarations: vec![declarator(name, init)],
    })
}

pub fn var_declaration(name: impl Into<String>, init: Option<Expression>) -> Statement {
    declaration(VariableKind::Var, identifier(name), init)
}

/// `var $tmpN;`
pub fn temp_declaration(name: impl Into<String>) -> Statement {
    let mut stmt = declaration(VariableKind::Var, temporary(name), None);
    stmt.data_mut().flags |= NodeFlags::SYNTHESIZED;
    stmt
}

pub fn block_statement(statements: Vec<Statement>) -> BlockStatement {
    BlockStatement {
        data: data(),
        statements,
    }
}

pub fn block(statements: Vec<Statement>) -> Statement {
    Statement::Block(block_statement(statements))
}

pub fn if_statement(
    test: Expression,
    consequent: Vec<Statement>,
    alternate: Option<Vec<Statement>>,
) -> Statement {
    Statement::If(IfStatement {
        data: data(),
        test,
        consequent: Box::new(block(consequent)),
        alternate: alternate.map(|stmts| Box::new(block(stmts))),
    })
}

pub fn while_statement(test: Expression, body: Vec<Statement>) -> Statement {
    Statement::While(WhileStatement {
        data: data(),
        test,
        body: Box::new(block(body)),
    })
}

pub fn labeled(label: impl Into<String>, body: Statement) -> Statement {
    Statement::Labeled(LabeledStatement {
        data: data(),
        label: identifier(label),
        body: Box::new(body),
    })
}

pub fn break_to(label: impl Into<String>) -> Statement {
    Statement::Break(JumpStatement {
        data: data(),
        label: Some(identifier(label)),
    })
}

pub fn return_statement(argument: Option<Expression>) -> Statement {
    Statement::Return(ReturnStatement {
        data: data(),
        argument,
    })
}

pub fn throw_statement(argument: Expression) -> Statement {
    Statement::Throw(ThrowStatement {
        data: data(),
        argument,
    })
}

fn catch_clause(param: impl Into<String>, handler: Vec<Statement>) -> CatchClause {
    CatchClause {
        data: data(),
        param: temporary(param),
        body: block_statement(handler),
    }
}

/// `try { block } catch (param) { handler }`; the parameter is a temporary.
pub fn try_catch(block: Vec<Statement>, param: impl Into<String>, handler: Vec<Statement>) -> Statement {
    Statement::Try(TryStatement {
        data: data(),
        block: block_statement(block),
        handler: Some(catch_clause(param, handler)),
        finalizer: None,
    })
}

pub fn try_catch_finally(
    block: Vec<Statement>,
    param: impl Into<String>,
    handler: Vec<Statement>,
    finalizer: Vec<Statement>,
) -> Statement {
    Statement::Try(TryStatement {
        data: data(),
        block: block_statement(block),
        handler: Some(catch_clause(param, handler)),
        finalizer: Some(block_statement(finalizer)),
    })
}

pub fn for_in(left: ForHead, right: Expression, body: Vec<Statement>) -> Statement {
    Statement::ForIn(ForInStatement {
        data: data(),
        left,
        right,
        body: Box::new(block(body)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_string_escapes() {
        assert_eq!(quote_string("x"), "\"x\"");
        assert_eq!(quote_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(quote_string("line\nnext\u{1}"), "\"line\\nnext\\x01\"");
    }

    #[test]
    fn test_temporaries_are_synthesized() {
        assert!(temp_reference("$tmp0").is_temporary());
        assert!(!reference("Object").is_temporary());
        assert!(temp_declaration("$tmp0").data().is_synthesized());
    }

    #[test]
    fn test_intrinsic_is_not_a_temporary() {
        let object = intrinsic("Object");
        assert!(!object.is_temporary());
        assert!(object.data().flags.contains(NodeFlags::INTRINSIC));
    }

    #[test]
    fn test_sequence_of_one_is_unwrapped() {
        let e = sequence(vec![reference("a")]);
        assert!(e.is_identifier_named("a"));
        assert!(matches!(
            sequence(vec![reference("a"), reference("b")]),
            Expression::Sequence(_)
        ));
    }
}
