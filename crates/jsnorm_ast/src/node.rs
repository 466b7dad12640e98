//! AST node definitions for the JavaScript normalizer.
//!
//! Nodes own their children (`Box`/`Vec`); there is no sharing and no
//! parent pointer. `PartialEq` is structural: spans, flags and resolver
//! annotations are ignored, so a re-parsed tree compares equal to the tree
//! it was printed from.

use crate::operators::*;
use crate::types::*;
use jsnorm_core::text::TextSpan;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all AST nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeData {
    /// Source span. Synthesized nodes carry the span of what they replace, or
    /// an empty span.
    pub span: TextSpan,
    pub flags: NodeFlags,
}

impl NodeData {
    pub fn new(span: TextSpan) -> Self {
        Self {
            span,
            flags: NodeFlags::NONE,
        }
    }

    pub fn synthesized(span: TextSpan) -> Self {
        Self {
            span,
            flags: NodeFlags::SYNTHESIZED,
        }
    }

    #[inline]
    pub fn is_preserved(&self) -> bool {
        self.flags.contains(NodeFlags::PRESERVED)
    }

    #[inline]
    pub fn is_synthesized(&self) -> bool {
        self.flags.contains(NodeFlags::SYNTHESIZED)
    }
}

impl PartialEq for NodeData {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

// ============================================================================
// Program
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub data: NodeData,
    pub statements: Vec<Statement>,
}

// ============================================================================
// Names
// ============================================================================

/// An identifier in reference, binding or label position.
#[derive(Debug, Clone)]
pub struct Identifier {
    pub data: NodeData,
    pub name: String,
    /// Set by the resolver on references and declarations.
    pub binding: Option<BindingId>,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: TextSpan) -> Self {
        Self {
            data: NodeData::new(span),
            name: name.into(),
            binding: None,
        }
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Variable(VariableDeclaration),
    Function(Box<Function>),
    Block(BlockStatement),
    Empty(NodeData),
    Expression(ExpressionStatement),
    If(IfStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    For(ForStatement),
    ForIn(ForInStatement),
    ForOf(ForOfStatement),
    Continue(JumpStatement),
    Break(JumpStatement),
    Return(ReturnStatement),
    With(WithStatement),
    Switch(SwitchStatement),
    Labeled(LabeledStatement),
    Throw(ThrowStatement),
    Try(TryStatement),
    Debugger(NodeData),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }

    #[inline]
    pub fn is_lexical(self) -> bool {
        self != VariableKind::Var
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub data: NodeData,
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub data: NodeData,
    pub name: Identifier,
    pub init: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub data: NodeData,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub data: NodeData,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub data: NodeData,
    pub test: Expression,
    pub consequent: Box<Statement>,
    pub alternate: Option<Box<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub data: NodeData,
    pub test: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStatement {
    pub data: NodeData,
    pub body: Box<Statement>,
    pub test: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Variable(VariableDeclaration),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub data: NodeData,
    pub init: Option<ForInit>,
    pub test: Option<Expression>,
    pub update: Option<Expression>,
    pub body: Box<Statement>,
}

/// Left side of a `for-in` or `for-of` head.
#[derive(Debug, Clone, PartialEq)]
pub enum ForHead {
    /// A declaration with exactly one declarator.
    Variable(VariableDeclaration),
    /// An identifier or member expression.
    Target(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForInStatement {
    pub data: NodeData,
    pub left: ForHead,
    pub right: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForOfStatement {
    pub data: NodeData,
    pub left: ForHead,
    pub right: Expression,
    pub body: Box<Statement>,
}

/// A `break` or `continue`.
#[derive(Debug, Clone, PartialEq)]
pub struct JumpStatement {
    pub data: NodeData,
    pub label: Option<Identifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub data: NodeData,
    pub argument: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WithStatement {
    pub data: NodeData,
    pub object: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub data: NodeData,
    pub discriminant: Expression,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub data: NodeData,
    /// `None` for the `default` clause.
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStatement {
    pub data: NodeData,
    pub label: Identifier,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    pub data: NodeData,
    pub argument: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub data: NodeData,
    pub block: BlockStatement,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub data: NodeData,
    pub param: Identifier,
    pub body: BlockStatement,
}

// ============================================================================
// Functions
// ============================================================================

/// A function declaration, function expression or accessor body.
#[derive(Debug, Clone)]
pub struct Function {
    pub data: NodeData,
    pub name: Option<Identifier>,
    pub params: Vec<Identifier>,
    pub body: FunctionBody,
    /// Set by the resolver.
    pub scope: Option<ScopeId>,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params && self.body == other.body
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    pub data: NodeData,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct ArrowFunction {
    pub data: NodeData,
    pub params: Vec<Identifier>,
    pub body: ArrowBody,
    /// Set by the resolver.
    pub scope: Option<ScopeId>,
}

impl PartialEq for ArrowFunction {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.body == other.body
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// Concise body: `x => x + 1`.
    Expression(Box<Expression>),
    Block(FunctionBody),
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    This(NodeData),
    Null(NodeData),
    Boolean(BooleanLiteral),
    Number(NumericLiteral),
    String(StringLiteral),
    RegExp(RegExpLiteral),
    Array(ArrayLiteral),
    Object(ObjectLiteral),
    Function(Box<Function>),
    Arrow(Box<ArrowFunction>),
    Unary(UnaryExpression),
    Update(UpdateExpression),
    Binary(BinaryExpression),
    Logical(LogicalExpression),
    Assignment(AssignmentExpression),
    Conditional(ConditionalExpression),
    Call(CallExpression),
    New(NewExpression),
    Member(MemberExpression),
    Sequence(SequenceExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub data: NodeData,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericLiteral {
    pub data: NodeData,
    pub value: f64,
    /// Source text, printed verbatim.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub data: NodeData,
    /// Cooked value with escapes resolved.
    pub value: String,
    /// Source text including quotes, printed verbatim.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegExpLiteral {
    pub data: NodeData,
    pub pattern: String,
    pub flags: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub data: NodeData,
    /// `None` marks an elision.
    pub elements: Vec<Option<Expression>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral {
    pub data: NodeData,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub data: NodeData,
    pub key: PropertyKey,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Identifier(Identifier),
    String(StringLiteral),
    Number(NumericLiteral),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Init(Expression),
    Get(Box<Function>),
    Set(Box<Function>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub data: NodeData,
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub data: NodeData,
    pub operator: UpdateOperator,
    pub prefix: bool,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub data: NodeData,
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpression {
    pub data: NodeData,
    pub operator: LogicalOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression {
    pub data: NodeData,
    pub operator: AssignmentOperator,
    /// An identifier or member expression.
    pub target: Box<Expression>,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpression {
    pub data: NodeData,
    pub test: Box<Expression>,
    pub consequent: Box<Expression>,
    pub alternate: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub data: NodeData,
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    pub data: NodeData,
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub data: NodeData,
    pub object: Box<Expression>,
    pub property: MemberProperty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `o.name`; the identifier never carries a binding.
    Named(Identifier),
    /// `o[expr]`
    Computed(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequenceExpression {
    pub data: NodeData,
    pub expressions: Vec<Expression>,
}

// ============================================================================
// Node data access
// ============================================================================

impl Statement {
    pub fn data(&self) -> &NodeData {
        match self {
            Statement::Variable(n) => &n.data,
            Statement::Function(n) => &n.data,
            Statement::Block(n) => &n.data,
            Statement::Empty(d) | Statement::Debugger(d) => d,
            Statement::Expression(n) => &n.data,
            Statement::If(n) => &n.data,
            Statement::While(n) => &n.data,
            Statement::DoWhile(n) => &n.data,
            Statement::For(n) => &n.data,
            Statement::ForIn(n) => &n.data,
            Statement::ForOf(n) => &n.data,
            Statement::Continue(n) | Statement::Break(n) => &n.data,
            Statement::Return(n) => &n.data,
            Statement::With(n) => &n.data,
            Statement::Switch(n) => &n.data,
            Statement::Labeled(n) => &n.data,
            Statement::Throw(n) => &n.data,
            Statement::Try(n) => &n.data,
        }
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        match self {
            Statement::Variable(n) => &mut n.data,
            Statement::Function(n) => &mut n.data,
            Statement::Block(n) => &mut n.data,
            Statement::Empty(d) | Statement::Debugger(d) => d,
            Statement::Expression(n) => &mut n.data,
            Statement::If(n) => &mut n.data,
            Statement::While(n) => &mut n.data,
            Statement::DoWhile(n) => &mut n.data,
            Statement::For(n) => &mut n.data,
            Statement::ForIn(n) => &mut n.data,
            Statement::ForOf(n) => &mut n.data,
            Statement::Continue(n) | Statement::Break(n) => &mut n.data,
            Statement::Return(n) => &mut n.data,
            Statement::With(n) => &mut n.data,
            Statement::Switch(n) => &mut n.data,
            Statement::Labeled(n) => &mut n.data,
            Statement::Throw(n) => &mut n.data,
            Statement::Try(n) => &mut n.data,
        }
    }

    #[inline]
    pub fn span(&self) -> TextSpan {
        self.data().span
    }

    /// Whether this is a loop statement (not looking through labels).
    pub fn is_iteration(&self) -> bool {
        matches!(
            self,
            Statement::While(_)
                | Statement::DoWhile(_)
                | Statement::For(_)
                | Statement::ForIn(_)
                | Statement::ForOf(_)
        )
    }

    /// Short human-readable name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Statement::Variable(_) => "variable declaration",
            Statement::Function(_) => "function declaration",
            Statement::Block(_) => "block",
            Statement::Empty(_) => "empty statement",
            Statement::Expression(_) => "expression statement",
            Statement::If(_) => "if statement",
            Statement::While(_) => "while loop",
            Statement::DoWhile(_) => "do-while loop",
            Statement::For(_) => "for loop",
            Statement::ForIn(_) => "for-in loop",
            Statement::ForOf(_) => "for-of loop",
            Statement::Continue(_) => "continue statement",
            Statement::Break(_) => "break statement",
            Statement::Return(_) => "return statement",
            Statement::With(_) => "with statement",
            Statement::Switch(_) => "switch statement",
            Statement::Labeled(_) => "labeled statement",
            Statement::Throw(_) => "throw statement",
            Statement::Try(_) => "try statement",
            Statement::Debugger(_) => "debugger statement",
        }
    }
}

impl Expression {
    pub fn data(&self) -> &NodeData {
        match self {
            Expression::Identifier(n) => &n.data,
            Expression::This(d) | Expression::Null(d) => d,
            Expression::Boolean(n) => &n.data,
            Expression::Number(n) => &n.data,
            Expression::String(n) => &n.data,
            Expression::RegExp(n) => &n.data,
            Expression::Array(n) => &n.data,
            Expression::Object(n) => &n.data,
            Expression::Function(n) => &n.data,
            Expression::Arrow(n) => &n.data,
            Expression::Unary(n) => &n.data,
            Expression::Update(n) => &n.data,
            Expression::Binary(n) => &n.data,
            Expression::Logical(n) => &n.data,
            Expression::Assignment(n) => &n.data,
            Expression::Conditional(n) => &n.data,
            Expression::Call(n) => &n.data,
            Expression::New(n) => &n.data,
            Expression::Member(n) => &n.data,
            Expression::Sequence(n) => &n.data,
        }
    }

    pub fn data_mut(&mut self) -> &mut NodeData {
        match self {
            Expression::Identifier(n) => &mut n.data,
            Expression::This(d) | Expression::Null(d) => d,
            Expression::Boolean(n) => &mut n.data,
            Expression::Number(n) => &mut n.data,
            Expression::String(n) => &mut n.data,
            Expression::RegExp(n) => &mut n.data,
            Expression::Array(n) => &mut n.data,
            Expression::Object(n) => &mut n.data,
            Expression::Function(n) => &mut n.data,
            Expression::Arrow(n) => &mut n.data,
            Expression::Unary(n) => &mut n.data,
            Expression::Update(n) => &mut n.data,
            Expression::Binary(n) => &mut n.data,
            Expression::Logical(n) => &mut n.data,
            Expression::Assignment(n) => &mut n.data,
            Expression::Conditional(n) => &mut n.data,
            Expression::Call(n) => &mut n.data,
            Expression::New(n) => &mut n.data,
            Expression::Member(n) => &mut n.data,
            Expression::Sequence(n) => &mut n.data,
        }
    }

    #[inline]
    pub fn span(&self) -> TextSpan {
        self.data().span
    }

    /// Whether this is a primitive or regex literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::Null(_)
                | Expression::Boolean(_)
                | Expression::Number(_)
                | Expression::String(_)
                | Expression::RegExp(_)
        )
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expression::Identifier(ident) => Some(ident),
            _ => None,
        }
    }

    /// Whether this is an identifier reference with the given name.
    pub fn is_identifier_named(&self, name: &str) -> bool {
        matches!(self, Expression::Identifier(ident) if ident.name == name)
    }

    /// Whether this is a temporary introduced by a rewrite.
    pub fn is_temporary(&self) -> bool {
        matches!(self, Expression::Identifier(ident) if ident.data.is_synthesized())
    }

    /// `&&`, `||` or `?:`.
    pub fn is_short_circuit(&self) -> bool {
        matches!(self, Expression::Logical(_) | Expression::Conditional(_))
    }

    /// Whether the expression is a valid assignment target.
    pub fn is_assignment_target(&self) -> bool {
        matches!(self, Expression::Identifier(_) | Expression::Member(_))
    }
}

impl Default for Expression {
    /// An `undefined`-free placeholder used while a node is moved out with
    /// `std::mem::take`.
    fn default() -> Self {
        Expression::Null(NodeData::default())
    }
}

impl Default for Statement {
    fn default() -> Self {
        Statement::Empty(NodeData::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_ne};

    fn ident(name: &str, start: u32) -> Identifier {
        Identifier::new(name, TextSpan::new(start, name.len() as u32))
    }

    #[test]
    fn test_equality_ignores_spans_and_bindings() {
        let mut a = ident("x", 0);
        let b = ident("x", 40);
        a.binding = Some(BindingId(3));
        assert_eq!(a, b);
        assert_ne!(a, ident("y", 0));
    }

    #[test]
    fn test_equality_ignores_flags() {
        let a = Expression::This(NodeData::synthesized(TextSpan::default()));
        let b = Expression::This(NodeData::new(TextSpan::new(4, 4)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_function_equality_ignores_scope() {
        let body = FunctionBody {
            data: NodeData::default(),
            statements: vec![],
        };
        let f = Function {
            data: NodeData::default(),
            name: Some(ident("f", 9)),
            params: vec![ident("a", 11)],
            body: body.clone(),
            scope: Some(ScopeId(2)),
        };
        let g = Function {
            scope: None,
            ..f.clone()
        };
        assert_eq!(f, g);
    }

    #[test]
    fn test_expression_helpers() {
        let t = Expression::Identifier(Identifier {
            data: NodeData::synthesized(TextSpan::default()),
            name: "$tmp0".into(),
            binding: None,
        });
        assert!(t.is_temporary());
        assert!(t.is_identifier_named("$tmp0"));
        assert!(t.is_assignment_target());
        assert!(!Expression::Identifier(ident("x", 0)).is_temporary());
        assert!(Expression::default().is_literal());
    }
}
