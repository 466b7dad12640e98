//! jsnorm_printer: AST to text output.
//!
//! Converts a program back into JavaScript text: one statement per line,
//! braces on the opening line, single spaces around binary operators.
//! Parentheses come from operator precedence alone, so the output
//! re-parses to the same tree.

use jsnorm_ast::node::*;
use jsnorm_ast::{BinaryOperator, Precedence, UnaryOperator, UpdateOperator};

/// Options for the printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterOptions {
    /// Indentation string.
    pub indent_str: String,
    /// Newline string.
    pub new_line: String,
    /// Whether to emit a trailing newline.
    pub trailing_newline: bool,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            indent_str: "    ".to_string(),
            new_line: "\n".to_string(),
            trailing_newline: true,
        }
    }
}

impl PrinterOptions {
    /// Default options with `width` spaces per indentation level.
    pub fn with_indent_width(width: usize) -> Self {
        Self {
            indent_str: " ".repeat(width),
            ..Self::default()
        }
    }
}

/// Print `program` with default options.
pub fn print_program(program: &Program) -> String {
    Printer::new().print_program(program)
}

/// Print a single expression on one line, as it would appear in a statement.
pub fn print_expression(expr: &Expression) -> String {
    let mut printer = Printer::new();
    printer.print_expression(expr, Precedence::Comma);
    printer.output
}

/// The printer converts AST nodes to text.
pub struct Printer {
    output: String,
    indent_level: u32,
    options: PrinterOptions,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self::with_options(PrinterOptions::default())
    }

    pub fn with_options(options: PrinterOptions) -> Self {
        Self {
            output: String::with_capacity(4096),
            indent_level: 0,
            options,
        }
    }

    /// Print a program to a string.
    pub fn print_program(&mut self, program: &Program) -> String {
        self.output.clear();
        self.indent_level = 0;
        for (i, stmt) in program.statements.iter().enumerate() {
            if i > 0 {
                self.write_newline();
            }
            self.write_indent();
            self.print_statement(stmt);
        }
        if self.options.trailing_newline && !self.output.is_empty() {
            self.write_newline();
        }
        std::mem::take(&mut self.output)
    }

    // ========================================================================
    // Statement printing
    // ========================================================================

    fn print_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Empty(_) => self.write(";"),
            Statement::Expression(n) => {
                if starts_ambiguously(&n.expression) {
                    self.write("(");
                    self.print_expression(&n.expression, Precedence::Comma);
                    self.write(")");
                } else {
                    self.print_expression(&n.expression, Precedence::Comma);
                }
                self.write(";");
            }
            Statement::Variable(n) => {
                self.print_variable_declaration(n, false);
                self.write(";");
            }
            Statement::Function(n) => self.print_function(n),
            Statement::Block(n) => self.print_block(&n.statements),
            Statement::Return(n) => {
                self.write("return");
                if let Some(argument) = &n.argument {
                    self.write(" ");
                    self.print_expression(argument, Precedence::Comma);
                }
                self.write(";");
            }
            Statement::If(n) => {
                self.write("if (");
                self.print_expression(&n.test, Precedence::Comma);
                self.write(") ");
                self.print_statement(&n.consequent);
                if let Some(alternate) = &n.alternate {
                    self.write(" else ");
                    self.print_statement(alternate);
                }
            }
            Statement::While(n) => {
                self.write("while (");
                self.print_expression(&n.test, Precedence::Comma);
                self.write(") ");
                self.print_statement(&n.body);
            }
            Statement::DoWhile(n) => {
                self.write("do ");
                self.print_statement(&n.body);
                self.write(" while (");
                self.print_expression(&n.test, Precedence::Comma);
                self.write(");");
            }
            Statement::For(n) => self.print_for_statement(n),
            Statement::ForIn(n) => self.print_for_each(&n.left, "in", &n.right, &n.body),
            Statement::ForOf(n) => self.print_for_each(&n.left, "of", &n.right, &n.body),
            Statement::Continue(n) => self.print_jump("continue", n),
            Statement::Break(n) => self.print_jump("break", n),
            Statement::With(n) => {
                self.write("with (");
                self.print_expression(&n.object, Precedence::Comma);
                self.write(") ");
                self.print_statement(&n.body);
            }
            Statement::Switch(n) => self.print_switch_statement(n),
            Statement::Labeled(n) => {
                self.write(&n.label.name);
                self.write(": ");
                self.print_statement(&n.body);
            }
            Statement::Throw(n) => {
                self.write("throw ");
                self.print_expression(&n.argument, Precedence::Comma);
                self.write(";");
            }
            Statement::Try(n) => self.print_try_statement(n),
            Statement::Debugger(_) => self.write("debugger;"),
        }
    }

    /// `in_for_head` parenthesizes initializers containing `in`, which the
    /// head of a `for` would otherwise split on.
    fn print_variable_declaration(&mut self, node: &VariableDeclaration, in_for_head: bool) {
        self.write(node.kind.as_str());
        self.write(" ");
        for (i, declarator) in node.declarations.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&declarator.name.name);
            if let Some(init) = &declarator.init {
                self.write(" = ");
                if in_for_head && contains_in(init) {
                    self.write("(");
                    self.print_expression(init, Precedence::Comma);
                    self.write(")");
                } else {
                    self.print_expression(init, Precedence::Assignment);
                }
            }
        }
    }

    fn print_block(&mut self, statements: &[Statement]) {
        self.write("{");
        if !statements.is_empty() {
            self.increase_indent();
            for stmt in statements {
                self.write_newline();
                self.write_indent();
                self.print_statement(stmt);
            }
            self.decrease_indent();
            self.write_newline();
            self.write_indent();
        }
        self.write("}");
    }

    fn print_for_statement(&mut self, node: &ForStatement) {
        self.write("for (");
        match &node.init {
            Some(ForInit::Variable(decl)) => self.print_variable_declaration(decl, true),
            Some(ForInit::Expression(init)) => self.print_for_head_expression(init),
            None => {}
        }
        self.write(";");
        if let Some(test) = &node.test {
            self.write(" ");
            self.print_expression(test, Precedence::Comma);
        }
        self.write(";");
        if let Some(update) = &node.update {
            self.write(" ");
            self.print_expression(update, Precedence::Comma);
        }
        self.write(") ");
        self.print_statement(&node.body);
    }

    fn print_for_each(&mut self, left: &ForHead, keyword: &str, right: &Expression, body: &Statement) {
        self.write("for (");
        match left {
            ForHead::Variable(decl) => self.print_variable_declaration(decl, true),
            ForHead::Target(target) => self.print_for_head_expression(target),
        }
        self.write(" ");
        self.write(keyword);
        self.write(" ");
        let min = if keyword == "of" {
            Precedence::Assignment
        } else {
            Precedence::Comma
        };
        self.print_expression(right, min);
        self.write(") ");
        self.print_statement(body);
    }

    fn print_for_head_expression(&mut self, expr: &Expression) {
        if contains_in(expr) {
            self.write("(");
            self.print_expression(expr, Precedence::Comma);
            self.write(")");
        } else {
            self.print_expression(expr, Precedence::Comma);
        }
    }

    fn print_jump(&mut self, keyword: &str, node: &JumpStatement) {
        self.write(keyword);
        if let Some(label) = &node.label {
            self.write(" ");
            self.write(&label.name);
        }
        self.write(";");
    }

    fn print_switch_statement(&mut self, node: &SwitchStatement) {
        self.write("switch (");
        self.print_expression(&node.discriminant, Precedence::Comma);
        self.write(") {");
        self.increase_indent();
        for case in &node.cases {
            self.write_newline();
            self.write_indent();
            match &case.test {
                Some(test) => {
                    self.write("case ");
                    self.print_expression(test, Precedence::Comma);
                    self.write(":");
                }
                None => self.write("default:"),
            }
            self.increase_indent();
            for stmt in &case.consequent {
                self.write_newline();
                self.write_indent();
                self.print_statement(stmt);
            }
            self.decrease_indent();
        }
        self.decrease_indent();
        self.write_newline();
        self.write_indent();
        self.write("}");
    }

    fn print_try_statement(&mut self, node: &TryStatement) {
        self.write("try ");
        self.print_block(&node.block.statements);
        if let Some(handler) = &node.handler {
            self.write(" catch (");
            self.write(&handler.param.name);
            self.write(") ");
            self.print_block(&handler.body.statements);
        }
        if let Some(finalizer) = &node.finalizer {
            self.write(" finally ");
            self.print_block(&finalizer.statements);
        }
    }

    fn print_function(&mut self, node: &Function) {
        self.write("function");
        if let Some(name) = &node.name {
            self.write(" ");
            self.write(&name.name);
        }
        self.print_parameters(&node.params);
        self.write(" ");
        self.print_block(&node.body.statements);
    }

    fn print_parameters(&mut self, params: &[Identifier]) {
        self.write("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(&param.name);
        }
        self.write(")");
    }

    // ========================================================================
    // Expression printing
    // ========================================================================

    /// Print `expr`, parenthesized when it binds looser than `min`.
    fn print_expression(&mut self, expr: &Expression, min: Precedence) {
        if precedence_of(expr) < min {
            self.write("(");
            self.print_expression_worker(expr);
            self.write(")");
        } else {
            self.print_expression_worker(expr);
        }
    }

    fn print_expression_worker(&mut self, expr: &Expression) {
        match expr {
            Expression::Identifier(id) => self.write(&id.name),
            Expression::This(_) => self.write("this"),
            Expression::Null(_) => self.write("null"),
            Expression::Boolean(n) => self.write(if n.value { "true" } else { "false" }),
            Expression::Number(n) => self.write(&n.raw),
            Expression::String(n) => self.write(&n.raw),
            Expression::RegExp(n) => {
                self.write("/");
                self.write(&n.pattern);
                self.write("/");
                self.write(&n.flags);
            }
            Expression::Array(n) => {
                self.write("[");
                for (i, element) in n.elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(element) = element {
                        self.print_expression(element, Precedence::Assignment);
                    }
                }
                // A trailing hole needs its own comma to survive.
                if matches!(n.elements.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Expression::Object(n) => self.print_object_literal(n),
            Expression::Function(n) => self.print_function(n),
            Expression::Arrow(n) => {
                self.print_parameters(&n.params);
                self.write(" => ");
                match &n.body {
                    ArrowBody::Block(body) => self.print_block(&body.statements),
                    ArrowBody::Expression(body) => {
                        if matches!(leftmost(body), Expression::Object(_)) {
                            self.write("(");
                            self.print_expression(body, Precedence::Comma);
                            self.write(")");
                        } else {
                            self.print_expression(body, Precedence::Assignment);
                        }
                    }
                }
            }
            Expression::Unary(n) => {
                self.write(n.operator.as_str());
                if n.operator.is_keyword() || repeats_sign(n.operator, &n.operand) {
                    self.write(" ");
                }
                self.print_expression(&n.operand, Precedence::Unary);
            }
            Expression::Update(n) => {
                if n.prefix {
                    self.write(n.operator.as_str());
                    self.print_expression(&n.operand, Precedence::Unary);
                } else {
                    self.print_expression(&n.operand, Precedence::LeftHandSide);
                    self.write(n.operator.as_str());
                }
            }
            Expression::Binary(n) => {
                let precedence = n.operator.precedence();
                let (left_min, right_min) = if n.operator.is_right_associative() {
                    // `-a ** b` is a syntax error; the base must be tighter
                    // than a unary expression.
                    (Precedence::Update, precedence)
                } else {
                    (precedence, precedence.tighter())
                };
                self.print_expression(&n.left, left_min);
                self.write(" ");
                self.write(n.operator.as_str());
                self.write(" ");
                self.print_expression(&n.right, right_min);
            }
            Expression::Logical(n) => {
                let precedence = n.operator.precedence();
                self.print_expression(&n.left, precedence);
                self.write(" ");
                self.write(n.operator.as_str());
                self.write(" ");
                self.print_expression(&n.right, precedence.tighter());
            }
            Expression::Assignment(n) => {
                self.print_expression(&n.target, Precedence::LeftHandSide);
                self.write(" ");
                self.write(n.operator.as_str());
                self.write(" ");
                self.print_expression(&n.value, Precedence::Assignment);
            }
            Expression::Conditional(n) => {
                self.print_expression(&n.test, Precedence::LogicalOr);
                self.write(" ? ");
                self.print_expression(&n.consequent, Precedence::Assignment);
                self.write(" : ");
                self.print_expression(&n.alternate, Precedence::Assignment);
            }
            Expression::Call(n) => {
                self.print_expression(&n.callee, Precedence::LeftHandSide);
                self.print_arguments(&n.arguments);
            }
            Expression::New(n) => {
                self.write("new ");
                if needs_parens_as_new_callee(&n.callee) {
                    self.write("(");
                    self.print_expression(&n.callee, Precedence::Comma);
                    self.write(")");
                } else {
                    self.print_expression_worker(&n.callee);
                }
                self.print_arguments(&n.arguments);
            }
            Expression::Member(n) => {
                if matches!(*n.object, Expression::Number(_)) {
                    // `1.toString()` would read the dot as a decimal point.
                    self.write("(");
                    self.print_expression_worker(&n.object);
                    self.write(")");
                } else {
                    self.print_expression(&n.object, Precedence::LeftHandSide);
                }
                match &n.property {
                    MemberProperty::Named(name) => {
                        self.write(".");
                        self.write(&name.name);
                    }
                    MemberProperty::Computed(key) => {
                        self.write("[");
                        self.print_expression(key, Precedence::Comma);
                        self.write("]");
                    }
                }
            }
            Expression::Sequence(n) => {
                for (i, element) in n.expressions.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.print_expression(element, Precedence::Assignment);
                }
            }
        }
    }

    fn print_arguments(&mut self, arguments: &[Expression]) {
        self.write("(");
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_expression(argument, Precedence::Assignment);
        }
        self.write(")");
    }

    fn print_object_literal(&mut self, node: &ObjectLiteral) {
        if node.properties.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.increase_indent();
        for (i, property) in node.properties.iter().enumerate() {
            self.write_newline();
            self.write_indent();
            match &property.value {
                PropertyValue::Init(value) => {
                    self.print_property_key(&property.key);
                    self.write(": ");
                    self.print_expression(value, Precedence::Assignment);
                }
                PropertyValue::Get(func) => {
                    self.write("get ");
                    self.print_property_key(&property.key);
                    self.print_accessor(func);
                }
                PropertyValue::Set(func) => {
                    self.write("set ");
                    self.print_property_key(&property.key);
                    self.print_accessor(func);
                }
            }
            if i < node.properties.len() - 1 {
                self.write(",");
            }
        }
        self.decrease_indent();
        self.write_newline();
        self.write_indent();
        self.write("}");
    }

    fn print_accessor(&mut self, func: &Function) {
        self.print_parameters(&func.params);
        self.write(" ");
        self.print_block(&func.body.statements);
    }

    fn print_property_key(&mut self, key: &PropertyKey) {
        match key {
            PropertyKey::Identifier(id) => self.write(&id.name),
            PropertyKey::String(s) => self.write(&s.raw),
            PropertyKey::Number(n) => self.write(&n.raw),
        }
    }

    // ========================================================================
    // Core write helpers
    // ========================================================================

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_newline(&mut self) {
        self.output.push_str(&self.options.new_line);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.options.indent_str);
        }
    }

    fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

fn precedence_of(expr: &Expression) -> Precedence {
    match expr {
        Expression::Sequence(_) => Precedence::Comma,
        Expression::Assignment(_) | Expression::Arrow(_) => Precedence::Assignment,
        Expression::Conditional(_) => Precedence::Conditional,
        Expression::Logical(n) => n.operator.precedence(),
        Expression::Binary(n) => n.operator.precedence(),
        Expression::Unary(_) => Precedence::Unary,
        Expression::Update(n) if n.prefix => Precedence::Unary,
        Expression::Update(_) => Precedence::Update,
        Expression::Call(_) => Precedence::LeftHandSide,
        // `new` always prints its argument list, which makes it a member
        // expression.
        Expression::New(_) | Expression::Member(_) => Precedence::Member,
        _ => Precedence::Primary,
    }
}

/// The expression whose text comes first when `expr` is printed without
/// parentheses.
fn leftmost(expr: &Expression) -> &Expression {
    match expr {
        Expression::Call(n) => leftmost(&n.callee),
        Expression::Member(n) => leftmost(&n.object),
        Expression::Binary(n) => leftmost(&n.left),
        Expression::Logical(n) => leftmost(&n.left),
        Expression::Assignment(n) => leftmost(&n.target),
        Expression::Conditional(n) => leftmost(&n.test),
        Expression::Update(n) if !n.prefix => leftmost(&n.operand),
        Expression::Sequence(n) => n.expressions.first().map_or(expr, leftmost),
        _ => expr,
    }
}

/// An expression statement may not begin with `function` or `{`.
fn starts_ambiguously(expr: &Expression) -> bool {
    matches!(leftmost(expr), Expression::Function(_) | Expression::Object(_))
}

/// `new f().g()` would call `f` without `new`; callees holding a call in
/// their member chain need parentheses.
fn needs_parens_as_new_callee(callee: &Expression) -> bool {
    match callee {
        Expression::Call(_) => true,
        Expression::Member(n) => {
            matches!(*n.object, Expression::Number(_)) || needs_parens_as_new_callee(&n.object)
        }
        Expression::New(_) => false,
        other => precedence_of(other) < Precedence::Member,
    }
}

/// `- -x` and `+ ++x` must not fuse into `--x` and `+++x`.
fn repeats_sign(operator: UnaryOperator, operand: &Expression) -> bool {
    match (operator, operand) {
        (UnaryOperator::Minus, Expression::Unary(n)) => n.operator == UnaryOperator::Minus,
        (UnaryOperator::Plus, Expression::Unary(n)) => n.operator == UnaryOperator::Plus,
        (UnaryOperator::Minus, Expression::Update(n)) => {
            n.prefix && n.operator == UpdateOperator::Decrement
        }
        (UnaryOperator::Plus, Expression::Update(n)) => {
            n.prefix && n.operator == UpdateOperator::Increment
        }
        _ => false,
    }
}

/// Whether `expr` holds an `in` operator outside any function.
fn contains_in(expr: &Expression) -> bool {
    match expr {
        Expression::Binary(n) => {
            n.operator == BinaryOperator::In || contains_in(&n.left) || contains_in(&n.right)
        }
        Expression::Logical(n) => contains_in(&n.left) || contains_in(&n.right),
        Expression::Assignment(n) => contains_in(&n.target) || contains_in(&n.value),
        Expression::Conditional(n) => {
            contains_in(&n.test) || contains_in(&n.consequent) || contains_in(&n.alternate)
        }
        Expression::Unary(n) => contains_in(&n.operand),
        Expression::Update(n) => contains_in(&n.operand),
        Expression::Sequence(n) => n.expressions.iter().any(contains_in),
        Expression::Member(n) => {
            contains_in(&n.object)
                || matches!(&n.property, MemberProperty::Computed(key) if contains_in(key))
        }
        Expression::Call(n) => contains_in(&n.callee) || n.arguments.iter().any(contains_in),
        Expression::New(n) => contains_in(&n.callee) || n.arguments.iter().any(contains_in),
        Expression::Array(n) => n.elements.iter().flatten().any(contains_in),
        Expression::Object(n) => n
            .properties
            .iter()
            .any(|p| matches!(&p.value, PropertyValue::Init(value) if contains_in(value))),
        _ => false,
    }
}
