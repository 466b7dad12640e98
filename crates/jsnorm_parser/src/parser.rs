//! The JavaScript parser implementation.
//!
//! A recursive descent parser over the scanner's token stream. It stops at
//! the first error: the result is either a complete `Program` with a span on
//! every node, or one diagnostic describing what went wrong. Early errors
//! (misplaced jumps, duplicate labels, invalid assignment targets) are
//! checked while parsing, so an accepted program needs no further
//! validation before it is resolved.

use std::mem;

use jsnorm_ast::node::*;
use jsnorm_ast::operators::UpdateOperator;
use jsnorm_ast::precedence::Precedence;
use jsnorm_ast::syntax_kind::SyntaxKind;
use jsnorm_core::text::{TextPos, TextSpan};
use jsnorm_diagnostics::{messages, Diagnostic, DiagnosticMessage};
use jsnorm_scanner::{numeric_value, Scanner};

use crate::error::ParseError;
use crate::precedence::{assignment_operator, infix_operator, unary_operator, InfixOperator};
use crate::utilities::{can_start_expression, is_iteration_keyword, unsupported_feature};

/// Maximum recursion depth to prevent stack overflow on deeply nested input.
const MAX_RECURSION_DEPTH: u32 = 200;

type ParseResult<T> = Result<T, Diagnostic>;

/// A statement label in scope.
#[derive(Debug)]
struct Label {
    name: String,
    /// Whether the label names an iteration statement, and so may be the
    /// target of `continue`.
    is_iteration: bool,
}

/// Jump-target state for the function being parsed. Labels and loops do
/// not cross function boundaries, so each function body starts fresh.
#[derive(Debug, Default)]
struct JumpContext {
    in_function: bool,
    labels: Vec<Label>,
    iteration_depth: u32,
    switch_depth: u32,
    /// Labels pushed by the labeled statements directly enclosing the
    /// statement about to be parsed.
    pending_labels: usize,
}

impl JumpContext {
    fn function() -> Self {
        Self {
            in_function: true,
            ..Self::default()
        }
    }

    fn mark_iteration_labels(&mut self, count: usize) {
        let len = self.labels.len();
        for label in &mut self.labels[len - count..] {
            label.is_iteration = true;
        }
    }

    fn find_label(&self, name: &str) -> Option<&Label> {
        self.labels.iter().rev().find(|label| label.name == name)
    }
}

/// The parser produces a `Program` AST from JavaScript source text.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    source_text: &'a str,
    /// End of the last consumed token; closes node spans.
    prev_token_end: TextPos,
    /// Set while parsing a `for` head, where `in` ends an initializer.
    disallow_in: bool,
    context: JumpContext,
    outer_contexts: Vec<JumpContext>,
    /// Tracks recursion depth to prevent stack overflow on deeply nested input.
    recursion_depth: u32,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Self {
        Self {
            scanner: Scanner::new(source_text),
            source_text,
            prev_token_end: 0,
            disallow_in: false,
            context: JumpContext::default(),
            outer_contexts: Vec::new(),
            recursion_depth: 0,
        }
    }

    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let source_text = self.source_text;
        self.parse_program_worker()
            .map_err(|diagnostic| ParseError::from_diagnostic(&diagnostic, source_text))
    }

    fn parse_program_worker(&mut self) -> ParseResult<Program> {
        self.next_token()?;
        let mut statements = Vec::new();
        while self.current_token() != SyntaxKind::EndOfFileToken {
            statements.push(self.parse_statement_list_item()?);
        }
        let end = self.source_text.len() as TextPos;
        Ok(Program {
            data: NodeData::new(TextSpan::from_bounds(0, end)),
            statements,
        })
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn current_token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    fn next_token(&mut self) -> ParseResult<SyntaxKind> {
        self.prev_token_end = self.scanner.token_end() as TextPos;
        let kind = self.scanner.scan();
        self.check_scanner_diagnostics()?;
        Ok(kind)
    }

    /// The scanner reports lexical errors as diagnostics; the first one ends the parse.
    fn check_scanner_diagnostics(&self) -> ParseResult<()> {
        match self.scanner.diagnostics().diagnostics().first() {
            Some(diagnostic) => Err(diagnostic.clone()),
            None => Ok(()),
        }
    }

    #[inline]
    fn token_pos(&self) -> TextPos {
        self.scanner.token_start() as TextPos
    }

    #[inline]
    fn token_span(&self) -> TextSpan {
        self.scanner.token_span()
    }

    /// Node data spanning from `start` to the end of the last consumed token.
    fn node_data(&self, start: TextPos) -> NodeData {
        NodeData::new(TextSpan::from_bounds(start, self.prev_token_end.max(start)))
    }

    fn expect_token(&mut self, kind: SyntaxKind) -> ParseResult<()> {
        if self.current_token() == kind {
            self.next_token()?;
            Ok(())
        } else {
            Err(self.expected(kind.describe()))
        }
    }

    fn optional_token(&mut self, kind: SyntaxKind) -> ParseResult<bool> {
        if self.current_token() == kind {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn can_insert_semicolon(&self) -> bool {
        matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.scanner.has_preceding_line_break()
    }

    fn parse_semicolon(&mut self) -> ParseResult<()> {
        if self.current_token() == SyntaxKind::SemicolonToken {
            self.next_token()?;
            Ok(())
        } else if self.can_insert_semicolon() {
            Ok(())
        } else {
            Err(self.expected(";"))
        }
    }

    fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Scanner<'a>) -> T) -> T {
        self.scanner.look_ahead(f)
    }

    fn allow_in_and<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let saved = mem::replace(&mut self.disallow_in, false);
        let result = f(self);
        self.disallow_in = saved;
        result
    }

    fn disallow_in_and<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let saved = mem::replace(&mut self.disallow_in, true);
        let result = f(self);
        self.disallow_in = saved;
        result
    }

    fn enter_recursion(&mut self) -> ParseResult<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            return Err(self.error(&messages::TOO_DEEPLY_NESTED, &[]));
        }
        Ok(())
    }

    // ========================================================================
    // Errors
    // ========================================================================

    fn error(&self, message: &DiagnosticMessage, args: &[&str]) -> Diagnostic {
        Diagnostic::with_span(self.token_span(), message, args)
    }

    fn error_at(&self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Diagnostic {
        Diagnostic::with_span(span, message, args)
    }

    fn unsupported(&self, feature: &str) -> Diagnostic {
        self.error(&messages::UNSUPPORTED_SYNTAX_0, &[feature])
    }

    /// `'x' expected`, unless the current token starts syntax outside the
    /// accepted grammar, in which case that is the better report.
    fn expected(&self, what: &str) -> Diagnostic {
        match unsupported_feature(self.current_token()) {
            Some(feature) => self.unsupported(feature),
            None => self.error(&messages::_0_EXPECTED, &[what]),
        }
    }

    fn identifier_expected(&self) -> Diagnostic {
        match unsupported_feature(self.current_token()) {
            Some(feature) => self.unsupported(feature),
            None => self.error(&messages::IDENTIFIER_EXPECTED, &[]),
        }
    }

    // ========================================================================
    // Function contexts and jump targets
    // ========================================================================

    fn enter_function_context(&mut self) {
        let outer = mem::replace(&mut self.context, JumpContext::function());
        self.outer_contexts.push(outer);
    }

    fn exit_function_context(&mut self) {
        if let Some(outer) = self.outer_contexts.pop() {
            self.context = outer;
        }
    }

    fn check_jump_target(
        &self,
        is_continue: bool,
        label: Option<&Identifier>,
        span: TextSpan,
    ) -> ParseResult<()> {
        let Some(label) = label else {
            if is_continue && self.context.iteration_depth == 0 {
                return Err(self.error_at(
                    span,
                    &messages::A_CONTINUE_STATEMENT_CAN_ONLY_BE_USED_WITHIN_AN_ENCLOSING_ITERATION_STATEMENT,
                    &[],
                ));
            }
            if !is_continue && self.context.iteration_depth + self.context.switch_depth == 0 {
                return Err(self.error_at(
                    span,
                    &messages::A_BREAK_STATEMENT_CAN_ONLY_BE_USED_WITHIN_AN_ENCLOSING_ITERATION_OR_SWITCH_STATEMENT,
                    &[],
                ));
            }
            return Ok(());
        };

        match self.context.find_label(&label.name) {
            Some(found) if is_continue && !found.is_iteration => Err(self.error_at(
                span,
                &messages::A_CONTINUE_STATEMENT_CAN_ONLY_JUMP_TO_A_LABEL_OF_AN_ENCLOSING_ITERATION_STATEMENT,
                &[],
            )),
            Some(_) => Ok(()),
            None if self
                .outer_contexts
                .iter()
                .any(|outer| outer.find_label(&label.name).is_some()) =>
            {
                Err(self.error_at(span, &messages::JUMP_TARGET_CANNOT_CROSS_FUNCTION_BOUNDARY, &[]))
            }
            None if is_continue => Err(self.error_at(
                span,
                &messages::A_CONTINUE_STATEMENT_CAN_ONLY_JUMP_TO_A_LABEL_OF_AN_ENCLOSING_ITERATION_STATEMENT,
                &[],
            )),
            None => Err(self.error_at(
                span,
                &messages::A_BREAK_STATEMENT_CAN_ONLY_JUMP_TO_A_LABEL_OF_AN_ENCLOSING_STATEMENT,
                &[],
            )),
        }
    }

    // ========================================================================
    // Statement parsing
    // ========================================================================

    /// A statement in a program, block, case clause or function body, where
    /// `let` and `const` declarations are allowed.
    fn parse_statement_list_item(&mut self) -> ParseResult<Statement> {
        self.parse_statement(true)
    }

    fn parse_statement(&mut self, allow_lexical: bool) -> ParseResult<Statement> {
        self.enter_recursion()?;
        let result = self.parse_statement_worker(allow_lexical);
        self.recursion_depth -= 1;
        result
    }

    fn parse_statement_worker(&mut self, allow_lexical: bool) -> ParseResult<Statement> {
        let pending_labels = mem::take(&mut self.context.pending_labels);
        let token = self.current_token();
        if is_iteration_keyword(token) {
            self.context.mark_iteration_labels(pending_labels);
        }

        match token {
            SyntaxKind::OpenBraceToken => Ok(Statement::Block(self.parse_block()?)),
            SyntaxKind::SemicolonToken => {
                let start = self.token_pos();
                self.next_token()?;
                Ok(Statement::Empty(self.node_data(start)))
            }
            SyntaxKind::VarKeyword => self.parse_variable_statement(VariableKind::Var),
            SyntaxKind::ConstKeyword => self.parse_lexical_statement(VariableKind::Const, allow_lexical),
            SyntaxKind::LetKeyword if self.is_let_declaration() => {
                self.parse_lexical_statement(VariableKind::Let, allow_lexical)
            }
            SyntaxKind::FunctionKeyword => {
                let function = self.parse_function(true)?;
                Ok(Statement::Function(Box::new(function)))
            }
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ContinueKeyword => self.parse_jump_statement(true),
            SyntaxKind::BreakKeyword => self.parse_jump_statement(false),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::WithKeyword => self.parse_with_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::DebuggerKeyword => {
                let start = self.token_pos();
                self.next_token()?;
                self.parse_semicolon()?;
                Ok(Statement::Debugger(self.node_data(start)))
            }
            SyntaxKind::AsyncKeyword if self.is_async_function() => {
                Err(self.unsupported("An async function"))
            }
            _ if token.is_identifier_or_contextual_keyword() && self.is_labeled_statement() => {
                self.parse_labeled_statement(pending_labels)
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// `let` starts a declaration when a binding follows it; otherwise it is
    /// an ordinary identifier.
    fn is_let_declaration(&mut self) -> bool {
        self.look_ahead(|scanner| {
            let next = scanner.scan();
            next.is_identifier_or_contextual_keyword()
                || matches!(next, SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken)
        })
    }

    fn is_labeled_statement(&mut self) -> bool {
        self.look_ahead(|scanner| scanner.scan() == SyntaxKind::ColonToken)
    }

    fn is_async_function(&mut self) -> bool {
        self.look_ahead(|scanner| {
            let next = scanner.scan();
            !scanner.has_preceding_line_break()
                && (next == SyntaxKind::FunctionKeyword || next.is_identifier_or_contextual_keyword())
        })
    }

    fn parse_block(&mut self) -> ParseResult<BlockStatement> {
        let start = self.token_pos();
        self.expect_token(SyntaxKind::OpenBraceToken)?;
        let statements = self.parse_statements_until_close_brace()?;
        self.expect_token(SyntaxKind::CloseBraceToken)?;
        Ok(BlockStatement {
            data: self.node_data(start),
            statements,
        })
    }

    fn parse_statements_until_close_brace(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        while !matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) {
            statements.push(self.parse_statement_list_item()?);
        }
        Ok(statements)
    }

    fn parse_variable_statement(&mut self, kind: VariableKind) -> ParseResult<Statement> {
        let start = self.token_pos();
        let mut declaration = self.parse_variable_declaration_list(kind, false)?;
        self.parse_semicolon()?;
        declaration.data = self.node_data(start);
        Ok(Statement::Variable(declaration))
    }

    fn parse_lexical_statement(&mut self, kind: VariableKind, allow_lexical: bool) -> ParseResult<Statement> {
        if !allow_lexical {
            return Err(self.error(
                &messages::_0_DECLARATIONS_CAN_ONLY_BE_DECLARED_INSIDE_A_BLOCK,
                &[kind.as_str()],
            ));
        }
        self.parse_variable_statement(kind)
    }

    /// Parse `var|let|const a = 1, b`. In a `for` head the `const`
    /// initializer check is left to the caller, since `for (const k in o)`
    /// is valid.
    fn parse_variable_declaration_list(
        &mut self,
        kind: VariableKind,
        in_for_head: bool,
    ) -> ParseResult<VariableDeclaration> {
        let start = self.token_pos();
        self.next_token()?;

        let mut declarations = Vec::new();
        loop {
            let declarator_start = self.token_pos();
            let name = self.parse_binding_identifier()?;
            let init = if self.optional_token(SyntaxKind::EqualsToken)? {
                Some(self.parse_assignment_expression()?)
            } else {
                if kind == VariableKind::Const && !in_for_head {
                    return Err(self.error_at(
                        name.data.span,
                        &messages::CONST_DECLARATIONS_MUST_BE_INITIALIZED,
                        &[],
                    ));
                }
                None
            };
            declarations.push(VariableDeclarator {
                data: self.node_data(declarator_start),
                name,
                init,
            });
            if !self.optional_token(SyntaxKind::CommaToken)? {
                break;
            }
        }

        Ok(VariableDeclaration {
            data: self.node_data(start),
            kind,
            declarations,
        })
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let start = self.token_pos();
        let token = self.current_token();
        if !can_start_expression(token) {
            return Err(match unsupported_feature(token) {
                Some(feature) => self.unsupported(feature),
                None => self.error(&messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]),
            });
        }
        let expression = self.allow_in_and(|p| p.parse_expression())?;
        self.parse_semicolon()?;
        Ok(Statement::Expression(ExpressionStatement {
            data: self.node_data(start),
            expression,
        }))
    }

    fn parse_parenthesized_condition(&mut self) -> ParseResult<Expression> {
        self.expect_token(SyntaxKind::OpenParenToken)?;
        let expression = self.allow_in_and(|p| p.parse_expression())?;
        self.expect_token(SyntaxKind::CloseParenToken)?;
        Ok(expression)
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        let start = self.token_pos();
        self.next_token()?;
        let test = self.parse_parenthesized_condition()?;
        let consequent = Box::new(self.parse_statement(false)?);
        let alternate = if self.optional_token(SyntaxKind::ElseKeyword)? {
            Some(Box::new(self.parse_statement(false)?))
        } else {
            None
        };
        Ok(Statement::If(IfStatement {
            data: self.node_data(start),
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_iteration_body(&mut self) -> ParseResult<Box<Statement>> {
        self.context.iteration_depth += 1;
        let body = self.parse_statement(false);
        self.context.iteration_depth -= 1;
        Ok(Box::new(body?))
    }

    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        let start = self.token_pos();
        self.next_token()?;
        let test = self.parse_parenthesized_condition()?;
        let body = self.parse_iteration_body()?;
        Ok(Statement::While(WhileStatement {
            data: self.node_data(start),
            test,
            body,
        }))
    }

    fn parse_do_statement(&mut self) -> ParseResult<Statement> {
        let start = self.token_pos();
        self.next_token()?;
        let body = self.parse_iteration_body()?;
        self.expect_token(SyntaxKind::WhileKeyword)?;
        let test = self.parse_parenthesized_condition()?;
        // A semicolon is always inserted after `do ... while (x)`.
        self.optional_token(SyntaxKind::SemicolonToken)?;
        Ok(Statement::DoWhile(DoWhileStatement {
            data: self.node_data(start),
            body,
            test,
        }))
    }

    fn parse_for_statement(&mut self) -> ParseResult<Statement> {
        let start = self.token_pos();
        self.next_token()?;
        if self.current_token() == SyntaxKind::AwaitKeyword {
            return Err(self.unsupported("A 'for await' loop"));
        }
        self.expect_token(SyntaxKind::OpenParenToken)?;

        let init = match self.current_token() {
            SyntaxKind::SemicolonToken => None,
            SyntaxKind::VarKeyword => Some(self.parse_for_declaration(VariableKind::Var)?),
            SyntaxKind::ConstKeyword => Some(self.parse_for_declaration(VariableKind::Const)?),
            SyntaxKind::LetKeyword if self.is_let_declaration() => {
                Some(self.parse_for_declaration(VariableKind::Let)?)
            }
            _ => Some(ForInit::Expression(self.disallow_in_and(|p| p.parse_expression())?)),
        };

        let token = self.current_token();
        let init = match init {
            Some(init) if matches!(token, SyntaxKind::InKeyword | SyntaxKind::OfKeyword) => {
                return self.parse_for_in_or_of_rest(start, init, token == SyntaxKind::OfKeyword);
            }
            init => init,
        };

        if let Some(ForInit::Variable(declaration)) = &init {
            if declaration.kind == VariableKind::Const {
                if let Some(uninitialized) = declaration.declarations.iter().find(|d| d.init.is_none()) {
                    return Err(self.error_at(
                        uninitialized.name.data.span,
                        &messages::CONST_DECLARATIONS_MUST_BE_INITIALIZED,
                        &[],
                    ));
                }
            }
        }

        self.expect_token(SyntaxKind::SemicolonToken)?;
        let test = if self.current_token() != SyntaxKind::SemicolonToken {
            Some(self.allow_in_and(|p| p.parse_expression())?)
        } else {
            None
        };
        self.expect_token(SyntaxKind::SemicolonToken)?;
        let update = if self.current_token() != SyntaxKind::CloseParenToken {
            Some(self.allow_in_and(|p| p.parse_expression())?)
        } else {
            None
        };
        self.expect_token(SyntaxKind::CloseParenToken)?;
        let body = self.parse_iteration_body()?;

        Ok(Statement::For(ForStatement {
            data: self.node_data(start),
            init,
            test,
            update,
            body,
        }))
    }

    fn parse_for_declaration(&mut self, kind: VariableKind) -> ParseResult<ForInit> {
        let declaration = self.disallow_in_and(|p| p.parse_variable_declaration_list(kind, true))?;
        Ok(ForInit::Variable(declaration))
    }

    /// Parse the rest of `for (left in right) body` or `for (left of right) body`
    /// once the head's left side has been read.
    fn parse_for_in_or_of_rest(&mut self, start: TextPos, init: ForInit, is_of: bool) -> ParseResult<Statement> {
        let left = self.for_in_or_of_head(init)?;
        self.next_token()?;
        let right = if is_of {
            self.allow_in_and(|p| p.parse_assignment_expression())?
        } else {
            self.allow_in_and(|p| p.parse_expression())?
        };
        self.expect_token(SyntaxKind::CloseParenToken)?;
        let body = self.parse_iteration_body()?;
        let data = self.node_data(start);
        Ok(if is_of {
            Statement::ForOf(ForOfStatement { data, left, right, body })
        } else {
            Statement::ForIn(ForInStatement { data, left, right, body })
        })
    }

    /// Validate the left side of a `for-in`/`for-of` head.
    fn for_in_or_of_head(&self, init: ForInit) -> ParseResult<ForHead> {
        match init {
            ForInit::Variable(declaration) => {
                if declaration.declarations.len() != 1 {
                    return Err(self.error_at(
                        declaration.data.span,
                        &messages::ONLY_A_SINGLE_VARIABLE_DECLARATION_IS_ALLOWED_IN_A_FOR_IN_STATEMENT,
                        &[],
                    ));
                }
                if declaration.declarations[0].init.is_some() {
                    return Err(self.error_at(
                        declaration.data.span,
                        &messages::UNSUPPORTED_SYNTAX_0,
                        &["An initializer in a 'for...in' or 'for...of' head"],
                    ));
                }
                Ok(ForHead::Variable(declaration))
            }
            ForInit::Expression(target) => {
                if !target.is_assignment_target() {
                    return Err(self.error_at(
                        target.span(),
                        &messages::INVALID_LEFT_HAND_SIDE_IN_FOR_IN,
                        &[],
                    ));
                }
                Ok(ForHead::Target(target))
            }
        }
    }

    fn parse_jump_statement(&mut self, is_continue: bool) -> ParseResult<Statement> {
        let start = self.token_pos();
        self.next_token()?;
        let label = if self.current_token().is_identifier_or_contextual_keyword()
            && !self.scanner.has_preceding_line_break()
        {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        self.parse_semicolon()?;

        let data = self.node_data(start);
        self.check_jump_target(is_continue, label.as_ref(), data.span)?;
        let jump = JumpStatement { data, label };
        Ok(if is_continue {
            Statement::Continue(jump)
        } else {
            Statement::Break(jump)
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        if !self.context.in_function {
            return Err(self.error(
                &messages::A_RETURN_STATEMENT_CAN_ONLY_BE_USED_WITHIN_A_FUNCTION_BODY,
                &[],
            ));
        }
        let start = self.token_pos();
        self.next_token()?;
        let argument = if self.current_token() != SyntaxKind::SemicolonToken && !self.can_insert_semicolon() {
            Some(self.allow_in_and(|p| p.parse_expression())?)
        } else {
            None
        };
        self.parse_semicolon()?;
        Ok(Statement::Return(ReturnStatement {
            data: self.node_data(start),
            argument,
        }))
    }

    fn parse_throw_statement(&mut self) -> ParseResult<Statement> {
        let start = self.token_pos();
        self.next_token()?;
        if self.scanner.has_preceding_line_break() {
            return Err(self.error(&messages::LINE_BREAK_NOT_PERMITTED_HERE, &[]));
        }
        let argument = self.allow_in_and(|p| p.parse_expression())?;
        self.parse_semicolon()?;
        Ok(Statement::Throw(ThrowStatement {
            data: self.node_data(start),
            argument,
        }))
    }

    fn parse_with_statement(&mut self) -> ParseResult<Statement> {
        let start = self.token_pos();
        self.next_token()?;
        let object = self.parse_parenthesized_condition()?;
        let body = Box::new(self.parse_statement(false)?);
        Ok(Statement::With(WithStatement {
            data: self.node_data(start),
            object,
            body,
        }))
    }

    fn parse_switch_statement(&mut self) -> ParseResult<Statement> {
        let start = self.token_pos();
        self.next_token()?;
        let discriminant = self.parse_parenthesized_condition()?;
        self.expect_token(SyntaxKind::OpenBraceToken)?;

        self.context.switch_depth += 1;
        let cases = self.parse_case_clauses();
        self.context.switch_depth -= 1;
        let cases = cases?;

        self.expect_token(SyntaxKind::CloseBraceToken)?;
        Ok(Statement::Switch(SwitchStatement {
            data: self.node_data(start),
            discriminant,
            cases,
        }))
    }

    fn parse_case_clauses(&mut self) -> ParseResult<Vec<SwitchCase>> {
        let mut cases = Vec::new();
        let mut seen_default = false;
        while self.current_token() != SyntaxKind::CloseBraceToken {
            let start = self.token_pos();
            let test = match self.current_token() {
                SyntaxKind::CaseKeyword => {
                    self.next_token()?;
                    Some(self.allow_in_and(|p| p.parse_expression())?)
                }
                SyntaxKind::DefaultKeyword => {
                    if seen_default {
                        return Err(self.error(&messages::MULTIPLE_DEFAULT_CLAUSES, &[]));
                    }
                    seen_default = true;
                    self.next_token()?;
                    None
                }
                _ => return Err(self.expected("case")),
            };
            self.expect_token(SyntaxKind::ColonToken)?;

            let mut consequent = Vec::new();
            while !matches!(
                self.current_token(),
                SyntaxKind::CaseKeyword
                    | SyntaxKind::DefaultKeyword
                    | SyntaxKind::CloseBraceToken
                    | SyntaxKind::EndOfFileToken
            ) {
                consequent.push(self.parse_statement_list_item()?);
            }
            cases.push(SwitchCase {
                data: self.node_data(start),
                test,
                consequent,
            });
        }
        Ok(cases)
    }

    fn parse_try_statement(&mut self) -> ParseResult<Statement> {
        let start = self.token_pos();
        self.next_token()?;
        let block = self.parse_block()?;

        let handler = if self.current_token() == SyntaxKind::CatchKeyword {
            let catch_start = self.token_pos();
            self.next_token()?;
            if self.current_token() != SyntaxKind::OpenParenToken {
                return Err(self.unsupported("A catch clause without a binding"));
            }
            self.next_token()?;
            let param = self.parse_binding_identifier()?;
            self.expect_token(SyntaxKind::CloseParenToken)?;
            let body = self.parse_block()?;
            Some(CatchClause {
                data: self.node_data(catch_start),
                param,
                body,
            })
        } else {
            None
        };

        let finalizer = if self.optional_token(SyntaxKind::FinallyKeyword)? {
            Some(self.parse_block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return Err(self.error(&messages::CATCH_CLAUSE_OR_FINALLY_EXPECTED, &[]));
        }

        Ok(Statement::Try(TryStatement {
            data: self.node_data(start),
            block,
            handler,
            finalizer,
        }))
    }

    fn parse_labeled_statement(&mut self, pending_labels: usize) -> ParseResult<Statement> {
        let start = self.token_pos();
        let label = self.parse_identifier()?;
        if self.context.find_label(&label.name).is_some() {
            return Err(self.error_at(label.data.span, &messages::DUPLICATE_LABEL_0, &[&label.name]));
        }
        self.expect_token(SyntaxKind::ColonToken)?;

        self.context.labels.push(Label {
            name: label.name.clone(),
            is_iteration: false,
        });
        self.context.pending_labels = pending_labels + 1;
        let body = self.parse_statement(false);
        self.context.labels.pop();

        Ok(Statement::Labeled(LabeledStatement {
            data: self.node_data(start),
            label,
            body: Box::new(body?),
        }))
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// Parse `function name(params) { body }`. The name is required for
    /// declarations and optional for expressions.
    fn parse_function(&mut self, is_declaration: bool) -> ParseResult<Function> {
        let start = self.token_pos();
        self.next_token()?;
        if self.current_token() == SyntaxKind::AsteriskToken {
            return Err(self.unsupported("A generator function"));
        }
        let name = if is_declaration || self.current_token() != SyntaxKind::OpenParenToken {
            Some(self.parse_binding_identifier()?)
        } else {
            None
        };
        let params = self.parse_parameter_list()?;
        let body = self.parse_function_body()?;
        Ok(Function {
            data: self.node_data(start),
            name,
            params,
            body,
            scope: None,
        })
    }

    fn parse_parameter_list(&mut self) -> ParseResult<Vec<Identifier>> {
        self.expect_token(SyntaxKind::OpenParenToken)?;
        let mut params = Vec::new();
        if self.current_token() != SyntaxKind::CloseParenToken {
            loop {
                params.push(self.parse_binding_identifier()?);
                if self.current_token() == SyntaxKind::EqualsToken {
                    return Err(self.unsupported("A default parameter value"));
                }
                if !self.optional_token(SyntaxKind::CommaToken)? {
                    break;
                }
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken)?;
        Ok(params)
    }

    fn parse_function_body(&mut self) -> ParseResult<FunctionBody> {
        let start = self.token_pos();
        self.expect_token(SyntaxKind::OpenBraceToken)?;
        self.enter_function_context();
        let statements = self.allow_in_and(|p| p.parse_statements_until_close_brace());
        self.exit_function_context();
        let statements = statements?;
        self.expect_token(SyntaxKind::CloseBraceToken)?;
        Ok(FunctionBody {
            data: self.node_data(start),
            statements,
        })
    }

    // ========================================================================
    // Names
    // ========================================================================

    fn parse_identifier(&mut self) -> ParseResult<Identifier> {
        if !self.current_token().is_identifier_or_contextual_keyword() {
            return Err(self.identifier_expected());
        }
        let identifier = Identifier::new(self.scanner.token_value(), self.token_span());
        self.next_token()?;
        Ok(identifier)
    }

    fn parse_binding_identifier(&mut self) -> ParseResult<Identifier> {
        if matches!(
            self.current_token(),
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken
        ) {
            return Err(self.unsupported("A destructuring pattern"));
        }
        self.parse_identifier()
    }

    /// A property name after `.`; reserved words are allowed here.
    fn parse_identifier_name(&mut self) -> ParseResult<Identifier> {
        if !self.current_token().is_identifier_name() {
            return Err(self.identifier_expected());
        }
        let identifier = Identifier::new(self.scanner.token_value(), self.token_span());
        self.next_token()?;
        Ok(identifier)
    }

    // ========================================================================
    // Expression parsing
    // ========================================================================

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos();
        let first = self.parse_assignment_expression()?;
        if self.current_token() != SyntaxKind::CommaToken {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.optional_token(SyntaxKind::CommaToken)? {
            expressions.push(self.parse_assignment_expression()?);
        }
        Ok(Expression::Sequence(SequenceExpression {
            data: self.node_data(start),
            expressions,
        }))
    }

    fn parse_assignment_expression(&mut self) -> ParseResult<Expression> {
        self.enter_recursion()?;
        let result = self.parse_assignment_expression_worker();
        self.recursion_depth -= 1;
        result
    }

    fn parse_assignment_expression_worker(&mut self) -> ParseResult<Expression> {
        if let Some(arrow) = self.try_parse_arrow_function()? {
            return Ok(Expression::Arrow(Box::new(arrow)));
        }

        let start = self.token_pos();
        let expression = self.parse_conditional_expression()?;

        let token = self.current_token();
        if token == SyntaxKind::EqualsGreaterThanToken {
            return Err(self.unsupported("An arrow function parameter other than a plain identifier"));
        }
        let Some(operator) = assignment_operator(token) else {
            if let Some(feature) = unsupported_feature(token).filter(|_| token.is_assignment_operator()) {
                return Err(self.unsupported(feature));
            }
            return Ok(expression);
        };
        if !expression.is_assignment_target() {
            return Err(self.error_at(
                expression.span(),
                &messages::INVALID_LEFT_HAND_SIDE_IN_ASSIGNMENT,
                &[],
            ));
        }
        self.next_token()?;
        let value = self.parse_assignment_expression()?;
        Ok(Expression::Assignment(AssignmentExpression {
            data: self.node_data(start),
            operator,
            target: Box::new(expression),
            value: Box::new(value),
        }))
    }

    fn try_parse_arrow_function(&mut self) -> ParseResult<Option<ArrowFunction>> {
        let token = self.current_token();
        if token == SyntaxKind::AsyncKeyword && self.is_async_function() {
            return Err(self.unsupported("An async function"));
        }

        let start = self.token_pos();
        if token.is_identifier_or_contextual_keyword() && self.next_token_is_arrow() {
            let param = self.parse_identifier()?;
            return self.parse_arrow_function_rest(start, vec![param]).map(Some);
        }
        if token == SyntaxKind::OpenParenToken && self.is_parenthesized_arrow_function() {
            let params = self.parse_parameter_list()?;
            return self.parse_arrow_function_rest(start, params).map(Some);
        }
        Ok(None)
    }

    fn next_token_is_arrow(&mut self) -> bool {
        self.look_ahead(|scanner| scanner.scan() == SyntaxKind::EqualsGreaterThanToken)
    }

    /// Whether `(` starts `(a, b) =>`. Only identifier parameter lists are
    /// recognized; anything else parses as a parenthesized expression.
    fn is_parenthesized_arrow_function(&mut self) -> bool {
        self.look_ahead(|scanner| {
            let mut token = scanner.scan();
            if token != SyntaxKind::CloseParenToken {
                loop {
                    if !token.is_identifier_or_contextual_keyword() {
                        return false;
                    }
                    match scanner.scan() {
                        SyntaxKind::CommaToken => token = scanner.scan(),
                        SyntaxKind::CloseParenToken => break,
                        _ => return false,
                    }
                }
            }
            scanner.scan() == SyntaxKind::EqualsGreaterThanToken
        })
    }

    fn parse_arrow_function_rest(&mut self, start: TextPos, params: Vec<Identifier>) -> ParseResult<ArrowFunction> {
        if self.scanner.has_preceding_line_break() {
            return Err(self.error(&messages::LINE_BREAK_NOT_PERMITTED_HERE, &[]));
        }
        self.expect_token(SyntaxKind::EqualsGreaterThanToken)?;
        let body = if self.current_token() == SyntaxKind::OpenBraceToken {
            ArrowBody::Block(self.parse_function_body()?)
        } else {
            ArrowBody::Expression(Box::new(self.parse_assignment_expression()?))
        };
        Ok(ArrowFunction {
            data: self.node_data(start),
            params,
            body,
            scope: None,
        })
    }

    fn parse_conditional_expression(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos();
        let test = self.parse_binary_expression(Precedence::Conditional)?;
        if !self.optional_token(SyntaxKind::QuestionToken)? {
            return Ok(test);
        }
        let consequent = self.allow_in_and(|p| p.parse_assignment_expression())?;
        self.expect_token(SyntaxKind::ColonToken)?;
        let alternate = self.parse_assignment_expression()?;
        Ok(Expression::Conditional(ConditionalExpression {
            data: self.node_data(start),
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }))
    }

    /// Precedence climbing: consume operators that bind tighter than
    /// `precedence`. `**` is right-associative.
    fn parse_binary_expression(&mut self, precedence: Precedence) -> ParseResult<Expression> {
        let start = self.token_pos();
        let leading_unary = unary_operator(self.current_token());
        let mut left = self.parse_unary_expression()?;
        let mut left_is_bare_unary = leading_unary.is_some();

        loop {
            let token = self.current_token();
            if token == SyntaxKind::QuestionQuestionToken {
                return Err(self.unsupported("Nullish coalescing"));
            }
            if token == SyntaxKind::InKeyword && self.disallow_in {
                break;
            }
            let Some(operator) = infix_operator(token) else {
                break;
            };
            let new_precedence = operator.precedence();
            let consume = if token == SyntaxKind::AsteriskAsteriskToken {
                new_precedence >= precedence
            } else {
                new_precedence > precedence
            };
            if !consume {
                break;
            }
            if token == SyntaxKind::AsteriskAsteriskToken && left_is_bare_unary {
                let operator_text = leading_unary.map(|op| op.as_str()).unwrap_or_default();
                return Err(self.error_at(
                    left.span(),
                    &messages::UNARY_OPERATOR_NOT_ALLOWED_BEFORE_EXPONENTIATION_0,
                    &[operator_text],
                ));
            }

            self.next_token()?;
            self.enter_recursion()?;
            let right = self.parse_binary_expression(new_precedence);
            self.recursion_depth -= 1;
            let right = right?;
            let data = self.node_data(start);
            left = match operator {
                InfixOperator::Binary(operator) => Expression::Binary(BinaryExpression {
                    data,
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                }),
                InfixOperator::Logical(operator) => Expression::Logical(LogicalExpression {
                    data,
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                }),
            };
            left_is_bare_unary = false;
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos();
        let token = self.current_token();

        if let Some(operator) = unary_operator(token) {
            self.next_token()?;
            let operand = self.parse_unary_operand()?;
            return Ok(Expression::Unary(UnaryExpression {
                data: self.node_data(start),
                operator,
                operand: Box::new(operand),
            }));
        }

        if let Some(operator) = update_operator(token) {
            self.next_token()?;
            let operand = self.parse_unary_operand()?;
            self.check_update_operand(&operand)?;
            return Ok(Expression::Update(UpdateExpression {
                data: self.node_data(start),
                operator,
                prefix: true,
                operand: Box::new(operand),
            }));
        }

        self.parse_postfix_expression()
    }

    fn parse_unary_operand(&mut self) -> ParseResult<Expression> {
        self.enter_recursion()?;
        let operand = self.parse_unary_expression();
        self.recursion_depth -= 1;
        operand
    }

    fn parse_postfix_expression(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos();
        let expression = self.parse_left_hand_side_expression()?;

        match update_operator(self.current_token()) {
            Some(operator) if !self.scanner.has_preceding_line_break() => {
                self.check_update_operand(&expression)?;
                self.next_token()?;
                Ok(Expression::Update(UpdateExpression {
                    data: self.node_data(start),
                    operator,
                    prefix: false,
                    operand: Box::new(expression),
                }))
            }
            _ => Ok(expression),
        }
    }

    fn check_update_operand(&self, operand: &Expression) -> ParseResult<()> {
        if operand.is_assignment_target() {
            Ok(())
        } else {
            Err(self.error_at(
                operand.span(),
                &messages::INVALID_OPERAND_OF_INCREMENT_OR_DECREMENT,
                &[],
            ))
        }
    }

    fn parse_left_hand_side_expression(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos();
        let expression = if self.current_token() == SyntaxKind::NewKeyword {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        self.parse_member_and_call_tail(start, expression, true)
    }

    /// `new C(args)` or `new C`. Member accesses bind to the callee; the
    /// first argument list belongs to the `new`.
    fn parse_new_expression(&mut self) -> ParseResult<Expression> {
        self.enter_recursion()?;
        let start = self.token_pos();
        self.next_token()?;
        if self.current_token() == SyntaxKind::DotToken {
            return Err(self.unsupported("'new.target'"));
        }

        let callee_start = self.token_pos();
        let callee = if self.current_token() == SyntaxKind::NewKeyword {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        let callee = self.parse_member_and_call_tail(callee_start, callee, false)?;
        let arguments = if self.current_token() == SyntaxKind::OpenParenToken {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        self.recursion_depth -= 1;

        Ok(Expression::New(NewExpression {
            data: self.node_data(start),
            callee: Box::new(callee),
            arguments,
        }))
    }

    fn parse_member_and_call_tail(
        &mut self,
        start: TextPos,
        mut expression: Expression,
        allow_calls: bool,
    ) -> ParseResult<Expression> {
        loop {
            expression = match self.current_token() {
                SyntaxKind::DotToken => {
                    self.next_token()?;
                    let name = self.parse_identifier_name()?;
                    Expression::Member(MemberExpression {
                        data: self.node_data(start),
                        object: Box::new(expression),
                        property: MemberProperty::Named(name),
                    })
                }
                SyntaxKind::OpenBracketToken => {
                    self.next_token()?;
                    let property = self.allow_in_and(|p| p.parse_expression())?;
                    self.expect_token(SyntaxKind::CloseBracketToken)?;
                    Expression::Member(MemberExpression {
                        data: self.node_data(start),
                        object: Box::new(expression),
                        property: MemberProperty::Computed(Box::new(property)),
                    })
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    let arguments = self.parse_arguments()?;
                    Expression::Call(CallExpression {
                        data: self.node_data(start),
                        callee: Box::new(expression),
                        arguments,
                    })
                }
                SyntaxKind::QuestionDotToken => return Err(self.unsupported("Optional chaining")),
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    return Err(self.unsupported("A tagged template"))
                }
                _ => return Ok(expression),
            };
        }
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        self.expect_token(SyntaxKind::OpenParenToken)?;
        let mut arguments = Vec::new();
        if self.current_token() != SyntaxKind::CloseParenToken {
            loop {
                arguments.push(self.allow_in_and(|p| p.parse_assignment_expression())?);
                if !self.optional_token(SyntaxKind::CommaToken)? {
                    break;
                }
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken)?;
        Ok(arguments)
    }

    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos();
        let token = self.current_token();
        match token {
            SyntaxKind::ThisKeyword => {
                self.next_token()?;
                Ok(Expression::This(self.node_data(start)))
            }
            SyntaxKind::NullKeyword => {
                self.next_token()?;
                Ok(Expression::Null(self.node_data(start)))
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                self.next_token()?;
                Ok(Expression::Boolean(BooleanLiteral {
                    data: self.node_data(start),
                    value: token == SyntaxKind::TrueKeyword,
                }))
            }
            SyntaxKind::NumericLiteral => Ok(Expression::Number(self.parse_numeric_literal()?)),
            SyntaxKind::StringLiteral => Ok(Expression::String(self.parse_string_literal()?)),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => self.parse_regular_expression(),
            SyntaxKind::OpenParenToken => {
                self.next_token()?;
                let expression = self.allow_in_and(|p| p.parse_expression())?;
                self.expect_token(SyntaxKind::CloseParenToken)?;
                Ok(expression)
            }
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => {
                let function = self.parse_function(false)?;
                Ok(Expression::Function(Box::new(function)))
            }
            _ if token.is_identifier_or_contextual_keyword() => {
                Ok(Expression::Identifier(self.parse_identifier()?))
            }
            _ => Err(match unsupported_feature(token) {
                Some(feature) => self.unsupported(feature),
                None => self.error(&messages::EXPRESSION_EXPECTED, &[]),
            }),
        }
    }

    fn parse_numeric_literal(&mut self) -> ParseResult<NumericLiteral> {
        let start = self.token_pos();
        let raw = self.scanner.token_text();
        let value = numeric_value(raw, self.scanner.token_flags());
        self.next_token()?;
        Ok(NumericLiteral {
            data: self.node_data(start),
            value,
            raw: raw.to_string(),
        })
    }

    fn parse_string_literal(&mut self) -> ParseResult<StringLiteral> {
        let start = self.token_pos();
        let value = self.scanner.token_value().to_string();
        let raw = self.scanner.token_text().to_string();
        self.next_token()?;
        Ok(StringLiteral {
            data: self.node_data(start),
            value,
            raw,
        })
    }

    fn parse_regular_expression(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos();
        self.scanner.rescan_slash_token();
        self.check_scanner_diagnostics()?;

        let text = self.scanner.token_value();
        let (pattern, flags) = match text.rfind('/') {
            Some(end) if end > 0 => (&text[1..end], &text[end + 1..]),
            _ => (text, ""),
        };
        let literal = RegExpLiteral {
            data: NodeData::default(),
            pattern: pattern.to_string(),
            flags: flags.to_string(),
        };
        self.next_token()?;
        Ok(Expression::RegExp(RegExpLiteral {
            data: self.node_data(start),
            ..literal
        }))
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos();
        self.next_token()?;
        let mut elements = Vec::new();
        loop {
            match self.current_token() {
                SyntaxKind::CloseBracketToken => break,
                SyntaxKind::CommaToken => {
                    self.next_token()?;
                    elements.push(None);
                    continue;
                }
                _ => {}
            }
            elements.push(Some(self.allow_in_and(|p| p.parse_assignment_expression())?));
            if self.current_token() != SyntaxKind::CloseBracketToken {
                self.expect_token(SyntaxKind::CommaToken)?;
            }
        }
        self.expect_token(SyntaxKind::CloseBracketToken)?;
        Ok(Expression::Array(ArrayLiteral {
            data: self.node_data(start),
            elements,
        }))
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expression> {
        let start = self.token_pos();
        self.next_token()?;
        let mut properties = Vec::new();
        while self.current_token() != SyntaxKind::CloseBraceToken {
            properties.push(self.parse_object_property()?);
            if self.current_token() != SyntaxKind::CloseBraceToken {
                self.expect_token(SyntaxKind::CommaToken)?;
            }
        }
        self.expect_token(SyntaxKind::CloseBraceToken)?;
        Ok(Expression::Object(ObjectLiteral {
            data: self.node_data(start),
            properties,
        }))
    }

    fn parse_object_property(&mut self) -> ParseResult<Property> {
        let start = self.token_pos();
        let token = self.current_token();

        if matches!(token, SyntaxKind::GetKeyword | SyntaxKind::SetKeyword) && self.next_token_is_property_key() {
            self.next_token()?;
            let key = self.parse_property_key()?;
            let function = self.parse_accessor(token == SyntaxKind::GetKeyword)?;
            let value = if token == SyntaxKind::GetKeyword {
                PropertyValue::Get(Box::new(function))
            } else {
                PropertyValue::Set(Box::new(function))
            };
            return Ok(Property {
                data: self.node_data(start),
                key,
                value,
            });
        }

        let key = self.parse_property_key()?;
        match self.current_token() {
            SyntaxKind::ColonToken => {
                self.next_token()?;
                let value = self.allow_in_and(|p| p.parse_assignment_expression())?;
                Ok(Property {
                    data: self.node_data(start),
                    key,
                    value: PropertyValue::Init(value),
                })
            }
            SyntaxKind::OpenParenToken => Err(self.unsupported("A method definition")),
            SyntaxKind::CommaToken | SyntaxKind::CloseBraceToken | SyntaxKind::EqualsToken
                if matches!(key, PropertyKey::Identifier(_)) =>
            {
                Err(self.unsupported("A shorthand property"))
            }
            _ => Err(self.expected(":")),
        }
    }

    fn next_token_is_property_key(&mut self) -> bool {
        self.look_ahead(|scanner| {
            let next = scanner.scan();
            next.is_identifier_name()
                || matches!(next, SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral)
        })
    }

    fn parse_property_key(&mut self) -> ParseResult<PropertyKey> {
        match self.current_token() {
            SyntaxKind::StringLiteral => Ok(PropertyKey::String(self.parse_string_literal()?)),
            SyntaxKind::NumericLiteral => Ok(PropertyKey::Number(self.parse_numeric_literal()?)),
            SyntaxKind::OpenBracketToken => Err(self.unsupported("A computed property name")),
            SyntaxKind::AsteriskToken => Err(self.unsupported("A generator method")),
            _ => Ok(PropertyKey::Identifier(self.parse_identifier_name()?)),
        }
    }

    /// The parameter list and body of `get k() {}` or `set k(v) {}`.
    fn parse_accessor(&mut self, is_getter: bool) -> ParseResult<Function> {
        let start = self.token_pos();
        self.expect_token(SyntaxKind::OpenParenToken)?;
        let mut params = Vec::new();
        if !is_getter {
            params.push(self.parse_binding_identifier()?);
        }
        self.expect_token(SyntaxKind::CloseParenToken)?;
        let body = self.parse_function_body()?;
        Ok(Function {
            data: self.node_data(start),
            name: None,
            params,
            body,
            scope: None,
        })
    }
}

fn update_operator(kind: SyntaxKind) -> Option<UpdateOperator> {
    match kind {
        SyntaxKind::PlusPlusToken => Some(UpdateOperator::Increment),
        SyntaxKind::MinusMinusToken => Some(UpdateOperator::Decrement),
        _ => None,
    }
}
