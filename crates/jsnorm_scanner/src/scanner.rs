//! The JavaScript scanner/lexer.
//!
//! Converts source text into the stream of tokens the parser consumes. The
//! scanner walks bytes and only decodes a full `char` when it meets a
//! non-ASCII byte. Errors are collected as diagnostics; the parser stops at
//! the first one.

use crate::char_codes::*;
use jsnorm_ast::syntax_kind::SyntaxKind;
use jsnorm_ast::types::TokenFlags;
use jsnorm_core::text::TextSpan;
use jsnorm_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};

/// Saved scanner state for lookahead.
#[derive(Debug, Clone)]
pub struct ScannerState {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    diagnostic_count: usize,
}

/// The scanner converts JavaScript source text into tokens.
pub struct Scanner<'a> {
    /// The source text being scanned.
    text: &'a str,
    /// Current byte position in the text.
    pos: usize,
    /// Start of the current token (after leading trivia).
    token_start: usize,
    /// The current token kind.
    token: SyntaxKind,
    /// Cooked value of the current token: identifier name with escapes
    /// resolved, string contents, or the raw text of numbers and regexes.
    token_value: String,
    /// Token flags for the current token.
    token_flags: TokenFlags,
    /// Accumulated diagnostics.
    diagnostics: DiagnosticCollection,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source text.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Look ahead: save state, call f, restore state and return the result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    /// Get the current token kind.
    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Get the current token's cooked value.
    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Get the current token's source text.
    #[inline]
    pub fn token_text(&self) -> &'a str {
        self.text.get(self.token_start..self.pos).unwrap_or("")
    }

    /// Get the start position of the current token (after trivia).
    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Get the current position (end of current token).
    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn token_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.token_start as u32, self.pos as u32)
    }

    /// Get the current token flags.
    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    /// Whether the current token was preceded by a line break.
    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    /// Get the accumulated diagnostics.
    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Save the full scanner state for lookahead.
    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    /// Restore the full scanner state, dropping diagnostics reported since.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
        self.diagnostics.truncate(state.diagnostic_count);
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Look at the character at the current position without advancing.
    #[inline]
    fn current_char(&self) -> Option<char> {
        let byte = *self.text.as_bytes().get(self.pos)?;
        if byte.is_ascii() {
            Some(byte as char)
        } else {
            self.text.get(self.pos..)?.chars().next()
        }
    }

    /// Look at the byte at position pos + offset.
    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    /// Advance past the character at the current position.
    #[inline]
    fn advance(&mut self, ch: char) {
        self.pos += ch.len_utf8();
    }

    fn error(&mut self, start: usize, message: &DiagnosticMessage) {
        let span = TextSpan::from_bounds(start as u32, self.pos.max(start) as u32);
        self.diagnostics.add(Diagnostic::with_span(span, message, &[]));
    }

    /// Skip whitespace and comments (trivia), setting token_flags for line breaks.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char() {
            match ch {
                c if is_line_break(c) => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.advance(c);
                }
                '/' if self.byte_at(1) == Some(b'/') => {
                    self.pos += 2;
                    while let Some(c) = self.current_char() {
                        if is_line_break(c) {
                            break;
                        }
                        self.advance(c);
                    }
                }
                '/' if self.byte_at(1) == Some(b'*') => self.skip_block_comment(),
                c if is_white_space_single_line(c) => self.advance(c),
                _ => return,
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.pos;
        self.pos += 2;
        loop {
            match self.current_char() {
                None => {
                    self.error(start, &messages::ASTERISK_SLASH_EXPECTED);
                    return;
                }
                Some('*') if self.byte_at(1) == Some(b'/') => {
                    self.pos += 2;
                    return;
                }
                Some(c) => {
                    if is_line_break(c) {
                        self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    }
                    self.advance(c);
                }
            }
        }
    }

    #[inline]
    fn punct(&mut self, len: usize, kind: SyntaxKind) -> SyntaxKind {
        self.pos += len;
        kind
    }

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();

        self.skip_trivia();
        self.token_start = self.pos;

        let Some(ch) = self.current_char() else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };

        self.token = match ch {
            '(' => self.punct(1, SyntaxKind::OpenParenToken),
            ')' => self.punct(1, SyntaxKind::CloseParenToken),
            '{' => self.punct(1, SyntaxKind::OpenBraceToken),
            '}' => self.punct(1, SyntaxKind::CloseBraceToken),
            '[' => self.punct(1, SyntaxKind::OpenBracketToken),
            ']' => self.punct(1, SyntaxKind::CloseBracketToken),
            ';' => self.punct(1, SyntaxKind::SemicolonToken),
            ',' => self.punct(1, SyntaxKind::CommaToken),
            '~' => self.punct(1, SyntaxKind::TildeToken),
            ':' => self.punct(1, SyntaxKind::ColonToken),
            '@' => self.punct(1, SyntaxKind::AtToken),
            '#' => self.punct(1, SyntaxKind::HashToken),

            '.' => self.scan_dot(),
            '?' => self.scan_question(),
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),
            '=' => self.scan_equals(),
            '!' => self.scan_exclamation(),
            '+' => self.scan_plus_or_minus(b'+'),
            '-' => self.scan_plus_or_minus(b'-'),
            '*' => self.scan_asterisk(),
            '/' => self.scan_with_equals(SyntaxKind::SlashToken, SyntaxKind::SlashEqualsToken),
            '%' => self.scan_with_equals(SyntaxKind::PercentToken, SyntaxKind::PercentEqualsToken),
            '^' => self.scan_with_equals(SyntaxKind::CaretToken, SyntaxKind::CaretEqualsToken),
            '&' => self.scan_ampersand_or_bar(b'&'),
            '|' => self.scan_ampersand_or_bar(b'|'),

            '\'' | '"' => self.scan_string_literal(ch),
            '`' => self.scan_template_literal(),

            '0'..='9' => self.scan_number(),

            '\\' => self.scan_identifier(),
            _ if is_identifier_start(ch) => self.scan_identifier(),

            _ => {
                let start = self.pos;
                self.advance(ch);
                self.error(start, &messages::INVALID_CHARACTER);
                SyntaxKind::Unknown
            }
        };

        self.token
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn scan_dot(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'.'), Some(b'.')) => self.punct(3, SyntaxKind::DotDotDotToken),
            (Some(b'0'..=b'9'), _) => self.scan_number(),
            _ => self.punct(1, SyntaxKind::DotToken),
        }
    }

    fn scan_question(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'?'), Some(b'=')) => self.punct(3, SyntaxKind::QuestionQuestionEqualsToken),
            (Some(b'?'), _) => self.punct(2, SyntaxKind::QuestionQuestionToken),
            // `a?.5:b` is a conditional, not optional chaining
            (Some(b'.'), next) if !matches!(next, Some(b'0'..=b'9')) => {
                self.punct(2, SyntaxKind::QuestionDotToken)
            }
            _ => self.punct(1, SyntaxKind::QuestionToken),
        }
    }

    fn scan_less_than(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'<'), Some(b'=')) => self.punct(3, SyntaxKind::LessThanLessThanEqualsToken),
            (Some(b'<'), _) => self.punct(2, SyntaxKind::LessThanLessThanToken),
            (Some(b'='), _) => self.punct(2, SyntaxKind::LessThanEqualsToken),
            _ => self.punct(1, SyntaxKind::LessThanToken),
        }
    }

    fn scan_greater_than(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2), self.byte_at(3)) {
            (Some(b'>'), Some(b'>'), Some(b'=')) => {
                self.punct(4, SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken)
            }
            (Some(b'>'), Some(b'>'), _) => {
                self.punct(3, SyntaxKind::GreaterThanGreaterThanGreaterThanToken)
            }
            (Some(b'>'), Some(b'='), _) => {
                self.punct(3, SyntaxKind::GreaterThanGreaterThanEqualsToken)
            }
            (Some(b'>'), _, _) => self.punct(2, SyntaxKind::GreaterThanGreaterThanToken),
            (Some(b'='), _, _) => self.punct(2, SyntaxKind::GreaterThanEqualsToken),
            _ => self.punct(1, SyntaxKind::GreaterThanToken),
        }
    }

    fn scan_equals(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'='), Some(b'=')) => self.punct(3, SyntaxKind::EqualsEqualsEqualsToken),
            (Some(b'='), _) => self.punct(2, SyntaxKind::EqualsEqualsToken),
            (Some(b'>'), _) => self.punct(2, SyntaxKind::EqualsGreaterThanToken),
            _ => self.punct(1, SyntaxKind::EqualsToken),
        }
    }

    fn scan_exclamation(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'='), Some(b'=')) => self.punct(3, SyntaxKind::ExclamationEqualsEqualsToken),
            (Some(b'='), _) => self.punct(2, SyntaxKind::ExclamationEqualsToken),
            _ => self.punct(1, SyntaxKind::ExclamationToken),
        }
    }

    fn scan_plus_or_minus(&mut self, sign: u8) -> SyntaxKind {
        let plus = sign == b'+';
        match self.byte_at(1) {
            Some(b) if b == sign => self.punct(
                2,
                if plus { SyntaxKind::PlusPlusToken } else { SyntaxKind::MinusMinusToken },
            ),
            Some(b'=') => self.punct(
                2,
                if plus { SyntaxKind::PlusEqualsToken } else { SyntaxKind::MinusEqualsToken },
            ),
            _ => self.punct(1, if plus { SyntaxKind::PlusToken } else { SyntaxKind::MinusToken }),
        }
    }

    fn scan_asterisk(&mut self) -> SyntaxKind {
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b'*'), Some(b'=')) => self.punct(3, SyntaxKind::AsteriskAsteriskEqualsToken),
            (Some(b'*'), _) => self.punct(2, SyntaxKind::AsteriskAsteriskToken),
            (Some(b'='), _) => self.punct(2, SyntaxKind::AsteriskEqualsToken),
            _ => self.punct(1, SyntaxKind::AsteriskToken),
        }
    }

    fn scan_with_equals(&mut self, single: SyntaxKind, with_equals: SyntaxKind) -> SyntaxKind {
        if self.byte_at(1) == Some(b'=') {
            self.punct(2, with_equals)
        } else {
            self.punct(1, single)
        }
    }

    fn scan_ampersand_or_bar(&mut self, ch: u8) -> SyntaxKind {
        let amp = ch == b'&';
        match (self.byte_at(1), self.byte_at(2)) {
            (Some(b), Some(b'=')) if b == ch => self.punct(
                3,
                if amp {
                    SyntaxKind::AmpersandAmpersandEqualsToken
                } else {
                    SyntaxKind::BarBarEqualsToken
                },
            ),
            (Some(b), _) if b == ch => self.punct(
                2,
                if amp { SyntaxKind::AmpersandAmpersandToken } else { SyntaxKind::BarBarToken },
            ),
            (Some(b'='), _) => self.punct(
                2,
                if amp { SyntaxKind::AmpersandEqualsToken } else { SyntaxKind::BarEqualsToken },
            ),
            _ => self.punct(1, if amp { SyntaxKind::AmpersandToken } else { SyntaxKind::BarToken }),
        }
    }

    fn scan_string_literal(&mut self, quote: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1; // skip opening quote
        let mut value = String::new();
        loop {
            let Some(ch) = self.current_char() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(start, &messages::UNTERMINATED_STRING_LITERAL);
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\\' {
                self.scan_escape_sequence(&mut value);
                continue;
            }
            if ch == LINE_FEED || ch == CARRIAGE_RETURN {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(start, &messages::UNTERMINATED_STRING_LITERAL);
                break;
            }
            value.push(ch);
            self.advance(ch);
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    /// Scan an escape sequence inside a string literal, appending the cooked
    /// character (if any) to `out`.
    fn scan_escape_sequence(&mut self, out: &mut String) {
        let start = self.pos;
        self.pos += 1; // skip backslash
        let Some(ch) = self.current_char() else {
            return;
        };
        self.advance(ch);
        match ch {
            // Line continuations contribute nothing.
            CARRIAGE_RETURN => {
                if self.byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            LINE_FEED | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => {}
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' if !matches!(self.byte_at(0), Some(b'0'..=b'9')) => out.push('\0'),
            '0'..='7' => {
                // Legacy octal escape: up to three digits, value at most 0o377.
                self.token_flags |= TokenFlags::OCTAL;
                let mut value = ch as u32 - '0' as u32;
                let max_digits = if ch <= '3' { 2 } else { 1 };
                for _ in 0..max_digits {
                    match self.current_char() {
                        Some(d) if is_octal_digit(d) => {
                            value = value * 8 + (d as u32 - '0' as u32);
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            'x' => match self.scan_fixed_hex(2) {
                Some(value) => out.push(char::from_u32(value).unwrap_or('\u{FFFD}')),
                None => self.error(start, &messages::HEXADECIMAL_DIGIT_EXPECTED),
            },
            'u' => {
                let Some(mut value) = self.scan_unicode_escape_body(start) else {
                    return;
                };
                // Combine an escaped surrogate pair into one scalar value.
                if (0xD800..=0xDBFF).contains(&value) {
                    let resume = self.pos;
                    if self.byte_at(0) == Some(b'\\') && self.byte_at(1) == Some(b'u') {
                        self.pos += 2;
                        match self.scan_fixed_hex(4) {
                            Some(low) if (0xDC00..=0xDFFF).contains(&low) => {
                                value = 0x10000 + ((value - 0xD800) << 10) + (low - 0xDC00);
                            }
                            _ => self.pos = resume,
                        }
                    }
                }
                out.push(char::from_u32(value).unwrap_or('\u{FFFD}'));
            }
            other => out.push(other),
        }
    }

    /// Scan exactly `count` hex digits.
    fn scan_fixed_hex(&mut self, count: usize) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..count {
            let digit = self.current_char().and_then(|c| c.to_digit(16))?;
            value = value * 16 + digit;
            self.pos += 1;
        }
        Some(value)
    }

    /// Scan the part of a `\u` escape after the `u`: four hex digits or a
    /// braced code point.
    fn scan_unicode_escape_body(&mut self, start: usize) -> Option<u32> {
        let value = if self.byte_at(0) == Some(b'{') {
            self.pos += 1;
            let mut value = 0u32;
            let mut digits = 0;
            while let Some(d) = self.current_char().and_then(|c| c.to_digit(16)) {
                value = value.saturating_mul(16).saturating_add(d);
                digits += 1;
                self.pos += 1;
            }
            if digits == 0 || value > 0x10FFFF || self.byte_at(0) != Some(b'}') {
                None
            } else {
                self.pos += 1;
                Some(value)
            }
        } else {
            self.scan_fixed_hex(4)
        };
        if value.is_none() {
            self.error(start, &messages::INVALID_UNICODE_ESCAPE);
        }
        value
    }

    /// Templates are outside the accepted grammar; scan just enough to give
    /// the parser a token with a sensible span.
    fn scan_template_literal(&mut self) -> SyntaxKind {
        self.pos += 1; // skip backtick
        loop {
            match self.current_char() {
                None => {
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    return SyntaxKind::NoSubstitutionTemplateLiteral;
                }
                Some('`') => {
                    self.pos += 1;
                    return SyntaxKind::NoSubstitutionTemplateLiteral;
                }
                Some('$') if self.byte_at(1) == Some(b'{') => {
                    self.pos += 2;
                    return SyntaxKind::TemplateHead;
                }
                Some('\\') => {
                    self.pos += 1;
                    if let Some(c) = self.current_char() {
                        self.advance(c);
                    }
                }
                Some(c) => self.advance(c),
            }
        }
    }

    /// Rescan the current `/` or `/=` token as a regex literal (called by the
    /// parser in expression position).
    pub fn rescan_slash_token(&mut self) -> SyntaxKind {
        let start = self.token_start;
        self.pos = start + 1; // after the /
        let mut in_character_class = false;

        loop {
            let Some(ch) = self.current_char() else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(start, &messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL);
                break;
            };
            if is_line_break(ch) {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.error(start, &messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL);
                break;
            }
            self.advance(ch);
            match ch {
                '\\' => {
                    if let Some(next) = self.current_char().filter(|c| !is_line_break(*c)) {
                        self.advance(next);
                    }
                }
                '[' => in_character_class = true,
                ']' => in_character_class = false,
                '/' if !in_character_class => {
                    while let Some(flag) = self.current_char().filter(|c| is_identifier_part(*c)) {
                        self.advance(flag);
                    }
                    break;
                }
                _ => {}
            }
        }

        self.token_value = self.token_text().to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let mut kind = SyntaxKind::NumericLiteral;

        let radix = match (self.byte_at(0), self.byte_at(1)) {
            (Some(b'0'), Some(b'x' | b'X')) => Some((16, TokenFlags::HEX_SPECIFIER)),
            (Some(b'0'), Some(b'b' | b'B')) => Some((2, TokenFlags::BINARY_SPECIFIER)),
            (Some(b'0'), Some(b'o' | b'O')) => Some((8, TokenFlags::OCTAL_SPECIFIER)),
            _ => None,
        };

        if let Some((radix, flag)) = radix {
            self.pos += 2;
            self.token_flags |= flag;
            if !self.scan_digits(|c| c.is_digit(radix)) {
                let message = if radix == 16 {
                    &messages::HEXADECIMAL_DIGIT_EXPECTED
                } else {
                    &messages::DIGIT_EXPECTED
                };
                self.error(start, message);
            }
        } else if self.byte_at(0) == Some(b'0') && matches!(self.byte_at(1), Some(b'0'..=b'9')) {
            // Legacy octal (`017`), or a decimal with a leading zero (`089`).
            self.pos += 1;
            let digits_start = self.pos;
            self.scan_digits(is_digit);
            let all_octal = self.text[digits_start..self.pos].chars().all(is_octal_digit);
            if all_octal {
                self.token_flags |= TokenFlags::OCTAL;
            } else {
                self.scan_decimal_tail(start);
            }
        } else {
            self.scan_digits(is_digit);
            self.scan_decimal_tail(start);
        }

        if self.byte_at(0) == Some(b'n') {
            self.pos += 1;
            kind = SyntaxKind::BigIntLiteral;
        }

        if self
            .current_char()
            .is_some_and(|c| is_identifier_start(c) || is_digit(c) || c == '\\')
        {
            self.error(start, &messages::AN_IDENTIFIER_OR_KEYWORD_CANNOT_IMMEDIATELY_FOLLOW_A_NUMERIC_LITERAL);
        }

        self.token_value = self.token_text_from(start).to_string();
        kind
    }

    /// Fraction and exponent of a decimal literal.
    fn scan_decimal_tail(&mut self, start: usize) {
        if self.byte_at(0) == Some(b'.') {
            self.pos += 1;
            self.scan_digits(is_digit);
        }
        if matches!(self.byte_at(0), Some(b'e' | b'E')) {
            self.pos += 1;
            self.token_flags |= TokenFlags::SCIENTIFIC;
            if matches!(self.byte_at(0), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if !self.scan_digits(is_digit) {
                self.error(start, &messages::DIGIT_EXPECTED);
            }
        }
    }

    /// Consume ASCII digits accepted by `pred`; returns whether any were found.
    fn scan_digits(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let start = self.pos;
        while let Some(b) = self.byte_at(0) {
            if b.is_ascii() && pred(b as char) {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.pos > start
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        let mut name = String::new();
        loop {
            match self.current_char() {
                Some('\\') => {
                    let escape_start = self.pos;
                    self.token_flags |= TokenFlags::UNICODE_ESCAPE;
                    self.pos += 1;
                    if self.byte_at(0) != Some(b'u') {
                        self.error(escape_start, &messages::INVALID_UNICODE_ESCAPE);
                        break;
                    }
                    self.pos += 1;
                    let Some(value) = self.scan_unicode_escape_body(escape_start) else {
                        break;
                    };
                    match char::from_u32(value) {
                        Some(c) if (name.is_empty() && is_identifier_start(c))
                            || (!name.is_empty() && is_identifier_part(c)) =>
                        {
                            name.push(c)
                        }
                        _ => {
                            self.error(escape_start, &messages::INVALID_UNICODE_ESCAPE);
                            break;
                        }
                    }
                }
                Some(c)
                    if (name.is_empty() && is_identifier_start(c))
                        || (!name.is_empty() && is_identifier_part(c)) =>
                {
                    name.push(c);
                    self.advance(c);
                }
                _ => break,
            }
        }

        if self.pos == start {
            // A lone backslash.
            self.pos += 1;
            self.error(start, &messages::INVALID_CHARACTER);
            return SyntaxKind::Unknown;
        }

        // Escaped names never spell keywords.
        let keyword = if self.token_flags.contains(TokenFlags::UNICODE_ESCAPE) {
            None
        } else {
            SyntaxKind::from_keyword(&name)
        };
        self.token_value = name;
        keyword.unwrap_or(SyntaxKind::Identifier)
    }

    fn token_text_from(&self, start: usize) -> &'a str {
        self.text.get(start..self.pos).unwrap_or("")
    }
}

/// Compute the numeric value of a numeric literal's source text.
pub fn numeric_value(raw: &str, flags: TokenFlags) -> f64 {
    fn radix_value(digits: &str, radix: u32) -> f64 {
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d))
    }

    if flags.contains(TokenFlags::HEX_SPECIFIER) {
        radix_value(raw.get(2..).unwrap_or(""), 16)
    } else if flags.contains(TokenFlags::BINARY_SPECIFIER) {
        radix_value(raw.get(2..).unwrap_or(""), 2)
    } else if flags.contains(TokenFlags::OCTAL_SPECIFIER) {
        radix_value(raw.get(2..).unwrap_or(""), 8)
    } else if flags.contains(TokenFlags::OCTAL) {
        radix_value(raw.get(1..).unwrap_or(""), 8)
    } else {
        raw.parse::<f64>().unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<SyntaxKind> {
        let mut scanner = Scanner::new(source);
        let mut out = Vec::new();
        loop {
            let kind = scanner.scan();
            if kind == SyntaxKind::EndOfFileToken {
                break;
            }
            out.push(kind);
        }
        out
    }

    #[test]
    fn test_scan_simple_tokens() {
        assert_eq!(
            kinds("( ) { } [ ] ; ,"),
            vec![
                SyntaxKind::OpenParenToken,
                SyntaxKind::CloseParenToken,
                SyntaxKind::OpenBraceToken,
                SyntaxKind::CloseBraceToken,
                SyntaxKind::OpenBracketToken,
                SyntaxKind::CloseBracketToken,
                SyntaxKind::SemicolonToken,
                SyntaxKind::CommaToken,
            ]
        );
    }

    #[test]
    fn test_scan_shift_assignments() {
        assert_eq!(
            kinds(">>>= >>= >> >= >"),
            vec![
                SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
                SyntaxKind::GreaterThanGreaterThanEqualsToken,
                SyntaxKind::GreaterThanGreaterThanToken,
                SyntaxKind::GreaterThanEqualsToken,
                SyntaxKind::GreaterThanToken,
            ]
        );
    }

    #[test]
    fn test_scan_string_escapes() {
        let mut scanner = Scanner::new(r#"'a\n\x41B\u{43}\101\
z'"#);
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_value(), "a\nABCAz");
        assert!(scanner.token_flags().contains(TokenFlags::OCTAL));
        assert!(scanner.diagnostics().is_empty());
    }

    #[test]
    fn test_scan_surrogate_pair_escape() {
        let mut scanner = Scanner::new(r#""\uD83D\uDE00""#);
        scanner.scan();
        assert_eq!(scanner.token_value(), "\u{1F600}");
    }

    #[test]
    fn test_byte_offsets_after_multibyte() {
        let mut scanner = Scanner::new("é = 1");
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_end(), 2);
        assert_eq!(scanner.scan(), SyntaxKind::EqualsToken);
        assert_eq!(scanner.token_start(), 3);
    }

    #[test]
    fn test_numeric_values() {
        assert_eq!(numeric_value("0x1F", TokenFlags::HEX_SPECIFIER), 31.0);
        assert_eq!(numeric_value("017", TokenFlags::OCTAL), 15.0);
        assert_eq!(numeric_value("1e3", TokenFlags::SCIENTIFIC), 1000.0);
        assert_eq!(numeric_value(".5", TokenFlags::NONE), 0.5);
        assert_eq!(numeric_value("5.", TokenFlags::NONE), 5.0);
    }

    #[test]
    fn test_leading_zero_decimal() {
        let mut scanner = Scanner::new("089.5");
        assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
        assert_eq!(scanner.token_value(), "089.5");
        assert!(!scanner.token_flags().contains(TokenFlags::OCTAL));
    }

    #[test]
    fn test_identifier_after_number_is_error() {
        let mut scanner = Scanner::new("3in x");
        scanner.scan();
        assert_eq!(scanner.diagnostics().len(), 1);
        assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1351);
    }

    #[test]
    fn test_rescan_regex() {
        let mut scanner = Scanner::new("/[/]a\\/b/gi.test");
        assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
        assert_eq!(scanner.rescan_slash_token(), SyntaxKind::RegularExpressionLiteral);
        assert_eq!(scanner.token_value(), "/[/]a\\/b/gi");
        assert_eq!(scanner.scan(), SyntaxKind::DotToken);
    }

    #[test]
    fn test_look_ahead_restores_state() {
        let mut scanner = Scanner::new("a b");
        scanner.scan();
        let next = scanner.look_ahead(|s| s.scan());
        assert_eq!(next, SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "a");
        assert_eq!(scanner.token_start(), 0);
    }

    #[test]
    fn test_restore_drops_lookahead_diagnostics() {
        let mut scanner = Scanner::new("a 'open");
        scanner.scan();
        scanner.look_ahead(|s| s.scan());
        assert!(scanner.diagnostics().is_empty());
    }
}
