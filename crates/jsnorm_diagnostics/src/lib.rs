//! jsnorm_diagnostics: Diagnostic messages and reporting infrastructure.
//!
//! Diagnostics are structured values (code, category, span, message) so a
//! host can render, serialize, or suppress them independently of the
//! normalization result. The message catalogue lives in [`messages`].

use jsnorm_core::text::{LineAndColumn, LineMap, TextSpan};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic code (e.g. 1005, 9001).
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The message template. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file path where this diagnostic occurred, if known.
    pub file: Option<String>,
    /// The source span where this diagnostic occurred, if any.
    pub span: Option<TextSpan>,
    /// 1-based line/column of `span.start`, filled in by [`Diagnostic::locate`].
    pub location: Option<LineAndColumn>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            location: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a diagnostic attached to a source span.
    pub fn with_span(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            span: Some(span),
            ..Self::new(message, args)
        }
    }

    /// Attach the file name and compute the line/column from the span.
    pub fn locate(&mut self, file: &str, line_map: &LineMap<'_>) {
        self.file = Some(file.to_string());
        if let Some(span) = self.span {
            self.location = Some(line_map.line_and_column_of(span.start));
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    pub fn is_warning(&self) -> bool {
        self.category == DiagnosticCategory::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            match (self.location, self.span) {
                (Some(loc), _) => write!(f, "({},{})", loc.line, loc.column)?,
                (None, Some(span)) => write!(f, "({})", span.start)?,
                (None, None) => {}
            }
            write!(f, ": ")?;
        }
        write!(f, "{} JSN{}: {}", self.category, self.code, self.message_text)
    }
}

impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Diagnostic", 8)?;
        state.serialize_field("file", &self.file)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("message", &self.message_text)?;
        state.serialize_field("start", &self.span.map(|s| s.start))?;
        state.serialize_field("end", &self.span.map(|s| s.end()))?;
        state.serialize_field("line", &self.location.map(|l| l.line))?;
        state.serialize_field("column", &self.location.map(|l| l.column))?;
        state.end()
    }
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Diagnostics accumulated while normalizing one file.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Drop every diagnostic after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Attach file and line information to every diagnostic.
    pub fn locate_all(&mut self, file: &str, line_map: &LineMap<'_>) {
        for diag in &mut self.diagnostics {
            diag.locate(file, line_map);
        }
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let file_cmp = a.file.cmp(&b.file);
            if file_cmp != std::cmp::Ordering::Equal {
                return file_cmp;
            }
            let a_pos = a.span.map(|s| s.start).unwrap_or(0);
            let b_pos = b.span.map(|s| s.start).unwrap_or(0);
            a_pos.cmp(&b_pos)
        });
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Scanner errors (1000-1099)
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, "Unterminated string literal.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1003, Error, "Identifier expected.");
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1005, Error, "'{0}' expected.");
    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = diag!(1010, Error, "'*/' expected.");
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1012, Error, "Unexpected token.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1127, Error, "Invalid character.");
    pub const DIGIT_EXPECTED: DiagnosticMessage = diag!(1124, Error, "Digit expected.");
    pub const HEXADECIMAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1125, Error, "Hexadecimal digit expected.");
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: DiagnosticMessage = diag!(1161, Error, "Unterminated regular expression literal.");
    pub const AN_IDENTIFIER_OR_KEYWORD_CANNOT_IMMEDIATELY_FOLLOW_A_NUMERIC_LITERAL: DiagnosticMessage = diag!(1351, Error, "An identifier or keyword cannot immediately follow a numeric literal.");
    pub const INVALID_UNICODE_ESCAPE: DiagnosticMessage = diag!(1198, Error, "Invalid Unicode escape sequence.");

    // ========================================================================
    // Parser errors (1100-1999)
    // ========================================================================
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1109, Error, "Expression expected.");
    pub const DECLARATION_OR_STATEMENT_EXPECTED: DiagnosticMessage = diag!(1128, Error, "Declaration or statement expected.");
    pub const A_RETURN_STATEMENT_CAN_ONLY_BE_USED_WITHIN_A_FUNCTION_BODY: DiagnosticMessage = diag!(1108, Error, "A 'return' statement can only be used within a function body.");
    pub const A_BREAK_STATEMENT_CAN_ONLY_BE_USED_WITHIN_AN_ENCLOSING_ITERATION_OR_SWITCH_STATEMENT: DiagnosticMessage = diag!(1105, Error, "A 'break' statement can only be used within an enclosing iteration or switch statement.");
    pub const A_CONTINUE_STATEMENT_CAN_ONLY_BE_USED_WITHIN_AN_ENCLOSING_ITERATION_STATEMENT: DiagnosticMessage = diag!(1104, Error, "A 'continue' statement can only be used within an enclosing iteration statement.");
    pub const JUMP_TARGET_CANNOT_CROSS_FUNCTION_BOUNDARY: DiagnosticMessage = diag!(1107, Error, "Jump target cannot cross function boundary.");
    pub const A_CONTINUE_STATEMENT_CAN_ONLY_JUMP_TO_A_LABEL_OF_AN_ENCLOSING_ITERATION_STATEMENT: DiagnosticMessage = diag!(1115, Error, "A 'continue' statement can only jump to a label of an enclosing iteration statement.");
    pub const A_BREAK_STATEMENT_CAN_ONLY_JUMP_TO_A_LABEL_OF_AN_ENCLOSING_STATEMENT: DiagnosticMessage = diag!(1116, Error, "A 'break' statement can only jump to a label of an enclosing statement.");
    pub const DUPLICATE_LABEL_0: DiagnosticMessage = diag!(1114, Error, "Duplicate label '{0}'.");
    pub const INVALID_LEFT_HAND_SIDE_IN_ASSIGNMENT: DiagnosticMessage = diag!(2364, Error, "The left-hand side of an assignment expression must be a variable or a property access.");
    pub const INVALID_LEFT_HAND_SIDE_IN_FOR_IN: DiagnosticMessage = diag!(2406, Error, "The left-hand side of a 'for...in' or 'for...of' statement must be a variable or a property access.");
    pub const ONLY_A_SINGLE_VARIABLE_DECLARATION_IS_ALLOWED_IN_A_FOR_IN_STATEMENT: DiagnosticMessage = diag!(1091, Error, "Only a single variable declaration is allowed in a 'for...in' or 'for...of' statement.");
    pub const CONST_DECLARATIONS_MUST_BE_INITIALIZED: DiagnosticMessage = diag!(1155, Error, "'const' declarations must be initialized.");
    pub const _0_DECLARATIONS_CAN_ONLY_BE_DECLARED_INSIDE_A_BLOCK: DiagnosticMessage = diag!(1156, Error, "'{0}' declarations can only be declared inside a block.");
    pub const INVALID_OPERAND_OF_INCREMENT_OR_DECREMENT: DiagnosticMessage = diag!(2357, Error, "The operand of an increment or decrement operator must be a variable or a property access.");
    pub const UNARY_OPERATOR_NOT_ALLOWED_BEFORE_EXPONENTIATION_0: DiagnosticMessage = diag!(17006, Error, "An unary expression with the '{0}' operator is not allowed in the left-hand side of an exponentiation expression. Consider enclosing the expression in parentheses.");
    pub const LINE_BREAK_NOT_PERMITTED_HERE: DiagnosticMessage = diag!(1142, Error, "Line break not permitted here.");
    pub const CATCH_CLAUSE_OR_FINALLY_EXPECTED: DiagnosticMessage = diag!(1472, Error, "'catch' or 'finally' expected.");
    pub const MULTIPLE_DEFAULT_CLAUSES: DiagnosticMessage = diag!(1113, Error, "A 'default' clause cannot appear more than once in a 'switch' statement.");
    pub const UNSUPPORTED_SYNTAX_0: DiagnosticMessage = diag!(1900, Error, "{0} is outside the accepted input grammar.");
    pub const TOO_DEEPLY_NESTED: DiagnosticMessage = diag!(1901, Error, "Source is too deeply nested to normalize.");

    // ========================================================================
    // Normalizer warnings (9000-9099): constructs left unnormalized
    // ========================================================================
    pub const DIRECT_EVAL_LEFT_UNNORMALIZED: DiagnosticMessage = diag!(9001, Warning, "Direct call to 'eval' may introduce bindings; the enclosing {0} was left unnormalized.");
    pub const WITH_NESTED_FUNCTION_LEFT_UNNORMALIZED: DiagnosticMessage = diag!(9002, Warning, "'with' statement containing a nested function was left unnormalized.");
    pub const WITH_LOOP_TARGET_LEFT_UNNORMALIZED: DiagnosticMessage = diag!(9003, Warning, "'with' statement containing a loop that assigns the free name '{0}' was left unnormalized.");
    pub const GLOBAL_SHADOWED_0_LEFT_UNNORMALIZED: DiagnosticMessage = diag!(9004, Warning, "'{0}' is shadowed by a local binding; the '{1}' statement was left unnormalized.");
    pub const FOR_LEXICAL_CLOSURE_LEFT_UNNORMALIZED: DiagnosticMessage = diag!(9005, Warning, "'for' loop whose '{0}' binding may be captured by a closure was left unnormalized.");
    pub const CASE_TEST_LEFT_UNNORMALIZED: DiagnosticMessage = diag!(9006, Warning, "Short-circuit or conditional expression in a 'case' test was left unnormalized.");
    pub const STRICT_UNDECLARED_ASSIGNMENT_LEFT_UNNORMALIZED: DiagnosticMessage = diag!(9007, Warning, "Assignment to undeclared '{0}' in strict mode code was left undeclared.");
}
