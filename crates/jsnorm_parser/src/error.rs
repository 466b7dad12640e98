//! The error produced when source text cannot be parsed.

use jsnorm_core::text::{LineAndColumn, LineMap, TextPos, TextSpan};
use jsnorm_diagnostics::{Diagnostic, DiagnosticCategory};
use thiserror::Error;

/// A fatal parse failure. Parsing stops at the first error, so a failed
/// file has exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("({line},{column}): {message}")]
pub struct ParseError {
    /// 1-based line.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: u32,
    pub message: String,
    pub code: u32,
    pub span: TextSpan,
}

impl ParseError {
    pub(crate) fn from_diagnostic(diagnostic: &Diagnostic, source_text: &str) -> Self {
        let span = diagnostic
            .span
            .unwrap_or_else(|| TextSpan::empty(source_text.len() as TextPos));
        let location = LineMap::new(source_text).line_and_column_of(span.start);
        Self {
            line: location.line,
            column: location.column,
            message: diagnostic.message_text.clone(),
            code: diagnostic.code,
            span,
        }
    }

    /// The error as a located diagnostic, for reporting next to warnings.
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        Diagnostic {
            file: Some(file.to_string()),
            span: Some(self.span),
            location: Some(LineAndColumn::new(self.line, self.column)),
            message_text: self.message.clone(),
            code: self.code,
            category: DiagnosticCategory::Error,
        }
    }
}
