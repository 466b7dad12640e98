//! Terminal rendering of diagnostics with source snippets.

use jsnorm_diagnostics::{Diagnostic, DiagnosticCategory};
use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report, Severity};

/// A miette report for `diag`, labelled against `source`.
pub fn report(diag: &Diagnostic, file_name: &str, source: &str) -> Report {
    let (severity, label) = match diag.category {
        DiagnosticCategory::Error => (Severity::Error, "here"),
        DiagnosticCategory::Warning => (Severity::Warning, "left as written"),
    };
    let mut rendered = MietteDiagnostic::new(diag.message_text.clone())
        .with_code(format!("JSN{}", diag.code))
        .with_severity(severity);
    if let Some(span) = diag.span {
        let range = span.to_range();
        if range.end <= source.len() {
            rendered = rendered.with_label(LabeledSpan::at(range, label));
        }
    }
    Report::new(rendered).with_source_code(NamedSource::new(file_name, source.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsnorm_core::text::TextSpan;
    use jsnorm_diagnostics::messages;

    #[test]
    fn test_report_carries_code_and_severity() {
        let diag = Diagnostic::with_span(
            TextSpan::new(0, 4),
            &messages::WITH_NESTED_FUNCTION_LEFT_UNNORMALIZED,
            &[],
        );
        let report = report(&diag, "a.js", "with (o) { f = function () {}; }");
        assert_eq!(report.severity(), Some(Severity::Warning));
        assert_eq!(report.code().map(|c| c.to_string()), Some("JSN9002".to_string()));
        assert_eq!(report.labels().map(|l| l.count()), Some(1));
    }

    #[test]
    fn test_out_of_range_span_is_unlabelled() {
        let diag = Diagnostic::with_span(TextSpan::new(10, 5), &messages::UNEXPECTED_TOKEN, &[]);
        let report = report(&diag, "a.js", "x;");
        assert!(report.labels().is_none());
    }
}
