//! Scanner integration tests.
//!
//! Verifies that the scanner correctly tokenizes the accepted JavaScript
//! grammar and still produces tokens for the syntax the parser rejects.

use jsnorm_ast::syntax_kind::SyntaxKind;
use jsnorm_ast::types::TokenFlags;
use jsnorm_scanner::{numeric_value, Scanner};
use pretty_assertions::assert_eq;

/// Helper: scan all tokens from source and return as (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_value().to_string()));
    }
    tokens
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

#[test]
fn test_empty_source() {
    let tokens = scan_all("");
    assert!(tokens.is_empty());
}

#[test]
fn test_whitespace_only() {
    let tokens = scan_all("   \n\t \u{00A0}\u{FEFF} ");
    assert!(tokens.is_empty());
}

#[test]
fn test_numeric_literals() {
    let tokens = scan_all("42 3.14 0xFF .5 5. 1e-7");
    let values: Vec<&str> = tokens.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["42", "3.14", "0xFF", ".5", "5.", "1e-7"]);
    assert!(tokens.iter().all(|(k, _)| *k == SyntaxKind::NumericLiteral));
}

#[test]
fn test_numeric_flags_and_values() {
    let mut scanner = Scanner::new("0x10 017 2e3");
    scanner.scan();
    assert!(scanner.token_flags().contains(TokenFlags::HEX_SPECIFIER));
    assert_eq!(numeric_value(scanner.token_value(), scanner.token_flags()), 16.0);
    scanner.scan();
    assert!(scanner.token_flags().contains(TokenFlags::OCTAL));
    assert_eq!(numeric_value(scanner.token_value(), scanner.token_flags()), 15.0);
    scanner.scan();
    assert!(scanner.token_flags().contains(TokenFlags::SCIENTIFIC));
    assert_eq!(numeric_value(scanner.token_value(), scanner.token_flags()), 2000.0);
}

#[test]
fn test_string_literals() {
    let tokens = scan_all(r#""hello" 'world' 'it\'s' "tab\there""#);
    assert_eq!(
        tokens,
        vec![
            (SyntaxKind::StringLiteral, "hello".to_string()),
            (SyntaxKind::StringLiteral, "world".to_string()),
            (SyntaxKind::StringLiteral, "it's".to_string()),
            (SyntaxKind::StringLiteral, "tab\there".to_string()),
        ]
    );
}

#[test]
fn test_token_text_keeps_raw_string() {
    let mut scanner = Scanner::new(r#"'a\x41'"#);
    scanner.scan();
    assert_eq!(scanner.token_value(), "aA");
    assert_eq!(scanner.token_text(), r#"'a\x41'"#);
}

#[test]
fn test_identifiers() {
    let tokens = scan_all("foo bar _private $dollar caf\u{e9}");
    assert_eq!(tokens.len(), 5);
    for (kind, _) in &tokens {
        assert_eq!(*kind, SyntaxKind::Identifier);
    }
    assert_eq!(tokens[3].1, "$dollar");
    assert_eq!(tokens[4].1, "café");
}

#[test]
fn test_escaped_identifier_is_never_a_keyword() {
    let mut scanner = Scanner::new(r"\u0076ar");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "var");
    assert!(scanner.token_flags().contains(TokenFlags::UNICODE_ESCAPE));
}

#[test]
fn test_keywords() {
    let kinds = scan_kinds("if else while for return function with typeof let of");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::IfKeyword,
            SyntaxKind::ElseKeyword,
            SyntaxKind::WhileKeyword,
            SyntaxKind::ForKeyword,
            SyntaxKind::ReturnKeyword,
            SyntaxKind::FunctionKeyword,
            SyntaxKind::WithKeyword,
            SyntaxKind::TypeOfKeyword,
            SyntaxKind::LetKeyword,
            SyntaxKind::OfKeyword,
        ]
    );
}

#[test]
fn test_operators() {
    let kinds = scan_kinds("+ - * / % = == === != !== ** => ! ~");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::PlusToken,
            SyntaxKind::MinusToken,
            SyntaxKind::AsteriskToken,
            SyntaxKind::SlashToken,
            SyntaxKind::PercentToken,
            SyntaxKind::EqualsToken,
            SyntaxKind::EqualsEqualsToken,
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::ExclamationEqualsToken,
            SyntaxKind::ExclamationEqualsEqualsToken,
            SyntaxKind::AsteriskAsteriskToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::ExclamationToken,
            SyntaxKind::TildeToken,
        ]
    );
}

#[test]
fn test_assignment_operators() {
    let kinds = scan_kinds("+= -= *= /= %= **= <<= >>= >>>= &= |= ^=");
    assert!(kinds.iter().all(|k| k.is_compound_assignment()));
    assert_eq!(kinds.len(), 12);
}

#[test]
fn test_update_and_logical_operators() {
    let kinds = scan_kinds("++ -- && || ?");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::PlusPlusToken,
            SyntaxKind::MinusMinusToken,
            SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::BarBarToken,
            SyntaxKind::QuestionToken,
        ]
    );
}

// ========================================================================
// Tokens for syntax outside the accepted grammar
// ========================================================================

#[test]
fn test_modern_operators_still_scan() {
    let kinds = scan_kinds("?. ?? ??= ... &&= ||=");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::QuestionDotToken,
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::QuestionQuestionEqualsToken,
            SyntaxKind::DotDotDotToken,
            SyntaxKind::AmpersandAmpersandEqualsToken,
            SyntaxKind::BarBarEqualsToken,
        ]
    );
}

#[test]
fn test_conditional_with_fraction_is_not_optional_chain() {
    let kinds = scan_kinds("a?.5:b");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::ColonToken,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn test_template_literal() {
    assert_eq!(scan_kinds("`hello`"), vec![SyntaxKind::NoSubstitutionTemplateLiteral]);
    assert_eq!(scan_kinds("`a${")[0], SyntaxKind::TemplateHead);
}

#[test]
fn test_bigint_literal() {
    assert_eq!(scan_kinds("10n"), vec![SyntaxKind::BigIntLiteral]);
}

// ========================================================================
// Comments and positions
// ========================================================================

#[test]
fn test_comments_skipped() {
    let kinds = scan_kinds("a // line\n/* block */ b /** doc */");
    assert_eq!(kinds, vec![SyntaxKind::Identifier, SyntaxKind::Identifier]);
}

#[test]
fn test_block_comment_with_newline_counts_as_line_break() {
    let mut scanner = Scanner::new("a /*\n*/ b");
    scanner.scan();
    scanner.scan();
    assert!(scanner.has_preceding_line_break());
}

#[test]
fn test_token_positions() {
    let mut scanner = Scanner::new("var x = 42;");
    scanner.scan(); // var
    assert_eq!(scanner.token_start(), 0);

    scanner.scan(); // x
    assert_eq!(scanner.token_start(), 4);

    scanner.scan(); // =
    assert_eq!(scanner.token_start(), 6);

    scanner.scan(); // 42
    assert_eq!(scanner.token_start(), 8);
    assert_eq!(scanner.token_end(), 10);
}

#[test]
fn test_line_break_tracking() {
    let mut scanner = Scanner::new("a\nb\u{2028}c");
    scanner.scan(); // a
    assert!(!scanner.has_preceding_line_break());
    scanner.scan(); // b
    assert!(scanner.has_preceding_line_break());
    scanner.scan(); // c
    assert!(scanner.has_preceding_line_break());
}

// ========================================================================
// Errors
// ========================================================================

#[test]
fn test_unterminated_string_produces_diagnostic() {
    let mut scanner = Scanner::new("\"hello\nworld\"");
    scanner.scan();
    assert_eq!(scanner.diagnostics().len(), 1);
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1002);
}

#[test]
fn test_unterminated_comment_produces_diagnostic() {
    let mut scanner = Scanner::new("a /* never closed");
    scanner.scan();
    assert!(scanner.diagnostics().is_empty());
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1010);
}

#[test]
fn test_invalid_character() {
    let mut scanner = Scanner::new("a \u{00B6} b");
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    let diag = &scanner.diagnostics().diagnostics()[0];
    assert_eq!(diag.code, 1127);
    assert_eq!(diag.span.map(|s| s.start), Some(2));
}

#[test]
fn test_bad_hex_escape() {
    let mut scanner = Scanner::new(r#""\xZZ""#);
    scanner.scan();
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1125);
}

#[test]
fn test_unterminated_regex() {
    let mut scanner = Scanner::new("/abc\n/");
    scanner.scan();
    scanner.rescan_slash_token();
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1161);
}
