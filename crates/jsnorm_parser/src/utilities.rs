//! Parser utility functions.

use jsnorm_ast::syntax_kind::SyntaxKind;

/// Check if a token kind can start an expression statement.
pub(crate) fn can_start_expression(kind: SyntaxKind) -> bool {
    kind.is_identifier_or_contextual_keyword()
        || matches!(
            kind,
            SyntaxKind::NumericLiteral
                | SyntaxKind::StringLiteral
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken
                | SyntaxKind::OpenBraceToken
                | SyntaxKind::SlashToken
                | SyntaxKind::SlashEqualsToken
                | SyntaxKind::PlusToken
                | SyntaxKind::MinusToken
                | SyntaxKind::TildeToken
                | SyntaxKind::ExclamationToken
                | SyntaxKind::PlusPlusToken
                | SyntaxKind::MinusMinusToken
                | SyntaxKind::NewKeyword
                | SyntaxKind::DeleteKeyword
                | SyntaxKind::TypeOfKeyword
                | SyntaxKind::VoidKeyword
                | SyntaxKind::ThisKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::TrueKeyword
                | SyntaxKind::FalseKeyword
                | SyntaxKind::FunctionKeyword
        )
}

/// Check if a token starts an iteration statement.
pub(crate) fn is_iteration_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ForKeyword | SyntaxKind::WhileKeyword | SyntaxKind::DoKeyword
    )
}

/// Name the language feature a token introduces when that feature is
/// outside the accepted grammar.
pub(crate) fn unsupported_feature(kind: SyntaxKind) -> Option<&'static str> {
    let feature = match kind {
        SyntaxKind::ClassKeyword | SyntaxKind::ExtendsKeyword => "Class syntax",
        SyntaxKind::ImportKeyword | SyntaxKind::ExportKeyword => "Module syntax",
        SyntaxKind::EnumKeyword => "An 'enum' declaration",
        SyntaxKind::SuperKeyword => "'super'",
        SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
            "A template literal"
        }
        SyntaxKind::BigIntLiteral => "A BigInt literal",
        SyntaxKind::DotDotDotToken => "Spread and rest syntax",
        SyntaxKind::QuestionDotToken => "Optional chaining",
        SyntaxKind::QuestionQuestionToken => "Nullish coalescing",
        SyntaxKind::AmpersandAmpersandEqualsToken
        | SyntaxKind::BarBarEqualsToken
        | SyntaxKind::QuestionQuestionEqualsToken => "Logical assignment",
        SyntaxKind::AtToken => "A decorator",
        SyntaxKind::HashToken => "A private name",
        _ => return None,
    };
    Some(feature)
}
