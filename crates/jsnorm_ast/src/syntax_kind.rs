//! SyntaxKind enum - the token kinds produced by the scanner.
//!
//! Node kinds are not listed here: the tree is a set of Rust enums and the
//! variant itself is the kind. Tokens for syntax outside the accepted
//! grammar (templates, `?.`, `??`, spread) are still scanned so the parser
//! can name them in its error.

/// The kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown = 0,
    EndOfFileToken = 1,

    // Literals
    NumericLiteral = 2,
    BigIntLiteral = 3,
    StringLiteral = 4,
    RegularExpressionLiteral = 5,
    NoSubstitutionTemplateLiteral = 6,
    TemplateHead = 7,

    // Punctuation
    OpenBraceToken = 8,
    CloseBraceToken = 9,
    OpenParenToken = 10,
    CloseParenToken = 11,
    OpenBracketToken = 12,
    CloseBracketToken = 13,
    DotToken = 14,
    DotDotDotToken = 15,
    SemicolonToken = 16,
    CommaToken = 17,
    QuestionDotToken = 18,
    LessThanToken = 19,
    GreaterThanToken = 20,
    LessThanEqualsToken = 21,
    GreaterThanEqualsToken = 22,
    EqualsEqualsToken = 23,
    ExclamationEqualsToken = 24,
    EqualsEqualsEqualsToken = 25,
    ExclamationEqualsEqualsToken = 26,
    EqualsGreaterThanToken = 27,
    PlusToken = 28,
    MinusToken = 29,
    AsteriskToken = 30,
    AsteriskAsteriskToken = 31,
    SlashToken = 32,
    PercentToken = 33,
    PlusPlusToken = 34,
    MinusMinusToken = 35,
    LessThanLessThanToken = 36,
    GreaterThanGreaterThanToken = 37,
    GreaterThanGreaterThanGreaterThanToken = 38,
    AmpersandToken = 39,
    BarToken = 40,
    CaretToken = 41,
    ExclamationToken = 42,
    TildeToken = 43,
    AmpersandAmpersandToken = 44,
    BarBarToken = 45,
    QuestionToken = 46,
    ColonToken = 47,
    AtToken = 48,
    QuestionQuestionToken = 49,
    HashToken = 50,

    // Assignments
    EqualsToken = 51,
    PlusEqualsToken = 52,
    MinusEqualsToken = 53,
    AsteriskEqualsToken = 54,
    AsteriskAsteriskEqualsToken = 55,
    SlashEqualsToken = 56,
    PercentEqualsToken = 57,
    LessThanLessThanEqualsToken = 58,
    GreaterThanGreaterThanEqualsToken = 59,
    GreaterThanGreaterThanGreaterThanEqualsToken = 60,
    AmpersandEqualsToken = 61,
    BarEqualsToken = 62,
    CaretEqualsToken = 63,
    BarBarEqualsToken = 64,
    AmpersandAmpersandEqualsToken = 65,
    QuestionQuestionEqualsToken = 66,

    // Identifiers and keywords
    Identifier = 67,

    // Reserved words
    BreakKeyword = 68,
    CaseKeyword = 69,
    CatchKeyword = 70,
    ClassKeyword = 71,
    ConstKeyword = 72,
    ContinueKeyword = 73,
    DebuggerKeyword = 74,
    DefaultKeyword = 75,
    DeleteKeyword = 76,
    DoKeyword = 77,
    ElseKeyword = 78,
    EnumKeyword = 79,
    ExportKeyword = 80,
    ExtendsKeyword = 81,
    FalseKeyword = 82,
    FinallyKeyword = 83,
    ForKeyword = 84,
    FunctionKeyword = 85,
    IfKeyword = 86,
    ImportKeyword = 87,
    InKeyword = 88,
    InstanceOfKeyword = 89,
    NewKeyword = 90,
    NullKeyword = 91,
    ReturnKeyword = 92,
    SuperKeyword = 93,
    SwitchKeyword = 94,
    ThisKeyword = 95,
    ThrowKeyword = 96,
    TrueKeyword = 97,
    TryKeyword = 98,
    TypeOfKeyword = 99,
    VarKeyword = 100,
    VoidKeyword = 101,
    WhileKeyword = 102,
    WithKeyword = 103,

    // Contextual keywords; these are valid identifiers in sloppy scripts
    LetKeyword = 104,
    YieldKeyword = 105,
    AsyncKeyword = 106,
    AwaitKeyword = 107,
    GetKeyword = 108,
    SetKeyword = 109,
    OfKeyword = 110,
    StaticKeyword = 111,
}

impl SyntaxKind {
    pub const FIRST_ASSIGNMENT: SyntaxKind = SyntaxKind::EqualsToken;
    pub const LAST_ASSIGNMENT: SyntaxKind = SyntaxKind::QuestionQuestionEqualsToken;
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::BreakKeyword;
    pub const FIRST_CONTEXTUAL_KEYWORD: SyntaxKind = SyntaxKind::LetKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::StaticKeyword;
}

impl SyntaxKind {
    /// Whether this kind represents a keyword.
    #[inline]
    pub fn is_keyword(self) -> bool {
        self >= Self::FIRST_KEYWORD && self <= Self::LAST_KEYWORD
    }

    /// Whether this token can be used as a binding or reference name.
    #[inline]
    pub fn is_identifier_or_contextual_keyword(self) -> bool {
        self == SyntaxKind::Identifier
            || (self >= Self::FIRST_CONTEXTUAL_KEYWORD && self <= Self::LAST_KEYWORD)
    }

    /// Whether this token may name a property after `.` or in an object literal.
    #[inline]
    pub fn is_identifier_name(self) -> bool {
        self == SyntaxKind::Identifier || self.is_keyword()
    }

    /// Whether this kind represents a literal token.
    #[inline]
    pub fn is_literal(self) -> bool {
        self >= SyntaxKind::NumericLiteral && self <= SyntaxKind::NoSubstitutionTemplateLiteral
    }

    /// Whether this kind represents an assignment operator.
    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        self >= Self::FIRST_ASSIGNMENT && self <= Self::LAST_ASSIGNMENT
    }

    /// Whether this kind represents a compound assignment operator.
    #[inline]
    pub fn is_compound_assignment(self) -> bool {
        self > Self::FIRST_ASSIGNMENT && self <= Self::LAST_ASSIGNMENT
    }

    /// Get the keyword text for a keyword kind, or None if not a keyword.
    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::BreakKeyword => Some("break"),
            SyntaxKind::CaseKeyword => Some("case"),
            SyntaxKind::CatchKeyword => Some("catch"),
            SyntaxKind::ClassKeyword => Some("class"),
            SyntaxKind::ConstKeyword => Some("const"),
            SyntaxKind::ContinueKeyword => Some("continue"),
            SyntaxKind::DebuggerKeyword => Some("debugger"),
            SyntaxKind::DefaultKeyword => Some("default"),
            SyntaxKind::DeleteKeyword => Some("delete"),
            SyntaxKind::DoKeyword => Some("do"),
            SyntaxKind::ElseKeyword => Some("else"),
            SyntaxKind::EnumKeyword => Some("enum"),
            SyntaxKind::ExportKeyword => Some("export"),
            SyntaxKind::ExtendsKeyword => Some("extends"),
            SyntaxKind::FalseKeyword => Some("false"),
            SyntaxKind::FinallyKeyword => Some("finally"),
            SyntaxKind::ForKeyword => Some("for"),
            SyntaxKind::FunctionKeyword => Some("function"),
            SyntaxKind::IfKeyword => Some("if"),
            SyntaxKind::ImportKeyword => Some("import"),
            SyntaxKind::InKeyword => Some("in"),
            SyntaxKind::InstanceOfKeyword => Some("instanceof"),
            SyntaxKind::NewKeyword => Some("new"),
            SyntaxKind::NullKeyword => Some("null"),
            SyntaxKind::ReturnKeyword => Some("return"),
            SyntaxKind::SuperKeyword => Some("super"),
            SyntaxKind::SwitchKeyword => Some("switch"),
            SyntaxKind::ThisKeyword => Some("this"),
            SyntaxKind::ThrowKeyword => Some("throw"),
            SyntaxKind::TrueKeyword => Some("true"),
            SyntaxKind::TryKeyword => Some("try"),
            SyntaxKind::TypeOfKeyword => Some("typeof"),
            SyntaxKind::VarKeyword => Some("var"),
            SyntaxKind::VoidKeyword => Some("void"),
            SyntaxKind::WhileKeyword => Some("while"),
            SyntaxKind::WithKeyword => Some("with"),
            SyntaxKind::LetKeyword => Some("let"),
            SyntaxKind::YieldKeyword => Some("yield"),
            SyntaxKind::AsyncKeyword => Some("async"),
            SyntaxKind::AwaitKeyword => Some("await"),
            SyntaxKind::GetKeyword => Some("get"),
            SyntaxKind::SetKeyword => Some("set"),
            SyntaxKind::OfKeyword => Some("of"),
            SyntaxKind::StaticKeyword => Some("static"),
            _ => None,
        }
    }

    /// Look up a keyword SyntaxKind from text.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "break" => Some(SyntaxKind::BreakKeyword),
            "case" => Some(SyntaxKind::CaseKeyword),
            "catch" => Some(SyntaxKind::CatchKeyword),
            "class" => Some(SyntaxKind::ClassKeyword),
            "const" => Some(SyntaxKind::ConstKeyword),
            "continue" => Some(SyntaxKind::ContinueKeyword),
            "debugger" => Some(SyntaxKind::DebuggerKeyword),
            "default" => Some(SyntaxKind::DefaultKeyword),
            "delete" => Some(SyntaxKind::DeleteKeyword),
            "do" => Some(SyntaxKind::DoKeyword),
            "else" => Some(SyntaxKind::ElseKeyword),
            "enum" => Some(SyntaxKind::EnumKeyword),
            "export" => Some(SyntaxKind::ExportKeyword),
            "extends" => Some(SyntaxKind::ExtendsKeyword),
            "false" => Some(SyntaxKind::FalseKeyword),
            "finally" => Some(SyntaxKind::FinallyKeyword),
            "for" => Some(SyntaxKind::ForKeyword),
            "function" => Some(SyntaxKind::FunctionKeyword),
            "if" => Some(SyntaxKind::IfKeyword),
            "import" => Some(SyntaxKind::ImportKeyword),
            "in" => Some(SyntaxKind::InKeyword),
            "instanceof" => Some(SyntaxKind::InstanceOfKeyword),
            "new" => Some(SyntaxKind::NewKeyword),
            "null" => Some(SyntaxKind::NullKeyword),
            "return" => Some(SyntaxKind::ReturnKeyword),
            "super" => Some(SyntaxKind::SuperKeyword),
            "switch" => Some(SyntaxKind::SwitchKeyword),
            "this" => Some(SyntaxKind::ThisKeyword),
            "throw" => Some(SyntaxKind::ThrowKeyword),
            "true" => Some(SyntaxKind::TrueKeyword),
            "try" => Some(SyntaxKind::TryKeyword),
            "typeof" => Some(SyntaxKind::TypeOfKeyword),
            "var" => Some(SyntaxKind::VarKeyword),
            "void" => Some(SyntaxKind::VoidKeyword),
            "while" => Some(SyntaxKind::WhileKeyword),
            "with" => Some(SyntaxKind::WithKeyword),
            "let" => Some(SyntaxKind::LetKeyword),
            "yield" => Some(SyntaxKind::YieldKeyword),
            "async" => Some(SyntaxKind::AsyncKeyword),
            "await" => Some(SyntaxKind::AwaitKeyword),
            "get" => Some(SyntaxKind::GetKeyword),
            "set" => Some(SyntaxKind::SetKeyword),
            "of" => Some(SyntaxKind::OfKeyword),
            "static" => Some(SyntaxKind::StaticKeyword),
            _ => None,
        }
    }

    /// Get the punctuation text for a punctuation kind, or None.
    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::OpenBraceToken => Some("{"),
            SyntaxKind::CloseBraceToken => Some("}"),
            SyntaxKind::OpenParenToken => Some("("),
            SyntaxKind::CloseParenToken => Some(")"),
            SyntaxKind::OpenBracketToken => Some("["),
            SyntaxKind::CloseBracketToken => Some("]"),
            SyntaxKind::DotToken => Some("."),
            SyntaxKind::DotDotDotToken => Some("..."),
            SyntaxKind::SemicolonToken => Some(";"),
            SyntaxKind::CommaToken => Some(","),
            SyntaxKind::QuestionDotToken => Some("?."),
            SyntaxKind::LessThanToken => Some("<"),
            SyntaxKind::GreaterThanToken => Some(">"),
            SyntaxKind::LessThanEqualsToken => Some("<="),
            SyntaxKind::GreaterThanEqualsToken => Some(">="),
            SyntaxKind::EqualsEqualsToken => Some("=="),
            SyntaxKind::ExclamationEqualsToken => Some("!="),
            SyntaxKind::EqualsEqualsEqualsToken => Some("==="),
            SyntaxKind::ExclamationEqualsEqualsToken => Some("!=="),
            SyntaxKind::EqualsGreaterThanToken => Some("=>"),
            SyntaxKind::PlusToken => Some("+"),
            SyntaxKind::MinusToken => Some("-"),
            SyntaxKind::AsteriskToken => Some("*"),
            SyntaxKind::AsteriskAsteriskToken => Some("**"),
            SyntaxKind::SlashToken => Some("/"),
            SyntaxKind::PercentToken => Some("%"),
            SyntaxKind::PlusPlusToken => Some("++"),
            SyntaxKind::MinusMinusToken => Some("--"),
            SyntaxKind::LessThanLessThanToken => Some("<<"),
            SyntaxKind::GreaterThanGreaterThanToken => Some(">>"),
            SyntaxKind::GreaterThanGreaterThanGreaterThanToken => Some(">>>"),
            SyntaxKind::AmpersandToken => Some("&"),
            SyntaxKind::BarToken => Some("|"),
            SyntaxKind::CaretToken => Some("^"),
            SyntaxKind::ExclamationToken => Some("!"),
            SyntaxKind::TildeToken => Some("~"),
            SyntaxKind::AmpersandAmpersandToken => Some("&&"),
            SyntaxKind::BarBarToken => Some("||"),
            SyntaxKind::QuestionToken => Some("?"),
            SyntaxKind::ColonToken => Some(":"),
            SyntaxKind::AtToken => Some("@"),
            SyntaxKind::QuestionQuestionToken => Some("??"),
            SyntaxKind::HashToken => Some("#"),
            SyntaxKind::EqualsToken => Some("="),
            SyntaxKind::PlusEqualsToken => Some("+="),
            SyntaxKind::MinusEqualsToken => Some("-="),
            SyntaxKind::AsteriskEqualsToken => Some("*="),
            SyntaxKind::AsteriskAsteriskEqualsToken => Some("**="),
            SyntaxKind::SlashEqualsToken => Some("/="),
            SyntaxKind::PercentEqualsToken => Some("%="),
            SyntaxKind::LessThanLessThanEqualsToken => Some("<<="),
            SyntaxKind::GreaterThanGreaterThanEqualsToken => Some(">>="),
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken => Some(">>>="),
            SyntaxKind::AmpersandEqualsToken => Some("&="),
            SyntaxKind::BarEqualsToken => Some("|="),
            SyntaxKind::CaretEqualsToken => Some("^="),
            SyntaxKind::BarBarEqualsToken => Some("||="),
            SyntaxKind::AmpersandAmpersandEqualsToken => Some("&&="),
            SyntaxKind::QuestionQuestionEqualsToken => Some("??="),
            _ => None,
        }
    }

    /// Source text of a fixed-text token, or a short description otherwise.
    pub fn describe(self) -> &'static str {
        if let Some(text) = self.punctuation_text().or_else(|| self.keyword_text()) {
            return text;
        }
        match self {
            SyntaxKind::EndOfFileToken => "end of file",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::NumericLiteral => "number",
            SyntaxKind::BigIntLiteral => "bigint literal",
            SyntaxKind::StringLiteral => "string",
            SyntaxKind::RegularExpressionLiteral => "regular expression",
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                "template literal"
            }
            _ => "unknown token",
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
