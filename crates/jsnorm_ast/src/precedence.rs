//! Expression precedence levels shared by the parser and the printer.

/// Precedence levels, ordered from lowest to highest binding strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Precedence {
    Comma = 0,
    Assignment = 1,
    Conditional = 2,
    LogicalOr = 3,
    LogicalAnd = 4,
    BitwiseOr = 5,
    BitwiseXor = 6,
    BitwiseAnd = 7,
    Equality = 8,
    Relational = 9,
    Shift = 10,
    Additive = 11,
    Multiplicative = 12,
    Exponentiation = 13,
    Unary = 14,
    Update = 15,
    /// `new` without arguments, call and member expressions.
    LeftHandSide = 16,
    Member = 17,
    Primary = 18,
}

impl Precedence {
    /// The next tighter level. Used for the right operand of a left-associative operator.
    pub fn tighter(self) -> Precedence {
        match self {
            Precedence::Comma => Precedence::Assignment,
            Precedence::Assignment => Precedence::Conditional,
            Precedence::Conditional => Precedence::LogicalOr,
            Precedence::LogicalOr => Precedence::LogicalAnd,
            Precedence::LogicalAnd => Precedence::BitwiseOr,
            Precedence::BitwiseOr => Precedence::BitwiseXor,
            Precedence::BitwiseXor => Precedence::BitwiseAnd,
            Precedence::BitwiseAnd => Precedence::Equality,
            Precedence::Equality => Precedence::Relational,
            Precedence::Relational => Precedence::Shift,
            Precedence::Shift => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative => Precedence::Exponentiation,
            Precedence::Exponentiation => Precedence::Unary,
            Precedence::Unary => Precedence::Update,
            Precedence::Update => Precedence::LeftHandSide,
            Precedence::LeftHandSide => Precedence::Member,
            Precedence::Member | Precedence::Primary => Precedence::Primary,
        }
    }
}
