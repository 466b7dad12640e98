//! Operator enums for unary, update, binary, logical and assignment expressions.

use crate::precedence::Precedence;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Minus,
    Plus,
    Not,
    BitNot,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitNot => "~",
            UnaryOperator::TypeOf => "typeof",
            UnaryOperator::Void => "void",
            UnaryOperator::Delete => "delete",
        }
    }

    /// Whether the operator is a word and needs a space before its operand.
    pub fn is_keyword(self) -> bool {
        matches!(self, UnaryOperator::TypeOf | UnaryOperator::Void | UnaryOperator::Delete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

impl UpdateOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOperator::Increment => "++",
            UpdateOperator::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    LShift,
    RShift,
    URShift,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    BitOr,
    BitXor,
    BitAnd,
    In,
    InstanceOf,
}

impl BinaryOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::StrictEq => "===",
            BinaryOperator::StrictNotEq => "!==",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::LShift => "<<",
            BinaryOperator::RShift => ">>",
            BinaryOperator::URShift => ">>>",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Mod => "%",
            BinaryOperator::Exp => "**",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::In => "in",
            BinaryOperator::InstanceOf => "instanceof",
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::StrictEq
            | BinaryOperator::StrictNotEq => Precedence::Equality,
            BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq
            | BinaryOperator::In
            | BinaryOperator::InstanceOf => Precedence::Relational,
            BinaryOperator::LShift | BinaryOperator::RShift | BinaryOperator::URShift => {
                Precedence::Shift
            }
            BinaryOperator::Add | BinaryOperator::Sub => Precedence::Additive,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => {
                Precedence::Multiplicative
            }
            BinaryOperator::Exp => Precedence::Exponentiation,
            BinaryOperator::BitOr => Precedence::BitwiseOr,
            BinaryOperator::BitXor => Precedence::BitwiseXor,
            BinaryOperator::BitAnd => Precedence::BitwiseAnd,
        }
    }

    /// `**` is the only right-associative binary operator.
    pub fn is_right_associative(self) -> bool {
        self == BinaryOperator::Exp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            LogicalOperator::And => Precedence::LogicalAnd,
            LogicalOperator::Or => Precedence::LogicalOr,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentOperator {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    LShift,
    RShift,
    URShift,
    BitOr,
    BitXor,
    BitAnd,
}

impl AssignmentOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentOperator::Assign => "=",
            AssignmentOperator::Add => "+=",
            AssignmentOperator::Sub => "-=",
            AssignmentOperator::Mul => "*=",
            AssignmentOperator::Div => "/=",
            AssignmentOperator::Mod => "%=",
            AssignmentOperator::Exp => "**=",
            AssignmentOperator::LShift => "<<=",
            AssignmentOperator::RShift => ">>=",
            AssignmentOperator::URShift => ">>>=",
            AssignmentOperator::BitOr => "|=",
            AssignmentOperator::BitXor => "^=",
            AssignmentOperator::BitAnd => "&=",
        }
    }

    /// The binary operator a compound assignment applies, or None for `=`.
    pub fn to_binary(self) -> Option<BinaryOperator> {
        match self {
            AssignmentOperator::Assign => None,
            AssignmentOperator::Add => Some(BinaryOperator::Add),
            AssignmentOperator::Sub => Some(BinaryOperator::Sub),
            AssignmentOperator::Mul => Some(BinaryOperator::Mul),
            AssignmentOperator::Div => Some(BinaryOperator::Div),
            AssignmentOperator::Mod => Some(BinaryOperator::Mod),
            AssignmentOperator::Exp => Some(BinaryOperator::Exp),
            AssignmentOperator::LShift => Some(BinaryOperator::LShift),
            AssignmentOperator::RShift => Some(BinaryOperator::RShift),
            AssignmentOperator::URShift => Some(BinaryOperator::URShift),
            AssignmentOperator::BitOr => Some(BinaryOperator::BitOr),
            AssignmentOperator::BitXor => Some(BinaryOperator::BitXor),
            AssignmentOperator::BitAnd => Some(BinaryOperator::BitAnd),
        }
    }

    #[inline]
    pub fn is_compound(self) -> bool {
        self != AssignmentOperator::Assign
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(
    UnaryOperator,
    UpdateOperator,
    BinaryOperator,
    LogicalOperator,
    AssignmentOperator
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_maps_to_binary() {
        assert_eq!(AssignmentOperator::Add.to_binary(), Some(BinaryOperator::Add));
        assert_eq!(AssignmentOperator::Exp.to_binary(), Some(BinaryOperator::Exp));
        assert_eq!(AssignmentOperator::Assign.to_binary(), None);
        assert!(!AssignmentOperator::Assign.is_compound());
    }

    #[test]
    fn test_update_as_str() {
        assert_eq!(UpdateOperator::Increment.as_str(), "++");
        assert_eq!(UpdateOperator::Decrement.as_str(), "--");
    }

    #[test]
    fn test_display() {
        assert_eq!(BinaryOperator::InstanceOf.to_string(), "instanceof");
        assert_eq!(AssignmentOperator::URShift.to_string(), ">>>=");
        assert!(UnaryOperator::TypeOf.is_keyword());
        assert!(!UnaryOperator::Not.is_keyword());
    }
}
