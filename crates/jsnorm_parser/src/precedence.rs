//! Mapping from operator tokens to AST operators.

use jsnorm_ast::operators::{AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator};
use jsnorm_ast::precedence::Precedence;
use jsnorm_ast::syntax_kind::SyntaxKind;

/// An operator that can appear between two operands in a binary
/// expression chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InfixOperator {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

impl InfixOperator {
    pub(crate) fn precedence(self) -> Precedence {
        match self {
            InfixOperator::Binary(op) => op.precedence(),
            InfixOperator::Logical(op) => op.precedence(),
        }
    }
}

/// Get the infix operator for a token, if it is one.
pub(crate) fn infix_operator(kind: SyntaxKind) -> Option<InfixOperator> {
    let op = match kind {
        SyntaxKind::BarBarToken => return Some(InfixOperator::Logical(LogicalOperator::Or)),
        SyntaxKind::AmpersandAmpersandToken => {
            return Some(InfixOperator::Logical(LogicalOperator::And))
        }
        SyntaxKind::BarToken => BinaryOperator::BitOr,
        SyntaxKind::CaretToken => BinaryOperator::BitXor,
        SyntaxKind::AmpersandToken => BinaryOperator::BitAnd,
        SyntaxKind::EqualsEqualsToken => BinaryOperator::Eq,
        SyntaxKind::ExclamationEqualsToken => BinaryOperator::NotEq,
        SyntaxKind::EqualsEqualsEqualsToken => BinaryOperator::StrictEq,
        SyntaxKind::ExclamationEqualsEqualsToken => BinaryOperator::StrictNotEq,
        SyntaxKind::LessThanToken => BinaryOperator::Lt,
        SyntaxKind::GreaterThanToken => BinaryOperator::Gt,
        SyntaxKind::LessThanEqualsToken => BinaryOperator::LtEq,
        SyntaxKind::GreaterThanEqualsToken => BinaryOperator::GtEq,
        SyntaxKind::InstanceOfKeyword => BinaryOperator::InstanceOf,
        SyntaxKind::InKeyword => BinaryOperator::In,
        SyntaxKind::LessThanLessThanToken => BinaryOperator::LShift,
        SyntaxKind::GreaterThanGreaterThanToken => BinaryOperator::RShift,
        SyntaxKind::GreaterThanGreaterThanGreaterThanToken => BinaryOperator::URShift,
        SyntaxKind::PlusToken => BinaryOperator::Add,
        SyntaxKind::MinusToken => BinaryOperator::Sub,
        SyntaxKind::AsteriskToken => BinaryOperator::Mul,
        SyntaxKind::SlashToken => BinaryOperator::Div,
        SyntaxKind::PercentToken => BinaryOperator::Mod,
        SyntaxKind::AsteriskAsteriskToken => BinaryOperator::Exp,
        _ => return None,
    };
    Some(InfixOperator::Binary(op))
}

/// Get the assignment operator for a token. The logical assignments
/// (`&&=`, `||=`, `??=`) are not part of the accepted grammar and map to None.
pub(crate) fn assignment_operator(kind: SyntaxKind) -> Option<AssignmentOperator> {
    let op = match kind {
        SyntaxKind::EqualsToken => AssignmentOperator::Assign,
        SyntaxKind::PlusEqualsToken => AssignmentOperator::Add,
        SyntaxKind::MinusEqualsToken => AssignmentOperator::Sub,
        SyntaxKind::AsteriskEqualsToken => AssignmentOperator::Mul,
        SyntaxKind::AsteriskAsteriskEqualsToken => AssignmentOperator::Exp,
        SyntaxKind::SlashEqualsToken => AssignmentOperator::Div,
        SyntaxKind::PercentEqualsToken => AssignmentOperator::Mod,
        SyntaxKind::LessThanLessThanEqualsToken => AssignmentOperator::LShift,
        SyntaxKind::GreaterThanGreaterThanEqualsToken => AssignmentOperator::RShift,
        SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken => AssignmentOperator::URShift,
        SyntaxKind::AmpersandEqualsToken => AssignmentOperator::BitAnd,
        SyntaxKind::BarEqualsToken => AssignmentOperator::BitOr,
        SyntaxKind::CaretEqualsToken => AssignmentOperator::BitXor,
        _ => return None,
    };
    Some(op)
}

/// Get the prefix unary operator for a token. `++`/`--` are update
/// operators and are handled separately.
pub(crate) fn unary_operator(kind: SyntaxKind) -> Option<UnaryOperator> {
    let op = match kind {
        SyntaxKind::MinusToken => UnaryOperator::Minus,
        SyntaxKind::PlusToken => UnaryOperator::Plus,
        SyntaxKind::ExclamationToken => UnaryOperator::Not,
        SyntaxKind::TildeToken => UnaryOperator::BitNot,
        SyntaxKind::TypeOfKeyword => UnaryOperator::TypeOf,
        SyntaxKind::VoidKeyword => UnaryOperator::Void,
        SyntaxKind::DeleteKeyword => UnaryOperator::Delete,
        _ => return None,
    };
    Some(op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_binds_looser_than_bitwise() {
        let or = infix_operator(SyntaxKind::BarBarToken).unwrap();
        let bit_or = infix_operator(SyntaxKind::BarToken).unwrap();
        assert!(or.precedence() < bit_or.precedence());
    }

    #[test]
    fn test_every_compound_assignment_maps() {
        let compound = [
            SyntaxKind::PlusEqualsToken,
            SyntaxKind::AsteriskAsteriskEqualsToken,
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
            SyntaxKind::CaretEqualsToken,
        ];
        for kind in compound {
            assert!(assignment_operator(kind).is_some_and(|op| op.is_compound()));
        }
        assert_eq!(assignment_operator(SyntaxKind::BarBarEqualsToken), None);
    }

    #[test]
    fn test_update_tokens_are_not_unary_operators() {
        assert_eq!(unary_operator(SyntaxKind::PlusPlusToken), None);
        assert_eq!(unary_operator(SyntaxKind::TypeOfKeyword), Some(UnaryOperator::TypeOf));
    }
}
