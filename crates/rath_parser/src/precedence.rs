//! Operator precedence lookups for binary and unary operators.

use rath_ast::grammar::{Associativity, Grammar, OperatorInfo};
use rath_ast::syntax_kind::TokenKind;
use rath_lexer::Token;

/// The operator-table row for `token`, if it is an operator token.
pub fn operator_info<'g>(grammar: &'g Grammar, token: &Token<'_>) -> Option<&'g OperatorInfo> {
    if token.kind != TokenKind::Operator {
        return None;
    }
    grammar.operator(token.text)
}

/// Minimum precedence for the right operand of a binary operator: one level
/// higher for left-associative operators, the same level for right-associative.
pub fn right_operand_threshold(info: &OperatorInfo, level: u8) -> u8 {
    match info.associativity {
        Associativity::Left => level + 1,
        Associativity::Right => level,
    }
}

/// Minimum precedence for the operand of a prefix operator: the operator's
/// own level, so `-a - b` is `-(a - b)`.
pub fn prefix_operand_threshold(info: &OperatorInfo) -> u8 {
    info.precedence.map_or(0, |p| p.level())
}
