//! Parser utility functions.

use rath_ast::node::Expr;
use rath_ast::syntax_kind::TokenKind;

/// Whether a statement of this shape must be followed by a terminator
/// (newline or `;`). Forms that end in a closing brace do not need one.
pub fn expects_end(expr: &Expr<'_>) -> bool {
    match expr {
        Expr::Switch(_) | Expr::Block(_) => false,
        Expr::If(n) => expects_end(n.else_body.unwrap_or(n.body)),
        Expr::Binop(n) => expects_end(n.right),
        Expr::Unop(n) => expects_end(n.operand),
        Expr::Function(n) => expects_end(n.body),
        Expr::Assign(n) => expects_end(n.value),
        Expr::Return(n) => n.value.map_or(true, expects_end),
        Expr::Constant(_) | Expr::Call(_) => true,
    }
}

/// Tokens that end a statement list without needing a terminator before them.
#[inline]
pub fn is_list_end(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::CloseBrace | TokenKind::EndOfFile)
}

/// Tokens after which a `return` has no value.
#[inline]
pub fn ends_return_value(kind: TokenKind) -> bool {
    kind.is_terminator() || is_list_end(kind)
}
