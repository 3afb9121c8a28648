//! rath_ast: token kinds, grammar tables and the expression tree.
//!
//! The node set is closed: every stage matches on [`Expr`] exhaustively.

pub mod grammar;
pub mod node;
pub mod syntax_kind;
pub mod types;

// Re-export key types
pub use grammar::{Associativity, Grammar, Keyword, Operator, OperatorInfo, OperatorPrecedence};
pub use node::*;
pub use syntax_kind::TokenKind;
pub use types::*;
