//! rath_parser: Recursive descent parser for rath.
//!
//! Parses the token stream from the lexer into an arena-allocated
//! expression tree.

mod parser;
mod precedence;
mod utilities;

pub use parser::{Parser, MAX_RECURSION_DEPTH};
pub use utilities::expects_end;
