//! rath_lexer: tokenizer for rath source text.
//!
//! Produces [`Token`]s lazily from a buffer:
//! - string literals (no escapes)
//! - integer and float literals
//! - operators validated against the grammar's operator table
//! - identifiers and keywords
//! - punctuation and significant newlines

mod char_codes;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::Token;
