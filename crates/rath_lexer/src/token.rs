//! Tokens produced by the lexer.

use rath_ast::syntax_kind::TokenKind;
use rath_core::text::SourceLoc;
use std::fmt;

/// A lexed token. `text` borrows from the source buffer.
///
/// For string literals `text` is the body between the quotes and `loc`
/// starts at the first body byte. For every other kind `text` is exactly
/// the consumed source.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub loc: SourceLoc,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, loc: SourceLoc) -> Self {
        Self { kind, text, loc }
    }

    /// Whether this is a real token rather than the end of input.
    #[inline]
    pub fn is_present(&self) -> bool {
        self.kind != TokenKind::EndOfFile
    }

    #[inline]
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    /// Description used in "Expected X, got Y" diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Identifier
            | TokenKind::NumberLiteral
            | TokenKind::Keyword
            | TokenKind::Operator => format!("{} '{}'", self.kind.name(), self.text),
            TokenKind::StringLiteral => format!("String \"{}\"", self.text),
            _ => self.kind.name().to_string(),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier | TokenKind::NumberLiteral | TokenKind::Keyword | TokenKind::Operator => {
                write!(f, "{} {}", self.kind.name(), self.text)
            }
            TokenKind::StringLiteral => write!(f, "String {:?}", self.text),
            _ => write!(f, "{}", self.kind.name()),
        }
    }
}
