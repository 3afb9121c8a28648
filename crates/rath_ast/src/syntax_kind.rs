//! TokenKind enum - every token kind the lexer produces.

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    EndOfFile = 0,
    Newline = 1,
    Identifier = 2,
    StringLiteral = 3,
    NumberLiteral = 4,
    Keyword = 5,
    Operator = 6,
    OpenParen = 7,
    CloseParen = 8,
    OpenBrace = 9,
    CloseBrace = 10,
    OpenBracket = 11,
    CloseBracket = 12,
    Comma = 13,
    Arrow = 14,
    Semicolon = 15,
}

impl TokenKind {
    /// Short name used in diagnostics ("Expected RParen, got Comma").
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::EndOfFile => "Eof",
            TokenKind::Newline => "Newline",
            TokenKind::Identifier => "Ident",
            TokenKind::StringLiteral => "String",
            TokenKind::NumberLiteral => "Number",
            TokenKind::Keyword => "Keyword",
            TokenKind::Operator => "Operator",
            TokenKind::OpenParen => "LParen",
            TokenKind::CloseParen => "RParen",
            TokenKind::OpenBrace => "LCurly",
            TokenKind::CloseBrace => "RCurly",
            TokenKind::OpenBracket => "LBracket",
            TokenKind::CloseBracket => "RBracket",
            TokenKind::Comma => "Comma",
            TokenKind::Arrow => "Arrow",
            TokenKind::Semicolon => "Semicolon",
        }
    }

    /// The kind of a single-character grammar punctuation byte, if it is one.
    pub fn from_punctuation(byte: u8) -> Option<TokenKind> {
        match byte {
            b'(' => Some(TokenKind::OpenParen),
            b')' => Some(TokenKind::CloseParen),
            b'{' => Some(TokenKind::OpenBrace),
            b'}' => Some(TokenKind::CloseBrace),
            b'[' => Some(TokenKind::OpenBracket),
            b']' => Some(TokenKind::CloseBracket),
            b',' => Some(TokenKind::Comma),
            b';' => Some(TokenKind::Semicolon),
            _ => None,
        }
    }

    /// Get the source text of fixed punctuation tokens.
    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            TokenKind::OpenParen => Some("("),
            TokenKind::CloseParen => Some(")"),
            TokenKind::OpenBrace => Some("{"),
            TokenKind::CloseBrace => Some("}"),
            TokenKind::OpenBracket => Some("["),
            TokenKind::CloseBracket => Some("]"),
            TokenKind::Comma => Some(","),
            TokenKind::Semicolon => Some(";"),
            TokenKind::Arrow => Some("->"),
            _ => None,
        }
    }

    /// Whether a token of this kind ends a statement.
    #[inline]
    pub fn is_terminator(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Semicolon)
    }
}
