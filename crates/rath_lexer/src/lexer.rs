//! The rath lexer.
//!
//! Converts a source buffer into tokens on demand. Newlines are significant
//! (they terminate statements) and are returned as [`TokenKind::Newline`];
//! all other whitespace is skipped.

use crate::char_codes::*;
use crate::token::Token;
use rath_ast::grammar::Grammar;
use rath_ast::syntax_kind::TokenKind;
use rath_core::text::SourceLoc;
use rath_diagnostics::{messages, Diagnostic, DiagnosticResult, SourceText};

/// A lazy, restartable token stream over one source buffer.
pub struct Lexer<'a> {
    grammar: &'a Grammar,
    source: SourceText<'a>,
    /// Current byte position in the text.
    pos: usize,
    /// 1-based line of `pos`.
    line: u32,
    /// Set once the iterator has yielded end of input or an error.
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer with an empty buffer.
    pub fn new(grammar: &'a Grammar) -> Self {
        Self {
            grammar,
            source: SourceText::new("", ""),
            pos: 0,
            line: 1,
            finished: false,
        }
    }

    /// Reset the lexer onto a new buffer.
    pub fn feed(&mut self, file_name: &'a str, text: &'a str) {
        self.source = SourceText::new(file_name, text);
        self.pos = 0;
        self.line = 1;
        self.finished = false;
    }

    /// Lex the whole buffer, including the trailing end-of-input token.
    pub fn tokenize(&mut self) -> DiagnosticResult<Vec<Token<'a>>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            tokens.push(token);
            if !token.is_present() {
                return Ok(tokens);
            }
        }
    }

    // ========================================================================
    // Character helpers
    // ========================================================================

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.source.text.as_bytes()
    }

    #[inline]
    fn current_byte(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.current_byte().is_some_and(&pred) {
            self.pos += 1;
        }
    }

    fn loc_from(&self, start: usize, line: u32) -> SourceLoc {
        SourceLoc::new(start as u32, (self.pos - start) as u32, line)
    }

    fn token_from(&self, kind: TokenKind, start: usize, line: u32) -> Token<'a> {
        let text = self.source.text;
        Token::new(kind, &text[start..self.pos], self.loc_from(start, line))
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    /// Produce the next token. Once the end is reached every further call
    /// returns another end-of-input token.
    pub fn next_token(&mut self) -> DiagnosticResult<Token<'a>> {
        self.eat_while(is_inline_white_space);

        let start = self.pos;
        let line = self.line;
        let Some(byte) = self.current_byte() else {
            return Ok(Token::new(TokenKind::EndOfFile, "", SourceLoc::new(start as u32, 0, line)));
        };

        if byte == LINE_FEED {
            self.pos += 1;
            self.line += 1;
            return Ok(self.token_from(TokenKind::Newline, start, line));
        }
        if byte == DOUBLE_QUOTE {
            return Ok(self.scan_string());
        }
        if is_digit(byte) {
            return self.scan_number();
        }
        if self.grammar.is_operator_char(byte) {
            return self.scan_operator();
        }
        if is_identifier_start(byte) {
            return Ok(self.scan_identifier());
        }
        if let Some(kind) = TokenKind::from_punctuation(byte) {
            self.pos += 1;
            return Ok(self.token_from(kind, start, line));
        }

        // Report the whole (possibly multi-byte) character.
        let ch = self.source.text[start..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
        let loc = SourceLoc::new(start as u32, ch.len_utf8() as u32, line);
        Err(self.source.error(loc, &messages::INVALID_CHAR_0, &[&ch.to_string()]))
    }

    /// String literal: everything up to the next `"`, with no escapes. An
    /// unterminated literal runs to the end of the buffer.
    fn scan_string(&mut self) -> Token<'a> {
        let line = self.line;
        let body_start = self.pos + 1;
        let rest = &self.bytes()[body_start..];
        let body_end = memchr::memchr(DOUBLE_QUOTE, rest).map_or(self.bytes().len(), |i| body_start + i);

        let body = &self.source.text[body_start..body_end];
        self.line += memchr::memchr_iter(LINE_FEED, body.as_bytes()).count() as u32;
        self.pos = (body_end + 1).min(self.bytes().len());

        let loc = SourceLoc::new(body_start as u32, body.len() as u32, line);
        Token::new(TokenKind::StringLiteral, body, loc)
    }

    /// Number literal: a run of digits and dots, at most one dot.
    fn scan_number(&mut self) -> DiagnosticResult<Token<'a>> {
        let start = self.pos;
        let line = self.line;
        self.eat_while(is_number_part);

        let token = self.token_from(TokenKind::NumberLiteral, start, line);
        if memchr::memchr_iter(DOT, token.text.as_bytes()).count() > 1 {
            return Err(self
                .source
                .error(token.loc, &messages::INVALID_FLOAT_LITERAL_0, &[token.text]));
        }
        Ok(token)
    }

    /// Operator: the longest run of operator characters, which must be an
    /// entry of the grammar's operator table.
    fn scan_operator(&mut self) -> DiagnosticResult<Token<'a>> {
        let start = self.pos;
        let line = self.line;
        let grammar = self.grammar;
        self.eat_while(|b| grammar.is_operator_char(b));

        let token = self.token_from(TokenKind::Operator, start, line);
        match grammar.operator(token.text) {
            Some(info) if info.operator == rath_ast::Operator::Arrow => Ok(Token {
                kind: TokenKind::Arrow,
                ..token
            }),
            Some(_) => Ok(token),
            None => Err(self
                .source
                .error(token.loc, &messages::INVALID_OPERATOR_0, &[token.text])),
        }
    }

    fn scan_identifier(&mut self) -> Token<'a> {
        let start = self.pos;
        let line = self.line;
        self.eat_while(is_identifier_part);

        let token = self.token_from(TokenKind::Identifier, start, line);
        if self.grammar.keyword(token.text).is_some() {
            Token {
                kind: TokenKind::Keyword,
                ..token
            }
        } else {
            token
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = DiagnosticResult<Token<'a>>;

    /// Yields every token up to and including end of input, or up to the
    /// first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        self.finished = !matches!(&result, Ok(token) if token.is_present());
        Some(result)
    }
}
