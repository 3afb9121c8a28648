//! Source positions.
//!
//! Tokens, AST nodes and diagnostics all point back into the source buffer
//! through a [`SourceLoc`].

use std::fmt;
use std::ops::Range;

/// A byte offset into the source buffer.
pub type TextPos = u32;

/// The bytes a token covers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextSpan {
    pub start: TextPos,
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// One past the last byte.
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    /// The span as a byte range, for slicing the source or labelling reports.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

/// A source location: the span of a token plus the 1-based line it starts on.
///
/// Every token and every AST node carries one of these so that diagnostics
/// raised long after lexing can still point at the offending source line.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SourceLoc {
    pub span: TextSpan,
    /// 1-based line number.
    pub line: u32,
}

impl SourceLoc {
    #[inline]
    pub fn new(start: TextPos, length: TextPos, line: u32) -> Self {
        Self {
            span: TextSpan::new(start, length),
            line,
        }
    }

    /// Byte offset of the first byte of this location.
    #[inline]
    pub fn offset(&self) -> TextPos {
        self.span.start
    }
}

impl fmt::Debug for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?}", self.line, self.span)
    }
}
