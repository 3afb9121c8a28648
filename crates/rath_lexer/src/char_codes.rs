//! Byte classes used by the lexer. Source text is scanned as ASCII bytes;
//! any non-ASCII byte outside a string literal is an invalid character.

pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const SPACE: u8 = b' ';
pub const TAB: u8 = b'\t';
pub const DOUBLE_QUOTE: u8 = b'"';
pub const DOT: u8 = b'.';

/// Whitespace that never produces a token.
#[inline]
pub fn is_inline_white_space(byte: u8) -> bool {
    matches!(byte, SPACE | TAB | CARRIAGE_RETURN)
}

#[inline]
pub fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

/// Digits and the decimal point.
#[inline]
pub fn is_number_part(byte: u8) -> bool {
    is_digit(byte) || byte == DOT
}

#[inline]
pub fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$'
}

#[inline]
pub fn is_identifier_part(byte: u8) -> bool {
    is_identifier_start(byte) || is_digit(byte)
}
