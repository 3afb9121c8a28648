//! rath_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Every failure in the lexer, parser or constant folder is described by one
//! entry of the [`messages`] table and surfaces as a single [`Diagnostic`]
//! carrying a rendered, source-located message. There is no accumulation:
//! the first diagnostic ends the compile.

use rath_core::text::SourceLoc;
use std::fmt;

/// The front-end stage that raised a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticStage {
    Lex,
    Parse,
    Fold,
}

impl fmt::Display for DiagnosticStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticStage::Lex => write!(f, "lex"),
            DiagnosticStage::Parse => write!(f, "parse"),
            DiagnosticStage::Fold => write!(f, "fold"),
        }
    }
}

/// The error taxonomy of the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // Lexer
    InvalidChar,
    InvalidFloatLiteral,
    InvalidOperator,
    // Parser
    UnexpectedToken,
    UnexpectedKeyword,
    EmptyDeclaration,
    InvalidPackedSingle,
    IllegalAssignmentOperator,
    IllegalVarargsOperator,
    InvalidIntLiteral,
    NestingTooDeep,
    // Constant folder
    InvalidUnaryOperator,
    InvalidConstantOperator,
    DivisionByZero,
}

impl ErrorKind {
    /// The stage that raises this kind of error.
    pub fn stage(self) -> DiagnosticStage {
        match self {
            ErrorKind::InvalidChar | ErrorKind::InvalidFloatLiteral | ErrorKind::InvalidOperator => {
                DiagnosticStage::Lex
            }
            ErrorKind::UnexpectedToken
            | ErrorKind::UnexpectedKeyword
            | ErrorKind::EmptyDeclaration
            | ErrorKind::InvalidPackedSingle
            | ErrorKind::IllegalAssignmentOperator
            | ErrorKind::IllegalVarargsOperator
            | ErrorKind::InvalidIntLiteral
            | ErrorKind::NestingTooDeep => DiagnosticStage::Parse,
            ErrorKind::InvalidUnaryOperator
            | ErrorKind::InvalidConstantOperator
            | ErrorKind::DivisionByZero => DiagnosticStage::Fold,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A diagnostic message template with a code and kind.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// The diagnostic error code (e.g., 1002, 2004).
    pub code: u32,
    /// The error kind this message reports.
    pub kind: ErrorKind,
    /// The message template string. May contain `{0}`, `{1}` placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{rendered}")]
pub struct Diagnostic {
    /// The error kind.
    pub kind: ErrorKind,
    /// The diagnostic error code.
    pub code: u32,
    /// The file the diagnostic was raised in.
    pub file: String,
    /// Location of the offending token.
    pub loc: SourceLoc,
    /// The message with its placeholders filled in.
    pub message_text: String,
    /// The full rendering: file, line, source line and message.
    pub rendered: String,
}

impl Diagnostic {
    /// Create a diagnostic against `source` at `loc`.
    pub fn new(source: &SourceText<'_>, loc: SourceLoc, message: &DiagnosticMessage, args: &[&str]) -> Self {
        let message_text = format_message(message.message, args);
        let rendered = render_source_line(
            source.text,
            loc.offset() as usize,
            loc.line,
            source.file_name,
            &message_text,
        );
        Self {
            kind: message.kind,
            code: message.code,
            file: source.file_name.to_string(),
            loc,
            message_text,
            rendered,
        }
    }

    pub fn stage(&self) -> DiagnosticStage {
        self.kind.stage()
    }

    /// Byte offset of the offending token.
    pub fn offset(&self) -> u32 {
        self.loc.offset()
    }

    pub fn line(&self) -> u32 {
        self.loc.line
    }
}

/// Convenient `Result` alias for fallible front-end operations.
pub type DiagnosticResult<T> = Result<T, Diagnostic>;

/// The file name and text that diagnostics are reported against.
#[derive(Debug, Clone, Copy)]
pub struct SourceText<'a> {
    pub file_name: &'a str,
    pub text: &'a str,
}

impl<'a> SourceText<'a> {
    pub fn new(file_name: &'a str, text: &'a str) -> Self {
        Self { file_name, text }
    }

    /// Build a diagnostic located at `loc` in this source.
    pub fn error(&self, loc: SourceLoc, message: &DiagnosticMessage, args: &[&str]) -> Diagnostic {
        Diagnostic::new(self, loc, message, args)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Render a source-located message.
///
/// The line containing `offset` is located by scanning back to the previous
/// `\n` (or the start of the buffer) and forward to the next `\n` (or the end),
/// its leading whitespace is trimmed, and the message is placed on an indented
/// line underneath:
///
/// ```text
/// Error in main.rath on line 3: let x = 1.2.3
///   Invalid float literal 1.2.3
/// ```
pub fn render_source_line(source: &str, offset: usize, line: u32, file_name: &str, message: &str) -> String {
    let bytes = source.as_bytes();
    let offset = offset.min(bytes.len());
    let start = memchr::memrchr(b'\n', &bytes[..offset]).map_or(0, |i| i + 1);
    let end = memchr::memchr(b'\n', &bytes[start..]).map_or(bytes.len(), |i| start + i);
    let text = source[start..end].trim_start().trim_end_matches('\r');
    format!("Error in {} on line {}: {}\n  {}", file_name, line, text, message)
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::{DiagnosticMessage, ErrorKind};

    macro_rules! diag {
        ($code:expr, $kind:ident, $msg:expr) => {
            DiagnosticMessage {
                code: $code,
                kind: ErrorKind::$kind,
                message: $msg,
            }
        };
    }

    // ========================================================================
    // Lexer errors
    // ========================================================================
    pub const INVALID_CHAR_0: DiagnosticMessage = diag!(1001, InvalidChar, "Invalid char: {0}");
    pub const INVALID_FLOAT_LITERAL_0: DiagnosticMessage = diag!(1002, InvalidFloatLiteral, "Invalid float literal {0}");
    pub const INVALID_OPERATOR_0: DiagnosticMessage = diag!(1003, InvalidOperator, "Invalid operator {0}");

    // ========================================================================
    // Parser errors
    // ========================================================================
    pub const EXPECTED_0_GOT_1: DiagnosticMessage = diag!(2001, UnexpectedToken, "Expected {0}, got {1}");
    pub const UNEXPECTED_KEYWORD_0: DiagnosticMessage = diag!(2002, UnexpectedKeyword, "Unexpected keyword '{0}'");
    pub const NO_VARIABLE_NAME_PROVIDED: DiagnosticMessage = diag!(2003, EmptyDeclaration, "No variable name provided");
    pub const SINGLE_VARIABLE_DECLARATION_CANNOT_BE_PACKED: DiagnosticMessage =
        diag!(2004, InvalidPackedSingle, "Single variable declaration does not need to be packed");
    pub const ASSIGNMENT_ONLY_ALLOWED_IN_DECLARATION: DiagnosticMessage =
        diag!(2005, IllegalAssignmentOperator, "'=' only allowed in variable declaration");
    pub const ILLEGAL_VARARGS_OPERATOR: DiagnosticMessage = diag!(2006, IllegalVarargsOperator, "Illegal varargs '...' operator");
    pub const INTEGER_LITERAL_0_TOO_LARGE: DiagnosticMessage =
        diag!(2007, InvalidIntLiteral, "Integer literal {0} does not fit in 64 bits");
    pub const NESTING_EXCEEDS_0_LEVELS: DiagnosticMessage = diag!(2008, NestingTooDeep, "Expression nesting exceeds {0} levels");

    // ========================================================================
    // Constant folding errors
    // ========================================================================
    pub const INVALID_UNARY_OPERATOR_0_ON_CONSTANT: DiagnosticMessage =
        diag!(3001, InvalidUnaryOperator, "Invalid unary operator {0} on constant expression");
    pub const INVALID_OPERATOR_0_ON_CONSTANTS: DiagnosticMessage =
        diag!(3002, InvalidConstantOperator, "Invalid operator {0} on constant expressions");
    pub const DIVISION_BY_ZERO: DiagnosticMessage = diag!(3003, DivisionByZero, "Division by zero in constant expression");
}
