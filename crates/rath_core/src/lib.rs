//! rath_core: Core utilities for the rath compiler front end.
//!
//! Provides source location types and the bump arena shared by the lexer,
//! parser and constant folder.

pub mod arena;
pub mod text;

// Re-export commonly used types
pub use arena::CompilerArena;
pub use text::{SourceLoc, TextPos, TextSpan};
