//! rath_folder: Constant folding.
//!
//! Rewrites a parsed tree bottom-up, replacing operators applied to literal
//! operands with their computed value. Variables are never folded.

mod eval;
mod folder;

pub use eval::{evaluate_binary, EvalError};
pub use folder::Folder;
