//! The per-compile arena.
//!
//! Tokens borrow the source text; nodes, including the constants produced by
//! folding, live in one bump arena. A compile owns one arena, and dropping it
//! releases every node at once whether the compile finished or stopped at a
//! diagnostic.

use bumpalo::Bump;

/// Rough arena bytes needed per byte of source; avoids regrowing the first
/// chunk for typical files.
const BYTES_PER_SOURCE_BYTE: usize = 8;

/// Smallest first chunk handed out by [`CompilerArena::for_source`].
const MIN_CAPACITY: usize = 1024;

/// Owns the bump allocator for one compile.
pub struct CompilerArena {
    bump: Bump,
}

impl CompilerArena {
    pub fn new() -> Self {
        Self { bump: Bump::new() }
    }

    /// An arena whose first chunk is sized for a source of `source_len` bytes.
    pub fn for_source(source_len: usize) -> Self {
        let capacity = source_len.saturating_mul(BYTES_PER_SOURCE_BYTE).max(MIN_CAPACITY);
        Self {
            bump: Bump::with_capacity(capacity),
        }
    }

    /// The allocator handed to the parser and the folder.
    #[inline]
    pub fn bump(&self) -> &Bump {
        &self.bump
    }

    /// Total bytes held by the arena's chunks.
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }
}

impl Default for CompilerArena {
    fn default() -> Self {
        Self::new()
    }
}
