//! Flag types for the AST.

use std::fmt;

bitflags::bitflags! {
    /// Binding flags on a variable, parameter or `let` target.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VarFlags: u8 {
        const NONE   = 0;
        const REF    = 1 << 0;
        const CONST  = 1 << 1;
        /// Captures a variable-length tail of values (`...name`).
        const PACKED = 1 << 2;
    }
}

impl fmt::Display for VarFlags {
    /// Renders the set flags in source order, e.g. `ref const ...`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, text) in [
            (VarFlags::REF, "ref"),
            (VarFlags::CONST, "const"),
            (VarFlags::PACKED, "..."),
        ] {
            if self.contains(flag) {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{}", text)?;
                first = false;
            }
        }
        Ok(())
    }
}
