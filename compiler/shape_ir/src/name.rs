//! Interned shape-family name.

use std::fmt;

/// Interned name of a shape family (`"Patient"`, `"Bundle"`, ...).
///
/// Only meaningful together with the [`NameInterner`](crate::NameInterner)
/// that produced it. Two names from the same interner are equal iff their
/// strings are equal.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ShapeName(u32);

impl ShapeName {
    /// Create from a raw interner index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        ShapeName(raw)
    }

    /// Get the raw interner index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the interner's string table.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ShapeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShapeName({})", self.0)
    }
}
