//! Validator identities.
//!
//! A validator's identity is a process-unique counter value assigned when the
//! validator is created. Unlike a pointer address it is never reused, so a
//! key built from a dropped parameter can never collide with a later one.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Next identity to hand out. Zero is reserved for `ParamId::NONE`.
static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one constructed validator.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct SchemaId(u64);

impl SchemaId {
    /// Allocate a fresh identity.
    #[inline]
    pub fn fresh() -> Self {
        // Relaxed is enough: uniqueness only needs atomicity, not ordering.
        SchemaId(NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaId({})", self.0)
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One slot of a shape's parameter list.
///
/// Either [`ParamId::NONE`] ("no substitution") or the identity of the
/// validator substituted into that slot.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct ParamId(u64);

impl ParamId {
    /// Sentinel for "no substitution in this slot".
    pub const NONE: Self = ParamId(0);

    /// Parameter slot filled by the validator with identity `id`.
    #[inline]
    pub const fn of(id: SchemaId) -> Self {
        ParamId(id.0)
    }

    /// Parameter slot filled by `id` if present, `NONE` otherwise.
    #[inline]
    pub fn of_opt(id: Option<SchemaId>) -> Self {
        id.map_or(Self::NONE, Self::of)
    }

    /// Check if this is the `NONE` sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<SchemaId> for ParamId {
    fn from(id: SchemaId) -> Self {
        ParamId::of(id)
    }
}

impl fmt::Debug for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("ParamId::NONE")
        } else {
            write!(f, "ParamId({})", self.0)
        }
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("_")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}
