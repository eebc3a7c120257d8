//! Forward references to validators that are still being constructed.
//!
//! A builder that asks for a shape already under construction cannot be given
//! the finished validator: it does not exist yet. It is given a [`Deferred`]
//! instead, wrapped as an ordinary [`Schema`] so every composition operation
//! accepts it. The cell resolves to the real validator the first time a value
//! is checked through it.
//!
//! The implementation lives with the registry that owns the entries; this
//! crate only defines the seam.

use std::fmt;

use shape_ir::CacheKey;

use crate::Schema;

/// A validator-shaped placeholder for a cache entry.
pub trait Deferred: Send + Sync + fmt::Debug {
    /// The entry this cell stands in for.
    fn key(&self) -> &CacheKey;

    /// Rendered key, for diagnostics.
    fn shape(&self) -> &str;

    /// Resolve to the completed validator.
    ///
    /// Must only fail if construction discipline was broken: the entry is
    /// still pending, was never built, or its registry is gone.
    fn resolve(&self) -> Result<Schema, ProtocolViolation>;
}

/// A forward reference was used before its entry was ready.
///
/// This is a bug in how validators were constructed, never a problem with the
/// data being validated. It must not be reported as a validation issue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolViolation {
    /// Used while its own construction was still running.
    #[error("forward reference to `{shape}` used while its construction is still pending")]
    Pending { shape: String },

    /// The entry is empty: never built, or rolled back after a failure.
    #[error("forward reference to `{shape}` used but the shape was never built")]
    NeverBuilt { shape: String },

    /// The registry that issued the cell has been dropped.
    #[error("forward reference to `{shape}` outlived its registry")]
    RegistryDropped { shape: String },

    /// The shape reaches itself again through optionals, unions or tagged
    /// variants alone, so checking it never descends into the value.
    #[error("`{shape}` refers to itself without consuming any input")]
    Unproductive { shape: String },
}
