//! Shape IR - identities shared by the schema registry
//!
//! This crate holds the small, `Copy`-heavy data every other layer keys on:
//! - `ShapeName` for interned shape-family names
//! - `SchemaId` for the identity of a constructed validator
//! - `ParamId` for one slot of a shape's parameter list
//! - `CacheKey` for the full (name, parameters) identity of a cache entry
//!
//! # Design Philosophy
//!
//! - **Intern names**: `"Observation"` becomes `ShapeName(u32)`, so key equality
//!   never compares string contents.
//! - **Identity, not structure**: parameters are compared by the identity of the
//!   validator that was passed, never by what it accepts.
//! - **No recursion in keys**: computing, hashing, or comparing a key is plain
//!   data work. Nothing here can call back into a builder.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod id;
mod interner;
mod key;
mod name;

pub use id::{ParamId, SchemaId};
pub use interner::{InternError, NameInterner};
pub use key::{CacheKey, KeyDisplay, Params};
pub use name::ShapeName;

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{ParamId, SchemaId, ShapeName};
    static_assert_size!(ShapeName, 4);
    static_assert_size!(SchemaId, 8);
    static_assert_size!(ParamId, 8);
}
