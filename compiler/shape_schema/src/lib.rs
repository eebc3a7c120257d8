//! Structural validators for clinical-resource shapes.
//!
//! A validator is built once by composing smaller validators
//! (`array`, `optional`, `object` fields, `union`, `tagged`) and then used,
//! read-only, to check any number of JSON values from any number of threads.
//!
//! Recursive shapes close their cycles through [`Deferred`] forward references
//! issued by the registry that builds them (see `shape_cache`). From the
//! outside a deferred validator is just another [`Schema`].

mod deferred;
mod issue;
mod schema;
pub mod stack;
mod validate;

pub use deferred::{Deferred, ProtocolViolation};
pub use issue::{Issue, IssueCode, Issues, Path, PathSegment, Report};
pub use schema::{Field, ObjectShape, Schema, SchemaKind, TaggedShape, UnknownKeys, WeakSchema};
pub use validate::{ValidateOptions, DEFAULT_MAX_DEPTH};

// Validators are shared read-only across validation threads.
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Schema>();
};
