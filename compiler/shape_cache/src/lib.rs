//! Recursion-safe cache of constructed shape validators.
//!
//! Every per-shape builder follows one protocol:
//!
//! ```text
//! fn extension(reg: &Registry) -> BuildResult<Schema> {
//!     reg.get_or_build("Extension", &[], || {
//!         Ok(Schema::object([
//!             Field::required("url", Schema::string()),
//!             Field::optional("extension", Schema::array(extension(reg)?)),
//!         ]))
//!     })
//! }
//! ```
//!
//! The inner `extension(reg)` call arrives while `"Extension"` is pending and
//! is answered with a lazy cell, so the builder terminates and the finished
//! validator checks arbitrarily deep extension nesting.
//!
//! Parameterized shapes pass the identities of their payload validators:
//!
//! ```text
//! reg.get_or_build("Bundle", &[resource.param()], || { ... })
//! ```

mod config;
mod error;
mod lazy;
mod registry;
mod stats;

pub use config::RegistryConfig;
pub use error::{BuildError, BuildResult};
pub use lazy::LazyCell;
pub use registry::{EntryState, Lookup, Registry};
pub use stats::CacheStats;

// Builders and their callers only need these two crates' types.
pub use shape_ir::{CacheKey, ParamId};
pub use shape_schema::{Field, Schema};
