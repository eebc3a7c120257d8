//! Lazy construction cells.
//!
//! Handed out when a shape is requested while its own construction is still
//! running. A cell holds the key and a weak handle to the registry: the
//! registry owns the real validator, the cell only knows where to find it.

use std::fmt;
use std::sync::{OnceLock, Weak};

use shape_ir::CacheKey;
use shape_schema::{Deferred, ProtocolViolation, Schema, WeakSchema};

use crate::registry::{Lookup, Shared};

pub struct LazyCell {
    key: CacheKey,
    /// Rendered key, for diagnostics after the registry is gone.
    shape: String,
    registry: Weak<Shared>,
    /// First successful resolution, held weakly so a self-referential
    /// validator does not keep itself alive.
    resolved: OnceLock<WeakSchema>,
}

impl LazyCell {
    pub(crate) fn new(key: CacheKey, shared: &Shared, registry: Weak<Shared>) -> Self {
        Self {
            shape: shared.describe(&key),
            key,
            registry,
            resolved: OnceLock::new(),
        }
    }
}

impl Deferred for LazyCell {
    fn key(&self) -> &CacheKey {
        &self.key
    }

    fn shape(&self) -> &str {
        &self.shape
    }

    fn resolve(&self) -> Result<Schema, ProtocolViolation> {
        if let Some(schema) = self.resolved.get().and_then(WeakSchema::upgrade) {
            return Ok(schema);
        }

        let Some(shared) = self.registry.upgrade() else {
            return Err(ProtocolViolation::RegistryDropped {
                shape: self.shape.clone(),
            });
        };

        match shared.lookup(&self.key) {
            Lookup::Ready(schema) => {
                // A rebuilt entry (after rollback) is a different node; keep
                // the first one we saw only while it is alive.
                let _ = self.resolved.set(schema.downgrade());
                Ok(schema)
            }
            Lookup::Pending => Err(ProtocolViolation::Pending {
                shape: self.shape.clone(),
            }),
            Lookup::Empty => Err(ProtocolViolation::NeverBuilt {
                shape: self.shape.clone(),
            }),
        }
    }
}

impl fmt::Debug for LazyCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyCell")
            .field("shape", &self.shape)
            .field("resolved", &self.resolved.get().is_some())
            .finish()
    }
}
