//! String interner for shape names.
//!
//! Shape names are few (hundreds) and hot: every builder call interns one.
//! A single read-mostly table is enough; the write lock is only taken the
//! first time a name is seen.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ShapeName;

/// Error when interning a name fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternError {
    /// The table exceeded `u32::MAX` names.
    Overflow { count: usize },
}

impl std::fmt::Display for InternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InternError::Overflow { count } => write!(
                f,
                "shape name interner exceeded capacity: {count} names, max is {}",
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for InternError {}

#[derive(Default)]
struct InternTable {
    /// Map from name contents to index.
    map: FxHashMap<&'static str, u32>,
    /// Name contents, indexed by `ShapeName::index`.
    strings: Vec<&'static str>,
}

/// Thread-safe shape name interner.
///
/// Interned strings are leaked and never freed; lookups hand out `'static`
/// references.
#[derive(Default)]
pub struct NameInterner {
    table: RwLock<InternTable>,
}

impl NameInterner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to intern a name, returning its handle or an error on overflow.
    pub fn try_intern(&self, s: &str) -> Result<ShapeName, InternError> {
        // Fast path: already interned
        if let Some(&idx) = self.table.read().map.get(s) {
            return Ok(ShapeName::from_raw(idx));
        }

        let mut guard = self.table.write();

        // Double-check after acquiring write lock
        if let Some(&idx) = guard.map.get(s) {
            return Ok(ShapeName::from_raw(idx));
        }

        let idx = u32::try_from(guard.strings.len()).map_err(|_| InternError::Overflow {
            count: guard.strings.len(),
        })?;
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        guard.strings.push(leaked);
        guard.map.insert(leaked, idx);

        Ok(ShapeName::from_raw(idx))
    }

    /// Intern a name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` distinct names are interned.
    #[inline]
    pub fn intern(&self, s: &str) -> ShapeName {
        self.try_intern(s).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Find a name without interning it.
    pub fn get(&self, s: &str) -> Option<ShapeName> {
        self.table.read().map.get(s).copied().map(ShapeName::from_raw)
    }

    /// Look up the string for a name.
    ///
    /// # Panics
    /// Panics if `name` was produced by a different interner and is out of range.
    pub fn lookup(&self, name: ShapeName) -> &'static str {
        self.table.read().strings[name.index()]
    }

    /// Number of distinct names interned.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Whether no names have been interned yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for NameInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameInterner")
            .field("len", &self.len())
            .finish()
    }
}
