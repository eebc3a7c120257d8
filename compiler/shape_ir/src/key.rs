//! Cache keys.
//!
//! A `CacheKey` is a shape name plus the ordered identities of the validators
//! substituted into its parameters. Two requests share a key iff both parts
//! are equal, slot for slot.

use std::fmt;

use smallvec::SmallVec;

use crate::{NameInterner, ParamId, ShapeName};

/// Parameter list of a key. Almost every shape has zero or one parameter.
pub type Params = SmallVec<[ParamId; 2]>;

/// Identity of one cache entry.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CacheKey {
    name: ShapeName,
    params: Params,
}

impl CacheKey {
    /// Key for `name` with the given parameter slots, in order.
    pub fn new(name: ShapeName, params: impl IntoIterator<Item = ParamId>) -> Self {
        Self {
            name,
            params: params.into_iter().collect(),
        }
    }

    /// Key for a shape with no parameter list at all.
    pub fn bare(name: ShapeName) -> Self {
        Self {
            name,
            params: Params::new(),
        }
    }

    /// The shape family.
    #[inline]
    pub fn name(&self) -> ShapeName {
        self.name
    }

    /// The parameter slots, in order.
    #[inline]
    pub fn params(&self) -> &[ParamId] {
        &self.params
    }

    /// Number of parameter slots.
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Render this key with its shape name resolved.
    pub fn display<'a>(&'a self, interner: &'a NameInterner) -> KeyDisplay<'a> {
        KeyDisplay {
            key: self,
            interner,
        }
    }
}

/// `Bundle<#42>`-style rendering of a key.
pub struct KeyDisplay<'a> {
    key: &'a CacheKey,
    interner: &'a NameInterner,
}

impl fmt::Display for KeyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.interner.lookup(self.key.name))?;
        if self.key.params.is_empty() {
            return Ok(());
        }
        f.write_str("<")?;
        for (i, param) in self.key.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
mod tests;
