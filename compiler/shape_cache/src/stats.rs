//! Cache statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of registry counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered with an already-ready validator.
    pub hits: u64,
    /// Thunks invoked.
    pub constructions: u64,
    /// Forward references handed to re-entrant requests.
    pub lazy_issued: u64,
    /// Thunks that returned an error or panicked.
    pub failures: u64,
    /// Staged shapes discarded because an enclosing construction failed.
    pub rolled_back: u64,
    /// Entries currently ready.
    pub ready: usize,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ready, {} constructions, {} hits, {} lazy, {} failures, {} rolled back",
            self.ready,
            self.constructions,
            self.hits,
            self.lazy_issued,
            self.failures,
            self.rolled_back
        )
    }
}

/// Live counters. Relaxed ordering: these are diagnostics, not synchronization.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    constructions: AtomicU64,
    lazy_issued: AtomicU64,
    failures: AtomicU64,
    rolled_back: AtomicU64,
}

impl Counters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn construction(&self) {
        self.constructions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn lazy(&self) {
        self.lazy_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn rolled_back(&self, n: usize) {
        self.rolled_back.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, ready: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            constructions: self.constructions.load(Ordering::Relaxed),
            lazy_issued: self.lazy_issued.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            rolled_back: self.rolled_back.load(Ordering::Relaxed),
            ready,
        }
    }
}
