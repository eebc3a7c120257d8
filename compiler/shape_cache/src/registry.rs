//! The validator registry.
//!
//! Maps each [`CacheKey`] to the validator constructed for it. An entry is
//! absent (never requested), pending (its thunk is running), or ready.
//!
//! # Construction protocol
//!
//! `get_or_build(key, thunk)`:
//! - ready: return the validator, do not call `thunk`;
//! - pending: return a lazy forward reference to it, do not call `thunk`;
//! - absent: mark pending, call `thunk`, store and return its validator.
//!
//! The pending case is what makes recursive builders terminate: a shape whose
//! builder (directly or through other builders) asks for itself gets a
//! placeholder instead of a second construction.
//!
//! # Locking
//!
//! Ready lookups take only the table's read lock. Constructions are serialized
//! by a re-entrant lock held for the whole outermost thunk, so a cluster of
//! mutually recursive shapes is built as one unit: the building thread can
//! re-enter freely, other threads wait for the cluster to commit. The table
//! lock itself is never held while a thunk runs.
//!
//! Shapes completed inside an enclosing construction are staged on the
//! building thread and published together when the outermost construction
//! commits. Until then the table shows them pending, so no other thread can
//! pick up a validator whose forward references might never be filled.
//!
//! # Failure
//!
//! Every construction remembers how many shapes were staged when it started.
//! If its thunk fails (error or panic), its key and everything staged since
//! then is discarded: those validators may hold forward references to the
//! failed one. A published entry never changes again.

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use parking_lot::{ReentrantMutex, RwLock};
use rustc_hash::FxHashMap;
use shape_ir::{CacheKey, NameInterner, ParamId};
use shape_schema::stack::ensure_sufficient_stack;
use shape_schema::Schema;
use tracing::{debug, trace, warn};

use crate::lazy::LazyCell;
use crate::stats::Counters;
use crate::{BuildError, BuildResult, CacheStats, RegistryConfig};

/// Lifecycle of a present entry. Absent keys are simply not in the table.
enum Entry {
    Pending,
    Ready(Schema),
}

/// State of one key, without the validator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntryState {
    Empty,
    Pending,
    Ready,
}

/// Result of a non-building lookup.
#[derive(Clone, Debug)]
pub enum Lookup {
    Empty,
    Pending,
    Ready(Schema),
}

impl Lookup {
    pub fn state(&self) -> EntryState {
        match self {
            Lookup::Empty => EntryState::Empty,
            Lookup::Pending => EntryState::Pending,
            Lookup::Ready(_) => EntryState::Ready,
        }
    }

    pub fn ready(self) -> Option<Schema> {
        match self {
            Lookup::Ready(schema) => Some(schema),
            Lookup::Empty | Lookup::Pending => None,
        }
    }
}

/// Bookkeeping owned by the thread currently constructing.
#[derive(Default)]
struct BuildState {
    /// Shapes completed during the current outermost construction, in order.
    staged: Vec<(CacheKey, Schema)>,
    /// Number of thunks currently on the building thread's stack.
    depth: usize,
}

impl BuildState {
    fn staged(&self, key: &CacheKey) -> Option<Schema> {
        self.staged
            .iter()
            .find(|(staged, _)| staged == key)
            .map(|(_, schema)| schema.clone())
    }
}

pub(crate) struct Shared {
    config: RegistryConfig,
    names: NameInterner,
    entries: RwLock<FxHashMap<CacheKey, Entry>>,
    build: ReentrantMutex<RefCell<BuildState>>,
    sealed: AtomicBool,
    counters: Counters,
}

impl Shared {
    pub(crate) fn lookup(&self, key: &CacheKey) -> Lookup {
        match self.entries.read().get(key) {
            None => Lookup::Empty,
            Some(Entry::Pending) => Lookup::Pending,
            Some(Entry::Ready(schema)) => Lookup::Ready(schema.clone()),
        }
    }

    pub(crate) fn describe(&self, key: &CacheKey) -> String {
        key.display(&self.names).to_string()
    }
}

/// Process-wide table of constructed validators.
///
/// Cloning shares the table. Every builder must obtain its validator through
/// [`Registry::get_or_build`]; a builder that memoizes its own result elsewhere
/// creates a second, divergent cache.
#[derive(Clone)]
pub struct Registry {
    shared: Arc<Shared>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.shared.config)
            .field("stats", &self.stats())
            .field("sealed", &self.is_sealed())
            .finish_non_exhaustive()
    }
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                names: NameInterner::new(),
                entries: RwLock::new(FxHashMap::with_capacity_and_hasher(
                    config.capacity,
                    rustc_hash::FxBuildHasher,
                )),
                build: ReentrantMutex::new(RefCell::new(BuildState::default())),
                sealed: AtomicBool::new(false),
                counters: Counters::default(),
            }),
        }
    }

    /// The process-wide registry, created on first use.
    ///
    /// Initialization order: build every shape once (see [`Registry::warm`])
    /// on one thread before concurrent validation traffic starts.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.shared.config
    }

    pub fn names(&self) -> &NameInterner {
        &self.shared.names
    }

    /// Key for `name` with the given parameter slots.
    pub fn key(&self, name: &str, params: &[ParamId]) -> BuildResult<CacheKey> {
        let name = self.shared.names.try_intern(name)?;
        Ok(CacheKey::new(name, params.iter().copied()))
    }

    /// Render a key with its name resolved.
    pub fn describe(&self, key: &CacheKey) -> String {
        self.shared.describe(key)
    }

    /// The builder protocol entry point.
    #[tracing::instrument(level = "trace", skip_all, fields(shape = name, arity = params.len()))]
    pub fn get_or_build<F>(&self, name: &str, params: &[ParamId], thunk: F) -> BuildResult<Schema>
    where
        F: FnOnce() -> BuildResult<Schema>,
    {
        let key = self.key(name, params)?;
        self.get_or_build_key(key, thunk)
    }

    /// [`Registry::get_or_build`] with a prebuilt key.
    pub fn get_or_build_key<F>(&self, key: CacheKey, thunk: F) -> BuildResult<Schema>
    where
        F: FnOnce() -> BuildResult<Schema>,
    {
        let shared = &*self.shared;

        if let Some(Entry::Ready(schema)) = shared.entries.read().get(&key) {
            shared.counters.hit();
            trace!(shape = %shared.describe(&key), "cache hit");
            return Ok(schema.clone());
        }

        let build = shared.build.lock();

        // Completed earlier in this cluster, not yet published.
        if let Some(schema) = build.borrow().staged(&key) {
            shared.counters.hit();
            return Ok(schema);
        }

        {
            let mut entries = shared.entries.write();
            match entries.get(&key) {
                Some(Entry::Ready(schema)) => {
                    // Another thread finished it while we waited for the lock.
                    shared.counters.hit();
                    return Ok(schema.clone());
                }
                Some(Entry::Pending) => {
                    drop(entries);
                    shared.counters.lazy();
                    trace!(shape = %shared.describe(&key), "re-entrant request, issuing lazy cell");
                    return Ok(Schema::deferred(Arc::new(LazyCell::new(
                        key,
                        shared,
                        Arc::downgrade(&self.shared),
                    ))));
                }
                None if self.is_sealed() => {
                    return Err(BuildError::Sealed {
                        shape: shared.describe(&key),
                    });
                }
                None => {
                    entries.insert(key.clone(), Entry::Pending);
                }
            }
        }

        let mark = {
            let mut state = build.borrow_mut();
            state.depth += 1;
            state.staged.len()
        };
        shared.counters.construction();
        debug!(shape = %shared.describe(&key), depth = build.borrow().depth, "constructing");

        let mut pending = PendingGuard {
            shared,
            state: &*build,
            key: &key,
            mark,
            armed: true,
        };

        match ensure_sufficient_stack(thunk) {
            Ok(schema) => {
                pending.commit(&schema);
                Ok(schema)
            }
            Err(err) => {
                drop(pending);
                let shape = shared.describe(&key);
                warn!(%shape, error = %err, "construction failed, entry reverted");
                Err(err.within(shape))
            }
        }
    }

    /// Current state of `key`. Never builds.
    pub fn lookup(&self, key: &CacheKey) -> Lookup {
        self.shared.lookup(key)
    }

    /// State of `name` with `params`, without interning an unknown name.
    pub fn state(&self, name: &str, params: &[ParamId]) -> EntryState {
        match self.shared.names.get(name) {
            Some(name) => self
                .lookup(&CacheKey::new(name, params.iter().copied()))
                .state(),
            None => EntryState::Empty,
        }
    }

    /// Run `warm_up` (typically: call every builder once), then seal if
    /// configured to.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn warm<F>(&self, warm_up: F) -> BuildResult<CacheStats>
    where
        F: FnOnce(&Registry) -> BuildResult<()>,
    {
        warm_up(self)?;
        if self.shared.config.seal_on_warm {
            self.seal();
        }
        let stats = self.stats();
        debug!(%stats, sealed = self.is_sealed(), "registry warmed");
        Ok(stats)
    }

    /// Refuse all further constructions. Ready entries keep being served.
    pub fn seal(&self) {
        self.shared.sealed.store(true, Ordering::Release);
    }

    pub fn is_sealed(&self) -> bool {
        self.shared.sealed.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> CacheStats {
        self.shared.counters.snapshot(self.len())
    }

    /// Number of ready entries.
    pub fn len(&self) -> usize {
        self.shared
            .entries
            .read()
            .values()
            .filter(|e| matches!(e, Entry::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted, deduplicated names of shapes with at least one ready entry.
    pub fn shape_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .shared
            .entries
            .read()
            .iter()
            .filter(|(_, e)| matches!(e, Entry::Ready(_)))
            .map(|(k, _)| self.shared.names.lookup(k.name()))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Reverts a pending entry unless its construction commits.
///
/// Runs on error returns and during unwinding alike, so a key is never left
/// stuck pending.
struct PendingGuard<'a> {
    shared: &'a Shared,
    state: &'a RefCell<BuildState>,
    key: &'a CacheKey,
    mark: usize,
    armed: bool,
}

impl PendingGuard<'_> {
    fn commit(&mut self, schema: &Schema) {
        self.armed = false;
        let mut state = self.state.borrow_mut();
        state.depth -= 1;
        state.staged.push((self.key.clone(), schema.clone()));
        if state.depth > 0 {
            trace!(shape = %self.shared.describe(self.key), "constructed, staged");
            return;
        }

        let cluster = std::mem::take(&mut state.staged);
        drop(state);
        let size = cluster.len();
        let mut entries = self.shared.entries.write();
        for (key, schema) in cluster {
            entries.insert(key, Entry::Ready(schema));
        }
        drop(entries);
        debug!(shape = %self.shared.describe(self.key), cluster = size, "constructed");
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.borrow_mut();
        state.depth -= 1;
        let discarded: Vec<CacheKey> = state
            .staged
            .drain(self.mark..)
            .map(|(key, _)| key)
            .collect();
        drop(state);

        let mut entries = self.shared.entries.write();
        entries.remove(self.key);
        for key in &discarded {
            entries.remove(key);
        }
        drop(entries);

        self.shared.counters.failure();
        if !discarded.is_empty() {
            self.shared.counters.rolled_back(discarded.len());
            debug!(
                shape = %self.shared.describe(self.key),
                discarded = discarded.len(),
                "discarded shapes staged inside failed construction"
            );
        }
    }
}
