//! Process-wide cache of [`NttEngine`]s keyed by `(degree, modulus)`
//! (component E), so repeated requests for the same transform parameters
//! reuse one set of precomputed tables instead of re-running root search.
//!
//! Grounded in the original source's experimental SEAL integration
//! (`NTTCache::GetNTT` over a `std::unordered_map` behind a
//! `shared_mutex`/`ReadLock`/`WriteLock` pair): readers take a shared lock
//! for the common case (engine already built), and only a writer upgrades
//! to an exclusive lock to insert a freshly built one.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::Result;
use crate::ntt::NttEngine;

type CacheKey = (usize, u64);

/// Shared cache mapping `(degree, modulus)` to a lazily constructed
/// [`NttEngine`].
pub struct NttCache {
    engines: RwLock<HashMap<CacheKey, Arc<NttEngine>>>,
}

impl NttCache {
    pub fn new() -> Self {
        Self {
            engines: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached engine for `(degree, modulus)`, building and
    /// inserting one if absent. Concurrent callers requesting the same key
    /// may both miss the read lock and race to build; the loser's engine
    /// is discarded in favor of the entry already installed, matching the
    /// original source's "build outside the lock, insert under the write
    /// lock" pattern — correctness over the cache entry being unique, not
    /// over which thread's construction wins.
    pub fn get_or_insert(&self, degree: usize, modulus: u64) -> Result<Arc<NttEngine>> {
        let key = (degree, modulus);
        if let Some(engine) = self.read(&key) {
            return Ok(engine);
        }

        let engine = NttEngine::new(degree, modulus)?;

        let mut engines = self.engines.write().expect("NttCache lock poisoned");
        Ok(engines.entry(key).or_insert(engine).clone())
    }

    fn read(&self, key: &CacheKey) -> Option<Arc<NttEngine>> {
        let engines = self.engines.read().expect("NttCache lock poisoned");
        engines.get(key).cloned()
    }

    /// Number of engines currently cached. Exposed for tests and metrics,
    /// not for control flow.
    pub fn len(&self) -> usize {
        self.engines.read().expect("NttCache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached engine.
    pub fn clear(&self) {
        self.engines.write().expect("NttCache lock poisoned").clear();
    }
}

impl Default for NttCache {
    fn default() -> Self {
        Self::new()
    }
}
