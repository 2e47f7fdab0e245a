use super::config::InteractionsParams;
use super::error::EngineError;
use super::interactions::Interactions;
use crate::core::models::structure::Structure;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};

/// Identifies a computation by the content of its structure and parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub structure: u64,
    pub params: u64,
}

impl CacheKey {
    pub fn new(structure: &Structure, params: &InteractionsParams) -> Self {
        Self {
            structure: structure.fingerprint(),
            params: params.fingerprint(),
        }
    }

    /// Both fingerprints folded into one value.
    pub fn combined(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

type Slot = Arc<Mutex<Option<Arc<Interactions>>>>;

/// Memoizes interaction results per [`CacheKey`].
///
/// Each key owns its own slot lock, so concurrent requests for the same key
/// compute once while different keys proceed independently. Failed or
/// cancelled computations are not stored.
#[derive(Debug, Default)]
pub struct InteractionsCache {
    entries: Mutex<HashMap<CacheKey, Slot>>,
}

impl InteractionsCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: CacheKey) -> Slot {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.entry(key).or_default().clone()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<Interactions>> {
        let slot = {
            let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.get(key)?.clone()
        };
        let value = slot.lock().unwrap_or_else(PoisonError::into_inner);
        value.clone()
    }

    /// Returns the cached result for `key`, running `compute` on a miss.
    pub fn get_or_compute<F>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> Result<Option<Arc<Interactions>>, EngineError>
    where
        F: FnOnce() -> Result<Option<Interactions>, EngineError>,
    {
        let slot = self.slot(key);
        let mut value = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = value.as_ref() {
            return Ok(Some(Arc::clone(existing)));
        }
        let computed = match compute() {
            Ok(Some(computed)) => Arc::new(computed),
            outcome => {
                self.discard_slot(&key, &slot);
                return outcome.map(|_| None);
            }
        };
        *value = Some(Arc::clone(&computed));
        Ok(Some(computed))
    }

    /// Removes `slot` from the map unless another slot has replaced it.
    /// Called with the slot locked; no path holds the map lock while
    /// waiting on a slot.
    fn discard_slot(&self, key: &CacheKey, slot: &Slot) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            entries.remove(key);
        }
    }

    /// Drops the entry for `key`. Returns whether a result was cached.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        removed.is_some_and(|slot| {
            slot.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_some()
        })
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        slots
            .iter()
            .filter(|slot| {
                slot.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .is_some()
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
