//! Memoizing door store.
//!
//! Resolves a door code through the identifier index, loads the record once
//! and keeps it for the lifetime of the store. Concurrent requests for the
//! same code share a single in-flight load.

mod error;
mod memory;
mod source;

pub use error::*;
pub use memory::*;
pub use source::*;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use crate::door::{normalize_code, Door};
use crate::index::IdentifierIndex;

type Slot = Arc<OnceCell<Arc<Door>>>;

/// Counters describing store activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Doors currently materialized in the cache.
    pub cached: usize,
    /// Calls made to the backing source.
    pub loads: usize,
}

/// Door store backed by an identifier index and a storage source.
pub struct KnowledgeStore {
    identifiers: IdentifierIndex,
    source: Arc<dyn DoorSource>,
    slots: Mutex<HashMap<String, Slot>>,
    loads: AtomicUsize,
}

impl KnowledgeStore {
    /// Create a store over an identifier index and a door source.
    #[must_use]
    pub fn new(identifiers: IdentifierIndex, source: Arc<dyn DoorSource>) -> Self {
        Self {
            identifiers,
            source,
            slots: Mutex::new(HashMap::new()),
            loads: AtomicUsize::new(0),
        }
    }

    /// The identifier index this store resolves through.
    #[must_use]
    pub fn identifiers(&self) -> &IdentifierIndex {
        &self.identifiers
    }

    /// Get a door by code, loading it on first access.
    ///
    /// Returns `None` if the code is not indexed or the record cannot be
    /// loaded. Failed loads are not cached, so a later call retries.
    ///
    /// # Panics
    ///
    /// Panics if the internal slot `Mutex` is poisoned.
    pub async fn get(&self, door_code: &str) -> Option<Arc<Door>> {
        let code = normalize_code(door_code);
        let Some(location) = self.identifiers.location(&code) else {
            tracing::debug!(door_code = %code, "Door not indexed");
            return None;
        };

        let slot = {
            let mut slots = self.slots.lock().expect("Mutex poisoned");
            Arc::clone(slots.entry(code.clone()).or_default())
        };

        if let Some(door) = slot.get() {
            tracing::trace!(door_code = %code, "Door cache hit");
            return Some(Arc::clone(door));
        }

        let loaded = slot
            .get_or_try_init(|| async {
                tracing::debug!(door_code = %code, location = %location.display(), "Loading door");
                self.loads.fetch_add(1, Ordering::Relaxed);
                self.source.load(&code, location).await.map(Arc::new)
            })
            .await;

        match loaded {
            Ok(door) => Some(Arc::clone(door)),
            Err(e) => {
                tracing::warn!(door_code = %code, error = %e, "Failed to load door");
                None
            }
        }
    }

    /// Check whether a door is already materialized.
    ///
    /// # Panics
    ///
    /// Panics if the internal slot `Mutex` is poisoned.
    #[must_use]
    pub fn is_cached(&self, door_code: &str) -> bool {
        self.slots
            .lock()
            .expect("Mutex poisoned")
            .get(&normalize_code(door_code))
            .is_some_and(|slot| slot.initialized())
    }

    /// Snapshot of cache and load counters.
    ///
    /// # Panics
    ///
    /// Panics if the internal slot `Mutex` is poisoned.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let cached = self
            .slots
            .lock()
            .expect("Mutex poisoned")
            .values()
            .filter(|slot| slot.initialized())
            .count();
        StoreStats {
            cached,
            loads: self.loads.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for KnowledgeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeStore")
            .field("indexed", &self.identifiers.len())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
