//! Process-lifetime geocode cache keyed by normalized address.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::traits::GeocodeMatch;

/// Map from normalized address to the provider's best match.
///
/// Entries are never evicted. Share one instance (behind an `Arc`) across
/// every planner in the process; tests construct a fresh one per case.
/// Concurrent misses on the same key may each query the provider; the last
/// write wins.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: RwLock<HashMap<String, GeocodeMatch>>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<GeocodeMatch> {
        self.entries.read().get(key).copied()
    }

    pub fn put(&self, key: impl Into<String>, value: GeocodeMatch) {
        self.entries.write().insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
