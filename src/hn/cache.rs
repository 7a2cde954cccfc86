//! In-process TTL cache shared across concurrent requests.

use dashmap::DashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

struct CachedEntry<V> {
    expires_at: Instant,
    value: V,
}

/// Key-value store with per-entry expiry.
///
/// Writers overwrite unconditionally, so concurrent population of the
/// same key races with last-writer-wins semantics; every writer stores
/// a fresh fetch of the same upstream value, so no locking is needed
/// beyond the per-entry atomicity DashMap provides.
pub struct TtlCache<K, V> {
    entries: DashMap<K, CachedEntry<V>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new() -> Self {
        TtlCache {
            entries: DashMap::new(),
        }
    }

    /// Returns the value for `key` if present and unexpired. Expired
    /// entries are removed on the way out.
    pub fn get(&self, key: &K) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > Instant::now() {
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }

        self.entries
            .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        None
    }

    /// Stores `value` under `key`, resetting its age.
    pub fn insert(&self, key: K, value: V, ttl: Duration) {
        self.entries.insert(
            key,
            CachedEntry {
                expires_at: Instant::now() + ttl,
                value,
            },
        );
    }
}

impl<K: Eq + Hash, V: Clone> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
