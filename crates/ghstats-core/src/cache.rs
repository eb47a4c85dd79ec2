//! In-memory TTL cache with lazy expiry.
//!
//! Readers share an `RwLock` read guard; `set` takes the write guard for a
//! single map insert. Expired entries stay in the map until overwritten and
//! are reported as misses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Hit/miss counters and map size snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Subject-keyed cache; values are cloned out, never borrowed.
pub struct TtlCache<V> {
    store: RwLock<HashMap<String, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the value for `key` if a live entry exists.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        // Poisoning can only interrupt a single insert; the map is still consistent.
        let store = self.store.read().unwrap_or_else(|e| e.into_inner());
        let found = store
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.clone());
        drop(store);

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Insert or overwrite `key`; the entry expires `ttl` from now.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        store.insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.store.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
