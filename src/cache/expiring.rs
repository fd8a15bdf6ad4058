use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::clock::Clock;
use super::types::{CacheEntry, CacheStats};

/// Single-value cache with a fixed time-to-live.
///
/// The slot is replaced whole under a write lock, so readers see either the
/// previous entry or the new one. Concurrent misses are not coordinated: each
/// caller computes its own value and the last `put` wins.
pub struct ExpiringSlot<T> {
    slot: RwLock<Option<CacheEntry<T>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<T: Clone> ExpiringSlot<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
            clock,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Return the cached value if it has not expired
    pub fn get(&self) -> Option<T> {
        let now = self.clock.now();
        let fresh = self
            .slot
            .read()
            .as_ref()
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone());

        match fresh {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a value, starting a new TTL window from now
    pub fn put(&self, value: T) {
        let entry = CacheEntry {
            value,
            expires_at: self.clock.now() + self.ttl,
        };
        *self.slot.write() = Some(entry);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
