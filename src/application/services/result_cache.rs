//! # Result Cache
//!
//! Bounded TTL cache with insertion-order eviction and per-key
//! single-flight slots.
//!
//! # Entry Lifecycle
//!
//! An entry is fresh while `now - inserted_at <= ttl`. A stale entry is
//! never returned and is removed on the next lookup of its key (or by
//! [`ResultCache::purge_expired`]). Inserting a new key at capacity evicts
//! the oldest entry by insertion order; re-inserting an existing key moves
//! it to the back.
//!
//! # Single Flight
//!
//! [`ResultCache::slot`] hands out one async mutex per key. Callers that
//! compute a value hold the slot across "check, compute, insert", so
//! concurrent requests for the same key compute once while different keys
//! proceed independently.
//!
//! # Examples
//!
//! ```
//! use financing_prequal::application::services::ResultCache;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let cache: ResultCache<&str, u32> = ResultCache::new(2, Duration::from_secs(60));
//! cache.insert("a", Arc::new(1));
//! assert_eq!(cache.get(&"a").as_deref(), Some(&1));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Default time-to-live.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug)]
struct Entry<V> {
    value: Arc<V>,
    inserted_at: Instant,
    seq: u64,
}

#[derive(Debug)]
struct CacheState<K, V> {
    entries: HashMap<K, Entry<V>>,
    /// Insertion sequence to key, oldest first.
    order: BTreeMap<u64, K>,
    next_seq: u64,
}

impl<K: Eq + Hash + Clone, V> CacheState<K, V> {
    fn remove(&mut self, key: &K) -> Option<Entry<V>> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.seq);
        Some(entry)
    }

    fn pop_oldest(&mut self) -> Option<K> {
        let (_, key) = self.order.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }
}

/// Bounded TTL cache of shared values.
#[derive(Debug)]
pub struct ResultCache<K, V> {
    state: Mutex<CacheState<K, V>>,
    inflight: Mutex<HashMap<K, Weak<tokio::sync::Mutex<()>>>>,
    capacity: usize,
    ttl: Duration,
}

impl<K: Eq + Hash + Clone, V> ResultCache<K, V> {
    /// Creates a cache. A capacity of 0 is treated as 1.
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: BTreeMap::new(),
                next_seq: 0,
            }),
            inflight: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Maximum number of entries.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Time-to-live of each entry.
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the fresh value for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.get_at(key, Instant::now())
    }

    /// [`get`](Self::get) evaluated at `now`.
    #[must_use]
    pub fn get_at(&self, key: &K, now: Instant) -> Option<Arc<V>> {
        let mut state = self.lock_state();
        let fresh = state
            .entries
            .get(key)
            .map(|entry| self.is_fresh(entry.inserted_at, now))?;

        if fresh {
            state.entries.get(key).map(|entry| Arc::clone(&entry.value))
        } else {
            state.remove(key);
            debug!("removed stale cache entry");
            None
        }
    }

    /// Inserts a value, evicting the oldest entry if a new key would exceed
    /// capacity. Returns the evicted key.
    pub fn insert(&self, key: K, value: Arc<V>) -> Option<K> {
        self.insert_at(key, value, Instant::now())
    }

    /// [`insert`](Self::insert) stamped at `now`.
    pub fn insert_at(&self, key: K, value: Arc<V>, now: Instant) -> Option<K> {
        let mut state = self.lock_state();

        let replaced = state.remove(&key).is_some();
        let evicted = if !replaced && state.entries.len() >= self.capacity {
            state.pop_oldest()
        } else {
            None
        };
        if evicted.is_some() {
            debug!(capacity = self.capacity, "evicted oldest cache entry");
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.order.insert(seq, key.clone());
        state.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
                seq,
            },
        );

        evicted
    }

    /// Removes `key`. Returns true if it was present.
    pub fn invalidate(&self, key: &K) -> bool {
        self.lock_state().remove(key).is_some()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut state = self.lock_state();
        state.entries.clear();
        state.order.clear();
    }

    /// Removes stale entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    /// [`purge_expired`](Self::purge_expired) evaluated at `now`.
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut state = self.lock_state();
        let stale: Vec<K> = state
            .entries
            .iter()
            .filter(|(_, entry)| !self.is_fresh(entry.inserted_at, now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            state.remove(key);
        }
        stale.len()
    }

    /// Number of entries, fresh or not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_state().entries.len()
    }

    /// Returns true if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_state().entries.is_empty()
    }

    /// Single-flight slot for `key`.
    ///
    /// Every caller asking for the same key while a slot is alive receives
    /// the same mutex. Slots are dropped once nobody holds them.
    #[must_use]
    pub fn slot(&self, key: &K) -> Arc<tokio::sync::Mutex<()>> {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        inflight.retain(|_, slot| slot.strong_count() > 0);

        if let Some(slot) = inflight.get(key).and_then(Weak::upgrade) {
            return slot;
        }

        let slot = Arc::new(tokio::sync::Mutex::new(()));
        inflight.insert(key.clone(), Arc::downgrade(&slot));
        slot
    }

    /// Number of live single-flight slots.
    #[must_use]
    pub fn inflight(&self) -> usize {
        let inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        inflight.values().filter(|slot| slot.strong_count() > 0).count()
    }

    fn is_fresh(&self, inserted_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(inserted_at) <= self.ttl
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, CacheState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Eq + Hash + Clone, V> Default for ResultCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cache() -> ResultCache<u32, String> {
        ResultCache::default()
    }

    fn value(s: &str) -> Arc<String> {
        Arc::new(s.to_string())
    }

    mod basic {
        use super::*;

        #[test]
        fn defaults() {
            let cache = cache();
            assert_eq!(cache.capacity(), 100);
            assert_eq!(cache.ttl(), Duration::from_secs(3600));
            assert!(cache.is_empty());
        }

        #[test]
        fn hit_returns_same_arc() {
            let cache = cache();
            let v = value("a");
            cache.insert(1, Arc::clone(&v));
            let hit = cache.get(&1).unwrap();
            assert!(Arc::ptr_eq(&hit, &v));
            assert!(cache.get(&2).is_none());
        }

        #[test]
        fn invalidate_and_clear() {
            let cache = cache();
            cache.insert(1, value("a"));
            cache.insert(2, value("b"));
            assert!(cache.invalidate(&1));
            assert!(!cache.invalidate(&1));
            assert_eq!(cache.len(), 1);
            cache.clear();
            assert!(cache.is_empty());
        }

        #[test]
        fn zero_capacity_holds_one() {
            let cache: ResultCache<u32, String> = ResultCache::new(0, DEFAULT_CACHE_TTL);
            cache.insert(1, value("a"));
            assert_eq!(cache.insert(2, value("b")), Some(1));
            assert_eq!(cache.len(), 1);
        }
    }

    mod ttl {
        use super::*;

        #[test]
        fn fresh_until_ttl_elapses() {
            let cache = cache();
            let t0 = Instant::now();
            cache.insert_at(1, value("a"), t0);

            assert!(cache.get_at(&1, t0 + Duration::from_secs(3600)).is_some());
            assert!(cache.get_at(&1, t0 + Duration::from_secs(3601)).is_none());
        }

        #[test]
        fn stale_entry_is_removed_on_lookup() {
            let cache = cache();
            let t0 = Instant::now();
            cache.insert_at(1, value("a"), t0);
            assert_eq!(cache.len(), 1);

            assert!(cache.get_at(&1, t0 + Duration::from_secs(7200)).is_none());
            assert_eq!(cache.len(), 0);
            assert!(cache.get_at(&1, t0).is_none());
        }

        #[test]
        fn purge_expired_removes_only_stale() {
            let cache = cache();
            let t0 = Instant::now();
            cache.insert_at(1, value("a"), t0);
            cache.insert_at(2, value("b"), t0 + Duration::from_secs(1800));

            let removed = cache.purge_expired_at(t0 + Duration::from_secs(3700));
            assert_eq!(removed, 1);
            assert!(cache.get_at(&2, t0 + Duration::from_secs(3700)).is_some());
        }

        #[test]
        fn reinsert_refreshes_timestamp() {
            let cache = cache();
            let t0 = Instant::now();
            cache.insert_at(1, value("a"), t0);
            cache.insert_at(1, value("b"), t0 + Duration::from_secs(3000));

            let hit = cache.get_at(&1, t0 + Duration::from_secs(5000)).unwrap();
            assert_eq!(hit.as_str(), "b");
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn oldest_is_evicted_past_capacity() {
            let cache = cache();
            for key in 0..100 {
                assert!(cache.insert(key, value("v")).is_none());
            }
            assert_eq!(cache.insert(100, value("v")), Some(0));

            assert!(cache.get(&0).is_none());
            assert_eq!(cache.len(), 100);
            assert!((1..=100).all(|key| cache.get(&key).is_some()));
        }

        #[test]
        fn reinsert_moves_key_to_back() {
            let cache: ResultCache<u32, String> = ResultCache::new(3, DEFAULT_CACHE_TTL);
            cache.insert(1, value("a"));
            cache.insert(2, value("b"));
            cache.insert(3, value("c"));
            assert!(cache.insert(1, value("a2")).is_none());

            assert_eq!(cache.insert(4, value("d")), Some(2));
            assert!(cache.get(&1).is_some());
            assert!(cache.get(&2).is_none());
        }

        #[test]
        fn invalidated_key_frees_capacity() {
            let cache: ResultCache<u32, String> = ResultCache::new(2, DEFAULT_CACHE_TTL);
            cache.insert(1, value("a"));
            cache.insert(2, value("b"));
            cache.invalidate(&1);
            assert!(cache.insert(3, value("c")).is_none());
            assert_eq!(cache.len(), 2);
        }
    }

    mod single_flight {
        use super::*;

        #[test]
        fn same_key_shares_slot() {
            let cache = cache();
            let a = cache.slot(&1);
            let b = cache.slot(&1);
            let other = cache.slot(&2);
            assert!(Arc::ptr_eq(&a, &b));
            assert!(!Arc::ptr_eq(&a, &other));
            assert_eq!(cache.inflight(), 2);
        }

        #[test]
        fn released_slots_are_pruned() {
            let cache = cache();
            let a = cache.slot(&1);
            drop(a);
            assert_eq!(cache.inflight(), 0);

            let _b = cache.slot(&2);
            assert_eq!(cache.inflight.lock().unwrap().len(), 1);
        }

        #[tokio::test]
        async fn slot_serializes_holders() {
            let cache = Arc::new(cache());
            let slot = cache.slot(&1);
            let guard = slot.lock().await;

            let contender = cache.slot(&1);
            assert!(contender.try_lock().is_err());
            drop(guard);
            assert!(contender.try_lock().is_ok());
        }
    }
}
