//! Cache Store Module
//!
//! Key to entry table with TTL expiry, capacity eviction and key enumeration.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};

// == Cache Store ==
/// In-memory storage for cached payloads.
///
/// Not synchronized on its own; `CacheService` owns it behind a lock.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries, 0 = unbounded
    max_entries: usize,
    /// Time source for expiry
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store using the system clock.
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entries,
            clock,
        }
    }

    // == Get ==
    /// Returns the live value stored under `key`, counting a hit or a miss.
    ///
    /// An expired entry is removed on the spot and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let value = self.peek(key);
        self.record_lookup(value.is_some());
        value
    }

    /// Like `get` but leaves the hit and miss counters alone.
    ///
    /// Expired entries are still removed and counted as expired.
    pub fn peek(&mut self, key: &str) -> Option<Value> {
        let now = self.clock.now_ms();

        match self.entries.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.touch(now);
                Some(entry.value.clone())
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_expired(1);
                self.stats.set_total_entries(self.entries.len());
                None
            }
            None => None,
        }
    }

    /// Counts the outcome of one lookup made through `peek`.
    pub fn record_lookup(&mut self, hit: bool) {
        if hit {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
    }

    /// Returns true if `key` holds a live entry. Does not touch stats.
    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    // == Set ==
    /// Inserts or overwrites `key`, expiring `ttl_secs` seconds from now.
    ///
    /// A zero TTL stores nothing and returns false. When a new key would push
    /// the store past capacity, expired entries are swept first and then the
    /// least recently accessed entry is evicted.
    pub fn set(&mut self, key: String, value: Value, ttl_secs: u64) -> bool {
        if ttl_secs == 0 {
            return false;
        }

        let now = self.clock.now_ms();

        if !self.entries.contains_key(&key) && self.is_full() {
            self.sweep_expired();
            if self.is_full() {
                self.evict_least_recent();
            }
        }

        self.entries
            .insert(key, CacheEntry::new(value, ttl_secs, now));
        self.stats.set_total_entries(self.entries.len());
        true
    }

    // == Delete ==
    /// Removes `key`. Missing keys are a no-op; returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.record_invalidations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    /// Drops `key` without counting an invalidation. Used for entries that
    /// can no longer be read back.
    pub fn discard(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Keys ==
    /// Snapshot of every stored key, expired ones included.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Delete Matching ==
    /// Removes every stored key that contains `pattern` as a literal substring.
    ///
    /// Expired-but-unswept entries are matched too. Returns the number removed.
    pub fn delete_matching(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.contains(pattern));
        let removed = before - self.entries.len();

        self.stats.record_invalidations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Sweep Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - self.entries.len();

        self.stats.record_expired(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Drops every entry. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.record_invalidations(removed);
        self.stats.set_total_entries(0);
        removed
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_full(&self) -> bool {
        self.max_entries > 0 && self.entries.len() >= self.max_entries
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.stats.record_eviction();
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use serde_json::json;

    fn store_with_clock(max_entries: usize) -> (CacheStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        (CacheStore::with_clock(max_entries, clock.clone()), clock)
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock(100);

        assert!(store.set("product:1".to_string(), json!({"id": 1}), 600));
        assert_eq!(store.get("product:1"), Some(json!({"id": 1})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with_clock(100);
        assert_eq!(store.get("missing"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_peek_leaves_hit_and_miss_counters_alone() {
        let (mut store, clock) = store_with_clock(100);
        store.set("k".to_string(), json!(1), 5);

        assert_eq!(store.peek("k"), Some(json!(1)));
        assert_eq!(store.peek("missing"), None);
        clock.advance_secs(5);
        assert_eq!(store.peek("k"), None);

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.expired, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_discard_is_not_an_invalidation() {
        let (mut store, _) = store_with_clock(100);
        store.set("k".to_string(), json!(1), 60);

        assert!(store.discard("k"));
        assert!(!store.discard("k"));
        assert_eq!(store.stats().invalidations, 0);
        assert_eq!(store.stats().total_entries, 0);
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let (mut store, clock) = store_with_clock(100);

        store.set("k".to_string(), json!(1), 10);
        clock.advance_secs(8);
        store.set("k".to_string(), json!(2), 10);
        clock.advance_secs(8);

        assert_eq!(store.get("k"), Some(json!(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_expired_reads_as_absent_and_is_evicted() {
        let (mut store, clock) = store_with_clock(100);

        store.set("k".to_string(), json!("v"), 5);
        clock.advance_secs(5);

        assert!(!store.contains("k"));
        assert_eq!(store.get("k"), None);
        assert!(store.is_empty());

        let stats = store.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expired, 1);
    }

    #[test]
    fn test_zero_ttl_is_not_stored() {
        let (mut store, _) = store_with_clock(100);
        assert!(!store.set("k".to_string(), json!("v"), 0));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (mut store, _) = store_with_clock(100);

        store.set("k".to_string(), json!("v"), 60);
        assert!(store.delete("k"));
        assert!(!store.delete("k"));
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_keys_include_expired_entries() {
        let (mut store, clock) = store_with_clock(100);

        store.set("a".to_string(), json!(1), 1);
        store.set("b".to_string(), json!(2), 60);
        clock.advance_secs(2);

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_delete_matching_is_literal_substring() {
        let (mut store, _) = store_with_clock(100);

        store.set("product:42".to_string(), json!(1), 60);
        store.set("product:42:reviews".to_string(), json!(2), 60);
        store.set("product:7".to_string(), json!(3), 60);
        store.set("products:page:1".to_string(), json!(4), 60);
        store.set("product.*".to_string(), json!(5), 60);

        assert_eq!(store.delete_matching("product:42"), 2);
        assert!(store.contains("product:7"));
        assert!(store.contains("products:page:1"));

        // Regex metacharacters are matched literally
        assert_eq!(store.delete_matching(".*"), 1);
        assert_eq!(store.stats().invalidations, 3);
    }

    #[test]
    fn test_delete_matching_removes_expired_matches() {
        let (mut store, clock) = store_with_clock(100);

        store.set("products:a".to_string(), json!(1), 1);
        clock.advance_secs(5);

        assert_eq!(store.delete_matching("products:"), 1);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_sweep_expired() {
        let (mut store, clock) = store_with_clock(100);

        store.set("short".to_string(), json!(1), 1);
        store.set("long".to_string(), json!(2), 10);
        clock.advance_secs(2);

        assert_eq!(store.sweep_expired(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("long"), Some(json!(2)));
        assert_eq!(store.stats().expired, 1);
    }

    #[test]
    fn test_capacity_prefers_sweeping_expired() {
        let (mut store, clock) = store_with_clock(2);

        store.set("stale".to_string(), json!(1), 1);
        store.set("fresh".to_string(), json!(2), 60);
        clock.advance_secs(2);
        store.set("new".to_string(), json!(3), 60);

        assert_eq!(store.len(), 2);
        assert!(store.contains("fresh"));
        assert!(store.contains("new"));
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_capacity_evicts_least_recently_accessed() {
        let (mut store, clock) = store_with_clock(3);

        store.set("key1".to_string(), json!(1), 300);
        clock.advance_ms(1);
        store.set("key2".to_string(), json!(2), 300);
        clock.advance_ms(1);
        store.set("key3".to_string(), json!(3), 300);
        clock.advance_ms(1);

        // key1 becomes most recent, key2 is now the oldest
        store.get("key1");
        clock.advance_ms(1);
        store.set("key4".to_string(), json!(4), 300);

        assert_eq!(store.len(), 3);
        assert!(store.contains("key1"));
        assert!(!store.contains("key2"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_overwrite_at_capacity_does_not_evict() {
        let (mut store, _) = store_with_clock(1);

        store.set("k".to_string(), json!(1), 60);
        store.set("k".to_string(), json!(2), 60);

        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_clear() {
        let (mut store, _) = store_with_clock(0);

        store.set("a".to_string(), json!(1), 60);
        store.set("b".to_string(), json!(2), 60);

        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert_eq!(store.stats().total_entries, 0);
    }
}
