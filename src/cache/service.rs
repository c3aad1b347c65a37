//! Cache Service Module
//!
//! Cache-aside orchestration (`get_or_set`) and invalidation on top of a
//! shared `CacheStore`.
//!
//! The store lives in process memory. Every instance of the server owns an
//! independent store, so invalidating here does not reach other instances.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore};
use crate::config::Config;
use crate::error::{CacheError, CacheResult};

type InFlightMap = HashMap<String, Arc<AsyncMutex<()>>>;

// == Cache Service ==
/// Shared handle to the process-wide cache.
///
/// Clones are cheap and all point at the same store. Construct one at
/// startup and pass it to whatever needs caching.
#[derive(Debug, Clone)]
pub struct CacheService {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    store: Mutex<CacheStore>,
    /// Per-key locks for coalescing concurrent misses
    in_flight: Mutex<InFlightMap>,
    coalesce_misses: bool,
}

impl CacheService {
    // == Constructors ==
    /// Wraps `store`. Concurrent misses on one key each run their own compute.
    pub fn new(store: CacheStore) -> Self {
        Self::build(store, false)
    }

    /// Wraps `store` with single-flight misses: concurrent callers missing on
    /// the same key wait for the first one and reuse its result.
    pub fn coalescing(store: CacheStore) -> Self {
        Self::build(store, true)
    }

    /// Builds the service from runtime configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::build(
            CacheStore::new(config.cache_max_entries),
            config.cache_coalesce_misses,
        )
    }

    fn build(store: CacheStore, coalesce_misses: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                in_flight: Mutex::new(HashMap::new()),
                coalesce_misses,
            }),
        }
    }

    // == Get Or Set ==
    /// Returns the cached value for `key`, or runs `compute`, caches its
    /// result for `ttl_secs` seconds and returns it.
    ///
    /// Errors from `compute` are returned untouched and nothing is cached.
    /// A zero TTL computes without caching. Cache trouble (poisoned store,
    /// unserializable value) never fails the call; it only costs a miss.
    pub async fn get_or_set<T, E, F, Fut>(
        &self,
        key: &str,
        compute: F,
        ttl_secs: u64,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        // Each call counts once: a hit if it returns a cached value, a miss
        // if it runs `compute`
        if let Some(value) = self.lookup(key) {
            self.record_lookup(true);
            debug!("Cache HIT: {}", key);
            return Ok(value);
        }

        if !self.inner.coalesce_misses {
            self.record_lookup(false);
            return self.populate(key, compute, ttl_secs).await;
        }

        let _slot = self.claim(key).await;

        // Whoever held the slot before us may have filled the key
        if let Some(value) = self.lookup(key) {
            self.record_lookup(true);
            debug!("Cache HIT after waiting on in-flight compute: {}", key);
            return Ok(value);
        }

        self.record_lookup(false);
        self.populate(key, compute, ttl_secs).await
    }

    async fn populate<T, E, F, Fut>(&self, key: &str, compute: F, ttl_secs: u64) -> Result<T, E>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        info!("Cache MISS: {}", key);
        let value = compute().await?;

        if let Err(err) = self.set(key, &value, ttl_secs) {
            warn!(key, error = %err, "Computed value was not cached");
        }

        Ok(value)
    }

    // == Get ==
    /// Typed lookup. A value that no longer decodes as `T` is dropped and
    /// reported as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.lookup(key);
        self.record_lookup(value.is_some());
        value
    }

    /// Reads and decodes `key` without touching the hit and miss counters.
    fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.with_store("get", |store| store.peek(key)).ok()??;

        match serde_json::from_value(raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "Discarding cached value with unexpected shape");
                let _ = self.with_store("discard", |store| store.discard(key));
                None
            }
        }
    }

    fn record_lookup(&self, hit: bool) {
        let _ = self.with_store("record_lookup", |store| store.record_lookup(hit));
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_secs` seconds.
    ///
    /// Returns `Ok(false)` when the TTL is zero and nothing was stored.
    pub fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> CacheResult<bool> {
        if ttl_secs == 0 {
            debug!("Skipping cache write for {} (ttl=0)", key);
            return Ok(false);
        }

        let raw = serde_json::to_value(value)?;
        self.with_store("set", |store| store.set(key.to_string(), raw, ttl_secs))
    }

    // == Invalidate ==
    /// Removes exactly `key`. Returns false if it was not cached.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self
            .with_store("invalidate", |store| store.delete(key))
            .unwrap_or(false);
        info!("Cache invalidated: {} (removed={})", key, removed);
        removed
    }

    // == Invalidate Pattern ==
    /// Removes every key containing `pattern` as a literal substring and
    /// returns how many were removed.
    ///
    /// This scans every stored key, expired ones included. An empty pattern
    /// matches everything.
    pub fn invalidate_pattern(&self, pattern: &str) -> usize {
        let removed = self
            .with_store("invalidate_pattern", |store| store.delete_matching(pattern))
            .unwrap_or(0);
        info!("Cache invalidated pattern: {} ({} keys)", pattern, removed);
        removed
    }

    /// Drops every cached entry.
    pub fn flush(&self) -> usize {
        let removed = self.with_store("flush", CacheStore::clear).unwrap_or(0);
        info!("Cache flushed ({} keys)", removed);
        removed
    }

    /// Removes expired entries. Called by the background sweeper.
    pub fn sweep_expired(&self) -> usize {
        self.with_store("sweep_expired", CacheStore::sweep_expired)
            .unwrap_or(0)
    }

    /// Snapshot of stored keys, expired ones included.
    pub fn keys(&self) -> Vec<String> {
        self.with_store("keys", |store| store.keys())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> CacheStats {
        self.with_store("stats", |store| store.stats())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.with_store("len", |store| store.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Store Access ==
    /// Runs `f` against the store. A poisoned store is treated as
    /// unavailable so callers fall back to computing.
    fn with_store<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut CacheStore) -> R,
    ) -> CacheResult<R> {
        match self.inner.store.lock() {
            Ok(mut guard) => Ok(f(&mut *guard)),
            Err(_) => {
                warn!(op, "Cache store lock poisoned, bypassing cache");
                Err(CacheError::Unavailable(op))
            }
        }
    }

    // == Single Flight ==
    async fn claim(&self, key: &str) -> InFlightSlot<'_> {
        let slot = {
            let mut in_flight = self.in_flight();
            in_flight.entry(key.to_string()).or_default().clone()
        };

        InFlightSlot {
            service: self,
            key: key.to_string(),
            permit: Some(slot.lock_owned().await),
        }
    }

    fn in_flight(&self) -> MutexGuard<'_, InFlightMap> {
        // Only coordination state lives here, so recovering is safe
        self.inner
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Held by the caller computing a key while single-flight is on.
///
/// Dropping it (after success, failure or cancellation) lets the next waiter
/// in and forgets the key once nobody else is waiting on it.
struct InFlightSlot<'a> {
    service: &'a CacheService,
    key: String,
    permit: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.permit.take();

        let mut in_flight = self.service.in_flight();
        if in_flight
            .get(&self.key)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            in_flight.remove(&self.key);
        }
    }
}
