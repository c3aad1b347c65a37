//! Cache Entry Module
//!
//! A single cached payload together with its lifetime metadata.

use serde_json::Value;

// == Cache Entry ==
/// Represents one stored value and the timestamps that govern it.
///
/// Timestamps are Unix milliseconds read from the owning store's clock, so
/// every time-dependent method takes `now` rather than reading the wall clock.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The cached payload
    pub value: Value,
    /// Creation timestamp
    pub created_at: u64,
    /// Expiration timestamp
    pub expires_at: u64,
    /// Last time the entry was read or written
    pub last_accessed: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that lives for `ttl_secs` seconds from `now`.
    pub fn new(value: Value, ttl_secs: u64, now: u64) -> Self {
        Self {
            value,
            created_at: now,
            expires_at: now.saturating_add(ttl_secs.saturating_mul(1000)),
            last_accessed: now,
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches `expires_at`.
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }

    /// Records a read at `now`.
    pub fn touch(&mut self, now: u64) {
        self.last_accessed = now;
    }
}
