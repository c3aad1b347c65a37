//! Cache Module
//!
//! In-process cache-aside layer with TTL expiry and substring invalidation.

mod clock;
mod entry;
mod service;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use service::CacheService;
pub use stats::CacheStats;
pub use store::CacheStore;
