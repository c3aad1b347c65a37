//! Storefront Cache - product catalog service with a cache-aside layer
//!
//! Catalog reads are memoized in process memory with TTL expiry; writes
//! invalidate affected entries by key substring.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheService;
pub use config::Config;
pub use tasks::spawn_sweeper_task;
