//! Cache Sweeper Task
//!
//! Background task that periodically removes expired cache entries.
//!
//! Reads never return expired values whether or not the sweeper has run;
//! sweeping only keeps cold keys from piling up.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheService;

/// Spawns a task that sweeps expired entries out of `cache` every
/// `interval_secs` seconds.
///
/// Returns the task's handle so shutdown can abort it.
///
/// # Example
/// ```ignore
/// let cache = CacheService::new(CacheStore::new(10_000));
/// let sweeper = spawn_sweeper_task(cache.clone(), 60);
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_sweeper_task(cache: CacheService, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache sweeper with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.sweep_expired();
            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    })
}
