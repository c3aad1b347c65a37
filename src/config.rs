//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for listing and search results
    pub cache_default_ttl: u64,
    /// TTL in seconds for single product lookups
    pub cache_product_ttl: u64,
    /// Maximum number of cache entries, 0 = unbounded
    pub cache_max_entries: usize,
    /// Interval in seconds between expired-entry sweeps
    pub cache_sweep_interval: u64,
    /// Coalesce concurrent misses on the same key into one computation
    pub cache_coalesce_misses: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DEFAULT_TTL` - Listing/search TTL in seconds (default: 300)
    /// - `CACHE_PRODUCT_TTL` - Product TTL in seconds (default: 600)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `CACHE_COALESCE_MISSES` - `true`/`false` (default: false)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_default_ttl: env_or("CACHE_DEFAULT_TTL", defaults.cache_default_ttl),
            cache_product_ttl: env_or("CACHE_PRODUCT_TTL", defaults.cache_product_ttl),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            // A zero interval would spin the sweeper
            cache_sweep_interval: env_or("CACHE_SWEEP_INTERVAL", defaults.cache_sweep_interval)
                .max(1),
            cache_coalesce_misses: env_or(
                "CACHE_COALESCE_MISSES",
                defaults.cache_coalesce_misses,
            ),
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_default_ttl: 300,
            cache_product_ttl: 600,
            cache_max_entries: 10_000,
            cache_sweep_interval: 60,
            cache_coalesce_misses: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_default_ttl, 300);
        assert_eq!(config.cache_product_ttl, 600);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_sweep_interval, 60);
        assert!(!config.cache_coalesce_misses);
    }

    // Env vars are process-wide, so every env-dependent case lives in one test
    #[test]
    fn test_config_from_env() {
        for name in [
            "SERVER_PORT",
            "CACHE_DEFAULT_TTL",
            "CACHE_PRODUCT_TTL",
            "CACHE_MAX_ENTRIES",
            "CACHE_SWEEP_INTERVAL",
            "CACHE_COALESCE_MISSES",
        ] {
            env::remove_var(name);
        }
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("CACHE_PRODUCT_TTL", "120");
        env::set_var("CACHE_COALESCE_MISSES", "true");
        env::set_var("CACHE_SWEEP_INTERVAL", "0");
        env::set_var("SERVER_PORT", "not-a-port");

        let config = Config::from_env();
        assert_eq!(config.cache_product_ttl, 120);
        assert!(config.cache_coalesce_misses);
        assert_eq!(config.cache_sweep_interval, 1);
        assert_eq!(config.server_port, 3000);

        for name in [
            "CACHE_PRODUCT_TTL",
            "CACHE_COALESCE_MISSES",
            "CACHE_SWEEP_INTERVAL",
            "SERVER_PORT",
        ] {
            env::remove_var(name);
        }
    }
}
