//! Query cache configuration.
//!
//! Controls TTLs, recommendation sizing and the in-process store capacity via
//! the `[cache]` table of `creatorhub.toml`.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

// Default values for cache configuration
const DEFAULT_NAMESPACE: &str = "creatorhub";
const DEFAULT_LIST_TTL_SECONDS: u64 = 5 * 60;
const DEFAULT_RECOMMENDATION_TTL_SECONDS: u64 = 60 * 60;
const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;
const DEFAULT_MEMORY_CAPACITY: usize = 10_000;
const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 250;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Serve listings and recommendations through the cache.
    pub enabled: bool,
    /// Prefix shared by every key this service writes.
    pub namespace: String,
    /// Lifetime of cached listing pages.
    pub list_ttl_seconds: u64,
    /// Lifetime of cached recommendation sets.
    pub recommendation_ttl_seconds: u64,
    /// Maximum campaigns returned per recommendation set.
    pub recommendation_limit: usize,
    /// Maximum entries held by the in-process store.
    pub memory_capacity: usize,
    /// Upper bound for a single cache-store round trip.
    pub operation_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: DEFAULT_NAMESPACE.to_string(),
            list_ttl_seconds: DEFAULT_LIST_TTL_SECONDS,
            recommendation_ttl_seconds: DEFAULT_RECOMMENDATION_TTL_SECONDS,
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            operation_timeout_ms: DEFAULT_OPERATION_TIMEOUT_MS,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            namespace: settings.namespace.clone(),
            list_ttl_seconds: settings.list_ttl.as_secs(),
            recommendation_ttl_seconds: settings.recommendation_ttl.as_secs(),
            recommendation_limit: settings.recommendation_limit.get(),
            memory_capacity: settings.memory_capacity.get(),
            operation_timeout_ms: settings.operation_timeout.as_millis() as u64,
        }
    }
}

impl CacheConfig {
    pub fn list_ttl(&self) -> Duration {
        Duration::from_secs(self.list_ttl_seconds)
    }

    pub fn recommendation_ttl(&self) -> Duration {
        Duration::from_secs(self.recommendation_ttl_seconds)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Returns the memory capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn memory_capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.memory_capacity).unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.namespace, "creatorhub");
        assert_eq!(config.list_ttl(), Duration::from_secs(300));
        assert_eq!(config.recommendation_ttl(), Duration::from_secs(3600));
        assert_eq!(config.recommendation_limit, 10);
        assert_eq!(config.memory_capacity, 10_000);
        assert_eq!(config.operation_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn recommendations_outlive_listings() {
        let config = CacheConfig::default();
        assert!(config.recommendation_ttl() > config.list_ttl());
    }

    #[test]
    fn non_zero_clamps_to_min() {
        let config = CacheConfig {
            memory_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.memory_capacity_non_zero().get(), 1);
    }
}
