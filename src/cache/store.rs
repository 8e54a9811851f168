//! Cache storage backends.
//!
//! The query cache talks to a [`CacheStore`]: a string key/value store with
//! per-entry TTL and prefix deletion. [`MemoryCacheStore`] keeps entries in an
//! LRU inside the process; [`RedisCacheStore`](super::redis_store::RedisCacheStore) shares them between instances.

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use thiserror::Error;
use tokio::time::Instant;

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation `{operation}` timed out")]
    Timeout { operation: &'static str },
    #[error("cached payload could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

impl CacheError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration)
    -> Result<(), CacheError>;

    /// Remove every entry whose key starts with `prefix`, returning how many
    /// were removed.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError>;
}

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process store with LRU eviction and lazy expiry.
pub struct MemoryCacheStore {
    entries: RwLock<LruCache<String, Entry>>,
}

impl MemoryCacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.memory_capacity_non_zero())),
        }
    }

    /// Number of stored entries, expired ones included until next touched.
    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        rw_read(&self.entries, SOURCE, "contains_key")
            .peek(key)
            .is_some_and(|entry| entry.expires_at > Instant::now())
    }

    pub fn clear(&self) {
        rw_write(&self.entries, SOURCE, "clear").clear();
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let mut entries = rw_write(&self.entries, SOURCE, "get");
        let found = entries
            .get(key)
            .map(|entry| (entry.expires_at > now, entry.value.clone()));

        match found {
            Some((true, value)) => Ok(Some(value)),
            Some((false, _)) => {
                entries.pop(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        rw_write(&self.entries, SOURCE, "set_with_ttl").put(key.to_string(), entry);
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut entries = rw_write(&self.entries, SOURCE, "delete_by_prefix");
        let doomed: Vec<String> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            entries.pop(key);
        }
        Ok(doomed.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize) -> MemoryCacheStore {
        MemoryCacheStore::new(&CacheConfig {
            memory_capacity: capacity,
            ..Default::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let store = store(8);
        store
            .set_with_ttl("k", "v".into(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn lru_evicts_oldest_entry() {
        let store = store(2);
        let ttl = Duration::from_secs(60);
        store.set_with_ttl("a", "1".into(), ttl).await.unwrap();
        store.set_with_ttl("b", "2".into(), ttl).await.unwrap();
        store.set_with_ttl("c", "3".into(), ttl).await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn delete_by_prefix_only_touches_matching_keys() {
        let store = store(8);
        let ttl = Duration::from_secs(60);
        store.set_with_ttl("ns:list:a", "1".into(), ttl).await.unwrap();
        store.set_with_ttl("ns:list:b", "2".into(), ttl).await.unwrap();
        store.set_with_ttl("ns:recs:x", "3".into(), ttl).await.unwrap();

        let removed = store.delete_by_prefix("ns:list:").await.unwrap();
        assert_eq!(removed, 2);
        assert!(store.contains_key("ns:recs:x"));
        assert!(!store.contains_key("ns:list:a"));
    }
}
