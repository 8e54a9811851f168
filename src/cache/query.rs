//! Read-through query cache.
//!
//! Every operation here is best effort: store failures, timeouts and decode
//! errors are logged and counted, then treated as a miss (reads) or skipped
//! (writes and invalidation). Callers never see a [`CacheError`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::repos::CampaignQuery;

use super::config::CacheConfig;
use super::invalidation::InvalidationScope;
use super::keys;
use super::store::{CacheError, CacheStore};

pub const METRIC_CACHE_HIT: &str = "creatorhub_cache_hit_total";
pub const METRIC_CACHE_MISS: &str = "creatorhub_cache_miss_total";
pub const METRIC_CACHE_ERROR: &str = "creatorhub_cache_error_total";
pub const METRIC_CACHE_INVALIDATED: &str = "creatorhub_cache_invalidated_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    List,
    Recommendation,
}

impl CacheKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheKind::List => "list",
            CacheKind::Recommendation => "recommendation",
        }
    }
}

#[derive(Clone)]
pub struct QueryCache {
    store: Arc<dyn CacheStore>,
    config: Arc<CacheConfig>,
}

impl QueryCache {
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Cache key for a listing, `None` if the query cannot be encoded.
    pub fn list_key(&self, query: &CampaignQuery) -> Option<String> {
        match keys::list_key(&self.config.namespace, query) {
            Ok(key) => Some(key),
            Err(err) => {
                warn!(error = %err, "Failed to derive listing cache key");
                counter!(METRIC_CACHE_ERROR, "kind" => CacheKind::List.as_str()).increment(1);
                None
            }
        }
    }

    pub fn recommendation_key(&self, actor_id: Uuid) -> String {
        keys::recommendation_key(&self.config.namespace, actor_id)
    }

    pub async fn fetch<T: DeserializeOwned>(&self, kind: CacheKind, key: &str) -> Option<T> {
        if !self.is_enabled() {
            return None;
        }

        let raw = match self.bounded("get", self.store.get(key)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                counter!(METRIC_CACHE_MISS, "kind" => kind.as_str()).increment(1);
                return None;
            }
            Err(err) => {
                self.record_error(kind, "get", key, &err);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                counter!(METRIC_CACHE_HIT, "kind" => kind.as_str()).increment(1);
                debug!(key, kind = kind.as_str(), "Query cache hit");
                Some(value)
            }
            Err(err) => {
                self.record_error(kind, "decode", key, &CacheError::from(err));
                None
            }
        }
    }

    pub async fn store<T: Serialize>(&self, kind: CacheKind, key: &str, value: &T) {
        if !self.is_enabled() {
            return;
        }

        let ttl = self.ttl_for(kind);
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                self.record_error(kind, "encode", key, &CacheError::from(err));
                return;
            }
        };

        if let Err(err) = self
            .bounded("set", self.store.set_with_ttl(key, encoded, ttl))
            .await
        {
            self.record_error(kind, "set", key, &err);
        }
    }

    /// Drop every cached listing and recommendation set the scope may affect.
    /// Returns the number of entries removed.
    pub async fn invalidate(&self, scope: &InvalidationScope) -> u64 {
        if !self.is_enabled() || scope.is_empty() {
            return 0;
        }

        let prefixes = scope.prefixes(&self.config.namespace);
        let removed = self.delete_prefixes(&prefixes).await;
        debug!(%scope, prefixes = prefixes.len(), removed, "Invalidated query cache");
        removed
    }

    /// Drop the cached recommendation set of a single creator.
    pub async fn invalidate_recommendations(&self, actor_id: Uuid) -> u64 {
        if !self.is_enabled() {
            return 0;
        }

        let key = self.recommendation_key(actor_id);
        self.delete_prefixes(std::slice::from_ref(&key)).await
    }

    async fn delete_prefixes(&self, prefixes: &[String]) -> u64 {
        let results = join_all(
            prefixes
                .iter()
                .map(|prefix| self.bounded("delete_by_prefix", self.store.delete_by_prefix(prefix))),
        )
        .await;

        let mut removed = 0;
        for (prefix, result) in prefixes.iter().zip(results) {
            match result {
                Ok(count) => removed += count,
                Err(err) => {
                    warn!(prefix = %prefix, error = %err, "Failed to invalidate query cache prefix");
                    counter!(METRIC_CACHE_ERROR, "kind" => "invalidate").increment(1);
                }
            }
        }

        counter!(METRIC_CACHE_INVALIDATED).increment(removed);
        removed
    }

    fn ttl_for(&self, kind: CacheKind) -> Duration {
        match kind {
            CacheKind::List => self.config.list_ttl(),
            CacheKind::Recommendation => self.config.recommendation_ttl(),
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        match tokio::time::timeout(self.config.operation_timeout(), fut).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout { operation }),
        }
    }

    fn record_error(&self, kind: CacheKind, operation: &'static str, key: &str, err: &CacheError) {
        warn!(
            key,
            kind = kind.as_str(),
            operation,
            error = %err,
            "Query cache operation failed; falling through"
        );
        counter!(METRIC_CACHE_ERROR, "kind" => kind.as_str()).increment(1);
    }
}
