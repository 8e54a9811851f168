use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use metrics::histogram;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::application::repos::{
    BrandsRepo, CampaignsRepo, CampaignsWriteRepo, ProfilesRepo, RepoError,
};
use crate::cache::QueryCache;
use crate::domain::entities::CampaignRecord;
use crate::domain::lifecycle::verify_transition_table;

use super::types::{CampaignError, ServiceTimeouts};

pub const METRIC_STORE_QUERY_MS: &str = "creatorhub_store_query_ms";

#[derive(Clone)]
pub struct CampaignService {
    pub(crate) reader: Arc<dyn CampaignsRepo>,
    pub(crate) writer: Arc<dyn CampaignsWriteRepo>,
    pub(crate) brands: Arc<dyn BrandsRepo>,
    pub(crate) profiles: Arc<dyn ProfilesRepo>,
    pub(crate) cache: QueryCache,
    pub(crate) timeouts: ServiceTimeouts,
}

impl CampaignService {
    /// Fails when the lifecycle table is inconsistent.
    pub fn new(
        reader: Arc<dyn CampaignsRepo>,
        writer: Arc<dyn CampaignsWriteRepo>,
        brands: Arc<dyn BrandsRepo>,
        profiles: Arc<dyn ProfilesRepo>,
        cache: QueryCache,
        timeouts: ServiceTimeouts,
    ) -> Result<Self, CampaignError> {
        verify_transition_table().map_err(CampaignError::Lifecycle)?;

        Ok(Self {
            reader,
            writer,
            brands,
            profiles,
            cache,
            timeouts,
        })
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Run a store call under the configured bound, recording its latency.
    pub(crate) async fn store_call<T, F>(
        &self,
        operation: &'static str,
        call: F,
    ) -> Result<T, CampaignError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        let started_at = Instant::now();
        let outcome = tokio::time::timeout(self.timeouts.store, call).await;
        histogram!(METRIC_STORE_QUERY_MS, "operation" => operation)
            .record(started_at.elapsed().as_secs_f64() * 1000.0);

        match outcome {
            Ok(result) => result.map_err(CampaignError::from),
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.timeouts.store.as_millis() as u64,
                    "Store operation timed out"
                );
                Err(CampaignError::Timeout { operation })
            }
        }
    }

    /// Load a campaign and check that `actor_id` owns it.
    pub(crate) async fn load_owned(
        &self,
        id: Uuid,
        actor_id: Uuid,
    ) -> Result<CampaignRecord, CampaignError> {
        let record = self
            .store_call("find_by_id", self.reader.find_by_id(id))
            .await?
            .ok_or(CampaignError::NotFound)?;

        if !record.is_owned_by(actor_id) {
            warn!(campaign_id = %id, actor_id = %actor_id, "Rejected mutation by non-owner");
            return Err(CampaignError::Forbidden);
        }

        Ok(record)
    }
}

/// Timestamp for the next mutation; never earlier than the previous one.
pub(crate) fn next_updated_at(previous: OffsetDateTime) -> OffsetDateTime {
    OffsetDateTime::now_utc().max(previous)
}
