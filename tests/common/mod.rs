#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use creatorhub::application::campaigns::{CampaignService, NewCampaign, ServiceTimeouts};
use creatorhub::cache::{CacheConfig, CacheError, CacheStore, MemoryCacheStore, QueryCache};
use creatorhub::domain::entities::{AgeRange, BrandRecord, CampaignRecord, DateRange};
use creatorhub::domain::types::{CampaignStatus, Category, Platform};
use creatorhub::infra::memory::MemoryRepositories;
use time::OffsetDateTime;
use time::macros::{date, datetime};
use uuid::Uuid;

pub struct Harness {
    pub service: CampaignService,
    pub repos: Arc<MemoryRepositories>,
    pub cache_store: Arc<MemoryCacheStore>,
}

pub fn harness() -> Harness {
    let config = CacheConfig::default();
    let cache_store = Arc::new(MemoryCacheStore::new(&config));
    let repos = Arc::new(MemoryRepositories::new());
    let service = service_with(
        repos.clone(),
        cache_store.clone(),
        config,
        ServiceTimeouts::default(),
    );
    Harness {
        service,
        repos,
        cache_store,
    }
}

pub fn service_with(
    repos: Arc<MemoryRepositories>,
    cache_store: Arc<dyn CacheStore>,
    config: CacheConfig,
    timeouts: ServiceTimeouts,
) -> CampaignService {
    CampaignService::new(
        repos.clone(),
        repos.clone(),
        repos.clone(),
        repos,
        QueryCache::new(cache_store, config),
        timeouts,
    )
    .expect("lifecycle table is consistent")
}

pub fn new_campaign(category: Category, platforms: &[Platform], interests: &[&str]) -> NewCampaign {
    NewCampaign {
        title: "Summer launch".to_string(),
        description: "Promote the new summer collection to engaged audiences.".to_string(),
        category,
        platforms: platforms.to_vec(),
        budget: 2_500.0,
        age_range: AgeRange::new(18, 34),
        interests: interests.iter().map(|tag| tag.to_string()).collect(),
        regions: vec!["us".to_string()],
        schedule: DateRange::new(date!(2026 - 06 - 01), date!(2026 - 08 - 31)),
        deadline: datetime!(2026-07-15 00:00 UTC),
    }
}

pub fn brand(display_name: &str) -> BrandRecord {
    BrandRecord {
        id: Uuid::new_v4(),
        display_name: display_name.to_string(),
        logo_url: Some(format!("https://cdn.example.com/{display_name}.png")),
    }
}

/// Record inserted straight into the store, bypassing service validation.
pub fn stored_record(
    status: CampaignStatus,
    interests: &[&str],
    created_at: OffsetDateTime,
) -> CampaignRecord {
    CampaignRecord {
        id: Uuid::new_v4(),
        brand_id: Uuid::new_v4(),
        title: "Stored campaign".to_string(),
        description: "Inserted directly for recommendation checks.".to_string(),
        category: Category::Lifestyle,
        platforms: vec![Platform::Instagram],
        budget: 900.0,
        age_range: AgeRange::new(18, 65),
        interests: interests.iter().map(|tag| tag.to_string()).collect(),
        regions: vec!["eu".to_string()],
        schedule: DateRange::new(date!(2026 - 01 - 01), date!(2026 - 12 - 31)),
        deadline: datetime!(2026-11-30 00:00 UTC),
        status,
        created_at,
        updated_at: created_at,
    }
}

/// Drive a fresh draft through Published into Active.
pub async fn activate(service: &CampaignService, id: Uuid, owner: Uuid) -> CampaignRecord {
    service
        .transition_campaign_status(id, owner, CampaignStatus::Published)
        .await
        .expect("publish");
    service
        .transition_campaign_status(id, owner, CampaignStatus::Active)
        .await
        .expect("activate")
}

/// Cache store whose every operation fails.
pub struct BrokenCacheStore;

#[async_trait]
impl CacheStore for BrokenCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: String,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> Result<u64, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

/// Cache store that answers far slower than the cache timeout.
pub struct StalledCacheStore {
    pub delay: Duration,
}

#[async_trait]
impl CacheStore for StalledCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: String,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> Result<u64, CacheError> {
        tokio::time::sleep(self.delay).await;
        Ok(0)
    }
}
