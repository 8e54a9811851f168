use std::collections::{BTreeSet, HashMap};

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::application::pagination::{ListEnvelope, PageWindow};
use crate::application::repos::{CampaignFilter, CampaignQueryFilter, CampaignSort};
use crate::cache::CacheKind;
use crate::domain::entities::{BrandSummary, CampaignListing, CampaignRecord};
use crate::domain::matching::rank;
use crate::domain::types::CampaignStatus;
use crate::domain::validation::normalize_tags;

use super::service::CampaignService;
use super::types::CampaignError;

impl CampaignService {
    /// Direct store read; never served from the cache.
    #[instrument(skip(self), fields(campaign_id = %id))]
    pub async fn get_campaign(&self, id: Uuid) -> Result<CampaignRecord, CampaignError> {
        self.store_call("find_by_id", self.reader.find_by_id(id))
            .await?
            .ok_or(CampaignError::NotFound)
    }

    /// One page of campaigns with their brands, read through the cache.
    #[instrument(skip_all)]
    pub async fn list_campaigns(
        &self,
        filter: CampaignFilter,
    ) -> Result<ListEnvelope<CampaignListing>, CampaignError> {
        let query = filter.normalize();
        let key = self.cache.list_key(&query);

        if let Some(key) = key.as_deref() {
            if let Some(cached) = self.cache.fetch(CacheKind::List, key).await {
                return Ok(cached);
            }
        }

        let window = query.page.window();
        let (campaigns, total) = self
            .store_call(
                "query_campaigns",
                self.reader.query_campaigns(&query.filter, query.sort, window),
            )
            .await?;

        let listings = self.join_brands(campaigns).await?;
        let envelope = ListEnvelope::from_window(listings, total, window);

        if let Some(key) = key.as_deref() {
            self.cache.store(CacheKind::List, key, &envelope).await;
        }

        debug!(total, returned = envelope.data.len(), "Listed campaigns");
        Ok(envelope)
    }

    /// Active campaigns sharing at least one interest with the creator,
    /// newest first.
    #[instrument(skip(self), fields(actor_id = %actor_id))]
    pub async fn recommend_campaigns(
        &self,
        actor_id: Uuid,
    ) -> Result<Vec<CampaignRecord>, CampaignError> {
        let key = self.cache.recommendation_key(actor_id);
        if let Some(cached) = self.cache.fetch(CacheKind::Recommendation, &key).await {
            return Ok(cached);
        }

        let interests: BTreeSet<String> = self
            .store_call("find_interests", self.profiles.find_interests(actor_id))
            .await?
            .map(normalize_tags)
            .unwrap_or_default()
            .into_iter()
            .collect();

        if interests.is_empty() {
            debug!("Creator has no interests; nothing to recommend");
            return Ok(Vec::new());
        }

        let limit = self.cache.config().recommendation_limit.max(1);
        let filter = CampaignQueryFilter {
            status: Some(CampaignStatus::Active),
            interests: interests.clone(),
            ..Default::default()
        };
        let window = PageWindow {
            offset: 0,
            limit: u32::try_from(limit).unwrap_or(u32::MAX),
        };

        let (candidates, _) = self
            .store_call(
                "query_campaigns",
                self.reader
                    .query_campaigns(&filter, CampaignSort::newest_first(), window),
            )
            .await?;

        let recommended = rank(&interests, candidates, limit);
        self.cache
            .store(CacheKind::Recommendation, &key, &recommended)
            .await;

        debug!(count = recommended.len(), "Recommended campaigns");
        Ok(recommended)
    }

    /// Drop one creator's cached recommendations, e.g. after their
    /// interests change.
    #[instrument(skip(self), fields(actor_id = %actor_id))]
    pub async fn invalidate_recommendations_for(&self, actor_id: Uuid) -> u64 {
        self.cache.invalidate_recommendations(actor_id).await
    }

    async fn join_brands(
        &self,
        campaigns: Vec<CampaignRecord>,
    ) -> Result<Vec<CampaignListing>, CampaignError> {
        let brand_ids: Vec<Uuid> = campaigns
            .iter()
            .map(|campaign| campaign.brand_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut brands: HashMap<Uuid, BrandSummary> = HashMap::new();
        if !brand_ids.is_empty() {
            let records = self
                .store_call("find_brands", self.brands.find_brands(&brand_ids))
                .await?;
            brands.extend(
                records
                    .into_iter()
                    .map(|brand| (brand.id, BrandSummary::from(brand))),
            );
        }

        Ok(campaigns
            .into_iter()
            .map(|campaign| CampaignListing {
                brand: brands.get(&campaign.brand_id).cloned(),
                campaign,
            })
            .collect())
    }
}
