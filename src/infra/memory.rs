//! In-process persistent store.
//!
//! Implements every repository trait over `DashMap`s. Used by the operator
//! binary when no database is configured and by tests, which rely on the
//! per-operation call counters and the optional injected latency.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::application::pagination::PageWindow;
use crate::application::repos::{
    BrandsRepo, CampaignChanges, CampaignQueryFilter, CampaignSort, CampaignsRepo,
    CampaignsWriteRepo, ProfilesRepo, RepoError, SortDirection, SortField,
};
use crate::domain::entities::{BrandRecord, CampaignRecord};
use crate::domain::matching::score;

/// Snapshot of how often each store operation ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub find_by_id: u64,
    pub query_campaigns: u64,
    pub insert_campaign: u64,
    pub update_campaign: u64,
    pub delete_campaign: u64,
    pub find_brands: u64,
    pub find_interests: u64,
}

#[derive(Default)]
struct CallCounters {
    find_by_id: AtomicU64,
    query_campaigns: AtomicU64,
    insert_campaign: AtomicU64,
    update_campaign: AtomicU64,
    delete_campaign: AtomicU64,
    find_brands: AtomicU64,
    find_interests: AtomicU64,
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, AtomicOrdering::Relaxed);
}

#[derive(Default)]
pub struct MemoryRepositories {
    campaigns: DashMap<Uuid, CampaignRecord>,
    brands: DashMap<Uuid, BrandRecord>,
    profiles: DashMap<Uuid, Vec<String>>,
    calls: CallCounters,
    latency_ms: AtomicU64,
}

impl MemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_brand(&self, brand: BrandRecord) {
        self.brands.insert(brand.id, brand);
    }

    pub fn set_interests(&self, actor_id: Uuid, interests: Vec<String>) {
        self.profiles.insert(actor_id, interests);
    }

    /// Raw read that bypasses counters and latency.
    pub fn campaign(&self, id: Uuid) -> Option<CampaignRecord> {
        self.campaigns.get(&id).map(|entry| entry.value().clone())
    }

    pub fn campaign_count(&self) -> usize {
        self.campaigns.len()
    }

    /// Delay every subsequent store operation by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, AtomicOrdering::Relaxed);
    }

    pub fn calls(&self) -> StoreCalls {
        let load = |counter: &AtomicU64| counter.load(AtomicOrdering::Relaxed);
        StoreCalls {
            find_by_id: load(&self.calls.find_by_id),
            query_campaigns: load(&self.calls.query_campaigns),
            insert_campaign: load(&self.calls.insert_campaign),
            update_campaign: load(&self.calls.update_campaign),
            delete_campaign: load(&self.calls.delete_campaign),
            find_brands: load(&self.calls.find_brands),
            find_interests: load(&self.calls.find_interests),
        }
    }

    async fn simulate_latency(&self) {
        let millis = self.latency_ms.load(AtomicOrdering::Relaxed);
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}

/// Whether `record` satisfies every predicate in `filter`.
pub fn matches_filter(record: &CampaignRecord, filter: &CampaignQueryFilter) -> bool {
    if filter.status.is_some_and(|status| status != record.status) {
        return false;
    }
    if filter
        .category
        .is_some_and(|category| category != record.category)
    {
        return false;
    }
    if !filter
        .platforms
        .iter()
        .all(|platform| record.platforms.contains(platform))
    {
        return false;
    }
    if filter.budget_min.is_some_and(|min| record.budget < min)
        || filter.budget_max.is_some_and(|max| record.budget > max)
    {
        return false;
    }
    if !filter.interests.is_empty() && !overlaps(&filter.interests, &record.interests) {
        return false;
    }
    if !filter.regions.is_empty() && !overlaps(&filter.regions, &record.regions) {
        return false;
    }
    if let Some(search) = &filter.search {
        let title = record.title.to_lowercase();
        let description = record.description.to_lowercase();
        if !title.contains(search.as_str()) && !description.contains(search.as_str()) {
            return false;
        }
    }
    true
}

fn overlaps(wanted: &BTreeSet<String>, tags: &[String]) -> bool {
    let tags: BTreeSet<&str> = tags.iter().map(String::as_str).collect();
    score(wanted, &tags).is_match
}

fn compare(a: &CampaignRecord, b: &CampaignRecord, sort: CampaignSort) -> Ordering {
    let primary = match sort.field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Budget => a.budget.total_cmp(&b.budget),
        SortField::Deadline => a.deadline.cmp(&b.deadline),
        SortField::Title => a.title.cmp(&b.title),
    };
    let ordering = primary.then_with(|| a.id.cmp(&b.id));
    match sort.direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[async_trait]
impl CampaignsRepo for MemoryRepositories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CampaignRecord>, RepoError> {
        bump(&self.calls.find_by_id);
        self.simulate_latency().await;
        Ok(self.campaign(id))
    }

    async fn query_campaigns(
        &self,
        filter: &CampaignQueryFilter,
        sort: CampaignSort,
        window: PageWindow,
    ) -> Result<(Vec<CampaignRecord>, u64), RepoError> {
        bump(&self.calls.query_campaigns);
        self.simulate_latency().await;

        let mut matched: Vec<CampaignRecord> = self
            .campaigns
            .iter()
            .filter(|entry| matches_filter(entry.value(), filter))
            .map(|entry| entry.value().clone())
            .collect();
        matched.sort_by(|a, b| compare(a, b, sort));

        let total = matched.len() as u64;
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let page = matched
            .into_iter()
            .skip(offset)
            .take(window.limit as usize)
            .collect();

        Ok((page, total))
    }
}

#[async_trait]
impl CampaignsWriteRepo for MemoryRepositories {
    async fn insert_campaign(&self, record: &CampaignRecord) -> Result<CampaignRecord, RepoError> {
        bump(&self.calls.insert_campaign);
        self.simulate_latency().await;

        match self.campaigns.entry(record.id) {
            Entry::Occupied(_) => Err(RepoError::Duplicate {
                constraint: "campaigns_pkey".to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record.clone())
            }
        }
    }

    async fn update_campaign(
        &self,
        id: Uuid,
        changes: &CampaignChanges,
    ) -> Result<CampaignRecord, RepoError> {
        bump(&self.calls.update_campaign);
        self.simulate_latency().await;

        let mut entry = self.campaigns.get_mut(&id).ok_or(RepoError::NotFound)?;
        changes.apply_to(entry.value_mut());
        Ok(entry.value().clone())
    }

    async fn delete_campaign(&self, id: Uuid) -> Result<(), RepoError> {
        bump(&self.calls.delete_campaign);
        self.simulate_latency().await;

        self.campaigns
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl BrandsRepo for MemoryRepositories {
    async fn find_brands(&self, ids: &[Uuid]) -> Result<Vec<BrandRecord>, RepoError> {
        bump(&self.calls.find_brands);
        self.simulate_latency().await;

        Ok(ids
            .iter()
            .filter_map(|id| self.brands.get(id).map(|entry| entry.value().clone()))
            .collect())
    }
}

#[async_trait]
impl ProfilesRepo for MemoryRepositories {
    async fn find_interests(&self, actor_id: Uuid) -> Result<Option<Vec<String>>, RepoError> {
        bump(&self.calls.find_interests);
        self.simulate_latency().await;

        Ok(self
            .profiles
            .get(&actor_id)
            .map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};
    use time::{Duration as TimeDuration, OffsetDateTime};

    use super::*;
    use crate::application::repos::CampaignFilter;
    use crate::domain::entities::{AgeRange, DateRange};
    use crate::domain::types::{CampaignStatus, Category, Platform};

    fn record(
        category: Category,
        platforms: &[Platform],
        interests: &[&str],
        created_at: OffsetDateTime,
    ) -> CampaignRecord {
        CampaignRecord {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            title: "Holiday gift guide".to_string(),
            description: "Curated picks for the holiday season.".to_string(),
            category,
            platforms: platforms.to_vec(),
            budget: 500.0,
            age_range: AgeRange::new(18, 40),
            interests: interests.iter().map(|v| v.to_string()).collect(),
            regions: vec!["us".to_string()],
            schedule: DateRange::new(date!(2026 - 11 - 01), date!(2026 - 12 - 24)),
            deadline: datetime!(2026-12-01 00:00 UTC),
            status: CampaignStatus::Active,
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn query_filters_sorts_and_pages() {
        let repos = MemoryRepositories::new();
        let base = datetime!(2026-10-01 00:00 UTC);
        let ids: Vec<Uuid> = (0..3)
            .map(|i| {
                let rec = record(
                    Category::Fashion,
                    &[Platform::Instagram, Platform::TikTok],
                    &["style"],
                    base + TimeDuration::days(i),
                );
                let id = rec.id;
                repos.campaigns.insert(id, rec);
                id
            })
            .collect();
        let other = record(Category::Gaming, &[Platform::Twitch], &["esports"], base);
        repos.campaigns.insert(other.id, other);

        let query = CampaignFilter {
            category: Some(Category::Fashion),
            platforms: vec![Platform::TikTok],
            page: Some(1),
            limit: Some(2),
            ..Default::default()
        }
        .normalize();

        let (page, total) = repos
            .query_campaigns(&query.filter, query.sort, query.page.window())
            .await
            .unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.iter().map(|c| c.id).collect::<Vec<_>>(), vec![ids[2], ids[1]]);
        assert_eq!(repos.calls().query_campaigns, 1);
    }

    #[test]
    fn filter_predicates() {
        let rec = record(
            Category::Beauty,
            &[Platform::YouTube],
            &["skincare", "makeup"],
            datetime!(2026-10-01 00:00 UTC),
        );

        let by = |filter: CampaignFilter| matches_filter(&rec, &filter.normalize().filter);

        assert!(by(CampaignFilter {
            interests: vec!["MAKEUP".into(), "gaming".into()],
            ..Default::default()
        }));
        assert!(!by(CampaignFilter {
            interests: vec!["gaming".into()],
            ..Default::default()
        }));
        assert!(by(CampaignFilter {
            search: Some("GIFT".into()),
            ..Default::default()
        }));
        assert!(!by(CampaignFilter {
            budget_min: Some(501.0),
            ..Default::default()
        }));
        assert!(!by(CampaignFilter {
            platforms: vec![Platform::YouTube, Platform::Instagram],
            ..Default::default()
        }));
        assert!(!by(CampaignFilter {
            status: Some(CampaignStatus::Draft),
            ..Default::default()
        }));
    }

    #[tokio::test]
    async fn writes_report_missing_rows() {
        let repos = MemoryRepositories::new();
        let id = Uuid::new_v4();
        let changes = CampaignChanges::touch(OffsetDateTime::now_utc());

        assert!(matches!(
            repos.update_campaign(id, &changes).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            repos.delete_campaign(id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let repos = MemoryRepositories::new();
        let rec = record(
            Category::Food,
            &[Platform::Instagram],
            &["vegan"],
            datetime!(2026-10-01 00:00 UTC),
        );
        repos.insert_campaign(&rec).await.unwrap();
        assert!(matches!(
            repos.insert_campaign(&rec).await,
            Err(RepoError::Duplicate { .. })
        ));
    }
}
