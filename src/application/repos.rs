//! Repository traits describing persistence adapters.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::pagination::{PageRequest, PageWindow};
use crate::domain::entities::{AgeRange, BrandRecord, CampaignRecord, DateRange};
use crate::domain::types::{CampaignStatus, Category, Platform};
use crate::domain::validation::normalize_tags;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Budget,
    Deadline,
    Title,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Budget => "budget",
            SortField::Deadline => "deadline",
            SortField::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CampaignSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl CampaignSort {
    pub fn newest_first() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

/// Listing filter as supplied by callers.
#[derive(Debug, Clone, Default)]
pub struct CampaignFilter {
    pub status: Option<CampaignStatus>,
    pub category: Option<Category>,
    /// Campaigns must target every listed platform.
    pub platforms: Vec<Platform>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    /// Campaigns must share at least one interest.
    pub interests: Vec<String>,
    /// Campaigns must share at least one region.
    pub regions: Vec<String>,
    pub search: Option<String>,
    pub sort: Option<CampaignSort>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl CampaignFilter {
    /// Canonical form: sets instead of lists, lowercased tags and search,
    /// explicit sort and paging.
    pub fn normalize(self) -> CampaignQuery {
        let search = self
            .search
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());

        CampaignQuery {
            filter: CampaignQueryFilter {
                status: self.status,
                category: self.category,
                platforms: self.platforms.into_iter().collect(),
                budget_min: self.budget_min.filter(|value| value.is_finite()),
                budget_max: self.budget_max.filter(|value| value.is_finite()),
                interests: normalize_tags(self.interests).into_iter().collect(),
                regions: normalize_tags(self.regions).into_iter().collect(),
                search,
            },
            sort: self.sort.unwrap_or_default(),
            page: PageRequest::new(self.page, self.limit),
        }
    }
}

/// Normalized predicate set understood by every store adapter.
///
/// Field order is fixed and collections are ordered sets, so the serialized
/// form is stable and doubles as cache key material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignQueryFilter {
    pub status: Option<CampaignStatus>,
    pub category: Option<Category>,
    pub platforms: BTreeSet<Platform>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub interests: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignQuery {
    pub filter: CampaignQueryFilter,
    pub sort: CampaignSort,
    pub page: PageRequest,
}

/// Field-level patch applied by the store's update-by-id.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub platforms: Option<Vec<Platform>>,
    pub budget: Option<f64>,
    pub age_range: Option<AgeRange>,
    pub interests: Option<Vec<String>>,
    pub regions: Option<Vec<String>>,
    pub schedule: Option<DateRange>,
    pub deadline: Option<OffsetDateTime>,
    pub status: Option<CampaignStatus>,
    pub updated_at: OffsetDateTime,
}

impl CampaignChanges {
    pub fn touch(updated_at: OffsetDateTime) -> Self {
        Self {
            title: None,
            description: None,
            category: None,
            platforms: None,
            budget: None,
            age_range: None,
            interests: None,
            regions: None,
            schedule: None,
            deadline: None,
            status: None,
            updated_at,
        }
    }

    /// Apply the patch to a record the way the store does.
    pub fn apply_to(&self, record: &mut CampaignRecord) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(category) = self.category {
            record.category = category;
        }
        if let Some(platforms) = &self.platforms {
            record.platforms = platforms.clone();
        }
        if let Some(budget) = self.budget {
            record.budget = budget;
        }
        if let Some(age_range) = self.age_range {
            record.age_range = age_range;
        }
        if let Some(interests) = &self.interests {
            record.interests = interests.clone();
        }
        if let Some(regions) = &self.regions {
            record.regions = regions.clone();
        }
        if let Some(schedule) = self.schedule {
            record.schedule = schedule;
        }
        if let Some(deadline) = self.deadline {
            record.deadline = deadline;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        record.updated_at = self.updated_at;
    }
}

#[async_trait]
pub trait CampaignsRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CampaignRecord>, RepoError>;

    /// One page of matching campaigns plus the total match count.
    async fn query_campaigns(
        &self,
        filter: &CampaignQueryFilter,
        sort: CampaignSort,
        window: PageWindow,
    ) -> Result<(Vec<CampaignRecord>, u64), RepoError>;
}

#[async_trait]
pub trait CampaignsWriteRepo: Send + Sync {
    async fn insert_campaign(&self, record: &CampaignRecord) -> Result<CampaignRecord, RepoError>;

    async fn update_campaign(
        &self,
        id: Uuid,
        changes: &CampaignChanges,
    ) -> Result<CampaignRecord, RepoError>;

    async fn delete_campaign(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait BrandsRepo: Send + Sync {
    async fn find_brands(&self, ids: &[Uuid]) -> Result<Vec<BrandRecord>, RepoError>;
}

#[async_trait]
pub trait ProfilesRepo: Send + Sync {
    /// Interest tags of a creator, `None` when the actor has no profile.
    async fn find_interests(&self, actor_id: Uuid) -> Result<Option<Vec<String>>, RepoError>;
}
