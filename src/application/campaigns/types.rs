use std::time::Duration;

use thiserror::Error;
use time::OffsetDateTime;

use crate::application::repos::{CampaignChanges, RepoError};
use crate::domain::entities::{AgeRange, DateRange};
use crate::domain::error::DomainError;
use crate::domain::types::{CampaignStatus, Category, Platform};
use crate::domain::validation::{ValidationErrors, normalize_platforms, normalize_tags};

const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(2_000);

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("campaign validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("campaign not found")]
    NotFound,
    #[error("actor does not own this campaign")]
    Forbidden,
    #[error("campaign cannot move from `{from}` to `{to}`")]
    InvalidTransition {
        from: CampaignStatus,
        to: CampaignStatus,
    },
    #[error("campaign in status `{status}` cannot be deleted")]
    Conflict { status: CampaignStatus },
    #[error("store operation `{operation}` timed out")]
    Timeout { operation: &'static str },
    #[error("lifecycle table rejected at startup: {0}")]
    Lifecycle(DomainError),
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for CampaignError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound,
            RepoError::Timeout => Self::Timeout { operation: "store" },
            other => Self::Repo(other),
        }
    }
}

impl From<DomainError> for CampaignError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
            DomainError::Validation { message } => {
                Self::Validation(ValidationErrors::single("status", message))
            }
            other @ DomainError::Invariant { .. } => Self::Lifecycle(other),
        }
    }
}

/// Bounds applied to persistent store calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTimeouts {
    pub store: Duration,
}

impl Default for ServiceTimeouts {
    fn default() -> Self {
        Self {
            store: DEFAULT_STORE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub platforms: Vec<Platform>,
    pub budget: f64,
    pub age_range: AgeRange,
    pub interests: Vec<String>,
    pub regions: Vec<String>,
    pub schedule: DateRange,
    pub deadline: OffsetDateTime,
}

/// Partial update of campaign fields. Status moves through
/// `transition_campaign_status` only.
#[derive(Debug, Clone, Default)]
pub struct CampaignPatch {
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
}

impl CampaignPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.platforms.is_none()
            && self.budget.is_none()
            && self.age_range.is_none()
            && self.interests.is_none()
            && self.regions.is_none()
            && self.schedule.is_none()
            && self.deadline.is_none()
    }

    pub(crate) fn into_changes(self, updated_at: OffsetDateTime) -> CampaignChanges {
        CampaignChanges {
            title: self.title,
            description: self.description,
            category: self.category,
            platforms: self.platforms.map(normalize_platforms),
            budget: self.budget,
            age_range: self.age_range,
            interests: self.interests.map(normalize_tags),
            regions: self.regions.map(normalize_tags),
            schedule: self.schedule,
            deadline: self.deadline,
            ..CampaignChanges::touch(updated_at)
        }
    }
}
