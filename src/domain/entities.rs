//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::types::{CampaignStatus, Category, Platform};

/// Inclusive audience age bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

impl AgeRange {
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Calendar window in which the campaign runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub id: Uuid,
    pub brand_id: Uuid,
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
    pub status: CampaignStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl CampaignRecord {
    pub fn is_owned_by(&self, actor_id: Uuid) -> bool {
        self.brand_id == actor_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRecord {
    pub id: Uuid,
    pub display_name: String,
    pub logo_url: Option<String>,
}

/// Brand fields joined into listing rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandSummary {
    pub display_name: String,
    pub logo_url: Option<String>,
}

impl From<BrandRecord> for BrandSummary {
    fn from(record: BrandRecord) -> Self {
        Self {
            display_name: record.display_name,
            logo_url: record.logo_url,
        }
    }
}

/// A campaign as it appears in listing results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignListing {
    #[serde(flatten)]
    pub campaign: CampaignRecord,
    pub brand: Option<BrandSummary>,
}
