use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::domain::entities::{AgeRange, BrandRecord, CampaignRecord, DateRange};
use crate::domain::types::{CampaignStatus, Category, Platform};

pub(crate) const CAMPAIGN_COLUMNS: &str = "id, brand_id, title, description, category, \
     platforms, budget, age_min, age_max, interests, regions, schedule_start, schedule_end, \
     deadline, status, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub(crate) struct CampaignRow {
    pub(crate) id: Uuid,
    pub(crate) brand_id: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) category: String,
    pub(crate) platforms: Vec<String>,
    pub(crate) budget: f64,
    pub(crate) age_min: i16,
    pub(crate) age_max: i16,
    pub(crate) interests: Vec<String>,
    pub(crate) regions: Vec<String>,
    pub(crate) schedule_start: Date,
    pub(crate) schedule_end: Date,
    pub(crate) deadline: OffsetDateTime,
    pub(crate) status: String,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

fn integrity(column: &str, err: impl std::fmt::Display) -> RepoError {
    RepoError::Integrity {
        message: format!("column `{column}`: {err}"),
    }
}

fn age(column: &str, value: i16) -> Result<u8, RepoError> {
    u8::try_from(value).map_err(|err| integrity(column, err))
}

impl TryFrom<CampaignRow> for CampaignRecord {
    type Error = RepoError;

    fn try_from(row: CampaignRow) -> Result<Self, Self::Error> {
        let platforms = row
            .platforms
            .iter()
            .map(|value| value.parse::<Platform>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| integrity("platforms", err))?;

        Ok(Self {
            id: row.id,
            brand_id: row.brand_id,
            title: row.title,
            description: row.description,
            category: row
                .category
                .parse::<Category>()
                .map_err(|err| integrity("category", err))?,
            platforms,
            budget: row.budget,
            age_range: AgeRange::new(age("age_min", row.age_min)?, age("age_max", row.age_max)?),
            interests: row.interests,
            regions: row.regions,
            schedule: DateRange::new(row.schedule_start, row.schedule_end),
            deadline: row.deadline,
            status: row
                .status
                .parse::<CampaignStatus>()
                .map_err(|err| integrity("status", err))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct BrandRow {
    pub(crate) id: Uuid,
    pub(crate) display_name: String,
    pub(crate) logo_url: Option<String>,
}

impl From<BrandRow> for BrandRecord {
    fn from(row: BrandRow) -> Self {
        Self {
            id: row.id,
            display_name: row.display_name,
            logo_url: row.logo_url,
        }
    }
}

pub(crate) fn platform_names(platforms: &[Platform]) -> Vec<String> {
    platforms.iter().map(|p| p.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;

    fn row() -> CampaignRow {
        CampaignRow {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            title: "Back to school".to_string(),
            description: "Stationery and backpacks for the new term.".to_string(),
            category: "education".to_string(),
            platforms: vec!["youtube".to_string(), "tiktok".to_string()],
            budget: 1200.0,
            age_min: 16,
            age_max: 24,
            interests: vec!["study".to_string()],
            regions: vec!["uk".to_string()],
            schedule_start: date!(2026 - 08 - 01),
            schedule_end: date!(2026 - 09 - 15),
            deadline: datetime!(2026-08-20 00:00 UTC),
            status: "published".to_string(),
            created_at: datetime!(2026-07-01 09:00 UTC),
            updated_at: datetime!(2026-07-02 09:00 UTC),
        }
    }

    #[test]
    fn row_converts_to_record() {
        let record = CampaignRecord::try_from(row()).expect("valid row");
        assert_eq!(record.category, Category::Education);
        assert_eq!(record.platforms, vec![Platform::YouTube, Platform::TikTok]);
        assert_eq!(record.status, CampaignStatus::Published);
        assert_eq!(record.age_range, AgeRange::new(16, 24));
    }

    #[test]
    fn unknown_enum_values_are_integrity_errors() {
        let mut bad = row();
        bad.status = "paused".to_string();
        assert!(matches!(
            CampaignRecord::try_from(bad),
            Err(RepoError::Integrity { .. })
        ));

        let mut bad = row();
        bad.age_min = -1;
        assert!(matches!(
            CampaignRecord::try_from(bad),
            Err(RepoError::Integrity { .. })
        ));
    }
}
