//! Shared domain enumerations aligned with persisted values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Published,
    Active,
    Completed,
    Archived,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 5] = [
        CampaignStatus::Draft,
        CampaignStatus::Published,
        CampaignStatus::Active,
        CampaignStatus::Completed,
        CampaignStatus::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Published => "published",
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Archived => "archived",
        }
    }

    /// Campaigns with audience commitments beyond `Published` can only be archived.
    pub fn is_deletable(self) -> bool {
        matches!(self, CampaignStatus::Draft | CampaignStatus::Published)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Fashion,
    Beauty,
    Technology,
    Gaming,
    Food,
    Travel,
    Fitness,
    Lifestyle,
    Education,
    Entertainment,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Fashion,
        Category::Beauty,
        Category::Technology,
        Category::Gaming,
        Category::Food,
        Category::Travel,
        Category::Fitness,
        Category::Lifestyle,
        Category::Education,
        Category::Entertainment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Fashion => "fashion",
            Category::Beauty => "beauty",
            Category::Technology => "technology",
            Category::Gaming => "gaming",
            Category::Food => "food",
            Category::Travel => "travel",
            Category::Fitness => "fitness",
            Category::Lifestyle => "lifestyle",
            Category::Education => "education",
            Category::Entertainment => "entertainment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    #[serde(rename = "tiktok")]
    TikTok,
    #[serde(rename = "youtube")]
    YouTube,
    Twitter,
    Twitch,
    Facebook,
    #[serde(rename = "linkedin")]
    LinkedIn,
}

impl Platform {
    pub const ALL: [Platform; 7] = [
        Platform::Instagram,
        Platform::TikTok,
        Platform::YouTube,
        Platform::Twitter,
        Platform::Twitch,
        Platform::Facebook,
        Platform::LinkedIn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
            Platform::Twitter => "twitter",
            Platform::Twitch => "twitch",
            Platform::Facebook => "facebook",
            Platform::LinkedIn => "linkedin",
        }
    }
}

macro_rules! impl_str_conversions {
    ($ty:ty, $label:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let needle = value.trim();
                <$ty>::ALL
                    .into_iter()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| {
                        DomainError::validation(format!("unknown {} `{}`", $label, needle))
                    })
            }
        }
    };
}

impl_str_conversions!(CampaignStatus, "campaign status");
impl_str_conversions!(Category, "category");
impl_str_conversions!(Platform, "platform");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Fashion".parse::<Category>().unwrap(), Category::Fashion);
        assert_eq!(" TikTok ".parse::<Platform>().unwrap(), Platform::TikTok);
        assert_eq!(
            "ACTIVE".parse::<CampaignStatus>().unwrap(),
            CampaignStatus::Active
        );
    }

    #[test]
    fn rejects_unknown_values() {
        assert!("myspace".parse::<Platform>().is_err());
        assert!("paused".parse::<CampaignStatus>().is_err());
    }

    #[test]
    fn serde_matches_as_str() {
        for platform in Platform::ALL {
            let encoded = serde_json::to_string(&platform).unwrap();
            assert_eq!(encoded, format!("\"{}\"", platform.as_str()));
        }
        for category in Category::ALL {
            let encoded = serde_json::to_string(&category).unwrap();
            assert_eq!(encoded, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn only_early_states_are_deletable() {
        let deletable: Vec<_> = CampaignStatus::ALL
            .into_iter()
            .filter(|status| status.is_deletable())
            .collect();
        assert_eq!(
            deletable,
            vec![CampaignStatus::Draft, CampaignStatus::Published]
        );
    }
}
