//! Targeted invalidation planning.
//!
//! A campaign mutation can only change listings whose category segment is
//! `any` or one of the campaign's categories (before and after the change),
//! and whose platform segment is `any` or starts with one of the campaign's
//! platforms. Recommendation sets are dropped wholesale since any campaign
//! may enter or leave any creator's top matches.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::entities::CampaignRecord;
use crate::domain::types::{Category, Platform};

use super::keys::{ANY_SEGMENT, list_prefixes_for, recommendation_namespace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationScope {
    pub categories: BTreeSet<Category>,
    pub platforms: BTreeSet<Platform>,
    pub recommendations: bool,
}

impl fmt::Display for InvalidationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InvalidationScope {{ categories: {}, platforms: {}, recommendations: {} }}",
            self.categories.len(),
            self.platforms.len(),
            self.recommendations,
        )
    }
}

impl InvalidationScope {
    /// Scope touched by creating or deleting `record`.
    pub fn for_campaign(record: &CampaignRecord) -> Self {
        Self {
            categories: BTreeSet::from([record.category]),
            platforms: record.platforms.iter().copied().collect(),
            recommendations: true,
        }
    }

    /// Scope touched by replacing `before` with `after`.
    pub fn for_change(before: &CampaignRecord, after: &CampaignRecord) -> Self {
        let mut scope = Self::for_campaign(before);
        scope.merge(Self::for_campaign(after));
        scope
    }

    pub fn merge(&mut self, other: Self) {
        self.categories.extend(other.categories);
        self.platforms.extend(other.platforms);
        self.recommendations |= other.recommendations;
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.platforms.is_empty() && !self.recommendations
    }

    /// Key prefixes to delete, deduplicated and in a stable order.
    pub fn prefixes(&self, namespace: &str) -> Vec<String> {
        let mut prefixes = BTreeSet::new();

        if !self.categories.is_empty() || !self.platforms.is_empty() {
            let segments = std::iter::once(ANY_SEGMENT)
                .chain(self.categories.iter().map(|category| category.as_str()));
            for segment in segments {
                prefixes.extend(list_prefixes_for(namespace, segment, &self.platforms));
            }
        }

        if self.recommendations {
            prefixes.insert(recommendation_namespace(namespace));
        }

        prefixes.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};
    use uuid::Uuid;

    use super::*;
    use crate::domain::entities::{AgeRange, DateRange};
    use crate::domain::types::CampaignStatus;

    fn record(category: Category, platforms: &[Platform]) -> CampaignRecord {
        let now = datetime!(2026-03-01 12:00 UTC);
        CampaignRecord {
            id: Uuid::new_v4(),
            brand_id: Uuid::new_v4(),
            title: "Spring drop".to_string(),
            description: "Seasonal launch for the spring collection.".to_string(),
            category,
            platforms: platforms.to_vec(),
            budget: 1_000.0,
            age_range: AgeRange::new(18, 35),
            interests: vec!["style".to_string()],
            regions: vec!["us".to_string()],
            schedule: DateRange::new(date!(2026 - 03 - 01), date!(2026 - 04 - 01)),
            deadline: datetime!(2026-03-20 00:00 UTC),
            status: CampaignStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn change_scope_unions_before_and_after() {
        let before = record(Category::Fashion, &[Platform::Instagram]);
        let after = record(Category::Beauty, &[Platform::TikTok]);

        let scope = InvalidationScope::for_change(&before, &after);
        assert_eq!(
            scope.categories,
            BTreeSet::from([Category::Fashion, Category::Beauty])
        );
        assert_eq!(
            scope.platforms,
            BTreeSet::from([Platform::Instagram, Platform::TikTok])
        );
        assert!(scope.recommendations);
    }

    #[test]
    fn prefixes_never_flush_the_whole_namespace() {
        let scope =
            InvalidationScope::for_campaign(&record(Category::Fashion, &[Platform::Instagram]));
        let prefixes = scope.prefixes("ns");

        assert!(prefixes.contains(&"ns:list:any:any:".to_string()));
        assert!(prefixes.contains(&"ns:list:fashion:any:".to_string()));
        assert!(prefixes.contains(&"ns:list:fashion:instagram:".to_string()));
        assert!(prefixes.contains(&"ns:list:fashion:instagram+".to_string()));
        assert!(prefixes.contains(&"ns:recs:".to_string()));
        assert!(!prefixes.iter().any(|p| p == "ns:" || p == "ns:list:"));
        assert!(!prefixes.iter().any(|p| p.starts_with("ns:list:beauty:")));
    }

    #[test]
    fn empty_scope_has_no_prefixes() {
        let scope = InvalidationScope::default();
        assert!(scope.is_empty());
        assert!(scope.prefixes("ns").is_empty());
    }
}
