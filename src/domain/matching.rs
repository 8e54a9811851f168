//! Interest overlap matching for recommendations.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use super::entities::CampaignRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub is_match: bool,
    /// Number of shared tags. Diagnostic only; ordering never uses it.
    pub overlap: usize,
}

/// Binary overlap test between two tag sets.
pub fn score<A, C>(actor_interests: &BTreeSet<A>, campaign_interests: &BTreeSet<C>) -> MatchScore
where
    A: AsRef<str> + Ord,
    C: AsRef<str> + Ord,
{
    let campaign: BTreeSet<&str> = campaign_interests.iter().map(as_str).collect();
    let overlap = actor_interests
        .iter()
        .map(as_str)
        .filter(|tag| campaign.contains(tag))
        .count();

    MatchScore {
        is_match: overlap > 0,
        overlap,
    }
}

fn as_str<T: AsRef<str>>(value: &T) -> &str {
    value.as_ref()
}

/// Keep matching campaigns, most recent first, capped at `limit`.
pub fn rank(
    actor_interests: &BTreeSet<String>,
    candidates: Vec<CampaignRecord>,
    limit: usize,
) -> Vec<CampaignRecord> {
    let mut matches: Vec<CampaignRecord> = candidates
        .into_iter()
        .filter(|campaign| {
            let tags: BTreeSet<&str> = campaign.interests.iter().map(String::as_str).collect();
            score(actor_interests, &tags).is_match
        })
        .collect();

    matches.sort_by_key(|campaign| Reverse((campaign.created_at, campaign.id)));
    matches.truncate(limit);
    matches
}
