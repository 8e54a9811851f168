//! Cache key derivation.
//!
//! Listing keys have the shape
//! `{namespace}:list:{category}:{platforms}:{digest}`, where `category` and
//! `platforms` are `any` when unfiltered and `platforms` joins the required
//! platforms with `+` in set order. The leading segments let invalidation
//! target listings by prefix; the digest covers the whole normalized query.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::application::repos::CampaignQuery;
use crate::domain::types::{Category, Platform};

use super::store::CacheError;

pub const ANY_SEGMENT: &str = "any";
const PLATFORM_JOIN: char = '+';
const DIGEST_BYTES: usize = 16;

pub fn list_namespace(namespace: &str) -> String {
    format!("{namespace}:list:")
}

pub fn recommendation_namespace(namespace: &str) -> String {
    format!("{namespace}:recs:")
}

pub fn category_segment(category: Option<Category>) -> &'static str {
    category.map(Category::as_str).unwrap_or(ANY_SEGMENT)
}

pub fn platform_segment<'a, I>(platforms: I) -> String
where
    I: IntoIterator<Item = &'a Platform>,
{
    let joined = platforms
        .into_iter()
        .map(|platform| platform.as_str())
        .collect::<Vec<_>>()
        .join(&PLATFORM_JOIN.to_string());
    if joined.is_empty() {
        ANY_SEGMENT.to_string()
    } else {
        joined
    }
}

/// Deterministic key for a normalized listing query.
pub fn list_key(namespace: &str, query: &CampaignQuery) -> Result<String, CacheError> {
    let canonical = serde_json::to_vec(query)?;
    let digest = Sha256::digest(&canonical);

    Ok(format!(
        "{}{}:{}:{}",
        list_namespace(namespace),
        category_segment(query.filter.category),
        platform_segment(&query.filter.platforms),
        hex::encode(&digest[..DIGEST_BYTES])
    ))
}

pub fn recommendation_key(namespace: &str, actor_id: Uuid) -> String {
    format!("{}{actor_id}", recommendation_namespace(namespace))
}

/// Prefixes covering every listing whose category segment is `category` and
/// whose platform requirements could be met by a campaign on `platforms`.
///
/// A listing requiring platforms P can only contain a campaign targeting Q
/// when P is a subset of Q, so the first platform of P is in Q.
pub fn list_prefixes_for<'a, I>(namespace: &str, category: &str, platforms: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Platform>,
{
    let base = format!("{}{category}:", list_namespace(namespace));
    let mut prefixes = vec![format!("{base}{ANY_SEGMENT}:")];
    for platform in platforms {
        prefixes.push(format!("{base}{}:", platform.as_str()));
        prefixes.push(format!("{base}{}{PLATFORM_JOIN}", platform.as_str()));
    }
    prefixes
}
