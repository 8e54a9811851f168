//! Query cache for campaign listings and recommendations.
//!
//! Results are stored as JSON under deterministic keys derived from the
//! normalized query. Writes to campaigns invalidate by key prefix; see
//! [`invalidation`] for how the affected prefixes are chosen.

pub mod config;
pub mod invalidation;
pub mod keys;
mod lock;
pub mod query;
pub mod redis_store;
pub mod store;

pub use config::CacheConfig;
pub use invalidation::InvalidationScope;
pub use query::{CacheKind, QueryCache};
pub use redis_store::RedisCacheStore;
pub use store::{CacheError, CacheStore, MemoryCacheStore};
