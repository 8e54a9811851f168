//! Postgres-backed repository implementations.

mod campaigns;
mod profiles;
mod rows;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;
use std::time::Duration;

use sqlx::{
    Postgres, QueryBuilder,
    postgres::{PgPool, PgPoolOptions},
    query,
};

use crate::application::repos::CampaignQueryFilter;

use self::rows::platform_names;
use self::util::escape_like;

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    /// Append ` AND ...` clauses for every predicate set in `filter`.
    fn apply_campaign_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &CampaignQueryFilter) {
        if let Some(status) = filter.status {
            qb.push(" AND c.status = ");
            qb.push_bind(status.as_str());
        }

        if let Some(category) = filter.category {
            qb.push(" AND c.category = ");
            qb.push_bind(category.as_str());
        }

        if !filter.platforms.is_empty() {
            let platforms: Vec<_> = filter.platforms.iter().copied().collect();
            qb.push(" AND c.platforms @> ");
            qb.push_bind(platform_names(&platforms));
            qb.push("::text[]");
        }

        if let Some(min) = filter.budget_min {
            qb.push(" AND c.budget >= ");
            qb.push_bind(min);
        }

        if let Some(max) = filter.budget_max {
            qb.push(" AND c.budget <= ");
            qb.push_bind(max);
        }

        if !filter.interests.is_empty() {
            qb.push(" AND c.interests && ");
            qb.push_bind(filter.interests.iter().cloned().collect::<Vec<String>>());
            qb.push("::text[]");
        }

        if !filter.regions.is_empty() {
            qb.push(" AND c.regions && ");
            qb.push_bind(filter.regions.iter().cloned().collect::<Vec<String>>());
            qb.push("::text[]");
        }

        if let Some(search) = filter.search.as_ref() {
            let pattern = format!("%{}%", escape_like(search));
            qb.push(" AND (c.title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR c.description ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
    }
}
