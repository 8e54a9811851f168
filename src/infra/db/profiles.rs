use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use crate::application::repos::{BrandsRepo, ProfilesRepo, RepoError};
use crate::domain::entities::BrandRecord;

use super::PostgresRepositories;
use super::rows::BrandRow;
use super::util::map_sqlx_error;

#[async_trait]
impl BrandsRepo for PostgresRepositories {
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_brands(&self, ids: &[Uuid]) -> Result<Vec<BrandRecord>, RepoError> {
        let rows = sqlx::query_as::<_, BrandRow>(
            "SELECT id, display_name, logo_url FROM brands WHERE id = ANY($1)",
        )
        .bind(ids.to_vec())
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BrandRecord::from).collect())
    }
}

#[async_trait]
impl ProfilesRepo for PostgresRepositories {
    #[instrument(skip(self))]
    async fn find_interests(&self, actor_id: Uuid) -> Result<Option<Vec<String>>, RepoError> {
        sqlx::query_scalar::<_, Vec<String>>(
            "SELECT interests FROM creator_profiles WHERE actor_id = $1",
        )
        .bind(actor_id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)
    }
}
