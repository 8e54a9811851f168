use async_trait::async_trait;
use sqlx::QueryBuilder;
use tracing::instrument;
use uuid::Uuid;

use crate::application::pagination::PageWindow;
use crate::application::repos::{
    CampaignChanges, CampaignQueryFilter, CampaignSort, CampaignsRepo, CampaignsWriteRepo,
    RepoError,
};
use crate::domain::entities::CampaignRecord;

use super::PostgresRepositories;
use super::rows::{CAMPAIGN_COLUMNS, CampaignRow, platform_names};
use super::util::{convert_count, map_sqlx_error};

#[async_trait]
impl CampaignsRepo for PostgresRepositories {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<CampaignRecord>, RepoError> {
        let sql = format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = $1");
        let row = sqlx::query_as::<_, CampaignRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.map(CampaignRecord::try_from).transpose()
    }

    #[instrument(skip(self, filter))]
    async fn query_campaigns(
        &self,
        filter: &CampaignQueryFilter,
        sort: CampaignSort,
        window: PageWindow,
    ) -> Result<(Vec<CampaignRecord>, u64), RepoError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM campaigns c WHERE 1=1");
        Self::apply_campaign_filter(&mut count_qb, filter);
        let total = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let mut qb = QueryBuilder::new(format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns c WHERE 1=1"
        ));
        Self::apply_campaign_filter(&mut qb, filter);

        let direction = sort.direction.keyword();
        qb.push(format!(
            " ORDER BY c.{} {direction}, c.id {direction}",
            sort.field.column()
        ));
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(window.limit));
        qb.push(" OFFSET ");
        qb.push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));

        let rows = qb
            .build_query_as::<CampaignRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let records = rows
            .into_iter()
            .map(CampaignRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((records, convert_count(total)?))
    }
}

#[async_trait]
impl CampaignsWriteRepo for PostgresRepositories {
    #[instrument(skip(self, record), fields(campaign_id = %record.id))]
    async fn insert_campaign(&self, record: &CampaignRecord) -> Result<CampaignRecord, RepoError> {
        let sql = format!(
            "INSERT INTO campaigns ({CAMPAIGN_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING {CAMPAIGN_COLUMNS}"
        );

        let row = sqlx::query_as::<_, CampaignRow>(&sql)
            .bind(record.id)
            .bind(record.brand_id)
            .bind(&record.title)
            .bind(&record.description)
            .bind(record.category.as_str())
            .bind(platform_names(&record.platforms))
            .bind(record.budget)
            .bind(i16::from(record.age_range.min))
            .bind(i16::from(record.age_range.max))
            .bind(&record.interests)
            .bind(&record.regions)
            .bind(record.schedule.start)
            .bind(record.schedule.end)
            .bind(record.deadline)
            .bind(record.status.as_str())
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        CampaignRecord::try_from(row)
    }

    #[instrument(skip(self, changes))]
    async fn update_campaign(
        &self,
        id: Uuid,
        changes: &CampaignChanges,
    ) -> Result<CampaignRecord, RepoError> {
        let mut qb = QueryBuilder::new("UPDATE campaigns SET updated_at = ");
        qb.push_bind(changes.updated_at);

        if let Some(title) = &changes.title {
            qb.push(", title = ");
            qb.push_bind(title.clone());
        }
        if let Some(description) = &changes.description {
            qb.push(", description = ");
            qb.push_bind(description.clone());
        }
        if let Some(category) = changes.category {
            qb.push(", category = ");
            qb.push_bind(category.as_str());
        }
        if let Some(platforms) = &changes.platforms {
            qb.push(", platforms = ");
            qb.push_bind(platform_names(platforms));
        }
        if let Some(budget) = changes.budget {
            qb.push(", budget = ");
            qb.push_bind(budget);
        }
        if let Some(age_range) = changes.age_range {
            qb.push(", age_min = ");
            qb.push_bind(i16::from(age_range.min));
            qb.push(", age_max = ");
            qb.push_bind(i16::from(age_range.max));
        }
        if let Some(interests) = &changes.interests {
            qb.push(", interests = ");
            qb.push_bind(interests.clone());
        }
        if let Some(regions) = &changes.regions {
            qb.push(", regions = ");
            qb.push_bind(regions.clone());
        }
        if let Some(schedule) = changes.schedule {
            qb.push(", schedule_start = ");
            qb.push_bind(schedule.start);
            qb.push(", schedule_end = ");
            qb.push_bind(schedule.end);
        }
        if let Some(deadline) = changes.deadline {
            qb.push(", deadline = ");
            qb.push_bind(deadline);
        }
        if let Some(status) = changes.status {
            qb.push(", status = ");
            qb.push_bind(status.as_str());
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(format!(" RETURNING {CAMPAIGN_COLUMNS}"));

        let row = qb
            .build_query_as::<CampaignRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        CampaignRecord::try_from(row)
    }

    #[instrument(skip(self))]
    async fn delete_campaign(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
