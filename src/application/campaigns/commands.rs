use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::repos::CampaignChanges;
use crate::cache::InvalidationScope;
use crate::domain::entities::CampaignRecord;
use crate::domain::lifecycle::request_transition;
use crate::domain::types::CampaignStatus;
use crate::domain::validation::{
    normalize_platforms, normalize_tags, validate_campaign, validate_publish_ready,
};

use super::service::{CampaignService, next_updated_at};
use super::types::{CampaignError, CampaignPatch, NewCampaign};

impl CampaignService {
    /// Persist a new draft owned by `owner_id`.
    #[instrument(skip(self, command), fields(owner_id = %owner_id))]
    pub async fn create_campaign(
        &self,
        owner_id: Uuid,
        command: NewCampaign,
    ) -> Result<CampaignRecord, CampaignError> {
        let now = OffsetDateTime::now_utc();
        let record = CampaignRecord {
            id: Uuid::new_v4(),
            brand_id: owner_id,
            title: command.title,
            description: command.description,
            category: command.category,
            platforms: normalize_platforms(command.platforms),
            budget: command.budget,
            age_range: command.age_range,
            interests: normalize_tags(command.interests),
            regions: normalize_tags(command.regions),
            schedule: command.schedule,
            deadline: command.deadline,
            status: CampaignStatus::Draft,
            created_at: now,
            updated_at: now,
        };

        validate_campaign(&record).map_err(CampaignError::Validation)?;

        let stored = self
            .store_call("insert_campaign", self.writer.insert_campaign(&record))
            .await?;

        info!(campaign_id = %stored.id, "Campaign created");
        Ok(stored)
    }

    /// Apply a field patch. Only the owning brand may update.
    #[instrument(skip(self, patch), fields(campaign_id = %id, actor_id = %actor_id))]
    pub async fn update_campaign(
        &self,
        id: Uuid,
        actor_id: Uuid,
        patch: CampaignPatch,
    ) -> Result<CampaignRecord, CampaignError> {
        let before = self.load_owned(id, actor_id).await?;

        let changes = patch.into_changes(next_updated_at(before.updated_at));
        let mut merged = before.clone();
        changes.apply_to(&mut merged);
        validate_campaign(&merged).map_err(CampaignError::Validation)?;

        let stored = self
            .store_call("update_campaign", self.writer.update_campaign(id, &changes))
            .await?;

        self.cache
            .invalidate(&InvalidationScope::for_change(&before, &stored))
            .await;

        info!("Campaign updated");
        Ok(stored)
    }

    /// Move a campaign along one lifecycle edge.
    #[instrument(
        skip(self),
        fields(campaign_id = %id, actor_id = %actor_id, target = %target)
    )]
    pub async fn transition_campaign_status(
        &self,
        id: Uuid,
        actor_id: Uuid,
        target: CampaignStatus,
    ) -> Result<CampaignRecord, CampaignError> {
        let before = self.load_owned(id, actor_id).await?;
        let next = request_transition(before.status, target)?;

        let changes = CampaignChanges {
            status: Some(next),
            ..CampaignChanges::touch(next_updated_at(before.updated_at))
        };
        let mut merged = before.clone();
        changes.apply_to(&mut merged);
        if next == CampaignStatus::Published {
            validate_publish_ready(&merged).map_err(CampaignError::Validation)?;
        }

        let stored = self
            .store_call("update_campaign", self.writer.update_campaign(id, &changes))
            .await?;

        self.cache
            .invalidate(&InvalidationScope::for_change(&before, &stored))
            .await;

        info!(from = %before.status, to = %stored.status, "Campaign status changed");
        Ok(stored)
    }

    /// Remove a campaign that has not gone live yet.
    #[instrument(skip(self), fields(campaign_id = %id, actor_id = %actor_id))]
    pub async fn delete_campaign(&self, id: Uuid, actor_id: Uuid) -> Result<(), CampaignError> {
        let existing = self.load_owned(id, actor_id).await?;
        if !existing.status.is_deletable() {
            return Err(CampaignError::Conflict {
                status: existing.status,
            });
        }

        self.store_call("delete_campaign", self.writer.delete_campaign(id))
            .await?;

        self.cache
            .invalidate(&InvalidationScope::for_campaign(&existing))
            .await;

        info!("Campaign deleted");
        Ok(())
    }
}
