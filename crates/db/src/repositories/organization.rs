//! Organization repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orgdesk_core::organization::{
    ContactInfo, CountryCode, OrganizationClassification, OrganizationProfile,
};
use orgdesk_core::store::{OrganizationDirectory, StoreError, StoreResult};
use orgdesk_shared::types::OrganizationId;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;

use super::{corrupt, store_error, to_utc};
use crate::entities::organizations;

/// Organization repository backed by the `organizations` table.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active_model(profile: &OrganizationProfile) -> organizations::ActiveModel {
    let classification = &profile.classification;
    let contact = &profile.contact;
    organizations::ActiveModel {
        id: Set(profile.id.into_inner()),
        name: Set(profile.name.clone()),
        country: Set(classification.country.as_str().to_string()),
        organization_type: Set(classification.organization_type.clone()),
        entity_type: Set(classification.entity_type.clone()),
        entity_kind: Set(classification.entity_kind.into()),
        industry_segment: Set(classification.industry_segment.clone()),
        contact_name: Set(contact.contact_name.clone()),
        contact_email: Set(contact.email.clone()),
        contact_phone: Set(contact.phone.clone()),
        contact_address: Set(contact.address.clone()),
        approval_status: Set(profile.approval_status.into()),
        membership_status: Set(profile.membership_status.into()),
        pricing_tier: Set(profile.pricing_tier.clone()),
        engagement_model: Set(profile.engagement_model.map(Into::into)),
        workflow_step: Set(profile.workflow_step.into()),
        is_completed: Set(profile.is_completed),
        is_active: Set(profile.is_active),
        created_at: Set(profile.created_at.into()),
        updated_at: Set(profile.updated_at.into()),
    }
}

fn into_profile(model: organizations::Model) -> StoreResult<OrganizationProfile> {
    let country = CountryCode::parse(&model.country).map_err(|e| corrupt("organizations", e))?;
    Ok(OrganizationProfile {
        id: OrganizationId::from_uuid(model.id),
        name: model.name,
        classification: OrganizationClassification {
            country,
            organization_type: model.organization_type,
            entity_type: model.entity_type,
            entity_kind: model.entity_kind.into(),
            industry_segment: model.industry_segment,
        },
        contact: ContactInfo {
            contact_name: model.contact_name,
            email: model.contact_email,
            phone: model.contact_phone,
            address: model.contact_address,
        },
        approval_status: model.approval_status.into(),
        membership_status: model.membership_status.into(),
        pricing_tier: model.pricing_tier,
        engagement_model: model.engagement_model.map(Into::into),
        workflow_step: model.workflow_step.into(),
        is_completed: model.is_completed,
        is_active: model.is_active,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    })
}

impl OrganizationRepository {
    async fn update_where_exists(
        &self,
        id: OrganizationId,
        active: organizations::ActiveModel,
    ) -> StoreResult<()> {
        let result = organizations::Entity::update_many()
            .set(active)
            .filter(organizations::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(format!("organization {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl OrganizationDirectory for OrganizationRepository {
    async fn insert_organization(&self, profile: &OrganizationProfile) -> StoreResult<()> {
        organizations::Entity::insert(to_active_model(profile))
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn find_organization(
        &self,
        id: OrganizationId,
    ) -> StoreResult<Option<OrganizationProfile>> {
        organizations::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(into_profile)
            .transpose()
    }

    async fn update_engagement(&self, profile: &OrganizationProfile) -> StoreResult<bool> {
        let active = organizations::ActiveModel {
            engagement_model: Set(profile.engagement_model.map(Into::into)),
            membership_status: Set(profile.membership_status.into()),
            pricing_tier: Set(profile.pricing_tier.clone()),
            workflow_step: Set(profile.workflow_step.into()),
            approval_status: Set(profile.approval_status.into()),
            is_completed: Set(profile.is_completed),
            updated_at: Set(profile.updated_at.into()),
            ..Default::default()
        };
        let result = organizations::Entity::update_many()
            .set(active)
            .filter(organizations::Column::Id.eq(profile.id.into_inner()))
            .filter(organizations::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected > 0)
    }

    async fn deactivate_organization(
        &self,
        id: OrganizationId,
        at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let active = organizations::ActiveModel {
            is_active: Set(false),
            updated_at: Set(at.into()),
            ..Default::default()
        };
        let result = organizations::Entity::update_many()
            .set(active)
            .filter(organizations::Column::Id.eq(id.into_inner()))
            .filter(organizations::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        if result.rows_affected > 0 {
            info!(organization_id = %id, "Organization deactivated");
            return Ok(true);
        }

        // Nothing matched: either already inactive or never registered.
        match self.find_organization(id).await? {
            Some(_) => Ok(false),
            None => Err(StoreError::NotFound(format!("organization {id}"))),
        }
    }

    async fn update_progress(&self, profile: &OrganizationProfile) -> StoreResult<()> {
        let active = organizations::ActiveModel {
            workflow_step: Set(profile.workflow_step.into()),
            approval_status: Set(profile.approval_status.into()),
            is_completed: Set(profile.is_completed),
            updated_at: Set(profile.updated_at.into()),
            ..Default::default()
        };
        self.update_where_exists(profile.id, active).await
    }
}
