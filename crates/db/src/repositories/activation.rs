//! Engagement activation repository.

use async_trait::async_trait;
use orgdesk_core::activation::EngagementActivation;
use orgdesk_core::store::{ActivationLog, StoreError, StoreResult};
use orgdesk_shared::types::{ActivationId, OrganizationId, PageRequest, PricingConfigId, UserId};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::debug;

use super::{parse_currency, store_error, to_utc, unit_columns, unit_from_columns};
use crate::entities::engagement_activations;

/// Activation repository backed by the `engagement_activations` table.
#[derive(Debug, Clone)]
pub struct ActivationRepository {
    db: DatabaseConnection,
}

impl ActivationRepository {
    /// Creates a new activation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_activation(model: engagement_activations::Model) -> StoreResult<EngagementActivation> {
    let currency = parse_currency("engagement_activations", &model.currency)?;
    Ok(EngagementActivation {
        id: ActivationId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        engagement_model: model.engagement_model.into(),
        membership_status: model.membership_status.into(),
        billing_frequency: model.billing_frequency.map(Into::into),
        original_price: unit_from_columns(model.unit_kind, model.original_value, &currency),
        discount_percentage: model.discount_percentage.map(|d| d.normalize()),
        final_price: unit_from_columns(model.unit_kind, model.final_value, &currency),
        currency,
        pricing_config_id: PricingConfigId::from_uuid(model.pricing_config_id),
        terms_accepted: model.terms_accepted,
        activated_by: UserId::from_uuid(model.activated_by),
        idempotency_key: model.idempotency_key,
        created_at: to_utc(model.created_at),
    })
}

fn to_active_model(activation: &EngagementActivation) -> engagement_activations::ActiveModel {
    let (unit_kind, original_value) = unit_columns(&activation.original_price);
    engagement_activations::ActiveModel {
        id: Set(activation.id.into_inner()),
        organization_id: Set(activation.organization_id.into_inner()),
        engagement_model: Set(activation.engagement_model.into()),
        membership_status: Set(activation.membership_status.into()),
        billing_frequency: Set(activation.billing_frequency.map(Into::into)),
        unit_kind: Set(unit_kind),
        original_value: Set(original_value),
        discount_percentage: Set(activation.discount_percentage),
        final_value: Set(activation.final_price.value()),
        currency: Set(activation.currency.as_str().to_string()),
        pricing_config_id: Set(activation.pricing_config_id.into_inner()),
        terms_accepted: Set(activation.terms_accepted),
        activated_by: Set(activation.activated_by.into_inner()),
        idempotency_key: Set(activation.idempotency_key.clone()),
        created_at: Set(activation.created_at.into()),
    }
}

#[async_trait]
impl ActivationLog for ActivationRepository {
    async fn append_activation(
        &self,
        activation: &EngagementActivation,
    ) -> StoreResult<EngagementActivation> {
        if let Some(key) = &activation.idempotency_key
            && let Some(existing) = self
                .find_activation_by_key(activation.organization_id, key)
                .await?
        {
            return Ok(existing);
        }

        match engagement_activations::Entity::insert(to_active_model(activation))
            .exec(&self.db)
            .await
            .map_err(store_error)
        {
            Ok(_) => Ok(activation.clone()),
            // A concurrent request with the same key won the insert.
            Err(StoreError::Duplicate(detail)) => {
                let Some(key) = &activation.idempotency_key else {
                    return Err(StoreError::Duplicate(detail));
                };
                debug!(
                    organization_id = %activation.organization_id,
                    idempotency_key = %key,
                    "Activation insert lost to a concurrent replay"
                );
                self.find_activation_by_key(activation.organization_id, key)
                    .await?
                    .ok_or(StoreError::Duplicate(detail))
            }
            Err(err) => Err(err),
        }
    }

    async fn find_activation(
        &self,
        organization_id: OrganizationId,
        id: ActivationId,
    ) -> StoreResult<Option<EngagementActivation>> {
        engagement_activations::Entity::find_by_id(id.into_inner())
            .filter(engagement_activations::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(into_activation)
            .transpose()
    }

    async fn find_activation_by_key(
        &self,
        organization_id: OrganizationId,
        key: &str,
    ) -> StoreResult<Option<EngagementActivation>> {
        engagement_activations::Entity::find()
            .filter(engagement_activations::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(engagement_activations::Column::IdempotencyKey.eq(key))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(into_activation)
            .transpose()
    }

    async fn has_activation(&self, organization_id: OrganizationId) -> StoreResult<bool> {
        let first = engagement_activations::Entity::find()
            .filter(engagement_activations::Column::OrganizationId.eq(organization_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_error)?;
        Ok(first.is_some())
    }

    async fn list_activations(
        &self,
        organization_id: OrganizationId,
        page: &PageRequest,
    ) -> StoreResult<(Vec<EngagementActivation>, u64)> {
        let total = engagement_activations::Entity::find()
            .filter(engagement_activations::Column::OrganizationId.eq(organization_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(store_error)?;

        let activations = engagement_activations::Entity::find()
            .filter(engagement_activations::Column::OrganizationId.eq(organization_id.into_inner()))
            .order_by_asc(engagement_activations::Column::CreatedAt)
            .order_by_asc(engagement_activations::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(into_activation)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok((activations, total))
    }
}
