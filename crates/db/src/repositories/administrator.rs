//! Administrator credential repository.

use async_trait::async_trait;
use orgdesk_core::provisioning::AdministratorCredential;
use orgdesk_core::store::{AdministratorStore, StoreError, StoreResult};
use orgdesk_core::validation::{ValidationEvent, ValidationStatus};
use orgdesk_shared::types::{CredentialId, OrganizationId};
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::info;

use super::validation::{insert_events, swap_status};
use super::{store_error, to_utc};
use crate::entities::administrators;

/// Administrator repository backed by the `administrators` table.
///
/// A partial unique index allows one active credential per organization.
#[derive(Debug, Clone)]
pub struct AdministratorRepository {
    db: DatabaseConnection,
}

impl AdministratorRepository {
    /// Creates a new administrator repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active_model(credential: &AdministratorCredential) -> administrators::ActiveModel {
    administrators::ActiveModel {
        id: Set(credential.id.into_inner()),
        organization_id: Set(credential.organization_id.into_inner()),
        name: Set(credential.name.clone()),
        email: Set(credential.email.clone()),
        contact: Set(credential.contact.clone()),
        secret_hash: Set(credential.secret_hash.clone()),
        is_active: Set(credential.is_active),
        created_at: Set(credential.created_at.into()),
        updated_at: Set(credential.updated_at.into()),
    }
}

fn into_credential(model: administrators::Model) -> AdministratorCredential {
    AdministratorCredential {
        id: CredentialId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        name: model.name,
        email: model.email,
        contact: model.contact,
        secret_hash: model.secret_hash,
        is_active: model.is_active,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    }
}

#[async_trait]
impl AdministratorStore for AdministratorRepository {
    async fn find_active_administrator(
        &self,
        organization_id: OrganizationId,
    ) -> StoreResult<Option<AdministratorCredential>> {
        Ok(administrators::Entity::find()
            .filter(administrators::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(administrators::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(into_credential))
    }

    async fn find_administrator(
        &self,
        id: CredentialId,
    ) -> StoreResult<Option<AdministratorCredential>> {
        Ok(administrators::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(into_credential))
    }

    async fn provision_administrator(
        &self,
        credential: &AdministratorCredential,
        status: &ValidationStatus,
        expected_version: i64,
        events: &[ValidationEvent],
    ) -> StoreResult<()> {
        let txn = self.db.begin().await.map_err(store_error)?;

        administrators::Entity::insert(to_active_model(credential))
            .exec(&txn)
            .await
            .map_err(store_error)?;
        swap_status(&txn, status, expected_version).await?;
        insert_events(&txn, events).await?;
        txn.commit().await.map_err(store_error)?;

        info!(
            organization_id = %credential.organization_id,
            credential_id = %credential.id,
            "Administrator provisioned"
        );
        Ok(())
    }

    async fn update_administrator(&self, credential: &AdministratorCredential) -> StoreResult<()> {
        let mut active = to_active_model(credential);
        active.id = NotSet;
        active.organization_id = NotSet;
        active.created_at = NotSet;

        let result = administrators::Entity::update_many()
            .set(active)
            .filter(administrators::Column::Id.eq(credential.id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(format!("administrator {}", credential.id)));
        }
        Ok(())
    }
}
