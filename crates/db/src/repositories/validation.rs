//! Payment and validation repository.
//!
//! Status rows carry a version. Every write names the version it replaces
//! and runs in one transaction with the payment or events written alongside
//! it, so a lost race leaves nothing behind.

use async_trait::async_trait;
use orgdesk_core::payment::PaymentRecord;
use orgdesk_core::store::{StoreError, StoreResult, ValidationStore};
use orgdesk_core::validation::{StageRecord, StageStatus, ValidationEvent, ValidationStatus};
use orgdesk_shared::types::{
    Money, OrganizationId, PageRequest, PaymentId, UserId, ValidationEventId,
};
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::{corrupt, parse_currency, store_error, to_utc};
use crate::entities::{payments, validation_events, validation_statuses};

/// Validation repository backed by `payments`, `validation_statuses` and
/// `validation_events`.
#[derive(Debug, Clone)]
pub struct ValidationRepository {
    db: DatabaseConnection,
}

impl ValidationRepository {
    /// Creates a new validation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn status_columns(status: &ValidationStatus) -> validation_statuses::ActiveModel {
    validation_statuses::ActiveModel {
        organization_id: Set(status.organization_id.into_inner()),
        payment_status: Set(status.payment.status.into()),
        payment_reason: Set(status.payment.reason.clone()),
        payment_actor: Set(status.payment.actor.map(UserId::into_inner)),
        payment_updated_at: Set(status.payment.updated_at.into()),
        document_status: Set(status.document.status.into()),
        document_reason: Set(status.document.reason.clone()),
        document_actor: Set(status.document.actor.map(UserId::into_inner)),
        document_updated_at: Set(status.document.updated_at.into()),
        authorization_status: Set(status.authorization.status.into()),
        authorization_reason: Set(status.authorization.reason.clone()),
        authorization_actor: Set(status.authorization.actor.map(UserId::into_inner)),
        authorization_updated_at: Set(status.authorization.updated_at.into()),
        version: Set(status.version),
        created_at: Set(status.created_at.into()),
        updated_at: Set(status.updated_at.into()),
    }
}

fn into_status(model: validation_statuses::Model) -> ValidationStatus {
    ValidationStatus {
        organization_id: OrganizationId::from_uuid(model.organization_id),
        payment: StageRecord::new(
            model.payment_status.into(),
            model.payment_reason,
            model.payment_actor.map(UserId::from_uuid),
            to_utc(model.payment_updated_at),
        ),
        document: StageRecord::new(
            model.document_status.into(),
            model.document_reason,
            model.document_actor.map(UserId::from_uuid),
            to_utc(model.document_updated_at),
        ),
        authorization: StageRecord::new(
            model.authorization_status.into(),
            model.authorization_reason,
            model.authorization_actor.map(UserId::from_uuid),
            to_utc(model.authorization_updated_at),
        ),
        version: model.version,
        created_at: to_utc(model.created_at),
        updated_at: to_utc(model.updated_at),
    }
}

fn into_event(model: validation_events::Model) -> StoreResult<ValidationEvent> {
    let stage = model.stage.into();
    let parse = |name: &str| {
        StageStatus::parse(stage, name)
            .ok_or_else(|| corrupt("validation_events", format!("unknown {stage} status {name}")))
    };
    Ok(ValidationEvent {
        id: ValidationEventId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        stage,
        from_status: model.from_status.as_deref().map(parse).transpose()?,
        to_status: parse(&model.to_status)?,
        reason: model.reason,
        actor: model.actor.map(UserId::from_uuid),
        version: model.version,
        occurred_at: to_utc(model.occurred_at),
    })
}

fn into_payment(model: payments::Model) -> StoreResult<PaymentRecord> {
    Ok(PaymentRecord {
        id: PaymentId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        amount: Money::new(
            model.amount.normalize(),
            parse_currency("payments", &model.currency)?,
        ),
        method: model.method.into(),
        receipt_number: model.receipt_number,
        submitted_by: UserId::from_uuid(model.submitted_by),
        submitted_at: to_utc(model.submitted_at),
    })
}

/// Inserts the first status row of an organization.
///
/// An existing row means another writer opened the status first.
pub(crate) async fn insert_status<C: ConnectionTrait>(
    conn: &C,
    status: &ValidationStatus,
) -> StoreResult<()> {
    match validation_statuses::Entity::insert(status_columns(status))
        .exec(conn)
        .await
        .map_err(store_error)
    {
        Ok(_) => Ok(()),
        Err(StoreError::Duplicate(_)) => Err(StoreError::Conflict(format!(
            "validation status of {} already exists",
            status.organization_id
        ))),
        Err(err) => Err(err),
    }
}

/// Replaces the status row if it is still at `expected_version`.
pub(crate) async fn swap_status<C: ConnectionTrait>(
    conn: &C,
    status: &ValidationStatus,
    expected_version: i64,
) -> StoreResult<()> {
    let mut active = status_columns(status);
    active.organization_id = NotSet;
    active.created_at = NotSet;

    let result = validation_statuses::Entity::update_many()
        .set(active)
        .filter(validation_statuses::Column::OrganizationId.eq(status.organization_id.into_inner()))
        .filter(validation_statuses::Column::Version.eq(expected_version))
        .exec(conn)
        .await
        .map_err(store_error)?;

    if result.rows_affected == 0 {
        debug!(
            organization_id = %status.organization_id,
            expected_version,
            "Validation status swap lost"
        );
        return Err(StoreError::Conflict(format!(
            "validation status of {} is no longer at version {expected_version}",
            status.organization_id
        )));
    }
    Ok(())
}

/// Appends audit events.
pub(crate) async fn insert_events<C: ConnectionTrait>(
    conn: &C,
    events: &[ValidationEvent],
) -> StoreResult<()> {
    if events.is_empty() {
        return Ok(());
    }
    let models = events.iter().map(|event| validation_events::ActiveModel {
        id: Set(event.id.into_inner()),
        seq: NotSet,
        organization_id: Set(event.organization_id.into_inner()),
        stage: Set(event.stage.into()),
        from_status: Set(event.from_status.map(|s| s.as_str().to_string())),
        to_status: Set(event.to_status.as_str().to_string()),
        reason: Set(event.reason.clone()),
        actor: Set(event.actor.map(UserId::into_inner)),
        version: Set(event.version),
        occurred_at: Set(event.occurred_at.into()),
    });
    validation_events::Entity::insert_many(models)
        .exec(conn)
        .await
        .map_err(store_error)?;
    Ok(())
}

#[async_trait]
impl ValidationStore for ValidationRepository {
    async fn find_validation_status(
        &self,
        organization_id: OrganizationId,
    ) -> StoreResult<Option<ValidationStatus>> {
        Ok(
            validation_statuses::Entity::find_by_id(organization_id.into_inner())
                .one(&self.db)
                .await
                .map_err(store_error)?
                .map(into_status),
        )
    }

    async fn record_payment(
        &self,
        payment: &PaymentRecord,
        status: &ValidationStatus,
        expected_version: Option<i64>,
        events: &[ValidationEvent],
    ) -> StoreResult<()> {
        let txn = self.db.begin().await.map_err(store_error)?;

        let model = payments::ActiveModel {
            id: Set(payment.id.into_inner()),
            organization_id: Set(payment.organization_id.into_inner()),
            amount: Set(payment.amount.amount),
            currency: Set(payment.amount.currency.as_str().to_string()),
            method: Set(payment.method.into()),
            receipt_number: Set(payment.receipt_number.clone()),
            submitted_by: Set(payment.submitted_by.into_inner()),
            submitted_at: Set(payment.submitted_at.into()),
        };
        payments::Entity::insert(model)
            .exec(&txn)
            .await
            .map_err(store_error)?;

        match expected_version {
            None => insert_status(&txn, status).await?,
            Some(expected) => swap_status(&txn, status, expected).await?,
        }
        insert_events(&txn, events).await?;
        txn.commit().await.map_err(store_error)?;

        info!(
            organization_id = %payment.organization_id,
            payment_id = %payment.id,
            version = status.version,
            "Payment recorded"
        );
        Ok(())
    }

    async fn find_payment_by_receipt(
        &self,
        organization_id: OrganizationId,
        receipt_number: &str,
    ) -> StoreResult<Option<PaymentRecord>> {
        payments::Entity::find()
            .filter(payments::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(payments::Column::ReceiptNumber.eq(receipt_number))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(into_payment)
            .transpose()
    }

    async fn list_payments(
        &self,
        organization_id: OrganizationId,
    ) -> StoreResult<Vec<PaymentRecord>> {
        payments::Entity::find()
            .filter(payments::Column::OrganizationId.eq(organization_id.into_inner()))
            .order_by_asc(payments::Column::SubmittedAt)
            .order_by_asc(payments::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(into_payment)
            .collect()
    }

    async fn compare_and_swap(
        &self,
        status: &ValidationStatus,
        expected_version: i64,
        events: &[ValidationEvent],
    ) -> StoreResult<()> {
        let txn = self.db.begin().await.map_err(store_error)?;
        swap_status(&txn, status, expected_version).await?;
        insert_events(&txn, events).await?;
        txn.commit().await.map_err(store_error)?;

        info!(
            organization_id = %status.organization_id,
            version = status.version,
            "Validation status updated"
        );
        Ok(())
    }

    async fn list_validation_events(
        &self,
        organization_id: OrganizationId,
        page: &PageRequest,
    ) -> StoreResult<(Vec<ValidationEvent>, u64)> {
        let total = validation_events::Entity::find()
            .filter(
                validation_events::Column::OrganizationId.eq(organization_id.into_inner()),
            )
            .count(&self.db)
            .await
            .map_err(store_error)?;

        let events = validation_events::Entity::find()
            .filter(
                validation_events::Column::OrganizationId.eq(organization_id.into_inner()),
            )
            .order_by_asc(validation_events::Column::Seq)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(into_event)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok((events, total))
    }
}
