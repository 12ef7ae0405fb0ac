//! Pricing catalog repository.
//!
//! Records are append-only, so the number of stored records doubles as the
//! catalog version. Writers take a transaction-scoped advisory lock and
//! recount before inserting, so an insert only lands against the version its
//! overlap check saw.

use async_trait::async_trait;
use orgdesk_core::pricing::{
    CountryScope, FrequencyFees, MembershipFeeRecord, MembershipFees, PricingCatalog,
    PricingConfigRecord, PricingScope,
};
use orgdesk_core::store::{PricingCatalogStore, StoreError, StoreResult};
use orgdesk_shared::types::{MembershipFeeId, PricingConfigId};
use rust_decimal::Decimal;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::{corrupt, parse_currency, store_error, to_utc, unit_columns, unit_from_columns};
use crate::entities::{membership_fees, pricing_configs};

/// Pricing repository backed by `pricing_configs` and `membership_fees`.
#[derive(Debug, Clone)]
pub struct PricingRepository {
    db: DatabaseConnection,
}

impl PricingRepository {
    /// Creates a new pricing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Advisory lock key shared by every catalog writer.
const CATALOG_WRITE_LOCK: i64 = 0x4f44_5052_4943_4531;

/// Opens a transaction holding the catalog write lock and checks that the
/// catalog is still at `expected_version`.
async fn lock_catalog_at(
    db: &DatabaseConnection,
    expected_version: u64,
) -> StoreResult<DatabaseTransaction> {
    let txn = db.begin().await.map_err(store_error)?;
    txn.execute_unprepared(&format!("SELECT pg_advisory_xact_lock({CATALOG_WRITE_LOCK})"))
        .await
        .map_err(store_error)?;

    let configs = pricing_configs::Entity::find()
        .count(&txn)
        .await
        .map_err(store_error)?;
    let fees = membership_fees::Entity::find()
        .count(&txn)
        .await
        .map_err(store_error)?;
    let version = configs + fees;
    if version != expected_version {
        debug!(version, expected_version, "Catalog changed since it was checked");
        return Err(StoreError::Conflict(format!(
            "pricing catalog is at version {version}, expected {expected_version}"
        )));
    }
    Ok(txn)
}

fn normalized(value: Option<Decimal>) -> Option<Decimal> {
    value.map(|v| v.normalize())
}

fn into_config(model: pricing_configs::Model) -> StoreResult<PricingConfigRecord> {
    let country =
        CountryScope::parse(&model.country).map_err(|e| corrupt("pricing_configs", e))?;
    let currency = parse_currency("pricing_configs", &model.currency)?;
    Ok(PricingConfigRecord {
        id: PricingConfigId::from_uuid(model.id),
        scope: PricingScope {
            country,
            organization_type: model.organization_type,
            entity_type: model.entity_type,
            engagement_model: model.engagement_model.into(),
            membership_status: model.membership_status.into(),
        },
        unit: unit_from_columns(model.unit_kind, model.unit_value, &currency),
        discount_percentage: normalized(model.discount_percentage),
        frequency_fees: FrequencyFees {
            quarterly: normalized(model.quarterly_fee),
            half_yearly: normalized(model.half_yearly_fee),
            annual: normalized(model.annual_fee),
        },
        currency,
        effective_from: to_utc(model.effective_from),
        effective_to: model.effective_to.map(to_utc),
        is_active: model.is_active,
        created_at: to_utc(model.created_at),
    })
}

fn into_membership_fee(model: membership_fees::Model) -> StoreResult<MembershipFeeRecord> {
    Ok(MembershipFeeRecord {
        id: MembershipFeeId::from_uuid(model.id),
        country: CountryScope::parse(&model.country).map_err(|e| corrupt("membership_fees", e))?,
        organization_type: model.organization_type,
        entity_type: model.entity_type,
        fees: MembershipFees {
            monthly: normalized(model.monthly_fee),
            quarterly: normalized(model.quarterly_fee),
            half_yearly: normalized(model.half_yearly_fee),
            annual: normalized(model.annual_fee),
        },
        currency: parse_currency("membership_fees", &model.currency)?,
        is_active: model.is_active,
        created_at: to_utc(model.created_at),
    })
}

#[async_trait]
impl PricingCatalogStore for PricingRepository {
    async fn load_catalog(&self) -> StoreResult<PricingCatalog> {
        let configs = pricing_configs::Entity::find()
            .order_by_asc(pricing_configs::Column::CreatedAt)
            .order_by_asc(pricing_configs::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(into_config)
            .collect::<StoreResult<Vec<_>>>()?;

        let fees = membership_fees::Entity::find()
            .order_by_asc(membership_fees::Column::CreatedAt)
            .order_by_asc(membership_fees::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(into_membership_fee)
            .collect::<StoreResult<Vec<_>>>()?;

        let version = (configs.len() + fees.len()) as u64;
        Ok(PricingCatalog::new(version, configs, fees))
    }

    async fn insert_pricing_config(
        &self,
        record: &PricingConfigRecord,
        expected_version: u64,
    ) -> StoreResult<()> {
        let (unit_kind, unit_value) = unit_columns(&record.unit);
        let scope = &record.scope;
        let model = pricing_configs::ActiveModel {
            id: Set(record.id.into_inner()),
            country: Set(scope.country.as_str().to_string()),
            organization_type: Set(scope.organization_type.trim().to_string()),
            entity_type: Set(scope.entity_type.trim().to_string()),
            engagement_model: Set(scope.engagement_model.into()),
            membership_status: Set(scope.membership_status.into()),
            unit_kind: Set(unit_kind),
            unit_value: Set(unit_value),
            discount_percentage: Set(record.discount_percentage),
            quarterly_fee: Set(record.frequency_fees.quarterly),
            half_yearly_fee: Set(record.frequency_fees.half_yearly),
            annual_fee: Set(record.frequency_fees.annual),
            currency: Set(record.currency.as_str().to_string()),
            effective_from: Set(record.effective_from.into()),
            effective_to: Set(record.effective_to.map(Into::into)),
            is_active: Set(record.is_active),
            created_at: Set(record.created_at.into()),
        };
        let txn = lock_catalog_at(&self.db, expected_version).await?;
        pricing_configs::Entity::insert(model)
            .exec(&txn)
            .await
            .map_err(store_error)?;
        txn.commit().await.map_err(store_error)?;

        info!(
            pricing_config_id = %record.id,
            country = %scope.country,
            engagement_model = %scope.engagement_model,
            "Pricing config stored"
        );
        Ok(())
    }

    async fn insert_membership_fee(
        &self,
        record: &MembershipFeeRecord,
        expected_version: u64,
    ) -> StoreResult<()> {
        let model = membership_fees::ActiveModel {
            id: Set(record.id.into_inner()),
            country: Set(record.country.as_str().to_string()),
            organization_type: Set(record.organization_type.trim().to_string()),
            entity_type: Set(record.entity_type.trim().to_string()),
            monthly_fee: Set(record.fees.monthly),
            quarterly_fee: Set(record.fees.quarterly),
            half_yearly_fee: Set(record.fees.half_yearly),
            annual_fee: Set(record.fees.annual),
            currency: Set(record.currency.as_str().to_string()),
            is_active: Set(record.is_active),
            created_at: Set(record.created_at.into()),
        };
        let txn = lock_catalog_at(&self.db, expected_version).await?;
        membership_fees::Entity::insert(model)
            .exec(&txn)
            .await
            .map_err(store_error)?;
        txn.commit().await.map_err(store_error)?;

        info!(membership_fee_id = %record.id, country = %record.country, "Membership fee stored");
        Ok(())
    }
}
