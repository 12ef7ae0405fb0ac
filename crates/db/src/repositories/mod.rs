//! Repository abstractions for data access.
//!
//! Each repository implements one of the store traits from `orgdesk_core::store`
//! on Postgres. Rows are converted to domain types at this boundary; a row
//! that no longer parses is reported as a backend failure.

pub mod activation;
pub mod administrator;
pub mod organization;
pub mod pricing;
pub mod validation;

pub use activation::ActivationRepository;
pub use administrator::AdministratorRepository;
pub use organization::OrganizationRepository;
pub use pricing::PricingRepository;
pub use validation::ValidationRepository;

use chrono::{DateTime, Utc};
use orgdesk_core::store::StoreError;
use orgdesk_shared::types::CurrencyCode;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DbErr, SqlErr};
use tracing::error;

use crate::entities::sea_orm_active_enums as db;
use orgdesk_core::payment;

/// Maps a database error onto the store error the core understands.
///
/// Unique violations become [`StoreError::Duplicate`]; anything else is a
/// backend failure.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return StoreError::Duplicate(detail);
    }
    error!(error = %err, "Database operation failed");
    StoreError::Backend(err.to_string())
}

/// Reports a stored value that no longer parses.
pub(crate) fn corrupt(table: &str, detail: impl std::fmt::Display) -> StoreError {
    error!(table, %detail, "Stored row failed to parse");
    StoreError::Backend(format!("corrupt {table} row: {detail}"))
}

pub(crate) fn to_utc(value: DateTimeWithTimeZone) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

pub(crate) fn parse_currency(table: &str, code: &str) -> Result<CurrencyCode, StoreError> {
    CurrencyCode::parse(code).map_err(|e| corrupt(table, e))
}

/// Implements `From` both ways between a Postgres enum and its domain twin.
macro_rules! mirror_enum {
    ($db:ty, $domain:ty, [$($variant:ident),+ $(,)?]) => {
        impl From<$domain> for $db {
            fn from(value: $domain) -> Self {
                type Source = $domain;
                match value {
                    $(Source::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $domain {
            fn from(value: $db) -> Self {
                type Source = $db;
                match value {
                    $(Source::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(db::EngagementModel, orgdesk_core::pricing::EngagementModel, [MarketPlace, PlatformAsAService]);
mirror_enum!(db::MembershipStatus, orgdesk_core::pricing::MembershipStatus, [Member, NotAMember]);
mirror_enum!(db::BillingFrequency, orgdesk_core::pricing::BillingFrequency, [Quarterly, HalfYearly, Annual]);
mirror_enum!(db::EntityKind, orgdesk_core::organization::EntityKind, [Commercial, NonCommercial]);
mirror_enum!(db::ApprovalStatus, orgdesk_core::organization::ApprovalStatus, [Pending, Approved, Declined]);
mirror_enum!(
    db::WorkflowStep,
    orgdesk_core::organization::WorkflowStep,
    [Registered, EngagementSelected, UnderValidation, AdministratorCreated]
);
mirror_enum!(db::PaymentMethod, payment::PaymentMethod, [BankTransfer, Card, Upi, Cheque, Cash]);
mirror_enum!(db::PaymentStatus, orgdesk_core::validation::PaymentStatus, [Pending, Approved, Declined]);
mirror_enum!(
    db::DocumentStatus,
    orgdesk_core::validation::DocumentStatus,
    [Pending, Valid, Invalid, NotApplicable]
);
mirror_enum!(
    db::AuthorizationStatus,
    orgdesk_core::validation::AuthorizationStatus,
    [NotReady, Ready, Authorized]
);
mirror_enum!(
    db::ValidationStage,
    orgdesk_core::validation::ValidationStage,
    [Payment, Document, AdminAuthorization]
);

/// Splits a pricing unit into its stored kind and value.
pub(crate) fn unit_columns(unit: &orgdesk_core::pricing::PricingUnit) -> (db::PricingUnitKind, rust_decimal::Decimal) {
    match unit {
        orgdesk_core::pricing::PricingUnit::Percentage(value) => (db::PricingUnitKind::Percentage, *value),
        orgdesk_core::pricing::PricingUnit::FixedAmount(money) => (db::PricingUnitKind::FixedAmount, money.amount),
    }
}

/// Rebuilds a pricing unit from its stored kind and value.
pub(crate) fn unit_from_columns(
    kind: db::PricingUnitKind,
    value: rust_decimal::Decimal,
    currency: &CurrencyCode,
) -> orgdesk_core::pricing::PricingUnit {
    let value = value.normalize();
    match kind {
        db::PricingUnitKind::Percentage => orgdesk_core::pricing::PricingUnit::Percentage(value),
        db::PricingUnitKind::FixedAmount => orgdesk_core::pricing::PricingUnit::FixedAmount(
            orgdesk_shared::types::Money::new(value, currency.clone()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_enum_mirrors_round_trip() {
        let step: db::WorkflowStep = orgdesk_core::organization::WorkflowStep::UnderValidation.into();
        assert_eq!(step, db::WorkflowStep::UnderValidation);
        let back: orgdesk_core::organization::WorkflowStep = step.into();
        assert_eq!(back, orgdesk_core::organization::WorkflowStep::UnderValidation);

        let stage: orgdesk_core::validation::ValidationStage = db::ValidationStage::AdminAuthorization.into();
        assert_eq!(stage, orgdesk_core::validation::ValidationStage::AdminAuthorization);
    }

    #[test]
    fn test_unit_columns_keep_kind() {
        let inr = CurrencyCode::parse("INR").unwrap();
        let (kind, value) = unit_columns(&orgdesk_core::pricing::PricingUnit::Percentage(dec!(7.5)));
        assert_eq!(kind, db::PricingUnitKind::Percentage);
        assert_eq!(
            unit_from_columns(kind, dec!(7.5000), &inr),
            orgdesk_core::pricing::PricingUnit::Percentage(dec!(7.5))
        );

        let fixed = orgdesk_core::pricing::PricingUnit::FixedAmount(orgdesk_shared::types::Money::new(
            dec!(12000),
            inr.clone(),
        ));
        let (kind, value_fixed) = unit_columns(&fixed);
        assert_eq!(kind, db::PricingUnitKind::FixedAmount);
        assert_eq!(unit_from_columns(kind, value_fixed, &inr), fixed);
        assert_eq!(value, dec!(7.5));
    }

    #[test]
    fn test_other_errors_are_backend_failures() {
        let err = store_error(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
