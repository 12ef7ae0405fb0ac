//! `SeaORM` active enums mirroring the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "engagement_model")]
pub enum EngagementModel {
    #[sea_orm(string_value = "market_place")]
    MarketPlace,
    #[sea_orm(string_value = "platform_as_a_service")]
    PlatformAsAService,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "membership_status")]
pub enum MembershipStatus {
    #[sea_orm(string_value = "member")]
    Member,
    #[sea_orm(string_value = "not_a_member")]
    NotAMember,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "billing_frequency")]
pub enum BillingFrequency {
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "half_yearly")]
    HalfYearly,
    #[sea_orm(string_value = "annual")]
    Annual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "pricing_unit_kind")]
pub enum PricingUnitKind {
    #[sea_orm(string_value = "percentage")]
    Percentage,
    #[sea_orm(string_value = "fixed_amount")]
    FixedAmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entity_kind")]
pub enum EntityKind {
    #[sea_orm(string_value = "commercial")]
    Commercial,
    #[sea_orm(string_value = "non_commercial")]
    NonCommercial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "approval_status")]
pub enum ApprovalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "declined")]
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "workflow_step")]
pub enum WorkflowStep {
    #[sea_orm(string_value = "registered")]
    Registered,
    #[sea_orm(string_value = "engagement_selected")]
    EngagementSelected,
    #[sea_orm(string_value = "under_validation")]
    UnderValidation,
    #[sea_orm(string_value = "administrator_created")]
    AdministratorCreated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "card")]
    Card,
    #[sea_orm(string_value = "upi")]
    Upi,
    #[sea_orm(string_value = "cheque")]
    Cheque,
    #[sea_orm(string_value = "cash")]
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "declined")]
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "document_status")]
pub enum DocumentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "valid")]
    Valid,
    #[sea_orm(string_value = "invalid")]
    Invalid,
    #[sea_orm(string_value = "not_applicable")]
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "authorization_status")]
pub enum AuthorizationStatus {
    #[sea_orm(string_value = "not_ready")]
    NotReady,
    #[sea_orm(string_value = "ready")]
    Ready,
    #[sea_orm(string_value = "authorized")]
    Authorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "validation_stage")]
pub enum ValidationStage {
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "document")]
    Document,
    #[sea_orm(string_value = "admin_authorization")]
    AdminAuthorization,
}
