//! `SeaORM` Entity for validation_statuses table.
//!
//! One row per organization; `version` guards every update.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{AuthorizationStatus, DocumentStatus, PaymentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "validation_statuses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub organization_id: Uuid,
    pub payment_status: PaymentStatus,
    pub payment_reason: Option<String>,
    pub payment_actor: Option<Uuid>,
    pub payment_updated_at: DateTimeWithTimeZone,
    pub document_status: DocumentStatus,
    pub document_reason: Option<String>,
    pub document_actor: Option<Uuid>,
    pub document_updated_at: DateTimeWithTimeZone,
    pub authorization_status: AuthorizationStatus,
    pub authorization_reason: Option<String>,
    pub authorization_actor: Option<Uuid>,
    pub authorization_updated_at: DateTimeWithTimeZone,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id"
    )]
    Organizations,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
