//! `SeaORM` Entity for organizations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{
    ApprovalStatus, EngagementModel, EntityKind, MembershipStatus, WorkflowStep,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub country: String,
    pub organization_type: String,
    pub entity_type: String,
    pub entity_kind: EntityKind,
    pub industry_segment: Option<String>,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub contact_address: Option<String>,
    pub approval_status: ApprovalStatus,
    pub membership_status: MembershipStatus,
    pub pricing_tier: Option<String>,
    pub engagement_model: Option<EngagementModel>,
    pub workflow_step: WorkflowStep,
    pub is_completed: bool,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::engagement_activations::Entity")]
    EngagementActivations,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
    #[sea_orm(has_one = "super::validation_statuses::Entity")]
    ValidationStatuses,
    #[sea_orm(has_many = "super::administrators::Entity")]
    Administrators,
}

impl Related<super::engagement_activations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EngagementActivations.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::validation_statuses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ValidationStatuses.def()
    }
}

impl Related<super::administrators::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Administrators.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
