//! `SeaORM` Entity for engagement_activations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{
    BillingFrequency, EngagementModel, MembershipStatus, PricingUnitKind,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "engagement_activations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub engagement_model: EngagementModel,
    pub membership_status: MembershipStatus,
    pub billing_frequency: Option<BillingFrequency>,
    pub unit_kind: PricingUnitKind,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub original_value: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub discount_percentage: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub final_value: Decimal,
    pub currency: String,
    pub pricing_config_id: Uuid,
    pub terms_accepted: bool,
    pub activated_by: Uuid,
    pub idempotency_key: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id"
    )]
    Organizations,
    #[sea_orm(
        belongs_to = "super::pricing_configs::Entity",
        from = "Column::PricingConfigId",
        to = "super::pricing_configs::Column::Id"
    )]
    PricingConfigs,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::pricing_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingConfigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
