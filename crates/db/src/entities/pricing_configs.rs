//! `SeaORM` Entity for pricing_configs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EngagementModel, MembershipStatus, PricingUnitKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_configs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Country code or `Global`.
    pub country: String,
    pub organization_type: String,
    pub entity_type: String,
    pub engagement_model: EngagementModel,
    pub membership_status: MembershipStatus,
    pub unit_kind: PricingUnitKind,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub unit_value: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub discount_percentage: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub quarterly_fee: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub half_yearly_fee: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub annual_fee: Option<Decimal>,
    pub currency: String,
    pub effective_from: DateTimeWithTimeZone,
    pub effective_to: Option<DateTimeWithTimeZone>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::engagement_activations::Entity")]
    EngagementActivations,
}

impl Related<super::engagement_activations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EngagementActivations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
