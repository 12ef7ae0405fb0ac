//! `SeaORM` entity definitions.
//!
//! One module per table; Postgres enum types live in `sea_orm_active_enums`.

#![allow(missing_docs)]

pub mod administrators;
pub mod engagement_activations;
pub mod membership_fees;
pub mod organizations;
pub mod payments;
pub mod pricing_configs;
pub mod sea_orm_active_enums;
pub mod validation_events;
pub mod validation_statuses;
