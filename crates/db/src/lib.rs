//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository implementations of the onboarding store traits
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    ActivationRepository, AdministratorRepository, OrganizationRepository, PricingRepository,
    ValidationRepository,
};

use orgdesk_core::store::Stores;
use sea_orm::{Database, DatabaseConnection, DbErr};
use std::sync::Arc;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Builds the Postgres-backed stores the onboarding service runs against.
#[must_use]
pub fn stores(db: &DatabaseConnection) -> Stores {
    Stores {
        organizations: Arc::new(OrganizationRepository::new(db.clone())),
        catalog: Arc::new(PricingRepository::new(db.clone())),
        activations: Arc::new(ActivationRepository::new(db.clone())),
        validation: Arc::new(ValidationRepository::new(db.clone())),
        administrators: Arc::new(AdministratorRepository::new(db.clone())),
    }
}
