//! Integration tests for the Postgres stores.
//!
//! These run against the database named by `DATABASE_URL` and return early
//! when it is unset. Every test works under its own organization type so runs
//! can share one database.

use chrono::{Duration as ChronoDuration, Utc};
use fake::Fake;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use orgdesk_core::activation::ActivationRequest;
use orgdesk_core::auth::{Actor, ActorRole};
use orgdesk_core::organization::{
    ContactInfo, CountryCode, EntityKind, NewOrganization, OrganizationClassification,
    WorkflowStep,
};
use orgdesk_core::payment::{PaymentMethod, PaymentSubmission};
use orgdesk_core::pricing::{
    CountryScope, EngagementModel, FrequencyFees, MembershipStatus, NewPricingConfig,
    PricingScope, PricingUnit,
};
use orgdesk_core::provisioning::NewAdministrator;
use orgdesk_core::store::{
    OrganizationDirectory, PricingCatalogStore, StoreError, ValidationStore,
};
use orgdesk_core::validation::{AuthorizationStatus, PaymentStatus, ValidationStage};
use orgdesk_core::{ErrorKind, NoopNotifier, OnboardingService};
use orgdesk_db::migration::{Migrator, MigratorTrait};
use orgdesk_db::{OrganizationRepository, PricingRepository, ValidationRepository, stores};
use orgdesk_shared::types::{CurrencyCode, Money, OrganizationId, PageRequest, UserId};
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use uuid::Uuid;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connects and migrates, or returns `None` without `DATABASE_URL`.
async fn connect() -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping");
        return None;
    };
    let db = orgdesk_db::connect(&url)
        .await
        .expect("Failed to connect to database");
    MIGRATED
        .get_or_init(|| async {
            Migrator::up(&db, None).await.expect("Failed to run migrations");
        })
        .await;
    Some(db)
}

fn inr() -> CurrencyCode {
    CurrencyCode::parse("INR").unwrap()
}

fn unique_type() -> String {
    format!("MSME-{}", Uuid::new_v4().simple())
}

fn new_org(organization_type: &str) -> NewOrganization {
    NewOrganization {
        name: CompanyName().fake(),
        classification: OrganizationClassification {
            country: CountryCode::parse("IN").unwrap(),
            organization_type: organization_type.to_string(),
            entity_type: "Private Limited".to_string(),
            entity_kind: EntityKind::Commercial,
            industry_segment: None,
        },
        contact: ContactInfo {
            contact_name: Name().fake(),
            email: SafeEmail().fake(),
            phone: None,
            address: None,
        },
        membership_status: MembershipStatus::Member,
    }
}

fn marketplace(organization_type: &str) -> NewPricingConfig {
    NewPricingConfig {
        scope: PricingScope {
            country: CountryScope::parse("IN").unwrap(),
            organization_type: organization_type.to_string(),
            entity_type: "Private Limited".to_string(),
            engagement_model: EngagementModel::MarketPlace,
            membership_status: MembershipStatus::Member,
        },
        unit: PricingUnit::Percentage(dec!(10)),
        discount_percentage: Some(dec!(20)),
        frequency_fees: FrequencyFees::default(),
        currency: inr(),
        effective_from: Utc::now() - ChronoDuration::days(1),
        effective_to: None,
    }
}

fn service(db: &DatabaseConnection) -> OnboardingService {
    OnboardingService::new(stores(db), Duration::from_secs(1), Arc::new(NoopNotifier))
}

fn reviewer() -> Actor {
    Actor::new(UserId::new(), OrganizationId::new(), ActorRole::Reviewer)
}

fn payment(receipt: &str) -> PaymentSubmission {
    PaymentSubmission {
        amount: Money::new(dec!(5000), inr()),
        method: PaymentMethod::Upi,
        receipt_number: receipt.to_string(),
    }
}

fn activation(key: &str) -> ActivationRequest {
    ActivationRequest {
        engagement_model: EngagementModel::MarketPlace,
        membership_status: MembershipStatus::Member,
        billing_frequency: None,
        terms_accepted: true,
        idempotency_key: Some(key.to_string()),
    }
}

#[tokio::test]
async fn test_organization_round_trip_and_progress() {
    let Some(db) = connect().await else { return };
    let repo = OrganizationRepository::new(db.clone());

    let mut profile = new_org(&unique_type()).into_profile(Utc::now());
    repo.insert_organization(&profile).await.unwrap();

    let stored = repo.find_organization(profile.id).await.unwrap().unwrap();
    assert_eq!(stored.name, profile.name);
    assert_eq!(stored.classification.country.as_str(), "IN");
    assert_eq!(stored.workflow_step, WorkflowStep::Registered);

    profile.workflow_step = WorkflowStep::EngagementSelected;
    profile.name = "Renamed Pvt Ltd".to_string();
    repo.update_progress(&profile).await.unwrap();

    let stored = repo.find_organization(profile.id).await.unwrap().unwrap();
    assert_eq!(stored.workflow_step, WorkflowStep::EngagementSelected);
    // Progress writes leave the rest of the row alone.
    assert_ne!(stored.name, "Renamed Pvt Ltd");

    let missing = new_org(&unique_type()).into_profile(Utc::now());
    let err = repo
        .deactivate_organization(missing.id, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_engagement_write_needs_active_row() {
    let Some(db) = connect().await else { return };
    let repo = OrganizationRepository::new(db.clone());

    let mut profile = new_org(&unique_type()).into_profile(Utc::now());
    repo.insert_organization(&profile).await.unwrap();

    profile.engagement_model = Some(EngagementModel::MarketPlace);
    profile.pricing_tier = Some("Gold".to_string());
    assert!(repo.update_engagement(&profile).await.unwrap());

    assert!(repo.deactivate_organization(profile.id, Utc::now()).await.unwrap());
    assert!(!repo.deactivate_organization(profile.id, Utc::now()).await.unwrap());

    profile.pricing_tier = Some("Silver".to_string());
    assert!(!repo.update_engagement(&profile).await.unwrap());

    let stored = repo.find_organization(profile.id).await.unwrap().unwrap();
    assert!(!stored.is_active);
    assert_eq!(stored.engagement_model, Some(EngagementModel::MarketPlace));
    assert_eq!(stored.pricing_tier.as_deref(), Some("Gold"));
}

#[tokio::test]
async fn test_catalog_insert_against_stale_version_is_a_conflict() {
    let Some(db) = connect().await else { return };
    let repo = PricingRepository::new(db.clone());
    let service = service(&db);
    let organization_type = unique_type();

    let snapshot = repo.load_catalog().await.unwrap();
    service
        .create_pricing_config(&reviewer(), marketplace(&organization_type))
        .await
        .unwrap();

    let mut other = marketplace(&organization_type);
    other.scope.membership_status = MembershipStatus::NotAMember;
    let record = other.into_record(Utc::now());
    let err = repo
        .insert_pricing_config(&record, snapshot.version())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let catalog = repo.load_catalog().await.unwrap();
    assert!(catalog.configs().iter().all(|c| c.id != record.id));
}

#[tokio::test]
async fn test_concurrent_overlapping_configs_admit_one() {
    let Some(db) = connect().await else { return };
    let service = service(&db);
    let organization_type = unique_type();
    let reviewer = reviewer();

    let (first, second) = tokio::join!(
        service.create_pricing_config(&reviewer, marketplace(&organization_type)),
        service.create_pricing_config(&reviewer, marketplace(&organization_type)),
    );
    assert_eq!(usize::from(first.is_ok()) + usize::from(second.is_ok()), 1);

    let catalog = PricingRepository::new(db.clone()).load_catalog().await.unwrap();
    let stored = catalog
        .configs()
        .iter()
        .filter(|c| c.scope.organization_type == organization_type)
        .count();
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn test_price_resolves_from_stored_catalog() {
    let Some(db) = connect().await else { return };
    let service = service(&db);
    let organization_type = unique_type();

    service
        .create_pricing_config(&reviewer(), marketplace(&organization_type))
        .await
        .unwrap();
    let err = service
        .create_pricing_config(&reviewer(), marketplace(&organization_type))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "PRICING_OVERLAP");

    let profile = service
        .register_organization(new_org(&organization_type))
        .await
        .unwrap();
    let member = Actor::new(UserId::new(), profile.id, ActorRole::Member);
    let resolution = service
        .resolve_price(
            &member,
            profile.id,
            EngagementModel::MarketPlace,
            MembershipStatus::Member,
            None,
        )
        .await
        .unwrap();
    let price = resolution.resolved().unwrap();
    assert_eq!(price.final_price, PricingUnit::Percentage(dec!(8.0)));
}

#[tokio::test]
async fn test_activation_key_is_idempotent() {
    let Some(db) = connect().await else { return };
    let service = service(&db);
    let organization_type = unique_type();
    service
        .create_pricing_config(&reviewer(), marketplace(&organization_type))
        .await
        .unwrap();
    let profile = service
        .register_organization(new_org(&organization_type))
        .await
        .unwrap();
    let member = Actor::new(UserId::new(), profile.id, ActorRole::Member);

    let first = service
        .activate_engagement(&member, profile.id, activation("key-1"))
        .await
        .unwrap();
    let second = service
        .activate_engagement(&member, profile.id, activation("key-1"))
        .await
        .unwrap();
    assert_eq!(first.id, second.id);

    let listed = service
        .list_activations(&member, profile.id, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.meta.total, 1);
    assert_eq!(listed.data[0].final_price, PricingUnit::Percentage(dec!(8.0)));
}

#[tokio::test]
async fn test_stale_version_is_a_conflict() {
    let Some(db) = connect().await else { return };
    let service = service(&db);
    let organization_type = unique_type();
    service
        .create_pricing_config(&reviewer(), marketplace(&organization_type))
        .await
        .unwrap();
    let profile = service
        .register_organization(new_org(&organization_type))
        .await
        .unwrap();
    let member = Actor::new(UserId::new(), profile.id, ActorRole::Member);
    service
        .activate_engagement(&member, profile.id, activation("key-1"))
        .await
        .unwrap();
    let receipt = service
        .submit_payment(&member, profile.id, payment("RCPT-1"))
        .await
        .unwrap();
    assert_eq!(receipt.status.version, 1);

    let repo = ValidationRepository::new(db.clone());
    let mut status = receipt.status.clone();
    status.version = 2;
    status.payment.status = PaymentStatus::Approved;
    repo.compare_and_swap(&status, 1, &[]).await.unwrap();

    let err = repo.compare_and_swap(&status, 1, &[]).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let stored = repo
        .find_validation_status(profile.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.payment.status, PaymentStatus::Approved);
}

#[tokio::test]
async fn test_receipt_reuse_and_replay() {
    let Some(db) = connect().await else { return };
    let service = service(&db);
    let organization_type = unique_type();
    service
        .create_pricing_config(&reviewer(), marketplace(&organization_type))
        .await
        .unwrap();
    let profile = service
        .register_organization(new_org(&organization_type))
        .await
        .unwrap();
    let member = Actor::new(UserId::new(), profile.id, ActorRole::Member);
    service
        .activate_engagement(&member, profile.id, activation("key-1"))
        .await
        .unwrap();

    let first = service
        .submit_payment(&member, profile.id, payment("RCPT-7"))
        .await
        .unwrap();
    assert!(!first.replayed);

    let replay = service
        .submit_payment(&member, profile.id, payment("RCPT-7"))
        .await
        .unwrap();
    assert!(replay.replayed);
    assert_eq!(replay.payment.id, first.payment.id);

    let mut different = payment("RCPT-7");
    different.amount = Money::new(dec!(4000), inr());
    let err = service
        .submit_payment(&member, profile.id, different)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "RECEIPT_REUSED");
}

#[tokio::test]
async fn test_full_onboarding_against_postgres() {
    let Some(db) = connect().await else { return };
    let service = service(&db);
    let reviewer = reviewer();
    let organization_type = unique_type();
    service
        .create_pricing_config(&reviewer, marketplace(&organization_type))
        .await
        .unwrap();
    let profile = service
        .register_organization(new_org(&organization_type))
        .await
        .unwrap();
    let member = Actor::new(UserId::new(), profile.id, ActorRole::Member);
    service
        .activate_engagement(&member, profile.id, activation("key-1"))
        .await
        .unwrap();
    service
        .submit_payment(&member, profile.id, payment("RCPT-1"))
        .await
        .unwrap();

    let administrator = NewAdministrator {
        name: Name().fake(),
        email: SafeEmail().fake(),
        contact: None,
    };
    let err = service
        .create_administrator(&member, profile.id, administrator.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Rejected);

    let outcome = service
        .set_validation_stage(&reviewer, profile.id, ValidationStage::Payment, "approved", None)
        .await
        .unwrap();
    assert!(outcome.became_ready());

    let provisioned = service
        .create_administrator(&member, profile.id, administrator.clone())
        .await
        .unwrap();
    assert!(provisioned.credential.is_active);

    let again = service
        .create_administrator(&member, profile.id, administrator)
        .await
        .unwrap_err();
    assert_eq!(again.kind(), ErrorKind::Rejected);

    let status = service.validation_status(&member, profile.id).await.unwrap();
    assert_eq!(status.authorization.status, AuthorizationStatus::Authorized);

    let events = service
        .validation_events(&member, profile.id, &PageRequest::default())
        .await
        .unwrap();
    assert_eq!(events.meta.total, 5);
    assert!(events.data.windows(2).all(|pair| pair[0].version <= pair[1].version));

    let tail = service
        .validation_events(&member, profile.id, &PageRequest { page: 2, per_page: 3 })
        .await
        .unwrap();
    assert_eq!(tail.data.len(), 2);
    assert_eq!(tail.data[1].version, events.data[4].version);

    let stored = service.get_organization(&member, profile.id).await.unwrap();
    assert!(stored.is_completed);
    assert_eq!(stored.workflow_step, WorkflowStep::AdministratorCreated);
}
