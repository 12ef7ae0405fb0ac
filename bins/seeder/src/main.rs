//! Database seeder for OrgDesk development and testing.
//!
//! Seeds a demo pricing catalog, membership fees and a demo organization,
//! then prints access tokens for a reviewer and a member of that organization.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use orgdesk_core::auth::{Actor, ActorRole};
use orgdesk_core::organization::{
    ContactInfo, CountryCode, EntityKind, NewOrganization, OrganizationClassification,
};
use orgdesk_core::pricing::{
    CountryScope, EngagementModel, FrequencyFees, MembershipFees, MembershipStatus,
    NewMembershipFee, NewPricingConfig, PricingScope, PricingUnit,
};
use orgdesk_core::{NoopNotifier, OnboardingService};
use orgdesk_shared::types::{CurrencyCode, Money, OrganizationId, UserId};
use orgdesk_shared::{AppConfig, JwtConfig, JwtService};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Reviewer user id (consistent for all seeds)
const REVIEWER_USER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Back-office organization the reviewer belongs to
const BACK_OFFICE_ORG_ID: &str = "00000000-0000-0000-0000-000000000002";

const ORGANIZATION_TYPE: &str = "MSME";
const ENTITY_TYPE: &str = "Private Limited";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    println!("Connecting to database...");
    let db = orgdesk_db::connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    let service = OnboardingService::new(
        orgdesk_db::stores(&db),
        Duration::ZERO,
        Arc::new(NoopNotifier),
    );
    let reviewer = Actor::new(
        UserId::from_uuid(Uuid::parse_str(REVIEWER_USER_ID).unwrap()),
        OrganizationId::from_uuid(Uuid::parse_str(BACK_OFFICE_ORG_ID).unwrap()),
        ActorRole::Reviewer,
    );

    println!("Seeding pricing catalog...");
    seed_pricing_configs(&service, &reviewer).await;

    println!("Seeding membership fees...");
    seed_membership_fees(&service, &reviewer).await;

    println!("Seeding demo organization...");
    let organization_id = seed_demo_organization(&service).await;

    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: 7 * 24 * 60,
    });
    let reviewer_token = jwt
        .generate_access_token(
            reviewer.user_id.into_inner(),
            reviewer.organization_id.into_inner(),
            "reviewer",
        )
        .expect("Failed to issue reviewer token");
    let member_token = jwt
        .generate_access_token(Uuid::new_v4(), organization_id.into_inner(), "member")
        .expect("Failed to issue member token");

    println!("Seeding complete!");
    println!();
    println!("Demo organization: {organization_id}");
    println!("Reviewer token (7 days):\n  {reviewer_token}");
    println!("Member token (7 days):\n  {member_token}");
}

fn inr() -> CurrencyCode {
    CurrencyCode::parse("INR").unwrap()
}

fn scope(country: CountryScope, model: EngagementModel, status: MembershipStatus) -> PricingScope {
    PricingScope {
        country,
        organization_type: ORGANIZATION_TYPE.to_string(),
        entity_type: ENTITY_TYPE.to_string(),
        engagement_model: model,
        membership_status: status,
    }
}

fn fixed_fees(quarterly: Decimal, half_yearly: Decimal, annual: Decimal) -> FrequencyFees {
    FrequencyFees {
        quarterly: Some(quarterly),
        half_yearly: Some(half_yearly),
        annual: Some(annual),
    }
}

/// Seeds India and Global pricing for both engagement models.
async fn seed_pricing_configs(service: &OnboardingService, reviewer: &Actor) {
    let india = CountryScope::Country(CountryCode::parse("IN").unwrap());
    let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let usd = CurrencyCode::parse("USD").unwrap();

    let configs = [
        NewPricingConfig {
            scope: scope(india.clone(), EngagementModel::MarketPlace, MembershipStatus::Member),
            unit: PricingUnit::Percentage(dec!(10)),
            discount_percentage: Some(dec!(20)),
            frequency_fees: FrequencyFees::default(),
            currency: inr(),
            effective_from: from,
            effective_to: None,
        },
        NewPricingConfig {
            scope: scope(india.clone(), EngagementModel::MarketPlace, MembershipStatus::NotAMember),
            unit: PricingUnit::Percentage(dec!(12)),
            discount_percentage: None,
            frequency_fees: FrequencyFees::default(),
            currency: inr(),
            effective_from: from,
            effective_to: None,
        },
        NewPricingConfig {
            scope: scope(
                india.clone(),
                EngagementModel::PlatformAsAService,
                MembershipStatus::Member,
            ),
            unit: PricingUnit::FixedAmount(Money::new(dec!(12000), inr())),
            discount_percentage: Some(dec!(10)),
            frequency_fees: fixed_fees(dec!(3500), dec!(6500), dec!(12000)),
            currency: inr(),
            effective_from: from,
            effective_to: None,
        },
        NewPricingConfig {
            scope: scope(india, EngagementModel::PlatformAsAService, MembershipStatus::NotAMember),
            unit: PricingUnit::FixedAmount(Money::new(dec!(14000), inr())),
            discount_percentage: None,
            frequency_fees: fixed_fees(dec!(4000), dec!(7500), dec!(14000)),
            currency: inr(),
            effective_from: from,
            effective_to: None,
        },
        NewPricingConfig {
            scope: scope(
                CountryScope::Global,
                EngagementModel::MarketPlace,
                MembershipStatus::NotAMember,
            ),
            unit: PricingUnit::Percentage(dec!(15)),
            discount_percentage: None,
            frequency_fees: FrequencyFees::default(),
            currency: usd,
            effective_from: from,
            effective_to: None,
        },
    ];

    for input in configs {
        let label = format!(
            "{} / {} / {}",
            input.scope.country, input.scope.engagement_model, input.scope.membership_status
        );
        match service.create_pricing_config(reviewer, input).await {
            Ok(record) => println!("  Created pricing config {label}: {}", record.unit),
            Err(e) if e.error_code() == "PRICING_OVERLAP" => {
                println!("  Pricing config {label} already exists, skipping...");
            }
            Err(e) => eprintln!("Failed to insert pricing config {label}: {e}"),
        }
    }
}

/// Seeds India membership fees.
async fn seed_membership_fees(service: &OnboardingService, reviewer: &Actor) {
    let input = NewMembershipFee {
        country: CountryScope::Country(CountryCode::parse("IN").unwrap()),
        organization_type: ORGANIZATION_TYPE.to_string(),
        entity_type: ENTITY_TYPE.to_string(),
        fees: MembershipFees {
            monthly: Some(dec!(1000)),
            quarterly: Some(dec!(2800)),
            half_yearly: Some(dec!(5400)),
            annual: Some(dec!(10000)),
        },
        currency: inr(),
    };

    match service.create_membership_fee(reviewer, input).await {
        Ok(record) => println!("  Created membership fee record {}", record.id),
        Err(e) if e.error_code() == "INVALID_PRICING_CONFIG" => {
            println!("  Membership fees already exist, skipping...");
        }
        Err(e) => eprintln!("Failed to insert membership fees: {e}"),
    }
}

/// Registers a fresh demo organization and returns its id.
async fn seed_demo_organization(service: &OnboardingService) -> OrganizationId {
    let input = NewOrganization {
        name: "Demo Health Pvt Ltd".to_string(),
        classification: OrganizationClassification {
            country: CountryCode::parse("IN").unwrap(),
            organization_type: ORGANIZATION_TYPE.to_string(),
            entity_type: ENTITY_TYPE.to_string(),
            entity_kind: EntityKind::Commercial,
            industry_segment: Some("Healthcare".to_string()),
        },
        contact: ContactInfo {
            contact_name: "Demo Contact".to_string(),
            email: "demo@orgdesk.dev".to_string(),
            phone: None,
            address: None,
        },
        membership_status: MembershipStatus::Member,
    };

    let profile = service
        .register_organization(input)
        .await
        .expect("Failed to register demo organization");
    println!("  Created demo organization: {}", profile.name);
    profile.id
}
