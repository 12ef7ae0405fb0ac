//! Property-based tests for PricingResolver.

use chrono::{DateTime, Duration, TimeZone, Utc};
use orgdesk_shared::types::{CurrencyCode, PricingConfigId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::organization::{CountryCode, EntityKind, OrganizationClassification};
use crate::pricing::catalog::PricingCatalog;
use crate::pricing::resolver::{PriceResolution, PricingResolver};
use crate::pricing::types::{
    CountryScope, EngagementModel, FrequencyFees, MembershipStatus, PricingConfigRecord,
    PricingScope, PricingUnit,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

/// Strategy for percentages with two decimal places between 0 and 100.
fn arb_percent() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|v| Decimal::new(v, 2))
}

fn arb_country() -> impl Strategy<Value = String> {
    prop_oneof![Just("IN"), Just("FR"), Just("US"), Just("DE")].prop_map(str::to_string)
}

fn arb_scope() -> impl Strategy<Value = CountryScope> {
    prop_oneof![
        Just(CountryScope::Global),
        arb_country().prop_map(|c| CountryScope::Country(CountryCode::parse(&c).unwrap())),
    ]
}

fn arb_membership() -> impl Strategy<Value = MembershipStatus> {
    prop_oneof![Just(MembershipStatus::Member), Just(MembershipStatus::NotAMember)]
}

/// Strategy for catalog records sharing one organization classification.
fn arb_record() -> impl Strategy<Value = PricingConfigRecord> {
    (
        arb_scope(),
        arb_membership(),
        arb_percent(),
        proptest::option::of(arb_percent()),
        0i64..60,
        0i64..60,
        any::<bool>(),
    )
        .prop_map(|(country, membership, base, discount, start_days, created_days, active)| {
            PricingConfigRecord {
                id: PricingConfigId::new(),
                scope: PricingScope {
                    country,
                    organization_type: "MSME".to_string(),
                    entity_type: "Trust".to_string(),
                    engagement_model: EngagementModel::MarketPlace,
                    membership_status: membership,
                },
                unit: PricingUnit::Percentage(base),
                discount_percentage: discount,
                frequency_fees: FrequencyFees::default(),
                currency: CurrencyCode::parse("INR").unwrap(),
                effective_from: now() - Duration::days(start_days),
                effective_to: None,
                is_active: active,
                created_at: now() - Duration::days(created_days),
            }
        })
}

fn classification(country: &str) -> OrganizationClassification {
    OrganizationClassification {
        country: CountryCode::parse(country).unwrap(),
        organization_type: "msme".to_string(),
        entity_type: "TRUST".to_string(),
        entity_kind: EntityKind::NonCommercial,
        industry_segment: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Same catalog and inputs always give the same result.
    #[test]
    fn prop_resolve_is_deterministic(
        records in proptest::collection::vec(arb_record(), 0..8),
        country in arb_country(),
        membership in arb_membership(),
    ) {
        let catalog = PricingCatalog::new(1, records, vec![]);
        let org = classification(&country);
        let first = PricingResolver::resolve(&catalog, &org, EngagementModel::MarketPlace, membership, None, now());
        let second = PricingResolver::resolve(&catalog, &org, EngagementModel::MarketPlace, membership, None, now());
        prop_assert_eq!(first, second);
    }

    /// Members pay base * (1 - D/100); non-members pay base.
    #[test]
    fn prop_discount_formula(
        base in arb_percent(),
        discount in arb_percent(),
    ) {
        let (member, applied) = PricingResolver::apply_discount(base, Some(discount), MembershipStatus::Member);
        prop_assert_eq!(member, base * (Decimal::ONE - discount / Decimal::ONE_HUNDRED));
        prop_assert_eq!(applied, Some(discount));
        prop_assert!(member <= base);

        let (non_member, applied) = PricingResolver::apply_discount(base, Some(discount), MembershipStatus::NotAMember);
        prop_assert_eq!(non_member, base);
        prop_assert_eq!(applied, None);
    }

    /// The selected record is effective and, when any exact-country record is
    /// effective, comes from the exact country.
    #[test]
    fn prop_selection_prefers_effective_exact(
        records in proptest::collection::vec(arb_record(), 1..8),
        country in arb_country(),
        membership in arb_membership(),
    ) {
        let catalog = PricingCatalog::new(1, records, vec![]);
        let org = classification(&country);
        let resolution = PricingResolver::resolve(&catalog, &org, EngagementModel::MarketPlace, membership, None, now());

        let effective: Vec<&PricingConfigRecord> = catalog
            .configs()
            .iter()
            .filter(|r| r.scope.membership_status == membership
                && r.scope.country.matches(&org.country)
                && r.is_effective_at(now()))
            .collect();

        match resolution {
            PriceResolution::Resolved(price) => {
                let chosen = effective.iter().find(|r| r.id == price.config_id);
                prop_assert!(chosen.is_some());
                if effective.iter().any(|r| r.scope.country.is_exact()) {
                    prop_assert!(price.scope.is_exact());
                }
            }
            PriceResolution::NotFound { .. } => prop_assert!(effective.is_empty()),
        }
    }

    /// With only a Global record configured, every country resolves to it.
    #[test]
    fn prop_global_fallback(
        country in arb_country(),
        base in arb_percent(),
    ) {
        let record = PricingConfigRecord {
            id: PricingConfigId::new(),
            scope: PricingScope {
                country: CountryScope::Global,
                organization_type: "MSME".to_string(),
                entity_type: "Trust".to_string(),
                engagement_model: EngagementModel::MarketPlace,
                membership_status: MembershipStatus::NotAMember,
            },
            unit: PricingUnit::Percentage(base),
            discount_percentage: None,
            frequency_fees: FrequencyFees::default(),
            currency: CurrencyCode::parse("INR").unwrap(),
            effective_from: now(),
            effective_to: None,
            is_active: true,
            created_at: now(),
        };
        let id = record.id;
        let catalog = PricingCatalog::new(1, vec![record], vec![]);
        let resolution = PricingResolver::resolve(
            &catalog,
            &classification(&country),
            EngagementModel::MarketPlace,
            MembershipStatus::NotAMember,
            None,
            now(),
        );
        let price = resolution.resolved().cloned();
        prop_assert!(price.is_some());
        let price = price.unwrap();
        prop_assert_eq!(price.config_id, id);
        prop_assert_eq!(price.scope, CountryScope::Global);
    }
}
