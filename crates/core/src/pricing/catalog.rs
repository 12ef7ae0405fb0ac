//! Versioned snapshot of the pricing catalog.

use serde::Serialize;

use super::error::PricingError;
use super::types::{
    EngagementModel, MembershipFeeRecord, MembershipStatus, PricingConfigRecord, attribute_eq,
};
use crate::organization::CountryCode;

/// Lookup key for engagement pricing.
#[derive(Debug, Clone, Copy)]
pub struct PricingQuery<'a> {
    /// Organization's country.
    pub country: &'a CountryCode,
    /// Organization type.
    pub organization_type: &'a str,
    /// Entity type.
    pub entity_type: &'a str,
    /// Chosen engagement model.
    pub engagement_model: EngagementModel,
    /// Chosen membership status.
    pub membership_status: MembershipStatus,
}

/// Immutable snapshot of pricing and membership fee records.
///
/// Records keep the order they were loaded in; that order is the last
/// tie-break when selecting a record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PricingCatalog {
    version: u64,
    configs: Vec<PricingConfigRecord>,
    membership_fees: Vec<MembershipFeeRecord>,
}

impl PricingCatalog {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(
        version: u64,
        configs: Vec<PricingConfigRecord>,
        membership_fees: Vec<MembershipFeeRecord>,
    ) -> Self {
        Self {
            version,
            configs,
            membership_fees,
        }
    }

    /// Snapshot version, increasing with every catalog write.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// All pricing records in catalog order.
    #[must_use]
    pub fn configs(&self) -> &[PricingConfigRecord] {
        &self.configs
    }

    /// All membership fee records in catalog order.
    #[must_use]
    pub fn membership_fees(&self) -> &[MembershipFeeRecord] {
        &self.membership_fees
    }

    /// Returns records whose key matches the query, with the country equal
    /// to the requested one or Global.
    ///
    /// Activity and validity windows are not checked here. An empty result is
    /// valid.
    #[must_use]
    pub fn find_candidates(&self, query: &PricingQuery<'_>) -> Vec<&PricingConfigRecord> {
        self.configs
            .iter()
            .filter(|record| {
                let scope = &record.scope;
                scope.country.matches(query.country)
                    && scope.engagement_model == query.engagement_model
                    && scope.membership_status == query.membership_status
                    && attribute_eq(&scope.organization_type, query.organization_type)
                    && attribute_eq(&scope.entity_type, query.entity_type)
            })
            .collect()
    }

    /// Returns membership fee records for the classification, exact country
    /// or Global.
    #[must_use]
    pub fn find_membership_fees(
        &self,
        country: &CountryCode,
        organization_type: &str,
        entity_type: &str,
    ) -> Vec<&MembershipFeeRecord> {
        self.membership_fees
            .iter()
            .filter(|record| {
                record.country.matches(country)
                    && attribute_eq(&record.organization_type, organization_type)
                    && attribute_eq(&record.entity_type, entity_type)
            })
            .collect()
    }

    /// Rejects a new record if an active record with the same key has an
    /// overlapping validity window.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::Overlap` naming the conflicting record.
    pub fn check_overlap(&self, candidate: &PricingConfigRecord) -> Result<(), PricingError> {
        if !candidate.is_active {
            return Ok(());
        }
        match self.configs.iter().find(|existing| {
            existing.is_active
                && existing.id != candidate.id
                && existing.scope.same_key(&candidate.scope)
                && existing.window_overlaps(candidate)
        }) {
            Some(existing) => Err(PricingError::Overlap {
                existing: existing.id,
            }),
            None => Ok(()),
        }
    }

    /// Rejects a membership fee record that duplicates an active one.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidConfig` when an active record has the
    /// same country and classification.
    pub fn check_membership_fee_duplicate(
        &self,
        candidate: &MembershipFeeRecord,
    ) -> Result<(), PricingError> {
        let duplicate = self.membership_fees.iter().any(|existing| {
            existing.is_active
                && existing.id != candidate.id
                && existing.country == candidate.country
                && attribute_eq(&existing.organization_type, &candidate.organization_type)
                && attribute_eq(&existing.entity_type, &candidate.entity_type)
        });
        if duplicate {
            return Err(PricingError::InvalidConfig(format!(
                "an active membership fee already exists for {} / {} / {}",
                candidate.country, candidate.organization_type, candidate.entity_type
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::types::{
        CountryScope, FrequencyFees, MembershipFees, NewMembershipFee, NewPricingConfig,
        PricingScope, PricingUnit,
    };
    use chrono::{Duration, Utc};
    use orgdesk_shared::types::CurrencyCode;
    use rust_decimal_macros::dec;

    fn config(country: CountryScope, org_type: &str, model: EngagementModel) -> PricingConfigRecord {
        let now = Utc::now();
        NewPricingConfig {
            scope: PricingScope {
                country,
                organization_type: org_type.to_string(),
                entity_type: "Private Limited".to_string(),
                engagement_model: model,
                membership_status: MembershipStatus::Member,
            },
            unit: PricingUnit::Percentage(dec!(10)),
            discount_percentage: Some(dec!(20)),
            frequency_fees: FrequencyFees::default(),
            currency: CurrencyCode::parse("INR").unwrap(),
            effective_from: now - Duration::days(1),
            effective_to: None,
        }
        .into_record(now)
    }

    fn india() -> CountryCode {
        CountryCode::parse("IN").unwrap()
    }

    #[test]
    fn test_find_candidates_matches_exact_and_global() {
        let catalog = PricingCatalog::new(
            1,
            vec![
                config(CountryScope::Country(india()), "MSME", EngagementModel::MarketPlace),
                config(CountryScope::Global, "msme ", EngagementModel::MarketPlace),
                config(
                    CountryScope::Country(CountryCode::parse("FR").unwrap()),
                    "MSME",
                    EngagementModel::MarketPlace,
                ),
                config(CountryScope::Global, "MSME", EngagementModel::PlatformAsAService),
            ],
            vec![],
        );
        let country = india();
        let query = PricingQuery {
            country: &country,
            organization_type: "MSME",
            entity_type: "private limited",
            engagement_model: EngagementModel::MarketPlace,
            membership_status: MembershipStatus::Member,
        };

        let candidates = catalog.find_candidates(&query);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, catalog.configs()[0].id);
        assert_eq!(candidates[1].id, catalog.configs()[1].id);
    }

    #[test]
    fn test_find_candidates_empty_is_valid() {
        let catalog = PricingCatalog::default();
        let country = india();
        let query = PricingQuery {
            country: &country,
            organization_type: "MSME",
            entity_type: "Trust",
            engagement_model: EngagementModel::MarketPlace,
            membership_status: MembershipStatus::NotAMember,
        };
        assert!(catalog.find_candidates(&query).is_empty());
    }

    #[test]
    fn test_check_overlap() {
        let existing = config(CountryScope::Global, "MSME", EngagementModel::MarketPlace);
        let catalog = PricingCatalog::new(1, vec![existing.clone()], vec![]);

        let clash = config(CountryScope::Global, "MSME", EngagementModel::MarketPlace);
        assert!(matches!(
            catalog.check_overlap(&clash),
            Err(PricingError::Overlap { existing: id }) if id == existing.id
        ));

        let other_key = config(CountryScope::Country(india()), "MSME", EngagementModel::MarketPlace);
        assert!(catalog.check_overlap(&other_key).is_ok());

        let mut later = clash;
        later.effective_from = Utc::now() + Duration::days(30);
        // The existing record is open-ended, so a later start still overlaps.
        assert!(catalog.check_overlap(&later).is_err());
    }

    #[test]
    fn test_membership_fee_lookup_and_duplicates() {
        let record = NewMembershipFee {
            country: CountryScope::Global,
            organization_type: "MSME".to_string(),
            entity_type: "Trust".to_string(),
            fees: MembershipFees {
                annual: Some(dec!(1200)),
                ..MembershipFees::default()
            },
            currency: CurrencyCode::parse("INR").unwrap(),
        }
        .into_record(Utc::now());
        let catalog = PricingCatalog::new(1, vec![], vec![record.clone()]);

        assert_eq!(catalog.find_membership_fees(&india(), "msme", "trust").len(), 1);
        assert!(catalog.find_membership_fees(&india(), "MSME", "Society").is_empty());

        let mut duplicate = record;
        duplicate.id = orgdesk_shared::types::MembershipFeeId::new();
        assert!(catalog.check_membership_fee_duplicate(&duplicate).is_err());
    }
}
