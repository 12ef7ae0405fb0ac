//! Price resolution against a catalog snapshot.
//!
//! Selection order:
//! 1. Candidates matching the key with the exact country or Global.
//! 2. Only records active and effective at `now`.
//! 3. Exact country beats Global.
//! 4. Latest `effective_from`, then latest `created_at`, then catalog order.
//!
//! The final price is rounded once, after discount and frequency handling.

use chrono::{DateTime, Utc};
use orgdesk_shared::types::{CurrencyCode, MembershipFeeId, Money, PricingConfigId};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::fmt;

use super::catalog::{PricingCatalog, PricingQuery};
use super::types::{
    BillingFrequency, CURRENCY_DP, CountryScope, EngagementModel, MembershipFeeRecord,
    MembershipStatus, MembershipTerm, PricingConfigRecord, PricingUnit,
};
use crate::organization::OrganizationClassification;

/// Why no price could be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum NotFoundReason {
    /// No record matches the key, neither for the country nor Global.
    NoConfiguration,
    /// Records match the key but none is active on the requested date.
    NoEffectiveConfiguration,
    /// The fixed-fee record has no fee for the chosen billing frequency.
    FrequencyNotConfigured {
        /// The requested frequency.
        frequency: BillingFrequency,
    },
    /// No membership fee record matches, or it has no price for the term.
    MembershipFeeNotConfigured {
        /// The requested term.
        term: MembershipTerm,
    },
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConfiguration => {
                write!(f, "pricing not configured for this organization and engagement model")
            }
            Self::NoEffectiveConfiguration => {
                write!(f, "no pricing configuration is in effect for this date")
            }
            Self::FrequencyNotConfigured { frequency } => {
                write!(f, "billing frequency not configured: {frequency}")
            }
            Self::MembershipFeeNotConfigured { term } => {
                write!(f, "membership fee not configured for term {term}")
            }
        }
    }
}

/// A successfully resolved engagement price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPrice {
    /// Record the price came from.
    pub config_id: PricingConfigId,
    /// Scope the record matched with: the exact country or Global.
    pub scope: CountryScope,
    /// Engagement model priced.
    pub engagement_model: EngagementModel,
    /// Membership status priced.
    pub membership_status: MembershipStatus,
    /// Frequency used. Always `None` for percentage prices.
    pub billing_frequency: Option<BillingFrequency>,
    /// Price before discount.
    pub base: PricingUnit,
    /// Discount applied. `None` when no discount was applied.
    pub discount_percentage: Option<Decimal>,
    /// Price after discount, rounded.
    pub final_price: PricingUnit,
    /// Currency of the record.
    pub currency: CurrencyCode,
}

/// Outcome of [`PricingResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PriceResolution {
    /// A record matched.
    Resolved(ResolvedPrice),
    /// Nothing applicable. The reason says why.
    NotFound {
        /// Why nothing matched.
        reason: NotFoundReason,
    },
}

impl PriceResolution {
    /// Returns the resolved price, if any.
    #[must_use]
    pub const fn resolved(&self) -> Option<&ResolvedPrice> {
        match self {
            Self::Resolved(price) => Some(price),
            Self::NotFound { .. } => None,
        }
    }

    const fn not_found(reason: NotFoundReason) -> Self {
        Self::NotFound { reason }
    }
}

/// A resolved membership fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMembershipFee {
    /// Record the fee came from.
    pub record_id: MembershipFeeId,
    /// Scope the record matched with.
    pub scope: CountryScope,
    /// Term priced.
    pub term: MembershipTerm,
    /// Fee for the term.
    pub fee: Money,
}

/// Outcome of [`PricingResolver::resolve_membership_fee`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MembershipFeeResolution {
    /// A record matched.
    Resolved(ResolvedMembershipFee),
    /// Nothing applicable.
    NotFound {
        /// Why nothing matched.
        reason: NotFoundReason,
    },
}

/// Stateless resolver over catalog snapshots.
pub struct PricingResolver;

impl PricingResolver {
    /// Resolves the engagement price for an organization's selection.
    ///
    /// Pure: the same catalog, inputs and `now` always give the same result.
    #[must_use]
    pub fn resolve(
        catalog: &PricingCatalog,
        classification: &OrganizationClassification,
        engagement_model: EngagementModel,
        membership_status: MembershipStatus,
        frequency: Option<BillingFrequency>,
        now: DateTime<Utc>,
    ) -> PriceResolution {
        let query = PricingQuery {
            country: &classification.country,
            organization_type: &classification.organization_type,
            entity_type: &classification.entity_type,
            engagement_model,
            membership_status,
        };
        let candidates = catalog.find_candidates(&query);
        if candidates.is_empty() {
            return PriceResolution::not_found(NotFoundReason::NoConfiguration);
        }
        let Some(record) = Self::select_record(&candidates, now) else {
            return PriceResolution::not_found(NotFoundReason::NoEffectiveConfiguration);
        };

        let (base, billing_frequency) = match (&record.unit, frequency) {
            (PricingUnit::FixedAmount(_), Some(frequency)) => {
                match record.frequency_fees.fee_for(frequency) {
                    Some(fee) => (
                        PricingUnit::FixedAmount(Money::new(fee, record.currency.clone())),
                        Some(frequency),
                    ),
                    None => {
                        return PriceResolution::not_found(
                            NotFoundReason::FrequencyNotConfigured { frequency },
                        );
                    }
                }
            }
            (unit, _) => (unit.clone(), None),
        };

        let (final_value, discount_percentage) =
            Self::apply_discount(base.value(), record.discount_percentage, membership_status);

        PriceResolution::Resolved(ResolvedPrice {
            config_id: record.id,
            scope: record.scope.country.clone(),
            engagement_model,
            membership_status,
            billing_frequency,
            final_price: base.with_value(final_value).rounded(),
            base,
            discount_percentage,
            currency: record.currency.clone(),
        })
    }

    /// Picks the applicable record among candidates.
    ///
    /// Returns `None` when no candidate is active and effective at `now`.
    #[must_use]
    pub fn select_record<'a>(
        candidates: &[&'a PricingConfigRecord],
        now: DateTime<Utc>,
    ) -> Option<&'a PricingConfigRecord> {
        let effective: Vec<&PricingConfigRecord> = candidates
            .iter()
            .copied()
            .filter(|record| record.is_effective_at(now))
            .collect();
        let prefer_exact = effective.iter().any(|record| record.scope.country.is_exact());

        effective
            .into_iter()
            .filter(|record| record.scope.country.is_exact() == prefer_exact)
            .fold(None, |best: Option<&PricingConfigRecord>, record| match best {
                Some(current)
                    if (record.effective_from, record.created_at)
                        <= (current.effective_from, current.created_at) =>
                {
                    Some(current)
                }
                _ => Some(record),
            })
    }

    /// Applies a membership discount to a base value.
    ///
    /// Members with a configured discount pay `base * (1 - discount / 100)`.
    /// Everyone else pays `base`, and the returned discount is `None`.
    #[must_use]
    pub fn apply_discount(
        base: Decimal,
        discount_percentage: Option<Decimal>,
        membership_status: MembershipStatus,
    ) -> (Decimal, Option<Decimal>) {
        match (membership_status, discount_percentage) {
            (MembershipStatus::Member, Some(discount)) => (
                base * (Decimal::ONE - discount / Decimal::ONE_HUNDRED),
                Some(discount),
            ),
            _ => (base, None),
        }
    }

    /// Resolves the membership fee for a term, preferring the exact country
    /// over Global and the most recently created record.
    #[must_use]
    pub fn resolve_membership_fee(
        catalog: &PricingCatalog,
        classification: &OrganizationClassification,
        term: MembershipTerm,
    ) -> MembershipFeeResolution {
        let active: Vec<&MembershipFeeRecord> = catalog
            .find_membership_fees(
                &classification.country,
                &classification.organization_type,
                &classification.entity_type,
            )
            .into_iter()
            .filter(|record| record.is_active)
            .collect();
        let prefer_exact = active.iter().any(|record| record.country.is_exact());

        let selected = active
            .into_iter()
            .filter(|record| record.country.is_exact() == prefer_exact)
            .fold(None, |best: Option<&MembershipFeeRecord>, record| match best {
                Some(current) if record.created_at <= current.created_at => Some(current),
                _ => Some(record),
            });

        let not_found = MembershipFeeResolution::NotFound {
            reason: NotFoundReason::MembershipFeeNotConfigured { term },
        };
        let Some(record) = selected else {
            return not_found;
        };
        let Some(fee) = record.fees.fee_for(term) else {
            return not_found;
        };

        MembershipFeeResolution::Resolved(ResolvedMembershipFee {
            record_id: record.id,
            scope: record.country.clone(),
            term,
            fee: Money::new(
                fee.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointNearestEven),
                record.currency.clone(),
            ),
        })
    }
}
