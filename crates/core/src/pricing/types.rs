//! Pricing domain types.
//!
//! Catalog records are keyed by (country, organization type, entity type,
//! engagement model, membership status). Every amount is a `Decimal`.

use chrono::{DateTime, Utc};
use orgdesk_shared::types::{CurrencyCode, MembershipFeeId, Money, PricingConfigId};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::organization::CountryCode;

/// Decimal places kept for currency amounts.
pub const CURRENCY_DP: u32 = 2;

/// Decimal places kept for percentages.
pub const PERCENTAGE_DP: u32 = 1;

/// How an organization engages with the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementModel {
    /// Commission on transactions. Usually priced as a percentage.
    MarketPlace,
    /// Subscription. Usually priced as a fixed fee per billing frequency.
    PlatformAsAService,
}

impl EngagementModel {
    /// Returns the string representation of the model.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarketPlace => "market_place",
            Self::PlatformAsAService => "platform_as_a_service",
        }
    }

    /// Parses a model from its code or display name.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "marketplace" => Some(Self::MarketPlace),
            "platformasaservice" | "paas" => Some(Self::PlatformAsAService),
            _ => None,
        }
    }
}

impl fmt::Display for EngagementModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the organization holds a paid membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Paid member. Eligible for membership discounts.
    Member,
    /// Not a member.
    NotAMember,
}

impl MembershipStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::NotAMember => "not_a_member",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "member" => Some(Self::Member),
            "not_a_member" | "non_member" => Some(Self::NotAMember),
            _ => None,
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Billing cadence for subscription-style engagement fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingFrequency {
    /// Every three months.
    Quarterly,
    /// Every six months.
    HalfYearly,
    /// Every twelve months.
    Annual,
}

impl BillingFrequency {
    /// Returns the string representation of the frequency.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quarterly => "quarterly",
            Self::HalfYearly => "half_yearly",
            Self::Annual => "annual",
        }
    }

    /// Parses a frequency from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "quarterly" => Some(Self::Quarterly),
            "half_yearly" => Some(Self::HalfYearly),
            "annual" | "annually" | "yearly" => Some(Self::Annual),
            _ => None,
        }
    }
}

impl fmt::Display for BillingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Term a membership fee is charged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTerm {
    /// One month.
    Monthly,
    /// Three months.
    Quarterly,
    /// Six months.
    HalfYearly,
    /// Twelve months.
    Annual,
}

impl MembershipTerm {
    /// Returns the string representation of the term.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::HalfYearly => "half_yearly",
            Self::Annual => "annual",
        }
    }

    /// Parses a term from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "half_yearly" => Some(Self::HalfYearly),
            "annual" | "annually" | "yearly" => Some(Self::Annual),
            _ => None,
        }
    }
}

impl fmt::Display for MembershipTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Country part of a catalog scoping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CountryScope {
    /// Applies to every country without a more specific record.
    Global,
    /// Applies to one country.
    Country(CountryCode),
}

impl CountryScope {
    /// Wire and storage name of the wildcard scope.
    pub const GLOBAL: &'static str = "Global";

    /// Returns true if a record with this scope applies to the country.
    #[must_use]
    pub fn matches(&self, country: &CountryCode) -> bool {
        match self {
            Self::Global => true,
            Self::Country(code) => code == country,
        }
    }

    /// Returns true for a country-specific scope.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        matches!(self, Self::Country(_))
    }

    /// Returns the stored representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Global => Self::GLOBAL,
            Self::Country(code) => code.as_str(),
        }
    }

    /// Parses a scope; `Global` is matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is neither `Global` nor a country code.
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.trim().eq_ignore_ascii_case(Self::GLOBAL) {
            Ok(Self::Global)
        } else {
            CountryCode::parse(s).map(Self::Country)
        }
    }
}

impl TryFrom<String> for CountryScope {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryScope> for String {
    fn from(scope: CountryScope) -> Self {
        scope.as_str().to_string()
    }
}

impl fmt::Display for CountryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price of an engagement model: a commission rate or a fixed fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PricingUnit {
    /// Percentage of transaction value, e.g. `10` for 10%.
    Percentage(Decimal),
    /// Fixed amount in a currency.
    FixedAmount(Money),
}

impl PricingUnit {
    /// Returns the numeric value regardless of unit.
    #[must_use]
    pub fn value(&self) -> Decimal {
        match self {
            Self::Percentage(value) => *value,
            Self::FixedAmount(money) => money.amount,
        }
    }

    /// Returns true for a percentage unit.
    #[must_use]
    pub const fn is_percentage(&self) -> bool {
        matches!(self, Self::Percentage(_))
    }

    /// Returns the same unit with a different value.
    #[must_use]
    pub fn with_value(&self, value: Decimal) -> Self {
        match self {
            Self::Percentage(_) => Self::Percentage(value),
            Self::FixedAmount(money) => Self::FixedAmount(money.with_amount(value)),
        }
    }

    /// Rounds the value to the unit's precision using banker's rounding.
    #[must_use]
    pub fn rounded(&self) -> Self {
        let dp = if self.is_percentage() {
            PERCENTAGE_DP
        } else {
            CURRENCY_DP
        };
        self.with_value(
            self.value()
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven),
        )
    }
}

impl fmt::Display for PricingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage(value) => write!(f, "{value}%"),
            Self::FixedAmount(money) => write!(f, "{money}"),
        }
    }
}

/// Optional fixed fees per billing frequency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyFees {
    /// Fee billed quarterly.
    pub quarterly: Option<Decimal>,
    /// Fee billed half-yearly.
    pub half_yearly: Option<Decimal>,
    /// Fee billed annually.
    pub annual: Option<Decimal>,
}

impl FrequencyFees {
    /// Returns the fee configured for a frequency.
    #[must_use]
    pub const fn fee_for(&self, frequency: BillingFrequency) -> Option<Decimal> {
        match frequency {
            BillingFrequency::Quarterly => self.quarterly,
            BillingFrequency::HalfYearly => self.half_yearly,
            BillingFrequency::Annual => self.annual,
        }
    }

    fn amounts(&self) -> impl Iterator<Item = Decimal> {
        [self.quarterly, self.half_yearly, self.annual]
            .into_iter()
            .flatten()
    }
}

/// Full scoping key of a pricing record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PricingScope {
    /// Country or the Global wildcard.
    pub country: CountryScope,
    /// Organization type, e.g. "MSME".
    pub organization_type: String,
    /// Entity type, e.g. "Private Limited".
    pub entity_type: String,
    /// Engagement model priced by the record.
    pub engagement_model: EngagementModel,
    /// Membership status priced by the record.
    pub membership_status: MembershipStatus,
}

impl PricingScope {
    /// Returns true if both keys address the same slot of the catalog.
    #[must_use]
    pub fn same_key(&self, other: &Self) -> bool {
        self.country == other.country
            && self.engagement_model == other.engagement_model
            && self.membership_status == other.membership_status
            && attribute_eq(&self.organization_type, &other.organization_type)
            && attribute_eq(&self.entity_type, &other.entity_type)
    }
}

/// Compares classification attributes case-insensitively after trimming.
#[must_use]
pub fn attribute_eq(left: &str, right: &str) -> bool {
    left.trim().eq_ignore_ascii_case(right.trim())
}

/// A priced catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfigRecord {
    /// Record id.
    pub id: PricingConfigId,
    /// Scoping key.
    pub scope: PricingScope,
    /// Base price.
    pub unit: PricingUnit,
    /// Discount percentage granted to members.
    pub discount_percentage: Option<Decimal>,
    /// Fixed fees per billing frequency.
    pub frequency_fees: FrequencyFees,
    /// Currency of every amount on the record.
    pub currency: CurrencyCode,
    /// Start of validity (inclusive).
    pub effective_from: DateTime<Utc>,
    /// End of validity (inclusive). Open-ended when absent.
    pub effective_to: Option<DateTime<Utc>>,
    /// Inactive records never resolve.
    pub is_active: bool,
    /// Creation time, used as a tie-break.
    pub created_at: DateTime<Utc>,
}

impl PricingConfigRecord {
    /// Returns true if the record is active and its window contains `now`.
    #[must_use]
    pub fn is_effective_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.effective_from <= now
            && self.effective_to.is_none_or(|to| now <= to)
    }

    /// Returns true if the validity windows of two records intersect.
    #[must_use]
    pub fn window_overlaps(&self, other: &Self) -> bool {
        let starts_before_other_ends = other.effective_to.is_none_or(|to| self.effective_from <= to);
        let other_starts_before_end = self.effective_to.is_none_or(|to| other.effective_from <= to);
        starts_before_other_ends && other_starts_before_end
    }
}

/// Input for a new pricing record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPricingConfig {
    /// Scoping key.
    pub scope: PricingScope,
    /// Base price.
    pub unit: PricingUnit,
    /// Discount percentage granted to members.
    pub discount_percentage: Option<Decimal>,
    /// Fixed fees per billing frequency.
    #[serde(default)]
    pub frequency_fees: FrequencyFees,
    /// Currency of every amount on the record.
    pub currency: CurrencyCode,
    /// Start of validity.
    pub effective_from: DateTime<Utc>,
    /// End of validity.
    pub effective_to: Option<DateTime<Utc>>,
}

impl NewPricingConfig {
    /// Checks the record's own consistency, returning the first problem found.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when an amount is negative, a discount
    /// falls outside 0..=100, the currencies disagree, the window is inverted
    /// or a scoping attribute is blank.
    pub fn check(&self) -> Result<(), String> {
        if self.scope.organization_type.trim().is_empty() || self.scope.entity_type.trim().is_empty()
        {
            return Err("organization type and entity type are required".to_string());
        }
        if self.unit.value().is_sign_negative() {
            return Err("base price must not be negative".to_string());
        }
        if let PricingUnit::FixedAmount(money) = &self.unit
            && money.currency != self.currency
        {
            return Err(format!(
                "fixed amount currency {} does not match record currency {}",
                money.currency, self.currency
            ));
        }
        if let Some(discount) = self.discount_percentage
            && (discount.is_sign_negative() || discount > Decimal::ONE_HUNDRED)
        {
            return Err("discount percentage must be between 0 and 100".to_string());
        }
        if self.frequency_fees.amounts().any(|fee| fee.is_sign_negative()) {
            return Err("billing frequency fees must not be negative".to_string());
        }
        if self
            .effective_to
            .is_some_and(|to| to < self.effective_from)
        {
            return Err("effective_to must not precede effective_from".to_string());
        }
        Ok(())
    }

    /// Builds the stored record.
    #[must_use]
    pub fn into_record(self, now: DateTime<Utc>) -> PricingConfigRecord {
        PricingConfigRecord {
            id: PricingConfigId::new(),
            scope: self.scope,
            unit: self.unit,
            discount_percentage: self.discount_percentage,
            frequency_fees: self.frequency_fees,
            currency: self.currency,
            effective_from: self.effective_from,
            effective_to: self.effective_to,
            is_active: true,
            created_at: now,
        }
    }
}

/// Membership prices per term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipFees {
    /// Monthly price.
    pub monthly: Option<Decimal>,
    /// Quarterly price.
    pub quarterly: Option<Decimal>,
    /// Half-yearly price.
    pub half_yearly: Option<Decimal>,
    /// Annual price.
    pub annual: Option<Decimal>,
}

impl MembershipFees {
    /// Returns the price configured for a term.
    #[must_use]
    pub const fn fee_for(&self, term: MembershipTerm) -> Option<Decimal> {
        match term {
            MembershipTerm::Monthly => self.monthly,
            MembershipTerm::Quarterly => self.quarterly,
            MembershipTerm::HalfYearly => self.half_yearly,
            MembershipTerm::Annual => self.annual,
        }
    }
}

/// Membership fee catalog entry. Independent of engagement model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipFeeRecord {
    /// Record id.
    pub id: MembershipFeeId,
    /// Country or the Global wildcard.
    pub country: CountryScope,
    /// Organization type.
    pub organization_type: String,
    /// Entity type.
    pub entity_type: String,
    /// Prices per term.
    pub fees: MembershipFees,
    /// Currency of the prices.
    pub currency: CurrencyCode,
    /// Inactive records never resolve.
    pub is_active: bool,
    /// Creation time, used as a tie-break.
    pub created_at: DateTime<Utc>,
}

/// Input for a new membership fee record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMembershipFee {
    /// Country or the Global wildcard.
    pub country: CountryScope,
    /// Organization type.
    pub organization_type: String,
    /// Entity type.
    pub entity_type: String,
    /// Prices per term.
    pub fees: MembershipFees,
    /// Currency of the prices.
    pub currency: CurrencyCode,
}

impl NewMembershipFee {
    /// Checks the record's own consistency.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason for the first problem found.
    pub fn check(&self) -> Result<(), String> {
        if self.organization_type.trim().is_empty() || self.entity_type.trim().is_empty() {
            return Err("organization type and entity type are required".to_string());
        }
        let fees = [
            self.fees.monthly,
            self.fees.quarterly,
            self.fees.half_yearly,
            self.fees.annual,
        ];
        if fees.iter().flatten().any(|fee| fee.is_sign_negative()) {
            return Err("membership fees must not be negative".to_string());
        }
        if fees.iter().all(Option::is_none) {
            return Err("at least one membership term must be priced".to_string());
        }
        Ok(())
    }

    /// Builds the stored record.
    #[must_use]
    pub fn into_record(self, now: DateTime<Utc>) -> MembershipFeeRecord {
        MembershipFeeRecord {
            id: MembershipFeeId::new(),
            country: self.country,
            organization_type: self.organization_type,
            entity_type: self.entity_type,
            fees: self.fees,
            currency: self.currency,
            is_active: true,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn inr() -> CurrencyCode {
        CurrencyCode::parse("INR").unwrap()
    }

    #[rstest]
    #[case("Market Place", Some(EngagementModel::MarketPlace))]
    #[case("marketplace", Some(EngagementModel::MarketPlace))]
    #[case("market_place", Some(EngagementModel::MarketPlace))]
    #[case("Platform as a Service", Some(EngagementModel::PlatformAsAService))]
    #[case("PaaS", Some(EngagementModel::PlatformAsAService))]
    #[case("aggregator", None)]
    fn test_engagement_model_parse(#[case] input: &str, #[case] expected: Option<EngagementModel>) {
        assert_eq!(EngagementModel::parse(input), expected);
    }

    #[rstest]
    #[case("member", Some(MembershipStatus::Member))]
    #[case("not-a-member", Some(MembershipStatus::NotAMember))]
    #[case("Not_A_Member", Some(MembershipStatus::NotAMember))]
    #[case("gold", None)]
    fn test_membership_status_parse(
        #[case] input: &str,
        #[case] expected: Option<MembershipStatus>,
    ) {
        assert_eq!(MembershipStatus::parse(input), expected);
    }

    #[test]
    fn test_frequency_and_term_parse() {
        assert_eq!(BillingFrequency::parse("half-yearly"), Some(BillingFrequency::HalfYearly));
        assert_eq!(BillingFrequency::parse("monthly"), None);
        assert_eq!(MembershipTerm::parse("Monthly"), Some(MembershipTerm::Monthly));
    }

    #[test]
    fn test_country_scope_parse() {
        assert_eq!(CountryScope::parse("global").unwrap(), CountryScope::Global);
        let india = CountryScope::parse("in").unwrap();
        assert!(india.is_exact());
        assert_eq!(india.as_str(), "IN");
        assert!(CountryScope::parse("").is_err());
    }

    #[test]
    fn test_country_scope_matches() {
        let india = CountryCode::parse("IN").unwrap();
        let france = CountryCode::parse("FR").unwrap();
        assert!(CountryScope::Global.matches(&india));
        assert!(CountryScope::Country(india.clone()).matches(&india));
        assert!(!CountryScope::Country(india).matches(&france));
    }

    #[test]
    fn test_pricing_unit_serde_is_tagged() {
        let json = serde_json::to_value(PricingUnit::Percentage(dec!(10))).unwrap();
        assert_eq!(json["kind"], "percentage");
        assert_eq!(json["value"], "10");

        let fixed: PricingUnit =
            serde_json::from_str(r#"{"kind":"fixed_amount","value":{"amount":"500","currency":"inr"}}"#)
                .unwrap();
        assert_eq!(fixed, PricingUnit::FixedAmount(Money::new(dec!(500), inr())));
    }

    #[rstest]
    #[case(PricingUnit::Percentage(dec!(8.25)), dec!(8.2))]
    #[case(PricingUnit::Percentage(dec!(8.35)), dec!(8.4))]
    #[case(PricingUnit::FixedAmount(Money::new(dec!(10.125), CurrencyCode::parse("INR").unwrap())), dec!(10.12))]
    #[case(PricingUnit::FixedAmount(Money::new(dec!(10.135), CurrencyCode::parse("INR").unwrap())), dec!(10.14))]
    fn test_rounding_is_bankers(#[case] unit: PricingUnit, #[case] expected: Decimal) {
        assert_eq!(unit.rounded().value(), expected);
    }

    fn record(from: DateTime<Utc>, to: Option<DateTime<Utc>>) -> PricingConfigRecord {
        NewPricingConfig {
            scope: PricingScope {
                country: CountryScope::Global,
                organization_type: "MSME".to_string(),
                entity_type: "Private Limited".to_string(),
                engagement_model: EngagementModel::MarketPlace,
                membership_status: MembershipStatus::Member,
            },
            unit: PricingUnit::Percentage(dec!(10)),
            discount_percentage: None,
            frequency_fees: FrequencyFees::default(),
            currency: inr(),
            effective_from: from,
            effective_to: to,
        }
        .into_record(from)
    }

    #[test]
    fn test_effective_window_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = start + Duration::days(30);
        let rec = record(start, Some(end));
        assert!(rec.is_effective_at(start));
        assert!(rec.is_effective_at(end));
        assert!(!rec.is_effective_at(start - Duration::seconds(1)));
        assert!(!rec.is_effective_at(end + Duration::seconds(1)));

        let inactive = PricingConfigRecord {
            is_active: false,
            ..rec
        };
        assert!(!inactive.is_effective_at(start));
    }

    #[test]
    fn test_window_overlap() {
        let jan = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mar = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let open_from_jan = record(jan, None);
        let jan_only = record(jan, Some(feb - Duration::seconds(1)));
        let from_feb = record(feb, Some(mar));

        assert!(open_from_jan.window_overlaps(&from_feb));
        assert!(!jan_only.window_overlaps(&from_feb));
        assert!(from_feb.window_overlaps(&open_from_jan));
    }

    #[test]
    fn test_new_pricing_config_check() {
        let now = Utc::now();
        let mut input = NewPricingConfig {
            scope: record(now, None).scope,
            unit: PricingUnit::Percentage(dec!(10)),
            discount_percentage: Some(dec!(20)),
            frequency_fees: FrequencyFees::default(),
            currency: inr(),
            effective_from: now,
            effective_to: None,
        };
        assert!(input.check().is_ok());

        input.discount_percentage = Some(dec!(120));
        assert!(input.check().unwrap_err().contains("discount"));

        input.discount_percentage = None;
        input.unit = PricingUnit::FixedAmount(Money::new(dec!(100), CurrencyCode::parse("USD").unwrap()));
        assert!(input.check().unwrap_err().contains("currency"));

        input.unit = PricingUnit::Percentage(dec!(10));
        input.effective_to = Some(now - Duration::days(1));
        assert!(input.check().unwrap_err().contains("effective_to"));
    }

    #[test]
    fn test_new_membership_fee_check() {
        let mut input = NewMembershipFee {
            country: CountryScope::Global,
            organization_type: "MSME".to_string(),
            entity_type: "Trust".to_string(),
            fees: MembershipFees::default(),
            currency: inr(),
        };
        assert!(input.check().is_err());
        input.fees.annual = Some(dec!(1200));
        assert!(input.check().is_ok());
    }
}
