//! Engagement activation records.

use chrono::{DateTime, Utc};
use orgdesk_shared::types::{ActivationId, CurrencyCode, OrganizationId, PricingConfigId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{BillingFrequency, EngagementModel, MembershipStatus, PricingUnit};

/// Longest accepted idempotency key.
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 128;

/// Immutable record of an accepted pricing selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementActivation {
    /// Activation id.
    pub id: ActivationId,
    /// Organization activated.
    pub organization_id: OrganizationId,
    /// Engagement model chosen.
    pub engagement_model: EngagementModel,
    /// Membership status the price was resolved for.
    pub membership_status: MembershipStatus,
    /// Billing frequency for subscription pricing.
    pub billing_frequency: Option<BillingFrequency>,
    /// Price before discount.
    pub original_price: PricingUnit,
    /// Discount applied, if any.
    pub discount_percentage: Option<Decimal>,
    /// Price after discount.
    pub final_price: PricingUnit,
    /// Currency of the pricing record.
    pub currency: CurrencyCode,
    /// Pricing record the price came from.
    pub pricing_config_id: PricingConfigId,
    /// Always true; activations without accepted terms are rejected.
    pub terms_accepted: bool,
    /// User who activated.
    pub activated_by: UserId,
    /// Client-supplied key for safe retries.
    pub idempotency_key: Option<String>,
    /// When the activation was recorded.
    pub created_at: DateTime<Utc>,
}

/// Request to activate an engagement model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationRequest {
    /// Engagement model chosen.
    pub engagement_model: EngagementModel,
    /// Membership status to price for.
    pub membership_status: MembershipStatus,
    /// Billing frequency for subscription pricing.
    pub billing_frequency: Option<BillingFrequency>,
    /// Whether the terms were accepted.
    pub terms_accepted: bool,
    /// Client-supplied key for safe retries.
    pub idempotency_key: Option<String>,
}
