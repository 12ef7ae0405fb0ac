//! Turns a resolved price into an activation record.

use chrono::{DateTime, Utc};
use orgdesk_shared::types::ActivationId;

use super::error::ActivationError;
use super::types::{EngagementActivation, MAX_IDEMPOTENCY_KEY_LEN};
use crate::auth::Actor;
use crate::organization::OrganizationProfile;
use crate::pricing::{BillingFrequency, PriceResolution};

/// Stateless activation recorder.
///
/// Builds the immutable record; appending it is the caller's job. The
/// organization profile is not touched.
pub struct ActivationRecorder;

impl ActivationRecorder {
    /// Validates the preconditions and builds the activation record.
    ///
    /// # Errors
    ///
    /// Returns the first unmet precondition, checked in this order: terms,
    /// organization active, caller associated, price resolved, frequency
    /// consistent, idempotency key well-formed.
    pub fn activate(
        organization: &OrganizationProfile,
        resolution: &PriceResolution,
        selected_frequency: Option<BillingFrequency>,
        terms_accepted: bool,
        actor: &Actor,
        idempotency_key: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<EngagementActivation, ActivationError> {
        if !terms_accepted {
            return Err(ActivationError::TermsNotAccepted);
        }
        if !organization.is_active {
            return Err(ActivationError::OrganizationInactive(organization.id));
        }
        if actor.organization_id != organization.id {
            return Err(ActivationError::NotAssociated(organization.id));
        }
        let price = match resolution {
            PriceResolution::Resolved(price) => price,
            PriceResolution::NotFound { reason } => {
                return Err(ActivationError::PricingNotFound(reason.clone()));
            }
        };
        if price.billing_frequency.is_some() && price.billing_frequency != selected_frequency {
            return Err(ActivationError::FrequencyMismatch {
                selected: selected_frequency,
                resolved: price.billing_frequency,
            });
        }
        let idempotency_key = Self::normalize_key(idempotency_key)?;

        Ok(EngagementActivation {
            id: ActivationId::new(),
            organization_id: organization.id,
            engagement_model: price.engagement_model,
            membership_status: price.membership_status,
            billing_frequency: price.billing_frequency,
            original_price: price.base.clone(),
            discount_percentage: price.discount_percentage,
            final_price: price.final_price.clone(),
            currency: price.currency.clone(),
            pricing_config_id: price.config_id,
            terms_accepted,
            activated_by: actor.user_id,
            idempotency_key,
            created_at: now,
        })
    }

    fn normalize_key(key: Option<String>) -> Result<Option<String>, ActivationError> {
        match key {
            None => Ok(None),
            Some(key) => {
                let key = key.trim();
                if key.is_empty() || key.len() > MAX_IDEMPOTENCY_KEY_LEN {
                    Err(ActivationError::InvalidIdempotencyKey)
                } else {
                    Ok(Some(key.to_string()))
                }
            }
        }
    }
}
