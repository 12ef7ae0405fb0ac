//! Activation error types.

use orgdesk_shared::types::{ActivationId, OrganizationId};
use thiserror::Error;

use crate::error::ErrorKind;
use crate::pricing::{BillingFrequency, NotFoundReason};

/// Reasons an activation is refused.
#[derive(Debug, Error)]
pub enum ActivationError {
    /// Terms and conditions were not accepted.
    #[error("Terms and conditions must be accepted")]
    TermsNotAccepted,

    /// No price could be resolved for the selection.
    #[error("Cannot activate: {0}")]
    PricingNotFound(NotFoundReason),

    /// The caller does not act for the organization.
    #[error("Caller is not associated with organization {0}")]
    NotAssociated(OrganizationId),

    /// The organization has been deactivated.
    #[error("Organization {0} is inactive")]
    OrganizationInactive(OrganizationId),

    /// The selected frequency differs from the one the price was resolved for.
    #[error("Selected billing frequency {} does not match resolved frequency {}", display(.selected), display(.resolved))]
    FrequencyMismatch {
        /// Frequency the caller selected.
        selected: Option<BillingFrequency>,
        /// Frequency the price was resolved for.
        resolved: Option<BillingFrequency>,
    },

    /// The idempotency key is blank or too long.
    #[error("Invalid idempotency key")]
    InvalidIdempotencyKey,

    /// An activation referenced by id does not exist for the organization.
    #[error("Activation {0} not found")]
    ActivationNotFound(ActivationId),
}

fn display(frequency: &Option<BillingFrequency>) -> &'static str {
    frequency.map_or("none", |f| f.as_str())
}

impl ActivationError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ActivationNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Rejected,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TermsNotAccepted => "TERMS_NOT_ACCEPTED",
            Self::PricingNotFound(_) => "PRICING_NOT_FOUND",
            Self::NotAssociated(_) => "NOT_ASSOCIATED",
            Self::OrganizationInactive(_) => "ORGANIZATION_INACTIVE",
            Self::FrequencyMismatch { .. } => "FREQUENCY_MISMATCH",
            Self::InvalidIdempotencyKey => "INVALID_IDEMPOTENCY_KEY",
            Self::ActivationNotFound(_) => "ACTIVATION_NOT_FOUND",
        }
    }
}
