//! Errors surfaced by the onboarding facade.

use orgdesk_shared::types::OrganizationId;
use thiserror::Error;

use crate::activation::ActivationError;
use crate::error::ErrorKind;
use crate::payment::PaymentError;
use crate::pricing::PricingError;
use crate::provisioning::ProvisioningError;
use crate::store::StoreError;
use crate::validation::WorkflowError;

/// Every way an onboarding operation can fail.
#[derive(Debug, Error)]
pub enum OnboardingError {
    /// The organization does not exist.
    #[error("Organization {0} not found")]
    OrganizationNotFound(OrganizationId),

    /// The organization has been deactivated.
    #[error("Organization {0} is inactive")]
    OrganizationInactive(OrganizationId),

    /// Registration details failed validation.
    #[error("Invalid organization details: {0}")]
    InvalidInput(String),

    /// The caller may not perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Every retry of a conditional write lost to a concurrent writer.
    #[error("Organization {0} is being updated concurrently; retry the request")]
    Contention(OrganizationId),

    /// Catalog write refused.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Activation refused.
    #[error(transparent)]
    Activation(#[from] ActivationError),

    /// Payment submission refused.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Validation transition refused.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Administrator provisioning refused.
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OnboardingError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::OrganizationNotFound(_) => ErrorKind::NotFound,
            Self::OrganizationInactive(_) | Self::InvalidInput(_) => ErrorKind::Rejected,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Contention(_) => ErrorKind::Persistence,
            Self::Pricing(err) => err.kind(),
            Self::Activation(err) => err.kind(),
            Self::Payment(err) => err.kind(),
            Self::Workflow(err) => err.kind(),
            Self::Provisioning(err) => err.kind(),
            Self::Store(err) => err.kind(),
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
            Self::OrganizationNotFound(_) => "ORGANIZATION_NOT_FOUND",
            Self::OrganizationInactive(_) => "ORGANIZATION_INACTIVE",
            Self::InvalidInput(_) => "INVALID_ORGANIZATION",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Contention(_) => "CONCURRENT_UPDATE",
            Self::Pricing(err) => err.error_code(),
            Self::Activation(err) => err.error_code(),
            Self::Payment(err) => err.error_code(),
            Self::Workflow(err) => err.error_code(),
            Self::Provisioning(err) => err.error_code(),
            Self::Store(err) => err.error_code(),
        }
    }
}
