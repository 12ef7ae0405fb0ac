//! Administrator provisioning error types.

use orgdesk_shared::types::{CredentialId, OrganizationId};
use thiserror::Error;

use crate::auth::PasswordError;
use crate::error::ErrorKind;
use crate::validation::{AuthorizationStatus, Prerequisite, WorkflowError};

/// Reasons an administrator cannot be created or updated.
#[derive(Debug, Error)]
pub enum ProvisioningError {
    /// The organization already has an active administrator.
    #[error("Administrator already exists for organization {0}")]
    AlreadyExists(OrganizationId),

    /// No payment has been submitted, so validation has not started.
    #[error("Administrator cannot be created: no payment has been submitted")]
    ValidationNotStarted,

    /// The authorization gate is not open.
    #[error("Administrator cannot be created: {}", describe_gate(.status, .outstanding))]
    GateNotOpen {
        /// Current authorization status.
        status: AuthorizationStatus,
        /// Prerequisites still outstanding.
        outstanding: Vec<Prerequisite>,
    },

    /// Name, email or contact failed validation.
    #[error("Invalid administrator details: {0}")]
    InvalidInput(String),

    /// The credential does not exist.
    #[error("Administrator {0} not found")]
    CredentialNotFound(CredentialId),

    /// The credential has been deactivated.
    #[error("Administrator {0} is inactive")]
    CredentialInactive(CredentialId),

    /// The update changes nothing.
    #[error("No administrator fields to update")]
    NothingToUpdate,

    /// The workflow refused the authorization step.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Hashing the secret failed.
    #[error("Secret hashing failed: {0}")]
    Secret(#[from] PasswordError),
}

fn describe_gate(status: &AuthorizationStatus, outstanding: &[Prerequisite]) -> String {
    if *status == AuthorizationStatus::Authorized {
        return "administrator authorization has already been used".to_string();
    }
    let pending: Vec<String> = outstanding.iter().map(ToString::to_string).collect();
    if pending.is_empty() {
        format!("authorization is {}", status.as_str())
    } else {
        pending.join(" and ")
    }
}

impl ProvisioningError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CredentialNotFound(_) => ErrorKind::NotFound,
            Self::Workflow(err) => err.kind(),
            Self::Secret(_) => ErrorKind::Internal,
            Self::AlreadyExists(_)
            | Self::ValidationNotStarted
            | Self::GateNotOpen { .. }
            | Self::InvalidInput(_)
            | Self::CredentialInactive(_)
            | Self::NothingToUpdate => ErrorKind::Rejected,
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
            Self::AlreadyExists(_) => "ADMINISTRATOR_EXISTS",
            Self::ValidationNotStarted => "VALIDATION_NOT_STARTED",
            Self::GateNotOpen { .. } => "AUTHORIZATION_NOT_READY",
            Self::InvalidInput(_) => "INVALID_ADMINISTRATOR",
            Self::CredentialNotFound(_) => "ADMINISTRATOR_NOT_FOUND",
            Self::CredentialInactive(_) => "ADMINISTRATOR_INACTIVE",
            Self::NothingToUpdate => "NOTHING_TO_UPDATE",
            Self::Workflow(err) => err.error_code(),
            Self::Secret(_) => "SECRET_HASHING_FAILED",
        }
    }
}
