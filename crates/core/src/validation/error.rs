//! Validation workflow error types.

use orgdesk_shared::types::OrganizationId;
use thiserror::Error;

use crate::error::ErrorKind;
use crate::validation::types::{StageStatus, ValidationStage};

/// Errors that can occur during validation workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The stage's current value does not allow the requested move.
    #[error("Invalid {} transition from {} to {}", .to.stage(), .from.as_str(), .to.as_str())]
    InvalidTransition {
        /// The current value.
        from: StageStatus,
        /// The requested value.
        to: StageStatus,
    },

    /// Declining or invalidating requires a reason.
    #[error("A reason is required to set {0}")]
    ReasonRequired(StageStatus),

    /// The authorization stage is derived and cannot be set directly.
    #[error("The admin_authorization stage is derived from payment and document validation")]
    DerivedStage,

    /// The requested status name is not valid for the stage.
    #[error("Unknown {stage} status: {value}")]
    UnknownStatus {
        /// The stage addressed.
        stage: ValidationStage,
        /// The unrecognized value.
        value: String,
    },

    /// No payment has been submitted, so there is nothing to validate.
    #[error("No validation status for organization {0}: no payment submitted")]
    StatusNotFound(OrganizationId),
}

impl WorkflowError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::ReasonRequired(_) | Self::DerivedStage | Self::UnknownStatus { .. } => {
                ErrorKind::Rejected
            }
            Self::StatusNotFound(_) => ErrorKind::NotFound,
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
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ReasonRequired(_) => "REASON_REQUIRED",
            Self::DerivedStage => "DERIVED_STAGE",
            Self::UnknownStatus { .. } => "UNKNOWN_STATUS",
            Self::StatusNotFound(_) => "VALIDATION_STATUS_NOT_FOUND",
        }
    }
}
