//! Application-wide error types.
//!
//! `AppError` is the HTTP-facing error. Its variants follow the onboarding
//! error taxonomy: missing configuration, rejected preconditions, out-of-order
//! workflow transitions and transient persistence failures each map to a
//! distinct status and code so clients can tell them apart.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource or configuration not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A precondition failed (terms not accepted, duplicate, missing field).
    #[error("Rejected: {0}")]
    Rejected(String),

    /// A workflow stage was called out of order or twice.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Storage or transport failure, safe to retry.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Rejected(_) => 422,
            Self::InvalidTransition(_) => 409,
            Self::Persistence(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Rejected(_) => "REJECTED",
            Self::InvalidTransition(_) => "INVALID_TRANSITION",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may retry with the same idempotency key.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Unauthorized(String::new()).status_code(), 401);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Rejected(String::new()).status_code(), 422);
        assert_eq!(AppError::InvalidTransition(String::new()).status_code(), 409);
        assert_eq!(AppError::Persistence(String::new()).status_code(), 503);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::Rejected(String::new()).error_code(), "REJECTED");
        assert_eq!(
            AppError::InvalidTransition(String::new()).error_code(),
            "INVALID_TRANSITION"
        );
        assert_eq!(
            AppError::Persistence(String::new()).error_code(),
            "PERSISTENCE_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("pricing not configured".into()).to_string(),
            "Not found: pricing not configured"
        );
        assert_eq!(
            AppError::Rejected("administrator already exists".into()).to_string(),
            "Rejected: administrator already exists"
        );
    }

    #[test]
    fn test_only_persistence_is_retryable() {
        assert!(AppError::Persistence("timeout".into()).is_retryable());
        assert!(!AppError::Rejected("dup".into()).is_retryable());
        assert!(!AppError::InvalidTransition("twice".into()).is_retryable());
    }
}
