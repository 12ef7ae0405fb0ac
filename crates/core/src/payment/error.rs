//! Payment submission error types.

use thiserror::Error;

use crate::error::ErrorKind;
use crate::validation::PaymentStatus;

/// Reasons a payment submission is refused.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The submission is malformed.
    #[error("Invalid payment: {0}")]
    Invalid(String),

    /// No engagement has been activated yet.
    #[error("No engagement activation found; activate an engagement model before paying")]
    NoActivation,

    /// A payment is already under review or approved.
    #[error("A payment is already {}; a new submission is accepted only after a decline", .0.as_str())]
    AlreadySubmitted(PaymentStatus),

    /// The receipt number was used for a different payment.
    #[error("Receipt number {0} was already used for a different payment")]
    ReceiptReused(String),
}

impl PaymentError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Rejected
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
            Self::Invalid(_) => "INVALID_PAYMENT",
            Self::NoActivation => "NO_ACTIVATION",
            Self::AlreadySubmitted(_) => "PAYMENT_ALREADY_SUBMITTED",
            Self::ReceiptReused(_) => "RECEIPT_REUSED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_submitted_message() {
        let err = PaymentError::AlreadySubmitted(PaymentStatus::Pending);
        assert_eq!(err.status_code(), 422);
        assert!(err.to_string().contains("already pending"));
    }
}
