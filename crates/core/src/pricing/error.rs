//! Pricing error types.
//!
//! Missing configuration is not an error: it is reported as
//! [`PriceResolution::NotFound`](super::PriceResolution::NotFound). These
//! errors cover catalog writes.

use thiserror::Error;

use crate::error::ErrorKind;
use orgdesk_shared::types::PricingConfigId;

/// Errors raised while writing the pricing catalog.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The record is internally inconsistent.
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),

    /// An active record for the same key already covers part of the window.
    #[error("Pricing configuration overlaps active record {existing} for the same key")]
    Overlap {
        /// The record already covering the window.
        existing: PricingConfigId,
    },
}

impl PricingError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig(_) | Self::Overlap { .. } => ErrorKind::Rejected,
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
            Self::InvalidConfig(_) => "INVALID_PRICING_CONFIG",
            Self::Overlap { .. } => "PRICING_OVERLAP",
        }
    }
}
