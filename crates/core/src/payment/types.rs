//! Payment submission types.
//!
//! Payments are recorded for review, never processed.

use chrono::{DateTime, Utc};
use orgdesk_shared::types::{Money, OrganizationId, PaymentId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest accepted receipt number.
pub const MAX_RECEIPT_LEN: usize = 64;

/// How the organization paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Bank transfer.
    BankTransfer,
    /// Credit or debit card.
    Card,
    /// Unified Payments Interface.
    Upi,
    /// Cheque.
    Cheque,
    /// Cash.
    Cash,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankTransfer => "bank_transfer",
            Self::Card => "card",
            Self::Upi => "upi",
            Self::Cheque => "cheque",
            Self::Cash => "cash",
        }
    }

    /// Parses a method from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "bank_transfer" | "neft" | "wire" => Some(Self::BankTransfer),
            "card" => Some(Self::Card),
            "upi" => Some(Self::Upi),
            "cheque" | "check" => Some(Self::Cheque),
            "cash" => Some(Self::Cash),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment submitted for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSubmission {
    /// Amount paid.
    pub amount: Money,
    /// How it was paid.
    pub method: PaymentMethod,
    /// Receipt number; unique per organization.
    pub receipt_number: String,
}

impl PaymentSubmission {
    /// Checks the submission, returning the normalized receipt number.
    ///
    /// # Errors
    ///
    /// Returns a reason when the amount is not positive or the receipt number
    /// is blank or too long.
    pub fn check(&self) -> Result<String, String> {
        if self.amount.is_zero() || self.amount.is_negative() {
            return Err("payment amount must be positive".to_string());
        }
        let receipt = self.receipt_number.trim();
        if receipt.is_empty() {
            return Err("receipt number is required".to_string());
        }
        if receipt.len() > MAX_RECEIPT_LEN {
            return Err(format!("receipt number exceeds {MAX_RECEIPT_LEN} characters"));
        }
        Ok(receipt.to_string())
    }
}

/// A recorded payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment id.
    pub id: PaymentId,
    /// Paying organization.
    pub organization_id: OrganizationId,
    /// Amount paid.
    pub amount: Money,
    /// How it was paid.
    pub method: PaymentMethod,
    /// Receipt number.
    pub receipt_number: String,
    /// Submitting user.
    pub submitted_by: UserId,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Returns true if a replayed submission describes this same payment.
    #[must_use]
    pub fn matches(&self, submission: &PaymentSubmission) -> bool {
        self.amount == submission.amount && self.method == submission.method
    }
}
