//! Payment submissions recorded for validation.

pub mod error;
pub mod types;

pub use error::PaymentError;
pub use types::{MAX_RECEIPT_LEN, PaymentMethod, PaymentRecord, PaymentSubmission};
