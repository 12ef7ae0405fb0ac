//! The onboarding facade.
//!
//! # Modules
//!
//! - `service` - Orchestration of registration, pricing, activation,
//!   payment, validation and provisioning against the stores
//! - `error` - The aggregated error type

pub mod error;
pub mod service;


pub use error::OnboardingError;
pub use service::{MAX_CAS_ATTEMPTS, OnboardingResult, OnboardingService, PaymentReceipt};
