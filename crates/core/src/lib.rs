//! Core onboarding logic for OrgDesk.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence and delivery are reached through the traits in [`store`] and
//! [`notification`].
//!
//! # Modules
//!
//! - `organization` - Registered organizations and their classification
//! - `pricing` - Pricing catalog, price resolution and catalog caching
//! - `activation` - Engagement activation records
//! - `payment` - Payment submissions
//! - `validation` - Payment, document and authorization state machine
//! - `provisioning` - Administrator credentials behind the authorization gate
//! - `auth` - Acting identities and secret hashing
//! - `store` - Persistence traits and the in-memory store
//! - `notification` - Outbound notifications
//! - `onboarding` - The service tying the above together

pub mod activation;
pub mod auth;
pub mod error;
pub mod notification;
pub mod onboarding;
pub mod organization;
pub mod payment;
pub mod pricing;
pub mod provisioning;
pub mod store;
pub mod validation;

pub use error::ErrorKind;
pub use notification::{NoopNotifier, Notification, Notifier, RecordingNotifier};
pub use onboarding::{OnboardingError, OnboardingResult, OnboardingService, PaymentReceipt};
pub use store::{InMemoryStore, StoreError, Stores};
