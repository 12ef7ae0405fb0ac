//! Payment, document and administrator authorization validation.
//!
//! # Modules
//!
//! - `types` - Stage values, the per-organization status and audit events
//! - `error` - Workflow-specific error types
//! - `service` - State transitions and readiness derivation

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use service::{TransitionOutcome, ValidationWorkflow};
pub use types::{
    AuthorizationStatus, DocumentStatus, PaymentStatus, Prerequisite, StageRecord, StageStatus,
    StageTransition, ValidationEvent, ValidationStage, ValidationStatus,
};
