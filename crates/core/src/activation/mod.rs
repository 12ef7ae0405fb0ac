//! Engagement activation: accepted pricing selections.

pub mod error;
pub mod recorder;
pub mod types;

pub use error::ActivationError;
pub use recorder::ActivationRecorder;
pub use types::{ActivationRequest, EngagementActivation, MAX_IDEMPOTENCY_KEY_LEN};
