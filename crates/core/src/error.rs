//! Error taxonomy shared by every onboarding module.

use serde::Serialize;

/// Category of a failed operation.
///
/// Each module error maps onto exactly one kind, and the HTTP layer maps kinds
/// onto status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced organization, record or credential does not exist.
    NotFound,
    /// A precondition was not met. The message names which one.
    Rejected,
    /// The caller may not perform the operation.
    Forbidden,
    /// A state machine was asked for a move its current state does not allow.
    InvalidTransition,
    /// The backing store failed or a conditional write lost a race.
    Persistence,
    /// An unexpected internal failure.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status code for this kind.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Rejected => 422,
            Self::Forbidden => 403,
            Self::InvalidTransition => 409,
            Self::Persistence => 503,
            Self::Internal => 500,
        }
    }
}
