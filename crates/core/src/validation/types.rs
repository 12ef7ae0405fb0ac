//! Validation workflow types.
//!
//! Each organization has one [`ValidationStatus`] with three gated stages.
//! The valid transitions are:
//! - payment: pending → approved, pending → declined, declined → pending (resubmission)
//! - document: pending → valid, pending → invalid, invalid → pending (new review)
//! - authorization: derived not_ready ⇄ ready, ready → authorized (terminal)

use chrono::{DateTime, Utc};
use orgdesk_shared::types::{OrganizationId, UserId, ValidationEventId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment validation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting review.
    Pending,
    /// Payment confirmed.
    Approved,
    /// Payment rejected. Reopened only by a new submission.
    Declined,
}

impl PaymentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }
}

/// Document validation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Awaiting review.
    Pending,
    /// Documents accepted.
    Valid,
    /// Documents rejected.
    Invalid,
    /// Commercial entity; no documents are reviewed.
    NotApplicable,
}

impl DocumentStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::NotApplicable => "not_applicable",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Some(Self::Pending),
            "valid" => Some(Self::Valid),
            "invalid" => Some(Self::Invalid),
            "not_applicable" => Some(Self::NotApplicable),
            _ => None,
        }
    }

    /// Returns true if the stage no longer blocks authorization.
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Valid | Self::NotApplicable)
    }
}

/// Administrator authorization stage. Derived, except for the final
/// ready → authorized step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    /// Prerequisites outstanding.
    NotReady,
    /// An administrator may be created.
    Ready,
    /// An administrator was created. Terminal.
    Authorized,
}

impl AuthorizationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotReady => "not_ready",
            Self::Ready => "ready",
            Self::Authorized => "authorized",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "not_ready" => Some(Self::NotReady),
            "ready" => Some(Self::Ready),
            "authorized" => Some(Self::Authorized),
            _ => None,
        }
    }
}

/// The three workflow stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStage {
    /// Payment validation.
    Payment,
    /// Document validation.
    Document,
    /// Administrator authorization.
    AdminAuthorization,
}

impl ValidationStage {
    /// Returns the string representation of the stage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Document => "document",
            Self::AdminAuthorization => "admin_authorization",
        }
    }

    /// Parses a stage from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "payment" => Some(Self::Payment),
            "document" => Some(Self::Document),
            "admin_authorization" | "authorization" => Some(Self::AdminAuthorization),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A status value of any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "stage", content = "status", rename_all = "snake_case")]
pub enum StageStatus {
    /// Payment stage value.
    Payment(PaymentStatus),
    /// Document stage value.
    Document(DocumentStatus),
    /// Authorization stage value.
    AdminAuthorization(AuthorizationStatus),
}

impl StageStatus {
    /// Returns the stage the value belongs to.
    #[must_use]
    pub const fn stage(&self) -> ValidationStage {
        match self {
            Self::Payment(_) => ValidationStage::Payment,
            Self::Document(_) => ValidationStage::Document,
            Self::AdminAuthorization(_) => ValidationStage::AdminAuthorization,
        }
    }

    /// Returns the status name without the stage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment(s) => s.as_str(),
            Self::Document(s) => s.as_str(),
            Self::AdminAuthorization(s) => s.as_str(),
        }
    }

    /// Parses a status name for the given stage.
    pub fn parse(stage: ValidationStage, s: &str) -> Option<Self> {
        match stage {
            ValidationStage::Payment => PaymentStatus::parse(s).map(Self::Payment),
            ValidationStage::Document => DocumentStatus::parse(s).map(Self::Document),
            ValidationStage::AdminAuthorization => {
                AuthorizationStatus::parse(s).map(Self::AdminAuthorization)
            }
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.stage(), self.as_str())
    }
}

/// Current value of one stage with the details of its last transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord<S> {
    /// Current value.
    pub status: S,
    /// Reason given with the last transition.
    pub reason: Option<String>,
    /// Actor of the last transition. `None` for derived changes.
    pub actor: Option<UserId>,
    /// Time of the last transition.
    pub updated_at: DateTime<Utc>,
}

impl<S> StageRecord<S> {
    /// Creates a stage record.
    #[must_use]
    pub const fn new(
        status: S,
        reason: Option<String>,
        actor: Option<UserId>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status,
            reason,
            actor,
            updated_at,
        }
    }
}

/// Validation state of one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStatus {
    /// Organization validated.
    pub organization_id: OrganizationId,
    /// Payment stage.
    pub payment: StageRecord<PaymentStatus>,
    /// Document stage.
    pub document: StageRecord<DocumentStatus>,
    /// Authorization stage.
    pub authorization: StageRecord<AuthorizationStatus>,
    /// Incremented on every transition; used for compare-and-swap.
    pub version: i64,
    /// Creation time (first payment submission).
    pub created_at: DateTime<Utc>,
    /// Last transition time.
    pub updated_at: DateTime<Utc>,
}

/// A prerequisite still blocking administrator creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "status", rename_all = "snake_case")]
pub enum Prerequisite {
    /// Payment is not approved.
    PaymentApproval(PaymentStatus),
    /// Documents are not validated.
    DocumentValidation(DocumentStatus),
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PaymentApproval(status) => {
                write!(f, "payment validation is {}", status.as_str())
            }
            Self::DocumentValidation(status) => {
                write!(f, "document validation is {}", status.as_str())
            }
        }
    }
}

impl ValidationStatus {
    /// Prerequisites still blocking administrator creation, payment first.
    #[must_use]
    pub fn outstanding_prerequisites(&self) -> Vec<Prerequisite> {
        let mut outstanding = Vec::new();
        if self.payment.status != PaymentStatus::Approved {
            outstanding.push(Prerequisite::PaymentApproval(self.payment.status));
        }
        if !self.document.status.is_satisfied() {
            outstanding.push(Prerequisite::DocumentValidation(self.document.status));
        }
        outstanding
    }

    /// Returns true if an administrator may be created now.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.authorization.status == AuthorizationStatus::Ready
    }

    /// Returns the current value of a stage.
    #[must_use]
    pub fn stage_status(&self, stage: ValidationStage) -> StageStatus {
        match stage {
            ValidationStage::Payment => StageStatus::Payment(self.payment.status),
            ValidationStage::Document => StageStatus::Document(self.document.status),
            ValidationStage::AdminAuthorization => {
                StageStatus::AdminAuthorization(self.authorization.status)
            }
        }
    }
}

/// A named transition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageTransition {
    /// pending → approved.
    ApprovePayment {
        /// Optional note.
        reason: Option<String>,
    },
    /// pending → declined.
    DeclinePayment {
        /// Required reason.
        reason: String,
    },
    /// declined → pending, on resubmission.
    ReopenPayment,
    /// pending → valid.
    MarkDocumentValid {
        /// Optional note.
        reason: Option<String>,
    },
    /// pending → invalid.
    MarkDocumentInvalid {
        /// Required reason.
        reason: String,
    },
    /// invalid → pending, for a new review.
    ReopenDocument {
        /// Optional note.
        reason: Option<String>,
    },
    /// ready → authorized.
    AuthorizeAdmin,
}

impl StageTransition {
    /// Returns the value the transition moves its stage to.
    #[must_use]
    pub const fn target(&self) -> StageStatus {
        match self {
            Self::ApprovePayment { .. } => StageStatus::Payment(PaymentStatus::Approved),
            Self::DeclinePayment { .. } => StageStatus::Payment(PaymentStatus::Declined),
            Self::ReopenPayment => StageStatus::Payment(PaymentStatus::Pending),
            Self::MarkDocumentValid { .. } => StageStatus::Document(DocumentStatus::Valid),
            Self::MarkDocumentInvalid { .. } => StageStatus::Document(DocumentStatus::Invalid),
            Self::ReopenDocument { .. } => StageStatus::Document(DocumentStatus::Pending),
            Self::AuthorizeAdmin => StageStatus::AdminAuthorization(AuthorizationStatus::Authorized),
        }
    }

    /// Returns the stage the transition acts on.
    #[must_use]
    pub const fn stage(&self) -> ValidationStage {
        self.target().stage()
    }
}

/// Append-only audit row for a stage transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationEvent {
    /// Event id.
    pub id: ValidationEventId,
    /// Organization validated.
    pub organization_id: OrganizationId,
    /// Stage that changed.
    pub stage: ValidationStage,
    /// Previous value. `None` when the status was opened.
    pub from_status: Option<StageStatus>,
    /// New value.
    pub to_status: StageStatus,
    /// Reason given.
    pub reason: Option<String>,
    /// Acting user. `None` for derived changes.
    pub actor: Option<UserId>,
    /// Status version after the change.
    pub version: i64,
    /// When the change happened.
    pub occurred_at: DateTime<Utc>,
}
