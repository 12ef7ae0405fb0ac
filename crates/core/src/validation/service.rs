//! Validation workflow state machine.
//!
//! All methods are associated functions over an immutable
//! [`ValidationStatus`]; a successful transition returns the next status with
//! its version bumped, plus the audit events to append alongside it.

use chrono::{DateTime, Utc};
use orgdesk_shared::types::{OrganizationId, UserId, ValidationEventId};
use serde::Serialize;

use crate::organization::EntityKind;
use crate::validation::error::WorkflowError;
use crate::validation::types::{
    AuthorizationStatus, DocumentStatus, PaymentStatus, StageRecord, StageStatus,
    StageTransition, ValidationEvent, ValidationStage, ValidationStatus,
};

/// Result of a successful transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    /// The status after the transition.
    pub status: ValidationStatus,
    /// Audit events, the requested change first and any derived
    /// authorization change after it.
    pub events: Vec<ValidationEvent>,
}

impl TransitionOutcome {
    /// Returns true if the transition moved authorization to ready.
    #[must_use]
    pub fn became_ready(&self) -> bool {
        self.events.iter().any(|event| {
            event.to_status == StageStatus::AdminAuthorization(AuthorizationStatus::Ready)
        })
    }
}

/// Stateless validation workflow.
pub struct ValidationWorkflow;

impl ValidationWorkflow {
    /// Document stage value a new status starts with.
    #[must_use]
    pub const fn initial_document_status(entity_kind: EntityKind) -> DocumentStatus {
        if entity_kind.requires_document_validation() {
            DocumentStatus::Pending
        } else {
            DocumentStatus::NotApplicable
        }
    }

    /// Opens the validation status on first payment submission.
    #[must_use]
    pub fn open(
        organization_id: OrganizationId,
        entity_kind: EntityKind,
        submitted_by: UserId,
        now: DateTime<Utc>,
    ) -> TransitionOutcome {
        let status = ValidationStatus {
            organization_id,
            payment: StageRecord::new(PaymentStatus::Pending, None, Some(submitted_by), now),
            document: StageRecord::new(
                Self::initial_document_status(entity_kind),
                None,
                Some(submitted_by),
                now,
            ),
            authorization: StageRecord::new(AuthorizationStatus::NotReady, None, None, now),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        let events = vec![
            event(
                &status,
                None,
                StageStatus::Payment(status.payment.status),
                None,
                Some(submitted_by),
            ),
            event(
                &status,
                None,
                StageStatus::Document(status.document.status),
                None,
                Some(submitted_by),
            ),
        ];
        TransitionOutcome { status, events }
    }

    /// Derives the authorization stage from the other two.
    ///
    /// Authorized is terminal. Otherwise the stage is ready exactly when
    /// payment is approved and documents are valid or not applicable.
    #[must_use]
    pub const fn derive_readiness(
        payment: PaymentStatus,
        document: DocumentStatus,
        current: AuthorizationStatus,
    ) -> AuthorizationStatus {
        if matches!(current, AuthorizationStatus::Authorized) {
            return AuthorizationStatus::Authorized;
        }
        if matches!(payment, PaymentStatus::Approved) && document.is_satisfied() {
            AuthorizationStatus::Ready
        } else {
            AuthorizationStatus::NotReady
        }
    }

    /// Maps a requested stage value onto the named transition that reaches it.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::DerivedStage` for the authorization stage
    /// * `WorkflowError::ReasonRequired` when declining or invalidating
    ///   without a reason
    /// * `WorkflowError::InvalidTransition` for values no transition reaches
    ///   from here
    pub fn transition_for(
        status: &ValidationStatus,
        target: StageStatus,
        reason: Option<String>,
    ) -> Result<StageTransition, WorkflowError> {
        let reason = normalize_reason(reason);
        match target {
            StageStatus::AdminAuthorization(_) => Err(WorkflowError::DerivedStage),
            StageStatus::Payment(PaymentStatus::Approved) => {
                Ok(StageTransition::ApprovePayment { reason })
            }
            StageStatus::Payment(PaymentStatus::Declined) => reason
                .map(|reason| StageTransition::DeclinePayment { reason })
                .ok_or(WorkflowError::ReasonRequired(target)),
            StageStatus::Document(DocumentStatus::Valid) => {
                Ok(StageTransition::MarkDocumentValid { reason })
            }
            StageStatus::Document(DocumentStatus::Invalid) => reason
                .map(|reason| StageTransition::MarkDocumentInvalid { reason })
                .ok_or(WorkflowError::ReasonRequired(target)),
            StageStatus::Document(DocumentStatus::Pending) => {
                Ok(StageTransition::ReopenDocument { reason })
            }
            // Payment reopens only through a new submission and
            // not_applicable is fixed at creation.
            StageStatus::Payment(PaymentStatus::Pending)
            | StageStatus::Document(DocumentStatus::NotApplicable) => {
                Err(WorkflowError::InvalidTransition {
                    from: status.stage_status(target.stage()),
                    to: target,
                })
            }
        }
    }

    /// Applies a transition.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::ReasonRequired` if a required reason is blank
    /// * `WorkflowError::InvalidTransition` if the stage's current value does
    ///   not allow the move
    pub fn apply(
        status: &ValidationStatus,
        transition: StageTransition,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, WorkflowError> {
        let target = transition.target();
        let from = status.stage_status(transition.stage());
        let mut next = status.clone();

        match transition {
            StageTransition::ApprovePayment { reason } => {
                require(from, PaymentStatus::Pending, target)?;
                next.payment = stage(PaymentStatus::Approved, normalize_reason(reason), actor, now);
            }
            StageTransition::DeclinePayment { reason } => {
                let reason = required_reason(reason, target)?;
                require(from, PaymentStatus::Pending, target)?;
                next.payment = stage(PaymentStatus::Declined, Some(reason), actor, now);
            }
            StageTransition::ReopenPayment => {
                require(from, PaymentStatus::Declined, target)?;
                next.payment = stage(PaymentStatus::Pending, None, actor, now);
            }
            StageTransition::MarkDocumentValid { reason } => {
                require(from, DocumentStatus::Pending, target)?;
                next.document = stage(DocumentStatus::Valid, normalize_reason(reason), actor, now);
            }
            StageTransition::MarkDocumentInvalid { reason } => {
                let reason = required_reason(reason, target)?;
                require(from, DocumentStatus::Pending, target)?;
                next.document = stage(DocumentStatus::Invalid, Some(reason), actor, now);
            }
            StageTransition::ReopenDocument { reason } => {
                require(from, DocumentStatus::Invalid, target)?;
                next.document = stage(DocumentStatus::Pending, normalize_reason(reason), actor, now);
            }
            StageTransition::AuthorizeAdmin => {
                require(from, AuthorizationStatus::Ready, target)?;
                next.authorization = stage(AuthorizationStatus::Authorized, None, actor, now);
            }
        }

        next.version = status.version + 1;
        next.updated_at = now;

        let reason = match target.stage() {
            ValidationStage::Payment => next.payment.reason.clone(),
            ValidationStage::Document => next.document.reason.clone(),
            ValidationStage::AdminAuthorization => None,
        };
        let mut events = vec![event(&next, Some(from), target, reason, Some(actor))];

        if target.stage() != ValidationStage::AdminAuthorization {
            let current = next.authorization.status;
            let derived =
                Self::derive_readiness(next.payment.status, next.document.status, current);
            if derived != current {
                next.authorization = StageRecord::new(derived, None, None, now);
                events.push(event(
                    &next,
                    Some(StageStatus::AdminAuthorization(current)),
                    StageStatus::AdminAuthorization(derived),
                    None,
                    None,
                ));
            }
        }

        Ok(TransitionOutcome {
            status: next,
            events,
        })
    }

    /// Approves a pending payment.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` unless payment is pending.
    pub fn approve_payment(
        status: &ValidationStatus,
        reason: Option<String>,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, WorkflowError> {
        Self::apply(status, StageTransition::ApprovePayment { reason }, actor, now)
    }

    /// Declines a pending payment.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ReasonRequired` for a blank reason and
    /// `WorkflowError::InvalidTransition` unless payment is pending.
    pub fn decline_payment(
        status: &ValidationStatus,
        reason: String,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, WorkflowError> {
        Self::apply(status, StageTransition::DeclinePayment { reason }, actor, now)
    }

    /// Marks pending documents valid.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` unless documents are pending.
    pub fn mark_document_valid(
        status: &ValidationStatus,
        reason: Option<String>,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, WorkflowError> {
        Self::apply(status, StageTransition::MarkDocumentValid { reason }, actor, now)
    }

    /// Marks pending documents invalid.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::ReasonRequired` for a blank reason and
    /// `WorkflowError::InvalidTransition` unless documents are pending.
    pub fn mark_document_invalid(
        status: &ValidationStatus,
        reason: String,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, WorkflowError> {
        Self::apply(status, StageTransition::MarkDocumentInvalid { reason }, actor, now)
    }

    /// Consumes the open gate.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` unless authorization is
    /// ready.
    pub fn authorize_admin(
        status: &ValidationStatus,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, WorkflowError> {
        Self::apply(status, StageTransition::AuthorizeAdmin, actor, now)
    }
}

trait StageValue: Copy + PartialEq {
    fn wrap(self) -> StageStatus;
}

impl StageValue for PaymentStatus {
    fn wrap(self) -> StageStatus {
        StageStatus::Payment(self)
    }
}

impl StageValue for DocumentStatus {
    fn wrap(self) -> StageStatus {
        StageStatus::Document(self)
    }
}

impl StageValue for AuthorizationStatus {
    fn wrap(self) -> StageStatus {
        StageStatus::AdminAuthorization(self)
    }
}

fn require<S: StageValue>(
    from: StageStatus,
    expected: S,
    to: StageStatus,
) -> Result<(), WorkflowError> {
    if from == expected.wrap() {
        Ok(())
    } else {
        Err(WorkflowError::InvalidTransition { from, to })
    }
}

fn normalize_reason(reason: Option<String>) -> Option<String> {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
}

fn required_reason(reason: String, target: StageStatus) -> Result<String, WorkflowError> {
    normalize_reason(Some(reason)).ok_or(WorkflowError::ReasonRequired(target))
}

fn stage<S>(
    status: S,
    reason: Option<String>,
    actor: UserId,
    now: DateTime<Utc>,
) -> StageRecord<S> {
    StageRecord::new(status, reason, Some(actor), now)
}

fn event(
    status: &ValidationStatus,
    from: Option<StageStatus>,
    to: StageStatus,
    reason: Option<String>,
    actor: Option<UserId>,
) -> ValidationEvent {
    ValidationEvent {
        id: ValidationEventId::new(),
        organization_id: status.organization_id,
        stage: to.stage(),
        from_status: from,
        to_status: to,
        reason,
        actor,
        version: status.version,
        occurred_at: status.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn open(kind: EntityKind) -> ValidationStatus {
        ValidationWorkflow::open(OrganizationId::new(), kind, UserId::new(), Utc::now()).status
    }

    #[rstest]
    #[case(EntityKind::Commercial, DocumentStatus::NotApplicable)]
    #[case(EntityKind::NonCommercial, DocumentStatus::Pending)]
    fn test_open_sets_initial_state(#[case] kind: EntityKind, #[case] document: DocumentStatus) {
        let outcome =
            ValidationWorkflow::open(OrganizationId::new(), kind, UserId::new(), Utc::now());
        assert_eq!(outcome.status.payment.status, PaymentStatus::Pending);
        assert_eq!(outcome.status.document.status, document);
        assert_eq!(outcome.status.authorization.status, AuthorizationStatus::NotReady);
        assert_eq!(outcome.status.version, 1);
        assert_eq!(outcome.events.len(), 2);
        assert!(outcome.events.iter().all(|e| e.from_status.is_none()));
    }

    #[rstest]
    #[case(PaymentStatus::Approved, DocumentStatus::Valid, AuthorizationStatus::NotReady, AuthorizationStatus::Ready)]
    #[case(PaymentStatus::Approved, DocumentStatus::NotApplicable, AuthorizationStatus::NotReady, AuthorizationStatus::Ready)]
    #[case(PaymentStatus::Approved, DocumentStatus::Pending, AuthorizationStatus::NotReady, AuthorizationStatus::NotReady)]
    #[case(PaymentStatus::Approved, DocumentStatus::Invalid, AuthorizationStatus::Ready, AuthorizationStatus::NotReady)]
    #[case(PaymentStatus::Pending, DocumentStatus::Valid, AuthorizationStatus::NotReady, AuthorizationStatus::NotReady)]
    #[case(PaymentStatus::Declined, DocumentStatus::NotApplicable, AuthorizationStatus::NotReady, AuthorizationStatus::NotReady)]
    #[case(PaymentStatus::Declined, DocumentStatus::Invalid, AuthorizationStatus::Authorized, AuthorizationStatus::Authorized)]
    fn test_derive_readiness(
        #[case] payment: PaymentStatus,
        #[case] document: DocumentStatus,
        #[case] current: AuthorizationStatus,
        #[case] expected: AuthorizationStatus,
    ) {
        assert_eq!(
            ValidationWorkflow::derive_readiness(payment, document, current),
            expected
        );
    }

    #[test]
    fn test_commercial_payment_approval_opens_gate() {
        let status = open(EntityKind::Commercial);
        let outcome =
            ValidationWorkflow::approve_payment(&status, None, UserId::new(), Utc::now()).unwrap();

        assert_eq!(outcome.status.payment.status, PaymentStatus::Approved);
        assert_eq!(outcome.status.authorization.status, AuthorizationStatus::Ready);
        assert_eq!(outcome.status.version, status.version + 1);
        assert!(outcome.became_ready());
        assert_eq!(outcome.events.len(), 2);
        assert_eq!(outcome.events[1].actor, None);
    }

    #[test]
    fn test_non_commercial_needs_documents() {
        let reviewer = UserId::new();
        let status = open(EntityKind::NonCommercial);
        let approved =
            ValidationWorkflow::approve_payment(&status, None, reviewer, Utc::now()).unwrap();
        assert_eq!(approved.status.authorization.status, AuthorizationStatus::NotReady);
        assert!(!approved.became_ready());

        let valid = ValidationWorkflow::mark_document_valid(
            &approved.status,
            Some("registration certificate checked".into()),
            reviewer,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(valid.status.authorization.status, AuthorizationStatus::Ready);
    }

    #[test]
    fn test_decline_requires_reason() {
        let status = open(EntityKind::Commercial);
        let result = ValidationWorkflow::decline_payment(&status, "  ".into(), UserId::new(), Utc::now());
        assert!(matches!(result, Err(WorkflowError::ReasonRequired(_))));

        let declined =
            ValidationWorkflow::decline_payment(&status, "receipt unreadable".into(), UserId::new(), Utc::now())
                .unwrap();
        assert_eq!(declined.status.payment.status, PaymentStatus::Declined);
        assert_eq!(declined.status.payment.reason.as_deref(), Some("receipt unreadable"));
    }

    #[test]
    fn test_declined_payment_cannot_be_approved() {
        let status = open(EntityKind::Commercial);
        let declined =
            ValidationWorkflow::decline_payment(&status, "no funds".into(), UserId::new(), Utc::now())
                .unwrap();
        let result =
            ValidationWorkflow::approve_payment(&declined.status, None, UserId::new(), Utc::now());
        assert!(matches!(
            result,
            Err(WorkflowError::InvalidTransition {
                from: StageStatus::Payment(PaymentStatus::Declined),
                to: StageStatus::Payment(PaymentStatus::Approved),
            })
        ));

        let reopened = ValidationWorkflow::apply(
            &declined.status,
            StageTransition::ReopenPayment,
            UserId::new(),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(reopened.status.payment.status, PaymentStatus::Pending);
        assert_eq!(reopened.status.payment.reason, None);
    }

    #[test]
    fn test_document_not_applicable_is_permanent() {
        let status = open(EntityKind::Commercial);
        let result = ValidationWorkflow::mark_document_valid(&status, None, UserId::new(), Utc::now());
        assert!(matches!(result, Err(WorkflowError::InvalidTransition { .. })));
        assert!(matches!(
            ValidationWorkflow::transition_for(
                &status,
                StageStatus::Document(DocumentStatus::NotApplicable),
                None
            ),
            Err(WorkflowError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_document_reopen_after_invalid() {
        let reviewer = UserId::new();
        let status = open(EntityKind::NonCommercial);
        let invalid =
            ValidationWorkflow::mark_document_invalid(&status, "expired licence".into(), reviewer, Utc::now())
                .unwrap();
        let reopened = ValidationWorkflow::apply(
            &invalid.status,
            StageTransition::ReopenDocument { reason: None },
            reviewer,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(reopened.status.document.status, DocumentStatus::Pending);
    }

    #[test]
    fn test_authorize_admin_once() {
        let actor = UserId::new();
        let status = open(EntityKind::Commercial);
        let not_ready = ValidationWorkflow::authorize_admin(&status, actor, Utc::now());
        assert!(matches!(not_ready, Err(WorkflowError::InvalidTransition { .. })));

        let ready = ValidationWorkflow::approve_payment(&status, None, actor, Utc::now()).unwrap();
        let authorized =
            ValidationWorkflow::authorize_admin(&ready.status, actor, Utc::now()).unwrap();
        assert_eq!(authorized.status.authorization.status, AuthorizationStatus::Authorized);

        let again = ValidationWorkflow::authorize_admin(&authorized.status, actor, Utc::now());
        assert!(matches!(
            again,
            Err(WorkflowError::InvalidTransition {
                from: StageStatus::AdminAuthorization(AuthorizationStatus::Authorized),
                ..
            })
        ));
    }

    #[test]
    fn test_transition_for_mapping() {
        let status = open(EntityKind::NonCommercial);
        assert!(matches!(
            ValidationWorkflow::transition_for(
                &status,
                StageStatus::AdminAuthorization(AuthorizationStatus::Authorized),
                None
            ),
            Err(WorkflowError::DerivedStage)
        ));
        assert!(matches!(
            ValidationWorkflow::transition_for(&status, StageStatus::Payment(PaymentStatus::Declined), None),
            Err(WorkflowError::ReasonRequired(_))
        ));
        assert!(matches!(
            ValidationWorkflow::transition_for(&status, StageStatus::Payment(PaymentStatus::Pending), None),
            Err(WorkflowError::InvalidTransition { .. })
        ));
        assert_eq!(
            ValidationWorkflow::transition_for(
                &status,
                StageStatus::Payment(PaymentStatus::Approved),
                Some("  ".into())
            )
            .unwrap(),
            StageTransition::ApprovePayment { reason: None }
        );
    }
}
