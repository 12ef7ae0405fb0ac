//! Property-based tests for ValidationWorkflow.
//!
//! Random transition sequences are applied to fresh statuses; rejected
//! transitions leave the status untouched.

use chrono::{TimeZone, Utc};
use orgdesk_shared::types::{OrganizationId, UserId};
use proptest::prelude::*;

use crate::organization::EntityKind;
use crate::validation::service::ValidationWorkflow;
use crate::validation::types::{
    AuthorizationStatus, DocumentStatus, PaymentStatus, StageTransition, ValidationStatus,
};

fn arb_kind() -> impl Strategy<Value = EntityKind> {
    prop_oneof![Just(EntityKind::Commercial), Just(EntityKind::NonCommercial)]
}

/// Strategy for transitions, with blank reasons mixed in.
fn arb_transition() -> impl Strategy<Value = StageTransition> {
    let reason = prop_oneof![Just(String::new()), "[a-z ]{1,20}"];
    prop_oneof![
        Just(StageTransition::ApprovePayment { reason: None }),
        reason.clone().prop_map(|reason| StageTransition::DeclinePayment { reason }),
        Just(StageTransition::ReopenPayment),
        Just(StageTransition::MarkDocumentValid { reason: None }),
        reason.prop_map(|reason| StageTransition::MarkDocumentInvalid { reason }),
        Just(StageTransition::ReopenDocument { reason: None }),
        Just(StageTransition::AuthorizeAdmin),
    ]
}

fn run(kind: EntityKind, transitions: Vec<StageTransition>) -> Vec<ValidationStatus> {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let mut status = ValidationWorkflow::open(OrganizationId::new(), kind, UserId::new(), now).status;
    let mut history = vec![status.clone()];
    for transition in transitions {
        if let Ok(outcome) = ValidationWorkflow::apply(&status, transition, UserId::new(), now) {
            status = outcome.status;
            history.push(status.clone());
        }
    }
    history
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Outside the terminal state, ready holds exactly when payment is
    /// approved and documents are valid or not applicable.
    #[test]
    fn prop_readiness_matches_prerequisites(
        kind in arb_kind(),
        transitions in proptest::collection::vec(arb_transition(), 0..12),
    ) {
        for status in run(kind, transitions) {
            if status.authorization.status == AuthorizationStatus::Authorized {
                continue;
            }
            let expected_ready = status.payment.status == PaymentStatus::Approved
                && status.document.status.is_satisfied();
            prop_assert_eq!(status.is_ready(), expected_ready);
            prop_assert_eq!(status.outstanding_prerequisites().is_empty(), expected_ready);
        }
    }

    /// Once authorized, always authorized.
    #[test]
    fn prop_authorized_is_terminal(
        kind in arb_kind(),
        transitions in proptest::collection::vec(arb_transition(), 0..12),
    ) {
        let history = run(kind, transitions);
        let first_authorized = history
            .iter()
            .position(|s| s.authorization.status == AuthorizationStatus::Authorized);
        if let Some(index) = first_authorized {
            prop_assert!(history[index..]
                .iter()
                .all(|s| s.authorization.status == AuthorizationStatus::Authorized));
        }
    }

    /// Every accepted transition bumps the version by exactly one.
    #[test]
    fn prop_version_is_monotonic(
        kind in arb_kind(),
        transitions in proptest::collection::vec(arb_transition(), 0..12),
    ) {
        let history = run(kind, transitions);
        for pair in history.windows(2) {
            prop_assert_eq!(pair[1].version, pair[0].version + 1);
        }
    }

    /// Commercial entities never leave not_applicable.
    #[test]
    fn prop_not_applicable_is_permanent(
        transitions in proptest::collection::vec(arb_transition(), 0..12),
    ) {
        for status in run(EntityKind::Commercial, transitions) {
            prop_assert_eq!(status.document.status, DocumentStatus::NotApplicable);
        }
    }

    /// Declines and invalidations always carry a non-blank reason.
    #[test]
    fn prop_negative_outcomes_carry_reason(
        kind in arb_kind(),
        transitions in proptest::collection::vec(arb_transition(), 0..12),
    ) {
        for status in run(kind, transitions) {
            if status.payment.status == PaymentStatus::Declined {
                prop_assert!(status.payment.reason.as_deref().is_some_and(|r| !r.trim().is_empty()));
            }
            if status.document.status == DocumentStatus::Invalid {
                prop_assert!(status.document.reason.as_deref().is_some_and(|r| !r.trim().is_empty()));
            }
        }
    }
}
