//! Outbound notifications raised by onboarding operations.
//!
//! Delivery is best effort: a failed notification never fails the operation
//! that raised it. Implementations report their own failures.

use async_trait::async_trait;
use orgdesk_shared::types::{ActivationId, CredentialId, OrganizationId, PaymentId};

use crate::pricing::PricingUnit;
use crate::provisioning::InitialSecret;
use crate::validation::StageStatus;

/// Something worth telling the organization or the back office about.
#[derive(Debug, Clone)]
pub enum Notification {
    /// An engagement model was activated.
    EngagementActivated {
        /// Organization activated.
        organization_id: OrganizationId,
        /// The new activation.
        activation_id: ActivationId,
        /// Price after discount.
        final_price: PricingUnit,
    },
    /// A payment was submitted for review.
    PaymentSubmitted {
        /// Paying organization.
        organization_id: OrganizationId,
        /// The recorded payment.
        payment_id: PaymentId,
        /// Receipt number.
        receipt_number: String,
    },
    /// A reviewer changed a validation stage.
    StageChanged {
        /// Organization under validation.
        organization_id: OrganizationId,
        /// New stage status.
        status: StageStatus,
        /// Reviewer's reason, if any.
        reason: Option<String>,
    },
    /// Both prerequisites are satisfied; an administrator can be created.
    AuthorizationReady {
        /// Organization under validation.
        organization_id: OrganizationId,
    },
    /// An administrator credential was created.
    AdministratorProvisioned {
        /// Owning organization.
        organization_id: OrganizationId,
        /// Organization name for the greeting.
        organization_name: String,
        /// The new credential.
        credential_id: CredentialId,
        /// Administrator name.
        name: String,
        /// Administrator email, where the secret is delivered.
        email: String,
        /// One-time secret.
        initial_secret: InitialSecret,
    },
}

impl Notification {
    /// Returns the organization the notification concerns.
    #[must_use]
    pub const fn organization_id(&self) -> OrganizationId {
        match self {
            Self::EngagementActivated {
                organization_id, ..
            }
            | Self::PaymentSubmitted {
                organization_id, ..
            }
            | Self::StageChanged {
                organization_id, ..
            }
            | Self::AuthorizationReady { organization_id }
            | Self::AdministratorProvisioned {
                organization_id, ..
            } => *organization_id,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EngagementActivated { .. } => "engagement_activated",
            Self::PaymentSubmitted { .. } => "payment_submitted",
            Self::StageChanged { .. } => "stage_changed",
            Self::AuthorizationReady { .. } => "authorization_ready",
            Self::AdministratorProvisioned { .. } => "administrator_provisioned",
        }
    }
}

/// Delivers notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    async fn notify(&self, notification: Notification);
}

/// Drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _notification: Notification) {}
}

/// Keeps every notification in memory, for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: tokio::sync::Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns everything delivered so far.
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) {
        self.sent.lock().await.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        let org = OrganizationId::new();
        notifier
            .notify(Notification::AuthorizationReady {
                organization_id: org,
            })
            .await;
        notifier
            .notify(Notification::PaymentSubmitted {
                organization_id: org,
                payment_id: PaymentId::new(),
                receipt_number: "R-1".into(),
            })
            .await;

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].name(), "authorization_ready");
        assert_eq!(sent[1].organization_id(), org);
    }
}
