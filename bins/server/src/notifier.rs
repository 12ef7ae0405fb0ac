//! Delivers onboarding notifications over SMTP.

use async_trait::async_trait;
use orgdesk_core::{Notification, Notifier};
use orgdesk_shared::EmailService;
use tracing::{error, info};

/// Sends the administrator welcome email and logs everything else.
pub struct EmailNotifier {
    email: EmailService,
}

impl EmailNotifier {
    pub const fn new(email: EmailService) -> Self {
        Self { email }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, notification: Notification) {
        let org_id = notification.organization_id();
        let Notification::AdministratorProvisioned {
            organization_name,
            credential_id,
            name,
            email,
            initial_secret,
            ..
        } = &notification
        else {
            info!(org_id = %org_id, notification = notification.name(), "Notification raised");
            return;
        };

        if !self.email.is_enabled() {
            info!(
                org_id = %org_id,
                credential_id = %credential_id,
                "Email disabled, administrator welcome not sent"
            );
            return;
        }

        match self
            .email
            .send_administrator_welcome(email, name, organization_name, initial_secret.expose())
            .await
        {
            Ok(()) => info!(
                org_id = %org_id,
                credential_id = %credential_id,
                "Administrator welcome email sent"
            ),
            Err(e) => error!(
                org_id = %org_id,
                credential_id = %credential_id,
                error = %e,
                "Failed to send administrator welcome email"
            ),
        }
    }
}
