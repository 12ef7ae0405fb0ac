//! Administrator provisioning behind the authorization gate.

use chrono::{DateTime, Utc};
use garde::Validate;
use orgdesk_shared::types::{CredentialId, OrganizationId, UserId};

use super::error::ProvisioningError;
use super::types::{AdministratorCredential, AdministratorUpdate, InitialSecret, NewAdministrator};
use crate::auth::{generate_initial_secret, hash_secret};
use crate::validation::{TransitionOutcome, ValidationStatus, ValidationWorkflow};

/// Everything a provisioning writes, to be committed atomically.
#[derive(Debug, Clone)]
pub struct Provisioning {
    /// The new credential.
    pub credential: AdministratorCredential,
    /// Plaintext secret to hand out once.
    pub initial_secret: InitialSecret,
    /// The ready → authorized transition.
    pub transition: TransitionOutcome,
}

/// Stateless administrator provisioner.
pub struct AdministratorProvisioner;

impl AdministratorProvisioner {
    /// Builds the credential and the authorization transition.
    ///
    /// # Errors
    ///
    /// Checked in order:
    /// * `ProvisioningError::AlreadyExists` if an active credential exists
    /// * `ProvisioningError::ValidationNotStarted` without a validation status
    /// * `ProvisioningError::GateNotOpen` unless authorization is ready
    /// * `ProvisioningError::InvalidInput` for bad name, email or contact
    pub fn provision(
        organization_id: OrganizationId,
        status: Option<&ValidationStatus>,
        existing: Option<&AdministratorCredential>,
        input: NewAdministrator,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> Result<Provisioning, ProvisioningError> {
        if existing.is_some_and(|credential| credential.is_active) {
            return Err(ProvisioningError::AlreadyExists(organization_id));
        }
        let status = status.ok_or(ProvisioningError::ValidationNotStarted)?;
        if !status.is_ready() {
            return Err(ProvisioningError::GateNotOpen {
                status: status.authorization.status,
                outstanding: status.outstanding_prerequisites(),
            });
        }
        input
            .validate()
            .map_err(|report| ProvisioningError::InvalidInput(report.to_string()))?;

        let transition = ValidationWorkflow::authorize_admin(status, actor, now)?;
        let secret = generate_initial_secret();
        let secret_hash = hash_secret(&secret)?;

        let credential = AdministratorCredential {
            id: CredentialId::new(),
            organization_id,
            name: input.name.trim().to_string(),
            email: normalize_email(&input.email),
            contact: input.contact.map(|c| c.trim().to_string()),
            secret_hash,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        Ok(Provisioning {
            credential,
            initial_secret: InitialSecret::new(secret),
            transition,
        })
    }

    /// Applies an update to an active credential. The gate is not consulted.
    ///
    /// # Errors
    ///
    /// * `ProvisioningError::CredentialInactive` for a deactivated credential
    /// * `ProvisioningError::NothingToUpdate` for an empty update
    /// * `ProvisioningError::InvalidInput` for invalid fields
    pub fn apply_update(
        credential: &AdministratorCredential,
        update: AdministratorUpdate,
        now: DateTime<Utc>,
    ) -> Result<AdministratorCredential, ProvisioningError> {
        if !credential.is_active {
            return Err(ProvisioningError::CredentialInactive(credential.id));
        }
        if update.is_empty() {
            return Err(ProvisioningError::NothingToUpdate);
        }
        update
            .validate()
            .map_err(|report| ProvisioningError::InvalidInput(report.to_string()))?;

        let mut next = credential.clone();
        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ProvisioningError::InvalidInput("name: must not be blank".into()));
            }
            next.name = name.to_string();
        }
        if let Some(email) = update.email {
            next.email = normalize_email(&email);
        }
        if let Some(contact) = update.contact {
            next.contact = Some(contact.trim().to_string());
        }
        if let Some(secret) = update.secret {
            next.secret_hash = hash_secret(&secret)?;
        }
        next.updated_at = now;
        Ok(next)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
