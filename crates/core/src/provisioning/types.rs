//! Administrator credential types.

use chrono::{DateTime, Utc};
use garde::Validate;
use orgdesk_shared::types::{CredentialId, OrganizationId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The single active administrator of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorCredential {
    /// Credential id.
    pub id: CredentialId,
    /// Organization administered.
    pub organization_id: OrganizationId,
    /// Administrator name.
    pub name: String,
    /// Sign-in email.
    pub email: String,
    /// Contact number.
    pub contact: Option<String>,
    /// Argon2id PHC hash of the secret.
    #[serde(skip_serializing)]
    pub secret_hash: String,
    /// Only one active credential may exist per organization.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

/// Details of a new administrator.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewAdministrator {
    /// Administrator name.
    #[garde(length(min = 1, max = 200), custom(not_blank))]
    pub name: String,
    /// Sign-in email.
    #[garde(email)]
    pub email: String,
    /// Contact number.
    #[garde(length(min = 5, max = 30))]
    pub contact: Option<String>,
}

/// Fields to change on an existing credential. Absent fields are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdministratorUpdate {
    /// New name.
    #[garde(length(min = 1, max = 200))]
    pub name: Option<String>,
    /// New email.
    #[garde(email)]
    pub email: Option<String>,
    /// New contact number.
    #[garde(length(min = 5, max = 30))]
    pub contact: Option<String>,
    /// New secret, hashed before storage.
    #[garde(length(min = 12, max = 128))]
    pub secret: Option<String>,
}

impl AdministratorUpdate {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.contact.is_none() && self.secret.is_none()
    }
}

fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("must not be blank"));
    }
    Ok(())
}

/// Initial secret handed out once at provisioning.
///
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InitialSecret(String);

impl InitialSecret {
    /// Wraps a generated secret.
    #[must_use]
    pub const fn new(secret: String) -> Self {
        Self(secret)
    }

    /// Returns the plaintext secret.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for InitialSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InitialSecret([redacted])")
    }
}

/// A newly provisioned administrator and their one-time secret.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedAdministrator {
    /// The stored credential.
    pub credential: AdministratorCredential,
    /// Plaintext secret, never stored.
    pub initial_secret: InitialSecret,
}
