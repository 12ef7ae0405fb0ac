//! Administrator secret hashing with Argon2id.
//!
//! Uses the recommended Argon2id variant with secure defaults.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{Rng, distr::Alphanumeric};
use thiserror::Error;

/// Length of generated initial secrets.
pub const INITIAL_SECRET_LEN: usize = 20;

/// Errors that can occur during secret operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash secret.
    #[error("failed to hash secret: {0}")]
    HashError(String),

    /// Failed to verify secret.
    #[error("failed to verify secret: {0}")]
    VerifyError(String),

    /// Invalid secret hash format.
    #[error("invalid secret hash format")]
    InvalidHash,
}

/// Hashes a secret using Argon2id.
///
/// Returns the hash in PHC string format.
///
/// # Example
///
/// ```
/// use orgdesk_core::auth::hash_secret;
///
/// let hash = hash_secret("my_secure_secret").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_secret(secret: &str) -> Result<String, PasswordError> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::HashError(e.to_string()))?;

    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a secret against a stored PHC hash.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the hash format is invalid.
/// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(secret.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Generates a random alphanumeric secret handed to a new administrator once.
#[must_use]
pub fn generate_initial_secret() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(INITIAL_SECRET_LEN)
        .map(char::from)
        .collect()
}
