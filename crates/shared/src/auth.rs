//! Authentication types carried in bearer tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role name for back-office reviewers who validate payments and documents.
pub const REVIEWER_ROLE: &str = "reviewer";

/// Role name for users acting on behalf of their own organization.
pub const MEMBER_ROLE: &str = "member";

/// JWT claims for access tokens.
///
/// Tokens are issued by the external identity provider; this service only
/// validates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Organization the user acts for.
    pub org: Uuid,
    /// User's role (`member` or `reviewer`).
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, org_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            org: org_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the organization ID from claims.
    #[must_use]
    pub const fn organization_id(&self) -> Uuid {
        self.org
    }

    /// Returns true if the token belongs to a back-office reviewer.
    #[must_use]
    pub fn is_reviewer(&self) -> bool {
        self.role.eq_ignore_ascii_case(REVIEWER_ROLE)
    }
}
