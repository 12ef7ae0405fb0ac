//! Acting identities and administrator secret hashing.
//!
//! This module provides:
//! - The authenticated [`Actor`] every mutating operation is attributed to
//! - Secret hashing and verification with Argon2id
//! - Initial secret generation for new administrators

mod password;

pub use password::{PasswordError, generate_initial_secret, hash_secret, verify_secret};

use orgdesk_shared::types::{OrganizationId, UserId};
use serde::{Deserialize, Serialize};

/// Roles an authenticated caller can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// Acts on behalf of their own organization.
    Member,
    /// Back-office staff validating payments and documents.
    Reviewer,
}

impl ActorRole {
    /// Parses a role name as carried in access tokens.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "member" => Some(Self::Member),
            "reviewer" => Some(Self::Reviewer),
            _ => None,
        }
    }

    /// Returns true if this role can change validation stages and write the
    /// pricing catalog.
    #[must_use]
    pub const fn can_review(&self) -> bool {
        matches!(self, Self::Reviewer)
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Reviewer => write!(f, "reviewer"),
        }
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The caller's user id.
    pub user_id: UserId,
    /// The organization the caller is associated with.
    pub organization_id: OrganizationId,
    /// The caller's role.
    pub role: ActorRole,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(user_id: UserId, organization_id: OrganizationId, role: ActorRole) -> Self {
        Self {
            user_id,
            organization_id,
            role,
        }
    }

    /// Returns true if the actor may act for the given organization.
    ///
    /// Reviewers act across organizations; members only for their own.
    #[must_use]
    pub fn acts_for(&self, organization_id: OrganizationId) -> bool {
        self.role.can_review() || self.organization_id == organization_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(ActorRole::parse("Reviewer"), Some(ActorRole::Reviewer));
        assert_eq!(ActorRole::parse(" member "), Some(ActorRole::Member));
        assert_eq!(ActorRole::parse("owner"), None);
    }

    #[test]
    fn test_acts_for() {
        let own = OrganizationId::new();
        let other = OrganizationId::new();

        let member = Actor::new(UserId::new(), own, ActorRole::Member);
        assert!(member.acts_for(own));
        assert!(!member.acts_for(other));

        let reviewer = Actor::new(UserId::new(), own, ActorRole::Reviewer);
        assert!(reviewer.acts_for(other));
    }
}
