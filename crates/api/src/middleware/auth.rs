//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use orgdesk_core::auth::{Actor, ActorRole};
use orgdesk_shared::types::{OrganizationId, UserId};
use orgdesk_shared::{Claims, JwtError};
use serde_json::json;
use tracing::debug;

use crate::AppState;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(error: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": error, "message": message })),
    )
        .into_response()
}

/// Authentication middleware that validates JWT tokens.
///
/// Valid claims are stored in the request extensions for [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return unauthorized(
            "UNAUTHORIZED",
            "Authorization header with Bearer token is required",
        );
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => unauthorized("TOKEN_EXPIRED", "Token has expired"),
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            unauthorized("INVALID_TOKEN", "Invalid or malformed token")
        }
    }
}

/// The authenticated caller, as the onboarding service sees it.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Actor);

impl AuthUser {
    /// Returns the acting identity.
    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.0
    }

    /// Builds the actor from token claims.
    ///
    /// Returns `None` for a role this service does not know.
    #[must_use]
    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let role = ActorRole::parse(&claims.role)?;
        Some(Self(Actor::new(
            UserId::from_uuid(claims.user_id()),
            OrganizationId::from_uuid(claims.organization_id()),
            role,
        )))
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(claims) = parts.extensions.get::<Claims>() else {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "UNAUTHORIZED",
                    "message": "Authentication required"
                })),
            ));
        };
        Self::from_claims(claims).ok_or_else(|| {
            (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "FORBIDDEN",
                    "message": format!("Unknown role: {}", claims.role)
                })),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_actor_from_claims() {
        let user = Uuid::new_v4();
        let org = Uuid::new_v4();
        let claims = Claims::new(user, org, "reviewer", Utc::now() + Duration::minutes(5));
        let auth = AuthUser::from_claims(&claims).unwrap();
        assert_eq!(auth.actor().user_id.into_inner(), user);
        assert_eq!(auth.actor().organization_id.into_inner(), org);
        assert_eq!(auth.actor().role, ActorRole::Reviewer);

        let owner = Claims::new(user, org, "owner", Utc::now() + Duration::minutes(5));
        assert!(AuthUser::from_claims(&owner).is_none());
    }
}
