//! Administrator provisioning routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post},
};
use orgdesk_core::provisioning::{AdministratorUpdate, NewAdministrator};
use orgdesk_shared::types::{CredentialId, OrganizationId};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::{AppState, middleware::AuthUser};

/// Creates the administrators router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{org_id}/administrator",
            post(create_administrator),
        )
        .route(
            "/administrators/{credential_id}",
            patch(update_administrator),
        )
}

/// POST `/organizations/{org_id}/administrator` - Create the administrator.
///
/// The initial secret appears in this response and nowhere else.
async fn create_administrator(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<NewAdministrator>,
) -> ApiResult<impl IntoResponse> {
    let provisioned = state
        .service
        .create_administrator(auth.actor(), OrganizationId::from_uuid(org_id), payload)
        .await?;

    info!(
        org_id = %provisioned.credential.organization_id,
        credential_id = %provisioned.credential.id,
        "Administrator created"
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "credential": provisioned.credential,
            "initial_secret": provisioned.initial_secret,
        })),
    ))
}

/// PATCH `/administrators/{credential_id}` - Update administrator details.
async fn update_administrator(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(credential_id): Path<Uuid>,
    Json(payload): Json<AdministratorUpdate>,
) -> ApiResult<impl IntoResponse> {
    let rotated = payload.secret.is_some();
    let credential = state
        .service
        .update_administrator(auth.actor(), CredentialId::from_uuid(credential_id), payload)
        .await?;

    info!(
        org_id = %credential.organization_id,
        credential_id = %credential.id,
        secret_rotated = rotated,
        "Administrator updated"
    );
    Ok(Json(credential))
}
