//! Organization registration and profile routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use orgdesk_core::organization::NewOrganization;
use orgdesk_shared::types::{ActivationId, OrganizationId};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::{AppState, middleware::AuthUser};

/// Routes open to unauthenticated callers.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/organizations", post(register_organization))
}

/// Creates the organizations router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}", get(get_organization))
        .route(
            "/organizations/{org_id}/deactivate",
            post(deactivate_organization),
        )
        .route(
            "/organizations/{org_id}/engagement",
            put(apply_engagement_selection),
        )
}

/// Body of `PUT /organizations/{org_id}/engagement`.
#[derive(Debug, Deserialize)]
pub struct EngagementSelectionRequest {
    /// Activation to apply to the profile.
    pub activation_id: Uuid,
    /// Optional pricing tier label.
    pub pricing_tier: Option<String>,
}

/// POST /organizations - Register a new organization.
async fn register_organization(
    State(state): State<AppState>,
    Json(payload): Json<NewOrganization>,
) -> ApiResult<impl IntoResponse> {
    let profile = state.service.register_organization(payload).await?;

    info!(
        org_id = %profile.id,
        country = %profile.classification.country,
        "Organization registered"
    );
    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET `/organizations/{org_id}` - Get the organization profile.
async fn get_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let profile = state
        .service
        .get_organization(auth.actor(), OrganizationId::from_uuid(org_id))
        .await?;
    Ok(Json(profile))
}

/// POST `/organizations/{org_id}/deactivate` - Soft-delete an organization.
async fn deactivate_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let profile = state
        .service
        .deactivate_organization(auth.actor(), OrganizationId::from_uuid(org_id))
        .await?;

    info!(org_id = %profile.id, reviewer = %auth.actor().user_id, "Organization deactivated");
    Ok(Json(profile))
}

/// PUT `/organizations/{org_id}/engagement` - Apply an activation to the profile.
async fn apply_engagement_selection(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<EngagementSelectionRequest>,
) -> ApiResult<impl IntoResponse> {
    let profile = state
        .service
        .apply_engagement_selection(
            auth.actor(),
            OrganizationId::from_uuid(org_id),
            ActivationId::from_uuid(payload.activation_id),
            payload.pricing_tier,
        )
        .await?;

    info!(
        org_id = %profile.id,
        activation_id = %payload.activation_id,
        "Engagement selection applied"
    );
    Ok(Json(profile))
}
