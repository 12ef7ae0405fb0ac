//! Pricing resolution, activation and catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use orgdesk_core::activation::ActivationRequest;
use orgdesk_core::pricing::{
    BillingFrequency, EngagementModel, MembershipFeeResolution, MembershipStatus,
    MembershipTerm, NewMembershipFee, NewPricingConfig, NotFoundReason, PriceResolution,
};
use orgdesk_shared::types::{OrganizationId, PageRequest};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::{AppState, middleware::AuthUser};

/// Creates the pricing router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{org_id}/pricing/resolve",
            post(resolve_price),
        )
        .route(
            "/organizations/{org_id}/membership-fee",
            get(resolve_membership_fee),
        )
        .route(
            "/organizations/{org_id}/activations",
            post(activate_engagement).get(list_activations),
        )
        .route("/pricing/configs", post(create_pricing_config))
        .route("/pricing/membership-fees", post(create_membership_fee))
}

/// Body of `POST /organizations/{org_id}/pricing/resolve`.
#[derive(Debug, Deserialize)]
pub struct ResolvePriceRequest {
    /// Engagement model to price.
    pub engagement_model: EngagementModel,
    /// Membership status to price for.
    pub membership_status: MembershipStatus,
    /// Billing frequency for subscription pricing.
    pub billing_frequency: Option<BillingFrequency>,
}

/// Query of `GET /organizations/{org_id}/membership-fee`.
#[derive(Debug, Deserialize)]
pub struct MembershipFeeQuery {
    /// Term name, e.g. `annual`.
    pub term: String,
}

/// Price lookups that found nothing are a 404 carrying the typed reason.
fn not_found(reason: &NotFoundReason) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "PRICING_NOT_FOUND",
            "message": reason.to_string(),
            "reason": reason,
        })),
    )
        .into_response()
}

/// POST `/organizations/{org_id}/pricing/resolve` - Resolve the applicable price.
async fn resolve_price(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<ResolvePriceRequest>,
) -> ApiResult<Response> {
    let resolution = state
        .service
        .resolve_price(
            auth.actor(),
            OrganizationId::from_uuid(org_id),
            payload.engagement_model,
            payload.membership_status,
            payload.billing_frequency,
        )
        .await?;

    Ok(match resolution {
        PriceResolution::Resolved(price) => Json(price).into_response(),
        PriceResolution::NotFound { reason } => not_found(&reason),
    })
}

/// GET `/organizations/{org_id}/membership-fee?term=` - Resolve a membership fee.
async fn resolve_membership_fee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<MembershipFeeQuery>,
) -> ApiResult<Response> {
    let term = MembershipTerm::parse(&query.term)
        .ok_or_else(|| ApiError::validation(format!("Unknown membership term: {}", query.term)))?;

    let resolution = state
        .service
        .resolve_membership_fee(auth.actor(), OrganizationId::from_uuid(org_id), term)
        .await?;

    Ok(match resolution {
        MembershipFeeResolution::Resolved(fee) => Json(fee).into_response(),
        MembershipFeeResolution::NotFound { reason } => not_found(&reason),
    })
}

/// POST `/organizations/{org_id}/activations` - Activate an engagement model.
async fn activate_engagement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<ActivationRequest>,
) -> ApiResult<impl IntoResponse> {
    let activation = state
        .service
        .activate_engagement(auth.actor(), OrganizationId::from_uuid(org_id), payload)
        .await?;

    info!(
        org_id = %activation.organization_id,
        activation_id = %activation.id,
        engagement_model = %activation.engagement_model,
        final_price = %activation.final_price,
        "Engagement activated"
    );
    Ok((StatusCode::CREATED, Json(activation)))
}

/// GET `/organizations/{org_id}/activations` - List activation history.
async fn list_activations(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let activations = state
        .service
        .list_activations(auth.actor(), OrganizationId::from_uuid(org_id), &page)
        .await?;
    Ok(Json(activations))
}

/// POST /pricing/configs - Add a pricing record.
async fn create_pricing_config(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewPricingConfig>,
) -> ApiResult<impl IntoResponse> {
    let record = state
        .service
        .create_pricing_config(auth.actor(), payload)
        .await?;

    info!(
        pricing_config_id = %record.id,
        country = %record.scope.country,
        reviewer = %auth.actor().user_id,
        "Pricing config created"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /pricing/membership-fees - Add a membership fee record.
async fn create_membership_fee(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewMembershipFee>,
) -> ApiResult<impl IntoResponse> {
    let record = state
        .service
        .create_membership_fee(auth.actor(), payload)
        .await?;

    info!(
        membership_fee_id = %record.id,
        country = %record.country,
        reviewer = %auth.actor().user_id,
        "Membership fee created"
    );
    Ok((StatusCode::CREATED, Json(record)))
}
