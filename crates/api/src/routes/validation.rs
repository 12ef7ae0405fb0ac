//! Payment submission and validation routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use orgdesk_core::payment::{PaymentMethod, PaymentSubmission};
use orgdesk_core::validation::{ValidationStage, ValidationStatus};
use orgdesk_shared::types::{CurrencyCode, Money, OrganizationId, PageRequest};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::{AppState, middleware::AuthUser};

/// Creates the validation router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}/payments", post(submit_payment))
        .route("/organizations/{org_id}/validation", get(validation_status))
        .route(
            "/organizations/{org_id}/validation/events",
            get(validation_events),
        )
        .route(
            "/organizations/{org_id}/validation/{stage}",
            post(set_validation_stage),
        )
}

/// Body of `POST /organizations/{org_id}/payments`.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Amount paid.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// How it was paid.
    pub method: PaymentMethod,
    /// Receipt number, unique per organization.
    pub receipt_number: String,
}

/// Body of `POST /organizations/{org_id}/validation/{stage}`.
#[derive(Debug, Deserialize)]
pub struct StageChangeRequest {
    /// Target status name within the stage.
    pub status: String,
    /// Reviewer's reason; required when declining.
    pub reason: Option<String>,
}

fn status_body(status: &ValidationStatus) -> Value {
    json!({
        "status": status,
        "ready": status.is_ready(),
        "outstanding": status.outstanding_prerequisites(),
    })
}

/// POST `/organizations/{org_id}/payments` - Submit a payment for validation.
async fn submit_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<PaymentRequest>,
) -> ApiResult<impl IntoResponse> {
    let currency = CurrencyCode::parse(&payload.currency).map_err(ApiError::validation)?;
    let submission = PaymentSubmission {
        amount: Money::new(payload.amount, currency),
        method: payload.method,
        receipt_number: payload.receipt_number,
    };

    let receipt = state
        .service
        .submit_payment(auth.actor(), OrganizationId::from_uuid(org_id), submission)
        .await?;

    let status = if receipt.replayed {
        StatusCode::OK
    } else {
        info!(
            org_id = %receipt.payment.organization_id,
            payment_id = %receipt.payment.id,
            receipt_number = %receipt.payment.receipt_number,
            "Payment submitted"
        );
        StatusCode::CREATED
    };
    Ok((status, Json(receipt)))
}

/// GET `/organizations/{org_id}/validation` - Read validation status and readiness.
async fn validation_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let status = state
        .service
        .validation_status(auth.actor(), OrganizationId::from_uuid(org_id))
        .await?;
    Ok(Json(status_body(&status)))
}

/// GET `/organizations/{org_id}/validation/events` - List the audit trail.
async fn validation_events(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let events = state
        .service
        .validation_events(auth.actor(), OrganizationId::from_uuid(org_id), &page)
        .await?;
    Ok(Json(events))
}

/// POST `/organizations/{org_id}/validation/{stage}` - Change a validation stage.
async fn set_validation_stage(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, stage)): Path<(Uuid, String)>,
    Json(payload): Json<StageChangeRequest>,
) -> ApiResult<impl IntoResponse> {
    let stage = ValidationStage::parse(&stage)
        .ok_or_else(|| ApiError::validation(format!("Unknown validation stage: {stage}")))?;

    let outcome = state
        .service
        .set_validation_stage(
            auth.actor(),
            OrganizationId::from_uuid(org_id),
            stage,
            &payload.status,
            payload.reason,
        )
        .await?;

    info!(
        org_id = %org_id,
        stage = %stage,
        status = outcome.status.stage_status(stage).as_str(),
        version = outcome.status.version,
        reviewer = %auth.actor().user_id,
        "Validation stage changed"
    );

    let mut body = status_body(&outcome.status);
    body["events"] = json!(outcome.events);
    body["became_ready"] = json!(outcome.became_ready());
    Ok(Json(body))
}
