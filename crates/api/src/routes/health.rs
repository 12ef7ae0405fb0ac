//! Liveness endpoint.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Body of `GET /health`.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "orgdesk",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Creates the health route. It sits outside the auth middleware.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
