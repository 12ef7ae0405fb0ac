//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes over the onboarding service
//! - Bearer token authentication
//! - Error-to-response mapping

pub mod error;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod tests;

use axum::Router;
use orgdesk_core::OnboardingService;
use orgdesk_shared::JwtService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Onboarding operations.
    pub service: OnboardingService,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
