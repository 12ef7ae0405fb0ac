//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod administrators;
pub mod health;
pub mod organizations;
pub mod pricing;
pub mod validation;

/// Creates the API router. Everything except health and registration sits
/// behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(organizations::routes())
        .merge(pricing::routes())
        .merge(validation::routes())
        .merge(administrators::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(organizations::public_routes())
        .merge(protected_routes)
}
