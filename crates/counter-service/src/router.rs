//! Axum router wiring for the two listeners.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, handler, lifecycle, ops};

/// Primary listener: the counter itself.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::counter))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            lifecycle::abandon_on_deadline,
        ))
        .with_state(state)
}

/// Administrative listener: health, metrics, about.
pub fn build_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(ops::metrics))
        .route("/live", get(ops::live))
        .route("/ready", get(ops::ready))
        .route("/about", get(ops::about))
        .with_state(state)
}
