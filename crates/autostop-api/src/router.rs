//! Route definitions for the auto-shutdown HTTP API.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/autoshutdownrules", post(handlers::rules::apply_rules))
        .route("/healthz", get(handlers::health::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
