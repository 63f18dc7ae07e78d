//! Health check handler.

use axum::Json;

use crate::dto::response::HealthResponse;

/// GET /healthz
///
/// Liveness only; no dependency checks.
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
