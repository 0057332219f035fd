//! GET /health: liveness probe.

use axum::Json;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Handler: GET /health
///
/// Never touches the answer provider, so it stays green when the upstream
/// API or the credential is broken.
pub async fn health() -> Json<HealthResponse> {
    debug!("health check requested");
    Json(HealthResponse { status: "ok" })
}
