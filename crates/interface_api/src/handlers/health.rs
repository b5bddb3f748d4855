//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub policy_store: String,
    pub llm_enabled: bool,
}

/// Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe; fails while the policy store does not answer
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let (status, store) = match state.coverage.ping().await {
        Ok(()) => (StatusCode::OK, "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Policy store not ready");
            (StatusCode::SERVICE_UNAVAILABLE, format!("unavailable: {}", e))
        }
    };

    (
        status,
        Json(ReadinessResponse {
            status: if status.is_success() { "ready" } else { "not_ready" }.to_string(),
            policy_store: store,
            llm_enabled: state.coverage.has_llm(),
        }),
    )
}
