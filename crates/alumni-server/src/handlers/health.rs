use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub directory: String,
}

/// GET /health
///
/// Reports `DOWN` with 503 when the student directory does not answer.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let directory = state.directory();
    let (code, status) = match directory.health_check().await {
        Ok(()) => (StatusCode::OK, "UP"),
        Err(err) => {
            tracing::warn!(directory = directory.name(), error = %err, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "DOWN")
        },
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            directory: directory.name().to_string(),
        }),
    )
}
