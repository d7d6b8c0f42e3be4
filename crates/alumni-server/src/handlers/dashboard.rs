//! Dashboard endpoint.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::AppError;
use crate::services::DashboardSummary;
use crate::state::AppState;

/// GET /dashboard/stats
#[instrument(skip_all)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    Ok(Json(state.dashboard().summary().await?))
}
