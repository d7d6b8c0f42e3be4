//! Public certificate verification endpoint.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::error::AppError;
use crate::services::Verification;
use crate::state::AppState;

/// GET /verify/{student_id}
///
/// Always 200 for a well-formed id; unknown students answer `found: false`.
#[instrument(skip_all, fields(student_id = %student_id))]
pub async fn verify_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<Verification>, AppError> {
    let verification = state.verification().verify(&student_id).await?;
    Ok(Json(verification))
}
