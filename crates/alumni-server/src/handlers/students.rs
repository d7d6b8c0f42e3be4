//! Student endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use crate::directory::{Page, Student};
use crate::error::AppError;
use crate::services::UpsertOutcome;
use crate::state::AppState;

/// Query de paginacion.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    20
}

/// GET /students?page=&per_page=
#[instrument(skip_all, fields(page = query.page, per_page = query.per_page))]
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Student>>, AppError> {
    let page = state.students().page(query.page, query.per_page).await?;
    Ok(Json(page))
}

/// GET /students/by-email/{email}
#[instrument(skip_all, fields(email = %email))]
pub async fn student_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Student>, AppError> {
    state
        .students()
        .by_email(&email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No student with email '{}'", email)))
}

/// PUT /students/{student_id}
///
/// 201 when the student is new, 200 when it replaced an existing record.
#[instrument(skip_all, fields(student_id = %student_id))]
pub async fn upsert_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(student): Json<Student>,
) -> Result<(StatusCode, Json<UpsertOutcome>), AppError> {
    let outcome = state.students().upsert(&student_id, student).await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome)))
}
