//! Cache diagnostics and invalidation endpoints.

use alumni_cache::CacheStats;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Response de GET /cache/stats.
#[derive(Debug, Serialize)]
pub struct AllStatsResponse {
    pub namespaces: Vec<CacheStats>,
}

/// Response para operaciones de invalidacion.
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    /// Numero de entries invalidadas.
    pub invalidated: usize,
    /// Mensaje descriptivo.
    pub message: String,
}

/// Response de POST /cache/sweep.
#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub removed: usize,
}

/// Query opcional para DELETE /cache/{namespace}.
#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    /// Glob pattern; when absent the whole namespace is cleared.
    pub pattern: Option<String>,
}

/// GET /cache/stats
pub async fn all_stats(State(state): State<AppState>) -> Json<AllStatsResponse> {
    Json(AllStatsResponse {
        namespaces: state.cache().all_stats(),
    })
}

/// GET /cache/stats/{namespace}
#[instrument(skip_all, fields(namespace = %namespace))]
pub async fn namespace_stats(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<CacheStats>, AppError> {
    Ok(Json(state.cache().stats(&namespace)?))
}

/// DELETE /cache/{namespace}?pattern=
/// Invalida todo el namespace, o solo las keys que coinciden con el patron.
#[instrument(skip_all, fields(namespace = %namespace))]
pub async fn clear_namespace(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    Query(query): Query<ClearQuery>,
) -> Result<Json<InvalidateResponse>, AppError> {
    let cache = state.cache();

    let response = match query.pattern.as_deref() {
        Some(pattern) => {
            let result = cache.invalidate_matching(&namespace, pattern)?;
            InvalidateResponse {
                invalidated: result.count,
                message: format!(
                    "Invalidated {} entries matching '{}' in namespace '{}'",
                    result.count, pattern, namespace
                ),
            }
        },
        None => {
            let count = cache.clear(&namespace)?;
            InvalidateResponse {
                invalidated: count,
                message: format!("Cleared {} entries from namespace '{}'", count, namespace),
            }
        },
    };

    tracing::info!(
        namespace = %namespace,
        count = response.invalidated,
        "Cache entries invalidated"
    );
    Ok(Json(response))
}

/// DELETE /cache/{namespace}/{key}
#[instrument(skip_all, fields(namespace = %namespace, key = %key))]
pub async fn invalidate_key(
    State(state): State<AppState>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<InvalidateResponse>, AppError> {
    let removed = state.cache().invalidate(&namespace, &key)?;

    tracing::info!(namespace = %namespace, key = %key, removed, "Cache entry invalidated");

    let message = if removed {
        format!("Invalidated key '{}' in namespace '{}'", key, namespace)
    } else {
        format!("Key '{}' was not cached in namespace '{}'", key, namespace)
    };
    Ok(Json(InvalidateResponse {
        invalidated: usize::from(removed),
        message,
    }))
}

/// POST /cache/sweep
/// Ejecuta un sweep inmediato de entries muertas.
pub async fn sweep(State(state): State<AppState>) -> Json<SweepResponse> {
    Json(SweepResponse {
        removed: state.cache().sweep(),
    })
}
