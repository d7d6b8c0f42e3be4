//! HTTP error mapping.

use alumni_cache::CacheError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::directory::DirectoryError;
use crate::services::ServiceError;

#[derive(Debug)]
pub enum AppError {
    /// Recurso no encontrado
    NotFound(String),

    /// Parametros invalidos
    BadRequest(String),

    /// El directorio de estudiantes no responde
    Unavailable(String),

    /// Error interno
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not Found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg),
            AppError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service Unavailable",
                msg,
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                msg,
            ),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), message = %message, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        match &err {
            CacheError::NamespaceNotFound(name) => {
                AppError::NotFound(format!("Cache namespace '{}' not found", name))
            },
            CacheError::EmptyKey => AppError::BadRequest(err.to_string()),
            // El error del origen de datos llega tal cual al cliente
            CacheError::Producer(source) => match source.downcast_ref::<DirectoryError>() {
                Some(directory) => AppError::from_directory(directory),
                None => AppError::Internal(source.to_string()),
            },
            _ => AppError::Internal(err.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Cache(err) => err.into(),
            ServiceError::Directory(err) => AppError::from_directory(&err),
            ServiceError::InvalidInput(msg) => AppError::BadRequest(msg),
        }
    }
}

impl AppError {
    fn from_directory(err: &DirectoryError) -> Self {
        match err {
            DirectoryError::InvalidRecord(msg) => AppError::BadRequest(msg.clone()),
            err if err.is_transient() => AppError::Unavailable(err.to_string()),
            err => AppError::Internal(err.to_string()),
        }
    }
}
