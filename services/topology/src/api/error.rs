//! API error types and helpers.
//!
//! # Purpose
//! Centralizes HTTP error response construction so every endpoint returns the
//! same `{code, message}` shape, and maps service error categories onto status
//! codes.
//!
//! # Key invariants
//! - `status` always matches the semantics of `body.code`.
//! - Internal errors log details server-side and return a generic message.
use crate::api::types::ErrorResponse;
use crate::error::ServiceError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::fmt::Debug;

/// Structured API error returned by handlers.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use topology::api::error::ApiError;
/// use topology::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::NOT_FOUND,
///     body: ErrorResponse {
///         code: "not_found".to_string(),
///         message: "missing".to_string(),
///         request_id: None,
///     },
/// };
/// assert_eq!(err.body.code, "not_found");
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 409 Conflict error with a caller-provided code.
pub fn api_conflict(code: &str, message: &str) -> ApiError {
    api_error(StatusCode::CONFLICT, code, message)
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Build a 500 Internal Server Error, logging the underlying failure.
pub fn api_internal(message: &str, err: &impl Debug) -> ApiError {
    tracing::error!(error = ?err, "topology internal error");
    api_internal_message(message)
}

/// Build a 500 Internal Server Error without an underlying error to log.
pub fn api_internal_message(message: &str) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Conflict(message) => api_conflict("conflict", message),
            ServiceError::BadRequest(message) => api_validation_error(message),
            ServiceError::NotFound(message) => api_not_found(message),
            ServiceError::Integrity(_) => api_internal("topology integrity violation", &err),
            ServiceError::Broker(_) => api_internal("broker operation failed", &err),
            ServiceError::Store(_) => api_internal("catalog operation failed", &err),
        }
    }
}
