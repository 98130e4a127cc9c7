//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and a flat JSON error body.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": "all candidate models failed; last error: ...",
///   "code": 3002
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Numeric error code (see [`GatewayError::error_code`]).
    pub code: u32,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status               |
/// |-----------|---------------------|---------------------------|
/// | 1000–1999 | Client input        | 400 Bad Request           |
/// | 2000–2999 | Not found           | 404 Not Found             |
/// | 3000–3999 | Pipeline / provider | 500 Internal Server Error |
/// | 4000–4999 | Store               | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Upload missing, empty or of a disallowed type.
    #[error("{0}")]
    Intake(String),

    /// Request validation failed (disallowed update field, empty comment).
    #[error("{0}")]
    Validation(String),

    /// Every fallback candidate failed. Carries only the last error.
    #[error("all candidate models failed; last error: {last_error}")]
    AllModelsExhausted {
        /// Message of the final candidate's failure.
        last_error: String,
    },

    /// No JSON object could be recovered from the model response.
    #[error("could not parse extraction response: {0}")]
    UnparseableExtraction(String),

    /// Event with the given identifier does not exist.
    #[error("event not found: {0}")]
    EventNotFound(String),

    /// Comment with the given identifier does not exist on the event.
    #[error("comment not found: {0}")]
    CommentNotFound(String),

    /// No profile exists for the given identity.
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Local file storage failure (upload directory missing or unwritable).
    #[error("storage error: {0}")]
    Storage(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Intake(_) => 1001,
            Self::Validation(_) => 1002,
            Self::EventNotFound(_) => 2001,
            Self::CommentNotFound(_) => 2002,
            Self::ProfileNotFound(_) => 2003,
            Self::Internal(_) => 3000,
            Self::UnparseableExtraction(_) => 3001,
            Self::AllModelsExhausted { .. } => 3002,
            Self::PersistenceError(_) => 4001,
            Self::Storage(_) => 4002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Intake(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::EventNotFound(_) | Self::CommentNotFound(_) | Self::ProfileNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::AllModelsExhausted { .. }
            | Self::UnparseableExtraction(_)
            | Self::PersistenceError(_)
            | Self::Storage(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(e: sqlx::Error) -> Self {
        Self::PersistenceError(e.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        Self::PersistenceError(format!("malformed document: {e}"))
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for GatewayError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Intake(rejection.body_text())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.error_code(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(
            GatewayError::Intake("no photo".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::Validation("empty".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn pipeline_errors_map_to_500() {
        let exhausted = GatewayError::AllModelsExhausted {
            last_error: "quota".to_string(),
        };
        assert_eq!(exhausted.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(exhausted.to_string().ends_with("quota"));
        assert_eq!(
            GatewayError::UnparseableExtraction("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_faults_map_to_500() {
        let err = GatewayError::Storage("read-only file system".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 4002);
    }

    #[test]
    fn missing_records_map_to_404() {
        assert_eq!(
            GatewayError::CommentNotFound("c1".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
