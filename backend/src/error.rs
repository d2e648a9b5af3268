use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Per-field validation failure, reported under `errors` in the response body.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Error taxonomy surfaced by the API.
///
/// Every variant maps to a fixed HTTP status and a `{"success": false, ...}`
/// body. Persistence failures collapse into `Internal` and are logged without
/// leaking detail to the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Transition not legal from the record's current status.
    #[error("{0}")]
    InvalidState(String),

    /// Malformed request, e.g. a self-targeted swap.
    #[error("{0}")]
    InvalidOperation(String),

    /// Duplicate of something that must be unique while live.
    #[error("{0}")]
    Conflict(String),

    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidState(_)
            | ApiError::InvalidOperation(_)
            | ApiError::Conflict(_)
            | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::InvalidState(_) => "invalid_state",
            ApiError::InvalidOperation(_) => "invalid_operation",
            ApiError::Conflict(_) => "conflict",
            ApiError::Validation(_) => "validation",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Validation(errors) => json!({
                "success": false,
                "error": self.kind(),
                "errors": errors,
            }),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                json!({
                    "success": false,
                    "error": self.kind(),
                    "message": "Server error",
                })
            }
            other => json!({
                "success": false,
                "error": other.kind(),
                "message": other.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
