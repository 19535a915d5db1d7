use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Generic body message for every 500 response.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce `{ "error": "..." }` JSON bodies.
/// Command execution failures are *not* represented here: they are part of
/// a successful `/cmd` response.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// `/cmd` called with anything other than `GET`.
    #[error("Method not allowed. Use GET.")]
    MethodNotAllowed,

    /// Admin key configured and the request's `x-api-key` did not match.
    #[error("Unauthorized: missing or invalid API key")]
    Unauthorized,

    /// `command` query parameter absent or empty.
    #[error("Missing \"command\" query parameter")]
    MissingCommand,

    /// `command` is not a registry key.
    #[error("Command not allowed")]
    CommandNotAllowed,

    /// Unexpected server-side fault. The detail is logged, never returned.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::MissingCommand => StatusCode::BAD_REQUEST,
            AppError::CommandNotAllowed => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

/// JSON 500 response used by the panic-catching layer.
pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}
