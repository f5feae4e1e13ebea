use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use goforge_core::error::GoforgeError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400 Bad Request errors
// ---------------------------------------------------------------------------

/// Carries a request validation message through the `anyhow::Error` chain
/// verbatim, without a `GoforgeError` prefix.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<GoforgeError>() {
            match e {
                GoforgeError::PathNotFound(_) => StatusCode::NOT_FOUND,
                GoforgeError::NotGoSource(_)
                | GoforgeError::NotADirectory(_)
                | GoforgeError::UnsupportedFormat(_)
                | GoforgeError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                GoforgeError::Parse { .. } | GoforgeError::ToolFailed { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                GoforgeError::ToolNotFound(_) => StatusCode::SERVICE_UNAVAILABLE,
                GoforgeError::Grammar(_)
                | GoforgeError::Template(_)
                | GoforgeError::ToolSpawnFailed { .. }
                | GoforgeError::HomeNotFound
                | GoforgeError::Io(_)
                | GoforgeError::Yaml(_)
                | GoforgeError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            tracing::warn!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
