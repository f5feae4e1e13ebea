pub mod analyze;
pub mod config;
pub mod container;
pub mod dependency;
pub mod docs;
pub mod health;
pub mod profile;

use std::path::PathBuf;

use axum::Json;
use goforge_core::report::Narrate;
use serde::Serialize;

use crate::error::AppError;

/// Run a core operation on the blocking pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> goforge_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;
    Ok(result?)
}

/// `{"message", "data": {"output", "report"}}` for a finished operation.
pub(crate) fn respond<R: Narrate + Serialize>(
    message: &str,
    report: &R,
) -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(serde_json::json!({
        "message": message,
        "data": {
            "output": report.narration(),
            "report": report,
        },
    })))
}

/// A non-empty string field from a request body, as a path.
pub(crate) fn required(field: &str, value: Option<String>) -> Result<PathBuf, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(PathBuf::from(v)),
        _ => Err(AppError::bad_request(format!("{field} is required"))),
    }
}

/// Request body carrying only a project path.
#[derive(serde::Deserialize, Default)]
#[serde(default)]
pub struct PathBody {
    pub path: Option<String>,
}
