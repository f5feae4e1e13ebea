use axum::extract::State;
use axum::Json;
use goforge_core::dependency;

use super::{blocking, required, respond, PathBody};
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/dependency/check
pub async fn check(
    State(app): State<AppState>,
    Json(body): Json<PathBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let path = required("path", body.path)?;
    let runner = app.runner.clone();
    let report = blocking(move || dependency::check_outdated(runner.as_ref(), &path)).await?;
    respond("Dependency check completed", &report)
}

/// POST /api/dependency/update
pub async fn update(
    State(app): State<AppState>,
    Json(body): Json<PathBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let path = required("path", body.path)?;
    let runner = app.runner.clone();
    let report = blocking(move || dependency::update(runner.as_ref(), &path)).await?;
    respond("Dependencies updated", &report)
}

/// POST /api/dependency/security
pub async fn security(
    State(app): State<AppState>,
    Json(body): Json<PathBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let path = required("path", body.path)?;
    let runner = app.runner.clone();
    let report = blocking(move || dependency::check_security(runner.as_ref(), &path)).await?;
    respond("Security check completed", &report)
}
