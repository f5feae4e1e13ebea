use axum::Json;
use goforge_core::analyzer;

use super::{blocking, required, respond, PathBody};
use crate::error::AppError;

/// POST /api/analyze/structure
pub async fn structure(Json(body): Json<PathBody>) -> Result<Json<serde_json::Value>, AppError> {
    let path = required("path", body.path)?;
    let report = blocking(move || analyzer::analyze_structure(&path)).await?;
    respond("Structure analysis completed", &report)
}

/// POST /api/analyze/quality
pub async fn quality(Json(body): Json<PathBody>) -> Result<Json<serde_json::Value>, AppError> {
    let path = required("path", body.path)?;
    let report = blocking(move || analyzer::analyze_quality(&path)).await?;
    respond("Quality analysis completed", &report)
}
