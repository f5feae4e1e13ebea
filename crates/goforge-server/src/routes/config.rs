use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/config: effective configuration plus validation warnings.
pub async fn get_config(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let warnings = app.config.validate();
    Ok(Json(serde_json::json!({
        "config": app.config.as_ref(),
        "warnings": warnings,
    })))
}
