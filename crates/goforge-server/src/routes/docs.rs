use std::path::PathBuf;

use axum::extract::State;
use axum::Json;
use goforge_core::docs::{self, DocFormat};

use super::{blocking, required, respond};
use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize, Default)]
#[serde(default)]
pub struct DocsBody {
    pub path: Option<String>,
    /// `api` (default) or `user`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub format: Option<String>,
    pub output: Option<String>,
}

/// POST /api/docs/generate
pub async fn generate(
    State(app): State<AppState>,
    Json(body): Json<DocsBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let path = required("path", body.path)?;
    let cfg = &app.config.docs;
    let format: DocFormat = body
        .format
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| cfg.format.clone())
        .parse()?;
    let output = |default: &PathBuf| {
        body.output
            .clone()
            .filter(|o| !o.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default.clone())
    };
    let runner = app.runner.clone();

    match body.kind.as_deref().unwrap_or("api") {
        "api" => {
            let output = output(&cfg.api_output);
            let report = blocking(move || {
                docs::generate_api_docs(runner.as_ref(), &path, &output, format)
            })
            .await?;
            respond("API documentation generated", &report)
        }
        "user" => {
            let output = output(&cfg.user_output);
            let report = blocking(move || {
                docs::generate_user_docs(runner.as_ref(), &path, &output, format)
            })
            .await?;
            respond("User documentation generated", &report)
        }
        other => Err(AppError::bad_request(format!(
            "unknown documentation type '{other}' (expected api or user)"
        ))),
    }
}
