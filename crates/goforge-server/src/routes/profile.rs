use std::path::PathBuf;
use std::time::Duration;

use axum::extract::State;
use axum::Json;
use goforge_core::profiler;

use super::{blocking, required, respond};
use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize, Default)]
#[serde(default)]
pub struct CpuBody {
    pub binary: Option<String>,
    pub output: Option<String>,
    pub duration: Option<u64>,
}

#[derive(serde::Deserialize, Default)]
#[serde(default)]
pub struct MemoryBody {
    pub binary: Option<String>,
    pub output: Option<String>,
}

#[derive(serde::Deserialize, Default)]
#[serde(default)]
pub struct VisualizeBody {
    pub profile: Option<String>,
}

fn output_or(value: Option<String>, default: &std::path::Path) -> PathBuf {
    value
        .filter(|o| !o.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| default.to_path_buf())
}

/// POST /api/profile/cpu
pub async fn cpu(
    State(app): State<AppState>,
    Json(body): Json<CpuBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let binary = required("binary", body.binary)?;
    let output = output_or(body.output, &app.config.profile.cpu_output);
    let duration = Duration::from_secs(body.duration.unwrap_or(app.config.profile.duration_secs));
    let runner = app.runner.clone();
    let report =
        blocking(move || profiler::cpu_profile(runner.as_ref(), &binary, &output, duration))
            .await?;
    respond("CPU profiling completed", &report)
}

/// POST /api/profile/memory
pub async fn memory(
    State(app): State<AppState>,
    Json(body): Json<MemoryBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let binary = required("binary", body.binary)?;
    let output = output_or(body.output, &app.config.profile.mem_output);
    let runner = app.runner.clone();
    let report =
        blocking(move || profiler::memory_profile(runner.as_ref(), &binary, &output)).await?;
    respond("Memory profiling completed", &report)
}

/// POST /api/profile/visualize
pub async fn visualize(
    State(app): State<AppState>,
    Json(body): Json<VisualizeBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let profile = required("profile", body.profile)?;
    let runner = app.runner.clone();
    let report = blocking(move || profiler::visualize(runner.as_ref(), &profile)).await?;
    respond("Profile visualization completed", &report)
}
