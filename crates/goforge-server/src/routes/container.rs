use std::path::PathBuf;

use axum::extract::State;
use axum::Json;
use goforge_core::container::{self, DockerfileOptions, KubernetesOptions};

use super::{blocking, required, respond};
use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize, Default)]
#[serde(default)]
pub struct DockerfileBody {
    pub path: Option<String>,
    pub output: Option<String>,
    pub base_image: Option<String>,
}

#[derive(serde::Deserialize, Default)]
#[serde(default)]
pub struct KubernetesBody {
    pub path: Option<String>,
    pub output: Option<String>,
    pub image: Option<String>,
}

/// POST /api/container/dockerfile
pub async fn dockerfile(
    State(app): State<AppState>,
    Json(body): Json<DockerfileBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let path = required("path", body.path)?;
    let cfg = &app.config.container;
    let opts = DockerfileOptions {
        output: body
            .output
            .filter(|o| !o.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| cfg.dockerfile.clone()),
        base_image: body
            .base_image
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| cfg.base_image.clone()),
        port: cfg.port,
    };
    let report = blocking(move || container::generate_dockerfile(&path, &opts)).await?;
    respond("Dockerfile generated", &report)
}

/// POST /api/container/kubernetes
pub async fn kubernetes(
    State(app): State<AppState>,
    Json(body): Json<KubernetesBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let path = required("path", body.path)?;
    let cfg = &app.config.container;
    let opts = KubernetesOptions {
        output_dir: body
            .output
            .filter(|o| !o.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| cfg.manifests_dir.clone()),
        image: body.image,
        replicas: cfg.replicas,
        port: cfg.port,
    };
    let report = blocking(move || container::generate_kubernetes(&path, &opts)).await?;
    respond("Kubernetes manifests generated", &report)
}
