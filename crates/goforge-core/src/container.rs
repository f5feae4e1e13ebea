//! Dockerfile and Kubernetes manifest generation.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::io;
use crate::paths;
use crate::report::Narrate;
use crate::template::{self, TemplateEngine};

pub const DEPLOYMENT_FILE: &str = "deployment.yaml";
pub const SERVICE_FILE: &str = "service.yaml";

#[derive(Debug, Clone)]
pub struct DockerfileOptions {
    /// Relative paths are placed inside the project root.
    pub output: PathBuf,
    pub base_image: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct KubernetesOptions {
    /// Relative paths are placed inside the project root.
    pub output_dir: PathBuf,
    /// Defaults to `<app>:latest`.
    pub image: Option<String>,
    pub replicas: u32,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct DockerfileReport {
    pub root: PathBuf,
    pub output: PathBuf,
    pub build_command: String,
}

impl Narrate for DockerfileReport {
    fn narrate(&self) -> Vec<String> {
        vec![
            format!("Generating Dockerfile for project at: {}", self.root.display()),
            format!("Dockerfile generated at: {}", self.output.display()),
            String::new(),
            "To build the Docker image, run:".to_string(),
            self.build_command.clone(),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KubernetesReport {
    pub root: PathBuf,
    pub app_name: String,
    pub image: String,
    pub deployment: PathBuf,
    pub service: PathBuf,
    pub apply_command: String,
}

impl Narrate for KubernetesReport {
    fn narrate(&self) -> Vec<String> {
        vec![
            format!(
                "Generating Kubernetes manifests for project at: {}",
                self.root.display()
            ),
            format!("Deployment manifest generated at: {}", self.deployment.display()),
            format!("Service manifest generated at: {}", self.service.display()),
            String::new(),
            "To apply the manifests, run:".to_string(),
            self.apply_command.clone(),
        ]
    }
}

#[derive(Serialize)]
struct DockerfileContext<'a> {
    base_image: &'a str,
    port: u16,
}

#[derive(Serialize)]
struct ManifestContext<'a> {
    app_name: &'a str,
    image: &'a str,
    replicas: u32,
    port: u16,
}

/// Image and resource name for the project: its directory name, lower-cased.
pub fn image_name(root: &Path) -> String {
    paths::app_name(root).to_lowercase()
}

pub fn generate_dockerfile(root: &Path, opts: &DockerfileOptions) -> Result<DockerfileReport> {
    let root = paths::require_dir(root)?;
    let output = paths::resolve_in(&root, &opts.output);

    let text = TemplateEngine::shared()?.render(
        template::DOCKERFILE,
        &DockerfileContext {
            base_image: &opts.base_image,
            port: opts.port,
        },
    )?;
    io::atomic_write(&output, text.as_bytes())?;
    tracing::info!(output = %output.display(), "generated Dockerfile");

    let build_command = format!(
        "docker build -t {}:latest -f {} {}",
        image_name(&root),
        output.display(),
        root.display()
    );
    Ok(DockerfileReport {
        root,
        output,
        build_command,
    })
}

pub fn generate_kubernetes(root: &Path, opts: &KubernetesOptions) -> Result<KubernetesReport> {
    let root = paths::require_dir(root)?;
    let out_dir = paths::resolve_in(&root, &opts.output_dir);
    io::ensure_dir(&out_dir)?;

    let app_name = image_name(&root);
    let image = opts
        .image
        .clone()
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| format!("{app_name}:latest"));

    let ctx = ManifestContext {
        app_name: &app_name,
        image: &image,
        replicas: opts.replicas,
        port: opts.port,
    };
    let engine = TemplateEngine::shared()?;

    let deployment = out_dir.join(DEPLOYMENT_FILE);
    io::atomic_write(
        &deployment,
        engine.render(template::K8S_DEPLOYMENT, &ctx)?.as_bytes(),
    )?;
    let service = out_dir.join(SERVICE_FILE);
    io::atomic_write(&service, engine.render(template::K8S_SERVICE, &ctx)?.as_bytes())?;
    tracing::info!(dir = %out_dir.display(), "generated Kubernetes manifests");

    Ok(KubernetesReport {
        root,
        apply_command: format!("kubectl apply -f {}", out_dir.display()),
        app_name,
        image,
        deployment,
        service,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(dir: &TempDir) -> PathBuf {
        let root = dir.path().join("MyService");
        std::fs::create_dir_all(&root).unwrap();
        root
    }

    #[test]
    fn dockerfile_uses_base_image_and_port() {
        let dir = TempDir::new().unwrap();
        let root = project(&dir);
        let report = generate_dockerfile(
            &root,
            &DockerfileOptions {
                output: PathBuf::from("Dockerfile"),
                base_image: "golang:1.22-alpine".to_string(),
                port: 9090,
            },
        )
        .unwrap();

        let text = std::fs::read_to_string(&report.output).unwrap();
        assert!(text.starts_with("FROM golang:1.22-alpine AS builder"));
        assert!(text.contains("EXPOSE 9090"));
        assert!(report.output.starts_with(paths::absolute(&root)));
        assert!(report.build_command.starts_with("docker build -t myservice:latest"));
    }

    #[test]
    fn kubernetes_defaults_image_to_app_name() {
        let dir = TempDir::new().unwrap();
        let root = project(&dir);
        let report = generate_kubernetes(
            &root,
            &KubernetesOptions {
                output_dir: PathBuf::from("k8s"),
                image: None,
                replicas: 2,
                port: 8080,
            },
        )
        .unwrap();

        assert_eq!(report.image, "myservice:latest");
        let deployment = std::fs::read_to_string(&report.deployment).unwrap();
        assert!(deployment.contains("name: myservice"));
        assert!(deployment.contains("image: myservice:latest"));
        assert!(deployment.contains("replicas: 2"));
        assert!(deployment.contains("containerPort: 8080"));
        let service = std::fs::read_to_string(&report.service).unwrap();
        assert!(service.contains("kind: Service"));
        assert!(service.contains("targetPort: 8080"));
    }

    #[test]
    fn kubernetes_explicit_image_wins() {
        let dir = TempDir::new().unwrap();
        let root = project(&dir);
        let report = generate_kubernetes(
            &root,
            &KubernetesOptions {
                output_dir: dir.path().join("manifests"),
                image: Some("registry.example.com/svc:1.0".to_string()),
                replicas: 3,
                port: 8080,
            },
        )
        .unwrap();
        assert_eq!(report.image, "registry.example.com/svc:1.0");
        assert!(report.deployment.starts_with(dir.path().join("manifests")));
    }
}
