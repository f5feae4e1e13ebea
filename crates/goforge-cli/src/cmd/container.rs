use crate::cmd::load_config;
use crate::output::print_report;
use clap::Subcommand;
use goforge_core::container::{self, DockerfileOptions, KubernetesOptions};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum ContainerSubcommand {
    /// Write a multi-stage Dockerfile for the project
    Dockerfile {
        /// Project directory (default: project root)
        path: Option<PathBuf>,
        /// Output file (relative paths land in the project directory)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Builder stage base image
        #[arg(short = 'b', long = "base-image")]
        base_image: Option<String>,
    },

    /// Write Kubernetes Deployment and Service manifests
    Kubernetes {
        /// Project directory (default: project root)
        path: Option<PathBuf>,
        /// Output directory (relative paths land in the project directory)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Container image (default: <app>:latest)
        #[arg(short = 'i', long)]
        image: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: ContainerSubcommand, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?.container;
    match subcmd {
        ContainerSubcommand::Dockerfile {
            path,
            output,
            base_image,
        } => {
            let path = path.unwrap_or_else(|| root.to_path_buf());
            let report = container::generate_dockerfile(
                &path,
                &DockerfileOptions {
                    output: output.unwrap_or(config.dockerfile),
                    base_image: base_image.unwrap_or(config.base_image),
                    port: config.port,
                },
            )?;
            print_report(&report, json)
        }
        ContainerSubcommand::Kubernetes {
            path,
            output,
            image,
        } => {
            let path = path.unwrap_or_else(|| root.to_path_buf());
            let report = container::generate_kubernetes(
                &path,
                &KubernetesOptions {
                    output_dir: output.unwrap_or(config.manifests_dir),
                    image,
                    replicas: config.replicas,
                    port: config.port,
                },
            )?;
            print_report(&report, json)
        }
    }
}
