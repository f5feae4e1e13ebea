use crate::output::print_report;
use anyhow::Context;
use clap::Subcommand;
use goforge_core::analyzer;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum AnalyzeSubcommand {
    /// Walk the project tree and summarize directories, files and packages
    Structure {
        /// Project directory (default: project root)
        path: Option<PathBuf>,
    },

    /// Parse every Go source and report documentation and complexity metrics
    Quality {
        /// Project directory (default: project root)
        path: Option<PathBuf>,
    },
}

pub fn run(root: &Path, subcmd: AnalyzeSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        AnalyzeSubcommand::Structure { path } => {
            let path = path.unwrap_or_else(|| root.to_path_buf());
            let report = analyzer::analyze_structure(&path)
                .with_context(|| format!("failed to analyze {}", path.display()))?;
            print_report(&report, json)
        }
        AnalyzeSubcommand::Quality { path } => {
            let path = path.unwrap_or_else(|| root.to_path_buf());
            let report = analyzer::analyze_quality(&path)
                .with_context(|| format!("failed to analyze {}", path.display()))?;
            print_report(&report, json)
        }
    }
}
