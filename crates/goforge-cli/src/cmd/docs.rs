use crate::cmd::load_config;
use crate::output::print_report;
use clap::Subcommand;
use goforge_core::docs::{self, DocFormat};
use goforge_core::tool_runner::SystemRunner;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum DocsSubcommand {
    /// Package reference from `go doc`
    Api {
        /// Module directory (default: project root)
        path: Option<PathBuf>,
        /// Output directory (relative paths land in the module directory)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// html or markdown
        #[arg(short = 'f', long)]
        format: Option<String>,
    },

    /// User guide from the built-in template
    User {
        /// Module directory (default: project root)
        path: Option<PathBuf>,
        /// Output directory (relative paths land in the module directory)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// html (requires pandoc) or markdown
        #[arg(short = 'f', long)]
        format: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: DocsSubcommand, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?.docs;
    let runner = SystemRunner;
    match subcmd {
        DocsSubcommand::Api {
            path,
            output,
            format,
        } => {
            let path = path.unwrap_or_else(|| root.to_path_buf());
            let format: DocFormat = format.unwrap_or(config.format).parse()?;
            let report = docs::generate_api_docs(
                &runner,
                &path,
                &output.unwrap_or(config.api_output),
                format,
            )?;
            print_report(&report, json)
        }
        DocsSubcommand::User {
            path,
            output,
            format,
        } => {
            let path = path.unwrap_or_else(|| root.to_path_buf());
            let format: DocFormat = format.unwrap_or(config.format).parse()?;
            let report = docs::generate_user_docs(
                &runner,
                &path,
                &output.unwrap_or(config.user_output),
                format,
            )?;
            print_report(&report, json)
        }
    }
}
