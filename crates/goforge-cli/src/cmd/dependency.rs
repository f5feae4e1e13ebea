use crate::output::{print_json, print_report, print_table};
use clap::Subcommand;
use goforge_core::dependency;
use goforge_core::tool_runner::SystemRunner;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum DependencySubcommand {
    /// List modules with newer versions available (`go list -m -u all`)
    Check {
        /// Module directory (default: project root)
        path: Option<PathBuf>,
    },

    /// Upgrade all dependencies and tidy go.mod / go.sum
    Update {
        /// Module directory (default: project root)
        path: Option<PathBuf>,
    },

    /// Scan dependencies for known vulnerabilities with govulncheck
    Security {
        /// Module directory (default: project root)
        path: Option<PathBuf>,
    },
}

pub fn run(root: &Path, subcmd: DependencySubcommand, json: bool) -> anyhow::Result<()> {
    let runner = SystemRunner;
    match subcmd {
        DependencySubcommand::Check { path } => {
            let path = path.unwrap_or_else(|| root.to_path_buf());
            let report = dependency::check_outdated(&runner, &path)?;
            if json {
                return print_json(&report);
            }
            if report.outdated.is_empty() {
                return print_report(&report, false);
            }
            println!("Checking for outdated dependencies in: {}", report.root.display());
            println!();
            let rows = report
                .outdated
                .iter()
                .map(|m| vec![m.path.clone(), m.current.clone(), m.latest.clone()])
                .collect();
            print_table(&["MODULE", "CURRENT", "LATEST"], rows);
            println!();
            println!("Use 'goforge dependency update' to update them.");
            Ok(())
        }
        DependencySubcommand::Update { path } => {
            let path = path.unwrap_or_else(|| root.to_path_buf());
            let report = dependency::update(&runner, &path)?;
            print_report(&report, json)
        }
        DependencySubcommand::Security { path } => {
            let path = path.unwrap_or_else(|| root.to_path_buf());
            let report = dependency::check_security(&runner, &path)?;
            print_report(&report, json)
        }
    }
}
