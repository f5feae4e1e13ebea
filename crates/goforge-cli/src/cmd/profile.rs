use crate::cmd::load_config;
use crate::output::print_report;
use clap::Subcommand;
use goforge_core::profiler;
use goforge_core::tool_runner::SystemRunner;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Run a binary with -cpuprofile for a fixed window
    Cpu {
        /// Binary to profile
        binary: PathBuf,
        /// Profile output file
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Seconds to let the binary run before stopping it
        #[arg(short = 'd', long)]
        duration: Option<u64>,
    },

    /// Run a binary with -memprofile to completion
    Memory {
        /// Binary to profile
        binary: PathBuf,
        /// Profile output file
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Print a text summary of a profile with `go tool pprof`
    Visualize {
        /// Profile file
        profile: PathBuf,
    },
}

pub fn run(root: &Path, subcmd: ProfileSubcommand, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let runner = SystemRunner;
    match subcmd {
        ProfileSubcommand::Cpu {
            binary,
            output,
            duration,
        } => {
            let secs = duration.unwrap_or(config.profile.duration_secs);
            let report = profiler::cpu_profile(
                &runner,
                &binary,
                &output.unwrap_or(config.profile.cpu_output),
                Duration::from_secs(secs),
            )?;
            print_report(&report, json)
        }
        ProfileSubcommand::Memory { binary, output } => {
            let report = profiler::memory_profile(
                &runner,
                &binary,
                &output.unwrap_or(config.profile.mem_output),
            )?;
            print_report(&report, json)
        }
        ProfileSubcommand::Visualize { profile } => {
            let report = profiler::visualize(&runner, &profile)?;
            print_report(&report, json)
        }
    }
}
