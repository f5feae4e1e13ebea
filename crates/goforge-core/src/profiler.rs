//! CPU and memory profiling of Go binaries.
//!
//! The target binary is expected to accept `-cpuprofile` / `-memprofile`
//! flags, as binaries built with `runtime/pprof` conventionally do.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::error::{GoforgeError, Result};
use crate::paths;
use crate::report::Narrate;
use crate::tool_runner::ToolRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Cpu,
    Memory,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub kind: ProfileKind,
    pub target: PathBuf,
    pub output: PathBuf,
    /// Seconds the target was allowed to run; CPU profiles only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
    /// The target was stopped at the end of the profiling window.
    pub stopped: bool,
}

impl Narrate for ProfileReport {
    fn narrate(&self) -> Vec<String> {
        let (intro, label) = match (self.kind, self.duration_secs) {
            (ProfileKind::Cpu, Some(secs)) => (
                format!(
                    "Profiling CPU usage of {} for {secs} seconds...",
                    self.target.display()
                ),
                "CPU",
            ),
            (ProfileKind::Cpu, None) => (
                format!("Profiling CPU usage of {}...", self.target.display()),
                "CPU",
            ),
            (ProfileKind::Memory, _) => (
                format!("Profiling memory usage of {}...", self.target.display()),
                "Memory",
            ),
        };
        vec![
            intro,
            format!("{label} profile saved to {}", self.output.display()),
            format!(
                "Use 'goforge profile visualize {}' to analyze the profile",
                self.output.display()
            ),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VisualizeReport {
    pub profile: PathBuf,
    pub text: String,
}

impl VisualizeReport {
    pub fn interactive_hint(&self) -> String {
        format!("go tool pprof -http=:8080 {}", self.profile.display())
    }
}

impl Narrate for VisualizeReport {
    fn narrate(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Visualizing profile {}...", self.profile.display()),
            String::new(),
            "Profile Analysis:".to_string(),
        ];
        lines.extend(self.text.lines().map(str::to_string));
        lines.push(String::new());
        lines.push("Tip: For more detailed analysis, run:".to_string());
        lines.push(self.interactive_hint());
        lines
    }
}

/// Run `target -cpuprofile <output>` for `duration`, then stop it.
///
/// Being stopped at the deadline is the normal outcome; exiting early with a
/// non-zero status is a failure.
pub fn cpu_profile(
    runner: &dyn ToolRunner,
    target: &Path,
    output: &Path,
    duration: Duration,
) -> Result<ProfileReport> {
    if duration.is_zero() {
        return Err(GoforgeError::InvalidArgument(
            "profile duration must be greater than 0".to_string(),
        ));
    }
    let target = require_file(target)?;
    let output = paths::absolute(output);
    let program = target.to_string_lossy();
    let out_arg = output.to_string_lossy();
    let cwd = working_dir(&target);

    let result = runner.run_for(&program, &["-cpuprofile", &out_arg], &cwd, duration)?;
    let stopped = result.timed_out;
    if !stopped {
        result.check(&format!("{program} -cpuprofile"))?;
    }
    tracing::info!(output = %output.display(), stopped, "cpu profile written");

    Ok(ProfileReport {
        kind: ProfileKind::Cpu,
        target,
        output,
        duration_secs: Some(duration.as_secs()),
        stopped,
    })
}

/// Run `target -memprofile <output>` to completion.
pub fn memory_profile(
    runner: &dyn ToolRunner,
    target: &Path,
    output: &Path,
) -> Result<ProfileReport> {
    let target = require_file(target)?;
    let output = paths::absolute(output);
    let program = target.to_string_lossy();
    let out_arg = output.to_string_lossy();

    runner
        .run(&program, &["-memprofile", &out_arg], &working_dir(&target))?
        .check(&format!("{program} -memprofile"))?;
    tracing::info!(output = %output.display(), "memory profile written");

    Ok(ProfileReport {
        kind: ProfileKind::Memory,
        target,
        output,
        duration_secs: None,
        stopped: false,
    })
}

/// Text rendering of a profile via `go tool pprof -text`.
pub fn visualize(runner: &dyn ToolRunner, profile: &Path) -> Result<VisualizeReport> {
    let profile = require_file(profile)?;
    let arg = profile.to_string_lossy();
    let out = runner
        .run("go", &["tool", "pprof", "-text", &arg], &working_dir(&profile))?
        .check("go tool pprof -text")?;
    Ok(VisualizeReport {
        profile,
        text: out.stdout,
    })
}

fn require_file(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(GoforgeError::PathNotFound(path.to_path_buf()));
    }
    Ok(paths::absolute(path))
}

fn working_dir(file: &Path) -> PathBuf {
    file.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
