//! Invocation of external programs (`go`, `pandoc`, `govulncheck`, profiled
//! binaries).
//!
//! Every toolchain-backed operation goes through the [`ToolRunner`] trait so
//! that the parsing of tool output stays in small pure functions and tests can
//! substitute canned output. Commands run with an explicit working directory;
//! the process-wide current directory is never changed.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::{GoforgeError, Result};

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    /// True when `run_for` killed the process at its time limit.
    pub timed_out: bool,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr, the way a terminal would show them.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }

    /// Turn a non-zero exit into `ToolFailed`, keeping the captured output.
    pub fn check(self, command: &str) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        Err(GoforgeError::ToolFailed {
            command: command.to_string(),
            code: self
                .code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string()),
            output: self.combined(),
        })
    }
}

pub trait ToolRunner: Send + Sync {
    /// Run `program args...` in `cwd` to completion and capture its output.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<ToolOutput>;

    /// Run `program args...` in `cwd`, killing it once `limit` has elapsed.
    fn run_for(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        limit: Duration,
    ) -> Result<ToolOutput>;

    /// Whether `program` can be found (on PATH, or as a path to an existing file).
    fn available(&self, program: &str) -> bool;
}

/// Runs real processes with `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(program: &str, args: &[&str], cwd: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(cwd).stdin(Stdio::null());
        cmd
    }
}

impl ToolRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<ToolOutput> {
        tracing::debug!(program, ?args, cwd = %cwd.display(), "running tool");
        let output = Self::command(program, args, cwd)
            .output()
            .map_err(|e| spawn_error(program, e))?;

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
            timed_out: false,
        })
    }

    fn run_for(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        limit: Duration,
    ) -> Result<ToolOutput> {
        tracing::debug!(program, ?args, limit_secs = limit.as_secs(), "running tool with time limit");
        // Output is discarded: profiled binaries may write without bound and
        // nothing drains the pipes while we poll.
        let mut child = Self::command(program, args, cwd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| spawn_error(program, e))?;

        let deadline = Instant::now() + limit;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(ToolOutput {
                    code: status.code(),
                    ..ToolOutput::default()
                });
            }
            if Instant::now() >= deadline {
                // The child may exit between try_wait and kill; either way it is done.
                let _ = child.kill();
                let status = child.wait()?;
                return Ok(ToolOutput {
                    code: status.code(),
                    timed_out: true,
                    ..ToolOutput::default()
                });
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    fn available(&self, program: &str) -> bool {
        which::which(program).is_ok() || Path::new(program).is_file()
    }
}

fn spawn_error(program: &str, e: std::io::Error) -> GoforgeError {
    if e.kind() == std::io::ErrorKind::NotFound {
        GoforgeError::ToolNotFound(program.to_string())
    } else {
        GoforgeError::ToolSpawnFailed {
            program: program.to_string(),
            reason: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptedRunner
// ---------------------------------------------------------------------------

/// Runner that answers from canned output instead of spawning processes.
///
/// A scripted entry matches any command line that starts with its key
/// (`"go list -m"` matches `go list -m -u all`); the first match wins.
/// Unscripted commands fail with `ToolNotFound`. Every command line is
/// recorded and can be inspected with [`ScriptedRunner::calls`].
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    script: Vec<(String, ToolOutput)>,
    writes: Vec<(String, PathBuf, String)>,
    installed: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `prefix...` with exit code 0 and `stdout`.
    pub fn ok(self, prefix: &str, stdout: &str) -> Self {
        self.respond(
            prefix,
            ToolOutput {
                stdout: stdout.to_string(),
                code: Some(0),
                ..ToolOutput::default()
            },
        )
    }

    /// Answer `prefix...` with exit code `code` and `stderr`.
    pub fn fail(self, prefix: &str, code: i32, stderr: &str) -> Self {
        self.respond(
            prefix,
            ToolOutput {
                stderr: stderr.to_string(),
                code: Some(code),
                ..ToolOutput::default()
            },
        )
    }

    pub fn respond(mut self, prefix: &str, output: ToolOutput) -> Self {
        self.script.push((prefix.to_string(), output));
        self
    }

    /// When a command matching `prefix` runs, write `contents` to `file`
    /// (relative to the command's working directory), as the real tool would.
    pub fn writes(mut self, prefix: &str, file: impl Into<PathBuf>, contents: &str) -> Self {
        self.writes
            .push((prefix.to_string(), file.into(), contents.to_string()));
        self
    }

    /// Report `program` as available.
    pub fn with_installed(mut self, program: &str) -> Self {
        self.installed.push(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    fn answer(&self, program: &str, args: &[&str], cwd: &Path) -> Result<ToolOutput> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(line.clone());
        }
        for (_, file, contents) in self
            .writes
            .iter()
            .filter(|(prefix, _, _)| line.starts_with(prefix.as_str()))
        {
            std::fs::write(cwd.join(file), contents)?;
        }
        self.script
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, out)| out.clone())
            .ok_or_else(|| GoforgeError::ToolNotFound(program.to_string()))
    }
}

impl ToolRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<ToolOutput> {
        self.answer(program, args, cwd)
    }

    fn run_for(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
        _limit: Duration,
    ) -> Result<ToolOutput> {
        self.answer(program, args, cwd)
    }

    fn available(&self, program: &str) -> bool {
        self.installed.iter().any(|p| p == program) || Path::new(program).is_file()
    }
}
