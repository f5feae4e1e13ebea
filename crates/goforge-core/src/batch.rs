//! Test-skeleton generation over a file or a directory tree.
//!
//! Only structural problems (missing root, wrong kind of root, an output
//! directory that cannot be created) fail the whole invocation. Everything
//! that goes wrong with a single unit becomes that unit's [`BatchOutcome`]
//! and the batch moves on.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{GoforgeError, Result};
use crate::io;
use crate::paths;
use crate::report::Narrate;
use crate::skeleton::{self, RenderRequest};
use crate::source::parse_unit;
use crate::symbols::testable_symbols;

pub const NO_EXPORTED_FUNCTIONS: &str = "no exported functions";

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Directory receiving every generated file. `None` writes beside each source.
    pub output_dir: Option<PathBuf>,
    pub table_driven: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Generated { output: PathBuf },
    Skipped { reason: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub source: PathBuf,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub root: PathBuf,
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn generated(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Generated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

impl Narrate for BatchReport {
    fn narrate(&self) -> Vec<String> {
        let mut lines = vec![format!("Generating tests for: {}", self.root.display())];
        for o in &self.outcomes {
            lines.push(match &o.status {
                OutcomeStatus::Generated { output } => {
                    format!("Generated test file: {}", output.display())
                }
                OutcomeStatus::Skipped { reason } => {
                    format!("Skipped {}: {reason}", o.source.display())
                }
                OutcomeStatus::Failed { reason } => {
                    format!("Failed {}: {reason}", o.source.display())
                }
            });
        }
        lines.push(format!(
            "{} generated, {} skipped, {} failed",
            self.generated(),
            self.skipped(),
            self.failed()
        ));
        lines
    }
}

/// One path found by [`discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Source(PathBuf),
    /// An entry below the root that the walk could not read.
    Unreadable { path: PathBuf, reason: String },
}

impl Candidate {
    pub fn path(&self) -> &Path {
        match self {
            Candidate::Source(path) | Candidate::Unreadable { path, .. } => path,
        }
    }
}

/// Generate companion test files for `root` (a `.go` file or a directory).
pub fn generate_tests(root: &Path, opts: &GenerateOptions) -> Result<BatchReport> {
    let candidates = discover(root)?;

    if let Some(dir) = &opts.output_dir {
        io::ensure_dir(dir)?;
    }

    Ok(BatchReport {
        root: root.to_path_buf(),
        outcomes: process_all(candidates, opts),
    })
}

fn process_all(candidates: Vec<Candidate>, opts: &GenerateOptions) -> Vec<BatchOutcome> {
    candidates
        .into_iter()
        .map(|candidate| {
            let (source, status) = match candidate {
                Candidate::Source(source) => {
                    let status = process_unit(&source, opts);
                    (source, status)
                }
                Candidate::Unreadable { path, reason } => (path, OutcomeStatus::Failed { reason }),
            };
            match &status {
                OutcomeStatus::Generated { output } => {
                    tracing::info!(output = %output.display(), "generated test file")
                }
                OutcomeStatus::Skipped { reason } => {
                    tracing::debug!(source = %source.display(), %reason, "skipped")
                }
                OutcomeStatus::Failed { reason } => {
                    tracing::warn!(source = %source.display(), %reason, "failed")
                }
            }
            BatchOutcome { source, status }
        })
        .collect()
}

/// Candidate source units under `root`, sorted by path.
///
/// A root that is missing, unreadable or of the wrong kind is an error. Walk
/// errors below the root become [`Candidate::Unreadable`] so the rest of the
/// tree is still processed.
pub fn discover(root: &Path) -> Result<Vec<Candidate>> {
    let meta = std::fs::metadata(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => GoforgeError::PathNotFound(root.to_path_buf()),
        _ => GoforgeError::Io(e),
    })?;

    if meta.is_file() {
        if !paths::is_go_source(root) {
            return Err(GoforgeError::NotGoSource(root.to_path_buf()));
        }
        return Ok(vec![Candidate::Source(root.to_path_buf())]);
    }
    if !meta.is_dir() {
        return Err(GoforgeError::NotGoSource(root.to_path_buf()));
    }

    let mut found = Vec::new();
    for entry in paths::walk_visible(root) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && paths::is_go_source(entry.path()) {
                    tracing::debug!(path = %entry.path().display(), "discovered source unit");
                    found.push(Candidate::Source(entry.into_path()));
                }
            }
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                tracing::warn!(path = %path.display(), error = %e, "cannot read directory entry");
                found.push(Candidate::Unreadable {
                    path,
                    reason: format!("failed to read: {e}"),
                });
            }
        }
    }
    found.sort_by(|a, b| a.path().cmp(b.path()));
    Ok(found)
}

fn process_unit(source: &Path, opts: &GenerateOptions) -> OutcomeStatus {
    let failed = |reason: String| OutcomeStatus::Failed { reason };

    let bytes = match std::fs::read(source) {
        Ok(b) => b,
        Err(e) => return failed(format!("failed to read: {e}")),
    };
    let text = match String::from_utf8(bytes) {
        Ok(t) => t,
        Err(_) => return failed("not valid UTF-8".to_string()),
    };
    let unit = match parse_unit(source, &text) {
        Ok(u) => u,
        Err(e) => return failed(format!("failed to parse Go file: {e}")),
    };

    let symbols = testable_symbols(&unit);
    if symbols.is_empty() {
        return OutcomeStatus::Skipped {
            reason: NO_EXPORTED_FUNCTIONS.to_string(),
        };
    }

    let output = paths::companion_test_path(source, opts.output_dir.as_deref());
    if output.exists() {
        return failed(format!("already exists: {}", output.display()));
    }

    let req = RenderRequest {
        package_name: unit.package_name,
        symbols,
        table_driven: opts.table_driven,
    };
    let text = match skeleton::render(&req) {
        Ok(t) => t,
        Err(e) => return failed(e.to_string()),
    };

    match io::create_new(&output, text.as_bytes()) {
        Ok(()) => OutcomeStatus::Generated { output },
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            failed(format!("already exists: {}", output.display()))
        }
        Err(e) => failed(format!("failed to create test file: {e}")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
