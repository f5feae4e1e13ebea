//! Dependency checks backed by the Go toolchain.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::Result;
use crate::paths;
use crate::report::Narrate;
use crate::tool_runner::ToolRunner;

const GOVULNCHECK: &str = "govulncheck";
const GOVULNCHECK_INSTALL: &str = "go install golang.org/x/vuln/cmd/govulncheck@latest";

// ---------------------------------------------------------------------------
// Outdated modules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutdatedModule {
    pub path: String,
    pub current: String,
    pub latest: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutdatedReport {
    pub root: PathBuf,
    pub outdated: Vec<OutdatedModule>,
}

impl Narrate for OutdatedReport {
    fn narrate(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Checking for outdated dependencies in: {}",
            self.root.display()
        )];
        lines.push(String::new());
        if self.outdated.is_empty() {
            lines.push("All dependencies are up to date!".to_string());
            return lines;
        }
        lines.push("Outdated Dependencies:".to_string());
        for m in &self.outdated {
            lines.push(format!("- {} {} -> {}", m.path, m.current, m.latest));
        }
        lines.push(String::new());
        lines.push("Use 'goforge dependency update' to update them.".to_string());
        lines
    }
}

/// Modules with an available upgrade, from `go list -m -u all` output.
///
/// Only lines of the form `path current [latest]` are considered.
pub fn parse_outdated(text: &str) -> Vec<OutdatedModule> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(\S+)\s+(\S+)\s+\[(\S+)\]").expect("valid regex")
    });
    text.lines()
        .filter_map(|line| re.captures(line.trim()))
        .map(|c| OutdatedModule {
            path: c[1].to_string(),
            current: c[2].to_string(),
            latest: c[3].to_string(),
        })
        .collect()
}

pub fn check_outdated(runner: &dyn ToolRunner, root: &Path) -> Result<OutdatedReport> {
    let root = paths::require_dir(root)?;
    let out = runner
        .run("go", &["list", "-m", "-u", "all"], &root)?
        .check("go list -m -u all")?;
    let outdated = parse_outdated(&out.stdout);
    tracing::debug!(count = outdated.len(), "outdated modules");
    Ok(OutdatedReport { root, outdated })
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    pub root: PathBuf,
    pub update_output: String,
    pub tidy_output: String,
}

impl Narrate for UpdateReport {
    fn narrate(&self) -> Vec<String> {
        vec![
            format!("Updating dependencies in: {}", self.root.display()),
            "Dependencies updated successfully!".to_string(),
            String::new(),
            "Running 'go mod tidy' to clean up go.mod and go.sum...".to_string(),
            "Dependencies tidied successfully!".to_string(),
        ]
    }
}

/// `go get -u ./...` followed by `go mod tidy`. Stops at the first failure.
pub fn update(runner: &dyn ToolRunner, root: &Path) -> Result<UpdateReport> {
    let root = paths::require_dir(root)?;
    let updated = runner
        .run("go", &["get", "-u", "./..."], &root)?
        .check("go get -u ./...")?;
    let tidied = runner
        .run("go", &["mod", "tidy"], &root)?
        .check("go mod tidy")?;
    tracing::info!(root = %root.display(), "dependencies updated");
    Ok(UpdateReport {
        root,
        update_output: updated.combined(),
        tidy_output: tidied.combined(),
    })
}

// ---------------------------------------------------------------------------
// Security
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SecurityReport {
    pub root: PathBuf,
    pub scanner_available: bool,
    /// Vulnerability IDs in the order govulncheck reports them.
    pub vulnerabilities: Vec<String>,
    pub output: String,
}

impl Narrate for SecurityReport {
    fn narrate(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Checking dependencies for security vulnerabilities in: {}",
            self.root.display()
        )];
        lines.push(String::new());
        if !self.scanner_available {
            lines.push(format!("{GOVULNCHECK} is not installed; no scan was performed."));
            lines.push(format!("Install it with: {GOVULNCHECK_INSTALL}"));
            return lines;
        }
        lines.push("Security Scan Results:".to_string());
        if self.vulnerabilities.is_empty() {
            lines.push("- No known vulnerabilities found".to_string());
        } else {
            lines.push(format!("- {} vulnerabilities found", self.vulnerabilities.len()));
            lines.extend(self.vulnerabilities.iter().map(|v| format!("  - {v}")));
            lines.push(String::new());
            lines.push(format!("Run '{GOVULNCHECK} ./...' for details and fixed versions."));
        }
        lines
    }
}

/// Vulnerability IDs from govulncheck text output (`Vulnerability #1: GO-2023-1234`).
pub fn parse_vulnerabilities(text: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"Vulnerability #\d+:\s*(\S+)").expect("valid regex"));
    re.captures_iter(text).map(|c| c[1].to_string()).collect()
}

pub fn check_security(runner: &dyn ToolRunner, root: &Path) -> Result<SecurityReport> {
    let root = paths::require_dir(root)?;
    if !runner.available(GOVULNCHECK) {
        tracing::warn!("{GOVULNCHECK} not found, skipping vulnerability scan");
        return Ok(SecurityReport {
            root,
            scanner_available: false,
            vulnerabilities: Vec::new(),
            output: String::new(),
        });
    }

    // govulncheck exits 3 when vulnerabilities are found.
    let out = runner.run(GOVULNCHECK, &["./..."], &root)?;
    let out = if out.code == Some(3) {
        out
    } else {
        out.check("govulncheck ./...")?
    };
    Ok(SecurityReport {
        root,
        scanner_available: true,
        vulnerabilities: parse_vulnerabilities(&out.stdout),
        output: out.combined(),
    })
}
