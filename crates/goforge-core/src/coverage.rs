use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{GoforgeError, Result};
use crate::paths;
use crate::report::Narrate;
use crate::tool_runner::ToolRunner;

/// Cover profile written by `go test` inside the project root.
pub const COVER_PROFILE: &str = "coverage.out";

#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub root: PathBuf,
    /// `go tool cover -func` output, one line per function plus the total.
    pub functions: String,
    pub total: f64,
    pub threshold: f64,
    pub meets_threshold: bool,
    pub html_report: PathBuf,
}

impl Narrate for CoverageReport {
    fn narrate(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Analyzing test coverage for {} (threshold: {:.1}%)",
                self.root.display(),
                self.threshold
            ),
            String::new(),
            "Coverage Results:".to_string(),
        ];
        lines.extend(self.functions.lines().map(str::to_string));
        lines.push(String::new());
        lines.push(format!("Total coverage: {:.1}%", self.total));
        lines.push(format!(
            "Coverage HTML report generated at: {}",
            self.html_report.display()
        ));
        lines.push(String::new());
        lines.push(if self.meets_threshold {
            format!(
                "SUCCESS: Coverage ({:.1}%) meets or exceeds threshold ({:.1}%)",
                self.total, self.threshold
            )
        } else {
            format!(
                "WARNING: Coverage ({:.1}%) is below threshold ({:.1}%)",
                self.total, self.threshold
            )
        });
        lines
    }
}

/// Total percentage from `go tool cover -func` output.
///
/// Reads the last field of the `total:` line, e.g.
/// `total:  (statements)  72.4%` → `72.4`.
pub fn parse_total_coverage(text: &str) -> Option<f64> {
    text.lines()
        .find(|l| l.trim_start().starts_with("total:"))
        .and_then(|l| l.split_whitespace().last())
        .and_then(|f| f.trim_end_matches('%').parse().ok())
}

/// Run the tests with coverage, then produce the per-function listing and an
/// HTML report. A relative `html_output` is placed inside `root`.
pub fn analyze_coverage(
    runner: &dyn ToolRunner,
    root: &Path,
    threshold: f64,
    html_output: &Path,
) -> Result<CoverageReport> {
    if !(0.0..=100.0).contains(&threshold) {
        return Err(GoforgeError::InvalidArgument(format!(
            "threshold must be between 0 and 100, got {threshold}"
        )));
    }
    let root = paths::require_dir(root)?;
    let html_report = paths::resolve_in(&root, html_output);

    // A profile left over from an earlier run must not pass for this one.
    match std::fs::remove_file(root.join(COVER_PROFILE)) {
        Ok(()) => tracing::debug!("removed stale {COVER_PROFILE}"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let profile_arg = format!("-coverprofile={COVER_PROFILE}");
    runner
        .run("go", &["test", "./...", &profile_arg], &root)?
        .check("go test ./... -coverprofile")?;

    if !root.join(COVER_PROFILE).is_file() {
        return Err(GoforgeError::ToolFailed {
            command: "go test ./... -coverprofile".to_string(),
            code: "0".to_string(),
            output: "coverage file was not created, ensure tests exist".to_string(),
        });
    }

    let func_arg = format!("-func={COVER_PROFILE}");
    let functions = runner
        .run("go", &["tool", "cover", &func_arg], &root)?
        .check("go tool cover -func")?
        .stdout;

    let html_arg = format!("-html={COVER_PROFILE}");
    let html_path = html_report.to_string_lossy();
    runner
        .run("go", &["tool", "cover", &html_arg, "-o", &html_path], &root)?
        .check("go tool cover -html")?;

    let total = parse_total_coverage(&functions).unwrap_or(0.0);
    let meets_threshold = total >= threshold;
    if !meets_threshold {
        tracing::warn!(total, threshold, "coverage below threshold");
    }

    Ok(CoverageReport {
        root,
        functions,
        total,
        threshold,
        meets_threshold,
        html_report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool_runner::ScriptedRunner;
    use tempfile::TempDir;

    const FUNC: &str = "example.com/app/calc.go:3:\tAdd\t\t100.0%\nexample.com/app/calc.go:7:\tSub\t\t50.0%\ntotal:\t\t\t\t(statements)\t72.4%\n";

    fn runner() -> ScriptedRunner {
        ScriptedRunner::new()
            .writes("go test ./...", COVER_PROFILE, "mode: set\n")
            .ok("go test ./...", "ok  \texample.com/app\t0.01s")
            .ok("go tool cover -func", FUNC)
            .ok("go tool cover -html", "")
    }

    #[test]
    fn total_line_is_parsed() {
        assert_eq!(parse_total_coverage(FUNC), Some(72.4));
        assert_eq!(parse_total_coverage("no total here"), None);
    }

    #[test]
    fn below_threshold_is_reported_not_failed() {
        let dir = TempDir::new().unwrap();

        let report =
            analyze_coverage(&runner(), dir.path(), 80.0, Path::new("coverage.html")).unwrap();
        assert_eq!(report.total, 72.4);
        assert!(!report.meets_threshold);
        assert!(report.html_report.ends_with("coverage.html"));
        assert!(report.html_report.is_absolute());
        assert!(report.narration().contains("WARNING: Coverage (72.4%) is below threshold (80.0%)"));
    }

    #[test]
    fn meeting_threshold_succeeds() {
        let dir = TempDir::new().unwrap();

        let report =
            analyze_coverage(&runner(), dir.path(), 70.0, Path::new("coverage.html")).unwrap();
        assert!(report.meets_threshold);
        assert!(report.narration().contains("SUCCESS"));
    }

    fn runner_without_profile() -> ScriptedRunner {
        ScriptedRunner::new()
            .ok("go test ./...", "?   \texample.com/app\t[no test files]")
            .ok("go tool cover -func", FUNC)
            .ok("go tool cover -html", "")
    }

    #[test]
    fn missing_cover_profile_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = analyze_coverage(
            &runner_without_profile(),
            dir.path(),
            80.0,
            Path::new("coverage.html"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("ensure tests exist"));
    }

    #[test]
    fn stale_cover_profile_does_not_count() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(COVER_PROFILE), "mode: set\nold run\n").unwrap();

        let runner = runner_without_profile();
        let err = analyze_coverage(&runner, dir.path(), 80.0, Path::new("coverage.html"))
            .unwrap_err();
        assert!(err.to_string().contains("ensure tests exist"));
        assert!(!dir.path().join(COVER_PROFILE).exists());
        assert!(!runner.calls().iter().any(|c| c.starts_with("go tool cover")));
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = analyze_coverage(&runner(), dir.path(), 120.0, Path::new("c.html")).unwrap_err();
        assert!(matches!(err, GoforgeError::InvalidArgument(_)));
    }
}
