//! Project structure and code quality analysis.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{GoforgeError, Result};
use crate::paths;
use crate::report::Narrate;
use crate::source::{parse_unit, DeclKind};

const DOC_COVERAGE_TARGET: f64 = 80.0;
const COMPLEXITY_LIMIT: u32 = 10;

// ---------------------------------------------------------------------------
// Structure
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct StructureReport {
    pub root: PathBuf,
    /// Directories relative to the root; the root itself is `.`.
    pub directories: Vec<String>,
    pub go_files: usize,
    pub packages: usize,
    pub recommendations: Vec<String>,
}

impl Narrate for StructureReport {
    fn narrate(&self) -> Vec<String> {
        let mut lines = vec![format!("Analyzing project structure at: {}", self.root.display())];
        lines.extend(self.directories.iter().map(|d| format!("Directory: {d}")));
        lines.push(String::new());
        lines.push("Project Summary:".to_string());
        lines.push(format!("- Directories: {}", self.directories.len()));
        lines.push(format!("- Go files: {}", self.go_files));
        lines.push(format!("- Packages: {}", self.packages));
        lines.push(String::new());
        lines.push("Architecture Recommendations:".to_string());
        lines.extend(self.recommendations.iter().map(|r| format!("- {r}")));
        lines
    }
}

pub fn analyze_structure(root: &Path) -> Result<StructureReport> {
    let root = paths::require_dir(root)?;

    let mut directories = Vec::new();
    let mut go_files = 0;
    let mut packages = BTreeSet::new();

    for entry in paths::walk_visible(&root) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            directories.push(if rel.as_os_str().is_empty() {
                ".".to_string()
            } else {
                rel.display().to_string()
            });
        } else if entry.path().extension().is_some_and(|e| e == "go") {
            go_files += 1;
            if let Some(dir) = entry.path().parent() {
                packages.insert(dir.to_path_buf());
            }
        }
    }

    let mut recommendations = vec![
        "Use a clean architecture approach with clear separation of concerns".to_string(),
        "Follow Go project layout conventions (cmd, pkg, internal, etc.)".to_string(),
        "Ensure consistent package naming conventions".to_string(),
    ];
    if !root.join(paths::GO_MOD).is_file() {
        recommendations.push("Initialize a module with 'go mod init'".to_string());
    }

    Ok(StructureReport {
        root,
        directories,
        go_files,
        packages: packages.len(),
        recommendations,
    })
}

// ---------------------------------------------------------------------------
// Quality
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct FunctionComplexity {
    pub file: PathBuf,
    pub name: String,
    pub line: usize,
    pub complexity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseFailure {
    pub file: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub root: PathBuf,
    pub files: usize,
    pub functions: usize,
    pub exported_functions: usize,
    pub documented_exported: usize,
    pub doc_coverage: f64,
    pub average_complexity: f64,
    pub most_complex: Option<FunctionComplexity>,
    pub parse_failures: Vec<ParseFailure>,
    pub suggestions: Vec<String>,
}

impl Narrate for QualityReport {
    fn narrate(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Analyzing code quality at: {}", self.root.display()),
            String::new(),
            "Code Quality Analysis Results:".to_string(),
            format!("- Files analyzed: {}", self.files),
            format!("- Functions: {} ({} exported)", self.functions, self.exported_functions),
            format!(
                "- Documentation Coverage: {:.1}% ({}/{} exported functions)",
                self.doc_coverage, self.documented_exported, self.exported_functions
            ),
            format!("- Cyclomatic Complexity: avg {:.1}", self.average_complexity),
        ];
        if let Some(f) = &self.most_complex {
            lines.push(format!(
                "- Most complex: {} ({}:{}) = {}",
                f.name,
                f.file.display(),
                f.line,
                f.complexity
            ));
        }
        for p in &self.parse_failures {
            lines.push(format!("- Parse failure: {}: {}", p.file.display(), p.reason));
        }
        if !self.suggestions.is_empty() {
            lines.push(String::new());
            lines.push("Improvement Suggestions:".to_string());
            lines.extend(self.suggestions.iter().map(|s| format!("- {s}")));
        }
        lines
    }
}

pub fn analyze_quality(root: &Path) -> Result<QualityReport> {
    let root = paths::require_dir(root)?;

    let mut files = 0;
    let mut functions = 0;
    let mut exported_functions = 0;
    let mut documented_exported = 0;
    let mut complexity_sum: u64 = 0;
    let mut most_complex: Option<FunctionComplexity> = None;
    let mut parse_failures = Vec::new();

    for entry in paths::walk_visible(&root) {
        let entry = entry?;
        if !entry.file_type().is_file() || !paths::is_go_source(entry.path()) {
            continue;
        }
        let path = entry.path();
        let unit = std::fs::read_to_string(path)
            .map_err(GoforgeError::from)
            .and_then(|text| parse_unit(path, &text));
        let unit = match unit {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping unparsable file");
                parse_failures.push(ParseFailure {
                    file: path.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        files += 1;

        for decl in unit
            .declarations
            .iter()
            .filter(|d| matches!(d.kind, DeclKind::Function | DeclKind::Method))
        {
            functions += 1;
            complexity_sum += u64::from(decl.complexity);
            if decl.exported {
                exported_functions += 1;
                if decl.documented {
                    documented_exported += 1;
                }
            }
            if most_complex
                .as_ref()
                .map_or(true, |m| decl.complexity > m.complexity)
            {
                most_complex = Some(FunctionComplexity {
                    file: path.to_path_buf(),
                    name: decl.name.clone(),
                    line: decl.line,
                    complexity: decl.complexity,
                });
            }
        }
    }

    let doc_coverage = percentage(documented_exported, exported_functions);
    let average_complexity = if functions == 0 {
        0.0
    } else {
        complexity_sum as f64 / functions as f64
    };

    let mut suggestions = Vec::new();
    if exported_functions > 0 && doc_coverage < DOC_COVERAGE_TARGET {
        suggestions.push("Add more documentation to exported functions".to_string());
    }
    if let Some(f) = most_complex.as_ref().filter(|f| f.complexity > COMPLEXITY_LIMIT) {
        suggestions.push(format!(
            "Consider breaking down {} (complexity {})",
            f.name, f.complexity
        ));
    }
    if !parse_failures.is_empty() {
        suggestions.push(format!(
            "Fix syntax errors in {} file(s); they were not analyzed",
            parse_failures.len()
        ));
    }

    Ok(QualityReport {
        root,
        files,
        functions,
        exported_functions,
        documented_exported,
        doc_coverage,
        average_complexity,
        most_complex,
        parse_failures,
        suggestions,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        100.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, text: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn structure_counts_files_and_packages() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "go.mod", "module example.com/app\n");
        write(dir.path(), "main.go", "package main\n");
        write(dir.path(), "pkg/a/a.go", "package a\n");
        write(dir.path(), "pkg/a/a_test.go", "package a\n");
        write(dir.path(), "pkg/b/b.go", "package b\n");
        write(dir.path(), ".git/hooks/x.go", "package hooks\n");

        let report = analyze_structure(dir.path()).unwrap();
        assert_eq!(report.go_files, 4);
        assert_eq!(report.packages, 3);
        assert_eq!(report.directories, [".", "pkg", "pkg/a", "pkg/b"]);
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn structure_suggests_go_mod_when_missing() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "main.go", "package main\n");
        let report = analyze_structure(dir.path()).unwrap();
        assert!(report.recommendations.iter().any(|r| r.contains("go mod init")));
    }

    #[test]
    fn structure_rejects_missing_and_file_roots() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            analyze_structure(&dir.path().join("nope")),
            Err(GoforgeError::PathNotFound(_))
        ));
        write(dir.path(), "main.go", "package main\n");
        assert!(matches!(
            analyze_structure(&dir.path().join("main.go")),
            Err(GoforgeError::NotADirectory(_))
        ));
    }

    #[test]
    fn quality_measures_docs_and_complexity() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "calc.go",
            "package calc\n\n// Add sums two numbers.\nfunc Add(a, b int) int { return a + b }\n\nfunc Sub(a, b int) int {\n\tif a > b {\n\t\treturn a - b\n\t}\n\treturn b - a\n}\n\nfunc helper() {}\n",
        );
        write(dir.path(), "broken.go", "package calc\n\nfunc Oops( {\n");

        let report = analyze_quality(dir.path()).unwrap();
        assert_eq!(report.files, 1);
        assert_eq!(report.functions, 3);
        assert_eq!(report.exported_functions, 2);
        assert_eq!(report.documented_exported, 1);
        assert_eq!(report.doc_coverage, 50.0);
        let top = report.most_complex.as_ref().unwrap();
        assert_eq!(top.name, "Sub");
        assert_eq!(top.complexity, 2);
        assert_eq!(report.parse_failures.len(), 1);
        assert!(report
            .suggestions
            .iter()
            .any(|s| s.contains("documentation")));
        assert!(report.suggestions.iter().any(|s| s.contains("syntax errors")));
    }

    #[test]
    fn quality_on_empty_project_is_clean() {
        let dir = TempDir::new().unwrap();
        let report = analyze_quality(dir.path()).unwrap();
        assert_eq!(report.functions, 0);
        assert_eq!(report.doc_coverage, 100.0);
        assert!(report.most_complex.is_none());
        assert!(report.suggestions.is_empty());
    }
}
