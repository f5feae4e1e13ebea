//! API and user documentation generation.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GoforgeError, Result};
use crate::io;
use crate::paths;
use crate::report::Narrate;
use crate::template::{self, TemplateEngine};
use crate::tool_runner::ToolRunner;

pub const PANDOC: &str = "pandoc";
pub const USER_GUIDE_MD: &str = "user-guide.md";
pub const USER_GUIDE_HTML: &str = "user-guide.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocFormat {
    Html,
    Markdown,
}

impl FromStr for DocFormat {
    type Err = GoforgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "html" => Ok(DocFormat::Html),
            "markdown" | "md" => Ok(DocFormat::Markdown),
            other => Err(GoforgeError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for DocFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocFormat::Html => "html",
            DocFormat::Markdown => "markdown",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocsReport {
    pub root: PathBuf,
    pub format: DocFormat,
    pub output_dir: PathBuf,
    /// Files written, in creation order.
    pub files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl Narrate for DocsReport {
    fn narrate(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Generating documentation for {} in {} format",
            self.root.display(),
            self.format
        )];
        lines.extend(self.warnings.iter().map(|w| format!("WARNING: {w}")));
        lines.extend(self.files.iter().map(|f| format!("Generated: {}", f.display())));
        lines.push(format!("Documentation written to: {}", self.output_dir.display()));
        lines
    }
}

// ---------------------------------------------------------------------------
// API docs
// ---------------------------------------------------------------------------

/// Package reference from `go doc`.
///
/// `html` wraps `go doc -all ./...` into `index.html`. `markdown` writes one
/// `<pkg>.md` per directory under `pkg/` plus a `README.md` index.
pub fn generate_api_docs(
    runner: &dyn ToolRunner,
    root: &Path,
    output_dir: &Path,
    format: DocFormat,
) -> Result<DocsReport> {
    let root = paths::require_dir(root)?;
    let output_dir = paths::resolve_in(&root, output_dir);
    io::ensure_dir(&output_dir)?;

    let mut files = Vec::new();
    match format {
        DocFormat::Html => {
            let text = runner
                .run("go", &["doc", "-all", "./..."], &root)?
                .check("go doc -all ./...")?
                .stdout;
            let index = output_dir.join("index.html");
            io::atomic_write(&index, wrap_html(&paths::app_name(&root), &text).as_bytes())?;
            files.push(index);
        }
        DocFormat::Markdown => {
            let packages = library_packages(&root)?;
            let mut readme = String::from("# API Documentation\n\n## Packages\n\n");
            for pkg in &packages {
                let target = format!("./pkg/{pkg}");
                let text = runner
                    .run("go", &["doc", "-all", &target], &root)?
                    .check(&format!("go doc -all {target}"))?
                    .stdout;
                let doc = output_dir.join(format!("{pkg}.md"));
                io::atomic_write(&doc, format!("# {pkg}\n\n```\n{text}```\n").as_bytes())?;
                files.push(doc);
                readme.push_str(&format!("- [{pkg}]({pkg}.md)\n"));
            }
            let index = output_dir.join("README.md");
            io::atomic_write(&index, readme.as_bytes())?;
            files.push(index);
        }
    }
    tracing::info!(dir = %output_dir.display(), count = files.len(), "generated API docs");

    Ok(DocsReport {
        root,
        format,
        output_dir,
        files,
        warnings: Vec::new(),
    })
}

/// Directory names directly under `<root>/pkg`, sorted. Hidden entries are skipped.
fn library_packages(root: &Path) -> Result<Vec<String>> {
    let pkg_dir = root.join("pkg");
    if !pkg_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(&pkg_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() && !paths::is_hidden(&entry.file_name()) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

fn wrap_html(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title} API Documentation</title>\n</head>\n<body>\n<h1>{title} API Documentation</h1>\n<pre>\n{}</pre>\n</body>\n</html>\n",
        handlebars::html_escape(body),
        title = handlebars::html_escape(title)
    )
}

// ---------------------------------------------------------------------------
// User docs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct UserGuideContext {
    app_name: String,
    module: String,
    packages: Vec<String>,
}

/// User guide from the built-in template, written as `user-guide.md`.
///
/// `html` additionally converts it with pandoc. Without pandoc the markdown
/// is kept and a warning is recorded.
pub fn generate_user_docs(
    runner: &dyn ToolRunner,
    root: &Path,
    output_dir: &Path,
    format: DocFormat,
) -> Result<DocsReport> {
    let root = paths::require_dir(root)?;
    let output_dir = paths::resolve_in(&root, output_dir);
    io::ensure_dir(&output_dir)?;

    let app_name = paths::app_name(&root);
    let module = module_path(&root)?.unwrap_or_else(|| app_name.clone());
    let ctx = UserGuideContext {
        packages: import_paths(&root, &module)?,
        app_name,
        module,
    };
    let text = TemplateEngine::shared()?.render(template::USER_GUIDE, &ctx)?;

    let md = output_dir.join(USER_GUIDE_MD);
    io::atomic_write(&md, text.as_bytes())?;
    let mut files = vec![md.clone()];
    let mut warnings = Vec::new();

    if format == DocFormat::Html {
        if runner.available(PANDOC) {
            let html = output_dir.join(USER_GUIDE_HTML);
            let (md_arg, html_arg) = (md.to_string_lossy(), html.to_string_lossy());
            runner
                .run(PANDOC, &["-s", &md_arg, "-o", &html_arg], &output_dir)?
                .check("pandoc -s")?;
            files.push(html);
        } else {
            tracing::warn!("pandoc not found, keeping markdown user guide");
            warnings.push("pandoc not found, cannot convert to HTML. Using markdown instead.".to_string());
        }
    }

    Ok(DocsReport {
        root,
        format,
        output_dir,
        files,
        warnings,
    })
}

/// Module path declared in `go.mod`, if there is one.
pub fn module_path(root: &Path) -> Result<Option<String>> {
    let go_mod = root.join(paths::GO_MOD);
    if !go_mod.is_file() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(go_mod)?;
    Ok(text
        .lines()
        .find_map(|l| l.trim().strip_prefix("module "))
        .map(|m| m.trim().trim_matches('"').to_string()))
}

/// Import paths of every directory holding non-test Go sources, sorted.
fn import_paths(root: &Path, module: &str) -> Result<Vec<String>> {
    let mut dirs = BTreeSet::new();
    for entry in paths::walk_visible(root) {
        let entry = entry?;
        if entry.file_type().is_file() && paths::is_go_source(entry.path()) {
            if let Some(rel) = entry.path().parent().and_then(|p| p.strip_prefix(root).ok()) {
                dirs.insert(rel.to_path_buf());
            }
        }
    }
    Ok(dirs
        .into_iter()
        .map(|rel| {
            if rel.as_os_str().is_empty() {
                module.to_string()
            } else {
                format!("{module}/{}", rel.to_string_lossy().replace('\\', "/"))
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool_runner::ScriptedRunner;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let write = |rel: &str, text: &str| {
            let p = dir.path().join(rel);
            std::fs::create_dir_all(p.parent().unwrap()).unwrap();
            std::fs::write(p, text).unwrap();
        };
        write("go.mod", "module example.com/shop\n\ngo 1.22\n");
        write("main.go", "package main\n");
        write("pkg/cart/cart.go", "package cart\n");
        write("pkg/billing/billing.go", "package billing\n");
        write("pkg/.cache/x.go", "package x\n");
        dir
    }

    #[test]
    fn format_parsing() {
        assert_eq!("html".parse::<DocFormat>().unwrap(), DocFormat::Html);
        assert_eq!("markdown".parse::<DocFormat>().unwrap(), DocFormat::Markdown);
        assert!(matches!(
            "pdf".parse::<DocFormat>(),
            Err(GoforgeError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn html_api_docs_are_escaped() {
        let dir = project();
        let runner = ScriptedRunner::new().ok("go doc -all ./...", "func New() *Cart<T>\n");
        let report =
            generate_api_docs(&runner, dir.path(), Path::new("api-docs"), DocFormat::Html).unwrap();

        let index = std::fs::read_to_string(&report.files[0]).unwrap();
        assert!(report.files[0].ends_with("api-docs/index.html"));
        assert!(index.contains("func New() *Cart&lt;T&gt;"));
    }

    #[test]
    fn markdown_api_docs_cover_each_pkg_dir() {
        let dir = project();
        let runner = ScriptedRunner::new().ok("go doc -all ./pkg/", "package doc\n");
        let report =
            generate_api_docs(&runner, dir.path(), Path::new("api-docs"), DocFormat::Markdown)
                .unwrap();

        let names: Vec<String> = report
            .files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["billing.md", "cart.md", "README.md"]);
        let readme = std::fs::read_to_string(report.output_dir.join("README.md")).unwrap();
        assert!(readme.contains("- [billing](billing.md)\n- [cart](cart.md)\n"));
        assert_eq!(
            runner.calls(),
            ["go doc -all ./pkg/billing", "go doc -all ./pkg/cart"]
        );
    }

    #[test]
    fn user_guide_lists_module_and_packages() {
        let dir = project();
        let report = generate_user_docs(
            &ScriptedRunner::new(),
            dir.path(),
            Path::new("user-docs"),
            DocFormat::Markdown,
        )
        .unwrap();

        let text = std::fs::read_to_string(&report.files[0]).unwrap();
        assert!(text.contains("go install example.com/shop@latest"));
        assert!(text.contains("- `example.com/shop/pkg/billing`"));
        assert!(!text.contains(".cache"));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn html_user_guide_without_pandoc_keeps_markdown() {
        let dir = project();
        let report = generate_user_docs(
            &ScriptedRunner::new(),
            dir.path(),
            Path::new("user-docs"),
            DocFormat::Html,
        )
        .unwrap();
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.narration().contains("WARNING: pandoc not found"));
    }

    #[test]
    fn html_user_guide_with_pandoc() {
        let dir = project();
        let runner = ScriptedRunner::new().with_installed(PANDOC).ok("pandoc -s", "");
        let report =
            generate_user_docs(&runner, dir.path(), Path::new("user-docs"), DocFormat::Html)
                .unwrap();
        assert_eq!(report.files.len(), 2);
        assert!(report.files[1].ends_with(USER_GUIDE_HTML));
    }

    #[test]
    fn module_path_is_optional() {
        let dir = TempDir::new().unwrap();
        assert_eq!(module_path(dir.path()).unwrap(), None);
    }
}
