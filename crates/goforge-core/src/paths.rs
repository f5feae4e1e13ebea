use crate::error::{GoforgeError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "goforge.yaml";
pub const USER_CONFIG_DIR: &str = ".goforge";
pub const USER_CONFIG_FILE: &str = "config.yaml";

pub const GO_EXT: &str = ".go";
pub const TEST_SUFFIX: &str = "_test.go";
pub const GO_MOD: &str = "go.mod";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn user_config_path() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(GoforgeError::HomeNotFound)?;
    Ok(home.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE))
}

/// Hidden entries start with a dot. They are never discovered and hidden
/// directories are never descended into.
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// A Go source unit: ends in `.go` and is not itself a companion test file.
pub fn is_go_source(path: &Path) -> bool {
    file_name(path).is_some_and(|n| n.ends_with(GO_EXT) && !n.ends_with(TEST_SUFFIX))
}

/// Companion test path for `source`: `foo.go` → `foo_test.go`, placed beside
/// the source or inside `output_dir` when given.
pub fn companion_test_path(source: &Path, output_dir: Option<&Path>) -> PathBuf {
    let name = file_name(source).unwrap_or_default();
    let stem = name.strip_suffix(GO_EXT).unwrap_or(name);
    let file = format!("{stem}{}", TEST_SUFFIX);
    match output_dir {
        Some(dir) => dir.join(file),
        None => source
            .parent()
            .map(|p| p.join(&file))
            .unwrap_or_else(|| PathBuf::from(&file)),
    }
}

/// Project name derived from the root directory's final component.
pub fn app_name(root: &Path) -> String {
    let abs = absolute(root);
    abs.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "app".to_string())
}

/// Absolute form of `path` without requiring it to exist.
pub fn absolute(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

/// `path` unchanged when absolute, otherwise joined onto `root`.
pub fn resolve_in(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Absolute path of an existing project directory.
pub fn require_dir(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        return Err(GoforgeError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(GoforgeError::NotADirectory(root.to_path_buf()));
    }
    Ok(absolute(root))
}

/// Walk `root` recursively, pruning hidden entries. The root itself is always
/// yielded, even when it is `.` or another dot-named path.
pub fn walk_visible(root: &Path) -> impl Iterator<Item = walkdir::Result<DirEntry>> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
