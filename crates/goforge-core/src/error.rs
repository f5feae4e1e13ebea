use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GoforgeError {
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("not a Go source file: {} (expected a non-test .go file or a directory)", .0.display())]
    NotGoSource(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("{}:{line}:{column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("failed to load Go grammar: {0}")]
    Grammar(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("required tool not found on PATH: {0}")]
    ToolNotFound(String),

    #[error("failed to spawn '{program}': {reason}")]
    ToolSpawnFailed { program: String, reason: String },

    #[error("'{command}' failed (exit {code}):\n{output}")]
    ToolFailed {
        command: String,
        code: String,
        output: String,
    },

    #[error("unsupported format: {0} (supported: html, markdown)")]
    UnsupportedFormat(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<walkdir::Error> for GoforgeError {
    fn from(e: walkdir::Error) -> Self {
        let message = e.to_string();
        GoforgeError::Io(
            e.into_io_error()
                .unwrap_or_else(|| std::io::Error::other(message)),
        )
    }
}

pub type Result<T> = std::result::Result<T, GoforgeError>;
