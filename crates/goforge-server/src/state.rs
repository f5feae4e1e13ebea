use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use goforge_core::config::Config;
use goforge_core::paths;
use goforge_core::tool_runner::{SystemRunner, ToolRunner};

/// Shared application state passed to all route handlers.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// Absolute project root; relative config paths resolve against it.
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub runner: Arc<dyn ToolRunner>,
    pub started_at: DateTime<Utc>,
    /// Serve the embedded front end for non-API paths.
    pub ui: bool,
}

impl AppState {
    /// State for `root`: its configuration and the system tool runner.
    pub fn new(root: &Path, ui: bool) -> goforge_core::Result<Self> {
        let config = Config::load(root)?;
        Ok(Self::with_runner(root, config, Arc::new(SystemRunner), ui))
    }

    pub fn with_runner(
        root: &Path,
        config: Config,
        runner: Arc<dyn ToolRunner>,
        ui: bool,
    ) -> Self {
        Self {
            root: paths::absolute(root),
            config: Arc::new(config),
            runner,
            started_at: Utc::now(),
            ui,
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}
