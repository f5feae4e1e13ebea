use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// TestConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestConfig {
    #[serde(default)]
    pub table_driven: bool,
    /// Where generated companion files go. `None` places them beside the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// CoverageConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_coverage_output")]
    pub output: PathBuf,
}

fn default_threshold() -> f64 {
    80.0
}

fn default_coverage_output() -> PathBuf {
    PathBuf::from("coverage.html")
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            output: default_coverage_output(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProfileConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_duration")]
    pub duration_secs: u64,
    #[serde(default = "default_cpu_output")]
    pub cpu_output: PathBuf,
    #[serde(default = "default_mem_output")]
    pub mem_output: PathBuf,
}

fn default_duration() -> u64 {
    30
}

fn default_cpu_output() -> PathBuf {
    PathBuf::from("cpu.pprof")
}

fn default_mem_output() -> PathBuf {
    PathBuf::from("mem.pprof")
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration(),
            cpu_output: default_cpu_output(),
            mem_output: default_mem_output(),
        }
    }
}

// ---------------------------------------------------------------------------
// ContainerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    #[serde(default = "default_base_image")]
    pub base_image: String,
    #[serde(default = "default_dockerfile")]
    pub dockerfile: PathBuf,
    #[serde(default = "default_manifests_dir")]
    pub manifests_dir: PathBuf,
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_base_image() -> String {
    "golang:alpine".to_string()
}

fn default_dockerfile() -> PathBuf {
    PathBuf::from("Dockerfile")
}

fn default_manifests_dir() -> PathBuf {
    PathBuf::from("kubernetes")
}

fn default_replicas() -> u32 {
    3
}

fn default_port() -> u16 {
    8080
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            base_image: default_base_image(),
            dockerfile: default_dockerfile(),
            manifests_dir: default_manifests_dir(),
            replicas: default_replicas(),
            port: default_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// DocsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_docs_format")]
    pub format: String,
    #[serde(default = "default_api_output")]
    pub api_output: PathBuf,
    #[serde(default = "default_user_output")]
    pub user_output: PathBuf,
}

fn default_docs_format() -> String {
    "html".to_string()
}

fn default_api_output() -> PathBuf {
    PathBuf::from("api-docs")
}

fn default_user_output() -> PathBuf {
    PathBuf::from("user-docs")
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            format: default_docs_format(),
            api_output: default_api_output(),
            user_output: default_user_output(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default = "default_web_port")]
    pub web_port: u16,
}

fn default_api_port() -> u16 {
    8080
}

fn default_web_port() -> u16 {
    8081
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            web_port: default_web_port(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub test: TestConfig,
    #[serde(default)]
    pub coverage: CoverageConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            test: TestConfig::default(),
            coverage: CoverageConfig::default(),
            profile: ProfileConfig::default(),
            container: ContainerConfig::default(),
            docs: DocsConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration for `root`.
    ///
    /// Lookup order: `<root>/goforge.yaml`, then `~/.goforge/config.yaml`,
    /// then built-in defaults. A missing file is not an error; a malformed one is.
    pub fn load(root: &Path) -> Result<Self> {
        let project = paths::config_path(root);
        if project.exists() {
            return Self::load_file(&project);
        }
        if let Ok(user) = paths::user_config_path() {
            if user.exists() {
                return Self::load_file(&user);
            }
        }
        Ok(Self::default())
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Write a default `goforge.yaml` unless one exists. Returns true if written.
    pub fn init(root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(&Self::default())?;
        crate::io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !(0.0..=100.0).contains(&self.coverage.threshold) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "coverage.threshold must be between 0 and 100, got {}",
                    self.coverage.threshold
                ),
            });
        }

        if self.profile.duration_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "profile.duration_secs must be greater than 0".to_string(),
            });
        }

        if self.container.replicas == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "container.replicas is 0; the deployment will not run any pods"
                    .to_string(),
            });
        }

        if !matches!(self.docs.format.as_str(), "html" | "markdown") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "docs.format '{}' is not supported (html, markdown)",
                    self.docs.format
                ),
            });
        }

        if self.server.api_port != 0 && self.server.api_port == self.server.web_port {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "server.api_port and server.web_port are both {}",
                    self.server.api_port
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
