pub mod analyze;
pub mod config;
pub mod container;
pub mod dependency;
pub mod docs;
pub mod profile;
pub mod serve;

use anyhow::Context;
use goforge_core::config::Config;
use std::path::Path;

pub(crate) fn load_config(root: &Path) -> anyhow::Result<Config> {
    Config::load(root).context("failed to load config")
}
