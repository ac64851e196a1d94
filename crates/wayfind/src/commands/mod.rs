//! Subcommand implementations.

pub mod build;
pub mod check;
pub mod init;
pub mod serve;
pub mod sidebar;

use std::path::Path;

use anyhow::{Context, Result};
use wayfind_config::SiteConfig;

/// Load the layered configuration for a command.
pub fn load_config(path: &Path, profile: Option<&str>) -> Result<SiteConfig> {
    wayfind_config::load(path, profile)
        .with_context(|| format!("Failed to load {}", path.display()))
}
