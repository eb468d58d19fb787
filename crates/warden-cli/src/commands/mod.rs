//! CLI command implementations.

pub mod check;
pub mod config;
pub mod init;
pub mod listing;
pub mod simulate;
pub mod version;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use warden::AccessService;
use warden_config::WardenConfig;

/// Loads the merged configuration for `project`.
///
/// With `demo`, an empty user list is filled with the demo accounts.
pub fn load_config(project: &str, demo: bool) -> Result<WardenConfig> {
    let mut config = WardenConfig::load_from_dir(Path::new(project))
        .context("Failed to load configuration")?;
    if demo && config.users.is_empty() {
        config.users = WardenConfig::development().users;
    }
    debug!(project, users = config.users.len(), "configuration loaded");
    Ok(config)
}

/// Loads configuration and builds the access service from it.
pub fn build_service(project: &str, demo: bool) -> Result<AccessService> {
    let config = load_config(project, demo)?;
    AccessService::from_config(&config).context("Invalid access configuration")
}
