//! Init command - writes a starter warden.toml.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use warden_config::WardenConfig;

pub fn run(path: &str) -> Result<()> {
    let project_dir = Path::new(path);

    if warden_config::is_initialized(project_dir) {
        anyhow::bail!(
            "Project already initialized in {}. warden.toml already exists.",
            project_dir.display()
        );
    }

    fs::create_dir_all(project_dir).context("Failed to create project directory")?;

    let config = WardenConfig::development();
    let config_content =
        toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
    let config_path = warden_config::project_config_file(project_dir);
    fs::write(&config_path, config_content).context("Failed to write warden.toml")?;

    println!("Wrote {}", config_path.display());
    println!("  {} demo accounts (secret: password123)", config.users.len());
    println!("  {} resources", config.resources.len());
    println!();
    println!("Put machine-specific overrides in warden.local.toml.");
    Ok(())
}
