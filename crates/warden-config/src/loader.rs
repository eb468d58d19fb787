//! Configuration loader with multi-source merging

use crate::WardenConfig;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::env;
use std::path::{Path, PathBuf};

const PROJECT_FILE: &str = "warden.toml";
const LOCAL_FILE: &str = "warden.local.toml";

/// `~/.config/warden/config.toml` on Linux, or the platform equivalent.
///
/// `None` when the platform reports no home directory.
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("dev", "Warden", "warden").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// The git-tracked `warden.toml` in `project_dir`.
pub fn project_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
    project_dir.as_ref().join(PROJECT_FILE)
}

/// The gitignored `warden.local.toml` in `project_dir`.
pub fn local_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
    project_dir.as_ref().join(LOCAL_FILE)
}

/// True once `warden init` has written a `warden.toml` into `project_dir`.
pub fn is_initialized(project_dir: impl AsRef<Path>) -> bool {
    project_config_file(project_dir).exists()
}

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    user_config: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "WARDEN".to_string(),
            user_config: true,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "WARDEN")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Skip ~/.config/warden/config.toml
    pub fn without_user_config(mut self) -> Self {
        self.user_config = false;
        self
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<WardenConfig> {
        let mut builder = config::Config::builder();

        // 1. Start with built-in defaults
        let defaults = WardenConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. User config (~/.config/warden/config.toml)
        if self.user_config
            && let Some(user_file) = user_config_file()
            && user_file.exists()
        {
            builder = builder.add_source(
                config::File::from(user_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 3. Project config (warden.toml)
        let project_config_file = project_config_file(&self.project_dir);
        if project_config_file.exists() {
            builder = builder.add_source(
                config::File::from(project_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 4. Local config (warden.local.toml, gitignored)
        let local_config_file = local_config_file(&self.project_dir);
        if local_config_file.exists() {
            builder = builder.add_source(
                config::File::from(local_config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 5. Environment variables (WARDEN_SESSION__MAX_AGE_SECS=...)
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Build and deserialize
        let config = builder.build().context("Failed to build configuration")?;

        let warden_config: WardenConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        warden_config
            .validate()
            .context("Configuration failed validation")?;

        Ok(warden_config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn loader(dir: &Path) -> ConfigLoader {
        ConfigLoader::new()
            .with_project_dir(dir)
            .with_env_prefix("WARDEN_TEST_UNSET")
            .without_user_config()
    }

    #[test]
    fn test_load_defaults() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config = loader(temp_dir.path()).load().expect("Failed to load config");

        assert!(config.users.is_empty());
        assert_eq!(config.resources.len(), 7);
        assert_eq!(config.session.max_age_secs, None);
    }

    #[test]
    fn test_load_project_config() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        let config_content = r#"
[session]
max_age_secs = 900

[[users]]
identity = "adminHR"
secret = "password123"
department = "HR"
role = "Admin"
clearance = 3
seniority = 5

[[users]]
identity = "staffIT"
secret = "password123"
department = "IT"
role = "Staff"
clearance = 1

[[resources]]
path = "/admin"
policy = "adminOnly"
"#;
        fs::write(project_dir.join("warden.toml"), config_content)
            .expect("Failed to write config");

        let config = loader(project_dir).load().expect("Failed to load config");

        assert_eq!(config.session.max_age_secs, Some(900));
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.users[1].identity, "staffIT");
        assert_eq!(config.users[1].seniority, 0);
        assert_eq!(config.resources.len(), 1);
        assert_eq!(config.resources[0].message, None);
    }

    #[test]
    fn test_local_overrides() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("warden.toml"),
            r#"
[session]
max_age_secs = 3600
"#,
        )
        .expect("Failed to write project config");

        fs::write(
            project_dir.join("warden.local.toml"),
            r#"
[session]
max_age_secs = 60
"#,
        )
        .expect("Failed to write local config");

        let config = loader(project_dir).load().expect("Failed to load config");

        // Local config should override project config
        assert_eq!(config.session.max_age_secs, Some(60));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        fs::write(
            project_dir.join("warden.toml"),
            r#"
[session]
max_age_secs = 0
"#,
        )
        .expect("Failed to write config");

        let err = loader(project_dir).load().unwrap_err();
        assert!(format!("{err:#}").contains("max_age_secs"));
    }

    #[test]
    fn test_config_file_locations() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let project_dir = temp_dir.path();

        assert_eq!(project_config_file(project_dir), project_dir.join("warden.toml"));
        assert_eq!(local_config_file(project_dir), project_dir.join("warden.local.toml"));

        assert!(!is_initialized(project_dir));
        fs::write(project_config_file(project_dir), "[session]\n").expect("Failed to write config");
        assert!(is_initialized(project_dir));

        // Platform dependent; only check the file name when a home exists
        if let Some(user_file) = user_config_file() {
            assert!(user_file.ends_with("config.toml"));
            assert!(user_file.to_string_lossy().contains("warden"));
        }
    }
}
