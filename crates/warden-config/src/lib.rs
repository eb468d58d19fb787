//! Configuration management for Warden
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (WARDEN_* prefix, `__` between nested keys)
//! 2. warden.local.toml (gitignored, local overrides)
//! 3. warden.toml (git-tracked, project config)
//! 4. ~/.config/warden/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! Array sections (`[[users]]`, `[[policies]]`, `[[resources]]`) are replaced
//! wholesale by a higher-precedence source, not merged entry by entry.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use warden_abac::{Condition, names};

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::{
    ConfigLoader, is_initialized, local_config_file, project_config_file, user_config_file,
};

/// Main Warden configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub session: SessionConfig,
    pub users: Vec<UserConfig>,
    pub policies: Vec<PolicyConfig>,
    pub resources: Vec<ResourceConfig>,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            users: Vec::new(),
            policies: Vec::new(),
            resources: default_resources(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sessions at least this many seconds old stop resolving. Unset means
    /// sessions live until logout or restart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age_secs: Option<u64>,
}

/// A credential entry. Role and clearance stay raw here so that a bad value
/// is reported against its identity when the credential store is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub identity: String,
    pub secret: String,
    pub department: String,
    pub role: String,
    pub clearance: u8,
    #[serde(default)]
    pub seniority: u32,
}

/// A policy beyond the built-in standard set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub name: String,
    pub condition: Condition,
}

/// A protected resource and the policy that guards it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub path: String,
    pub policy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResourceConfig {
    pub fn new(path: &str, policy: &str, message: &str) -> Self {
        Self {
            path: path.to_string(),
            policy: policy.to_string(),
            message: Some(message.to_string()),
        }
    }
}

impl UserConfig {
    fn demo(identity: &str, department: &str, role: &str, clearance: u8, seniority: u32) -> Self {
        Self {
            identity: identity.to_string(),
            secret: "password123".to_string(),
            department: department.to_string(),
            role: role.to_string(),
            clearance,
            seniority,
        }
    }
}

/// The built-in route table.
pub fn default_resources() -> Vec<ResourceConfig> {
    vec![
        ResourceConfig::new("/admin", names::ADMIN_ONLY, "Welcome to Admin-Only route"),
        ResourceConfig::new("/hr-department", names::HR_DEPARTMENT, "Welcome to HR Department route"),
        ResourceConfig::new("/finance-manager", names::FINANCE_MANAGER, "Welcome to Finance Manager route"),
        ResourceConfig::new("/it-clearance-2", names::IT_CLEARANCE_2, "Welcome to IT Clearance 2 route"),
        ResourceConfig::new("/legal-director", names::LEGAL_DIRECTOR, "Welcome to Legal Director route"),
        ResourceConfig::new("/ops-combined", names::OPS_COMBINED, "Welcome to Ops Combined route"),
        ResourceConfig::new("/exec-clearance-3", names::EXEC_CLEARANCE_3, "Welcome to Exec Clearance 3 route"),
    ]
}

/// Stands in for a secret in [`WardenConfig::redacted`] output.
pub const REDACTED: &str = "<redacted>";

impl WardenConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Create a development configuration with the seven demo accounts
    pub fn development() -> Self {
        Self {
            users: vec![
                UserConfig::demo("adminHR", "HR", "Admin", 3, 5),
                UserConfig::demo("staffIT", "IT", "Staff", 1, 2),
                UserConfig::demo("managerFinance", "Finance", "Manager", 2, 7),
                UserConfig::demo("directorLegal", "Legal", "Director", 3, 10),
                UserConfig::demo("staffOps", "Operations", "Staff", 1, 1),
                UserConfig::demo("managerHR", "HR", "Manager", 2, 8),
                UserConfig::demo("staffFinance", "Finance", "Staff", 1, 3),
            ],
            ..Default::default()
        }
    }

    /// A copy with every user secret replaced, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        for user in &mut config.users {
            user.secret = REDACTED.to_string();
        }
        config
    }

    /// Structural checks that need no knowledge of the policy registry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.max_age_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "session.max_age_secs must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for resource in &self.resources {
            if !resource.path.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "resource path '{}' must start with '/'",
                    resource.path
                )));
            }
            if !seen.insert(resource.path.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "resource path '{}' is declared twice",
                    resource.path
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WardenConfig::default();
        assert!(config.users.is_empty());
        assert!(config.policies.is_empty());
        assert_eq!(config.resources.len(), 7);
        assert_eq!(config.session.max_age_secs, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_development_config() {
        let config = WardenConfig::development();
        assert_eq!(config.users.len(), 7);
        assert!(config.users.iter().all(|u| u.secret == "password123"));
        let admin = config.users.iter().find(|u| u.identity == "adminHR").unwrap();
        assert_eq!(admin.role, "Admin");
        assert_eq!(admin.clearance, 3);
    }

    #[test]
    fn test_redacted_hides_every_secret() {
        let config = WardenConfig::development();
        let redacted = config.redacted();

        assert_eq!(redacted.users.len(), config.users.len());
        assert!(redacted.users.iter().all(|u| u.secret == REDACTED));
        assert_eq!(redacted.users[0].identity, "adminHR");
        assert_eq!(config.users[0].secret, "password123");
    }

    #[test]
    fn test_default_resources_bind_standard_policies() {
        let admin = &default_resources()[0];
        assert_eq!(admin.path, "/admin");
        assert_eq!(admin.policy, "adminOnly");
    }

    #[test]
    fn test_zero_max_age_is_invalid() {
        let mut config = WardenConfig::default();
        config.session.max_age_secs = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_duplicate_resource_path_is_invalid() {
        let mut config = WardenConfig::default();
        config
            .resources
            .push(ResourceConfig::new("/admin", "hrDepartment", "again"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn test_relative_resource_path_is_invalid() {
        let mut config = WardenConfig::default();
        config.resources = vec![ResourceConfig::new("admin", "adminOnly", "hi")];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_config_from_toml() {
        let config: WardenConfig = toml::from_str(
            r#"
[[policies]]
name = "salesLead"
condition = { and = [{ department_equals = "Sales" }, { seniority_at_least = 3 }] }
"#,
        )
        .expect("parse config");

        assert_eq!(config.policies.len(), 1);
        assert_eq!(config.policies[0].name, "salesLead");
        assert_eq!(
            config.policies[0].condition,
            Condition::And(vec![
                Condition::department("Sales"),
                Condition::SeniorityAtLeast(3),
            ])
        );
        // Unlisted sections keep their defaults.
        assert_eq!(config.resources.len(), 7);
    }
}
