//! Startup faults.

use thiserror::Error;
use warden_abac::RegistryError;
use warden_auth::CredentialError;
use warden_config::ConfigError;

/// Result type for service construction.
pub type StartupResult<T> = Result<T, ConfigurationFault>;

/// A fault that must stop the process before it serves any request.
///
/// Per-request outcomes (failed login, missing session, denial) are never
/// represented here; they are ordinary return values.
#[derive(Debug, Error)]
pub enum ConfigurationFault {
    /// A resource is bound to a policy name the registry does not know.
    #[error("resource '{resource}' references unknown policy '{policy}'")]
    UnknownPolicy { resource: String, policy: String },

    /// A policy name was requested for binding but is not registered.
    #[error("policy '{0}' is not registered")]
    UnregisteredPolicy(String),

    /// The same resource path was declared twice.
    #[error("resource '{0}' is declared twice")]
    DuplicateResource(String),

    /// The credential store could not be built.
    #[error("credential store failed to load: {0}")]
    Credentials(#[from] CredentialError),

    /// The policy registry could not be built.
    #[error("policy registry failed to load: {0}")]
    Registry(#[from] RegistryError),

    /// The configuration is structurally invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
