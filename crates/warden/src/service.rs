//! The access service facade.
//!
//! Owns the credential store, policy registry, session table and resource
//! table. Everything except the session table is fixed once [`build`] or
//! [`AccessService::from_config`] returns; the session table is the only
//! state mutated at request time.
//!
//! [`build`]: AccessServiceBuilder::build

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};
use warden_abac::{Policy, PolicyRegistry};
use warden_auth::{AuthFailure, Authenticator, CredentialEntry, CredentialStore, SessionManager};
use warden_config::{ConfigError, WardenConfig};
use warden_types::SessionHandle;

use crate::error::{ConfigurationFault, StartupResult};
use crate::gate::{Admission, AuthorizationGate, BoundPolicy, Denial};
use crate::resource::{Resource, ResourceTable};

// ============================================================================
// Service
// ============================================================================

/// Login, logout and authorization over a fixed policy and resource set.
#[derive(Debug, Clone)]
pub struct AccessService {
    authenticator: Authenticator,
    sessions: Arc<SessionManager>,
    registry: Arc<PolicyRegistry>,
    resources: Arc<ResourceTable>,
    gate: AuthorizationGate,
}

impl AccessService {
    pub fn builder() -> AccessServiceBuilder {
        AccessServiceBuilder::default()
    }

    /// Builds the service from loaded configuration.
    ///
    /// The standard policies are always registered; `[[policies]]` entries
    /// are added alongside them. Every resource must name a registered
    /// policy.
    ///
    /// # Errors
    ///
    /// Any [`ConfigurationFault`]. The process should not start.
    pub fn from_config(config: &WardenConfig) -> StartupResult<Self> {
        config.validate()?;

        let mut builder = Self::builder().with_standard_policies();

        for user in &config.users {
            builder = builder.credential(CredentialEntry::parse(
                &user.identity,
                &user.secret,
                &user.department,
                &user.role,
                user.clearance,
                user.seniority,
            )?);
        }

        for policy in &config.policies {
            builder = builder.policy(Policy::new(&policy.name, policy.condition.clone()));
        }

        for resource in &config.resources {
            builder = builder.resource(&resource.path, &resource.policy, resource.message.clone());
        }

        if let Some(secs) = config.session.max_age_secs {
            let max_age = i64::try_from(secs)
                .ok()
                .and_then(Duration::try_seconds)
                .ok_or_else(|| {
                    ConfigError::ValidationError(format!(
                        "session.max_age_secs {secs} is out of range"
                    ))
                })?;
            builder = builder.session_max_age(max_age);
        }

        builder.build()
    }

    /// Verifies credentials and opens a session.
    ///
    /// # Errors
    ///
    /// [`AuthFailure`] for an unknown identity or a wrong secret alike. No
    /// session is created.
    pub fn login(&self, identity: &str, secret: &str) -> Result<SessionHandle, AuthFailure> {
        let principal = self.authenticator.authenticate(identity, secret)?;
        Ok(self.sessions.create(principal))
    }

    /// Ends the session bound to `handle`. Unknown handles are accepted.
    pub fn logout(&self, handle: &SessionHandle) {
        if !self.sessions.invalidate(handle) {
            debug!("logout for a handle with no live session");
        }
    }

    /// Ends the session named by a raw handle string, if it parses.
    pub fn logout_token(&self, token: &str) {
        if let Some(handle) = Self::parse_handle(token) {
            self.logout(&handle);
        }
    }

    /// Resolves a policy name for later use with [`authorize`](Self::authorize).
    ///
    /// Call this at startup; the returned value cannot dangle.
    ///
    /// # Errors
    ///
    /// [`ConfigurationFault::UnregisteredPolicy`] if no policy has that name.
    pub fn policy(&self, name: &str) -> StartupResult<BoundPolicy> {
        BoundPolicy::bind(&self.registry, name)
    }

    /// Checks `handle` against `policy`.
    pub fn authorize(&self, handle: Option<&SessionHandle>, policy: &BoundPolicy) -> Admission {
        self.gate.check(handle, policy)
    }

    /// Checks a raw handle string. A malformed string is treated as no handle.
    pub fn authorize_token(&self, token: Option<&str>, policy: &BoundPolicy) -> Admission {
        let handle = token.and_then(Self::parse_handle);
        self.gate.check(handle.as_ref(), policy)
    }

    /// Checks `handle` against the policy guarding `path`.
    ///
    /// Authentication is checked first, so an anonymous caller learns nothing
    /// about which paths exist. An authenticated caller asking for an unknown
    /// path is denied.
    pub fn authorize_resource(&self, handle: Option<&SessionHandle>, path: &str) -> Admission {
        if let Some(resource) = self.resources.get(path) {
            return self.gate.check(handle, resource.policy());
        }

        let Some(principal) = handle.and_then(|h| self.sessions.resolve(h)) else {
            return Admission::Unauthenticated;
        };
        warn!(identity = %principal.identity(), path, "no resource at path");
        Admission::Denied(Denial::UnknownResource(path.to_string()))
    }

    pub fn resource(&self, path: &str) -> Option<&Resource> {
        self.resources.get(path)
    }

    /// All protected resources, sorted by path.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    pub fn policies(&self) -> &PolicyRegistry {
        &self.registry
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Drops sessions past the configured max age. Without a max age this is
    /// a no-op. Returns the number removed.
    pub fn sweep_expired(&self) -> usize {
        self.sessions
            .max_age()
            .map_or(0, |max_age| self.sessions.expire_older_than(max_age))
    }

    /// Parses a handle as presented by a client.
    pub fn parse_handle(token: &str) -> Option<SessionHandle> {
        match token.parse() {
            Ok(handle) => Some(handle),
            Err(e) => {
                debug!(error = %e, "rejected malformed session handle");
                None
            }
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates startup inputs; all validation happens in [`build`](Self::build).
#[derive(Debug, Default)]
pub struct AccessServiceBuilder {
    credentials: Vec<CredentialEntry>,
    standard_policies: bool,
    policies: Vec<Policy>,
    resources: Vec<(String, String, Option<String>)>,
    max_age: Option<Duration>,
}

impl AccessServiceBuilder {
    /// Registers the seven built-in policies.
    pub fn with_standard_policies(mut self) -> Self {
        self.standard_policies = true;
        self
    }

    pub fn credential(mut self, entry: CredentialEntry) -> Self {
        self.credentials.push(entry);
        self
    }

    pub fn policy(mut self, policy: Policy) -> Self {
        self.policies.push(policy);
        self
    }

    pub fn resource(mut self, path: &str, policy: &str, message: Option<String>) -> Self {
        self.resources
            .push((path.to_string(), policy.to_string(), message));
        self
    }

    pub fn session_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// # Errors
    ///
    /// Duplicate identities, duplicate policy names, duplicate resource
    /// paths, and resources naming unregistered policies.
    pub fn build(self) -> StartupResult<AccessService> {
        let store = CredentialStore::from_entries(self.credentials)?;

        let mut registry = if self.standard_policies {
            PolicyRegistry::standard()
        } else {
            PolicyRegistry::new()
        };
        for policy in self.policies {
            registry.register(policy)?;
        }

        let mut resources = ResourceTable::new();
        for (path, policy, message) in self.resources {
            resources.insert(&registry, &path, &policy, message)?;
        }

        let sessions = match self.max_age {
            Some(max_age) => SessionManager::new().with_max_age(max_age),
            None => SessionManager::new(),
        };
        let sessions = Arc::new(sessions);

        info!(
            identities = store.len(),
            policies = registry.len(),
            resources = resources.len(),
            max_age_secs = self.max_age.map(|d| d.num_seconds()),
            "access service ready"
        );

        Ok(AccessService {
            authenticator: Authenticator::new(Arc::new(store)),
            gate: AuthorizationGate::new(Arc::clone(&sessions)),
            sessions,
            registry: Arc::new(registry),
            resources: Arc::new(resources),
        })
    }
}
