//! Name → policy lookup.
//!
//! The registry is filled once at startup and then only read. It is moved
//! into the access service behind an `Arc`, so no synchronization is needed
//! after construction.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::policy::Policy;

/// Error type for registry construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A policy with this name has already been registered.
    #[error("policy '{0}' is registered twice")]
    DuplicatePolicy(String),
}

/// Read-only mapping from policy name to policy.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<String, Policy>,
}

impl PolicyRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the seven standard policies.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for policy in Policy::standard() {
            // Standard names are distinct constants.
            registry.policies.insert(policy.name().to_string(), policy);
        }
        registry
    }

    /// Registers a policy under its own name.
    pub fn register(&mut self, policy: Policy) -> Result<(), RegistryError> {
        if self.policies.contains_key(policy.name()) {
            return Err(RegistryError::DuplicatePolicy(policy.name().to_string()));
        }
        debug!(policy = policy.name(), "policy registered");
        self.policies.insert(policy.name().to_string(), policy);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_policy(mut self, policy: Policy) -> Result<Self, RegistryError> {
        self.register(policy)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Policy> {
        self.policies.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Condition, names};
    use warden_types::Role;

    #[test]
    fn standard_registry_holds_all_seven() {
        let registry = PolicyRegistry::standard();
        assert_eq!(registry.len(), 7);
        assert_eq!(
            registry.names(),
            vec![
                names::ADMIN_ONLY,
                names::EXEC_CLEARANCE_3,
                names::FINANCE_MANAGER,
                names::HR_DEPARTMENT,
                names::IT_CLEARANCE_2,
                names::LEGAL_DIRECTOR,
                names::OPS_COMBINED,
            ]
        );
    }

    #[test]
    fn missing_name_is_none() {
        let registry = PolicyRegistry::standard();
        assert!(registry.get("adminonly").is_none());
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = PolicyRegistry::standard();
        let err = registry
            .register(Policy::new(names::ADMIN_ONLY, Condition::RoleEquals(Role::Staff)))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicatePolicy("adminOnly".to_string()));

        // The original binding is untouched.
        let policy = registry.get(names::ADMIN_ONLY).unwrap();
        assert!(format!("{:?}", policy.predicate()).contains("Admin"));
    }

    #[test]
    fn custom_policy_is_added_without_touching_standard_ones() {
        let registry = PolicyRegistry::standard()
            .with_policy(Policy::new("salesTeam", Condition::department("Sales")))
            .unwrap();
        assert_eq!(registry.len(), 8);
        assert!(registry.contains("salesTeam"));
    }
}
