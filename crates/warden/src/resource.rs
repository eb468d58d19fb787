//! Protected resources and their bound policies.

use std::collections::HashMap;

use warden_abac::PolicyRegistry;

use crate::error::{ConfigurationFault, StartupResult};
use crate::gate::BoundPolicy;

/// A protected route.
#[derive(Debug, Clone)]
pub struct Resource {
    path: String,
    policy: BoundPolicy,
    message: Option<String>,
}

impl Resource {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn policy(&self) -> &BoundPolicy {
        &self.policy
    }

    /// Body returned on admission, if configured.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Path → resource, every entry bound to a registered policy.
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    by_path: HashMap<String, Resource>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource, resolving its policy name against `registry`.
    ///
    /// # Errors
    ///
    /// [`ConfigurationFault::UnknownPolicy`] if the name is not registered,
    /// [`ConfigurationFault::DuplicateResource`] if the path already exists.
    pub fn insert(
        &mut self,
        registry: &PolicyRegistry,
        path: &str,
        policy: &str,
        message: Option<String>,
    ) -> StartupResult<()> {
        if self.by_path.contains_key(path) {
            return Err(ConfigurationFault::DuplicateResource(path.to_string()));
        }
        let bound =
            BoundPolicy::bind(registry, policy).map_err(|_| ConfigurationFault::UnknownPolicy {
                resource: path.to_string(),
                policy: policy.to_string(),
            })?;

        self.by_path.insert(
            path.to_string(),
            Resource {
                path: path.to_string(),
                policy: bound,
                message,
            },
        );
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&Resource> {
        self.by_path.get(path)
    }

    /// All resources, sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        let mut resources: Vec<&Resource> = self.by_path.values().collect();
        resources.sort_by(|a, b| a.path.cmp(&b.path));
        resources.into_iter()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_binds_registered_policy() {
        let registry = PolicyRegistry::standard();
        let mut table = ResourceTable::new();
        table
            .insert(&registry, "/admin", "adminOnly", Some("hi".into()))
            .unwrap();

        let admin = table.get("/admin").unwrap();
        assert_eq!(admin.policy().name(), "adminOnly");
        assert_eq!(admin.message(), Some("hi"));
        assert!(table.get("/nowhere").is_none());
    }

    #[test]
    fn unknown_policy_names_the_resource() {
        let registry = PolicyRegistry::standard();
        let mut table = ResourceTable::new();
        let err = table
            .insert(&registry, "/reports", "reportViewer", None)
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigurationFault::UnknownPolicy { ref resource, ref policy }
                if resource == "/reports" && policy == "reportViewer"
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn duplicate_path_is_rejected() {
        let registry = PolicyRegistry::standard();
        let mut table = ResourceTable::new();
        table.insert(&registry, "/admin", "adminOnly", None).unwrap();
        let err = table
            .insert(&registry, "/admin", "hrDepartment", None)
            .unwrap_err();
        assert!(matches!(err, ConfigurationFault::DuplicateResource(_)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn iter_is_sorted_by_path() {
        let registry = PolicyRegistry::standard();
        let mut table = ResourceTable::new();
        table.insert(&registry, "/ops-combined", "opsCombined", None).unwrap();
        table.insert(&registry, "/admin", "adminOnly", None).unwrap();
        table.insert(&registry, "/hr-department", "hrDepartment", None).unwrap();

        let paths: Vec<&str> = table.iter().map(Resource::path).collect();
        assert_eq!(paths, vec!["/admin", "/hr-department", "/ops-combined"]);
    }
}
