//! The credential store: identity → (secret, attributes).
//!
//! Loaded once at startup from static configuration and read-only
//! thereafter. Secrets are kept only as BLAKE3 digests so that comparison
//! runs over fixed-width values in constant time.

use std::collections::HashMap;
use std::fmt::{self, Debug};

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use warden_types::{Attributes, Clearance, Identity, Principal, Role};

use crate::error::{CredentialError, CredentialResult};

// ============================================================================
// Secret Digest
// ============================================================================

/// Fixed-width digest of a login secret. Zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretDigest([u8; 32]);

impl SecretDigest {
    pub fn of(secret: &str) -> Self {
        Self(*blake3::hash(secret.as_bytes()).as_bytes())
    }

    /// Constant-time comparison against a presented secret.
    pub fn verify(&self, presented: &str) -> bool {
        let presented = Self::of(presented);
        self.0.ct_eq(&presented.0).into()
    }
}

impl Debug for SecretDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretDigest(<redacted>)")
    }
}

// ============================================================================
// Credential Entry
// ============================================================================

/// One row of the credential store.
#[derive(Debug, Clone)]
pub struct CredentialEntry {
    identity: Identity,
    secret: SecretDigest,
    attributes: Attributes,
}

impl CredentialEntry {
    /// Creates an entry from already-validated attributes.
    pub fn new(
        identity: impl Into<Identity>,
        secret: &str,
        attributes: Attributes,
    ) -> CredentialResult<Self> {
        let identity = identity.into();
        if identity.as_str().trim().is_empty() {
            return Err(CredentialError::EmptyIdentity);
        }
        Ok(Self {
            identity,
            secret: SecretDigest::of(secret),
            attributes,
        })
    }

    /// Creates an entry from raw configuration values, validating role and
    /// clearance.
    pub fn parse(
        identity: &str,
        secret: &str,
        department: &str,
        role: &str,
        clearance: u8,
        seniority: u32,
    ) -> CredentialResult<Self> {
        let invalid = |source| CredentialError::InvalidAttributes {
            identity: Identity::new(identity),
            source,
        };
        let role: Role = role.parse().map_err(invalid)?;
        let clearance = Clearance::new(clearance).map_err(invalid)?;
        Self::new(
            identity,
            secret,
            Attributes::new(department, role, clearance, seniority),
        )
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub(crate) fn secret(&self) -> &SecretDigest {
        &self.secret
    }

    /// The principal this entry authenticates as.
    pub fn principal(&self) -> Principal {
        Principal::new(self.identity.clone(), self.attributes.clone())
    }
}

// ============================================================================
// Credential Store
// ============================================================================

/// Read-only identity → credential mapping.
///
/// # Invariants
///
/// - Identities are unique.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    entries: HashMap<Identity, CredentialEntry>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from entries, rejecting duplicate identities.
    pub fn from_entries(
        entries: impl IntoIterator<Item = CredentialEntry>,
    ) -> CredentialResult<Self> {
        let mut store = Self::new();
        for entry in entries {
            store.insert(entry)?;
        }
        Ok(store)
    }

    /// Adds an entry during construction.
    pub fn insert(&mut self, entry: CredentialEntry) -> CredentialResult<()> {
        if self.entries.contains_key(entry.identity()) {
            return Err(CredentialError::DuplicateIdentity(entry.identity().clone()));
        }
        self.entries.insert(entry.identity().clone(), entry);
        Ok(())
    }

    /// Looks up an identity. Absence is the only failure.
    pub fn lookup(&self, identity: &str) -> Option<&CredentialEntry> {
        self.entries.get(&Identity::new(identity))
    }

    /// Registered identities, sorted.
    pub fn identities(&self) -> Vec<&Identity> {
        let mut ids: Vec<&Identity> = self.entries.keys().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_types::TypesError;

    fn entry(identity: &str) -> CredentialEntry {
        CredentialEntry::parse(identity, "password123", "HR", "Admin", 3, 5).unwrap()
    }

    #[test]
    fn lookup_returns_entry_with_exact_attributes() {
        let store = CredentialStore::from_entries([entry("adminHR")]).unwrap();
        let found = store.lookup("adminHR").unwrap();
        assert_eq!(found.identity().as_str(), "adminHR");
        assert_eq!(found.attributes().role, Role::Admin);
        assert_eq!(found.attributes().clearance.level(), 3);
        assert_eq!(found.attributes().seniority, 5);
        assert_eq!(found.attributes().department.as_str(), "HR");
    }

    #[test]
    fn lookup_of_unknown_identity_is_none() {
        let store = CredentialStore::from_entries([entry("adminHR")]).unwrap();
        assert!(store.lookup("adminhr").is_none());
        assert!(store.lookup("").is_none());
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let err = CredentialStore::from_entries([entry("adminHR"), entry("adminHR")]).unwrap_err();
        assert_eq!(err, CredentialError::DuplicateIdentity(Identity::new("adminHR")));
    }

    #[test]
    fn invalid_role_names_the_identity() {
        let err = CredentialEntry::parse("bob", "pw", "HR", "Intern", 1, 0).unwrap_err();
        assert_eq!(
            err,
            CredentialError::InvalidAttributes {
                identity: Identity::new("bob"),
                source: TypesError::InvalidRole("Intern".to_string()),
            }
        );
    }

    #[test]
    fn invalid_clearance_is_rejected() {
        let err = CredentialEntry::parse("bob", "pw", "HR", "Staff", 0, 0).unwrap_err();
        assert!(matches!(
            err,
            CredentialError::InvalidAttributes {
                source: TypesError::InvalidClearance(0),
                ..
            }
        ));
    }

    #[test]
    fn empty_identity_is_rejected() {
        let err = CredentialEntry::parse("  ", "pw", "HR", "Staff", 1, 0).unwrap_err();
        assert_eq!(err, CredentialError::EmptyIdentity);
    }

    #[test]
    fn digest_verifies_only_the_original_secret() {
        let digest = SecretDigest::of("password123");
        assert!(digest.verify("password123"));
        assert!(!digest.verify("password124"));
        assert!(!digest.verify(""));
        assert_eq!(format!("{digest:?}"), "SecretDigest(<redacted>)");
    }
}
