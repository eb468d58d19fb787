//! Identity + secret → principal.

use std::sync::{Arc, LazyLock};

use tracing::{debug, warn};
use warden_types::Principal;

use crate::credentials::{CredentialStore, SecretDigest};
use crate::error::AuthFailure;

/// Digest compared against when the identity is unknown, so both failure
/// paths perform the same work.
static UNKNOWN_IDENTITY_DIGEST: LazyLock<SecretDigest> =
    LazyLock::new(|| SecretDigest::of("\u{0}warden-unknown-identity\u{0}"));

/// Validates login attempts against a [`CredentialStore`].
///
/// Stateless: there is no memory of earlier attempts (no lockout or backoff).
#[derive(Debug, Clone)]
pub struct Authenticator {
    store: Arc<CredentialStore>,
}

impl Authenticator {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Returns the principal for `identity` if `secret` matches.
    ///
    /// Unknown identity and wrong secret both yield [`AuthFailure`].
    pub fn authenticate(&self, identity: &str, secret: &str) -> Result<Principal, AuthFailure> {
        let Some(entry) = self.store.lookup(identity) else {
            let _ = UNKNOWN_IDENTITY_DIGEST.verify(secret);
            debug!(identity, "authentication failed");
            warn!("authentication failed");
            return Err(AuthFailure);
        };

        if entry.secret().verify(secret) {
            debug!(identity, "authentication succeeded");
            Ok(entry.principal())
        } else {
            debug!(identity, "authentication failed");
            warn!("authentication failed");
            Err(AuthFailure)
        }
    }
}
