//! Authentication error types.

use thiserror::Error;
use warden_types::{Identity, TypesError};

/// Login was refused.
///
/// Carries no detail. An unknown identity and a wrong secret produce the
/// same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid credentials")]
pub struct AuthFailure;

/// Errors raised while building the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The identity is already present in the store.
    #[error("identity '{0}' is defined more than once")]
    DuplicateIdentity(Identity),

    /// The identity is empty or whitespace.
    #[error("credential entry has an empty identity")]
    EmptyIdentity,

    /// An attribute value failed validation.
    #[error("invalid attributes for '{identity}': {source}")]
    InvalidAttributes {
        identity: Identity,
        source: TypesError,
    },
}

/// Result type for credential store construction.
pub type CredentialResult<T> = Result<T, CredentialError>;
