//! # warden-auth: Authentication and sessions
//!
//! - [`CredentialStore`]: identity → secret digest + attributes, read-only
//!   after startup
//! - [`Authenticator`]: identity + secret → [`Principal`](warden_types::Principal)
//!   or a single opaque [`AuthFailure`]
//! - [`SessionManager`]: sharded, concurrent handle → principal table
//!
//! Authentication runs once, at login. Every later request presents only the
//! session handle.
//!
//! ```
//! use std::sync::Arc;
//! use warden_auth::{Authenticator, CredentialEntry, CredentialStore, SessionManager};
//!
//! let store = CredentialStore::from_entries([
//!     CredentialEntry::parse("adminHR", "password123", "HR", "Admin", 3, 5)?,
//! ])?;
//! let authenticator = Authenticator::new(Arc::new(store));
//! let sessions = SessionManager::new();
//!
//! let principal = authenticator.authenticate("adminHR", "password123")?;
//! let handle = sessions.create(principal.clone());
//! assert_eq!(sessions.resolve(&handle), Some(principal));
//!
//! sessions.invalidate(&handle);
//! assert_eq!(sessions.resolve(&handle), None);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod authn;
pub mod credentials;
pub mod error;
pub mod session;

pub use authn::Authenticator;
pub use credentials::{CredentialEntry, CredentialStore, SecretDigest};
pub use error::{AuthFailure, CredentialError, CredentialResult};
pub use session::{Session, SessionManager, fingerprint};
