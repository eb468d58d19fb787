//! # warden: session-gated attribute-based access control
//!
//! A principal logs in once with an identity and secret and receives an
//! opaque session handle. Every later request presents only the handle, and
//! the [`AuthorizationGate`] decides admission in two steps:
//!
//! ```text
//! handle ──► SessionManager::resolve ──► None ──────────────► Unauthenticated
//!                     │
//!                     ▼ Principal
//!            evaluate(policy, attributes) ──► false ────────► Denied
//!                     │
//!                     ▼ true
//!                   Admit(principal)
//! ```
//!
//! Policies are bound to resources when the service is built. A resource
//! naming an unregistered policy is a [`ConfigurationFault`] and the service
//! refuses to start.
//!
//! ```
//! use warden::{AccessService, Admission};
//! use warden_config::WardenConfig;
//!
//! let service = AccessService::from_config(&WardenConfig::development())?;
//! let admin_only = service.policy("adminOnly")?;
//!
//! let handle = service.login("adminHR", "password123")?;
//! assert!(service.authorize(Some(&handle), &admin_only).is_admitted());
//!
//! service.logout(&handle);
//! assert_eq!(service.authorize(Some(&handle), &admin_only), Admission::Unauthenticated);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod gate;
mod resource;
mod service;

pub use error::{ConfigurationFault, StartupResult};
pub use gate::{Admission, AuthorizationGate, BoundPolicy, Denial};
pub use resource::{Resource, ResourceTable};
pub use service::{AccessService, AccessServiceBuilder};

pub use warden_abac::{Decision, PolicyRegistry};
pub use warden_auth::AuthFailure;
pub use warden_types::{Principal, SessionHandle};
