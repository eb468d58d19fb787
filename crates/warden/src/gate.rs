//! The authorization gate.
//!
//! Two checks in fixed order per request:
//! 1. **Authentication**: resolve the session handle. No live session is
//!    [`Admission::Unauthenticated`] and stops here.
//! 2. **Policy**: evaluate the resource's bound policy against the
//!    principal's attributes. `true` admits, `false` is [`Admission::Denied`].
//!
//! Policies reach the gate only as [`BoundPolicy`] values, which can only be
//! obtained by resolving a name against the registry at startup. A dangling
//! policy name therefore cannot exist at request time.

use std::sync::Arc;

use tracing::{debug, warn};
use warden_abac::{Decision, Policy, PolicyRegistry, evaluate};
use warden_auth::{SessionManager, fingerprint};
use warden_types::{Principal, SessionHandle};

use crate::error::{ConfigurationFault, StartupResult};

// ============================================================================
// Bound Policy
// ============================================================================

/// A policy resolved from the registry at startup.
#[derive(Debug, Clone)]
pub struct BoundPolicy {
    policy: Policy,
}

impl BoundPolicy {
    /// Resolves `name` against `registry`.
    pub fn bind(registry: &PolicyRegistry, name: &str) -> StartupResult<Self> {
        registry
            .get(name)
            .map(|policy| Self {
                policy: policy.clone(),
            })
            .ok_or_else(|| ConfigurationFault::UnregisteredPolicy(name.to_string()))
    }

    pub fn name(&self) -> &str {
        self.policy.name()
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }
}

// ============================================================================
// Admission
// ============================================================================

/// Outcome of one authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Live session and the policy holds.
    Admit(Principal),
    /// No live session for the presented handle. Log in.
    Unauthenticated,
    /// Live session, but access is refused.
    Denied(Denial),
}

/// Why an authenticated principal was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The principal's attributes fail the bound policy.
    Policy(Decision),
    /// No resource is registered at the requested path.
    UnknownResource(String),
}

impl Denial {
    /// The policy that refused access, if one was evaluated.
    pub fn policy(&self) -> Option<&str> {
        match self {
            Denial::Policy(decision) => Some(&decision.policy),
            Denial::UnknownResource(_) => None,
        }
    }

    pub fn reason(&self) -> String {
        match self {
            Denial::Policy(decision) => decision.reason.clone(),
            Denial::UnknownResource(path) => format!("no resource at '{path}'"),
        }
    }
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admit(_))
    }

    /// The admitted principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Admission::Admit(principal) => Some(principal),
            _ => None,
        }
    }
}

// ============================================================================
// Gate
// ============================================================================

/// Composes session liveness and policy satisfaction.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    sessions: Arc<SessionManager>,
}

impl AuthorizationGate {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }

    /// Decides admission for `handle` against `policy`.
    ///
    /// A missing handle (no cookie) and an unknown one are the same outcome.
    pub fn check(&self, handle: Option<&SessionHandle>, policy: &BoundPolicy) -> Admission {
        let Some(principal) = handle.and_then(|h| self.sessions.resolve(h)) else {
            debug!(policy = policy.name(), "no live session");
            return Admission::Unauthenticated;
        };

        let decision = evaluate(policy.policy(), principal.attributes());
        if decision.is_allowed() {
            debug!(
                identity = %principal.identity(),
                policy = policy.name(),
                "access granted"
            );
            Admission::Admit(principal)
        } else {
            warn!(
                identity = %principal.identity(),
                session = %handle.map(fingerprint).unwrap_or_default(),
                policy = policy.name(),
                reason = %decision.reason,
                "access denied"
            );
            Admission::Denied(Denial::Policy(decision))
        }
    }
}
