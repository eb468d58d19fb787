//! Policy evaluation engine.
//!
//! Evaluation is a pure function of the principal's [`Attributes`]: it reads
//! nothing else and has no side effects beyond a `debug!` trace.

use tracing::debug;
use warden_types::Attributes;

use crate::policy::{Condition, Effect, Policy, Predicate};

// ============================================================================
// Decision
// ============================================================================

/// The result of evaluating a policy against a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether access is allowed or denied.
    pub effect: Effect,
    /// The name of the policy that was evaluated.
    pub policy: String,
    /// Human-readable explanation of why this decision was made.
    pub reason: String,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        self.effect == Effect::Allow
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Evaluates `policy` against `attrs`.
///
/// For condition-based policies the reason names the first top-level clause
/// that failed, found in the same single left-to-right pass that decides the
/// outcome.
pub fn evaluate(policy: &Policy, attrs: &Attributes) -> Decision {
    let (effect, reason) = match policy.predicate() {
        Predicate::Condition(condition) => match first_unmet(condition, attrs) {
            None => (Effect::Allow, format!("policy '{}' satisfied", policy.name())),
            Some(unmet) => (
                Effect::Deny,
                format!("policy '{}' not satisfied: {unmet}", policy.name()),
            ),
        },
        Predicate::Function(predicate) => {
            if predicate(attrs) {
                (Effect::Allow, format!("policy '{}' satisfied", policy.name()))
            } else {
                (Effect::Deny, format!("policy '{}' not satisfied", policy.name()))
            }
        }
    };

    debug!(policy = policy.name(), ?effect, %reason, "policy evaluated");

    Decision {
        effect,
        policy: policy.name().to_string(),
        reason,
    }
}

/// Returns whether `condition` holds for `attrs`.
pub fn matches(condition: &Condition, attrs: &Attributes) -> bool {
    match condition {
        Condition::RoleEquals(role) => attrs.role == *role,
        Condition::RoleIn(roles) => roles.contains(&attrs.role),
        Condition::DepartmentEquals(dept) => attrs.department == *dept,
        Condition::ClearanceAtLeast(level) => attrs.clearance.level() >= *level,
        Condition::ClearanceEquals(level) => attrs.clearance.level() == *level,
        Condition::SeniorityAtLeast(years) => attrs.seniority >= *years,
        Condition::SeniorityBelow(years) => attrs.seniority < *years,

        // `all`/`any` stop at the first deciding child.
        Condition::And(sub) => sub.iter().all(|c| matches(c, attrs)),
        Condition::Or(sub) => sub.iter().any(|c| matches(c, attrs)),
        Condition::Not(sub) => !matches(sub, attrs),
    }
}

/// Returns the first top-level clause of `condition` that does not hold.
///
/// A top-level `And` is scanned clause by clause; anything else is reported
/// as a whole.
fn first_unmet<'a>(condition: &'a Condition, attrs: &Attributes) -> Option<&'a Condition> {
    match condition {
        Condition::And(sub) => sub.iter().find(|c| !matches(c, attrs)),
        other => (!matches(other, attrs)).then_some(other),
    }
}

// ============================================================================
// Tests
// ============================================================================
