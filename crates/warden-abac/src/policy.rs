//! Policy definitions.
//!
//! A policy is a named, pure predicate over a principal's [`Attributes`].
//! Most policies are written in the [`Condition`] language, which is plain
//! data and can be loaded from configuration. Policies that need logic the
//! language cannot express can wrap a plain function pointer instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use warden_types::{Attributes, Department, Role};

// ============================================================================
// Effect
// ============================================================================

/// The outcome of evaluating a policy: allow or deny access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// Grant access.
    Allow,
    /// Deny access.
    #[default]
    Deny,
}

// ============================================================================
// Condition
// ============================================================================

/// A test over principal attributes.
///
/// Leaf conditions compare one attribute; `And`, `Or` and `Not` combine them.
/// `And` and `Or` evaluate their children left to right and stop at the
/// first child that decides the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    // -- Role --
    /// Role must equal the specified value.
    RoleEquals(Role),
    /// Role must be one of the specified values.
    RoleIn(Vec<Role>),

    // -- Department --
    /// Department must equal the specified value (exact match).
    DepartmentEquals(Department),

    // -- Clearance --
    /// Clearance level must be >= the specified value.
    ClearanceAtLeast(u8),
    /// Clearance level must equal the specified value.
    ClearanceEquals(u8),

    // -- Seniority --
    /// Seniority in years must be >= the specified value.
    SeniorityAtLeast(u32),
    /// Seniority in years must be < the specified value.
    SeniorityBelow(u32),

    // -- Logical combinators --
    /// All sub-conditions must be true. An empty list is true.
    And(Vec<Condition>),
    /// At least one sub-condition must be true. An empty list is false.
    Or(Vec<Condition>),
    /// The sub-condition must be false.
    Not(Box<Condition>),
}

impl Condition {
    /// Shorthand for `DepartmentEquals`.
    pub fn department(name: &str) -> Self {
        Self::DepartmentEquals(Department::new(name))
    }

    /// Shorthand for `Not`.
    pub fn negate(inner: Condition) -> Self {
        Self::Not(Box::new(inner))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::RoleEquals(role) => write!(f, "role = {role}"),
            Condition::RoleIn(roles) => {
                let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
                write!(f, "role in [{}]", names.join(", "))
            }
            Condition::DepartmentEquals(dept) => write!(f, "department = {dept}"),
            Condition::ClearanceAtLeast(level) => write!(f, "clearance >= {level}"),
            Condition::ClearanceEquals(level) => write!(f, "clearance = {level}"),
            Condition::SeniorityAtLeast(years) => write!(f, "seniority >= {years}"),
            Condition::SeniorityBelow(years) => write!(f, "seniority < {years}"),
            Condition::And(sub) => write_joined(f, sub, " and ", "true"),
            Condition::Or(sub) => write_joined(f, sub, " or ", "false"),
            Condition::Not(sub) => write!(f, "not ({sub})"),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    sub: &[Condition],
    sep: &str,
    empty: &str,
) -> fmt::Result {
    if sub.is_empty() {
        return f.write_str(empty);
    }
    f.write_str("(")?;
    for (i, cond) in sub.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{cond}")?;
    }
    f.write_str(")")
}

// ============================================================================
// Predicate
// ============================================================================

/// The body of a policy.
#[derive(Clone)]
pub enum Predicate {
    /// A declarative condition tree.
    Condition(Condition),
    /// A plain function. Must be pure: no I/O, no shared state.
    Function(fn(&Attributes) -> bool),
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Condition(cond) => f.debug_tuple("Condition").field(cond).finish(),
            Predicate::Function(_) => f.write_str("Function(..)"),
        }
    }
}

// ============================================================================
// Policy
// ============================================================================

/// A named admission predicate.
#[derive(Debug, Clone)]
pub struct Policy {
    name: String,
    predicate: Predicate,
}

impl Policy {
    /// Creates a policy from a condition tree.
    pub fn new(name: impl Into<String>, condition: Condition) -> Self {
        Self {
            name: name.into(),
            predicate: Predicate::Condition(condition),
        }
    }

    /// Creates a policy backed by a pure function.
    pub fn from_fn(name: impl Into<String>, predicate: fn(&Attributes) -> bool) -> Self {
        Self {
            name: name.into(),
            predicate: Predicate::Function(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Returns `role = Admin`.
    pub fn admin_only() -> Self {
        Self::new(names::ADMIN_ONLY, Condition::RoleEquals(Role::Admin))
    }

    /// Returns `department = HR`.
    pub fn hr_department() -> Self {
        Self::new(names::HR_DEPARTMENT, Condition::department("HR"))
    }

    /// Returns `department = Finance and role = Manager and seniority >= 5`.
    pub fn finance_manager() -> Self {
        Self::new(
            names::FINANCE_MANAGER,
            Condition::And(vec![
                Condition::department("Finance"),
                Condition::RoleEquals(Role::Manager),
                Condition::SeniorityAtLeast(5),
            ]),
        )
    }

    /// Returns `department = IT and clearance >= 2`.
    pub fn it_clearance_2() -> Self {
        Self::new(
            names::IT_CLEARANCE_2,
            Condition::And(vec![
                Condition::department("IT"),
                Condition::ClearanceAtLeast(2),
            ]),
        )
    }

    /// Returns `department = Legal and role = Director and clearance = 3`.
    pub fn legal_director() -> Self {
        Self::new(
            names::LEGAL_DIRECTOR,
            Condition::And(vec![
                Condition::department("Legal"),
                Condition::RoleEquals(Role::Director),
                Condition::ClearanceEquals(3),
            ]),
        )
    }

    /// Returns `department = Operations and role = Staff and clearance = 1 and seniority < 3`.
    pub fn ops_combined() -> Self {
        Self::new(
            names::OPS_COMBINED,
            Condition::And(vec![
                Condition::department("Operations"),
                Condition::RoleEquals(Role::Staff),
                Condition::ClearanceEquals(1),
                Condition::SeniorityBelow(3),
            ]),
        )
    }

    /// Returns `(role = Manager or role = Director) and clearance = 3 and seniority >= 7`.
    pub fn exec_clearance_3() -> Self {
        Self::new(
            names::EXEC_CLEARANCE_3,
            Condition::And(vec![
                Condition::Or(vec![
                    Condition::RoleEquals(Role::Manager),
                    Condition::RoleEquals(Role::Director),
                ]),
                Condition::ClearanceEquals(3),
                Condition::SeniorityAtLeast(7),
            ]),
        )
    }

    /// All seven standard policies.
    pub fn standard() -> Vec<Self> {
        vec![
            Self::admin_only(),
            Self::hr_department(),
            Self::finance_manager(),
            Self::it_clearance_2(),
            Self::legal_director(),
            Self::ops_combined(),
            Self::exec_clearance_3(),
        ]
    }
}

/// Names of the standard policies.
pub mod names {
    pub const ADMIN_ONLY: &str = "adminOnly";
    pub const HR_DEPARTMENT: &str = "hrDepartment";
    pub const FINANCE_MANAGER: &str = "financeManager";
    pub const IT_CLEARANCE_2: &str = "itClearance2";
    pub const LEGAL_DIRECTOR: &str = "legalDirector";
    pub const OPS_COMBINED: &str = "opsCombined";
    pub const EXEC_CLEARANCE_3: &str = "execClearance3";
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_effect_is_deny() {
        assert_eq!(Effect::default(), Effect::Deny);
    }

    #[test]
    fn test_standard_policy_names_are_unique() {
        let policies = Policy::standard();
        let mut names: Vec<&str> = policies.iter().map(Policy::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn test_exec_clearance_display() {
        let Predicate::Condition(cond) = Policy::exec_clearance_3().predicate().clone() else {
            panic!("standard policies are condition-based");
        };
        assert_eq!(
            cond.to_string(),
            "((role = Manager or role = Director) and clearance = 3 and seniority >= 7)"
        );
    }

    #[test]
    fn test_empty_combinators_display() {
        assert_eq!(Condition::And(vec![]).to_string(), "true");
        assert_eq!(Condition::Or(vec![]).to_string(), "false");
    }

    #[test]
    fn test_condition_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            condition: Condition,
        }

        let text = r#"
[condition]
and = [
    { department_equals = "Sales" },
    { role_in = ["manager", "Director"] },
    { not = { seniority_below = 2 } },
]
"#;
        let parsed: Wrapper = toml::from_str(text).expect("parse condition");
        assert_eq!(
            parsed.condition,
            Condition::And(vec![
                Condition::department("Sales"),
                Condition::RoleIn(vec![Role::Manager, Role::Director]),
                Condition::negate(Condition::SeniorityBelow(2)),
            ])
        );
    }

    #[test]
    fn test_condition_serialization_roundtrip() {
        let condition = Condition::Or(vec![
            Condition::RoleEquals(Role::Admin),
            Condition::negate(Condition::ClearanceAtLeast(2)),
        ]);

        let json = serde_json::to_string(&condition).expect("serialize condition");
        let deserialized: Condition = serde_json::from_str(&json).expect("deserialize condition");
        assert_eq!(condition, deserialized);
    }
}
