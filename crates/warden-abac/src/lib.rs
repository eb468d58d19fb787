//! # warden-abac: Attribute-Based Access Policies
//!
//! Named, pure predicates over a principal's attributes, plus the registry
//! that resolves policy names at startup.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  PolicyRegistry                              │
//! │  name ──► Policy (Condition tree | fn)       │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Evaluator                                   │
//! │  ├─ Match conditions against attributes      │
//! │  └─ Short-circuit left to right              │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Decision                                    │
//! │  - Effect (Allow/Deny)                       │
//! │  - Policy name                               │
//! │  - Human-readable reason                     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Standard Policies
//!
//! | name | predicate |
//! |---|---|
//! | adminOnly | role = Admin |
//! | hrDepartment | department = HR |
//! | financeManager | department = Finance ∧ role = Manager ∧ seniority ≥ 5 |
//! | itClearance2 | department = IT ∧ clearance ≥ 2 |
//! | legalDirector | department = Legal ∧ role = Director ∧ clearance = 3 |
//! | opsCombined | department = Operations ∧ role = Staff ∧ clearance = 1 ∧ seniority < 3 |
//! | execClearance3 | (role = Manager ∨ role = Director) ∧ clearance = 3 ∧ seniority ≥ 7 |
//!
//! ## Examples
//!
//! ```
//! use warden_abac::{PolicyRegistry, evaluate};
//! use warden_types::{Attributes, Clearance, Role};
//!
//! let registry = PolicyRegistry::standard();
//! let admin = Attributes::new("HR", Role::Admin, Clearance::new(3).unwrap(), 5);
//!
//! let decision = evaluate(registry.get("adminOnly").unwrap(), &admin);
//! assert!(decision.is_allowed());
//! ```

pub mod evaluator;
pub mod policy;
pub mod registry;

pub use evaluator::{Decision, evaluate};
pub use policy::{Condition, Effect as PolicyEffect, Policy, Predicate, names};
pub use registry::{PolicyRegistry, RegistryError};
