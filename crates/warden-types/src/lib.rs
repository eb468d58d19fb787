//! # warden-types: Core types for `Warden`
//!
//! This crate contains the shared vocabulary of the access layer:
//! - Identity ([`Identity`])
//! - Principal attributes ([`Department`], [`Role`], [`Clearance`], [`Attributes`])
//! - The authenticated principal ([`Principal`])
//! - Bearer session handles ([`SessionHandle`])
//!
//! Every type here is immutable once constructed. Principals are loaded from
//! the credential store at startup and handed out by value; nothing in the
//! session layer mutates them.

use std::fmt::{Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod handle;

pub use handle::{SESSION_HANDLE_LENGTH, SessionHandle};

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while parsing attribute values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// The role name does not name one of the known roles.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// Clearance must be between 1 and 3 inclusive.
    #[error("clearance must be 1..=3, got {0}")]
    InvalidClearance(u8),

    /// A presented session handle is not 64 hex characters.
    #[error("malformed session handle")]
    MalformedHandle,
}

// ============================================================================
// Identity
// ============================================================================

/// The login name a credential is registered under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// ============================================================================
// Department
// ============================================================================

/// Organisational department a principal belongs to.
///
/// Departments are data, not code: the set is open and comparisons are exact
/// (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Department(String);

impl Department {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Department {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// Role
// ============================================================================

/// Position of a principal within the organisation.
///
/// Roles are a closed set. They carry no privileges on their own; policies
/// decide what each role may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Individual contributor.
    Staff,
    /// Line manager.
    Manager,
    /// Department head.
    Director,
    /// System administrator.
    Admin,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 4] = [Role::Staff, Role::Manager, Role::Director, Role::Admin];

    /// Canonical name, as written in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Staff => "Staff",
            Role::Manager => "Manager",
            Role::Director => "Director",
            Role::Admin => "Admin",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypesError;

    /// Parses a role name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypesError::InvalidRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

// ============================================================================
// Clearance
// ============================================================================

/// Security clearance level, 1 (lowest) to 3 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Clearance(u8);

impl Clearance {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    /// Creates a clearance, rejecting values outside `1..=3`.
    pub fn new(level: u8) -> Result<Self, TypesError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(TypesError::InvalidClearance(level))
        }
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl Display for Clearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Clearance {
    type Error = TypesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Clearance> for u8 {
    fn from(clearance: Clearance) -> Self {
        clearance.0
    }
}

// ============================================================================
// Attributes & Principal
// ============================================================================

/// The authorization-relevant attribute set of a principal.
///
/// Policies see only this struct, so two principals with equal attributes
/// always receive equal decisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    pub department: Department,
    pub role: Role,
    pub clearance: Clearance,
    /// Years of service.
    pub seniority: u32,
}

impl Attributes {
    pub fn new(department: impl Into<Department>, role: Role, clearance: Clearance, seniority: u32) -> Self {
        Self {
            department: department.into(),
            role,
            clearance,
            seniority,
        }
    }
}

/// An authenticated identity together with its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    identity: Identity,
    attributes: Attributes,
}

impl Principal {
    pub fn new(identity: impl Into<Identity>, attributes: Attributes) -> Self {
        Self {
            identity: identity.into(),
            attributes,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn department(&self) -> &Department {
        &self.attributes.department
    }

    pub fn role(&self) -> Role {
        self.attributes.role
    }

    pub fn clearance(&self) -> Clearance {
        self.attributes.clearance
    }

    pub fn seniority(&self) -> u32 {
        self.attributes.seniority
    }
}

// ============================================================================
// Tests
// ============================================================================
