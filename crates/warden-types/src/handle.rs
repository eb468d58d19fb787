//! Opaque bearer handles binding a client to a server-side session.

use std::fmt::{Debug, Display};
use std::str::FromStr;

use crate::TypesError;

/// Length of session handles in bytes (256 bits).
pub const SESSION_HANDLE_LENGTH: usize = 32;

/// Unguessable handle for a server-side session.
///
/// A handle is a bearer credential: whoever presents it acts as the bound
/// principal. It is rendered as 64 lowercase hex characters for transport
/// (e.g. a cookie value) and never shows up in `Debug` output.
///
/// # FCIS Pattern
///
/// - `from_bytes()`: Pure restoration (tests, wire decoding)
/// - `from_random_bytes()`: Pure construction from bytes (`pub(crate)`)
/// - `generate()`: Impure shell that invokes the OS CSPRNG
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle([u8; SESSION_HANDLE_LENGTH]);

impl SessionHandle {
    // ========================================================================
    // Functional Core (pure, testable)
    // ========================================================================

    pub(crate) fn from_random_bytes(bytes: [u8; SESSION_HANDLE_LENGTH]) -> Self {
        debug_assert!(
            bytes.iter().any(|&b| b != 0),
            "session handle bytes are all zeros"
        );
        Self(bytes)
    }

    /// Restoration from raw bytes.
    pub fn from_bytes(bytes: [u8; SESSION_HANDLE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the handle as a byte array.
    pub fn as_bytes(&self) -> &[u8; SESSION_HANDLE_LENGTH] {
        &self.0
    }

    // ========================================================================
    // Imperative Shell (IO boundary)
    // ========================================================================

    /// Generates a new handle from the OS CSPRNG.
    ///
    /// # Panics
    ///
    /// Panics if the OS CSPRNG fails, which indicates a catastrophic
    /// system error (e.g., no entropy source available).
    pub fn generate() -> Self {
        let mut bytes = [0u8; SESSION_HANDLE_LENGTH];
        getrandom::fill(&mut bytes).expect("CSPRNG failure is catastrophic");
        Self::from_random_bytes(bytes)
    }
}

impl Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionHandle(<redacted>)")
    }
}

impl Display for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for SessionHandle {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.as_bytes();
        if raw.len() != SESSION_HANDLE_LENGTH * 2 {
            return Err(TypesError::MalformedHandle);
        }

        let mut bytes = [0u8; SESSION_HANDLE_LENGTH];
        for (out, pair) in bytes.iter_mut().zip(raw.chunks_exact(2)) {
            let hi = hex_value(pair[0]).ok_or(TypesError::MalformedHandle)?;
            let lo = hex_value(pair[1]).ok_or(TypesError::MalformedHandle)?;
            *out = (hi << 4) | lo;
        }
        Ok(Self(bytes))
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl From<[u8; SESSION_HANDLE_LENGTH]> for SessionHandle {
    fn from(bytes: [u8; SESSION_HANDLE_LENGTH]) -> Self {
        Self::from_bytes(bytes)
    }
}
