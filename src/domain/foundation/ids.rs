//! Strongly-typed identifier value objects.
//!
//! Both identifiers are opaque tokens: the registry never interprets them,
//! it only requires that they are non-empty.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Logical actor a connection is attributed to (a user, a session owner, or
/// the connection itself when no identity scheme is wired in).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Creates a new Identity, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("identity"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(id: Identity) -> Self {
        id.0
    }
}

impl From<&ConnectionHandle> for Identity {
    /// A handle is always a valid identity: both are non-empty tokens.
    fn from(handle: &ConnectionHandle) -> Self {
        Self(handle.0.clone())
    }
}

/// Token for one physical transport connection.
///
/// Unique process-wide for the lifetime of that connection. Generated by the
/// transport listener when a socket is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectionHandle(String);

impl ConnectionHandle {
    /// Creates a handle from an existing token, returning error if empty.
    pub fn new(handle: impl Into<String>) -> Result<Self, ValidationError> {
        let handle = handle.into();
        if handle.is_empty() {
            return Err(ValidationError::empty_field("connection_handle"));
        }
        Ok(Self(handle))
    }

    /// Creates a fresh random handle.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ConnectionHandle {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConnectionHandle> for String {
    fn from(handle: ConnectionHandle) -> Self {
        handle.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_accepts_non_empty_string() {
        let id = Identity::new("alice").unwrap();
        assert_eq!(id.as_str(), "alice");
    }

    #[test]
    fn identity_rejects_empty_string() {
        let result = Identity::new("");
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "identity"),
            _ => panic!("Expected EmptyField error"),
        }
    }

    #[test]
    fn handle_rejects_empty_string() {
        let result = ConnectionHandle::new("");
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "connection_handle"),
            _ => panic!("Expected EmptyField error"),
        }
    }

    #[test]
    fn generated_handles_are_unique() {
        let a = ConnectionHandle::generate();
        let b = ConnectionHandle::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn identity_from_handle_keeps_token() {
        let handle = ConnectionHandle::new("h1").unwrap();
        let identity = Identity::from(&handle);
        assert_eq!(identity.as_str(), "h1");
    }

    #[test]
    fn identity_serializes_as_plain_string() {
        let id = Identity::new("alice").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""alice""#);
    }

    #[test]
    fn identity_deserialization_rejects_empty_string() {
        let result: Result<Identity, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
    }
}
