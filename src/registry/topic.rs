//! Topic and message types
//!
//! This module defines the key type identifying a topic and the payload
//! carried through a topic queue.

use bytes::Bytes;

use super::error::RegistryError;

/// Name of a topic
///
/// Case-sensitive and never normalized. Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicName(String);

impl TopicName {
    /// Create a topic name, rejecting the empty string
    pub fn new(name: impl Into<String>) -> Result<Self, RegistryError> {
        let name = name.into();
        if name.is_empty() {
            return Err(RegistryError::InvalidRequest("empty topic name".into()));
        }
        Ok(Self(name))
    }

    /// Get the name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TopicName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TopicName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A message payload
///
/// Cheap to clone and to hand to a response body due to `Bytes` reference
/// counting. Always non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(Bytes);

impl Message {
    /// Create a message, rejecting an empty payload
    pub fn new(payload: impl Into<String>) -> Result<Self, RegistryError> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(RegistryError::InvalidRequest("empty message".into()));
        }
        Ok(Self(Bytes::from(payload)))
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed message
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the payload as text
    pub fn as_str(&self) -> &str {
        // Only ever built from a `String`
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Consume the message, returning the raw payload
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
