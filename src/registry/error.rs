//! Registry error types
//!
//! Error types for topic registry operations.

use thiserror::Error;

use super::topic::TopicName;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Empty topic name, empty message or a malformed timeout
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No message became available within the requested window
    #[error("No message on topic {0} within timeout")]
    Timeout(TopicName),

    /// Topic queue is full and the registry rejects rather than waits
    #[error("Topic at capacity: {0}")]
    CapacityExceeded(TopicName),
}
