//! Crate-level error type

use thiserror::Error;

use crate::registry::RegistryError;

/// Errors that can occur in this crate
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to bind or serve
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Registry operation failed
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
