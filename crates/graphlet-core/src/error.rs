//! Error types for Graphlet Core

use thiserror::Error;

/// Result type alias using Graphlet's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Graphlet error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required field is missing, empty or of the wrong kind
    #[error("{0}")]
    Validation(String),

    /// An identifier could not be parsed
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
