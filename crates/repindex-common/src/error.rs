//! Error types for repindex

use thiserror::Error;

/// The main error type for repindex operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required input is missing, empty where non-empty is required,
    /// self-referential, or otherwise malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The call does not apply to this kind of object or context.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    // Parser errors
    #[error("Parse error: {0}")]
    Parse(String),

    // Catalog errors
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table already exists: {0}")]
    TableAlreadyExists(String),
}

impl Error {
    /// Shorthand for a missing required argument.
    pub fn required(name: &str) -> Self {
        Error::InvalidArgument(format!("{} is required", name))
    }
}

/// Result type alias using repindex's Error
pub type Result<T> = std::result::Result<T, Error>;
