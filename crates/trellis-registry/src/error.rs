//! Error types for the registry.

use thiserror::Error;
use trellis_tree::TreeError;

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in registry operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Sponsor code does not resolve to a member
    #[error("Invalid sponsor code: {0}")]
    SponsorNotFound(String),

    /// Email already registered
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Spill chain ended without a free slot
    #[error("No available position: {0}")]
    PositionUnavailable(String),

    /// Lookup found no member
    #[error("Not found: {0}")]
    NotFound(String),

    /// Stored tree violates an invariant
    #[error("Corrupt member data: {0}")]
    Corrupt(String),

    /// Credential hashing failed
    #[error("Credential error: {0}")]
    Credential(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this is a fault of the node rather than of the request.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::Corrupt(_)
                | Error::Credential(_)
                | Error::Storage(_)
                | Error::Serialization(_)
                | Error::Io(_)
        )
    }
}

impl From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<TreeError> for Error {
    fn from(e: TreeError) -> Self {
        match e {
            TreeError::SponsorNotFound(code) => Error::SponsorNotFound(code.to_string()),
            e @ TreeError::PositionUnavailable { .. } => Error::PositionUnavailable(e.to_string()),
            e @ TreeError::InvalidSide(_) => Error::Validation(e.to_string()),
            TreeError::Corrupt(msg) => Error::Corrupt(msg),
        }
    }
}
