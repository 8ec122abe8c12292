//! Error types for casework-core

use thiserror::Error;

use crate::{
    config::ConfigError, identifiers::IdentifierError, identifiers::PatientId,
    repository::RepositoryError, validation::ValidationErrors,
};

/// Core error type for casework operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed identifier or short code
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Record failed validation and was not saved
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Storage or change-tracking failure
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Record could not be converted for change tracking
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A patient was supplied for a case it does not own
    #[error("case belongs to patient {expected}, not {actual}")]
    PatientMismatch {
        expected: PatientId,
        actual: PatientId,
    },
}

/// Result type alias for casework-core operations
pub type Result<T> = std::result::Result<T, Error>;
