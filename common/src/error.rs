//! Error types shared by the bookstore crates.

use thiserror::Error;

/// Errors raised while building or validating shared values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookstoreError {
    /// Configuration value is missing or unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A field failed validation.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },
}

impl BookstoreError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            BookstoreError::Configuration(_) => "CONFIGURATION_ERROR",
            BookstoreError::Validation { .. } => "VALIDATION_ERROR",
        }
    }
}
