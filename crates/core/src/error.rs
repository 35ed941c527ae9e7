//! Error types for Recall.
//!
//! This module defines a unified error enum covering all fault classes in
//! the pipeline: request validation, retrieval, LLM generation,
//! configuration, I/O, and serialization.

use thiserror::Error;

/// Unified error type for Recall.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
///
/// Only `Validation` is expected to cross the pipeline boundary as an error:
/// an invalid request is a caller programming error. `Retrieval` and `Llm`
/// are operational faults that the owning components absorb into degraded
/// textual answers unless strict mode is enabled.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing request fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Failures reaching or parsing the search backend
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Failures reaching or parsing the model backend
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = AppError::Validation("question must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: question must not be empty"
        );
    }

    #[test]
    fn test_retrieval_error_display() {
        let err = AppError::Retrieval("connection refused".to_string());
        assert!(err.to_string().starts_with("Retrieval error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }
}
