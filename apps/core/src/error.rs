use std::io;
use thiserror::Error;

/// Crate-wide error type, consolidating every failure the engine surfaces into a single enum.
///
/// Classification itself never fails; these errors come from loading and validating
/// configuration, or from reading and writing batch data outside the engine.
#[derive(Debug, Error)]
pub enum AppError {
    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Represents malformed JSON input or configuration documents.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Represents data validation errors (e.g., a post with blank text).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration errors (e.g., empty taxonomy, duplicate category).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl AppError {
    /// Shorthand for building a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }
}
