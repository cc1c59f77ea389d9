//! Error types for categorical encoding

use thiserror::Error;

/// Result type alias for encoding operations
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Encoder not fitted")]
    ModelNotFitted,

    #[error("Found unknown category '{value}' in column '{column}' during transform")]
    UnknownCategory { column: String, value: String },

    #[error("Null value in column '{column}' at row {row}")]
    NullCategory { column: String, row: usize },

    #[error("Column '{0}' has no values to fit on")]
    EmptyColumn(String),

    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<polars::error::PolarsError> for EncodeError {
    fn from(err: polars::error::PolarsError) -> Self {
        EncodeError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for EncodeError {
    fn from(err: serde_json::Error) -> Self {
        EncodeError::SerializationError(err.to_string())
    }
}
