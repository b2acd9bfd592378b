//! Error handling for the extraction pipeline.

pub mod util;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use std::io;

/// Specialized error type for code extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error building Arrow arrays or writing CSV
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error writing Parquet output
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error converting records to or from a serialized form
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A code that cannot be decomposed
    #[error("Invalid code: {0}")]
    InvalidCode(String),

    /// Invalid fixed-width column layout
    #[error("Layout error: {0}")]
    Layout(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<serde_arrow::Error> for ExtractError {
    fn from(error: serde_arrow::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;
