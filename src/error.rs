//! Error types for the Forensizer analyzer.
//!
//! Structured error types built with thiserror. Hashing faults never reach
//! this type (the hasher always resolves to a digest), and remote faults are
//! converted to benign fallbacks at the remote boundary; what remains here are
//! input validation errors and unexpected pipeline faults.

use crate::io::error::IoError;
use thiserror::Error;

/// Main error type for Forensizer operations.
#[derive(Debug, Error)]
pub enum ForensizerError {
    /// A required request field was missing or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// No file was supplied for analysis
    #[error("No file selected for analysis")]
    MissingFile,

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Bounded file reading errors
    #[error("File read error: {0}")]
    FileRead(#[from] IoError),

    /// File I/O errors outside the bounded reader
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Remote endpoint errors (submission or lookup)
    #[error("Remote error: {0}")]
    Remote(String),

    /// Operation timeout
    #[error("Operation timeout after {millis}ms")]
    Timeout { millis: u64 },

    /// Paid tier requested before a free analysis completed
    #[error("Please run the free analysis first")]
    NoCompletedAnalysis,

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ForensizerError {
    /// Whether this error belongs to the input-validation class, reported
    /// before any processing starts.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ForensizerError::MissingField(_)
                | ForensizerError::MissingFile
                | ForensizerError::InvalidInput(_)
        )
    }
}

impl From<serde_json::Error> for ForensizerError {
    fn from(err: serde_json::Error) -> Self {
        ForensizerError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for ForensizerError {
    fn from(err: reqwest::Error) -> Self {
        ForensizerError::Remote(err.to_string())
    }
}

/// Result type alias for Forensizer operations
pub type Result<T> = std::result::Result<T, ForensizerError>;
