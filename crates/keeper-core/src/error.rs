//! Error types for the CourseKeeper pipeline.

use thiserror::Error;

/// Result type alias using the pipeline's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for pipeline operations.
///
/// Generation-layer failures (`Inference`, `Serialization`, `Request`) are
/// recovered inside the classifier and composer via deterministic fallback;
/// they only reach callers of the raw backend traits. `Cancelled` is the one
/// error the pipeline propagates instead of swallowing.
#[derive(Error, Debug)]
pub enum Error {
    /// Inference/generation failed (timeout, provider error, bad status)
    #[error("Inference error: {0}")]
    Inference(String),

    /// Model output did not parse as the declared schema
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation aborted by a caller-supplied cancellation signal
    #[error("Operation cancelled")]
    Cancelled,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
