//! Error types for the Rehber library.
//!
//! All fallible operations return [`Result`], and every failure is
//! represented by the [`RehberError`] enum. A "no suitable answer" outcome
//! is *not* an error: it is a typed result of the answer gate (see
//! [`crate::answer::gate::GateOutcome`]), so callers can always tell a
//! confident refusal apart from a pipeline fault.

use std::io;

use thiserror::Error;

/// The main error type for Rehber operations.
#[derive(Error, Debug)]
pub enum RehberError {
    /// I/O errors surfaced by document-layer collaborators.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Text analysis errors (folding, tokenization).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Document ingestion errors (unreadable pages, malformed documents).
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Index construction or lookup errors.
    #[error("Index error: {0}")]
    Index(String),

    /// Query handling errors.
    #[error("Query error: {0}")]
    Query(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with RehberError.
pub type Result<T> = std::result::Result<T, RehberError>;

impl RehberError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        RehberError::Analysis(msg.into())
    }

    /// Create a new ingest error.
    pub fn ingest<S: Into<String>>(msg: S) -> Self {
        RehberError::Ingest(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        RehberError::Index(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        RehberError::Query(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        RehberError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        RehberError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = RehberError::index("Test index error");
        assert_eq!(error.to_string(), "Index error: Test index error");

        let error = RehberError::ingest("Test ingest error");
        assert_eq!(error.to_string(), "Ingest error: Test ingest error");

        let error = RehberError::invalid_config("missing weight");
        assert_eq!(
            error.to_string(),
            "Error: Invalid configuration: missing weight"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let rehber_error = RehberError::from(io_error);

        match rehber_error {
            RehberError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
