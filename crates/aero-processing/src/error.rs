//! Custom error types for the airport data preparation pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Errors are
//! serializable so they can be embedded in JSON pipeline results.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for data preparation operations.
#[derive(Error, Debug)]
pub enum PrepError {
    /// An argument had the wrong shape or value (bad source string, unknown
    /// strategy name, malformed table).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Source path or URL did not resolve to readable data.
    #[error("Source not found: {0}")]
    NotFound(String),

    /// Ingestion failed after the source was located; the underlying cause
    /// is preserved.
    #[error("Failed to load '{source_id}': {cause}")]
    LoadFailure {
        source_id: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// An operation that requires data was given a column or table with no
    /// usable values.
    #[error("No usable data: {0}")]
    EmptyInput(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PrepError>,
    },
}

impl PrepError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PrepError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable code identifying the error class, independent of the message.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::LoadFailure { .. } => "LOAD_FAILURE",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::EmptyInput(_) => "EMPTY_INPUT",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

/// Serialize implementation so errors can be embedded in JSON results.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for PrepError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PrepError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for data preparation operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PrepError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            PrepError::InvalidArgument("bad".to_string()).error_code(),
            "INVALID_ARGUMENT"
        );
        assert_eq!(
            PrepError::NotFound("missing.dat".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            PrepError::ColumnNotFound("iata".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_load_failure_preserves_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated stream");
        let err = PrepError::LoadFailure {
            source_id: "airports.dat".to_string(),
            cause: Box::new(cause),
        };
        assert!(err.to_string().contains("airports.dat"));
        assert!(err.to_string().contains("truncated stream"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_serialization() {
        let error = PrepError::ColumnNotFound("iata".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("iata"));
    }

    #[test]
    fn test_with_context() {
        let error = PrepError::ColumnNotFound("country".to_string())
            .with_context("While bucketing categories");
        assert!(error.to_string().contains("While bucketing categories"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND"); // Preserves original code
    }
}
