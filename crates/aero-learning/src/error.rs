//! Error types for training and visualization.

use thiserror::Error;

/// The main error type for learning operations.
#[derive(Error, Debug)]
pub enum LearnError {
    /// An argument had the wrong shape or value (missing column,
    /// mismatched lengths, out-of-range configuration).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Training or plotting was asked to operate on data with no usable
    /// values.
    #[error("No usable data: {0}")]
    EmptyInput(String),

    /// Model fitting or prediction failed.
    #[error("Training failed: {0}")]
    TrainingFailed(String),

    /// Chart rendering failed.
    #[error("Rendering failed: {0}")]
    RenderFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl LearnError {
    /// Stable code identifying the error class.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::EmptyInput(_) => "EMPTY_INPUT",
            Self::TrainingFailed(_) => "TRAINING_FAILED",
            Self::RenderFailed(_) => "RENDER_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
        }
    }
}

/// Result type alias for learning operations.
pub type Result<T> = std::result::Result<T, LearnError>;
