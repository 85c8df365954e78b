//! Error handling for Recomb
//!
//! Shape violations in the comparator are hard errors and must reach the
//! caller. Numeric hazards (unbounded IIR growth, quantization overflow)
//! are documented behavior of the filters/quantizer, not error variants.

use thiserror::Error;

/// Result type alias for Recomb operations
pub type Result<T> = std::result::Result<T, RecombError>;

/// Main error type for Recomb operations
#[derive(Error, Debug)]
pub enum RecombError {
    // Comparison Errors
    #[error("Shape mismatch: {field} differs between inputs ({left} vs {right})")]
    ShapeMismatch {
        field: &'static str,
        left: usize,
        right: usize,
    },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RecombError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            RecombError::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            RecombError::FileNotFound { .. } => "FILE_NOT_FOUND",
            RecombError::InvalidAudio { .. } => "INVALID_AUDIO",
            RecombError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            RecombError::EmptyAudio => "EMPTY_AUDIO",
            RecombError::Io(_) => "IO_ERROR",
            RecombError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}
