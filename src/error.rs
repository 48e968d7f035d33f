//! Error types for the encoding and prediction pipeline.

use std::fmt;

/// Error type for pipeline operations.
#[derive(Debug)]
pub enum PipelineError {
    /// The column schema established at training time is violated
    /// (missing required column, double fit, encoder/registry mismatch).
    Schema(String),
    /// A caller-supplied batch is missing required columns.
    /// Carries the explicit list of missing column names.
    MissingColumns(Vec<String>),
    /// A code could not be decoded back to a label (sentinel or unassigned).
    UnknownCode { column: String, code: i64 },
    /// Empty data provided where non-empty was required.
    EmptyData(String),
    /// Serialization or deserialization error.
    SerializationError(String),
    /// I/O error during file operations.
    IoError(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Schema(msg) => {
                write!(f, "Schema error: {}", msg)
            }
            PipelineError::MissingColumns(cols) => {
                write!(f, "Missing required columns: {}", cols.join(", "))
            }
            PipelineError::UnknownCode { column, code } => {
                write!(f, "Unknown code {} for column '{}'", code, column)
            }
            PipelineError::EmptyData(msg) => {
                write!(f, "Empty data: {}", msg)
            }
            PipelineError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            PipelineError::IoError(msg) => {
                write!(f, "I/O error: {}", msg)
            }
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PipelineError {
    fn from(err: bincode::Error) -> Self {
        PipelineError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::IoError(err.to_string())
    }
}
