//! Error types for document assembly and export.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while assembling, serializing or printing a COA.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Snapshot or image input error.
    #[error(transparent)]
    Input(#[from] coa_common::Error),

    /// Invalid engine configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] coa_config::ValidationError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The print surface rejected the document or the print call.
    #[error("print surface error: {0}")]
    Surface(String),
}

impl ReportError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ReportError::Input(e) => e.code(),
            ReportError::Config(e) => e.code(),
            ReportError::JsonError(_) => 61,
            ReportError::IoError(_) => 60,
            ReportError::Surface(_) => 40,
        }
    }
}
