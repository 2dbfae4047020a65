//! Error types for COA synthesis.
//!
//! Errors carry:
//! - Stable error codes for machine parsing
//! - Category classification for grouping
//! - Remediation hints for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Snapshot
//!   Reason: unit.diseases[0].name: missing field
//!   Fix: Export the unit again from the results screen, or run 'coa-core check --snapshot <file>'
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 10,
//!   "category": "input",
//!   "message": "invalid snapshot: missing field `unit_code`"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for COA operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Snapshot, image and signatory input errors.
    Input,
    /// Configuration errors.
    Config,
    /// Document layout and serialization errors.
    Render,
    /// Print-surface errors.
    Print,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Render => write!(f, "render"),
            ErrorCategory::Print => write!(f, "print"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for COA synthesis.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("invalid image data: {0}")]
    InvalidImage(String),

    #[error("unknown signatory role: {0}")]
    UnknownRole(String),

    #[error("disease '{disease}' is not registered on unit {unit_code}")]
    UnknownDisease { unit_code: String, disease: String },

    // Configuration errors (20-29)
    #[error("configuration error: {0}")]
    Config(String),

    // Render errors (30-39)
    #[error("render failed: {0}")]
    Render(String),

    // Print errors (40-49)
    #[error("print surface failed: {0}")]
    Print(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input errors
    /// - 20-29: Configuration errors
    /// - 30-39: Render errors
    /// - 40-49: Print errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidSnapshot(_) => 10,
            Error::InvalidImage(_) => 11,
            Error::UnknownRole(_) => 12,
            Error::UnknownDisease { .. } => 13,
            Error::Config(_) => 20,
            Error::Render(_) => 30,
            Error::Print(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidSnapshot(_)
            | Error::InvalidImage(_)
            | Error::UnknownRole(_)
            | Error::UnknownDisease { .. } => ErrorCategory::Input,
            Error::Config(_) => ErrorCategory::Config,
            Error::Render(_) => ErrorCategory::Render,
            Error::Print(_) => ErrorCategory::Print,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidSnapshot(_) => {
                "Export the unit again from the results screen, or run 'coa-core check --snapshot <file>'."
            }
            Error::InvalidImage(_) => {
                "Supply a PNG, JPEG, GIF, WebP or SVG file, or a well-formed base64 data URI."
            }
            Error::UnknownRole(_) => {
                "Use one of: tested-by, reviewed-by, lab-supervisor, lab-manager."
            }
            Error::UnknownDisease { .. } => {
                "Check the disease name against the unit's registered disease list."
            }
            Error::Config(_) => "Run 'coa-core check' to validate configuration.",
            Error::Render(_) => "Report the snapshot that triggered this as a bug.",
            Error::Print(_) => "Check that the output location is writable and retry the export.",
            Error::Io(_) => "Check file paths, permissions and free disk space.",
            Error::Json(_) => "Invalid JSON in file. Check syntax with 'jq . <file>'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InvalidSnapshot(_) => "Invalid Snapshot",
            Error::InvalidImage(_) => "Invalid Image",
            Error::UnknownRole(_) => "Unknown Signatory Role",
            Error::UnknownDisease { .. } => "Unknown Disease",
            Error::Config(_) => "Configuration Error",
            Error::Render(_) => "Render Error",
            Error::Print(_) => "Print Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }

    /// Format for terminal output: headline, reason and fix.
    pub fn to_human(&self) -> String {
        format!(
            "✗ {}\n  Reason: {}\n  Fix: {}",
            self.headline(),
            self,
            self.remediation()
        )
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Remediation hint.
    pub remediation: String,

    /// Additional structured context.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        if let Error::UnknownDisease { unit_code, disease } = err {
            context.insert("unit_code".to_string(), serde_json::json!(unit_code));
            context.insert("disease".to_string(), serde_json::json!(disease));
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            remediation: err.remediation().to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_grouped() {
        assert_eq!(Error::InvalidSnapshot("x".into()).code(), 10);
        assert_eq!(Error::Config("x".into()).code(), 20);
        assert_eq!(Error::Print("x".into()).code(), 40);
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.code(), 60);
        assert_eq!(io.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_structured_error_context() {
        let err = Error::UnknownDisease {
            unit_code: "MIC-7".into(),
            disease: "Listeria".into(),
        };
        let structured = StructuredError::from(&err).with_context("page", 2);
        assert_eq!(structured.code, 13);
        assert_eq!(structured.category, ErrorCategory::Input);
        assert_eq!(structured.context["unit_code"], "MIC-7");
        assert_eq!(structured.context["page"], 2);
        assert!(structured.to_json().contains("\"category\":\"input\""));
    }

    #[test]
    fn test_human_output() {
        let human = Error::UnknownRole("janitor".into()).to_human();
        assert!(human.starts_with("✗ Unknown Signatory Role"));
        assert!(human.contains("Reason: unknown signatory role: janitor"));
        assert!(human.contains("Fix: "));
    }
}
