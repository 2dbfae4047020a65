//! CLI error type and its mapping onto exit codes.

use coa_common::{ErrorCategory, StructuredError};
use coa_config::ValidationError;
use coa_report::ReportError;
use thiserror::Error;

use crate::exit_codes::ExitCode;

pub type Result<T> = std::result::Result<T, CliError>;

/// Anything a command can fail with.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] coa_common::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("invalid argument: {0}")]
    Args(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Stable error code, shared with the library crates.
    pub fn code(&self) -> u32 {
        match self {
            CliError::Input(e) => e.code(),
            CliError::Config(e) => e.code(),
            CliError::Report(e) => e.code(),
            CliError::Args(_) => 10,
            CliError::Io(_) => 60,
            CliError::Json(_) => 61,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CliError::Input(e) => e.category(),
            CliError::Config(_) => ErrorCategory::Config,
            CliError::Report(ReportError::Input(e)) => e.category(),
            CliError::Report(ReportError::Config(_)) => ErrorCategory::Config,
            CliError::Report(ReportError::Surface(_)) => ErrorCategory::Print,
            CliError::Report(_) | CliError::Io(_) | CliError::Json(_) => ErrorCategory::Io,
            CliError::Args(_) => ErrorCategory::Input,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Args(_) => ExitCode::ArgsError,
            CliError::Config(ValidationError::VersionMismatch { .. })
            | CliError::Report(ReportError::Config(ValidationError::VersionMismatch { .. })) => {
                ExitCode::VersionError
            }
            CliError::Config(_) | CliError::Report(ReportError::Config(_)) => ExitCode::ConfigError,
            CliError::Input(coa_common::Error::Io(_))
            | CliError::Report(ReportError::Input(coa_common::Error::Io(_))) => ExitCode::IoError,
            CliError::Input(_) | CliError::Report(ReportError::Input(_)) => ExitCode::InputError,
            CliError::Report(ReportError::Surface(_)) => ExitCode::PrintError,
            CliError::Report(ReportError::IoError(_)) | CliError::Io(_) => ExitCode::IoError,
            CliError::Report(ReportError::JsonError(_)) | CliError::Json(_) => {
                ExitCode::InternalError
            }
        }
    }

    fn remediation(&self) -> String {
        match self {
            CliError::Input(e) | CliError::Report(ReportError::Input(e)) => {
                e.remediation().to_string()
            }
            CliError::Config(_) | CliError::Report(ReportError::Config(_)) => {
                "Run 'coa-core check' to validate configuration.".to_string()
            }
            CliError::Report(ReportError::Surface(_)) => {
                "Check that the output location is writable and retry the export.".to_string()
            }
            CliError::Args(_) => "See 'coa-core --help' for usage.".to_string(),
            _ => "Check file paths, permissions and free disk space.".to_string(),
        }
    }

    /// Terminal rendering: headline, reason and fix.
    pub fn to_human(&self) -> String {
        match self {
            CliError::Input(e) | CliError::Report(ReportError::Input(e)) => e.to_human(),
            _ => format!("✗ Error\n  Reason: {}\n  Fix: {}", self, self.remediation()),
        }
    }

    /// JSON rendering for `--format json`.
    pub fn to_structured(&self) -> StructuredError {
        StructuredError {
            code: self.code(),
            category: self.category(),
            message: self.to_string(),
            remediation: self.remediation(),
            context: Default::default(),
        }
        .with_context("exit_code", self.exit_code().code_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        let err = CliError::from(coa_common::Error::InvalidSnapshot("x".into()));
        assert_eq!(err.exit_code(), ExitCode::InputError);
        assert_eq!(err.code(), 10);

        let err = CliError::from(ValidationError::VersionMismatch {
            expected: "1.0.0".into(),
            actual: "0.9".into(),
        });
        assert_eq!(err.exit_code(), ExitCode::VersionError);

        let err = CliError::from(ValidationError::MissingField("lab.name".into()));
        assert_eq!(err.exit_code(), ExitCode::ConfigError);

        let err = CliError::from(ReportError::Surface("closed".into()));
        assert_eq!(err.exit_code(), ExitCode::PrintError);
        assert_eq!(err.category(), ErrorCategory::Print);
    }

    #[test]
    fn test_structured_carries_exit_code() {
        let err = CliError::Args("--output is required".into());
        let structured = err.to_structured();
        assert_eq!(structured.code, 10);
        assert_eq!(structured.context["exit_code"], "ERR_ARGS");
        assert!(err.to_human().contains("Reason: invalid argument: --output is required"));
    }

    #[test]
    fn test_input_errors_use_library_rendering() {
        let err = CliError::from(coa_common::Error::UnknownRole("janitor".into()));
        assert!(err.to_human().starts_with("✗ Unknown Signatory Role"));
    }
}
