//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::profile::{CoaConfig, DilutionConfig, PaginationConfig, PrintConfig};
use coa_numeric::Thresholds;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest image wait the print surface will accept.
pub const MAX_IMAGE_WAIT_MS: u64 = 60_000;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a configuration semantically.
pub fn validate_config(config: &CoaConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if config.lab.name.trim().is_empty() {
        return Err(ValidationError::MissingField("lab.name".to_string()));
    }

    validate_pagination(&config.pagination)?;
    validate_thresholds(&config.thresholds)?;
    validate_dilution(&config.dilution)?;
    validate_print(&config.print)?;

    Ok(())
}

fn validate_pagination(pagination: &PaginationConfig) -> ValidationResult<()> {
    let disease = &pagination.disease;
    if disease.rows_per_page == 0 {
        return Err(ValidationError::InvalidValue {
            field: "pagination.disease.rows_per_page".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    // The QC footer is the larger one, so it bounds both profiles.
    let footer = disease.footer_rows(true);
    if footer >= disease.rows_per_page {
        return Err(ValidationError::SemanticError(format!(
            "Footer rows ({}) leave no room for results on a final page of {} rows",
            footer, disease.rows_per_page
        )));
    }

    let ast = &pagination.ast;
    validate_capacity("pagination.ast", ast.rows_per_page, ast.rows_on_last_page)
}

fn validate_capacity(field: &str, rows_per_page: usize, rows_on_last_page: usize) -> ValidationResult<()> {
    if rows_per_page == 0 {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.rows_per_page", field),
            message: "Must be at least 1".to_string(),
        });
    }

    if rows_on_last_page == 0 || rows_on_last_page > rows_per_page {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.rows_on_last_page", field),
            message: format!(
                "Must be in [1, {}], got {}",
                rows_per_page, rows_on_last_page
            ),
        });
    }

    Ok(())
}

fn validate_thresholds(thresholds: &Thresholds) -> ValidationResult<()> {
    let limits = [
        ("thresholds.total_count_feed", thresholds.total_count_feed),
        ("thresholds.total_count_other", thresholds.total_count_other),
        ("thresholds.water_primary", thresholds.water_primary),
        ("thresholds.water_secondary", thresholds.water_secondary),
    ];
    for (field, value) in limits {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                message: format!("Must be a non-negative number, got {}", value),
            });
        }
    }
    Ok(())
}

fn validate_dilution(dilution: &DilutionConfig) -> ValidationResult<()> {
    let factors = [
        ("dilution.total_count_factor", dilution.total_count_factor),
        ("dilution.water_factor", dilution.water_factor),
        ("dilution.water_volume", dilution.water_volume),
    ];
    for (field, value) in factors {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                message: format!("Must be positive, got {}", value),
            });
        }
    }
    Ok(())
}

fn validate_print(print: &PrintConfig) -> ValidationResult<()> {
    if print.image_wait_timeout_ms > MAX_IMAGE_WAIT_MS {
        return Err(ValidationError::InvalidValue {
            field: "print.image_wait_timeout_ms".to_string(),
            message: format!(
                "Must be at most {} ms, got {}",
                MAX_IMAGE_WAIT_MS, print.image_wait_timeout_ms
            ),
        });
    }
    Ok(())
}
