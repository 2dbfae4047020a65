//! COA synthesis common types, data model and errors.
//!
//! This crate provides the foundational types shared across the COA crates:
//! - The frozen snapshot model (units, disease sections, measurements, AST)
//! - Disease categories and report-number derivation
//! - Hidden-index change tracking
//! - Common error types
//! - Output format definitions

pub mod category;
pub mod error;
pub mod hidden;
pub mod id;
pub mod model;
pub mod output;
pub mod report_number;

pub use category::DiseaseCategory;
pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use hidden::{diff_hidden_indexes, HiddenIndexChange, HiddenIndexMap, Visibility};
pub use id::{SampleIndex, UnitCode};
pub use model::{
    Analyte, AnalyteReading, AstPanel, AstRow, Breakpoints, CoaSnapshot, CoaStatus,
    DiseaseSection, ImageData, Interpretation, Measurement, SampleContext, Signatory,
    SignatoryRole, TestUnit,
};
pub use output::OutputFormat;
pub use report_number::{derive_ast_report_number, derive_report_number, year_token, AST_PREFIX};

/// Snapshot schema version.
pub const SCHEMA_VERSION: &str = "1.0.0";
