//! Configuration types.
//!
//! Every field has a serde default, so a config file only needs the values it
//! overrides. An empty JSON object is a complete configuration.

use coa_numeric::Thresholds;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::{ValidationError, ValidationResult};

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoaConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    #[serde(default)]
    pub lab: LabProfile,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub dilution: DilutionConfig,

    #[serde(default)]
    pub print: PrintConfig,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

impl Default for CoaConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            lab: LabProfile::default(),
            pagination: PaginationConfig::default(),
            thresholds: Thresholds::default(),
            dilution: DilutionConfig::default(),
            print: PrintConfig::default(),
        }
    }
}

impl CoaConfig {
    /// Load a config file. `.toml` files are read as TOML, everything else as JSON.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Parse a config from a TOML string.
    pub fn from_toml_str(text: &str) -> ValidationResult<Self> {
        toml::from_str(text).map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e)))
    }
}

/// Laboratory identity printed in every page header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabProfile {
    #[serde(default = "default_lab_name")]
    pub name: String,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub accreditation: Option<String>,

    #[serde(default)]
    pub contact: Option<String>,

    #[serde(default = "default_report_title")]
    pub report_title: String,

    #[serde(default = "default_ast_title")]
    pub ast_title: String,

    /// Legal boilerplate printed on every section's final page.
    #[serde(default = "default_legal_warning")]
    pub legal_warning: Vec<String>,

    #[serde(default = "default_confidentiality_notice")]
    pub confidentiality_notice: String,
}

fn default_lab_name() -> String {
    "Microbiology Laboratory".to_string()
}

fn default_report_title() -> String {
    "Certificate of Analysis".to_string()
}

fn default_ast_title() -> String {
    "Antimicrobial Susceptibility Test Report".to_string()
}

fn default_legal_warning() -> Vec<String> {
    vec![
        "Results relate only to the items tested as received.".to_string(),
        "This certificate shall not be reproduced except in full without written approval of the laboratory.".to_string(),
    ]
}

fn default_confidentiality_notice() -> String {
    "CONFIDENTIAL: intended solely for the named client.".to_string()
}

impl Default for LabProfile {
    fn default() -> Self {
        Self {
            name: default_lab_name(),
            address: None,
            accreditation: None,
            contact: None,
            report_title: default_report_title(),
            ast_title: default_ast_title(),
            legal_warning: default_legal_warning(),
            confidentiality_notice: default_confidentiality_notice(),
        }
    }
}

/// Pagination constants for disease sections and the AST section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default)]
    pub disease: DiseasePagination,

    #[serde(default)]
    pub ast: AstPagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseasePagination {
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,

    #[serde(default)]
    pub footer: FooterRows,
}

fn default_rows_per_page() -> usize {
    45
}

impl Default for DiseasePagination {
    fn default() -> Self {
        Self {
            rows_per_page: default_rows_per_page(),
            footer: FooterRows::default(),
        }
    }
}

impl DiseasePagination {
    /// Footer rows reserved on a section's final page.
    pub fn footer_rows(&self, has_qc_table: bool) -> usize {
        self.footer.total(has_qc_table)
    }

    /// Rows that fit on a section's final page. Saturates at zero.
    pub fn rows_on_last_page(&self, has_qc_table: bool) -> usize {
        self.rows_per_page.saturating_sub(self.footer_rows(has_qc_table))
    }
}

/// Row budget of the final-page footer blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterRows {
    #[serde(default = "default_totals_rows")]
    pub totals: usize,
    #[serde(default = "default_qc_table_rows")]
    pub qc_table: usize,
    #[serde(default = "default_signature_rows")]
    pub signatures: usize,
    #[serde(default = "default_legal_warning_rows")]
    pub legal_warning: usize,
    #[serde(default = "default_margin_rows")]
    pub margin: usize,
}

fn default_totals_rows() -> usize {
    1
}

fn default_qc_table_rows() -> usize {
    8
}

fn default_signature_rows() -> usize {
    6
}

fn default_legal_warning_rows() -> usize {
    3
}

fn default_margin_rows() -> usize {
    1
}

impl Default for FooterRows {
    fn default() -> Self {
        Self {
            totals: default_totals_rows(),
            qc_table: default_qc_table_rows(),
            signatures: default_signature_rows(),
            legal_warning: default_legal_warning_rows(),
            margin: default_margin_rows(),
        }
    }
}

impl FooterRows {
    pub fn total(&self, has_qc_table: bool) -> usize {
        let qc = if has_qc_table { self.qc_table } else { 0 };
        self.totals + qc + self.signatures + self.legal_warning + self.margin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstPagination {
    #[serde(default = "default_ast_rows_per_page")]
    pub rows_per_page: usize,

    #[serde(default = "default_ast_rows_on_last_page")]
    pub rows_on_last_page: usize,
}

fn default_ast_rows_per_page() -> usize {
    25
}

fn default_ast_rows_on_last_page() -> usize {
    18
}

impl Default for AstPagination {
    fn default() -> Self {
        Self {
            rows_per_page: default_ast_rows_per_page(),
            rows_on_last_page: default_ast_rows_on_last_page(),
        }
    }
}

/// Dilution constants of the composite count sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilutionConfig {
    /// Divisor applied to the sum of duplicate total-count plates.
    #[serde(default = "default_total_count_factor")]
    pub total_count_factor: f64,

    /// Multiplier applied to water readings.
    #[serde(default = "default_water_factor")]
    pub water_factor: f64,

    /// Sample volume multiplier applied to water readings.
    #[serde(default = "default_water_volume")]
    pub water_volume: f64,
}

fn default_total_count_factor() -> f64 {
    2.0
}

fn default_water_factor() -> f64 {
    1.0
}

fn default_water_volume() -> f64 {
    1.0
}

impl Default for DilutionConfig {
    fn default() -> Self {
        Self {
            total_count_factor: default_total_count_factor(),
            water_factor: default_water_factor(),
            water_volume: default_water_volume(),
        }
    }
}

/// Print-surface behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintConfig {
    /// Upper bound on waiting for embedded images before printing.
    #[serde(default = "default_image_wait_timeout_ms")]
    pub image_wait_timeout_ms: u64,

    /// Embed a script that prints once images settle when the document is opened.
    #[serde(default)]
    pub auto_print: bool,
}

fn default_image_wait_timeout_ms() -> u64 {
    3000
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            image_wait_timeout_ms: default_image_wait_timeout_ms(),
            auto_print: false,
        }
    }
}
