//! Report-number derivation.
//!
//! A report number is `<Prefix><YY>-<Seq>`: the category prefix, the two-digit
//! year the sample was received, and the trailing sequence of the unit code.
//! `MIC-42` received in 2025 with a salmonella section becomes `SALM25-42`.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::category::DiseaseCategory;

/// Prefix used for the antimicrobial-susceptibility section.
pub const AST_PREFIX: &str = "AST";

static RE_UNIT_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+\d*-(\d+)$").unwrap());

/// Trailing sequence number of a unit code.
pub fn unit_sequence_number(unit_code: &str) -> Option<&str> {
    RE_UNIT_CODE
        .captures(unit_code.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Two-digit year token (`2025-03-14` → `"25"`).
pub fn year_token(date: NaiveDate) -> String {
    format!("{:02}", date.year().rem_euclid(100))
}

/// Compose a report number from a prefix, unit code and reference date.
///
/// Falls back to the raw unit code when the code carries no sequence number.
pub fn compose_report_number(prefix: &str, unit_code: &str, date: NaiveDate) -> String {
    match unit_sequence_number(unit_code) {
        Some(seq) => format!("{}{}-{}", prefix, year_token(date), seq),
        None => unit_code.to_string(),
    }
}

/// Report number for a disease section.
///
/// Categories without a prefix use the raw unit code.
pub fn derive_report_number(category: DiseaseCategory, unit_code: &str, date: NaiveDate) -> String {
    match category.report_prefix() {
        Some(prefix) => compose_report_number(prefix, unit_code, date),
        None => unit_code.to_string(),
    }
}

/// Report number for the AST section.
pub fn derive_ast_report_number(unit_code: &str, date: NaiveDate) -> String {
    compose_report_number(AST_PREFIX, unit_code, date)
}
