//! Unit and sample identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sub-sample identifier within a unit; the row key of a results table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleIndex(pub String);

impl SampleIndex {
    pub fn new(index: impl Into<String>) -> Self {
        SampleIndex(index.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SampleIndex {
    fn from(index: &str) -> Self {
        SampleIndex(index.to_string())
    }
}

impl From<String> for SampleIndex {
    fn from(index: String) -> Self {
        SampleIndex(index)
    }
}

/// Unit code assigned at registration.
///
/// Format: `<department code>[digits]-<sequence>`
/// Example: `MIC-42`, `MB25-108`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitCode(pub String);

impl UnitCode {
    pub fn new(code: impl Into<String>) -> Self {
        UnitCode(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing sequence number (`MIC-42` → `42`), if the code is well-formed.
    pub fn sequence_number(&self) -> Option<&str> {
        crate::report_number::unit_sequence_number(&self.0)
    }
}

impl fmt::Display for UnitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UnitCode {
    fn from(code: &str) -> Self {
        UnitCode(code.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_index_display_and_order() {
        let mut indexes = vec![SampleIndex::from("2"), SampleIndex::from("10"), SampleIndex::from("1")];
        indexes.sort();
        assert_eq!(indexes[0].to_string(), "1");
        assert_eq!(indexes[1].as_str(), "10");
    }

    #[test]
    fn test_sample_index_serde_transparent() {
        let json = serde_json::to_string(&SampleIndex::from("A3")).unwrap();
        assert_eq!(json, "\"A3\"");
    }

    #[test]
    fn test_unit_code_sequence() {
        assert_eq!(UnitCode::from("MIC-42").sequence_number(), Some("42"));
        assert_eq!(UnitCode::from("MB25-108").sequence_number(), Some("108"));
        assert_eq!(UnitCode::from("free text").sequence_number(), None);
    }
}
