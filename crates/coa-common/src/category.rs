//! Disease category taxonomy.
//!
//! Every disease section carries a [`DiseaseCategory`] tag. The tag is derived
//! from the free-text disease name exactly once, when a section enters the
//! system (see [`crate::model::DiseaseSection`]); rendering only ever matches
//! on the tag.
//!
//! Patterns are checked in order and the first match wins: water, culture,
//! fungi, salmonella, then counts. "Water Total Count" is a water section,
//! "Salmonella Culture" a culture section and "Fungi Count" a fungi section.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Disease categories that select a results-table schema and report prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseCategory {
    /// Total bacterial count with mould and pathogenic fungi columns.
    TotalCount,
    /// Water analysis: total bacterial count plus coliform, E. coli, Pseudomonas.
    Water,
    /// Salmonella detection with test portions.
    Salmonella,
    /// Culture and isolation.
    Culture,
    /// Fungi and mould isolation.
    Fungi,
    /// Anything else; rendered with the generic result/isolate/range schema.
    #[default]
    Other,
}

static CATEGORY_PATTERNS: Lazy<Vec<(DiseaseCategory, Regex)>> = Lazy::new(|| {
    let patterns = [
        (DiseaseCategory::Water, r"(?i)water"),
        (DiseaseCategory::Culture, r"(?i)culture|isolation"),
        (DiseaseCategory::Fungi, r"(?i)fung|mou?ld"),
        (DiseaseCategory::Salmonella, r"(?i)salmonella"),
        (DiseaseCategory::TotalCount, r"(?i)total\s*count|\bcount\b"),
    ];
    patterns
        .into_iter()
        .map(|(category, pattern)| (category, Regex::new(pattern).unwrap()))
        .collect()
});

impl DiseaseCategory {
    /// All categories in classification order.
    pub fn all() -> &'static [DiseaseCategory] {
        &[
            DiseaseCategory::Water,
            DiseaseCategory::Culture,
            DiseaseCategory::Fungi,
            DiseaseCategory::Salmonella,
            DiseaseCategory::TotalCount,
            DiseaseCategory::Other,
        ]
    }

    /// Classify a free-text disease name.
    pub fn classify(name: &str) -> Self {
        CATEGORY_PATTERNS
            .iter()
            .find(|(_, re)| re.is_match(name))
            .map(|(category, _)| *category)
            .unwrap_or(DiseaseCategory::Other)
    }

    /// Report-number prefix, if this category has one.
    pub fn report_prefix(&self) -> Option<&'static str> {
        match self {
            DiseaseCategory::TotalCount => Some("COUNT"),
            DiseaseCategory::Water => Some("WATER"),
            DiseaseCategory::Salmonella => Some("SALM"),
            DiseaseCategory::Culture => Some("CU"),
            DiseaseCategory::Fungi => Some("FUNGI"),
            DiseaseCategory::Other => None,
        }
    }

    /// Whether final pages carry the QC-reference table.
    pub fn has_qc_table(&self) -> bool {
        matches!(self, DiseaseCategory::TotalCount | DiseaseCategory::Water)
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            DiseaseCategory::TotalCount => "total_count",
            DiseaseCategory::Water => "water",
            DiseaseCategory::Salmonella => "salmonella",
            DiseaseCategory::Culture => "culture",
            DiseaseCategory::Fungi => "fungi",
            DiseaseCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for DiseaseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
