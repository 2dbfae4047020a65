//! Pass/fail classification of lab results.
//!
//! Classification only drives cell styling; it never alters the stored value.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::parse::parse_numeric_value;

static RE_NO_GROWTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bno\b.*\bgrowth\b").unwrap());

/// Which threshold family a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Total bacterial / mould counts.
    TotalCount,
    /// Water total bacterial count.
    WaterPrimary,
    /// Water coliform, E. coli and Pseudomonas.
    WaterSecondary,
    /// Keyword-classified results (salmonella, culture, fungi, ...).
    Qualitative,
}

/// Outcome of classifying a single result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Pass,
    Fail,
    #[default]
    Neutral,
}

impl Classification {
    pub fn is_fail(self) -> bool {
        self == Classification::Fail
    }

    pub fn is_pass(self) -> bool {
        self == Classification::Pass
    }
}

/// Published limits per threshold family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Total count limit for feed samples (fail at or above).
    #[serde(default = "default_total_count_feed")]
    pub total_count_feed: f64,
    /// Total count limit for every other sample type (fail at or above).
    #[serde(default = "default_total_count_other")]
    pub total_count_other: f64,
    /// Water total bacterial count limit (fail above).
    #[serde(default = "default_water_primary")]
    pub water_primary: f64,
    /// Water coliform / E. coli / Pseudomonas limit (fail above).
    #[serde(default = "default_water_secondary")]
    pub water_secondary: f64,
}

fn default_total_count_feed() -> f64 {
    100_000.0
}

fn default_total_count_other() -> f64 {
    1_000.0
}

fn default_water_primary() -> f64 {
    56.0
}

fn default_water_secondary() -> f64 {
    1.0
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            total_count_feed: default_total_count_feed(),
            total_count_other: default_total_count_other(),
            water_primary: default_water_primary(),
            water_secondary: default_water_secondary(),
        }
    }
}

/// Classify result text with the default thresholds.
pub fn classify(text: &str, kind: SectionKind, is_feed_sample: bool) -> Classification {
    classify_with(text, kind, is_feed_sample, &Thresholds::default())
}

/// Classify result text against explicit thresholds.
///
/// Numeric kinds whose text does not parse fall through to the keyword rules.
pub fn classify_with(
    text: &str,
    kind: SectionKind,
    is_feed_sample: bool,
    thresholds: &Thresholds,
) -> Classification {
    if kind != SectionKind::Qualitative {
        if let Some(value) = parse_numeric_value(text) {
            return classify_value(value, kind, is_feed_sample, thresholds);
        }
    }
    classify_keyword(text)
}

/// Classify an already-computed magnitude.
pub fn classify_value(
    value: f64,
    kind: SectionKind,
    is_feed_sample: bool,
    thresholds: &Thresholds,
) -> Classification {
    if !value.is_finite() {
        return Classification::Neutral;
    }
    let fail = match kind {
        SectionKind::TotalCount if is_feed_sample => value >= thresholds.total_count_feed,
        SectionKind::TotalCount => value >= thresholds.total_count_other,
        SectionKind::WaterPrimary => value > thresholds.water_primary,
        SectionKind::WaterSecondary => value > thresholds.water_secondary,
        SectionKind::Qualitative => return Classification::Neutral,
    };
    if fail {
        Classification::Fail
    } else {
        Classification::Pass
    }
}

/// Keyword classification for qualitative results.
pub fn classify_keyword(text: &str) -> Classification {
    let lower = text.to_lowercase();
    if lower.contains("not detected") || lower.contains("less than") || RE_NO_GROWTH.is_match(&lower)
    {
        Classification::Pass
    } else if lower.contains("detected") || lower.contains("positive") {
        Classification::Fail
    } else {
        Classification::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_count_thresholds() {
        assert_eq!(classify("150000", SectionKind::TotalCount, true), Classification::Fail);
        assert_eq!(classify("150000", SectionKind::TotalCount, false), Classification::Fail);
        assert_eq!(classify("500", SectionKind::TotalCount, false), Classification::Pass);
        assert_eq!(classify("5000", SectionKind::TotalCount, true), Classification::Pass);
        assert_eq!(classify("1000", SectionKind::TotalCount, false), Classification::Fail);
        assert_eq!(classify("100000", SectionKind::TotalCount, true), Classification::Fail);
    }

    #[test]
    fn test_water_thresholds() {
        assert_eq!(classify("56", SectionKind::WaterPrimary, false), Classification::Pass);
        assert_eq!(classify("57", SectionKind::WaterPrimary, false), Classification::Fail);
        assert_eq!(classify("1", SectionKind::WaterSecondary, false), Classification::Pass);
        assert_eq!(classify("2", SectionKind::WaterSecondary, false), Classification::Fail);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(classify("Not Detected", SectionKind::Qualitative, false), Classification::Pass);
        assert_eq!(classify("Detected", SectionKind::Qualitative, false), Classification::Fail);
        assert_eq!(classify("Positive", SectionKind::Qualitative, false), Classification::Fail);
        assert_eq!(classify("No bacterial growth", SectionKind::Qualitative, false), Classification::Pass);
        assert_eq!(classify("Less than 10", SectionKind::Qualitative, false), Classification::Pass);
        assert_eq!(classify("Pending", SectionKind::Qualitative, false), Classification::Neutral);
        assert_eq!(classify("", SectionKind::Qualitative, false), Classification::Neutral);
    }

    #[test]
    fn test_numeric_kind_falls_back_to_keywords() {
        assert_eq!(classify("Not Detected", SectionKind::WaterSecondary, false), Classification::Pass);
        assert_eq!(classify("garbage", SectionKind::TotalCount, true), Classification::Neutral);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = Thresholds {
            water_primary: 100.0,
            ..Thresholds::default()
        };
        assert_eq!(
            classify_with("80", SectionKind::WaterPrimary, false, &thresholds),
            Classification::Pass
        );
    }
}
