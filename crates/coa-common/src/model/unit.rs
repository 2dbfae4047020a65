//! Test units and their sample context.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::{SampleIndex, UnitCode};
use crate::model::section::DiseaseSection;

/// Sample-level context shared by every unit registered for a sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_code: Option<String>,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub farm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_received: Option<NaiveDate>,
}

/// A registered test unit with its disease sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestUnit {
    pub unit_code: UnitCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<SampleContext>,
    #[serde(default)]
    pub houses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub sample_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_no: Option<String>,
    /// "Before Fumigation" / "After Fumigation".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fumigation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technician: Option<String>,
    /// Sample indexes in registration order.
    #[serde(default)]
    pub indexes: Vec<SampleIndex>,
    /// Disease sections in registration order.
    #[serde(default)]
    pub diseases: Vec<DiseaseSection>,
}

impl TestUnit {
    pub fn new(unit_code: impl Into<String>) -> Self {
        TestUnit {
            unit_code: UnitCode::new(unit_code),
            sample: None,
            houses: Vec::new(),
            age: None,
            source: None,
            sample_types: Vec::new(),
            batch_no: None,
            fumigation: None,
            technician: None,
            indexes: Vec::new(),
            diseases: Vec::new(),
        }
    }

    pub fn with_sample(mut self, sample: SampleContext) -> Self {
        self.sample = Some(sample);
        self
    }

    pub fn with_indexes<I, S>(mut self, indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SampleIndex>,
    {
        self.indexes = indexes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_disease(mut self, section: DiseaseSection) -> Self {
        self.diseases.push(section);
        self
    }

    /// Feed samples are judged against the feed total-count limit.
    pub fn is_feed_sample(&self) -> bool {
        self.sample_types
            .iter()
            .any(|t| t.to_lowercase().contains("feed"))
    }

    pub fn received_date(&self) -> Option<NaiveDate> {
        self.sample.as_ref().and_then(|s| s.date_received)
    }
}
