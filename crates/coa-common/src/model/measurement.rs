//! Typed per-index measurements.
//!
//! A measurement is the primary result text of one sample index plus any
//! co-measured analytes. Composite sections (total count, water) read the
//! duplicate plate reading and the analyte map; every other section only
//! reads `result`.
//!
//! On input a measurement may be a bare string, which is shorthand for a
//! record holding only `result`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Co-measured analytes recorded alongside the primary result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analyte {
    /// Mould count (total-count sections).
    Mould,
    /// Pathogenic fungi (total-count sections).
    PathogenicFungi,
    /// Coliform count (water sections).
    Coliform,
    /// E. coli count (water sections).
    EColi,
    /// Pseudomonas count (water sections).
    Pseudomonas,
}

impl Analyte {
    pub fn label(&self) -> &'static str {
        match self {
            Analyte::Mould => "Mould Count",
            Analyte::PathogenicFungi => "Pathogenic Fungi",
            Analyte::Coliform => "Coliform",
            Analyte::EColi => "E. coli",
            Analyte::Pseudomonas => "Pseudomonas",
        }
    }

    /// Analytes rendered as secondary columns of a water table.
    pub fn water_secondary() -> &'static [Analyte] {
        &[Analyte::Coliform, Analyte::EColi, Analyte::Pseudomonas]
    }
}

impl fmt::Display for Analyte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One analyte reading, optionally with a duplicate plate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReadingInput")]
pub struct AnalyteReading {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<String>,
}

impl AnalyteReading {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            duplicate: None,
        }
    }

    pub fn with_duplicate(mut self, duplicate: impl Into<String>) -> Self {
        self.duplicate = Some(duplicate.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReadingInput {
    Text(String),
    Record {
        #[serde(default)]
        value: String,
        #[serde(default)]
        duplicate: Option<String>,
    },
}

impl From<ReadingInput> for AnalyteReading {
    fn from(input: ReadingInput) -> Self {
        match input {
            ReadingInput::Text(value) => AnalyteReading::new(value),
            ReadingInput::Record { value, duplicate } => AnalyteReading { value, duplicate },
        }
    }
}

/// Result of one sample index within a disease section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "MeasurementInput")]
pub struct Measurement {
    /// Primary result text as entered.
    pub result: String,
    /// Duplicate plate reading of the primary result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<String>,
    /// Overrides the configured dilution factor for this index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dilution_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub analytes: BTreeMap<Analyte, AnalyteReading>,
}

impl Measurement {
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            ..Self::default()
        }
    }

    pub fn with_duplicate(mut self, duplicate: impl Into<String>) -> Self {
        self.duplicate = Some(duplicate.into());
        self
    }

    pub fn with_dilution_factor(mut self, factor: f64) -> Self {
        self.dilution_factor = Some(factor);
        self
    }

    pub fn with_analyte(mut self, analyte: Analyte, reading: AnalyteReading) -> Self {
        self.analytes.insert(analyte, reading);
        self
    }

    pub fn analyte(&self, analyte: Analyte) -> Option<&AnalyteReading> {
        self.analytes.get(&analyte)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MeasurementInput {
    Text(String),
    Record {
        #[serde(default)]
        result: String,
        #[serde(default)]
        duplicate: Option<String>,
        #[serde(default)]
        dilution_factor: Option<f64>,
        #[serde(default)]
        analytes: BTreeMap<Analyte, AnalyteReading>,
    },
}

impl From<MeasurementInput> for Measurement {
    fn from(input: MeasurementInput) -> Self {
        match input {
            MeasurementInput::Text(result) => Measurement::new(result),
            MeasurementInput::Record {
                result,
                duplicate,
                dilution_factor,
                analytes,
            } => Measurement {
                result,
                duplicate,
                dilution_factor,
                analytes,
            },
        }
    }
}
