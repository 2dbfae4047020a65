//! Disease sections.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::category::DiseaseCategory;
use crate::id::SampleIndex;
use crate::model::measurement::Measurement;

/// One tested disease of a unit.
///
/// The category is classified from `name` when the section is deserialized
/// without one; a stored category is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DiseaseSectionInput")]
pub struct DiseaseSection {
    pub name: String,
    pub category: DiseaseCategory,
    pub results: BTreeMap<SampleIndex, Measurement>,
    pub test_method: Option<String>,
    /// Test portion per index (salmonella).
    pub test_portions: BTreeMap<SampleIndex, String>,
    pub isolate_types: BTreeMap<SampleIndex, String>,
    pub ranges: BTreeMap<SampleIndex, String>,
    pub hidden_indexes: BTreeSet<SampleIndex>,
}

#[derive(Deserialize)]
struct DiseaseSectionInput {
    name: String,
    #[serde(default)]
    category: Option<DiseaseCategory>,
    #[serde(default)]
    results: BTreeMap<SampleIndex, Measurement>,
    #[serde(default)]
    test_method: Option<String>,
    #[serde(default)]
    test_portions: BTreeMap<SampleIndex, String>,
    #[serde(default)]
    isolate_types: BTreeMap<SampleIndex, String>,
    #[serde(default)]
    ranges: BTreeMap<SampleIndex, String>,
    #[serde(default)]
    hidden_indexes: BTreeSet<SampleIndex>,
}

impl From<DiseaseSectionInput> for DiseaseSection {
    fn from(input: DiseaseSectionInput) -> Self {
        let category = input
            .category
            .unwrap_or_else(|| DiseaseCategory::classify(&input.name));
        DiseaseSection {
            name: input.name,
            category,
            results: input.results,
            test_method: input.test_method,
            test_portions: input.test_portions,
            isolate_types: input.isolate_types,
            ranges: input.ranges,
            hidden_indexes: input.hidden_indexes,
        }
    }
}

impl DiseaseSection {
    /// New empty section; the category is classified from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let category = DiseaseCategory::classify(&name);
        DiseaseSection {
            name,
            category,
            results: BTreeMap::new(),
            test_method: None,
            test_portions: BTreeMap::new(),
            isolate_types: BTreeMap::new(),
            ranges: BTreeMap::new(),
            hidden_indexes: BTreeSet::new(),
        }
    }

    pub fn with_result(mut self, index: impl Into<SampleIndex>, measurement: Measurement) -> Self {
        self.results.insert(index.into(), measurement);
        self
    }

    pub fn with_test_method(mut self, method: impl Into<String>) -> Self {
        self.test_method = Some(method.into());
        self
    }

    pub fn hide(mut self, index: impl Into<SampleIndex>) -> Self {
        self.hidden_indexes.insert(index.into());
        self
    }

    pub fn is_hidden(&self, index: &SampleIndex) -> bool {
        self.hidden_indexes.contains(index)
    }

    /// The unit's indexes minus this section's hidden set, in unit order.
    pub fn visible_indexes<'a>(&self, unit_indexes: &'a [SampleIndex]) -> Vec<&'a SampleIndex> {
        unit_indexes.iter().filter(|idx| !self.is_hidden(idx)).collect()
    }

    pub fn measurement(&self, index: &SampleIndex) -> Option<&Measurement> {
        self.results.get(index)
    }
}
