//! Hidden-index change tracking.
//!
//! Hiding an index removes it from the rendered COA without deleting its
//! data. Each change is recorded for the unit's edit history as one line per
//! disease and direction, e.g. `Salmonella: hidden [3, 4]`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Per-disease hidden-index sets keyed by disease name.
pub type HiddenIndexMap = BTreeMap<String, BTreeSet<String>>;

/// Direction of a visibility change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Hidden,
    Shown,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Hidden => write!(f, "hidden"),
            Visibility::Shown => write!(f, "shown"),
        }
    }
}

/// One disease's newly hidden or newly shown indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HiddenIndexChange {
    pub disease: String,
    pub visibility: Visibility,
    /// Sorted lexically.
    pub indexes: Vec<String>,
}

impl fmt::Display for HiddenIndexChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.disease, self.visibility, self.indexes.join(", "))
    }
}

/// Compare two hidden-index maps.
///
/// Diseases are visited in name order; for each, a `Hidden` entry precedes a
/// `Shown` entry. A disease missing from one side counts as an empty set.
pub fn diff_hidden_indexes(old: &HiddenIndexMap, new: &HiddenIndexMap) -> Vec<HiddenIndexChange> {
    let empty = BTreeSet::new();
    let diseases: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    let mut changes = Vec::new();
    for disease in diseases {
        let before = old.get(disease).unwrap_or(&empty);
        let after = new.get(disease).unwrap_or(&empty);

        let hidden: Vec<String> = after.difference(before).cloned().collect();
        let shown: Vec<String> = before.difference(after).cloned().collect();

        if !hidden.is_empty() {
            changes.push(HiddenIndexChange {
                disease: disease.clone(),
                visibility: Visibility::Hidden,
                indexes: hidden,
            });
        }
        if !shown.is_empty() {
            changes.push(HiddenIndexChange {
                disease: disease.clone(),
                visibility: Visibility::Shown,
                indexes: shown,
            });
        }
    }
    changes
}
