//! Frozen export input.
//!
//! A [`CoaSnapshot`] is everything one export reads: the unit with its
//! sections, the optional AST panel, signatories, the lab logo and COA
//! metadata. It is never mutated during an export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::hidden::HiddenIndexMap;
use crate::model::ast::AstPanel;
use crate::model::image::ImageData;
use crate::model::signatory::{Signatory, SignatoryRole};
use crate::model::unit::TestUnit;

/// COA workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoaStatus {
    #[default]
    Draft,
    NeedApproval,
    Completed,
}

impl CoaStatus {
    /// Only completed certificates print without the DRAFT marker.
    pub fn is_final(&self) -> bool {
        *self == CoaStatus::Completed
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoaSnapshot {
    #[serde(default)]
    pub unit: Option<TestUnit>,
    #[serde(default)]
    pub ast: Option<AstPanel>,
    #[serde(default)]
    pub signatories: Vec<Signatory>,
    #[serde(default)]
    pub logo: Option<ImageData>,
    #[serde(default)]
    pub date_tested: Option<NaiveDate>,
    #[serde(default)]
    pub status: CoaStatus,
    #[serde(default)]
    pub notes: Option<String>,
    /// Stored report numbers keyed by disease name; these win over derivation.
    #[serde(default)]
    pub report_numbers: BTreeMap<String, String>,
}

impl CoaSnapshot {
    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidSnapshot(e.to_string()))
    }

    /// Load a snapshot file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn signatory(&self, role: SignatoryRole) -> Option<&Signatory> {
        self.signatories.iter().find(|s| s.role == role)
    }

    /// Current hidden-index sets of every disease with at least one hidden index.
    pub fn hidden_indexes(&self) -> HiddenIndexMap {
        self.unit
            .iter()
            .flat_map(|u| u.diseases.iter())
            .filter(|d| !d.hidden_indexes.is_empty())
            .map(|d| {
                (
                    d.name.clone(),
                    d.hidden_indexes.iter().map(|i| i.as_str().to_string()).collect(),
                )
            })
            .collect()
    }
}
