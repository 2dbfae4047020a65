//! Report signatories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::model::image::ImageData;

/// Signature roles, in the order they appear on the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatoryRole {
    TestedBy,
    ReviewedBy,
    LabSupervisor,
    LabManager,
}

impl SignatoryRole {
    pub fn all() -> &'static [SignatoryRole] {
        &[
            SignatoryRole::TestedBy,
            SignatoryRole::ReviewedBy,
            SignatoryRole::LabSupervisor,
            SignatoryRole::LabManager,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignatoryRole::TestedBy => "Tested By",
            SignatoryRole::ReviewedBy => "Reviewed By",
            SignatoryRole::LabSupervisor => "Lab Supervisor",
            SignatoryRole::LabManager => "Lab Manager",
        }
    }
}

impl fmt::Display for SignatoryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SignatoryRole {
    type Err = Error;

    /// Accepts `tested-by`, `tested_by` and `Tested By` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "testedby" => Ok(SignatoryRole::TestedBy),
            "reviewedby" => Ok(SignatoryRole::ReviewedBy),
            "labsupervisor" => Ok(SignatoryRole::LabSupervisor),
            "labmanager" => Ok(SignatoryRole::LabManager),
            _ => Err(Error::UnknownRole(s.to_string())),
        }
    }
}

/// A named signer with an optional signature image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatory {
    pub role: SignatoryRole,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<ImageData>,
}
