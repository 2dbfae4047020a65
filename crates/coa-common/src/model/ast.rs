//! Antimicrobial-susceptibility (AST) panels.

use serde::{Deserialize, Serialize};

/// Categorical interpretation of a disk diffusion reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interpretation {
    #[serde(alias = "R", alias = "resistant")]
    Resistant,
    #[serde(alias = "I", alias = "intermediate")]
    Intermediate,
    #[serde(alias = "S", alias = "sensitive", alias = "Susceptible")]
    Sensitive,
}

impl Interpretation {
    pub fn letter(&self) -> &'static str {
        match self {
            Interpretation::Resistant => "R",
            Interpretation::Intermediate => "I",
            Interpretation::Sensitive => "S",
        }
    }
}

/// Reference breakpoints for one disk and bacterial family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoints {
    #[serde(default)]
    pub resistant: String,
    #[serde(default)]
    pub intermediate: String,
    #[serde(default)]
    pub sensitive: String,
}

/// One antimicrobial disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AstRow {
    pub disk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Interpretation>,
    #[serde(default)]
    pub breakpoints: Breakpoints,
}

impl AstRow {
    /// Rows are rendered only when they carry a reading or an interpretation.
    pub fn is_renderable(&self) -> bool {
        self.interpretation.is_some()
            || self.value.as_deref().is_some_and(|v| !v.trim().is_empty())
    }
}

/// AST panel attached to a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AstPanel {
    #[serde(default)]
    pub include_in_report: bool,
    #[serde(default)]
    pub bacterial_family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_method: Option<String>,
    #[serde(default)]
    pub rows: Vec<AstRow>,
}

impl AstPanel {
    pub fn renderable_rows(&self) -> Vec<&AstRow> {
        self.rows.iter().filter(|r| r.is_renderable()).collect()
    }

    /// Included and at least one renderable row. `include_override` replaces
    /// the panel's own inclusion flag when set.
    pub fn should_render(&self, include_override: Option<bool>) -> bool {
        include_override.unwrap_or(self.include_in_report)
            && self.rows.iter().any(AstRow::is_renderable)
    }
}
