//! Report output configuration.
//!
//! Engine settings (lab profile, pagination, thresholds) live in
//! [`coa_config::CoaConfig`]; this type only carries per-export output toggles.

use serde::{Deserialize, Serialize};

/// Output toggles for a single export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Overrides the lab profile's report title.
    #[serde(default)]
    pub title: Option<String>,
    /// Minify HTML output. Unset means minify in release builds only.
    #[serde(default)]
    pub minify: Option<bool>,
    /// Overrides `print.auto_print` from the engine configuration.
    #[serde(default)]
    pub auto_print: Option<bool>,
    /// Overrides the AST panel's own include flag.
    #[serde(default)]
    pub include_ast: Option<bool>,
}

fn default_schema_version() -> String {
    "1.0.0".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            title: None,
            minify: None,
            auto_print: None,
            include_ast: None,
        }
    }
}

impl ReportConfig {
    /// Create a new report configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Force minification on or off.
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = Some(minify);
        self
    }

    /// Force the auto-print script on or off.
    pub fn with_auto_print(mut self, enabled: bool) -> Self {
        self.auto_print = Some(enabled);
        self
    }

    /// Force the AST section on or off.
    pub fn with_include_ast(mut self, include: bool) -> Self {
        self.include_ast = Some(include);
        self
    }

    /// Whether HTML output is minified.
    pub fn should_minify(&self) -> bool {
        self.minify.unwrap_or(!cfg!(debug_assertions))
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
