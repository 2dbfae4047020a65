//! Configuration snapshots.
//!
//! A snapshot fingerprints the effective configuration of an export so two
//! documents can be checked for having been laid out with the same settings.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::profile::CoaConfig;
use crate::resolve::LoadedConfig;

/// A frozen summary of the configuration used for an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// Schema version of the configuration.
    pub schema_version: String,

    /// Where the configuration came from.
    pub source: String,

    /// Path the configuration was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// SHA-256 of the effective configuration serialized as JSON.
    pub config_hash: String,

    /// Key configuration values for quick reference.
    pub summary: ConfigSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub lab_name: String,
    pub rows_per_page: usize,
    pub rows_on_last_page_with_qc: usize,
    pub rows_on_last_page_without_qc: usize,
    pub ast_rows_per_page: usize,
    pub ast_rows_on_last_page: usize,
    pub image_wait_timeout_ms: u64,
    pub auto_print: bool,
}

impl ConfigSnapshot {
    /// Create a snapshot from a loaded configuration.
    pub fn new(loaded: &LoadedConfig) -> Self {
        let mut snapshot = Self::from_config(&loaded.config);
        snapshot.source = loaded.source.to_string();
        snapshot.path = loaded.path.as_ref().map(|p| p.display().to_string());
        snapshot
    }

    /// Create a snapshot of an in-memory configuration.
    pub fn from_config(config: &CoaConfig) -> Self {
        let canonical = serde_json::to_string(config).unwrap_or_default();
        ConfigSnapshot {
            schema_version: config.schema_version.clone(),
            source: crate::ConfigSource::BuiltinDefault.to_string(),
            path: None,
            config_hash: hash_content(&canonical),
            summary: ConfigSummary::from_config(config),
        }
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check if this snapshot matches another (same effective config).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.config_hash == other.config_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.config_hash[..12.min(self.config_hash.len())]
    }
}

impl ConfigSummary {
    fn from_config(config: &CoaConfig) -> Self {
        let disease = &config.pagination.disease;
        ConfigSummary {
            lab_name: config.lab.name.clone(),
            rows_per_page: disease.rows_per_page,
            rows_on_last_page_with_qc: disease.rows_on_last_page(true),
            rows_on_last_page_without_qc: disease.rows_on_last_page(false),
            ast_rows_per_page: config.pagination.ast.rows_per_page,
            ast_rows_on_last_page: config.pagination.ast.rows_on_last_page,
            image_wait_timeout_ms: config.print.image_wait_timeout_ms,
            auto_print: config.print.auto_print,
        }
    }
}

/// Hash content with SHA-256 and return hex string.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_snapshot() {
        let snapshot = ConfigSnapshot::from_config(&CoaConfig::default());
        assert_eq!(snapshot.schema_version, crate::CONFIG_SCHEMA_VERSION);
        assert_eq!(snapshot.source, "builtin default");
        assert_eq!(snapshot.summary.rows_on_last_page_with_qc, 26);
        assert_eq!(snapshot.summary.rows_on_last_page_without_qc, 34);
        assert_eq!(snapshot.short_id().len(), 12);
    }

    #[test]
    fn test_snapshot_matches_only_same_config() {
        let s1 = ConfigSnapshot::from_config(&CoaConfig::default());
        let s2 = ConfigSnapshot::from_config(&CoaConfig::default());
        assert!(s1.matches(&s2));

        let mut changed = CoaConfig::default();
        changed.print.auto_print = true;
        assert!(!s1.matches(&ConfigSnapshot::from_config(&changed)));
    }

    #[test]
    fn test_hash_content() {
        let hash = hash_content("test");
        assert_eq!(hash, hash_content("test"));
        assert_eq!(hash.len(), 64);
    }
}
