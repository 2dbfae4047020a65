//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG → /etc → defaults.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::profile::CoaConfig;
use crate::validate::{validate_config, ValidationResult};

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/coa-synth/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "COA_CONFIG";
pub const ENV_CONFIG_DIR: &str = "COA_CONFIG_DIR";

/// Config file names probed in each directory, in order.
const CONFIG_FILENAMES: [&str; 2] = ["coa.toml", "coa.json"];

/// Application name for XDG directories.
const APP_NAME: &str = "coa-synth";

/// Resolve the configuration file path.
///
/// Resolution order:
/// 1. Explicit CLI path (if it exists)
/// 2. `COA_CONFIG` environment variable
/// 3. `COA_CONFIG_DIR` + `coa.toml` / `coa.json`
/// 4. XDG config directory (~/.config/coa-synth/)
/// 5. System config (/etc/coa-synth/)
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_path {
        if path.exists() {
            return (Some(path.to_path_buf()), ConfigSource::CliArgument);
        }
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        if let Some(path) = find_in_dir(Path::new(&config_dir)) {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        if let Some(path) = find_in_dir(&dir) {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    if let Some(path) = find_in_dir(&system_config_dir()) {
        return (Some(path), ConfigSource::SystemConfig);
    }

    (None, ConfigSource::BuiltinDefault)
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// A resolved, parsed and validated configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: CoaConfig,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Resolve, parse and validate the configuration.
///
/// A CLI path that does not exist is an error rather than a silent fall-through.
pub fn load_config(cli_path: Option<&Path>) -> ValidationResult<LoadedConfig> {
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(crate::ValidationError::IoError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
    }

    let (path, source) = resolve_config(cli_path);
    let config = match &path {
        Some(p) => CoaConfig::from_file(p)?,
        None => CoaConfig::default(),
    };
    validate_config(&config)?;

    debug!(
        source = %source,
        path = ?path,
        schema_version = %config.schema_version,
        "Configuration loaded"
    );

    Ok(LoadedConfig {
        config,
        path,
        source,
    })
}

/// Get the XDG config directory for coa-synth.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(format!("{}", ConfigSource::XdgConfig), "XDG config");
        assert_eq!(format!("{}", ConfigSource::SystemConfig), "system config");
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn test_find_in_dir_prefers_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("coa.json"), "{}").unwrap();
        assert_eq!(find_in_dir(dir.path()), Some(dir.path().join("coa.json")));
        std::fs::write(dir.path().join("coa.toml"), "").unwrap();
        assert_eq!(find_in_dir(dir.path()), Some(dir.path().join("coa.toml")));
    }

    #[test]
    fn test_cli_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab.json");
        std::fs::write(&path, r#"{"lab": {"name": "CLI Lab"}}"#).unwrap();
        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.source, ConfigSource::CliArgument);
        assert_eq!(loaded.config.lab.name, "CLI Lab");
    }

    #[test]
    fn test_missing_cli_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert_eq!(err.code(), 60);
    }

    #[test]
    fn test_system_config_dir() {
        assert_eq!(system_config_dir(), PathBuf::from("/etc/coa-synth"));
    }
}
