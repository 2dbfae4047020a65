//! COA synthesis configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the lab profile and engine settings
//! - Config resolution (CLI → env → XDG → /etc → defaults)
//! - Semantic validation
//! - Config snapshots recorded alongside each export

pub mod profile;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use profile::{
    AstPagination, CoaConfig, DilutionConfig, DiseasePagination, FooterRows, LabProfile,
    PaginationConfig, PrintConfig,
};
pub use resolve::{load_config, resolve_config, ConfigSource, LoadedConfig};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
