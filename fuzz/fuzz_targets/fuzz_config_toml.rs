//! Fuzz target for config file parsing.
//!
//! Tests that TOML and JSON config parsing handles arbitrary input without
//! panicking.

#![no_main]

use coa_config::CoaConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = CoaConfig::from_toml_str(data);
    let _ = CoaConfig::from_json_str(data);
});
