//! Fuzz target for result-cell numeric parsing.
//!
//! Tests that `parse_numeric_value` and `classify_keyword` handle arbitrary
//! cell text without panicking.

#![no_main]

use coa_numeric::{classify_keyword, is_placeholder, parse_numeric_value};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let _ = is_placeholder(data);
    let _ = classify_keyword(data);
    if let Some(value) = parse_numeric_value(data) {
        assert!(value.is_finite());
    }
});
