//! Fuzz target for COA snapshot parsing.
//!
//! Tests that `CoaSnapshot::from_json` rejects malformed input with an error
//! instead of panicking, and that hidden-index extraction handles whatever parses.

#![no_main]

use coa_common::CoaSnapshot;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(snapshot) = CoaSnapshot::from_json(data) {
        let _ = snapshot.hidden_indexes();
    }
});
