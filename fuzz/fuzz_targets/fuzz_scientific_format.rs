//! Fuzz target for scientific-notation rendering.
//!
//! Tests that `format_scientific_notation` never panics and that the dilution
//! helpers only ever return finite readings.

#![no_main]

use coa_numeric::{combine_plate_texts, format_scientific_notation, water_reading_text};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &str, f64, f64)| {
    let (first, second, dilution, volume) = input;
    let _ = format_scientific_notation(first);
    if let Some(v) = combine_plate_texts(first, Some(second), dilution) {
        assert!(v.is_finite());
    }
    if let Some(v) = water_reading_text(first, dilution, volume) {
        assert!(v.is_finite());
    }
});
