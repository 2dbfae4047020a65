//! Scientific-notation rendering of lab counts.

use super::parse::parse_numeric_value;

/// Smallest magnitude rendered in scientific form.
pub const SCIENTIFIC_THRESHOLD: f64 = 10.0;

/// Render the text in scientific notation when it parses to a value ≥ 10.
///
/// Small or unparseable values come back unchanged, so `"9"` stays `"9"` and
/// `"Not Detected"` stays `"Not Detected"`.
pub fn format_scientific_notation(text: &str) -> String {
    match parse_numeric_value(text) {
        Some(value) if value >= SCIENTIFIC_THRESHOLD => format_scientific(value),
        _ => text.to_string(),
    }
}

/// Render a value as `<mantissa>×10<superscript exponent>`.
///
/// The mantissa is rounded to one decimal; a mantissa that rounds up to 10 is
/// carried into the exponent (`9960` → `1×10⁴`). Values below 10 use the plain
/// form.
pub fn format_scientific(value: f64) -> String {
    if !value.is_finite() || value < SCIENTIFIC_THRESHOLD {
        return format_plain(value);
    }

    let mut exponent = value.log10().floor() as i32;
    // log10 can land one ulp off at exact powers of ten
    if 10f64.powi(exponent) > value {
        exponent -= 1;
    } else if 10f64.powi(exponent + 1) <= value {
        exponent += 1;
    }

    let mut mantissa = round_to_tenth(value / 10f64.powi(exponent));
    if mantissa >= 10.0 {
        mantissa = round_to_tenth(mantissa / 10.0);
        exponent += 1;
    }

    format!("{}×10{}", format_plain(mantissa), superscript(exponent))
}

/// Shortest decimal form of a value (`6500.0` → `"6500"`, `3.5` → `"3.5"`).
pub fn format_plain(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Unicode superscript rendering of an integer exponent.
pub fn superscript(exponent: i32) -> String {
    exponent
        .to_string()
        .chars()
        .map(|c| match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            '-' => '⁻',
            other => other,
        })
        .collect()
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
