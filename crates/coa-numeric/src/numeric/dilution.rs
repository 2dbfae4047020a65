//! Dilution arithmetic for composite count sections.

use super::parse::{is_placeholder, parse_numeric_value};

/// Combine duplicate plate readings: `(first + second) / dilution_factor`.
///
/// Returns `None` for a zero or non-finite dilution factor.
pub fn combine_plate_counts(first: f64, second: f64, dilution_factor: f64) -> Option<f64> {
    if !dilution_factor.is_finite() || dilution_factor == 0.0 {
        return None;
    }
    let value = (first + second) / dilution_factor;
    value.is_finite().then_some(value)
}

/// Combine two raw plate texts. Both readings must parse.
pub fn combine_plate_texts(first: &str, second: Option<&str>, dilution_factor: f64) -> Option<f64> {
    let second = second.filter(|s| !is_placeholder(s))?;
    combine_plate_counts(
        parse_numeric_value(first)?,
        parse_numeric_value(second)?,
        dilution_factor,
    )
}

/// Scale a lone plate reading onto the same footing as a combined pair: the
/// reading stands in for both plates, `(first + first) / dilution_factor`.
pub fn single_plate_text(first: &str, dilution_factor: f64) -> Option<f64> {
    let value = parse_numeric_value(first)?;
    combine_plate_counts(value, value, dilution_factor)
}

/// Scale a water reading: `(reading × dilution_factor) × volume`.
pub fn water_reading(reading: f64, dilution_factor: f64, volume: f64) -> Option<f64> {
    let value = (reading * dilution_factor) * volume;
    value.is_finite().then_some(value)
}

/// Scale a raw water reading text.
pub fn water_reading_text(text: &str, dilution_factor: f64, volume: f64) -> Option<f64> {
    water_reading(parse_numeric_value(text)?, dilution_factor, volume)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_plate_counts() {
        assert_eq!(combine_plate_counts(65.0, 71.0, 2.0), Some(68.0));
        assert_eq!(combine_plate_counts(65.0, 71.0, 0.0), None);
    }

    #[test]
    fn test_combine_plate_texts_requires_both() {
        assert_eq!(combine_plate_texts("120", Some("80"), 0.5), Some(400.0));
        assert_eq!(combine_plate_texts("120", None, 2.0), None);
        assert_eq!(combine_plate_texts("120", Some("-"), 2.0), None);
        assert_eq!(combine_plate_texts("TNTC", Some("80"), 2.0), None);
    }

    #[test]
    fn test_single_plate_matches_equal_pair() {
        assert_eq!(single_plate_text("120", 2.0), Some(120.0));
        assert_eq!(single_plate_text("120", 0.5), Some(480.0));
        assert_eq!(
            single_plate_text("120", 0.5),
            combine_plate_texts("120", Some("120"), 0.5)
        );
        assert_eq!(single_plate_text("TNTC", 2.0), None);
        assert_eq!(single_plate_text("120", 0.0), None);
    }

    #[test]
    fn test_water_reading() {
        assert_eq!(water_reading(3.0, 10.0, 2.0), Some(60.0));
        assert_eq!(water_reading_text("Less than 1", 10.0, 1.0), Some(0.0));
        assert_eq!(water_reading_text("n/a", 10.0, 1.0), None);
    }
}
