//! Parsing of lab result text into numeric magnitudes.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_LESS_THAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)less\s+than\s+(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)").unwrap()
});

// `6.5 x10^3`, `6.5 × 10^3`, `6.5×10³`, `2 * 10^-1`
static RE_SCIENTIFIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\d+(?:\.\d+)?)\s*[xX×*]\s*10\s*(?:\^\s*([-+]?\d+)|([⁻⁺]?[⁰¹²³⁴⁵⁶⁷⁸⁹]+))",
    )
    .unwrap()
});

static RE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?").unwrap());

/// Whether the text is an empty or dash-only placeholder (`""`, `"-"`, `"-------"`).
pub fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.chars().all(|c| c == '-')
}

/// Parse a free-text lab result into a number.
///
/// Rules, first match wins:
/// 1. empty / dash placeholder → `None`
/// 2. `less than N` (any case) → `N - 1`
/// 3. `a x10^b` and its variants → `a * 10^b`
/// 4. the first embedded number (thousands separators allowed)
/// 5. otherwise `None`
pub fn parse_numeric_value(text: &str) -> Option<f64> {
    if is_placeholder(text) {
        return None;
    }

    if let Some(caps) = RE_LESS_THAN.captures(text) {
        return parse_grouped(&caps[1]).map(|n| n - 1.0);
    }

    if let Some(caps) = RE_SCIENTIFIC.captures(text) {
        let mantissa: f64 = caps[1].parse().ok()?;
        let exponent = match (caps.get(2), caps.get(3)) {
            (Some(plain), _) => plain.as_str().parse::<i32>().ok()?,
            (None, Some(sup)) => parse_superscript(sup.as_str())?,
            (None, None) => return None,
        };
        let value = mantissa * 10f64.powi(exponent);
        return value.is_finite().then_some(value);
    }

    RE_NUMBER
        .find(text)
        .and_then(|m| parse_grouped(m.as_str()))
}

/// Parse a number that may carry `,` thousands separators.
fn parse_grouped(token: &str) -> Option<f64> {
    let cleaned: String = token.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Decode unicode superscript digits (`⁻³` → `-3`).
fn parse_superscript(text: &str) -> Option<i32> {
    let mut plain = String::with_capacity(text.len());
    for c in text.chars() {
        let mapped = match c {
            '⁰' => '0',
            '¹' => '1',
            '²' => '2',
            '³' => '3',
            '⁴' => '4',
            '⁵' => '5',
            '⁶' => '6',
            '⁷' => '7',
            '⁸' => '8',
            '⁹' => '9',
            '⁻' => '-',
            '⁺' => '+',
            _ => return None,
        };
        plain.push(mapped);
    }
    plain.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_null() {
        assert_eq!(parse_numeric_value(""), None);
        assert_eq!(parse_numeric_value("-"), None);
        assert_eq!(parse_numeric_value("-------"), None);
        assert_eq!(parse_numeric_value("   "), None);
    }

    #[test]
    fn test_less_than() {
        assert_eq!(parse_numeric_value("Less than 10 CFU"), Some(9.0));
        assert_eq!(parse_numeric_value("LESS THAN 1"), Some(0.0));
        assert_eq!(parse_numeric_value("less than 1,000 cfu/g"), Some(999.0));
    }

    #[test]
    fn test_scientific_forms() {
        assert_eq!(parse_numeric_value("6.5 x10^3"), Some(6500.0));
        assert_eq!(parse_numeric_value("6.5 × 10^3"), Some(6500.0));
        assert_eq!(parse_numeric_value("2X10^2 CFU/g"), Some(200.0));
        assert_eq!(parse_numeric_value("6.5×10³"), Some(6500.0));
        assert_eq!(parse_numeric_value("1.2×10¹²"), Some(1.2e12));
    }

    #[test]
    fn test_first_embedded_number() {
        assert_eq!(parse_numeric_value("150000"), Some(150000.0));
        assert_eq!(parse_numeric_value("approx 42 colonies"), Some(42.0));
        assert_eq!(parse_numeric_value("1,500 CFU"), Some(1500.0));
        assert_eq!(parse_numeric_value("3.75"), Some(3.75));
    }

    #[test]
    fn test_non_numeric_is_null() {
        assert_eq!(parse_numeric_value("Not Detected"), None);
        assert_eq!(parse_numeric_value("No growth"), None);
    }

    #[test]
    fn test_superscript_decoding() {
        assert_eq!(parse_superscript("³"), Some(3));
        assert_eq!(parse_superscript("⁻²"), Some(-2));
        assert_eq!(parse_superscript("3"), None);
    }
}
