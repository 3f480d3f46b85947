//! Lenient coercion of text cells and JSON values into record fields
//!
//! Numbers are read the way a browser's `parseFloat` reads them: leading
//! whitespace is skipped, the longest numeric prefix is used and anything
//! after it is ignored. No numeric prefix at all yields NaN, which callers
//! treat as a parse failure.

use serde_json::Value;

/// Parses the longest numeric prefix of `text`, NaN if there is none
pub fn parse_number(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    let sign = if negative { -1.0 } else { 1.0 };

    if s[i..].starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = &s[int_start..i];

    let mut frac_digits = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if !int_digits.is_empty() || j > frac_start {
            frac_digits = &s[frac_start..j];
            i = j;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return f64::NAN;
    }

    let mut exponent = String::new();
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        let mut exp_sign = "";
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            exp_sign = &s[j..j + 1];
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            exponent = format!("e{}{}", exp_sign, &s[exp_start..j]);
        }
    }

    let normalized = format!(
        "{}{}.{}{}",
        if negative { "-" } else { "" },
        if int_digits.is_empty() { "0" } else { int_digits },
        if frac_digits.is_empty() { "0" } else { frac_digits },
        exponent
    );
    normalized.parse::<f64>().unwrap_or(f64::NAN)
}

/// Numeric value of a JSON field: numbers as-is, strings coerced, anything else NaN.
/// Literals too large for an `f64` come out infinite.
pub fn number_from_json(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_else(|| parse_number(&n.to_string())),
        Value::String(s) => parse_number(s),
        _ => f64::NAN,
    }
}

/// Text of a JSON field; scalars are rendered, null and containers are rejected
pub fn text_from_json(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_number("31.5"), 31.5);
        assert_eq!(parse_number("-74"), -74.0);
        assert_eq!(parse_number("+2.5"), 2.5);
        assert_eq!(parse_number("12000000"), 12_000_000.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("5."), 5.0);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number("2.5E-1"), 0.25);
    }

    #[test]
    fn test_prefix_and_whitespace() {
        assert_eq!(parse_number("  42  "), 42.0);
        assert_eq!(parse_number("\t7.25kg"), 7.25);
        assert_eq!(parse_number("12abc"), 12.0);
        assert_eq!(parse_number("3e"), 3.0);
        assert_eq!(parse_number("3e+"), 3.0);
        assert_eq!(parse_number("1.2.3"), 1.2);
    }

    #[test]
    fn test_failures_are_nan() {
        for text in ["", "   ", "abc", "nan", "NaN", "-", ".", "e5", "inf", "-.e1"] {
            assert!(parse_number(text).is_nan(), "expected NaN for {:?}", text);
        }
    }

    #[test]
    fn test_infinity() {
        assert_eq!(parse_number("Infinity"), f64::INFINITY);
        assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(parse_number("1e999"), f64::INFINITY);
    }

    #[test]
    fn test_json_values() {
        assert_eq!(number_from_json(&json!(24.8)), 24.8);
        assert_eq!(number_from_json(&json!("67.0")), 67.0);
        assert!(number_from_json(&json!(null)).is_nan());
        assert!(number_from_json(&json!(true)).is_nan());
        assert!(number_from_json(&json!([1])).is_nan());

        let huge: Value = serde_json::from_str("-1e400").unwrap();
        assert_eq!(number_from_json(&huge), f64::NEG_INFINITY);

        assert_eq!(text_from_json(&json!("Karachi")), Some("Karachi".to_string()));
        assert_eq!(text_from_json(&json!(42)), Some("42".to_string()));
        assert_eq!(text_from_json(&json!(null)), None);
        assert_eq!(text_from_json(&json!({"name": "x"})), None);
    }
}
