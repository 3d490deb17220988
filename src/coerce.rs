//! Loose numeric coercion of JSON values
//!
//! Form inputs usually arrive as strings, so the `number` rule accepts
//! anything that converts to a number the way a form field would: `"42"`,
//! `" 3.14 "`, `"0x1f"` and `""` all convert, `"abc"` and `{}` do not.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

fn decimal_literal() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)$")
            .expect("decimal literal pattern is valid")
    })
}

fn radix_literal() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^0(?:[xX](?P<hex>[0-9a-fA-F]+)|[oO](?P<oct>[0-7]+)|[bB](?P<bin>[01]+))$")
            .expect("radix literal pattern is valid")
    })
}

/// Convert a field value to a number.
///
/// `None` is an absent field and always converts to NaN. The result is NaN
/// whenever the value has no numeric reading.
pub fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => str_to_number(s),
        Some(v @ Value::Array(_)) => str_to_number(&to_display_string(v)),
        Some(Value::Object(_)) => f64::NAN,
    }
}

/// Whether [`to_number`] yields a non-NaN result.
pub fn is_numeric(value: Option<&Value>) -> bool {
    !to_number(value).is_nan()
}

/// Convert a string to a number.
///
/// Surrounding whitespace is ignored and a blank string is zero. Accepts
/// signed decimal literals with optional exponent, `Infinity`, and unsigned
/// hexadecimal, octal and binary integer literals.
pub fn str_to_number(s: &str) -> f64 {
    let s = s.trim_matches(is_numeric_padding);
    if s.is_empty() {
        return 0.0;
    }

    if decimal_literal().is_match(s) {
        return match s {
            "Infinity" | "+Infinity" => f64::INFINITY,
            "-Infinity" => f64::NEG_INFINITY,
            _ => s.parse().unwrap_or(f64::NAN),
        };
    }

    match radix_literal().captures(s) {
        Some(caps) => {
            let (digits, radix) = if let Some(m) = caps.name("hex") {
                (m.as_str(), 16)
            } else if let Some(m) = caps.name("oct") {
                (m.as_str(), 8)
            } else if let Some(m) = caps.name("bin") {
                (m.as_str(), 2)
            } else {
                return f64::NAN;
            };
            digits.chars().fold(0.0, |acc, c| {
                acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
            })
        }
        None => f64::NAN,
    }
}

/// Characters skipped around a numeric string: tab, vertical tab, form feed,
/// space separators, the byte order mark, and line terminators. U+0085 is
/// not among them.
fn is_numeric_padding(c: char) -> bool {
    matches!(
        c,
        '\t' | '\u{b}' | '\u{c}' | ' ' | '\u{a0}' | '\u{feff}'
            | '\n' | '\r' | '\u{2028}' | '\u{2029}'
            | '\u{1680}' | '\u{2000}'..='\u{200a}' | '\u{202f}' | '\u{205f}' | '\u{3000}'
    )
}

/// String form of a value as used for array coercion: null is empty,
/// arrays join their elements with commas, objects have no numeric form.
fn to_display_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(to_display_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn num(v: Value) -> f64 {
        to_number(Some(&v))
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(num(json!("42")), 42.0);
        assert_eq!(num(json!("2.75")), 2.75);
        assert_eq!(num(json!("  -7 ")), -7.0);
        assert_eq!(num(json!(".5")), 0.5);
        assert_eq!(num(json!("5.")), 5.0);
        assert_eq!(num(json!("1e3")), 1000.0);
        assert_eq!(num(json!("0x1f")), 31.0);
        assert_eq!(num(json!("0o17")), 15.0);
        assert_eq!(num(json!("0b101")), 5.0);
        assert_eq!(num(json!("-Infinity")), f64::NEG_INFINITY);
    }

    #[test]
    fn test_non_numeric_strings() {
        for s in ["abc", "12px", "inf", "NaN", "infinity", "-0x10", "1,2", "1e", "."] {
            assert!(num(json!(s)).is_nan(), "{s:?} should not be numeric");
        }
    }

    #[test]
    fn test_blank_string_is_zero() {
        assert_eq!(num(json!("")), 0.0);
        assert_eq!(num(json!("   ")), 0.0);
    }

    #[test]
    fn test_padding_characters() {
        assert_eq!(num(json!("\u{a0}5\u{3000}")), 5.0);
        assert_eq!(num(json!("\u{feff}\t5\r\n")), 5.0);
        assert_eq!(num(json!("\u{2028}")), 0.0);
        assert!(num(json!("\u{85}5")).is_nan());
        assert!(num(json!("5\u{85}")).is_nan());
        assert!(num(json!("\u{200b}5")).is_nan());
    }

    #[test]
    fn test_non_string_values() {
        assert!(to_number(None).is_nan());
        assert_eq!(num(Value::Null), 0.0);
        assert_eq!(num(json!(true)), 1.0);
        assert_eq!(num(json!(false)), 0.0);
        assert_eq!(num(json!(42)), 42.0);
        assert!(num(json!({})).is_nan());
    }

    #[test]
    fn test_arrays() {
        assert_eq!(num(json!([])), 0.0);
        assert_eq!(num(json!(["8"])), 8.0);
        assert_eq!(num(json!([[3]])), 3.0);
        assert_eq!(num(json!([null])), 0.0);
        assert!(num(json!([1, 2])).is_nan());
        assert!(num(json!([{}])).is_nan());
    }
}
