//! Built-in rule types
//!
//! Every [`RuleRegistry`](crate::RuleRegistry) starts with these registered.

use serde_json::Value;

use crate::coerce;

/// Registry name of [`required`]
pub const REQUIRED: &str = "required";

/// Registry name of [`number`]
pub const NUMBER: &str = "number";

/// Fails when the field is absent, null, or the empty string.
///
/// `0`, `false` and whitespace-only strings count as present.
pub fn required(key: &str, value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(format!("{key} should not be null")),
        Some(Value::String(s)) if s.is_empty() => Some(format!("{key} should not be null")),
        Some(_) => None,
    }
}

/// Fails when the field does not coerce to a number.
///
/// See [`coerce::to_number`] for the accepted forms.
pub fn number(key: &str, value: Option<&Value>) -> Option<String> {
    if coerce::is_numeric(value) {
        None
    } else {
        Some(format!("{key} should be a number"))
    }
}
