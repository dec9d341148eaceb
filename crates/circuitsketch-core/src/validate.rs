//! Coercion and range validation for mutable properties.
//!
//! Every setter in the shape family funnels through these helpers. A
//! rejected value leaves the field untouched and logs exactly one warning
//! naming the field, the rejected value and the value that was kept.

use serde_json::{Map, Value};
use std::fmt::Display;

/// A partial update keyed by property name, as produced by the properties
/// tool or read back from serialized JSON.
pub type EditPatch = Map<String, Value>;

/// Log a rejected assignment.
pub(crate) fn reject(field: &str, value: impl Display, kept: impl Display) {
    log::warn!("rejected {field} = {value}; keeping {kept}");
}

/// Coerce a JSON value to a finite number. Numeric strings are accepted.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Coerce a JSON value to a boolean. Accepts `true`/`false` strings.
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Coerce a JSON value to a string. Numbers are stringified.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn is_finite(v: f64) -> bool {
    v.is_finite()
}

pub(crate) fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

pub(crate) fn is_non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

/// Assign `value` to `slot` if it passes `valid`, otherwise log and keep.
pub(crate) fn assign(slot: &mut f64, field: &str, value: f64, valid: fn(f64) -> bool) -> bool {
    if valid(value) {
        *slot = value;
        true
    } else {
        reject(field, value, *slot);
        false
    }
}

/// Read a number out of a patch entry, logging if it cannot be coerced.
pub(crate) fn patch_number(field: &str, value: &Value, current: impl Display) -> Option<f64> {
    let number = coerce_number(value);
    if number.is_none() {
        reject(field, value, current);
    }
    number
}

/// Read a boolean out of a patch entry, logging if it cannot be coerced.
pub(crate) fn patch_bool(field: &str, value: &Value, current: bool) -> Option<bool> {
    let flag = coerce_bool(value);
    if flag.is_none() {
        reject(field, value, current);
    }
    flag
}

/// Read a string out of a patch entry, logging if it cannot be coerced.
pub(crate) fn patch_string(field: &str, value: &Value, current: &str) -> Option<String> {
    let text = coerce_string(value);
    if text.is_none() {
        reject(field, value, current);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_log;
    use serde_json::json;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(3.5)), Some(3.5));
        assert_eq!(coerce_number(&json!(" 12 ")), Some(12.0));
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
    }

    #[test]
    fn test_coerce_bool_and_string() {
        assert_eq!(coerce_bool(&json!(true)), Some(true));
        assert_eq!(coerce_bool(&json!("false")), Some(false));
        assert_eq!(coerce_bool(&json!(1)), None);
        assert_eq!(coerce_string(&json!(4)), Some("4".to_string()));
        assert_eq!(coerce_string(&json!([1])), None);
    }

    #[test]
    fn test_assign_rejects_and_warns_once() {
        let capture = test_log::capture();
        let mut width = 10.0;
        assert!(!assign(&mut width, "width", f64::NAN, is_positive));
        assert!((width - 10.0).abs() < f64::EPSILON);
        assert_eq!(capture.warnings().len(), 1);
        assert!(capture.warnings()[0].contains("width"));

        assert!(assign(&mut width, "width", 4.0, is_positive));
        assert!((width - 4.0).abs() < f64::EPSILON);
        assert_eq!(capture.warnings().len(), 1);
    }
}
