//! Helpers for reading and writing the JSON shape format.

use crate::error::{ShapeError, ShapeResult};
use crate::validate;
use kurbo::Point;
use serde_json::{Map, Value, json};

/// Borrow `value` as an object or fail with a contract violation.
pub(crate) fn object(value: &Value) -> ShapeResult<&Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        let kind = match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        };
        ShapeError::NotAnObject(kind.to_string())
    })
}

/// The `type` tag of a serialized shape.
pub(crate) fn type_tag(obj: &Map<String, Value>) -> ShapeResult<&str> {
    obj.get("type")
        .ok_or(ShapeError::MissingField("type"))?
        .as_str()
        .ok_or(ShapeError::MalformedField {
            field: "type",
            reason: "expected a string".into(),
        })
}

/// Check the `type` tag against the subtype being reconstructed.
pub(crate) fn expect_type<'a>(
    value: &'a Value,
    expected: &'static str,
) -> ShapeResult<&'a Map<String, Value>> {
    let obj = object(value)?;
    let found = type_tag(obj)?;
    if found != expected {
        return Err(ShapeError::TypeMismatch {
            expected,
            found: found.to_string(),
        });
    }
    Ok(obj)
}

/// Parse a point list encoded as `[[x, y], ...]` or `[{"x":..,"y":..}, ...]`.
pub(crate) fn points(obj: &Map<String, Value>, field: &'static str) -> ShapeResult<Vec<Point>> {
    let Some(value) = obj.get(field) else {
        return Ok(Vec::new());
    };
    parse_points(value).map_err(|reason| ShapeError::MalformedField { field, reason })
}

pub(crate) fn parse_points(value: &Value) -> Result<Vec<Point>, String> {
    let items = value.as_array().ok_or_else(|| "expected an array".to_string())?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_point(item).ok_or_else(|| format!("entry {i} is not a finite point")))
        .collect()
}

fn parse_point(item: &Value) -> Option<Point> {
    let (x, y) = match item {
        Value::Array(pair) if pair.len() == 2 => (&pair[0], &pair[1]),
        Value::Object(map) => (map.get("x")?, map.get("y")?),
        _ => return None,
    };
    Some(Point::new(
        validate::coerce_number(x)?,
        validate::coerce_number(y)?,
    ))
}

pub(crate) fn points_json(points: &[Point]) -> Value {
    Value::Array(points.iter().map(|p| json!([p.x, p.y])).collect())
}
