//! Connection points owned by a component.

use crate::error::{ShapeError, ShapeResult};
use crate::shapes::ShapeId;
use crate::validate;
use kurbo::Point;
use serde_json::{Value, json};
use uuid::Uuid;

/// Unique identifier for terminals.
pub type TerminalId = Uuid;

/// A named anchor positioned relative to its component's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Terminal {
    id: TerminalId,
    name: String,
    offset: Point,
    wires: Vec<ShapeId>,
}

impl Terminal {
    pub fn new(name: impl Into<String>, offset: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            offset,
            wires: Vec::new(),
        }
    }

    pub fn id(&self) -> TerminalId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.trim().is_empty() {
            validate::reject("terminal.name", "\"\"", &self.name);
            return false;
        }
        self.name = name;
        true
    }

    /// Position relative to the component's top-left corner.
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Point) -> bool {
        if offset.is_finite() {
            self.offset = offset;
            true
        } else {
            validate::reject("terminal.offset", format!("{offset:?}"), format!("{:?}", self.offset));
            false
        }
    }

    /// Wires attached to this terminal.
    pub fn wires(&self) -> &[ShapeId] {
        &self.wires
    }

    pub fn is_connected(&self) -> bool {
        !self.wires.is_empty()
    }

    pub fn connect_wire(&mut self, wire: ShapeId) {
        if !self.wires.contains(&wire) {
            self.wires.push(wire);
        }
    }

    pub fn disconnect_wire(&mut self, wire: ShapeId) -> bool {
        let before = self.wires.len();
        self.wires.retain(|w| *w != wire);
        self.wires.len() != before
    }

    /// Fresh identity with no attached wires.
    pub(crate) fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
        self.wires.clear();
    }

    pub(crate) fn to_json(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "name": self.name,
            "x": self.offset.x,
            "y": self.offset.y,
            "wires": self.wires.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        })
    }

    pub(crate) fn from_json(value: &Value) -> ShapeResult<Self> {
        let malformed = |reason: String| ShapeError::MalformedField {
            field: "terminals",
            reason,
        };
        let obj = value
            .as_object()
            .ok_or_else(|| malformed("terminal is not an object".into()))?;
        let parse_id = |s: &Value| {
            s.as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or_else(|| malformed(format!("invalid id {s}")))
        };
        let mut terminal = Terminal::new("", Point::ZERO);
        if let Some(id) = obj.get("id") {
            terminal.id = parse_id(id)?;
        }
        let coord = |key: &str| {
            obj.get(key)
                .and_then(validate::coerce_number)
                .ok_or_else(|| malformed(format!("terminal `{key}` is not a finite number")))
        };
        terminal.offset = Point::new(coord("x")?, coord("y")?);
        terminal.name = obj
            .get("name")
            .and_then(validate::coerce_string)
            .unwrap_or_default();
        if let Some(wires) = obj.get("wires") {
            let wires = wires
                .as_array()
                .ok_or_else(|| malformed("`wires` is not an array".into()))?;
            terminal.wires = wires.iter().map(parse_id).collect::<ShapeResult<_>>()?;
        }
        Ok(terminal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_registration_is_deduplicated() {
        let mut t = Terminal::new("a", Point::new(0.0, 5.0));
        let wire = Uuid::new_v4();
        t.connect_wire(wire);
        t.connect_wire(wire);
        assert_eq!(t.wires().len(), 1);
        assert!(t.disconnect_wire(wire));
        assert!(!t.is_connected());
    }

    #[test]
    fn test_terminal_json() {
        let mut t = Terminal::new("out", Point::new(60.0, 20.0));
        t.connect_wire(Uuid::new_v4());
        let rebuilt = Terminal::from_json(&t.to_json()).unwrap();
        assert_eq!(rebuilt, t);
        assert!(Terminal::from_json(&json!({"x": "left", "y": 0})).is_err());
    }

    #[test]
    fn test_regenerate_clears_wires() {
        let mut t = Terminal::new("in", Point::ZERO);
        let id = t.id();
        t.connect_wire(Uuid::new_v4());
        t.regenerate_id();
        assert_ne!(t.id(), id);
        assert!(!t.is_connected());
    }
}
