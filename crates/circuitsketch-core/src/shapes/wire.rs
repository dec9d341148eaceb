//! Wires connecting component terminals.

use super::geometry::{point_to_polyline_dist, points_bounds, translate_points};
use super::json;
use super::{
    ShapeBase, ShapeId, ShapeStyle, ShapeTrait, edit_chain_position, push_chain_point,
    set_chain_point, trace_chain,
};
use crate::component::TerminalId;
use crate::error::{ShapeError, ShapeResult};
use crate::handles::{Affordance, node_handles};
use crate::surface::{Surface, apply_style};
use crate::validate::EditPatch;
use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value, json};
use uuid::Uuid;

/// One end of a wire attached to a component terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalRef {
    pub component: ShapeId,
    pub terminal: TerminalId,
}

impl TerminalRef {
    pub fn new(component: ShapeId, terminal: TerminalId) -> Self {
        Self { component, terminal }
    }

    fn to_json(self) -> Value {
        json!({
            "component": self.component.to_string(),
            "terminal": self.terminal.to_string(),
        })
    }

    fn from_json(value: &Value, field: &'static str) -> ShapeResult<Option<Self>> {
        let malformed = |reason: &str| ShapeError::MalformedField {
            field,
            reason: reason.to_string(),
        };
        let obj = match value {
            Value::Null => return Ok(None),
            Value::Object(obj) => obj,
            _ => return Err(malformed("expected an object or null")),
        };
        let id = |key: &str| -> ShapeResult<Uuid> {
            obj.get(key)
                .and_then(Value::as_str)
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or_else(|| malformed(&format!("`{key}` is not a valid id")))
        };
        Ok(Some(Self::new(id("component")?, id("terminal")?)))
    }
}

/// A wire drawn through a list of points. Either end may be attached to a
/// component terminal, in which case that end follows the terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    base: ShapeBase,
    points: Vec<Point>,
    start: Option<TerminalRef>,
    end: Option<TerminalRef>,
    style: ShapeStyle,
}

impl Default for Wire {
    fn default() -> Self {
        let mut style = ShapeStyle::default();
        style.set_line_width(Self::DEFAULT_WIDTH);
        Self {
            base: ShapeBase::new(),
            points: Vec::new(),
            start: None,
            end: None,
            style,
        }
    }
}

impl Wire {
    pub const TYPE: &'static str = "Wire";
    pub const DEFAULT_WIDTH: f64 = 2.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        let mut wire = Self::new();
        for p in points {
            wire.push_point(p);
        }
        wire
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn push_point(&mut self, point: Point) -> bool {
        push_chain_point(&mut self.points, point)
    }

    pub fn set_point(&mut self, index: usize, point: Point) -> bool {
        set_chain_point(&mut self.points, index, point)
    }

    pub fn start_terminal(&self) -> Option<TerminalRef> {
        self.start
    }

    pub fn end_terminal(&self) -> Option<TerminalRef> {
        self.end
    }

    pub fn connect_start(&mut self, terminal: TerminalRef) {
        self.start = Some(terminal);
    }

    pub fn connect_end(&mut self, terminal: TerminalRef) {
        self.end = Some(terminal);
    }

    /// Detach both ends.
    pub fn disconnect(&mut self) {
        self.start = None;
        self.end = None;
    }

    /// Detach the first point. Returns the terminal it was attached to.
    pub fn disconnect_start(&mut self) -> Option<TerminalRef> {
        self.start.take()
    }

    pub fn disconnect_end(&mut self) -> Option<TerminalRef> {
        self.end.take()
    }

    /// Detach any end attached to `component`.
    pub fn disconnect_component(&mut self, component: ShapeId) {
        if self.start.is_some_and(|t| t.component == component) {
            self.start = None;
        }
        if self.end.is_some_and(|t| t.component == component) {
            self.end = None;
        }
    }

    pub fn is_attached_to(&self, component: ShapeId) -> bool {
        [self.start, self.end]
            .iter()
            .flatten()
            .any(|t| t.component == component)
    }

    /// Move the first point.
    pub fn set_start_point(&mut self, point: Point) -> bool {
        self.set_point(0, point)
    }

    /// Move the last point.
    pub fn set_end_point(&mut self, point: Point) -> bool {
        match self.points.len() {
            0 => false,
            n => self.set_point(n - 1, point),
        }
    }

    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).hypot()).sum()
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    pub fn from_json(value: &Value) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let mut wire = Self {
            base: ShapeBase::from_json(obj)?,
            points: json::points(obj, "points")?,
            ..Self::default()
        };
        if let Some(v) = obj.get("startTerminal") {
            wire.start = TerminalRef::from_json(v, "startTerminal")?;
        }
        if let Some(v) = obj.get("endTerminal") {
            wire.end = TerminalRef::from_json(v, "endTerminal")?;
        }
        wire.edit(obj);
        Ok(wire)
    }
}

impl ShapeTrait for Wire {
    fn base(&self) -> &ShapeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn position(&self) -> Point {
        self.points.first().copied().unwrap_or(Point::ZERO)
    }

    fn bounds(&self) -> Rect {
        points_bounds(&self.points)
    }

    fn hit_test(&self, point: Point) -> bool {
        let tolerance = self.style.line_width() / 2.0 + self.hit_margin();
        point_to_polyline_dist(point, &self.points) <= tolerance
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        if self.points.len() < 2 {
            return;
        }
        surface.save();
        apply_style(surface, &self.style);
        surface.begin_path();
        trace_chain(surface, &self.points, offset);
        surface.stroke();

        // Junction dots on attached ends.
        let dot = self.style.line_width() * 1.5;
        surface.set_fill(self.style.stroke());
        let attached = [
            (self.start.is_some(), self.points.first()),
            (self.end.is_some(), self.points.last()),
        ];
        for p in attached.into_iter().filter_map(|(on, p)| on.then_some(p).flatten()) {
            surface.begin_path();
            surface.arc(*p + offset, dot, 0.0, std::f64::consts::TAU);
            surface.fill();
        }
        surface.restore();
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        let moved: Vec<Point> = self.points.iter().map(|p| *p + offset).collect();
        node_handles(&moved)
    }

    fn move_by(&mut self, delta: Vec2) {
        translate_points(&mut self.points, delta);
    }

    fn edit(&mut self, patch: &EditPatch) {
        self.base.edit(patch);
        self.style.edit(patch);
        edit_chain_position(&mut self.points, patch);
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.base.write_json(Self::TYPE, &mut map);
        let origin = self.position();
        map.insert("x".into(), json!(origin.x));
        map.insert("y".into(), json!(origin.y));
        map.insert("points".into(), json::points_json(&self.points));
        map.insert(
            "startTerminal".into(),
            self.start.map(TerminalRef::to_json).unwrap_or(Value::Null),
        );
        map.insert(
            "endTerminal".into(),
            self.end.map(TerminalRef::to_json).unwrap_or(Value::Null),
        );
        self.style.write_json(&mut map);
        Value::Object(map)
    }
}
