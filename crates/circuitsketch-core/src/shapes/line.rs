//! Straight line segment.

use super::geometry::point_to_segment_dist;
use super::json;
use super::{ShapeBase, ShapeStyle, ShapeTrait, assign_point, edit_number, edit_position};
use crate::error::ShapeResult;
use crate::handles::{Affordance, node_handles};
use crate::surface::{Surface, apply_style};
use crate::validate::{self, EditPatch};
use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value, json};

/// A line segment between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    base: ShapeBase,
    start: Point,
    end: Point,
    style: ShapeStyle,
}

impl Default for Line {
    fn default() -> Self {
        Self::new(Point::ZERO, Point::ZERO)
    }
}

impl Line {
    pub const TYPE: &'static str = "Line";

    pub fn new(start: Point, end: Point) -> Self {
        Self {
            base: ShapeBase::new(),
            start,
            end,
            style: ShapeStyle::default(),
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn set_start(&mut self, point: Point) -> bool {
        assign_point(&mut self.start, "start", point)
    }

    pub fn set_end(&mut self, point: Point) -> bool {
        assign_point(&mut self.end, "end", point)
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).hypot()
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    pub fn from_json(value: &Value) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let mut line = Self {
            base: ShapeBase::from_json(obj)?,
            ..Self::default()
        };
        line.edit(obj);
        Ok(line)
    }
}

impl ShapeTrait for Line {
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
        self.start
    }

    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point) -> bool {
        let tolerance = self.style.line_width() / 2.0 + self.hit_margin();
        point_to_segment_dist(point, self.start, self.end) <= tolerance
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        surface.save();
        apply_style(surface, &self.style);
        surface.begin_path();
        surface.move_to(self.start + offset);
        surface.line_to(self.end + offset);
        surface.stroke();
        surface.restore();
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        node_handles(&[self.start + offset, self.end + offset])
    }

    fn move_by(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }

    fn edit(&mut self, patch: &EditPatch) {
        self.base.edit(patch);
        self.style.edit(patch);
        edit_position(&mut self.start, patch);
        if let Some(value) = patch.get("endX") {
            edit_number(&mut self.end.x, "endX", value, validate::is_finite);
        }
        if let Some(value) = patch.get("endY") {
            edit_number(&mut self.end.y, "endY", value, validate::is_finite);
        }
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.base.write_json(Self::TYPE, &mut map);
        map.insert("x".into(), json!(self.start.x));
        map.insert("y".into(), json!(self.start.y));
        map.insert("endX".into(), json!(self.end.x));
        map.insert("endY".into(), json!(self.end.y));
        self.style.write_json(&mut map);
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_log;

    #[test]
    fn test_line_hit_within_half_width_plus_margin() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!(line.hit_test(Point::new(5.0, 2.0)));
        assert!(line.hit_test(Point::new(5.0, 5.5)));
        assert!(!line.hit_test(Point::new(5.0, 10.0)));
    }

    #[test]
    fn test_line_edit_endpoints() {
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let patch = json!({"x": 2, "endY": "4"});
        line.edit(patch.as_object().unwrap());
        assert_eq!(line.start(), Point::new(2.0, 0.0));
        assert_eq!(line.end(), Point::new(10.0, 4.0));
    }

    #[test]
    fn test_line_rejects_non_finite_endpoint() {
        let capture = test_log::capture();
        let mut line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!(!line.set_end(Point::new(f64::NAN, 0.0)));
        assert_eq!(line.end(), Point::new(10.0, 0.0));
        assert_eq!(capture.warnings().len(), 1);
    }

    #[test]
    fn test_line_bounds_normalized() {
        let line = Line::new(Point::new(10.0, 8.0), Point::new(2.0, 1.0));
        assert_eq!(line.bounds(), Rect::new(2.0, 1.0, 10.0, 8.0));
        assert!((line.length() - (113.0f64).sqrt()).abs() < 1e-9);
    }
}
