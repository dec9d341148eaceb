//! Quadratic curve through a start, control and end point.

use super::geometry::{point_to_polyline_dist, points_bounds, quad_bounds, rect_contains, sample_quad};
use super::json;
use super::{ShapeBase, ShapeStyle, ShapeTrait, assign_point, edit_number, edit_position};
use crate::config::DEFAULT_CURVE_SAMPLES;
use crate::error::ShapeResult;
use crate::handles::{Affordance, node_handles};
use crate::surface::{Surface, apply_style};
use crate::validate::{self, EditPatch};
use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value, json};

/// A quadratic Bézier defined by three points.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreePointCurve {
    base: ShapeBase,
    start: Point,
    control: Point,
    end: Point,
    samples: usize,
    style: ShapeStyle,
}

impl Default for ThreePointCurve {
    fn default() -> Self {
        Self::new(Point::ZERO, Point::ZERO, Point::ZERO)
    }
}

impl ThreePointCurve {
    pub const TYPE: &'static str = "ThreePointCurve";

    pub fn new(start: Point, control: Point, end: Point) -> Self {
        Self {
            base: ShapeBase::new(),
            start,
            control,
            end,
            samples: DEFAULT_CURVE_SAMPLES,
            style: ShapeStyle::default(),
        }
    }

    /// Set the number of parameter steps used for hit-testing.
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples.max(2);
        self
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn control(&self) -> Point {
        self.control
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn set_start(&mut self, point: Point) -> bool {
        assign_point(&mut self.start, "start", point)
    }

    pub fn set_control(&mut self, point: Point) -> bool {
        assign_point(&mut self.control, "control", point)
    }

    pub fn set_end(&mut self, point: Point) -> bool {
        assign_point(&mut self.end, "end", point)
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    /// Sampled polyline approximation of the curve.
    pub fn flatten(&self) -> Vec<Point> {
        sample_quad(self.start, self.control, self.end, self.samples)
    }

    pub fn from_json(value: &Value) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let mut curve = Self {
            base: ShapeBase::from_json(obj)?,
            ..Self::default()
        };
        curve.edit(obj);
        Ok(curve)
    }
}

impl ShapeTrait for ThreePointCurve {
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
        quad_bounds(self.start, self.control, self.end)
    }

    fn hit_test(&self, point: Point) -> bool {
        let tolerance = self.style.line_width() / 2.0 + self.hit_margin();
        // The hull of the control points always contains the curve.
        let hull = points_bounds(&[self.start, self.control, self.end]).inflate(tolerance, tolerance);
        if !rect_contains(hull, point) {
            return false;
        }
        point_to_polyline_dist(point, &self.flatten()) <= tolerance
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        surface.save();
        apply_style(surface, &self.style);
        surface.begin_path();
        surface.move_to(self.start + offset);
        surface.quad_to(self.control + offset, self.end + offset);
        surface.stroke();
        surface.restore();
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        node_handles(&[self.start + offset, self.control + offset, self.end + offset])
    }

    fn move_by(&mut self, delta: Vec2) {
        self.start += delta;
        self.control += delta;
        self.end += delta;
    }

    fn edit(&mut self, patch: &EditPatch) {
        self.base.edit(patch);
        self.style.edit(patch);
        edit_position(&mut self.start, patch);
        let fields = [
            ("controlX", &mut self.control.x),
            ("controlY", &mut self.control.y),
            ("endX", &mut self.end.x),
            ("endY", &mut self.end.y),
        ];
        for (field, slot) in fields {
            if let Some(value) = patch.get(field) {
                edit_number(slot, field, value, validate::is_finite);
            }
        }
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.base.write_json(Self::TYPE, &mut map);
        map.insert("x".into(), json!(self.start.x));
        map.insert("y".into(), json!(self.start.y));
        map.insert("controlX".into(), json!(self.control.x));
        map.insert("controlY".into(), json!(self.control.y));
        map.insert("endX".into(), json!(self.end.x));
        map.insert("endY".into(), json!(self.end.y));
        self.style.write_json(&mut map);
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arch() -> ThreePointCurve {
        ThreePointCurve::new(Point::new(0.0, 0.0), Point::new(50.0, 100.0), Point::new(100.0, 0.0))
    }

    #[test]
    fn test_curve_hit_near_apex() {
        let curve = arch();
        // Apex of the curve is at t = 0.5: (50, 50).
        assert!(curve.hit_test(Point::new(50.0, 52.0)));
        assert!(!curve.hit_test(Point::new(50.0, 80.0)));
    }

    #[test]
    fn test_curve_prereject_outside_hull() {
        let curve = arch();
        assert!(!curve.hit_test(Point::new(-20.0, 0.0)));
        assert!(!curve.hit_test(Point::new(50.0, 120.0)));
    }

    #[test]
    fn test_curve_bounds_are_tight() {
        let b = arch().bounds();
        assert!((b.y1 - 50.0).abs() < 1e-9);
        assert!((b.x1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_curve_samples_floor() {
        let curve = arch().with_samples(0);
        assert_eq!(curve.flatten().len(), 3);
    }
}
