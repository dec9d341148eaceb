//! Freehand pen stroke.

use super::geometry::{point_to_polyline_dist, points_bounds, rdp_simplify, translate_points};
use super::json;
use super::{ShapeBase, ShapeStyle, ShapeTrait, edit_chain_position, push_chain_point, set_chain_point};
use crate::error::ShapeResult;
use crate::handles::{Affordance, HandleBox};
use crate::surface::{Surface, apply_style};
use crate::validate::EditPatch;
use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value, json};

/// A freehand stroke made of sampled pointer positions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Freehand {
    base: ShapeBase,
    points: Vec<Point>,
    style: ShapeStyle,
}

impl Freehand {
    pub const TYPE: &'static str = "Freehand";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        let mut stroke = Self::new();
        for p in points {
            stroke.push_point(p);
        }
        stroke
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

    /// Reduce the sample count with Douglas-Peucker. A tolerance of zero
    /// leaves the stroke untouched.
    pub fn simplify(&mut self, tolerance: f64) {
        if tolerance > 0.0 {
            self.points = rdp_simplify(&self.points, tolerance);
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    pub fn from_json(value: &Value) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let mut stroke = Self {
            base: ShapeBase::from_json(obj)?,
            points: json::points(obj, "points")?,
            ..Self::default()
        };
        stroke.edit(obj);
        Ok(stroke)
    }
}

impl ShapeTrait for Freehand {
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
        let [first, rest @ ..] = self.points.as_slice() else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        surface.save();
        apply_style(surface, &self.style);
        surface.begin_path();
        surface.move_to(*first + offset);
        // Smooth through segment midpoints, using samples as control points.
        for pair in self.points.windows(2).skip(1) {
            let mid = pair[0].midpoint(pair[1]);
            surface.quad_to(pair[0] + offset, mid + offset);
        }
        if let Some(last) = rest.last() {
            surface.line_to(*last + offset);
        }
        surface.stroke();
        surface.restore();
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        vec![Affordance::Box(HandleBox::around(self.bounds() + offset))]
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
        self.style.write_json(&mut map);
        Value::Object(map)
    }
}
