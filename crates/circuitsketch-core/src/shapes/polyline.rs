//! Open or closed chain of straight segments.

use super::geometry::{point_to_polyline_dist, points_bounds};
use super::json;
use super::{
    ShapeBase, ShapeStyle, ShapeTrait, edit_chain_position, push_chain_point, set_chain_point,
    trace_chain,
};
use crate::error::ShapeResult;
use crate::handles::{Affordance, node_handles};
use crate::surface::{Surface, apply_style, paint_path};
use crate::validate::{self, EditPatch};
use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value, json};

/// A polyline through an ordered list of points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyLine {
    base: ShapeBase,
    points: Vec<Point>,
    closed: bool,
    style: ShapeStyle,
}

impl PolyLine {
    pub const TYPE: &'static str = "PolyLine";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        let mut line = Self::new();
        for p in points {
            line.push_point(p);
        }
        line
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

    /// Drop the last point, returning it.
    pub fn pop_point(&mut self) -> Option<Point> {
        self.points.pop()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn outline(&self) -> Vec<Point> {
        let mut outline = self.points.clone();
        if self.closed && self.points.len() > 2 {
            outline.push(self.points[0]);
        }
        outline
    }

    pub fn from_json(value: &Value) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let mut line = Self {
            base: ShapeBase::from_json(obj)?,
            points: json::points(obj, "points")?,
            ..Self::default()
        };
        line.edit(obj);
        Ok(line)
    }
}

impl ShapeTrait for PolyLine {
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
        point_to_polyline_dist(point, &self.outline()) <= tolerance
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        if self.points.len() < 2 {
            return;
        }
        surface.save();
        apply_style(surface, &self.style);
        surface.begin_path();
        trace_chain(surface, &self.points, offset);
        if self.closed {
            surface.close_path();
            paint_path(surface, &self.style);
        } else {
            surface.stroke();
        }
        surface.restore();
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        let moved: Vec<Point> = self.points.iter().map(|p| *p + offset).collect();
        node_handles(&moved)
    }

    fn move_by(&mut self, delta: Vec2) {
        super::geometry::translate_points(&mut self.points, delta);
    }

    fn edit(&mut self, patch: &EditPatch) {
        self.base.edit(patch);
        self.style.edit(patch);
        edit_chain_position(&mut self.points, patch);
        if let Some(value) = patch.get("closed") {
            if let Some(closed) = validate::patch_bool("closed", value, self.closed) {
                self.closed = closed;
            }
        }
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.base.write_json(Self::TYPE, &mut map);
        let origin = self.position();
        map.insert("x".into(), json!(origin.x));
        map.insert("y".into(), json!(origin.y));
        map.insert("points".into(), json::points_json(&self.points));
        map.insert("closed".into(), json!(self.closed));
        self.style.write_json(&mut map);
        Value::Object(map)
    }
}
