//! Point marker shape.

use super::json;
use super::{ShapeBase, ShapeStyle, ShapeTrait, assign_point, edit_number, edit_position};
use crate::error::ShapeResult;
use crate::handles::{Affordance, node_handles};
use crate::surface::{Surface, apply_style};
use crate::validate::{self, EditPatch};
use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value, json};

/// A filled dot, used for junctions and reference marks.
#[derive(Debug, Clone, PartialEq)]
pub struct PointShape {
    base: ShapeBase,
    center: Point,
    radius: f64,
    style: ShapeStyle,
}

impl Default for PointShape {
    fn default() -> Self {
        Self::new(Point::ZERO)
    }
}

impl PointShape {
    pub const TYPE: &'static str = "Point";
    pub const DEFAULT_RADIUS: f64 = 3.0;

    pub fn new(center: Point) -> Self {
        Self {
            base: ShapeBase::new(),
            center,
            radius: Self::DEFAULT_RADIUS,
            style: ShapeStyle::default(),
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn set_center(&mut self, center: Point) -> bool {
        assign_point(&mut self.center, "center", center)
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) -> bool {
        validate::assign(&mut self.radius, "radius", radius, validate::is_positive)
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    pub fn from_json(value: &Value) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let mut shape = Self {
            base: ShapeBase::from_json(obj)?,
            ..Self::default()
        };
        shape.edit(obj);
        Ok(shape)
    }
}

impl ShapeTrait for PointShape {
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
        self.center
    }

    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (self.radius * 2.0, self.radius * 2.0))
    }

    fn hit_test(&self, point: Point) -> bool {
        let reach = self.radius + self.hit_margin();
        (point - self.center).hypot2() <= reach * reach
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        surface.save();
        apply_style(surface, &self.style);
        surface.set_fill(self.style.stroke());
        surface.begin_path();
        surface.arc(self.center + offset, self.radius, 0.0, std::f64::consts::TAU);
        surface.fill();
        surface.restore();
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        node_handles(&[self.center + offset])
    }

    fn move_by(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn edit(&mut self, patch: &EditPatch) {
        self.base.edit(patch);
        self.style.edit(patch);
        edit_position(&mut self.center, patch);
        if let Some(value) = patch.get("radius") {
            edit_number(&mut self.radius, "radius", value, validate::is_positive);
        }
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.base.write_json(Self::TYPE, &mut map);
        map.insert("x".into(), json!(self.center.x));
        map.insert("y".into(), json!(self.center.y));
        map.insert("radius".into(), json!(self.radius));
        self.style.write_json(&mut map);
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_hit_uses_radius_plus_margin() {
        let p = PointShape::new(Point::new(10.0, 10.0));
        // radius 3 + margin 5
        assert!(p.hit_test(Point::new(18.0, 10.0)));
        assert!(!p.hit_test(Point::new(18.1, 10.0)));
    }

    #[test]
    fn test_point_radius_validated() {
        let mut p = PointShape::new(Point::ZERO);
        assert!(!p.set_radius(0.0));
        assert!((p.radius() - PointShape::DEFAULT_RADIUS).abs() < f64::EPSILON);
        assert!(p.set_radius(6.0));
    }
}
