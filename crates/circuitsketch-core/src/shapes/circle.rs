//! Circle shape.

use super::json;
use super::{ShapeBase, ShapeStyle, ShapeTrait, edit_number, edit_position};
use crate::error::ShapeResult;
use crate::handles::{Affordance, HandleBox};
use crate::surface::{Surface, apply_style, paint_path};
use crate::validate::{self, EditPatch};
use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value, json};

/// A circle defined by center and radius.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Circle {
    base: ShapeBase,
    center: Point,
    radius: f64,
    style: ShapeStyle,
}

impl Circle {
    pub const TYPE: &'static str = "Circle";

    pub fn new(center: Point, radius: f64) -> Self {
        let mut circle = Self {
            center,
            ..Self::default()
        };
        circle.set_radius(radius);
        circle
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) -> bool {
        validate::assign(&mut self.radius, "radius", radius, validate::is_non_negative)
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    pub fn from_json(value: &Value) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let mut circle = Self {
            base: ShapeBase::from_json(obj)?,
            ..Self::default()
        };
        circle.edit(obj);
        Ok(circle)
    }
}

impl ShapeTrait for Circle {
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

    /// Hits anywhere inside the disc grown by the hit margin.
    fn hit_test(&self, point: Point) -> bool {
        let reach = self.radius + self.hit_margin();
        (point - self.center).hypot2() <= reach * reach
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        surface.save();
        apply_style(surface, &self.style);
        surface.begin_path();
        surface.arc(self.center + offset, self.radius, 0.0, std::f64::consts::TAU);
        paint_path(surface, &self.style);
        surface.restore();
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        vec![Affordance::Box(HandleBox::around(self.bounds() + offset))]
    }

    fn move_by(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn edit(&mut self, patch: &EditPatch) {
        self.base.edit(patch);
        self.style.edit(patch);
        edit_position(&mut self.center, patch);
        if let Some(value) = patch.get("radius") {
            edit_number(&mut self.radius, "radius", value, validate::is_non_negative);
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
