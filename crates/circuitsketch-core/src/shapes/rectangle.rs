//! Axis-aligned rectangle shape.

use super::geometry::rect_contains;
use super::json;
use super::{ShapeBase, ShapeStyle, ShapeTrait, edit_number, edit_position};
use crate::error::ShapeResult;
use crate::handles::{Affordance, HandleBox};
use crate::surface::{Surface, apply_style, paint_path};
use crate::validate::{self, EditPatch};
use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value, json};

/// A rectangle defined by its top-left corner and size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rectangle {
    base: ShapeBase,
    position: Point,
    width: f64,
    height: f64,
    style: ShapeStyle,
}

impl Rectangle {
    pub const TYPE: &'static str = "Rectangle";

    /// Create a rectangle. Negative sizes are rejected and leave zero.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        let mut rect = Self {
            position,
            ..Self::default()
        };
        rect.set_width(width);
        rect.set_height(height);
        rect
    }

    /// Create from two corner points in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let r = Rect::from_points(a, b);
        Self::new(r.origin(), r.width(), r.height())
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_width(&mut self, width: f64) -> bool {
        validate::assign(&mut self.width, "width", width, validate::is_non_negative)
    }

    pub fn set_height(&mut self, height: f64) -> bool {
        validate::assign(&mut self.height, "height", height, validate::is_non_negative)
    }

    /// Replace the geometry with the box spanned by two corners.
    pub fn set_corners(&mut self, a: Point, b: Point) {
        let r = Rect::from_points(a, b);
        self.position = r.origin();
        self.width = r.width();
        self.height = r.height();
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    pub fn from_json(value: &Value) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let mut rect = Self {
            base: ShapeBase::from_json(obj)?,
            ..Self::default()
        };
        rect.edit(obj);
        Ok(rect)
    }
}

impl ShapeTrait for Rectangle {
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
        self.position
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, (self.width, self.height))
    }

    fn hit_test(&self, point: Point) -> bool {
        rect_contains(self.bounds().inflate(self.hit_margin(), self.hit_margin()), point)
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        surface.save();
        apply_style(surface, &self.style);
        surface.begin_path();
        surface.rect(self.bounds() + offset);
        paint_path(surface, &self.style);
        surface.restore();
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        vec![Affordance::Box(HandleBox::around(self.bounds() + offset))]
    }

    fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn edit(&mut self, patch: &EditPatch) {
        self.base.edit(patch);
        self.style.edit(patch);
        edit_position(&mut self.position, patch);
        if let Some(value) = patch.get("width") {
            edit_number(&mut self.width, "width", value, validate::is_non_negative);
        }
        if let Some(value) = patch.get("height") {
            edit_number(&mut self.height, "height", value, validate::is_non_negative);
        }
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.base.write_json(Self::TYPE, &mut map);
        map.insert("x".into(), json!(self.position.x));
        map.insert("y".into(), json!(self.position.y));
        map.insert("width".into(), json!(self.width));
        map.insert("height".into(), json!(self.height));
        self.style.write_json(&mut map);
        Value::Object(map)
    }
}
