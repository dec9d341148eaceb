//! Text label shape.

use super::geometry::rect_contains;
use super::json;
use super::{ShapeBase, ShapeStyle, ShapeTrait, edit_number, edit_position};
use crate::error::ShapeResult;
use crate::handles::{Affordance, HandleBox};
use crate::surface::{FontSpec, Surface, apply_style};
use crate::validate::{self, EditPatch};
use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value, json};

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Line height as a multiple of the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// A block of text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    base: ShapeBase,
    position: Point,
    text: String,
    font_size: f64,
    font_family: String,
    style: ShapeStyle,
}

impl Default for TextBox {
    fn default() -> Self {
        Self::new(Point::ZERO, "")
    }
}

impl TextBox {
    pub const TYPE: &'static str = "TextBox";
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "sans-serif";

    pub fn new(position: Point, text: impl Into<String>) -> Self {
        let mut style = ShapeStyle::default();
        style.set_fill_color(Some(style.stroke_color()));
        Self {
            base: ShapeBase::new(),
            position,
            text: text.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            style,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: f64) -> bool {
        validate::assign(&mut self.font_size, "fontSize", size, validate::is_positive)
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) -> bool {
        let family = family.into();
        if family.trim().is_empty() {
            validate::reject("fontFamily", "\"\"", &self.font_family);
            return false;
        }
        self.font_family = family;
        true
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    /// Estimated (width, height) of the laid-out text.
    pub fn measure(&self) -> (f64, f64) {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        (
            longest as f64 * self.font_size * CHAR_WIDTH_FACTOR,
            lines.len() as f64 * self.font_size * LINE_HEIGHT_FACTOR,
        )
    }

    fn font(&self) -> FontSpec {
        FontSpec {
            family: self.font_family.clone(),
            size: self.font_size,
        }
    }

    pub fn from_json(value: &Value) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let mut text = Self {
            base: ShapeBase::from_json(obj)?,
            ..Self::default()
        };
        text.edit(obj);
        Ok(text)
    }
}

impl ShapeTrait for TextBox {
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
        Rect::from_origin_size(self.position, self.measure())
    }

    fn hit_test(&self, point: Point) -> bool {
        rect_contains(self.bounds().inflate(self.hit_margin(), self.hit_margin()), point)
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        let font = self.font();
        let line_height = self.font_size * LINE_HEIGHT_FACTOR;
        surface.save();
        apply_style(surface, &self.style);
        surface.set_fill(self.style.fill().unwrap_or_else(|| self.style.stroke()));
        for (i, line) in self.text.split('\n').enumerate() {
            let origin = self.position + offset + Vec2::new(0.0, i as f64 * line_height);
            surface.fill_text(line, origin, &font);
        }
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
        if let Some(value) = patch.get("text") {
            if let Some(text) = validate::patch_string("text", value, &self.text) {
                self.text = text;
            }
        }
        if let Some(value) = patch.get("fontSize") {
            edit_number(&mut self.font_size, "fontSize", value, validate::is_positive);
        }
        if let Some(value) = patch.get("fontFamily") {
            if let Some(family) = validate::patch_string("fontFamily", value, &self.font_family) {
                self.set_font_family(family);
            }
        }
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.base.write_json(Self::TYPE, &mut map);
        map.insert("x".into(), json!(self.position.x));
        map.insert("y".into(), json!(self.position.y));
        map.insert("text".into(), json!(self.text));
        map.insert("fontSize".into(), json!(self.font_size));
        map.insert("fontFamily".into(), json!(self.font_family));
        self.style.write_json(&mut map);
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_measure_multiline() {
        let text = TextBox::new(Point::ZERO, "R1\n10k ohm");
        let (w, h) = text.measure();
        assert!((w - 7.0 * 16.0 * 0.6).abs() < 1e-9);
        assert!((h - 2.0 * 16.0 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_text_hit_uses_estimated_box() {
        let text = TextBox::new(Point::new(100.0, 100.0), "GND");
        assert!(text.hit_test(Point::new(110.0, 110.0)));
        assert!(!text.hit_test(Point::new(100.0 + 3.0 * 16.0 * 0.6 + 6.0, 110.0)));
    }

    #[test]
    fn test_text_font_size_validated() {
        let mut text = TextBox::new(Point::ZERO, "x");
        text.edit(json!({"fontSize": 0, "fontFamily": "monospace"}).as_object().unwrap());
        assert!((text.font_size() - TextBox::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
        assert_eq!(text.font_family(), "monospace");
    }
}
