//! Inline SVG drawing.

use super::geometry::rect_contains;
use super::json;
use super::{ShapeBase, ShapeTrait, edit_number, edit_position};
use crate::error::{ResourceError, ShapeResult};
use crate::handles::{Affordance, HandleBox};
use crate::resource::{LoadState, LoadedResource, ResourceRequest, ResourceSlot};
use crate::schedule::RenderScheduler;
use crate::surface::Surface;
use crate::validate::{self, EditPatch};
use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value, json};

/// Vector markup drawn into a box once it has been parsed by the host.
#[derive(Debug, Clone, Default)]
pub struct SvgDrawing {
    base: ShapeBase,
    position: Point,
    width: f64,
    height: f64,
    markup: String,
    resource: ResourceSlot,
}

impl SvgDrawing {
    pub const TYPE: &'static str = "SVGDrawing";

    pub fn new(position: Point, width: f64, height: f64, markup: impl Into<String>) -> Self {
        let mut svg = Self {
            position,
            markup: markup.into(),
            ..Self::default()
        };
        svg.set_width(width);
        svg.set_height(height);
        svg
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

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn set_markup(&mut self, markup: impl Into<String>) {
        self.markup = markup.into();
        self.resource.reset();
    }

    pub fn set_corners(&mut self, a: Point, b: Point) {
        let r = Rect::from_points(a, b);
        self.position = r.origin();
        self.width = r.width();
        self.height = r.height();
    }

    pub fn load_state(&self) -> LoadState {
        self.resource.state()
    }

    pub fn is_loaded(&self) -> bool {
        self.resource.is_loaded()
    }

    pub(crate) fn pending_request(&self) -> Option<ResourceRequest> {
        (self.resource.is_pending() && !self.markup.is_empty()).then(|| ResourceRequest::Svg {
            markup: self.markup.clone(),
        })
    }

    pub(crate) fn complete_load(&mut self, result: Result<LoadedResource, ResourceError>) {
        if let Some(size) = self.resource.complete(result, "svg") {
            if self.width == 0.0 || self.height == 0.0 {
                self.width = size.width;
                self.height = size.height;
            }
        }
    }

    pub(crate) fn attach_scheduler(&mut self, scheduler: &RenderScheduler) {
        self.resource.attach(scheduler);
    }

    pub fn from_json(value: &Value) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let mut svg = Self {
            base: ShapeBase::from_json(obj)?,
            ..Self::default()
        };
        svg.edit(obj);
        Ok(svg)
    }
}

impl ShapeTrait for SvgDrawing {
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
        self.is_loaded()
            && rect_contains(self.bounds().inflate(self.hit_margin(), self.hit_margin()), point)
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        if self.is_loaded() {
            surface.draw_svg(&self.markup, self.bounds() + offset);
        }
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        vec![Affordance::Box(HandleBox::around(self.bounds() + offset))]
    }

    fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn edit(&mut self, patch: &EditPatch) {
        self.base.edit(patch);
        edit_position(&mut self.position, patch);
        if let Some(value) = patch.get("width") {
            edit_number(&mut self.width, "width", value, validate::is_non_negative);
        }
        if let Some(value) = patch.get("height") {
            edit_number(&mut self.height, "height", value, validate::is_non_negative);
        }
        if let Some(value) = patch.get("markup") {
            if let Some(markup) = validate::patch_string("markup", value, "<markup>") {
                if markup != self.markup {
                    self.set_markup(markup);
                }
            }
        }
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.base.write_json(Self::TYPE, &mut map);
        map.insert("x".into(), json!(self.position.x));
        map.insert("y".into(), json!(self.position.y));
        map.insert("width".into(), json!(self.width));
        map.insert("height".into(), json!(self.height));
        map.insert("markup".into(), json!(self.markup));
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_pending_until_loaded() {
        let mut svg = SvgDrawing::new(Point::ZERO, 0.0, 0.0, "<svg/>");
        assert_eq!(svg.pending_request(), Some(ResourceRequest::Svg { markup: "<svg/>".into() }));
        assert!(!svg.hit_test(Point::ZERO));
        svg.complete_load(Ok(LoadedResource { width: 24.0, height: 24.0 }));
        assert!(svg.pending_request().is_none());
        assert!(svg.hit_test(Point::new(12.0, 12.0)));
        assert!((svg.width() - 24.0).abs() < f64::EPSILON);
    }
}
