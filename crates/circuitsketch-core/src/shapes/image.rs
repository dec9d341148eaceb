//! Raster image shape.

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

/// An image placed at a position, drawn once its source has been decoded.
///
/// A zero width or height is replaced by the natural size when the load
/// completes.
#[derive(Debug, Clone, Default)]
pub struct ImageShape {
    base: ShapeBase,
    position: Point,
    width: f64,
    height: f64,
    source: String,
    resource: ResourceSlot,
}

impl ImageShape {
    pub const TYPE: &'static str = "Image";

    pub fn new(position: Point, width: f64, height: f64, source: impl Into<String>) -> Self {
        let mut image = Self {
            position,
            source: source.into(),
            ..Self::default()
        };
        image.set_width(width);
        image.set_height(height);
        image
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

    /// URL or data URI of the image.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Point at a new source; the image goes back to pending.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.resource.reset();
    }

    /// Replace the geometry with the box spanned by two corners.
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
        (self.resource.is_pending() && !self.source.is_empty()).then(|| ResourceRequest::Image {
            source: self.source.clone(),
        })
    }

    pub(crate) fn complete_load(&mut self, result: Result<LoadedResource, ResourceError>) {
        if let Some(size) = self.resource.complete(result, "image") {
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
        let mut image = Self {
            base: ShapeBase::from_json(obj)?,
            ..Self::default()
        };
        image.edit(obj);
        Ok(image)
    }
}

impl ShapeTrait for ImageShape {
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

    /// Unloaded images cannot be hit.
    fn hit_test(&self, point: Point) -> bool {
        self.is_loaded()
            && rect_contains(self.bounds().inflate(self.hit_margin(), self.hit_margin()), point)
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        if self.is_loaded() {
            surface.draw_image(&self.source, self.bounds() + offset);
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
        if let Some(value) = patch.get("src") {
            if let Some(source) = validate::patch_string("src", value, &self.source) {
                if source != self.source {
                    self.set_source(source);
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
        map.insert("src".into(), json!(self.source));
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unloaded_image_never_hits() {
        let mut image = ImageShape::new(Point::ZERO, 10.0, 10.0, "a.png");
        assert!(!image.hit_test(Point::new(5.0, 5.0)));
        image.complete_load(Ok(LoadedResource { width: 100.0, height: 50.0 }));
        assert!(image.hit_test(Point::new(5.0, 5.0)));
        // Explicit size wins over the natural size.
        assert!((image.width() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_size_adopts_natural_size() {
        let mut image = ImageShape::new(Point::ZERO, 0.0, 0.0, "a.png");
        image.complete_load(Ok(LoadedResource { width: 100.0, height: 50.0 }));
        assert!((image.width() - 100.0).abs() < f64::EPSILON);
        assert!((image.height() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failed_load_stays_unhittable() {
        let mut image = ImageShape::new(Point::ZERO, 10.0, 10.0, "a.png");
        image.complete_load(Err(ResourceError::Decode("truncated".into())));
        assert_eq!(image.load_state(), LoadState::Failed);
        assert!(image.pending_request().is_none());
        assert!(!image.hit_test(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_changing_source_resets_load() {
        let mut image = ImageShape::new(Point::ZERO, 10.0, 10.0, "a.png");
        image.complete_load(Ok(LoadedResource { width: 1.0, height: 1.0 }));
        image.edit(json!({"src": "b.png"}).as_object().unwrap());
        assert_eq!(
            image.pending_request(),
            Some(ResourceRequest::Image { source: "b.png".into() })
        );
    }
}
