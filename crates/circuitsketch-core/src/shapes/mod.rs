//! Shape definitions for the diagram scene.

mod circle;
mod curve;
mod freehand;
pub mod geometry;
mod group;
mod image;
pub(crate) mod json;
mod line;
mod point;
mod polyline;
mod rectangle;
mod style;
mod svg;
mod text;
mod wire;

pub use circle::Circle;
pub use curve::ThreePointCurve;
pub use freehand::Freehand;
pub use group::Group;
pub use image::ImageShape;
pub use line::Line;
pub use point::PointShape;
pub use polyline::PolyLine;
pub use rectangle::Rectangle;
pub use style::{LineCap, LineJoin, SerializableColor, ShapeStyle};
pub use svg::SvgDrawing;
pub use text::TextBox;
pub use wire::{TerminalRef, Wire};

use crate::component::Component;
use crate::config::DEFAULT_HIT_MARGIN;
use crate::error::{ResourceError, ShapeError, ShapeResult};
use crate::handles::{Affordance, draw_affordances};
use crate::resource::{LoadedResource, ResourceRequest};
use crate::schedule::RenderScheduler;
use crate::surface::Surface;
use crate::validate::{self, EditPatch};
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// State every shape carries regardless of its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeBase {
    pub(crate) id: ShapeId,
    selected: bool,
    z_index: i64,
    hit_margin: f64,
}

impl Default for ShapeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeBase {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            selected: false,
            z_index: 0,
            hit_margin: DEFAULT_HIT_MARGIN,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Paint-order hint. The scene paints in list order and does not sort
    /// on this value.
    pub fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn set_z_index(&mut self, z_index: i64) {
        self.z_index = z_index;
    }

    pub fn hit_margin(&self) -> f64 {
        self.hit_margin
    }

    pub fn set_hit_margin(&mut self, margin: f64) -> bool {
        validate::assign(&mut self.hit_margin, "hitMargin", margin, validate::is_non_negative)
    }

    pub(crate) fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    /// Apply `zIndex` and `hitMargin` from a patch.
    pub(crate) fn edit(&mut self, patch: &EditPatch) {
        for (key, value) in patch {
            match key.as_str() {
                "zIndex" => {
                    if let Some(z) = validate::patch_number("zIndex", value, self.z_index) {
                        if z.fract() == 0.0 && z.abs() < i64::MAX as f64 {
                            self.z_index = z as i64;
                        } else {
                            validate::reject("zIndex", z, self.z_index);
                        }
                    }
                }
                "hitMargin" => {
                    if let Some(m) = validate::patch_number("hitMargin", value, self.hit_margin) {
                        self.set_hit_margin(m);
                    }
                }
                _ => {}
            }
        }
    }

    /// Write the common keys of the serialized form.
    pub(crate) fn write_json(&self, type_name: &str, map: &mut Map<String, Value>) {
        map.insert("type".into(), serde_json::json!(type_name));
        map.insert("id".into(), serde_json::json!(self.id.to_string()));
        map.insert("zIndex".into(), serde_json::json!(self.z_index));
        map.insert("selected".into(), serde_json::json!(self.selected));
        map.insert("hitMargin".into(), serde_json::json!(self.hit_margin));
    }

    /// Restore identity and selection. `zIndex` and `hitMargin` arrive
    /// through the owning shape's `edit`.
    pub(crate) fn from_json(obj: &Map<String, Value>) -> ShapeResult<Self> {
        let mut base = Self::new();
        match obj.get("id") {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) => {
                base.id = Uuid::parse_str(s).map_err(|_| ShapeError::InvalidId(s.clone()))?;
            }
            Some(other) => return Err(ShapeError::InvalidId(other.to_string())),
        }
        if let Some(value) = obj.get("selected") {
            if let Some(selected) = validate::patch_bool("selected", value, false) {
                base.selected = selected;
            }
        }
        Ok(base)
    }
}

/// Apply `x`/`y` patch entries to a position.
pub(crate) fn edit_position(position: &mut Point, patch: &EditPatch) {
    for (key, value) in patch {
        let slot = match key.as_str() {
            "x" => &mut position.x,
            "y" => &mut position.y,
            _ => continue,
        };
        if let Some(v) = validate::patch_number(key, value, *slot) {
            validate::assign(slot, key, v, validate::is_finite);
        }
    }
}

/// Apply `x`/`y` to a point chain by translating it so its first point
/// lands on the requested position.
pub(crate) fn edit_chain_position(points: &mut [Point], patch: &EditPatch) {
    let origin = points.first().copied().unwrap_or(Point::ZERO);
    let mut moved = origin;
    edit_position(&mut moved, patch);
    geometry::translate_points(points, moved - origin);
}

/// Replace one point of a chain. Out-of-range indices are refused quietly.
pub(crate) fn set_chain_point(points: &mut [Point], index: usize, point: Point) -> bool {
    match points.get_mut(index) {
        Some(slot) => assign_point(slot, "points", point),
        None => false,
    }
}

/// Append a finite point to a chain.
pub(crate) fn push_chain_point(points: &mut Vec<Point>, point: Point) -> bool {
    if point.is_finite() {
        points.push(point);
        true
    } else {
        validate::reject("points", format!("{point:?}"), format!("{} points", points.len()));
        false
    }
}

/// Emit a polyline path for a chain.
pub(crate) fn trace_chain(surface: &mut dyn Surface, points: &[Point], offset: Vec2) {
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        surface.move_to(*first + offset);
        for p in iter {
            surface.line_to(*p + offset);
        }
    }
}

/// Assign a finite point, otherwise log and keep.
pub(crate) fn assign_point(slot: &mut Point, field: &str, point: Point) -> bool {
    if point.is_finite() {
        *slot = point;
        true
    } else {
        validate::reject(field, format!("{point:?}"), format!("{slot:?}"));
        false
    }
}

/// Apply a patch entry to a number slot with a range check.
pub(crate) fn edit_number(
    slot: &mut f64,
    field: &str,
    value: &Value,
    valid: fn(f64) -> bool,
) -> bool {
    match validate::patch_number(field, value, *slot) {
        Some(v) => validate::assign(slot, field, v, valid),
        None => false,
    }
}

/// Common contract every concrete shape satisfies.
pub trait ShapeTrait {
    fn base(&self) -> &ShapeBase;

    fn base_mut(&mut self) -> &mut ShapeBase;

    /// The `type` tag used in the serialized form.
    fn type_name(&self) -> &'static str;

    /// Canonical anchor position (meaning varies by shape).
    fn position(&self) -> Point;

    /// Bounding box in the shape's own coordinate frame.
    fn bounds(&self) -> Rect;

    /// Check if a point hits this shape, including its hit margin.
    fn hit_test(&self, point: Point) -> bool;

    /// Paint the shape translated by `offset`.
    fn draw(&self, surface: &mut dyn Surface, offset: Vec2);

    /// Affordances shown while selected, translated by `offset`.
    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance>;

    /// Translate the shape.
    fn move_by(&mut self, delta: Vec2);

    /// Apply the recognized keys of `patch` through validated setters.
    fn edit(&mut self, patch: &EditPatch);

    fn to_json(&self) -> Value;

    fn id(&self) -> ShapeId {
        self.base().id
    }

    fn is_selected(&self) -> bool {
        self.base().is_selected()
    }

    fn select(&mut self) {
        self.base_mut().set_selected(true);
    }

    fn deselect(&mut self) {
        self.base_mut().set_selected(false);
    }

    fn hit_margin(&self) -> f64 {
        self.base().hit_margin()
    }

    fn draw_selection_handles(&self, surface: &mut dyn Surface, offset: Vec2, color: Color) {
        draw_affordances(surface, &self.selection_handles(offset), color);
    }
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone)]
pub enum Shape {
    Point(PointShape),
    Line(Line),
    PolyLine(PolyLine),
    Freehand(Freehand),
    Rectangle(Rectangle),
    Circle(Circle),
    Curve(ThreePointCurve),
    Text(TextBox),
    Image(ImageShape),
    Svg(SvgDrawing),
    Group(Group),
    Component(Component),
    Wire(Wire),
}

macro_rules! dispatch {
    ($shape:expr, $s:ident => $body:expr) => {
        match $shape {
            Shape::Point($s) => $body,
            Shape::Line($s) => $body,
            Shape::PolyLine($s) => $body,
            Shape::Freehand($s) => $body,
            Shape::Rectangle($s) => $body,
            Shape::Circle($s) => $body,
            Shape::Curve($s) => $body,
            Shape::Text($s) => $body,
            Shape::Image($s) => $body,
            Shape::Svg($s) => $body,
            Shape::Group($s) => $body,
            Shape::Component($s) => $body,
            Shape::Wire($s) => $body,
        }
    };
}

impl ShapeTrait for Shape {
    fn base(&self) -> &ShapeBase {
        dispatch!(self, s => s.base())
    }

    fn base_mut(&mut self) -> &mut ShapeBase {
        dispatch!(self, s => s.base_mut())
    }

    fn type_name(&self) -> &'static str {
        dispatch!(self, s => s.type_name())
    }

    fn position(&self) -> Point {
        dispatch!(self, s => s.position())
    }

    fn bounds(&self) -> Rect {
        dispatch!(self, s => s.bounds())
    }

    fn hit_test(&self, point: Point) -> bool {
        dispatch!(self, s => s.hit_test(point))
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        dispatch!(self, s => s.draw(surface, offset))
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        dispatch!(self, s => s.selection_handles(offset))
    }

    fn move_by(&mut self, delta: Vec2) {
        dispatch!(self, s => s.move_by(delta))
    }

    fn edit(&mut self, patch: &EditPatch) {
        dispatch!(self, s => s.edit(patch))
    }

    fn to_json(&self) -> Value {
        dispatch!(self, s => s.to_json())
    }
}

impl Shape {
    /// Check if this shape is a group.
    pub fn is_group(&self) -> bool {
        matches!(self, Shape::Group(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Shape::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_component_mut(&mut self) -> Option<&mut Component> {
        match self {
            Shape::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> Option<&Wire> {
        match self {
            Shape::Wire(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_wire_mut(&mut self) -> Option<&mut Wire> {
        match self {
            Shape::Wire(w) => Some(w),
            _ => None,
        }
    }

    /// Stroke and fill style, for shapes that carry one.
    pub fn style(&self) -> Option<&ShapeStyle> {
        match self {
            Shape::Point(s) => Some(s.style()),
            Shape::Line(s) => Some(s.style()),
            Shape::PolyLine(s) => Some(s.style()),
            Shape::Freehand(s) => Some(s.style()),
            Shape::Rectangle(s) => Some(s.style()),
            Shape::Circle(s) => Some(s.style()),
            Shape::Curve(s) => Some(s.style()),
            Shape::Text(s) => Some(s.style()),
            Shape::Component(s) => Some(s.style()),
            Shape::Wire(s) => Some(s.style()),
            Shape::Image(_) | Shape::Svg(_) | Shape::Group(_) => None,
        }
    }

    pub fn style_mut(&mut self) -> Option<&mut ShapeStyle> {
        match self {
            Shape::Point(s) => Some(s.style_mut()),
            Shape::Line(s) => Some(s.style_mut()),
            Shape::PolyLine(s) => Some(s.style_mut()),
            Shape::Freehand(s) => Some(s.style_mut()),
            Shape::Rectangle(s) => Some(s.style_mut()),
            Shape::Circle(s) => Some(s.style_mut()),
            Shape::Curve(s) => Some(s.style_mut()),
            Shape::Text(s) => Some(s.style_mut()),
            Shape::Component(s) => Some(s.style_mut()),
            Shape::Wire(s) => Some(s.style_mut()),
            Shape::Image(_) | Shape::Svg(_) | Shape::Group(_) => None,
        }
    }

    /// Editable vertices, for node editing.
    pub fn nodes(&self) -> Vec<Point> {
        match self {
            Shape::Point(p) => vec![p.center()],
            Shape::Line(l) => vec![l.start(), l.end()],
            Shape::PolyLine(p) => p.points().to_vec(),
            Shape::Freehand(f) => f.points().to_vec(),
            Shape::Curve(c) => vec![c.start(), c.control(), c.end()],
            Shape::Wire(w) => w.points().to_vec(),
            _ => Vec::new(),
        }
    }

    /// Move one vertex. Returns false if the index is out of range or the
    /// shape has no vertices.
    pub fn set_node(&mut self, index: usize, point: Point) -> bool {
        match self {
            Shape::Point(p) if index == 0 => p.set_center(point),
            Shape::Line(l) => match index {
                0 => l.set_start(point),
                1 => l.set_end(point),
                _ => false,
            },
            Shape::PolyLine(p) => p.set_point(index, point),
            Shape::Freehand(f) => f.set_point(index, point),
            Shape::Curve(c) => match index {
                0 => c.set_start(point),
                1 => c.set_control(point),
                2 => c.set_end(point),
                _ => false,
            },
            Shape::Wire(w) => w.set_point(index, point),
            _ => false,
        }
    }

    /// Check if this shape supports rotation and flipping.
    pub fn supports_rotation(&self) -> bool {
        matches!(self, Shape::Component(_))
    }

    pub fn rotate_by(&mut self, degrees: f64) -> bool {
        match self {
            Shape::Component(c) => c.rotate_by(degrees),
            _ => false,
        }
    }

    pub fn flip_horizontal(&mut self) -> bool {
        match self {
            Shape::Component(c) => {
                c.toggle_flip_h();
                true
            }
            _ => false,
        }
    }

    pub fn flip_vertical(&mut self) -> bool {
        match self {
            Shape::Component(c) => {
                c.toggle_flip_v();
                true
            }
            _ => false,
        }
    }

    /// Whether the shape has no visible extent and should not persist.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Shape::Point(_) | Shape::Component(_) => false,
            Shape::Line(l) => l.start() == l.end(),
            Shape::PolyLine(p) => chain_is_degenerate(p.points()),
            Shape::Freehand(f) => chain_is_degenerate(f.points()),
            Shape::Wire(w) => chain_is_degenerate(w.points()),
            Shape::Rectangle(r) => r.width() == 0.0 || r.height() == 0.0,
            Shape::Circle(c) => c.radius() == 0.0,
            Shape::Curve(c) => c.start() == c.end() && c.start() == c.control(),
            Shape::Text(t) => t.text().trim().is_empty(),
            Shape::Image(i) => i.width() == 0.0 || i.height() == 0.0,
            Shape::Svg(s) => s.width() == 0.0 || s.height() == 0.0,
            Shape::Group(g) => g.children().is_empty(),
        }
    }

    /// Structural copy with fresh identities throughout.
    ///
    /// Terminal connections and wire endpoints are dropped: the copy is not
    /// wired to anything.
    pub fn duplicate(&self) -> Shape {
        let mut copy = self.clone();
        copy.regenerate_ids();
        copy
    }

    /// Regenerate the shape's ID (and nested IDs).
    pub fn regenerate_ids(&mut self) {
        self.base_mut().regenerate_id();
        match self {
            Shape::Group(g) => {
                for child in g.children_mut() {
                    child.regenerate_ids();
                }
            }
            Shape::Component(c) => c.regenerate_terminal_ids(),
            Shape::Wire(w) => w.disconnect(),
            _ => {}
        }
    }

    /// Find a shape by ID, searching into groups.
    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        if self.id() == id {
            return Some(self);
        }
        self.as_group()
            .and_then(|g| g.children().iter().find_map(|c| c.find(id)))
    }

    /// Find a mutable shape by ID, searching into groups.
    pub fn find_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        if self.id() == id {
            return Some(self);
        }
        match self {
            Shape::Group(g) => g.children_mut().iter_mut().find_map(|c| c.find_mut(id)),
            _ => None,
        }
    }

    /// Resource this shape is waiting on, if any.
    pub fn pending_resource(&self) -> Option<ResourceRequest> {
        match self {
            Shape::Image(i) => i.pending_request(),
            Shape::Svg(s) => s.pending_request(),
            Shape::Component(c) => c.pending_request(),
            _ => None,
        }
    }

    /// Collect pending requests of this shape and its descendants.
    pub(crate) fn collect_pending(&self, out: &mut Vec<(ShapeId, ResourceRequest)>) {
        if let Some(request) = self.pending_resource() {
            out.push((self.id(), request));
        }
        if let Shape::Group(g) = self {
            for child in g.children() {
                child.collect_pending(out);
            }
        }
    }

    /// Apply a load completion. Returns false if this shape does not load
    /// resources.
    pub fn complete_resource(&mut self, result: Result<LoadedResource, ResourceError>) -> bool {
        match self {
            Shape::Image(i) => i.complete_load(result),
            Shape::Svg(s) => s.complete_load(result),
            Shape::Component(c) => c.complete_load(result),
            _ => return false,
        }
        true
    }

    /// Give resource-backed shapes a way to request repaints. An existing
    /// scheduler is kept.
    pub fn attach_scheduler(&mut self, scheduler: &RenderScheduler) {
        match self {
            Shape::Image(i) => i.attach_scheduler(scheduler),
            Shape::Svg(s) => s.attach_scheduler(scheduler),
            Shape::Component(c) => c.attach_scheduler(scheduler),
            Shape::Group(g) => {
                for child in g.children_mut() {
                    child.attach_scheduler(scheduler);
                }
            }
            _ => {}
        }
    }
}

fn chain_is_degenerate(points: &[Point]) -> bool {
    match points.first() {
        None => true,
        Some(first) => points.len() < 2 || points.iter().all(|p| p == first),
    }
}

/// Rebuild a shape from its serialized form, dispatching on `type`.
///
/// Group children are resolved recursively before the group itself.
pub fn shape_from_json(value: &Value) -> ShapeResult<Shape> {
    let obj = json::object(value)?;
    let tag = json::type_tag(obj)?;
    match tag {
        PointShape::TYPE => PointShape::from_json(value).map(Shape::Point),
        Line::TYPE => Line::from_json(value).map(Shape::Line),
        PolyLine::TYPE => PolyLine::from_json(value).map(Shape::PolyLine),
        Freehand::TYPE => Freehand::from_json(value).map(Shape::Freehand),
        Rectangle::TYPE => Rectangle::from_json(value).map(Shape::Rectangle),
        Circle::TYPE => Circle::from_json(value).map(Shape::Circle),
        ThreePointCurve::TYPE => ThreePointCurve::from_json(value).map(Shape::Curve),
        TextBox::TYPE => TextBox::from_json(value).map(Shape::Text),
        ImageShape::TYPE => ImageShape::from_json(value).map(Shape::Image),
        SvgDrawing::TYPE => SvgDrawing::from_json(value).map(Shape::Svg),
        Component::TYPE => Component::from_json(value).map(Shape::Component),
        Wire::TYPE => Wire::from_json(value).map(Shape::Wire),
        Group::TYPE => {
            let children = match obj.get("children") {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(shape_from_json)
                    .collect::<ShapeResult<Vec<_>>>()?,
                Some(_) => {
                    return Err(ShapeError::MalformedField {
                        field: "children",
                        reason: "expected an array".into(),
                    });
                }
                None => return Err(ShapeError::MissingField("children")),
            };
            Group::from_json(value, children).map(Shape::Group)
        }
        other => Err(ShapeError::UnknownType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentCatalog;
    use crate::test_log;
    use serde_json::json;

    fn samples() -> Vec<Shape> {
        let catalog = ComponentCatalog::builtin();
        let mut rect = Rectangle::new(Point::new(10.0, 20.0), 30.0, 40.0);
        rect.style_mut().set_fill_color(Some(SerializableColor::white()));
        rect.base_mut().set_z_index(3);
        let mut text = TextBox::new(Point::new(5.0, 5.0), "Vcc");
        text.select();
        vec![
            Shape::Point(PointShape::new(Point::new(1.0, 2.0))),
            Shape::Line(Line::new(Point::new(0.0, 0.0), Point::new(10.0, 5.0))),
            Shape::PolyLine(PolyLine::from_points(vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 4.0),
                Point::new(8.0, 0.0),
            ])),
            Shape::Freehand(Freehand::from_points(vec![Point::new(1.0, 1.0), Point::new(2.0, 3.0)])),
            Shape::Rectangle(rect),
            Shape::Circle(Circle::new(Point::new(50.0, 50.0), 12.5)),
            Shape::Curve(ThreePointCurve::new(
                Point::new(0.0, 0.0),
                Point::new(5.0, 10.0),
                Point::new(10.0, 0.0),
            )),
            Shape::Text(text),
            Shape::Image(ImageShape::new(Point::new(0.0, 0.0), 64.0, 32.0, "data:image/png;base64,AAAA")),
            Shape::Svg(SvgDrawing::new(Point::new(3.0, 3.0), 20.0, 20.0, "<svg width=\"20\" height=\"20\"/>")),
            Shape::Component(catalog.instantiate("resistor", Point::new(100.0, 100.0)).unwrap()),
            Shape::Wire(Wire::from_points(vec![Point::new(0.0, 0.0), Point::new(0.0, 30.0)])),
        ]
    }

    #[test]
    fn test_round_trip_every_type() {
        let mut shapes = samples();
        let group = Group::from_children(vec![
            Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0)),
            Shape::Circle(Circle::new(Point::new(40.0, 40.0), 5.0)),
        ]);
        shapes.push(Shape::Group(group));

        for shape in &shapes {
            let json = shape.to_json();
            let rebuilt = shape_from_json(&json).unwrap();
            assert_eq!(rebuilt.to_json(), json, "round trip of {}", shape.type_name());
            assert_eq!(rebuilt.id(), shape.id());
        }
    }

    #[test]
    fn test_unknown_type_is_contract_violation() {
        let err = shape_from_json(&json!({"type": "Hexagon"})).unwrap_err();
        assert_eq!(err, ShapeError::UnknownType("Hexagon".into()));
        assert!(matches!(shape_from_json(&json!([])), Err(ShapeError::NotAnObject(_))));
    }

    #[test]
    fn test_invalid_id_is_contract_violation() {
        let err = shape_from_json(&json!({"type": "Point", "id": "not-a-uuid"})).unwrap_err();
        assert!(matches!(err, ShapeError::InvalidId(_)));
    }

    #[test]
    fn test_out_of_range_values_fall_back_to_defaults() {
        let _capture = test_log::capture();
        let shape = shape_from_json(&json!({
            "type": "Rectangle",
            "x": 5,
            "y": "7",
            "width": -10,
            "height": "tall",
            "hitMargin": -1,
            "lineWidth": 0,
        }))
        .unwrap();
        let Shape::Rectangle(rect) = &shape else {
            panic!("expected rectangle");
        };
        assert_eq!(rect.position(), Point::new(5.0, 7.0));
        assert!((rect.width() - 0.0).abs() < f64::EPSILON);
        assert!((rect.height() - 0.0).abs() < f64::EPSILON);
        assert!((rect.hit_margin() - DEFAULT_HIT_MARGIN).abs() < f64::EPSILON);
        assert!((rect.style().line_width() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_duplicate_has_new_identity() {
        for shape in samples() {
            let copy = shape.duplicate();
            assert_ne!(copy.id(), shape.id());
            assert_eq!(copy.position(), shape.position());
        }
    }

    #[test]
    fn test_invalid_assignment_warns_once() {
        for mut shape in samples() {
            let capture = test_log::capture();
            let before = shape.to_json();
            shape.edit(json!({ "x": "NaN" }).as_object().unwrap());
            assert_eq!(shape.to_json(), before, "{}", shape.type_name());
            assert_eq!(capture.warnings().len(), 1, "{}", shape.type_name());
        }
    }

    #[test]
    fn test_hit_margin_monotonic() {
        let query_points = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 6.0),
            Point::new(12.0, 2.0),
            Point::new(40.0, 45.0),
            Point::new(100.0, 130.0),
            Point::new(-4.0, 8.0),
        ];
        for mut shape in samples() {
            // Images and SVGs only hit once their resource has loaded.
            shape.complete_resource(Ok(LoadedResource { width: 1.0, height: 1.0 }));
            for query in query_points {
                let mut last = false;
                for margin in [0.0, 1.0, 2.5, 5.0, 10.0, 40.0] {
                    shape.base_mut().set_hit_margin(margin);
                    let hit = shape.hit_test(query);
                    assert!(!(last && !hit), "{} lost hit at margin {margin}", shape.type_name());
                    last = hit;
                }
            }
        }
    }

    #[test]
    fn test_degenerate_detection() {
        assert!(Shape::Rectangle(Rectangle::new(Point::new(1.0, 1.0), 0.0, 5.0)).is_degenerate());
        assert!(Shape::Line(Line::new(Point::new(1.0, 1.0), Point::new(1.0, 1.0))).is_degenerate());
        assert!(Shape::Freehand(Freehand::from_points(vec![Point::new(1.0, 1.0)])).is_degenerate());
        assert!(!Shape::Point(PointShape::new(Point::ZERO)).is_degenerate());
    }

    #[test]
    fn test_nodes_and_set_node() {
        let mut shape = Shape::Curve(ThreePointCurve::new(
            Point::new(0.0, 0.0),
            Point::new(5.0, 10.0),
            Point::new(10.0, 0.0),
        ));
        assert_eq!(shape.nodes().len(), 3);
        assert!(shape.set_node(1, Point::new(5.0, 20.0)));
        assert_eq!(shape.nodes()[1], Point::new(5.0, 20.0));
        assert!(!shape.set_node(3, Point::ZERO));
        let mut rect = Shape::Rectangle(Rectangle::new(Point::ZERO, 1.0, 1.0));
        assert!(rect.nodes().is_empty());
        assert!(!rect.set_node(0, Point::ZERO));
    }
}
