//! Electronic component symbols.
//!
//! A component is a box with an immutable SVG glyph and a set of terminals.
//! Rotation and flips are applied about the box center: flip scaling first,
//! then rotation, then translation to the component's position.

mod catalog;
mod terminal;

pub use catalog::{ComponentCatalog, ComponentDefinition};
pub use terminal::{Terminal, TerminalId};

use crate::error::{ResourceError, ShapeError, ShapeResult};
use crate::handles::{Affordance, HandleAnchor, HandleBox};
use crate::resource::{LoadedResource, ResourceRequest, ResourceSlot};
use crate::schedule::RenderScheduler;
use crate::shapes::geometry::rect_contains;
use crate::shapes::json;
use crate::shapes::{ShapeBase, ShapeId, ShapeStyle, ShapeTrait, edit_number, edit_position};
use crate::surface::{StrokeParams, Surface};
use crate::validate::{self, EditPatch};
use kurbo::{Affine, Point, Rect, Vec2};
use serde_json::{Map, Value, json};

/// A placed instance of a component definition.
#[derive(Debug, Clone)]
pub struct Component {
    base: ShapeBase,
    position: Point,
    width: f64,
    height: f64,
    rotation: f64,
    flip_h: bool,
    flip_v: bool,
    definition: String,
    glyph: String,
    glyph_slot: ResourceSlot,
    terminals: Vec<Terminal>,
    terminals_follow_transform: bool,
    style: ShapeStyle,
}

impl Default for Component {
    fn default() -> Self {
        Self {
            base: ShapeBase::new(),
            position: Point::ZERO,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            flip_h: false,
            flip_v: false,
            definition: String::new(),
            glyph: String::new(),
            glyph_slot: ResourceSlot::default(),
            terminals: Vec::new(),
            terminals_follow_transform: true,
            style: ShapeStyle::default(),
        }
    }
}

impl Component {
    pub const TYPE: &'static str = "Component";

    /// Create a component with its top-left corner at `position`.
    pub fn new(
        definition: impl Into<String>,
        position: Point,
        width: f64,
        height: f64,
        glyph: impl Into<String>,
    ) -> Self {
        let mut component = Self {
            position,
            definition: definition.into(),
            glyph: glyph.into(),
            ..Self::default()
        };
        component.set_width(width);
        component.set_height(height);
        component
    }

    pub fn with_terminal(mut self, name: impl Into<String>, offset: Point) -> Self {
        self.terminals.push(Terminal::new(name, offset));
        self
    }

    /// Name of the catalog definition this component was created from.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn glyph(&self) -> &str {
        &self.glyph
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_width(&mut self, width: f64) -> bool {
        validate::assign(&mut self.width, "width", width, validate::is_positive)
    }

    pub fn set_height(&mut self, height: f64) -> bool {
        validate::assign(&mut self.height, "height", height, validate::is_positive)
    }

    /// Rotation in degrees, always in `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: f64) -> bool {
        if !degrees.is_finite() {
            validate::reject("rotation", degrees, self.rotation);
            return false;
        }
        self.rotation = degrees.rem_euclid(360.0);
        true
    }

    pub fn rotate_by(&mut self, degrees: f64) -> bool {
        self.set_rotation(self.rotation + degrees)
    }

    pub fn flip_h(&self) -> bool {
        self.flip_h
    }

    pub fn flip_v(&self) -> bool {
        self.flip_v
    }

    pub fn set_flip_h(&mut self, flip: bool) {
        self.flip_h = flip;
    }

    pub fn set_flip_v(&mut self, flip: bool) {
        self.flip_v = flip;
    }

    pub fn toggle_flip_h(&mut self) {
        self.flip_h = !self.flip_h;
    }

    pub fn toggle_flip_v(&mut self) {
        self.flip_v = !self.flip_v;
    }

    pub fn terminals_follow_transform(&self) -> bool {
        self.terminals_follow_transform
    }

    pub fn set_terminals_follow_transform(&mut self, follow: bool) {
        self.terminals_follow_transform = follow;
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    pub fn center(&self) -> Point {
        self.position + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Map from local box coordinates (origin at the unrotated top-left)
    /// to world coordinates.
    pub fn transform(&self) -> Affine {
        let half = Vec2::new(self.width / 2.0, self.height / 2.0);
        let sx = if self.flip_h { -1.0 } else { 1.0 };
        let sy = if self.flip_v { -1.0 } else { 1.0 };
        Affine::translate(self.position.to_vec2() + half)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(-half)
    }

    fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn terminal(&self, id: TerminalId) -> Option<&Terminal> {
        self.terminals.iter().find(|t| t.id() == id)
    }

    pub fn terminal_mut(&mut self, id: TerminalId) -> Option<&mut Terminal> {
        self.terminals.iter_mut().find(|t| t.id() == id)
    }

    /// Absolute position of a terminal.
    pub fn terminal_position(&self, id: TerminalId) -> Option<Point> {
        self.terminal(id).map(|t| self.absolute(t.offset()))
    }

    fn absolute(&self, offset: Point) -> Point {
        if self.terminals_follow_transform {
            self.transform() * offset
        } else {
            self.position + offset.to_vec2()
        }
    }

    /// Absolute positions of every terminal, in order.
    pub fn terminal_positions(&self) -> Vec<(TerminalId, Point)> {
        self.terminals
            .iter()
            .map(|t| (t.id(), self.absolute(t.offset())))
            .collect()
    }

    /// Nearest terminal within `tolerance` of `point`.
    pub fn terminal_at(&self, point: Point, tolerance: f64) -> Option<TerminalId> {
        self.terminal_positions()
            .into_iter()
            .map(|(id, p)| (id, (p - point).hypot()))
            .filter(|(_, d)| *d <= tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Register `wire` on a terminal. Returns false if the terminal is
    /// unknown.
    pub fn connect_wire(&mut self, terminal: TerminalId, wire: ShapeId) -> bool {
        match self.terminal_mut(terminal) {
            Some(t) => {
                t.connect_wire(wire);
                true
            }
            None => false,
        }
    }

    /// Remove `wire` from every terminal.
    pub fn disconnect_wire(&mut self, wire: ShapeId) {
        for t in &mut self.terminals {
            t.disconnect_wire(wire);
        }
    }

    pub(crate) fn regenerate_terminal_ids(&mut self) {
        for t in &mut self.terminals {
            t.regenerate_id();
        }
    }

    pub fn is_glyph_loaded(&self) -> bool {
        self.glyph_slot.is_loaded()
    }

    pub(crate) fn pending_request(&self) -> Option<ResourceRequest> {
        (self.glyph_slot.is_pending() && !self.glyph.is_empty()).then(|| ResourceRequest::Svg {
            markup: self.glyph.clone(),
        })
    }

    pub(crate) fn complete_load(&mut self, result: Result<LoadedResource, ResourceError>) {
        self.glyph_slot.complete(result, "component glyph");
    }

    pub(crate) fn attach_scheduler(&mut self, scheduler: &RenderScheduler) {
        self.glyph_slot.attach(scheduler);
    }

    pub fn from_json(value: &Value) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let text = |key: &'static str| -> ShapeResult<String> {
            match obj.get(key) {
                None | Some(Value::Null) => Ok(String::new()),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(_) => Err(ShapeError::MalformedField {
                    field: key,
                    reason: "expected a string".into(),
                }),
            }
        };
        let terminals = match obj.get("terminals") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(Terminal::from_json)
                .collect::<ShapeResult<Vec<_>>>()?,
            Some(_) => {
                return Err(ShapeError::MalformedField {
                    field: "terminals",
                    reason: "expected an array".into(),
                });
            }
        };
        let mut component = Self {
            base: ShapeBase::from_json(obj)?,
            definition: text("definition")?,
            glyph: text("glyph")?,
            terminals,
            ..Self::default()
        };
        component.edit(obj);
        Ok(component)
    }
}

impl ShapeTrait for Component {
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
        self.transform().transform_rect_bbox(self.local_rect())
    }

    fn hit_test(&self, point: Point) -> bool {
        rect_contains(self.bounds().inflate(self.hit_margin(), self.hit_margin()), point)
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        surface.save();
        surface.transform(Affine::translate(offset) * self.transform());
        if self.is_glyph_loaded() {
            surface.draw_svg(&self.glyph, self.local_rect());
        } else {
            // Placeholder until the glyph is decoded.
            surface.set_stroke(&StrokeParams::solid(self.style.stroke(), 1.0).dashed(&[3.0, 3.0]));
            surface.begin_path();
            surface.rect(self.local_rect());
            surface.stroke();
        }
        surface.restore();
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        let mut handles = vec![Affordance::Box(HandleBox::around(self.bounds() + offset))];
        handles.extend(self.terminals.iter().map(|t| {
            Affordance::Anchor(HandleAnchor::new(
                self.absolute(t.offset()) + offset,
                t.is_connected(),
            ))
        }));
        handles
    }

    fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn edit(&mut self, patch: &EditPatch) {
        self.base.edit(patch);
        self.style.edit(patch);
        edit_position(&mut self.position, patch);
        if let Some(value) = patch.get("width") {
            edit_number(&mut self.width, "width", value, validate::is_positive);
        }
        if let Some(value) = patch.get("height") {
            edit_number(&mut self.height, "height", value, validate::is_positive);
        }
        if let Some(value) = patch.get("rotation") {
            if let Some(degrees) = validate::patch_number("rotation", value, self.rotation) {
                self.set_rotation(degrees);
            }
        }
        let flags = [
            ("flipH", &mut self.flip_h),
            ("flipV", &mut self.flip_v),
            ("terminalsFollowTransform", &mut self.terminals_follow_transform),
        ];
        for (field, slot) in flags {
            if let Some(value) = patch.get(field) {
                if let Some(flag) = validate::patch_bool(field, value, *slot) {
                    *slot = flag;
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
        map.insert("rotation".into(), json!(self.rotation));
        map.insert("flipH".into(), json!(self.flip_h));
        map.insert("flipV".into(), json!(self.flip_v));
        map.insert("definition".into(), json!(self.definition));
        map.insert("glyph".into(), json!(self.glyph));
        map.insert(
            "terminalsFollowTransform".into(),
            json!(self.terminals_follow_transform),
        );
        map.insert(
            "terminals".into(),
            Value::Array(self.terminals.iter().map(Terminal::to_json).collect()),
        );
        self.style.write_json(&mut map);
        Value::Object(map)
    }
}
