//! Group shape for combining multiple shapes.

use super::geometry::rect_contains;
use super::json;
use super::{Shape, ShapeBase, ShapeStyle, ShapeTrait, edit_position};
use crate::error::{ShapeError, ShapeResult};
use crate::handles::{Affordance, HandleBox};
use crate::surface::Surface;
use crate::validate::EditPatch;
use kurbo::{Point, Rect, Vec2};
use serde_json::{Map, Value, json};

/// A group of shapes that can be manipulated as a single unit.
/// Groups can contain other groups, enabling nested hierarchies.
///
/// Children are stored relative to the group origin, which is the top-left
/// corner of their union bounds at grouping time. Moving the group only
/// moves the origin.
#[derive(Debug, Clone, Default)]
pub struct Group {
    base: ShapeBase,
    position: Point,
    children: Vec<Shape>,
}

impl Group {
    pub const TYPE: &'static str = "Group";

    /// Create a group from shapes in absolute coordinates. Children are
    /// deselected.
    pub fn from_children(children: Vec<Shape>) -> Self {
        let mut group = Self::default();
        group.adopt(children);
        group
    }

    fn adopt(&mut self, mut children: Vec<Shape>) {
        let origin = union_bounds(&children).origin();
        for child in &mut children {
            child.deselect();
            child.move_by(-origin.to_vec2());
        }
        self.position = origin;
        self.children = children;
    }

    /// Children in group-local coordinates.
    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Shape> {
        &mut self.children
    }

    /// Copies of the children translated to absolute coordinates.
    pub fn absolute_children(&self) -> Vec<Shape> {
        self.children
            .iter()
            .map(|child| {
                let mut child = child.clone();
                child.move_by(self.position.to_vec2());
                child
            })
            .collect()
    }

    /// Dissolve the group, returning its children in absolute coordinates.
    pub fn into_children(self) -> Vec<Shape> {
        let delta = self.position.to_vec2();
        self.children
            .into_iter()
            .map(|mut child| {
                child.move_by(delta);
                child
            })
            .collect()
    }

    /// Rebuild a group from its serialized form and already-parsed
    /// children (absolute coordinates, in serialized order).
    pub fn from_json(value: &Value, children: Vec<Shape>) -> ShapeResult<Self> {
        let obj = json::expect_type(value, Self::TYPE)?;
        let declared = match obj.get("children") {
            Some(Value::Array(items)) => items.len(),
            Some(_) => {
                return Err(ShapeError::MalformedField {
                    field: "children",
                    reason: "expected an array".into(),
                });
            }
            None => return Err(ShapeError::MissingField("children")),
        };
        if declared != children.len() {
            return Err(ShapeError::ChildCountMismatch {
                declared,
                supplied: children.len(),
            });
        }
        let mut group = Self {
            base: ShapeBase::from_json(obj)?,
            ..Self::default()
        };
        // Children carry absolute positions; the origin always follows them.
        group.adopt(children);
        group.base.edit(obj);
        let stored = |key: &str| obj.get(key).and_then(Value::as_f64);
        if stored("x").is_some_and(|x| x != group.position.x)
            || stored("y").is_some_and(|y| y != group.position.y)
        {
            log::debug!("group {} origin recomputed from its children", group.id());
        }
        Ok(group)
    }
}

fn union_bounds(shapes: &[Shape]) -> Rect {
    shapes
        .iter()
        .map(|s| s.bounds())
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO)
}

impl ShapeTrait for Group {
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
        union_bounds(&self.children) + self.position.to_vec2()
    }

    /// The group's own margin bounds how far outside the union of its
    /// children a hit may land.
    fn hit_test(&self, point: Point) -> bool {
        let margin = self.hit_margin();
        if !rect_contains(self.bounds().inflate(margin, margin), point) {
            return false;
        }
        let local = point - self.position.to_vec2();
        self.children.iter().any(|child| child.hit_test(local))
    }

    fn draw(&self, surface: &mut dyn Surface, offset: Vec2) {
        let offset = offset + self.position.to_vec2();
        for child in &self.children {
            child.draw(surface, offset);
        }
    }

    fn selection_handles(&self, offset: Vec2) -> Vec<Affordance> {
        vec![Affordance::Box(HandleBox::around(self.bounds() + offset))]
    }

    fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Position keys move the group; style keys cascade to every child.
    fn edit(&mut self, patch: &EditPatch) {
        self.base.edit(patch);
        edit_position(&mut self.position, patch);
        let style: EditPatch = patch
            .iter()
            .filter(|(k, _)| ShapeStyle::KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !style.is_empty() {
            for child in &mut self.children {
                child.edit(&style);
            }
        }
    }

    fn to_json(&self) -> Value {
        let mut map = Map::new();
        self.base.write_json(Self::TYPE, &mut map);
        let bounds = self.bounds();
        map.insert("x".into(), json!(self.position.x));
        map.insert("y".into(), json!(self.position.y));
        map.insert("width".into(), json!(bounds.width()));
        map.insert("height".into(), json!(bounds.height()));
        map.insert(
            "children".into(),
            Value::Array(self.absolute_children().iter().map(|c| c.to_json()).collect()),
        );
        Value::Object(map)
    }
}
