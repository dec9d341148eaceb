//! Selection affordances: handles, handle boxes and terminal anchors.
//!
//! These are drawn only while a shape is selected and are never part of the
//! persisted scene.

use crate::surface::{StrokeParams, Surface};
use crate::validate;
use kurbo::{Point, Rect};
use peniko::Color;

/// Default handle edge length in pixels.
pub const DEFAULT_HANDLE_SIZE: f64 = 6.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// What a handle represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Corner of a bounding box.
    Corner(Corner),
    /// Editable vertex of a point-based shape.
    Node(usize),
}

/// Visual shape of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleShape {
    #[default]
    Square,
    Circle,
}

/// A small square or round affordance.
#[derive(Debug, Clone, PartialEq)]
pub struct Handle {
    /// Center in world coordinates.
    pub position: Point,
    pub kind: HandleKind,
    pub shape: HandleShape,
    size: f64,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self {
            position,
            kind,
            shape: HandleShape::default(),
            size: DEFAULT_HANDLE_SIZE,
        }
    }

    pub fn with_shape(mut self, shape: HandleShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn set_size(&mut self, size: f64) -> bool {
        validate::assign(&mut self.size, "handle.size", size, validate::is_positive)
    }

    pub fn rect(&self) -> Rect {
        let half = self.size / 2.0;
        Rect::new(
            self.position.x - half,
            self.position.y - half,
            self.position.x + half,
            self.position.y + half,
        )
    }

    /// Whether `point` grabs this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = self.size / 2.0 + tolerance;
        (point - self.position).hypot2() <= reach * reach
    }

    pub fn draw(&self, surface: &mut dyn Surface, color: Color) {
        surface.save();
        surface.set_stroke(&StrokeParams::solid(color, 1.0));
        surface.set_fill(Color::WHITE);
        surface.begin_path();
        match self.shape {
            HandleShape::Square => surface.rect(self.rect()),
            HandleShape::Circle => {
                surface.arc(self.position, self.size / 2.0, 0.0, std::f64::consts::TAU)
            }
        }
        surface.fill();
        surface.stroke();
        surface.restore();
    }
}

/// A dashed outline around a shape's bounds with four corner handles.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleBox {
    pub bounds: Rect,
    pub corners: [Handle; 4],
}

impl HandleBox {
    pub fn around(bounds: Rect) -> Self {
        let corner = |x: f64, y: f64, c: Corner| Handle::new(Point::new(x, y), HandleKind::Corner(c));
        Self {
            bounds,
            corners: [
                corner(bounds.x0, bounds.y0, Corner::TopLeft),
                corner(bounds.x1, bounds.y0, Corner::TopRight),
                corner(bounds.x0, bounds.y1, Corner::BottomLeft),
                corner(bounds.x1, bounds.y1, Corner::BottomRight),
            ],
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, color: Color) {
        surface.save();
        surface.set_stroke(&StrokeParams::solid(color, 1.0).dashed(&[4.0, 3.0]));
        surface.begin_path();
        surface.rect(self.bounds);
        surface.stroke();
        surface.restore();
        for handle in &self.corners {
            handle.draw(surface, color);
        }
    }
}

/// Marker drawn on a component terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleAnchor {
    pub position: Point,
    pub connected: bool,
    radius: f64,
}

impl HandleAnchor {
    pub const DEFAULT_RADIUS: f64 = 3.0;

    pub fn new(position: Point, connected: bool) -> Self {
        Self {
            position,
            connected,
            radius: Self::DEFAULT_RADIUS,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f64) -> bool {
        validate::assign(&mut self.radius, "anchor.radius", radius, validate::is_positive)
    }

    pub fn draw(&self, surface: &mut dyn Surface, color: Color) {
        surface.save();
        surface.set_stroke(&StrokeParams::solid(color, 1.0));
        surface.set_fill(color);
        surface.begin_path();
        surface.arc(self.position, self.radius, 0.0, std::f64::consts::TAU);
        if self.connected {
            surface.fill();
        }
        surface.stroke();
        surface.restore();
    }
}

/// One selection affordance produced by a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Affordance {
    Box(HandleBox),
    Node(Handle),
    Anchor(HandleAnchor),
}

/// Draw a list of affordances in order.
pub fn draw_affordances(surface: &mut dyn Surface, affordances: &[Affordance], color: Color) {
    for affordance in affordances {
        match affordance {
            Affordance::Box(b) => b.draw(surface, color),
            Affordance::Node(h) => h.draw(surface, color),
            Affordance::Anchor(a) => a.draw(surface, color),
        }
    }
}

/// Node handles for a list of vertices.
pub fn node_handles(points: &[Point]) -> Vec<Affordance> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| Affordance::Node(Handle::new(*p, HandleKind::Node(i)).with_shape(HandleShape::Circle)))
        .collect()
}
