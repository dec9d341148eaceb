//! Drag-to-create tools for box and two-point shapes.

use super::{Tool, prepare};
use crate::drawing::DrawingManager;
use crate::input::MouseEvent;
use crate::shapes::{Circle, ImageShape, Line, PointShape, Rectangle, Shape, ShapeId, SvgDrawing};
use kurbo::Point;

/// What a [`DragCreateTool`] draws.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateKind {
    /// From the press point to the pointer.
    Line,
    /// Corner to corner.
    Rectangle,
    /// Centered on the press point, radius follows the pointer.
    Circle,
    /// A marker that follows the pointer until release.
    Point,
    /// A placement box for the given image source.
    Image(String),
    /// A placement box for the given SVG markup.
    Svg(String),
}

impl CreateKind {
    fn start(&self, origin: Point, config_radius: f64) -> Shape {
        match self {
            CreateKind::Line => Shape::Line(Line::new(origin, origin)),
            CreateKind::Rectangle => Shape::Rectangle(Rectangle::new(origin, 0.0, 0.0)),
            CreateKind::Circle => Shape::Circle(Circle::new(origin, 0.0)),
            CreateKind::Point => {
                let mut point = PointShape::new(origin);
                point.set_radius(config_radius);
                Shape::Point(point)
            }
            CreateKind::Image(source) => Shape::Image(ImageShape::new(origin, 0.0, 0.0, source.clone())),
            CreateKind::Svg(markup) => Shape::Svg(SvgDrawing::new(origin, 0.0, 0.0, markup.clone())),
        }
    }
}

/// Update the shape being drawn so it spans `origin` to `pointer`.
fn follow(shape: &mut Shape, origin: Point, pointer: Point) {
    match shape {
        Shape::Line(l) => {
            l.set_end(pointer);
        }
        Shape::Rectangle(r) => r.set_corners(origin, pointer),
        Shape::Circle(c) => {
            c.set_radius((pointer - origin).hypot());
        }
        Shape::Point(p) => {
            p.set_center(pointer);
        }
        Shape::Image(i) => i.set_corners(origin, pointer),
        Shape::Svg(s) => s.set_corners(origin, pointer),
        _ => {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct InProgress {
    id: ShapeId,
    origin: Point,
}

/// Press to start a shape, drag to size it, release to commit.
#[derive(Debug)]
pub struct DragCreateTool {
    kind: CreateKind,
    drawing: Option<InProgress>,
}

impl DragCreateTool {
    pub fn new(kind: CreateKind) -> Self {
        Self { kind, drawing: None }
    }

    pub fn kind(&self) -> &CreateKind {
        &self.kind
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.is_some()
    }
}

impl Tool for DragCreateTool {
    fn deactivate(&mut self, scene: &mut DrawingManager) {
        if let Some(current) = self.drawing.take() {
            scene.remove_element(current.id);
            log::debug!("discarded unfinished {:?}", self.kind);
            scene.request_render();
        }
    }

    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        // A press without a release (pointer lost) abandons the old shape.
        self.deactivate(scene);
        let origin = event.position;
        let shape = prepare(self.kind.start(origin, scene.config().point_radius), scene.config());
        let id = scene.add_element(shape);
        self.drawing = Some(InProgress { id, origin });
        scene.request_render();
    }

    fn on_mouse_move(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let Some(current) = self.drawing else {
            return;
        };
        if let Some(shape) = scene.get_mut(current.id) {
            follow(shape, current.origin, event.position);
            scene.request_render();
        }
    }

    fn on_mouse_up(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        self.on_mouse_move(scene, event);
        let Some(current) = self.drawing.take() else {
            return;
        };
        if scene.get(current.id).is_some_and(Shape::is_degenerate) {
            scene.remove_element(current.id);
            log::debug!("discarded degenerate {:?}", self.kind);
        }
        scene.request_render();
    }
}
