//! Pointer-sampled strokes.

use super::{Tool, prepare};
use crate::drawing::DrawingManager;
use crate::input::MouseEvent;
use crate::shapes::{Freehand, Shape, ShapeId};

#[derive(Debug, Default)]
pub struct FreehandTool {
    drawing: Option<ShapeId>,
}

impl FreehandTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn stroke_mut(scene: &mut DrawingManager, id: ShapeId) -> Option<&mut Freehand> {
        match scene.get_mut(id) {
            Some(Shape::Freehand(f)) => Some(f),
            _ => None,
        }
    }
}

impl Tool for FreehandTool {
    fn deactivate(&mut self, scene: &mut DrawingManager) {
        if let Some(id) = self.drawing.take() {
            scene.remove_element(id);
            scene.request_render();
        }
    }

    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        self.deactivate(scene);
        let stroke = Freehand::from_points(vec![event.position]);
        self.drawing = Some(scene.add_element(prepare(Shape::Freehand(stroke), scene.config())));
        scene.request_render();
    }

    fn on_mouse_move(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let Some(id) = self.drawing else {
            return;
        };
        if let Some(stroke) = Self::stroke_mut(scene, id) {
            if stroke.points().last() != Some(&event.position) {
                stroke.push_point(event.position);
                scene.request_render();
            }
        }
    }

    fn on_mouse_up(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        self.on_mouse_move(scene, event);
        let Some(id) = self.drawing.take() else {
            return;
        };
        if scene.get(id).is_some_and(Shape::is_degenerate) {
            scene.remove_element(id);
            log::debug!("discarded single-point stroke");
        } else {
            let tolerance = scene.config().freehand_tolerance;
            if let Some(stroke) = Self::stroke_mut(scene, id) {
                stroke.simplify(tolerance);
            }
        }
        scene.request_render();
    }
}
