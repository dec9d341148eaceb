//! Drag wires between component terminals.

use super::{Tool, prepare};
use crate::drawing::{DrawingManager, WireEnd};
use crate::input::MouseEvent;
use crate::shapes::{Shape, ShapeId, TerminalRef, Wire};

#[derive(Debug, Clone, Copy, PartialEq)]
struct InProgress {
    id: ShapeId,
    from: Option<TerminalRef>,
}

/// Press on (or near) a terminal, drag, release on another terminal.
/// Either end may also be left free on the canvas.
#[derive(Debug, Default)]
pub struct WireTool {
    drawing: Option<InProgress>,
}

impl WireTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for WireTool {
    fn deactivate(&mut self, scene: &mut DrawingManager) {
        if let Some(current) = self.drawing.take() {
            scene.remove_element(current.id);
            scene.request_render();
        }
    }

    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        self.deactivate(scene);
        let p = event.position;
        let wire = Wire::from_points(vec![p, p]);
        let id = scene.add_element(prepare(Shape::Wire(wire), scene.config()));
        let from = scene.terminal_at(p);
        if let Some(terminal) = from {
            scene.connect_wire(id, WireEnd::Start, terminal);
        }
        self.drawing = Some(InProgress { id, from });
        scene.request_render();
    }

    fn on_mouse_move(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let Some(current) = self.drawing else {
            return;
        };
        if let Some(w) = scene.get_mut(current.id).and_then(Shape::as_wire_mut) {
            w.set_end_point(event.position);
            scene.request_render();
        }
    }

    fn on_mouse_up(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        self.on_mouse_move(scene, event);
        let Some(current) = self.drawing.take() else {
            return;
        };
        let to = scene
            .terminal_at(event.position)
            .filter(|t| Some(*t) != current.from);
        if let Some(terminal) = to {
            scene.connect_wire(current.id, WireEnd::End, terminal);
        }
        if scene.get(current.id).is_some_and(Shape::is_degenerate) {
            scene.remove_element(current.id);
            log::debug!("discarded zero-length wire");
        }
        scene.request_render();
    }
}
