//! Drag individual vertices of point-based shapes.

use super::Tool;
use crate::drawing::{DrawingManager, WireEnd};
use crate::input::MouseEvent;
use crate::shapes::{Shape, ShapeId, ShapeTrait};
use kurbo::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grab {
    id: ShapeId,
    index: usize,
}

/// Which wire end, if any, vertex `index` of a chain of `len` is.
fn wire_end(index: usize, len: usize) -> Option<WireEnd> {
    if index == 0 {
        Some(WireEnd::Start)
    } else if index + 1 == len {
        Some(WireEnd::End)
    } else {
        None
    }
}

/// Press on a node of a selected shape and drag it. Pressing elsewhere on a
/// shape selects it so its nodes show.
///
/// Wire ends dragged off a terminal come loose; released on a terminal they
/// attach to it.
#[derive(Debug, Default)]
pub struct NodeEditTool {
    grab: Option<Grab>,
}

impl NodeEditTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn node_at(scene: &DrawingManager, point: Point) -> Option<Grab> {
        let reach = scene.config().handle_size / 2.0;
        scene.elements().iter().rev().filter(|s| s.is_selected()).find_map(|shape| {
            let tolerance = reach + shape.hit_margin();
            shape
                .nodes()
                .iter()
                .position(|n| (*n - point).hypot() <= tolerance)
                .map(|index| Grab { id: shape.id(), index })
        })
    }

    fn grabbed_wire_end(scene: &DrawingManager, grab: Grab) -> Option<WireEnd> {
        let wire = scene.get(grab.id).and_then(Shape::as_wire)?;
        wire_end(grab.index, wire.points().len())
    }
}

impl Tool for NodeEditTool {
    fn deactivate(&mut self, _scene: &mut DrawingManager) {
        self.grab = None;
    }

    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let p = event.position;
        self.grab = Self::node_at(scene, p);
        match self.grab {
            Some(grab) => {
                if let Some(end) = Self::grabbed_wire_end(scene, grab) {
                    scene.disconnect_wire(grab.id, end);
                }
            }
            None => match scene.find_element_at(p) {
                Some(id) => scene.select_only(id),
                None => scene.deselect_all(),
            },
        }
        scene.request_render();
    }

    fn on_mouse_move(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let Some(grab) = self.grab else {
            return;
        };
        if let Some(shape) = scene.get_mut(grab.id) {
            shape.set_node(grab.index, event.position);
            scene.request_render();
        }
    }

    fn on_mouse_up(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        self.on_mouse_move(scene, event);
        let Some(grab) = self.grab.take() else {
            return;
        };
        if let Some(end) = Self::grabbed_wire_end(scene, grab) {
            if let Some(terminal) = scene.terminal_at(event.position) {
                scene.connect_wire(grab.id, end, terminal);
            }
        }
        scene.request_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, Wire};

    #[test]
    fn test_drag_line_end() {
        let mut scene = DrawingManager::new();
        let id = scene.add_element(Shape::Line(Line::new(Point::new(0.0, 0.0), Point::new(50.0, 0.0))));
        let mut tool = NodeEditTool::new();

        // First press selects, second grabs the node.
        tool.on_mouse_down(&mut scene, &MouseEvent::at(25.0, 0.0));
        tool.on_mouse_up(&mut scene, &MouseEvent::at(25.0, 0.0));
        assert!(scene.is_selected(id));

        tool.on_mouse_down(&mut scene, &MouseEvent::at(51.0, 1.0));
        tool.on_mouse_move(&mut scene, &MouseEvent::at(50.0, 40.0));
        tool.on_mouse_up(&mut scene, &MouseEvent::at(50.0, 40.0));
        assert_eq!(scene.get(id).unwrap().nodes(), vec![Point::new(0.0, 0.0), Point::new(50.0, 40.0)]);
    }

    #[test]
    fn test_wire_end_reattaches() {
        let mut scene = DrawingManager::new();
        let left = scene.create_component("resistor", Point::new(30.0, 10.0)).unwrap();
        let right = scene.create_component("resistor", Point::new(130.0, 110.0)).unwrap();
        let id = scene.add_element(Shape::Wire(Wire::from_points(vec![
            Point::new(60.0, 10.0),
            Point::new(200.0, 10.0),
        ])));
        let start = scene.terminal_at(Point::new(60.0, 10.0)).unwrap();
        assert!(scene.connect_wire(id, WireEnd::Start, start));
        scene.select_only(id);

        let mut tool = NodeEditTool::new();
        tool.on_mouse_down(&mut scene, &MouseEvent::at(60.0, 10.0));
        tool.on_mouse_move(&mut scene, &MouseEvent::at(80.0, 80.0));
        tool.on_mouse_up(&mut scene, &MouseEvent::at(101.0, 110.0));

        let w = scene.get(id).unwrap().as_wire().unwrap();
        assert_eq!(w.start_terminal().map(|t| t.component), Some(right));
        assert_eq!(w.points()[0], Point::new(100.0, 110.0));
        let old = scene.get(left).unwrap().as_component().unwrap();
        assert!(old.terminals().iter().all(|t| !t.is_connected()));
    }

    #[test]
    fn test_wire_end_helper() {
        assert_eq!(wire_end(0, 3), Some(WireEnd::Start));
        assert_eq!(wire_end(2, 3), Some(WireEnd::End));
        assert_eq!(wire_end(1, 3), None);
    }
}
