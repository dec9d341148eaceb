//! Tools that act on existing shapes: move, rotate, delete, properties.

use super::select::click_select;
use super::{EditRequestSource, Tool};
use crate::drawing::DrawingManager;
use crate::input::MouseEvent;
use crate::shapes::ShapeTrait;
use kurbo::{Point, Vec2};
use std::fmt;
use std::rc::Rc;

/// Drag shapes without marquee selection. Pressing on empty canvas does
/// nothing.
#[derive(Debug, Default)]
pub struct MoveTool {
    last: Option<Point>,
}

impl MoveTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for MoveTool {
    fn deactivate(&mut self, _scene: &mut DrawingManager) {
        self.last = None;
    }

    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let Some(id) = scene.find_element_at(event.position) else {
            return;
        };
        if !scene.is_selected(id) {
            scene.select_only(id);
        }
        self.last = Some(event.position);
        scene.request_render();
    }

    fn on_mouse_move(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let Some(last) = self.last else {
            return;
        };
        let delta: Vec2 = event.position - last;
        if delta != Vec2::ZERO {
            scene.move_selected(delta);
            self.last = Some(event.position);
            scene.request_render();
        }
    }

    fn on_mouse_up(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        self.on_mouse_move(scene, event);
        self.last = None;
    }
}

/// Builds the selection that rotate and flip commands act on.
#[derive(Debug, Default)]
pub struct RotateTool;

impl RotateTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for RotateTool {
    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let hit = scene.find_element_at(event.position);
        click_select(scene, hit, event.modifiers);
        scene.request_render();
    }
}

/// Click a shape to remove it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeleteTool;

impl Tool for DeleteTool {
    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        if let Some(id) = scene.find_element_at(event.position) {
            scene.remove_element(id);
            scene.request_render();
        }
    }
}

/// Click a shape to edit its properties through an [`EditRequestSource`].
pub struct PropertiesTool {
    edits: Rc<dyn EditRequestSource>,
}

impl fmt::Debug for PropertiesTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertiesTool").finish_non_exhaustive()
    }
}

impl PropertiesTool {
    pub fn new(edits: Rc<dyn EditRequestSource>) -> Self {
        Self { edits }
    }
}

impl Tool for PropertiesTool {
    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let Some(id) = scene.find_element_at(event.position) else {
            return;
        };
        let Some(current) = scene.get(id).map(ShapeTrait::to_json) else {
            return;
        };
        let Some(patch) = self.edits.request_patch(&current) else {
            log::debug!("property edit of {id} cancelled");
            return;
        };
        if let Some(shape) = scene.get_mut(id) {
            shape.edit(&patch);
        }
        scene.sync_wires();
        scene.request_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::shapes::{Rectangle, Shape};
    use crate::validate::EditPatch;
    use crate::test_log;
    use serde_json::{Value, json};

    fn rect_scene() -> (DrawingManager, crate::shapes::ShapeId) {
        let mut scene = DrawingManager::new();
        let id = scene.add_element(Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 20.0, 20.0)));
        (scene, id)
    }

    struct FixedPatch(Value);

    impl EditRequestSource for FixedPatch {
        fn request_patch(&self, current: &Value) -> Option<EditPatch> {
            assert_eq!(current["type"], "Rectangle");
            self.0.as_object().cloned()
        }

        fn request_text(&self, _prompt: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_move_tool_drags_hit_shape() {
        let (mut scene, id) = rect_scene();
        let mut tool = MoveTool::new();
        tool.on_mouse_down(&mut scene, &MouseEvent::at(5.0, 5.0));
        tool.on_mouse_move(&mut scene, &MouseEvent::at(15.0, 25.0));
        tool.on_mouse_up(&mut scene, &MouseEvent::at(15.0, 25.0));
        let b = scene.get(id).unwrap().bounds();
        assert!((b.x0 - 10.0).abs() < f64::EPSILON);
        assert!((b.y0 - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_move_tool_ignores_empty_canvas() {
        let (mut scene, id) = rect_scene();
        let mut tool = MoveTool::new();
        tool.on_mouse_down(&mut scene, &MouseEvent::at(200.0, 200.0));
        tool.on_mouse_move(&mut scene, &MouseEvent::at(220.0, 200.0));
        assert!((scene.get(id).unwrap().bounds().x0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotate_tool_selects() {
        let (mut scene, id) = rect_scene();
        let mut tool = RotateTool::new();
        tool.on_mouse_down(&mut scene, &MouseEvent::at(5.0, 5.0));
        assert!(scene.is_selected(id));
        tool.on_mouse_down(
            &mut scene,
            &MouseEvent::at(5.0, 5.0).with_modifiers(Modifiers::ctrl()),
        );
        assert!(!scene.is_selected(id));
    }

    #[test]
    fn test_delete_tool_removes_hit() {
        let (mut scene, _) = rect_scene();
        let mut tool = DeleteTool;
        tool.on_mouse_down(&mut scene, &MouseEvent::at(100.0, 100.0));
        assert_eq!(scene.len(), 1);
        tool.on_mouse_down(&mut scene, &MouseEvent::at(5.0, 5.0));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_properties_tool_applies_patch() {
        let capture = test_log::capture();
        let (mut scene, id) = rect_scene();
        let mut tool = PropertiesTool::new(Rc::new(FixedPatch(json!({
            "width": 80,
            "height": -4,
            "bogus": true,
        }))));
        tool.on_mouse_down(&mut scene, &MouseEvent::at(5.0, 5.0));
        let b = scene.get(id).unwrap().bounds();
        assert!((b.width() - 80.0).abs() < f64::EPSILON);
        assert!((b.height() - 20.0).abs() < f64::EPSILON);
        assert_eq!(capture.warnings().len(), 1);
    }
}
