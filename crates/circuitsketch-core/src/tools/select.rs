//! Click, marquee and drag selection.

use super::Tool;
use crate::drawing::DrawingManager;
use crate::input::{Modifiers, MouseEvent};
use crate::shapes::ShapeId;
use kurbo::{Point, Vec2};

#[derive(Debug, Clone, Copy, PartialEq)]
enum SelectState {
    Idle,
    /// Rubber-band selection from `origin`.
    Marquee { origin: Point, incremental: bool },
    /// Dragging the selection; `last` is the previous pointer position.
    Dragging { last: Point },
}

/// Apply click-selection semantics to `hit`.
///
/// Shift adds, ctrl/cmd toggles, and a plain click selects only the hit
/// shape unless it is already part of the selection. A plain click on
/// empty canvas clears the selection. Returns whether the hit shape ended
/// up selected.
pub(crate) fn click_select(scene: &mut DrawingManager, hit: Option<ShapeId>, modifiers: Modifiers) -> bool {
    match hit {
        Some(id) if modifiers.shift => {
            scene.select(id);
            true
        }
        Some(id) if modifiers.toggles() => {
            scene.toggle_selection(id);
            scene.is_selected(id)
        }
        Some(id) => {
            if !scene.is_selected(id) {
                scene.select_only(id);
            }
            true
        }
        None => {
            if !modifiers.extends_selection() {
                scene.deselect_all();
            }
            false
        }
    }
}

/// The default tool: pick, marquee-select and drag shapes.
#[derive(Debug)]
pub struct SelectTool {
    state: SelectState,
}

impl Default for SelectTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectTool {
    pub fn new() -> Self {
        Self {
            state: SelectState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SelectState::Dragging { .. })
    }
}

impl Tool for SelectTool {
    fn deactivate(&mut self, scene: &mut DrawingManager) {
        if matches!(self.state, SelectState::Marquee { .. }) {
            scene.clear_selection_rectangle();
            scene.request_render();
        }
        self.state = SelectState::Idle;
    }

    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let p = event.position;
        let hit = scene.find_element_at(p);
        let grabbed = click_select(scene, hit, event.modifiers);
        self.state = if grabbed {
            SelectState::Dragging { last: p }
        } else if hit.is_none() {
            scene.set_selection_rectangle(p, p);
            SelectState::Marquee {
                origin: p,
                incremental: event.modifiers.extends_selection(),
            }
        } else {
            SelectState::Idle
        };
        scene.request_render();
    }

    fn on_mouse_move(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let p = event.position;
        match &mut self.state {
            SelectState::Idle => {}
            SelectState::Marquee { origin, .. } => {
                scene.set_selection_rectangle(*origin, p);
                scene.request_render();
            }
            SelectState::Dragging { last } => {
                let delta: Vec2 = p - *last;
                if delta != Vec2::ZERO {
                    scene.move_selected(delta);
                    *last = p;
                    scene.request_render();
                }
            }
        }
    }

    fn on_mouse_up(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        match self.state {
            SelectState::Idle => {}
            SelectState::Marquee { origin, incremental } => {
                scene.set_selection_rectangle(origin, event.position);
                scene.select_elements_in_rectangle(incremental);
                scene.clear_selection_rectangle();
            }
            SelectState::Dragging { .. } => self.on_mouse_move(scene, event),
        }
        self.state = SelectState::Idle;
        scene.request_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape, ShapeTrait};

    fn scene_with_two() -> (DrawingManager, ShapeId, ShapeId) {
        let mut scene = DrawingManager::new();
        let a = scene.add_element(Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 20.0, 20.0)));
        let b = scene.add_element(Shape::Rectangle(Rectangle::new(Point::new(100.0, 0.0), 20.0, 20.0)));
        (scene, a, b)
    }

    fn click(tool: &mut SelectTool, scene: &mut DrawingManager, event: MouseEvent) {
        tool.on_mouse_down(scene, &event);
        tool.on_mouse_up(scene, &event);
    }

    #[test]
    fn test_click_selects_only_hit() {
        let (mut scene, a, b) = scene_with_two();
        let mut tool = SelectTool::new();
        click(&mut tool, &mut scene, MouseEvent::at(10.0, 10.0));
        assert_eq!(scene.selected_ids(), vec![a]);
        click(&mut tool, &mut scene, MouseEvent::at(110.0, 10.0));
        assert_eq!(scene.selected_ids(), vec![b]);
        click(&mut tool, &mut scene, MouseEvent::at(60.0, 60.0));
        assert_eq!(scene.selection_count(), 0);
    }

    #[test]
    fn test_shift_adds_and_ctrl_toggles() {
        let (mut scene, a, b) = scene_with_two();
        let mut tool = SelectTool::new();
        click(&mut tool, &mut scene, MouseEvent::at(10.0, 10.0));
        click(
            &mut tool,
            &mut scene,
            MouseEvent::at(110.0, 10.0).with_modifiers(Modifiers::shift()),
        );
        assert_eq!(scene.selected_ids(), vec![a, b]);
        click(
            &mut tool,
            &mut scene,
            MouseEvent::at(10.0, 10.0).with_modifiers(Modifiers::ctrl()),
        );
        assert_eq!(scene.selected_ids(), vec![b]);
    }

    #[test]
    fn test_marquee_drag() {
        let (mut scene, a, _) = scene_with_two();
        let mut tool = SelectTool::new();
        tool.on_mouse_down(&mut scene, &MouseEvent::at(-10.0, -10.0));
        tool.on_mouse_move(&mut scene, &MouseEvent::at(40.0, 40.0));
        assert!(scene.selection_rectangle().is_some());
        tool.on_mouse_up(&mut scene, &MouseEvent::at(40.0, 40.0));
        assert_eq!(scene.selected_ids(), vec![a]);
        assert!(scene.selection_rectangle().is_none());
    }

    #[test]
    fn test_drag_moves_selection_incrementally() {
        let (mut scene, a, b) = scene_with_two();
        scene.select(a);
        scene.select(b);
        let mut tool = SelectTool::new();
        tool.on_mouse_down(&mut scene, &MouseEvent::at(10.0, 10.0));
        assert!(tool.is_dragging());
        tool.on_mouse_move(&mut scene, &MouseEvent::at(15.0, 10.0));
        tool.on_mouse_move(&mut scene, &MouseEvent::at(20.0, 12.0));
        tool.on_mouse_up(&mut scene, &MouseEvent::at(20.0, 12.0));
        let moved_a = scene.get(a).unwrap().bounds();
        let moved_b = scene.get(b).unwrap().bounds();
        assert!((moved_a.x0 - 10.0).abs() < f64::EPSILON);
        assert!((moved_a.y0 - 2.0).abs() < f64::EPSILON);
        assert!((moved_b.x0 - 110.0).abs() < f64::EPSILON);
        assert!(!tool.is_dragging());
    }

    #[test]
    fn test_deactivate_cancels_marquee() {
        let (mut scene, _, _) = scene_with_two();
        let mut tool = SelectTool::new();
        tool.on_mouse_down(&mut scene, &MouseEvent::at(-10.0, -10.0));
        tool.deactivate(&mut scene);
        assert!(scene.selection_rectangle().is_none());
    }
}
