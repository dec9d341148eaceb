//! Two-phase quadratic curve tool.
//!
//! The first drag sets the chord from start to end; the second press and
//! drag places the control point.

use super::{Tool, prepare};
use crate::drawing::DrawingManager;
use crate::input::MouseEvent;
use crate::shapes::{Shape, ShapeId, ThreePointCurve};
use kurbo::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
enum CurveState {
    Idle,
    /// Dragging out the chord.
    Chord { id: ShapeId, start: Point },
    /// Chord placed; waiting for the press that grabs the control point.
    AwaitControl { id: ShapeId },
    /// Dragging the control point.
    Bending { id: ShapeId },
}

#[derive(Debug)]
pub struct CurveTool {
    state: CurveState,
}

impl Default for CurveTool {
    fn default() -> Self {
        Self::new()
    }
}

impl CurveTool {
    pub fn new() -> Self {
        Self {
            state: CurveState::Idle,
        }
    }

    /// Whether a chord has been placed and the control point is pending.
    pub fn awaiting_control(&self) -> bool {
        matches!(self.state, CurveState::AwaitControl { .. })
    }

    fn curve_mut(scene: &mut DrawingManager, id: ShapeId) -> Option<&mut ThreePointCurve> {
        match scene.get_mut(id) {
            Some(Shape::Curve(c)) => Some(c),
            _ => None,
        }
    }
}

impl Tool for CurveTool {
    /// Only an unfinished chord is removed; a placed chord is already a
    /// valid (straight) curve and is kept.
    fn deactivate(&mut self, scene: &mut DrawingManager) {
        if let CurveState::Chord { id, .. } = self.state {
            scene.remove_element(id);
            scene.request_render();
        }
        self.state = CurveState::Idle;
    }

    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let p = event.position;
        self.state = match self.state {
            CurveState::AwaitControl { id } if scene.get(id).is_some() => {
                if let Some(c) = Self::curve_mut(scene, id) {
                    c.set_control(p);
                }
                CurveState::Bending { id }
            }
            _ => {
                self.deactivate(scene);
                let curve = ThreePointCurve::new(p, p, p).with_samples(scene.config().curve_samples);
                let id = scene.add_element(prepare(Shape::Curve(curve), scene.config()));
                CurveState::Chord { id, start: p }
            }
        };
        scene.request_render();
    }

    fn on_mouse_move(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let p = event.position;
        match self.state {
            CurveState::Chord { id, start } => {
                if let Some(c) = Self::curve_mut(scene, id) {
                    c.set_end(p);
                    c.set_control(start.midpoint(p));
                }
            }
            CurveState::Bending { id } => {
                if let Some(c) = Self::curve_mut(scene, id) {
                    c.set_control(p);
                }
            }
            CurveState::Idle | CurveState::AwaitControl { .. } => return,
        }
        scene.request_render();
    }

    fn on_mouse_up(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        self.on_mouse_move(scene, event);
        self.state = match self.state {
            CurveState::Chord { id, start } => {
                if start == event.position {
                    scene.remove_element(id);
                    log::debug!("discarded zero-length curve");
                    CurveState::Idle
                } else {
                    CurveState::AwaitControl { id }
                }
            }
            CurveState::Bending { .. } => CurveState::Idle,
            other => other,
        };
        scene.request_render();
    }
}
