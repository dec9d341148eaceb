//! Pointer input types delivered to tools.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn toggles(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Whether any selection-modifying key is held.
    pub fn extends_selection(&self) -> bool {
        self.shift || self.toggles()
    }
}

/// A pointer sample in canvas-logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseEvent {
    pub position: Point,
    #[serde(default)]
    pub button: MouseButton,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl MouseEvent {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self::new(Point::new(x, y))
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Pointer events forwarded by the host canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(MouseEvent),
    Move(MouseEvent),
    Up(MouseEvent),
    /// The pointer left the canvas.
    Out(MouseEvent),
}

impl PointerEvent {
    pub fn event(&self) -> &MouseEvent {
        match self {
            PointerEvent::Down(e)
            | PointerEvent::Move(e)
            | PointerEvent::Up(e)
            | PointerEvent::Out(e) => e,
        }
    }

    pub fn position(&self) -> Point {
        self.event().position
    }
}

/// Map a device-pixel position (relative to the canvas origin) to logical
/// canvas coordinates.
pub fn to_logical(device: Point, scale_factor: f64) -> Point {
    if !(scale_factor.is_finite() && scale_factor > 0.0) {
        log::warn!("ignoring invalid scale factor {scale_factor}");
        return device;
    }
    Point::new(device.x / scale_factor, device.y / scale_factor)
}

/// Delta between two pointer positions.
pub fn pointer_delta(from: Point, to: Point) -> Vec2 {
    to - from
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_logical() {
        let p = to_logical(Point::new(200.0, 100.0), 2.0);
        assert!((p.x - 100.0).abs() < f64::EPSILON);
        assert!((p.y - 50.0).abs() < f64::EPSILON);
        let p = to_logical(Point::new(200.0, 100.0), 0.0);
        assert!((p.x - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_modifier_helpers() {
        assert!(Modifiers::shift().extends_selection());
        assert!(Modifiers::ctrl().toggles());
        assert!(!Modifiers::NONE.extends_selection());
    }

    #[test]
    fn test_event_accessors() {
        let e = PointerEvent::Out(MouseEvent::at(3.0, 4.0));
        assert_eq!(e.position(), Point::new(3.0, 4.0));
    }
}
