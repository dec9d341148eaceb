//! Interaction tools.
//!
//! Each tool is a small per-gesture state machine driven by pointer events.
//! Exactly one tool is active at a time; switching tools deactivates the
//! outgoing one, which cancels whatever gesture it had in progress.

mod component;
mod create;
mod curve;
mod edit;
mod freehand;
mod node;
mod select;
mod text;
mod wire;

pub use component::ComponentTool;
pub use create::{CreateKind, DragCreateTool};
pub use curve::CurveTool;
pub use edit::{DeleteTool, MoveTool, PropertiesTool, RotateTool};
pub use freehand::FreehandTool;
pub use node::NodeEditTool;
pub use select::SelectTool;
pub use text::TextTool;
pub use wire::WireTool;

use crate::config::EditorConfig;
use crate::drawing::DrawingManager;
use crate::input::{MouseEvent, PointerEvent};
use crate::shapes::{Shape, ShapeTrait};
use crate::validate::EditPatch;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A pointer-driven interaction mode.
///
/// All handlers default to no-ops so a tool only implements the events it
/// cares about.
pub trait Tool {
    fn activate(&mut self, _scene: &mut DrawingManager) {}

    /// Cancel any gesture in progress.
    fn deactivate(&mut self, _scene: &mut DrawingManager) {}

    fn on_mouse_down(&mut self, _scene: &mut DrawingManager, _event: &MouseEvent) {}

    fn on_mouse_move(&mut self, _scene: &mut DrawingManager, _event: &MouseEvent) {}

    fn on_mouse_up(&mut self, _scene: &mut DrawingManager, _event: &MouseEvent) {}
}

/// Synchronous source of user edits, such as a modal prompt.
pub trait EditRequestSource {
    /// Ask for new property values for a shape, given its serialized form.
    /// `None` means the user cancelled.
    fn request_patch(&self, current: &Value) -> Option<EditPatch>;

    /// Ask for a line of text.
    fn request_text(&self, prompt: &str) -> Option<String>;
}

/// An edit source that always cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEdits;

impl EditRequestSource for NoEdits {
    fn request_patch(&self, _current: &Value) -> Option<EditPatch> {
        None
    }

    fn request_text(&self, _prompt: &str) -> Option<String> {
        None
    }
}

/// Apply the configured default style and hit margin to a new shape.
/// Wires keep their own stroke.
pub(crate) fn prepare(mut shape: Shape, config: &EditorConfig) -> Shape {
    if !matches!(shape, Shape::Wire(_)) {
        if let Some(style) = shape.style_mut() {
            style.clone_from(&config.default_style);
        }
    }
    shape.base_mut().set_hit_margin(config.hit_margin);
    shape
}

/// Registry of named tools with one active tool.
#[derive(Default)]
pub struct ToolManager {
    tools: HashMap<String, Box<dyn Tool>>,
    active: Option<String>,
}

impl fmt::Debug for ToolManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ToolManager")
            .field("tools", &names)
            .field("active", &self.active)
            .finish()
    }
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager with every built-in tool registered and `select` active.
    pub fn with_default_tools(edits: Rc<dyn EditRequestSource>) -> Self {
        let mut tools = Self::new();
        tools.add_tool("select", SelectTool::new());
        tools.add_tool("move", MoveTool::new());
        tools.add_tool("rotate", RotateTool::new());
        tools.add_tool("delete", DeleteTool);
        tools.add_tool("properties", PropertiesTool::new(edits.clone()));
        tools.add_tool("node", NodeEditTool::new());
        tools.add_tool("line", DragCreateTool::new(CreateKind::Line));
        tools.add_tool("rectangle", DragCreateTool::new(CreateKind::Rectangle));
        tools.add_tool("circle", DragCreateTool::new(CreateKind::Circle));
        tools.add_tool("point", DragCreateTool::new(CreateKind::Point));
        tools.add_tool("image", DragCreateTool::new(CreateKind::Image(String::new())));
        tools.add_tool("svg", DragCreateTool::new(CreateKind::Svg(String::new())));
        tools.add_tool("curve", CurveTool::new());
        tools.add_tool("freehand", FreehandTool::new());
        tools.add_tool("text", TextTool::new(edits));
        tools.add_tool("component", ComponentTool::new("resistor"));
        tools.add_tool("wire", WireTool::new());
        tools.active = Some("select".to_string());
        tools
    }

    /// Register a tool under `name`, replacing any previous one.
    pub fn add_tool(&mut self, name: impl Into<String>, tool: impl Tool + 'static) {
        let name = name.into();
        if self.tools.insert(name.clone(), Box::new(tool)).is_some() {
            log::debug!("replaced tool {name}");
        }
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn active_tool_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Deactivate the current tool and activate `name`. Unknown names are
    /// refused and leave the current tool active.
    pub fn set_active_tool(&mut self, name: &str, scene: &mut DrawingManager) -> bool {
        if !self.tools.contains_key(name) {
            log::warn!("unknown tool {name}");
            return false;
        }
        if let Some(tool) = self.active.as_deref().and_then(|n| self.tools.get_mut(n)) {
            tool.deactivate(scene);
        }
        if let Some(tool) = self.tools.get_mut(name) {
            tool.activate(scene);
        }
        log::debug!("active tool: {name}");
        self.active = Some(name.to_string());
        true
    }

    /// Forward a pointer event to the active tool. Leaving the canvas
    /// finishes a gesture as if the button were released there.
    pub fn dispatch(&mut self, event: &PointerEvent, scene: &mut DrawingManager) {
        let Some(tool) = self.active.as_deref().and_then(|n| self.tools.get_mut(n)) else {
            return;
        };
        match event {
            PointerEvent::Down(e) => tool.on_mouse_down(scene, e),
            PointerEvent::Move(e) => tool.on_mouse_move(scene, e),
            PointerEvent::Up(e) | PointerEvent::Out(e) => tool.on_mouse_up(scene, e),
        }
    }

    /// Swap the tool registered under `name`. When it is the active tool
    /// the old instance is deactivated and the new one activated, so no
    /// gesture is left dangling.
    pub fn replace_tool(&mut self, name: &str, tool: impl Tool + 'static, scene: &mut DrawingManager) {
        let active = self.active.as_deref() == Some(name);
        if active {
            if let Some(old) = self.tools.get_mut(name) {
                old.deactivate(scene);
            }
        }
        self.add_tool(name, tool);
        if active {
            if let Some(new) = self.tools.get_mut(name) {
                new.activate(scene);
            }
        }
    }
}
