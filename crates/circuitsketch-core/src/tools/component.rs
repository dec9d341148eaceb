//! Click to place a catalog component.

use super::Tool;
use crate::drawing::DrawingManager;
use crate::input::MouseEvent;

#[derive(Debug, Clone)]
pub struct ComponentTool {
    definition: String,
}

impl ComponentTool {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into(),
        }
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }
}

impl Tool for ComponentTool {
    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        if scene.create_component(&self.definition, event.position).is_some() {
            scene.request_render();
        }
    }
}
