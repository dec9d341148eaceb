//! Click to place a text box.

use super::{EditRequestSource, Tool, prepare};
use crate::drawing::DrawingManager;
use crate::input::MouseEvent;
use crate::shapes::{Shape, TextBox};
use std::fmt;
use std::rc::Rc;

pub struct TextTool {
    edits: Rc<dyn EditRequestSource>,
}

impl fmt::Debug for TextTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextTool").finish_non_exhaustive()
    }
}

impl TextTool {
    pub fn new(edits: Rc<dyn EditRequestSource>) -> Self {
        Self { edits }
    }
}

impl Tool for TextTool {
    fn on_mouse_down(&mut self, scene: &mut DrawingManager, event: &MouseEvent) {
        let Some(text) = self.edits.request_text("Text") else {
            return;
        };
        let mut text_box = TextBox::new(event.position, text);
        text_box.set_font_size(scene.config().font_size);
        let shape = prepare(Shape::Text(text_box), scene.config());
        if shape.is_degenerate() {
            log::debug!("discarded empty text");
            return;
        }
        scene.add_element(shape);
        scene.request_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::EditPatch;
    use serde_json::Value;

    struct Answer(Option<&'static str>);

    impl EditRequestSource for Answer {
        fn request_patch(&self, _current: &Value) -> Option<EditPatch> {
            None
        }

        fn request_text(&self, _prompt: &str) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    #[test]
    fn test_places_text() {
        let mut scene = DrawingManager::new();
        let mut tool = TextTool::new(Rc::new(Answer(Some("R1 = 10k"))));
        tool.on_mouse_down(&mut scene, &MouseEvent::at(5.0, 5.0));
        match &scene.elements()[0] {
            Shape::Text(t) => {
                assert_eq!(t.text(), "R1 = 10k");
                assert!((t.font_size() - scene.config().font_size).abs() < f64::EPSILON);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_or_cancelled_discarded() {
        let mut scene = DrawingManager::new();
        TextTool::new(Rc::new(Answer(Some("   ")))).on_mouse_down(&mut scene, &MouseEvent::at(0.0, 0.0));
        TextTool::new(Rc::new(Answer(None))).on_mouse_down(&mut scene, &MouseEvent::at(0.0, 0.0));
        assert!(scene.is_empty());
    }
}
