//! Editor facade: one scene, its tools and its render scheduler.

use crate::config::EditorConfig;
use crate::drawing::DrawingManager;
use crate::error::ShapeResult;
use crate::input::PointerEvent;
use crate::resource::ResourceLoader;
use crate::schedule::RenderScheduler;
use crate::shapes::ShapeId;
use crate::surface::Surface;
use crate::tools::{
    ComponentTool, CreateKind, DragCreateTool, EditRequestSource, NoEdits, ToolManager,
};
use serde_json::Value;
use std::rc::Rc;

/// Everything a host needs to drive one drawing canvas.
///
/// Pointer events go through [`Editor::handle_pointer`]; toolbar actions
/// call the command methods. Every mutation requests a render, and
/// [`Editor::render`] paints at most once per scheduled frame.
#[derive(Debug)]
pub struct Editor {
    scene: DrawingManager,
    tools: ToolManager,
    scheduler: RenderScheduler,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default(), Rc::new(NoEdits))
    }

    pub fn with_config(config: EditorConfig, edits: Rc<dyn EditRequestSource>) -> Self {
        let scheduler = RenderScheduler::new();
        Self {
            scene: DrawingManager::with_config(config, scheduler.clone()),
            tools: ToolManager::with_default_tools(edits),
            scheduler,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        self.scene.config()
    }

    pub fn scene(&self) -> &DrawingManager {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut DrawingManager {
        &mut self.scene
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolManager {
        &mut self.tools
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    // --- Tools ---

    pub fn active_tool(&self) -> Option<&str> {
        self.tools.active_tool_name()
    }

    pub fn set_active_tool(&mut self, name: &str) -> bool {
        let switched = self.tools.set_active_tool(name, &mut self.scene);
        if switched {
            self.scheduler.request_render();
        }
        switched
    }

    /// Choose the catalog definition placed by the `component` tool.
    pub fn set_component_definition(&mut self, name: &str) -> bool {
        if self.scene.catalog().get(name).is_none() {
            log::warn!("unknown component definition {name}");
            return false;
        }
        self.tools
            .replace_tool("component", ComponentTool::new(name), &mut self.scene);
        true
    }

    /// Source placed by the `image` tool.
    pub fn set_image_source(&mut self, source: impl Into<String>) {
        let tool = DragCreateTool::new(CreateKind::Image(source.into()));
        self.tools.replace_tool("image", tool, &mut self.scene);
    }

    /// Markup placed by the `svg` tool.
    pub fn set_svg_markup(&mut self, markup: impl Into<String>) {
        let tool = DragCreateTool::new(CreateKind::Svg(markup.into()));
        self.tools.replace_tool("svg", tool, &mut self.scene);
    }

    /// Forward a pointer event (in logical coordinates) to the active tool.
    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        self.tools.dispatch(event, &mut self.scene);
        self.scheduler.request_render();
    }

    /// Paint the scene if a frame is due. Returns whether anything was drawn.
    pub fn render(&mut self, surface: &mut dyn Surface) -> bool {
        if !self.scheduler.begin_frame() {
            return false;
        }
        self.scene.draw_all(surface);
        true
    }

    // --- Commands ---

    pub fn rotate_selected(&mut self, degrees: f64) -> usize {
        let n = self.scene.rotate_selected(degrees);
        self.scheduler.request_render();
        n
    }

    pub fn flip_selected_horizontal(&mut self) -> usize {
        let n = self.scene.flip_selected_horizontal();
        self.scheduler.request_render();
        n
    }

    pub fn flip_selected_vertical(&mut self) -> usize {
        let n = self.scene.flip_selected_vertical();
        self.scheduler.request_render();
        n
    }

    pub fn group_selected(&mut self) -> Option<ShapeId> {
        let id = self.scene.group_selected_elements();
        self.scheduler.request_render();
        id
    }

    pub fn ungroup_selected(&mut self) -> Vec<ShapeId> {
        let ids = self.scene.ungroup_selected_elements();
        self.scheduler.request_render();
        ids
    }

    pub fn copy_selected(&mut self) -> usize {
        self.scene.copy_selected_elements()
    }

    /// Paste the clipboard offset by the configured paste offset.
    pub fn paste(&mut self) -> Vec<ShapeId> {
        let offset = self.config().paste_offset;
        let ids = self.scene.paste_elements(offset);
        self.scheduler.request_render();
        ids
    }

    pub fn duplicate_selected(&mut self) -> Vec<ShapeId> {
        let offset = self.config().paste_offset;
        let ids = self.scene.duplicate_selected_elements(offset);
        self.scheduler.request_render();
        ids
    }

    pub fn delete_selected(&mut self) -> usize {
        let n = self.scene.delete_selected();
        self.scheduler.request_render();
        n
    }

    pub fn select_all(&mut self) {
        self.scene.select_all();
        self.scheduler.request_render();
    }

    // --- Persistence and resources ---

    pub fn to_json(&self) -> Value {
        self.scene.to_json()
    }

    /// Replace the scene. The active tool is reset first so no gesture
    /// refers to a shape from the old scene.
    pub fn load_json(&mut self, value: &Value) -> ShapeResult<()> {
        if let Some(name) = self.tools.active_tool_name().map(str::to_owned) {
            self.tools.set_active_tool(&name, &mut self.scene);
        }
        self.scene.load_json(value)?;
        self.scheduler.request_render();
        Ok(())
    }

    pub fn load_pending(&mut self, loader: &dyn ResourceLoader) -> usize {
        self.scene.load_pending(loader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::input::{Modifiers, MouseEvent};
    use crate::shapes::{Line, Rectangle, Shape, ShapeTrait};
    use crate::surface::{FontSpec, StrokeParams};
    use crate::test_log;
    use kurbo::{Affine, Point, Rect};
    use peniko::Color;

    /// Counts strokes and fills; enough to tell whether a frame painted.
    #[derive(Default)]
    struct CountingSurface {
        strokes: usize,
        fills: usize,
    }

    impl Surface for CountingSurface {
        fn save(&mut self) {}
        fn restore(&mut self) {}
        fn transform(&mut self, _affine: Affine) {}
        fn begin_path(&mut self) {}
        fn move_to(&mut self, _point: Point) {}
        fn line_to(&mut self, _point: Point) {}
        fn quad_to(&mut self, _control: Point, _end: Point) {}
        fn rect(&mut self, _rect: Rect) {}
        fn arc(&mut self, _center: Point, _radius: f64, _start: f64, _end: f64) {}
        fn close_path(&mut self) {}
        fn set_stroke(&mut self, _stroke: &StrokeParams) {}
        fn set_fill(&mut self, _color: Color) {}
        fn stroke(&mut self) {
            self.strokes += 1;
        }
        fn fill(&mut self) {
            self.fills += 1;
        }
        fn fill_text(&mut self, _text: &str, _origin: Point, _font: &FontSpec) {}
        fn draw_image(&mut self, _source: &str, _dest: Rect) {}
        fn draw_svg(&mut self, _markup: &str, _dest: Rect) {}
        fn viewport(&self) -> Rect {
            Rect::new(0.0, 0.0, 100.0, 100.0)
        }
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down(MouseEvent::at(x, y))
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move(MouseEvent::at(x, y))
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up(MouseEvent::at(x, y))
    }

    fn rect(x: f64, y: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, y), 10.0, 10.0))
    }

    #[test]
    fn test_rectangle_drag_retained() {
        let mut editor = Editor::new();
        assert!(editor.set_active_tool("rectangle"));
        editor.handle_pointer(&down(10.0, 10.0));
        editor.handle_pointer(&moved(60.0, 40.0));
        editor.handle_pointer(&up(60.0, 40.0));

        assert_eq!(editor.scene().len(), 1);
        let b = editor.scene().elements()[0].bounds();
        assert!((b.x0 - 10.0).abs() < f64::EPSILON);
        assert!((b.y0 - 10.0).abs() < f64::EPSILON);
        assert!((b.width() - 50.0).abs() < f64::EPSILON);
        assert!((b.height() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rectangle_click_discarded() {
        let mut editor = Editor::new();
        editor.set_active_tool("rectangle");
        editor.handle_pointer(&down(10.0, 10.0));
        editor.handle_pointer(&up(10.0, 10.0));
        assert!(editor.scene().is_empty());
    }

    #[test]
    fn test_line_hit_tolerance() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!(line.hit_test(Point::new(5.0, 2.0)));
        assert!(!line.hit_test(Point::new(5.0, 10.0)));
    }

    #[test]
    fn test_group_ungroup_restores_positions() {
        let mut editor = Editor::new();
        let a = editor.scene_mut().add_element(rect(0.0, 0.0));
        let b = editor.scene_mut().add_element(rect(20.0, 0.0));
        editor.select_all();

        let group = editor.group_selected().unwrap();
        assert_eq!(editor.scene().len(), 1);
        let gb = editor.scene().get(group).unwrap().bounds();
        assert!(gb.x0.abs() < f64::EPSILON && gb.y0.abs() < f64::EPSILON);
        assert!(gb.width() >= 20.0);

        let released = editor.ungroup_selected();
        assert_eq!(released, vec![a, b]);
        let xs: Vec<f64> = editor.scene().elements().iter().map(|s| s.bounds().x0).collect();
        assert!((xs[0]).abs() < 1e-9);
        assert!((xs[1] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_paste_twice_gives_independent_copies() {
        let mut editor = Editor::new();
        let original = editor.scene_mut().add_element(rect(5.0, 5.0));
        editor.scene_mut().select(original);
        assert_eq!(editor.copy_selected(), 1);

        let first = editor.paste();
        let second = editor.paste();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_ne!(first[0], original);
        assert_ne!(second[0], original);
        assert_ne!(first[0], second[0]);
        for id in [first[0], second[0]] {
            let b = editor.scene().get(id).unwrap().bounds();
            assert!((b.x0 - 15.0).abs() < f64::EPSILON);
            assert!((b.y0 - 15.0).abs() < f64::EPSILON);
        }
        assert_eq!(editor.scene().len(), 3);
    }

    #[test]
    fn test_rotated_terminal_lands_right_center() {
        let mut component =
            Component::new("meter", Point::ZERO, 50.0, 50.0, "").with_terminal("top", Point::new(25.0, 0.0));
        let tid = component.terminals()[0].id();
        assert!(component.terminals_follow_transform());
        assert!(component.set_rotation(90.0));
        let p = component.terminal_position(tid).unwrap();
        assert!((p - Point::new(50.0, 25.0)).hypot() < 1e-9);
    }

    #[test]
    fn test_render_coalesces() {
        let mut editor = Editor::new();
        let mut surface = CountingSurface::default();
        assert!(!editor.render(&mut surface));

        editor.scene_mut().add_element(rect(0.0, 0.0));
        editor.select_all();
        editor.rotate_selected(90.0);
        assert_eq!(editor.scheduler().frames_requested(), 1);
        assert!(editor.render(&mut surface));
        assert!(surface.strokes > 0);
        assert!(!editor.render(&mut surface));
    }

    #[test]
    fn test_unknown_definition_rejected() {
        let capture = test_log::capture();
        let mut editor = Editor::new();
        assert!(!editor.set_component_definition("warp-core"));
        assert!(editor.set_component_definition("capacitor"));
        editor.set_active_tool("component");
        editor.handle_pointer(&down(50.0, 50.0));
        let placed = editor.scene().elements()[0].as_component().unwrap();
        assert_eq!(placed.definition(), "capacitor");
        assert_eq!(capture.warnings().len(), 1);
    }

    #[test]
    fn test_shift_click_then_drag_moves_both() {
        let mut editor = Editor::new();
        let a = editor.scene_mut().add_element(rect(0.0, 0.0));
        let b = editor.scene_mut().add_element(rect(50.0, 0.0));
        editor.handle_pointer(&down(5.0, 5.0));
        editor.handle_pointer(&up(5.0, 5.0));
        editor.handle_pointer(&PointerEvent::Down(
            MouseEvent::at(55.0, 5.0).with_modifiers(Modifiers::shift()),
        ));
        editor.handle_pointer(&moved(65.0, 5.0));
        editor.handle_pointer(&PointerEvent::Out(MouseEvent::at(75.0, 5.0)));
        assert!((editor.scene().get(a).unwrap().bounds().x0 - 20.0).abs() < f64::EPSILON);
        assert!((editor.scene().get(b).unwrap().bounds().x0 - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_json_cancels_gesture() {
        let mut editor = Editor::new();
        editor.set_active_tool("line");
        editor.handle_pointer(&down(0.0, 0.0));
        editor.handle_pointer(&moved(30.0, 0.0));
        let saved = serde_json::json!({ "elements": [] });
        editor.load_json(&saved).unwrap();
        editor.handle_pointer(&up(40.0, 0.0));
        assert!(editor.scene().is_empty());
    }
}
