//! The scene: an ordered list of top-level shapes plus selection state.

use crate::component::{ComponentCatalog, TerminalId};
use crate::config::EditorConfig;
use crate::error::{ResourceError, ShapeError, ShapeResult};
use crate::resource::{LoadedResource, PendingResource, ResourceLoader};
use crate::schedule::RenderScheduler;
use crate::shapes::geometry::rects_overlap;
use crate::shapes::json;
use crate::shapes::{Group, Shape, ShapeId, ShapeTrait, TerminalRef, shape_from_json};
use crate::surface::{StrokeParams, Surface};
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use serde_json::{Value, json};
use std::collections::HashMap;

/// Which end of a wire a connection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireEnd {
    Start,
    End,
}

/// Owns every top-level shape. Array order is paint order: the last
/// element paints on top and is hit-tested first.
#[derive(Debug)]
pub struct DrawingManager {
    elements: Vec<Shape>,
    selection_rect: Option<Rect>,
    clipboard: Vec<Shape>,
    catalog: ComponentCatalog,
    scheduler: RenderScheduler,
    config: EditorConfig,
}

impl Default for DrawingManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingManager {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default(), RenderScheduler::new())
    }

    pub fn with_config(config: EditorConfig, scheduler: RenderScheduler) -> Self {
        Self {
            elements: Vec::new(),
            selection_rect: None,
            clipboard: Vec::new(),
            catalog: ComponentCatalog::builtin(),
            scheduler,
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    pub fn request_render(&self) {
        self.scheduler.request_render();
    }

    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut ComponentCatalog {
        &mut self.catalog
    }

    // --- Element list ---

    /// Top-level shapes in paint order (back to front).
    pub fn elements(&self) -> &[Shape] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Append a shape on top of the scene.
    pub fn add_element(&mut self, mut shape: Shape) -> ShapeId {
        shape.attach_scheduler(&self.scheduler);
        let id = shape.id();
        log::debug!("added {} {id}", shape.type_name());
        self.elements.push(shape);
        id
    }

    /// Remove a top-level shape, detaching any wire connections to it.
    pub fn remove_element(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        let shape = self.elements.remove(index);
        self.detach_connections(&shape);
        log::debug!("removed {} {id}", shape.type_name());
        Some(shape)
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.selection_rect = None;
    }

    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.elements.iter().position(|s| s.id() == id)
    }

    /// Top-level shape by ID.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.elements.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.elements.iter_mut().find(|s| s.id() == id)
    }

    /// Shape by ID, searching into groups.
    pub fn find(&self, id: ShapeId) -> Option<&Shape> {
        self.elements.iter().find_map(|s| s.find(id))
    }

    pub fn find_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.elements.iter_mut().find_map(|s| s.find_mut(id))
    }

    /// Move a shape to the top of the paint order.
    pub fn bring_to_front(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                let shape = self.elements.remove(index);
                self.elements.push(shape);
                true
            }
            None => false,
        }
    }

    /// Move a shape to the bottom of the paint order.
    pub fn send_to_back(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                let shape = self.elements.remove(index);
                self.elements.insert(0, shape);
                true
            }
            None => false,
        }
    }

    // --- Drawing ---

    /// Paint the grid, every element in array order, then the overlay.
    pub fn draw_all(&self, surface: &mut dyn Surface) {
        if self.config.show_grid {
            self.draw_grid(surface);
        }
        for shape in &self.elements {
            shape.draw(surface, Vec2::ZERO);
        }
        self.draw_overlay(surface);
    }

    fn draw_grid(&self, surface: &mut dyn Surface) {
        let step = self.config.grid_size;
        let view = surface.viewport();
        surface.save();
        surface.set_stroke(&StrokeParams::solid(self.config.grid_color.into(), 1.0));
        surface.begin_path();
        let mut x = (view.x0 / step).floor() * step;
        while x <= view.x1 {
            surface.move_to(Point::new(x, view.y0));
            surface.line_to(Point::new(x, view.y1));
            x += step;
        }
        let mut y = (view.y0 / step).floor() * step;
        while y <= view.y1 {
            surface.move_to(Point::new(view.x0, y));
            surface.line_to(Point::new(view.x1, y));
            y += step;
        }
        surface.stroke();
        surface.restore();
    }

    fn draw_overlay(&self, surface: &mut dyn Surface) {
        let color: Color = self.config.selection_color.into();
        for shape in self.selected() {
            shape.draw_selection_handles(surface, Vec2::ZERO, color);
        }
        if let Some(rect) = self.selection_rect {
            surface.save();
            surface.set_stroke(&StrokeParams::solid(color, 1.0).dashed(&[4.0, 4.0]));
            surface.set_fill(color.with_alpha(0.12));
            surface.begin_path();
            surface.rect(rect);
            surface.fill();
            surface.stroke();
            surface.restore();
        }
    }

    // --- Picking and selection ---

    /// Topmost shape hit at `point`.
    pub fn find_element_at(&self, point: Point) -> Option<ShapeId> {
        self.elements
            .iter()
            .rev()
            .find(|s| s.hit_test(point))
            .map(|s| s.id())
    }

    pub fn selected(&self) -> impl Iterator<Item = &Shape> {
        self.elements.iter().filter(|s| s.is_selected())
    }

    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.selected().map(|s| s.id()).collect()
    }

    pub fn selection_count(&self) -> usize {
        self.selected().count()
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.get(id).is_some_and(|s| s.is_selected())
    }

    pub fn select(&mut self, id: ShapeId) -> bool {
        match self.get_mut(id) {
            Some(shape) => {
                shape.select();
                true
            }
            None => false,
        }
    }

    pub fn deselect(&mut self, id: ShapeId) -> bool {
        match self.get_mut(id) {
            Some(shape) => {
                shape.deselect();
                true
            }
            None => false,
        }
    }

    /// Flip the selection state of one shape.
    pub fn toggle_selection(&mut self, id: ShapeId) -> bool {
        match self.get_mut(id) {
            Some(shape) if shape.is_selected() => {
                shape.deselect();
                true
            }
            Some(shape) => {
                shape.select();
                true
            }
            None => false,
        }
    }

    /// Make `id` the only selected shape.
    pub fn select_only(&mut self, id: ShapeId) {
        for shape in &mut self.elements {
            if shape.id() == id {
                shape.select();
            } else {
                shape.deselect();
            }
        }
    }

    pub fn select_all(&mut self) {
        for shape in &mut self.elements {
            shape.select();
        }
    }

    pub fn deselect_all(&mut self) {
        for shape in &mut self.elements {
            shape.deselect();
        }
    }

    pub fn selection_rectangle(&self) -> Option<Rect> {
        self.selection_rect
    }

    /// Set the marquee from two corners in any order.
    pub fn set_selection_rectangle(&mut self, a: Point, b: Point) {
        self.selection_rect = Some(Rect::from_points(a, b));
    }

    pub fn clear_selection_rectangle(&mut self) {
        self.selection_rect = None;
    }

    /// Select every element whose bounds overlap the marquee. Unless
    /// `incremental`, elements outside it are deselected.
    pub fn select_elements_in_rectangle(&mut self, incremental: bool) -> usize {
        let Some(rect) = self.selection_rect else {
            return 0;
        };
        let mut count = 0;
        for shape in &mut self.elements {
            if rects_overlap(shape.bounds(), rect) {
                shape.select();
                count += 1;
            } else if !incremental {
                shape.deselect();
            }
        }
        log::debug!("marquee selected {count} elements");
        count
    }

    // --- Clipboard ---

    pub fn clipboard_len(&self) -> usize {
        self.clipboard.len()
    }

    /// Copy the selection into the clipboard. Copies are detached from the
    /// originals and carry new identities.
    pub fn copy_selected_elements(&mut self) -> usize {
        let copies: Vec<Shape> = self.selected().map(Shape::duplicate).collect();
        if copies.is_empty() {
            log::warn!("nothing selected to copy");
            return 0;
        }
        self.clipboard = copies;
        self.clipboard.len()
    }

    /// Add offset copies of the clipboard and select them. The clipboard is
    /// left intact so pasting can repeat.
    pub fn paste_elements(&mut self, delta: Vec2) -> Vec<ShapeId> {
        if self.clipboard.is_empty() {
            log::warn!("clipboard is empty; nothing to paste");
            return Vec::new();
        }
        let copies: Vec<Shape> = self.clipboard.iter().map(Shape::duplicate).collect();
        self.insert_copies(copies, delta)
    }

    /// Add offset copies of the current selection, bypassing the clipboard.
    pub fn duplicate_selected_elements(&mut self, delta: Vec2) -> Vec<ShapeId> {
        let copies: Vec<Shape> = self.selected().map(Shape::duplicate).collect();
        if copies.is_empty() {
            log::warn!("nothing selected to duplicate");
            return Vec::new();
        }
        self.insert_copies(copies, delta)
    }

    fn insert_copies(&mut self, copies: Vec<Shape>, delta: Vec2) -> Vec<ShapeId> {
        self.deselect_all();
        copies
            .into_iter()
            .map(|mut copy| {
                copy.move_by(delta);
                copy.select();
                self.add_element(copy)
            })
            .collect()
    }

    // --- Grouping ---

    /// Wrap the selected elements in a new group, added on top and selected.
    pub fn group_selected_elements(&mut self) -> Option<ShapeId> {
        if self.selection_count() < 2 {
            log::warn!("grouping needs at least two selected elements");
            return None;
        }
        let (selected, rest): (Vec<Shape>, Vec<Shape>) = std::mem::take(&mut self.elements)
            .into_iter()
            .partition(|s| s.is_selected());
        self.elements = rest;
        let mut group = Shape::Group(Group::from_children(selected));
        group.select();
        let id = self.add_element(group);
        log::debug!("grouped into {id}");
        Some(id)
    }

    /// Dissolve every selected group, putting its children back in its
    /// place at their absolute positions, selected.
    pub fn ungroup_selected_elements(&mut self) -> Vec<ShapeId> {
        let mut released = Vec::new();
        let mut index = 0;
        while index < self.elements.len() {
            let is_target = self.elements[index].is_selected() && self.elements[index].is_group();
            if !is_target {
                index += 1;
                continue;
            }
            let Shape::Group(group) = self.elements.remove(index) else {
                continue;
            };
            let children = group.into_children();
            let count = children.len();
            for (offset, mut child) in children.into_iter().enumerate() {
                child.select();
                released.push(child.id());
                self.elements.insert(index + offset, child);
            }
            index += count;
        }
        if released.is_empty() {
            log::warn!("no selected groups to ungroup");
        }
        released
    }

    // --- Transform commands ---

    /// Translate every selected element.
    pub fn move_selected(&mut self, delta: Vec2) {
        for shape in self.elements.iter_mut().filter(|s| s.is_selected()) {
            shape.move_by(delta);
        }
        self.sync_wires();
    }

    /// Rotate every selected element that supports rotation. Returns how
    /// many rotated.
    pub fn rotate_selected(&mut self, degrees: f64) -> usize {
        self.apply_to_selected(|s| s.rotate_by(degrees))
    }

    pub fn flip_selected_horizontal(&mut self) -> usize {
        self.apply_to_selected(Shape::flip_horizontal)
    }

    pub fn flip_selected_vertical(&mut self) -> usize {
        self.apply_to_selected(Shape::flip_vertical)
    }

    fn apply_to_selected(&mut self, mut op: impl FnMut(&mut Shape) -> bool) -> usize {
        let mut changed = 0;
        for shape in self.elements.iter_mut().filter(|s| s.is_selected()) {
            if op(shape) {
                changed += 1;
            }
        }
        if changed == 0 {
            log::debug!("no selected element supports this transform");
        } else {
            self.sync_wires();
        }
        changed
    }

    /// Remove every selected element. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selected_ids();
        ids.iter().filter(|id| self.remove_element(**id).is_some()).count()
    }

    // --- Components and wires ---

    /// Place a catalog component centered on `center`.
    pub fn create_component(&mut self, name: &str, center: Point) -> Option<ShapeId> {
        match self.catalog.instantiate_centered(name, center) {
            Some(mut component) => {
                component.style_mut().clone_from(&self.config.default_style);
                component.base_mut().set_hit_margin(self.config.hit_margin);
                Some(self.add_element(Shape::Component(component)))
            }
            None => {
                log::warn!("unknown component definition {name}");
                None
            }
        }
    }

    /// Topmost top-level component terminal within the component's hit
    /// margin of `point`.
    pub fn terminal_at(&self, point: Point) -> Option<TerminalRef> {
        self.elements.iter().rev().find_map(|shape| {
            let component = shape.as_component()?;
            component
                .terminal_at(point, component.hit_margin())
                .map(|terminal| TerminalRef::new(component.id(), terminal))
        })
    }

    /// Attach one end of a top-level wire to a terminal of a top-level
    /// component, and snap that end onto the terminal.
    pub fn connect_wire(&mut self, wire: ShapeId, end: WireEnd, terminal: TerminalRef) -> bool {
        let Some(position) = self
            .get(terminal.component)
            .and_then(Shape::as_component)
            .and_then(|c| c.terminal_position(terminal.terminal))
        else {
            log::warn!("cannot connect wire {wire}: no terminal {}", terminal.terminal);
            return false;
        };
        let Some(w) = self.get_mut(wire).and_then(Shape::as_wire_mut) else {
            log::warn!("cannot connect: {wire} is not a wire");
            return false;
        };
        let previous = match end {
            WireEnd::Start => w.start_terminal(),
            WireEnd::End => w.end_terminal(),
        };
        match end {
            WireEnd::Start => {
                w.connect_start(terminal);
                w.set_start_point(position);
            }
            WireEnd::End => {
                w.connect_end(terminal);
                w.set_end_point(position);
            }
        }
        if let Some(old) = previous.filter(|old| *old != terminal) {
            self.unregister_wire(old, wire);
        }
        if let Some(c) = self.get_mut(terminal.component).and_then(Shape::as_component_mut) {
            c.connect_wire(terminal.terminal, wire);
        }
        true
    }

    /// Detach one end of a top-level wire from its terminal, leaving the
    /// point where it is.
    pub fn disconnect_wire(&mut self, wire: ShapeId, end: WireEnd) -> bool {
        let Some(w) = self.get_mut(wire).and_then(Shape::as_wire_mut) else {
            return false;
        };
        let previous = match end {
            WireEnd::Start => w.disconnect_start(),
            WireEnd::End => w.disconnect_end(),
        };
        match previous {
            Some(old) => {
                self.unregister_wire(old, wire);
                true
            }
            None => false,
        }
    }

    fn unregister_wire(&mut self, terminal: TerminalRef, wire: ShapeId) {
        let still_used = self
            .get(wire)
            .and_then(Shape::as_wire)
            .is_some_and(|w| w.start_terminal() == Some(terminal) || w.end_terminal() == Some(terminal));
        if still_used {
            return;
        }
        if let Some(t) = self
            .find_mut(terminal.component)
            .and_then(Shape::as_component_mut)
            .and_then(|c| c.terminal_mut(terminal.terminal))
        {
            t.disconnect_wire(wire);
        }
    }

    /// Snap every attached wire end onto its terminal's current position.
    pub fn sync_wires(&mut self) {
        let mut terminals = HashMap::new();
        collect_terminals(&self.elements, Vec2::ZERO, &mut terminals);
        if terminals.is_empty() {
            return;
        }
        sync_wires_in(&mut self.elements, Vec2::ZERO, &terminals);
    }

    fn detach_connections(&mut self, removed: &Shape) {
        let mut components = Vec::new();
        let mut wires = Vec::new();
        visit(std::slice::from_ref(removed), &mut |s| {
            if s.as_component().is_some() {
                components.push(s.id());
            } else if s.as_wire().is_some() {
                wires.push(s.id());
            }
        });
        if components.is_empty() && wires.is_empty() {
            return;
        }
        visit_mut(&mut self.elements, &mut |s| match s {
            Shape::Wire(w) => {
                for c in &components {
                    w.disconnect_component(*c);
                }
            }
            Shape::Component(c) => {
                for w in &wires {
                    c.disconnect_wire(*w);
                }
            }
            _ => {}
        });
    }

    // --- Resources ---

    /// Resources still waiting to be decoded, including inside groups.
    pub fn pending_resources(&self) -> Vec<PendingResource> {
        let mut pending = Vec::new();
        for shape in &self.elements {
            shape.collect_pending(&mut pending);
        }
        pending
            .into_iter()
            .map(|(shape, request)| PendingResource { shape, request })
            .collect()
    }

    /// Deliver a load result to the shape that requested it.
    pub fn complete_resource(
        &mut self,
        id: ShapeId,
        result: Result<LoadedResource, ResourceError>,
    ) -> bool {
        match self.find_mut(id) {
            Some(shape) => shape.complete_resource(result),
            None => {
                log::warn!("resource completed for unknown shape {id}");
                false
            }
        }
    }

    /// Decode every pending resource with `loader`. Returns how many
    /// loaded successfully.
    pub fn load_pending(&mut self, loader: &dyn ResourceLoader) -> usize {
        let mut loaded = 0;
        for pending in self.pending_resources() {
            let result = loader.load(&pending.request);
            if result.is_ok() {
                loaded += 1;
            }
            self.complete_resource(pending.shape, result);
        }
        loaded
    }

    // --- Persistence ---

    pub fn to_json(&self) -> Value {
        json!({
            "elements": self.elements.iter().map(|s| s.to_json()).collect::<Vec<_>>(),
        })
    }

    /// Replace the scene with a serialized one. On error the current scene
    /// is left untouched.
    pub fn load_json(&mut self, value: &Value) -> ShapeResult<()> {
        let obj = json::object(value)?;
        let items = match obj.get("elements") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ShapeError::MalformedField {
                    field: "elements",
                    reason: "expected an array".into(),
                });
            }
            None => return Err(ShapeError::MissingField("elements")),
        };
        let shapes = items
            .iter()
            .map(shape_from_json)
            .collect::<ShapeResult<Vec<_>>>()?;
        self.clear();
        for shape in shapes {
            self.add_element(shape);
        }
        log::debug!("loaded {} elements", self.elements.len());
        Ok(())
    }
}

fn visit(shapes: &[Shape], f: &mut impl FnMut(&Shape)) {
    for shape in shapes {
        f(shape);
        if let Some(group) = shape.as_group() {
            visit(group.children(), f);
        }
    }
}

fn visit_mut(shapes: &mut [Shape], f: &mut impl FnMut(&mut Shape)) {
    for shape in shapes {
        f(shape);
        if let Shape::Group(group) = shape {
            visit_mut(group.children_mut(), f);
        }
    }
}

fn collect_terminals(
    shapes: &[Shape],
    offset: Vec2,
    out: &mut HashMap<(ShapeId, TerminalId), Point>,
) {
    for shape in shapes {
        match shape {
            Shape::Component(c) => {
                for (terminal, p) in c.terminal_positions() {
                    out.insert((c.id(), terminal), p + offset);
                }
            }
            Shape::Group(g) => {
                collect_terminals(g.children(), offset + g.position().to_vec2(), out)
            }
            _ => {}
        }
    }
}

fn sync_wires_in(
    shapes: &mut [Shape],
    offset: Vec2,
    terminals: &HashMap<(ShapeId, TerminalId), Point>,
) {
    for shape in shapes {
        match shape {
            Shape::Wire(w) => {
                let lookup = |t: TerminalRef| terminals.get(&(t.component, t.terminal)).map(|p| *p - offset);
                if let Some(p) = w.start_terminal().and_then(lookup) {
                    w.set_start_point(p);
                }
                if let Some(p) = w.end_terminal().and_then(lookup) {
                    w.set_end_point(p);
                }
            }
            Shape::Group(g) => {
                let inner = offset + g.position().to_vec2();
                sync_wires_in(g.children_mut(), inner, terminals);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{LoadState, ResourceRequest};
    use crate::shapes::{Circle, ImageShape, Rectangle, Wire};
    use crate::test_log;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::Rectangle(Rectangle::new(Point::new(x, y), w, h))
    }

    #[test]
    fn test_find_element_at_is_back_to_front() {
        let mut scene = DrawingManager::new();
        let a = scene.add_element(rect(0.0, 0.0, 50.0, 50.0));
        let b = scene.add_element(rect(25.0, 25.0, 50.0, 50.0));
        assert_eq!(scene.find_element_at(Point::new(30.0, 30.0)), Some(b));
        assert_eq!(scene.find_element_at(Point::new(10.0, 10.0)), Some(a));
        assert_eq!(scene.find_element_at(Point::new(200.0, 200.0)), None);
        scene.bring_to_front(a);
        assert_eq!(scene.find_element_at(Point::new(30.0, 30.0)), Some(a));
    }

    #[test]
    fn test_marquee_selection() {
        let mut scene = DrawingManager::new();
        let a = scene.add_element(rect(0.0, 0.0, 10.0, 10.0));
        let b = scene.add_element(rect(100.0, 100.0, 10.0, 10.0));
        scene.select(b);
        scene.set_selection_rectangle(Point::new(20.0, 20.0), Point::new(-5.0, -5.0));
        assert_eq!(scene.selection_rectangle(), Some(Rect::new(-5.0, -5.0, 20.0, 20.0)));

        assert_eq!(scene.select_elements_in_rectangle(true), 1);
        assert!(scene.is_selected(a) && scene.is_selected(b));

        scene.select_elements_in_rectangle(false);
        assert!(scene.is_selected(a));
        assert!(!scene.is_selected(b));
    }

    #[test]
    fn test_marquee_touching_edge_does_not_select() {
        let mut scene = DrawingManager::new();
        let a = scene.add_element(rect(10.0, 0.0, 10.0, 10.0));
        scene.set_selection_rectangle(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        scene.select_elements_in_rectangle(false);
        assert!(!scene.is_selected(a));
    }

    #[test]
    fn test_group_then_ungroup_restores_positions() {
        let mut scene = DrawingManager::new();
        let a = scene.add_element(rect(0.0, 0.0, 10.0, 10.0));
        let b = scene.add_element(Shape::Circle(Circle::new(Point::new(40.0, 7.5), 3.0)));
        scene.select_all();
        let group = scene.group_selected_elements().unwrap();
        assert_eq!(scene.len(), 1);
        assert!(scene.is_selected(group));
        assert_eq!(scene.get(group).unwrap().position(), Point::new(0.0, 0.0));

        let released = scene.ungroup_selected_elements();
        assert_eq!(released, vec![a, b]);
        assert_eq!(scene.get(a).unwrap().position(), Point::new(0.0, 0.0));
        assert_eq!(scene.get(b).unwrap().position(), Point::new(40.0, 7.5));
        assert!(scene.is_selected(a) && scene.is_selected(b));
    }

    #[test]
    fn test_group_requires_two() {
        let capture = test_log::capture();
        let mut scene = DrawingManager::new();
        let a = scene.add_element(rect(0.0, 0.0, 10.0, 10.0));
        scene.select(a);
        assert!(scene.group_selected_elements().is_none());
        assert_eq!(scene.len(), 1);
        assert_eq!(capture.warnings().len(), 1);
    }

    #[test]
    fn test_paste_is_repeatable_and_fresh() {
        let mut scene = DrawingManager::new();
        let a = scene.add_element(rect(5.0, 5.0, 10.0, 10.0));
        scene.select(a);
        assert_eq!(scene.copy_selected_elements(), 1);
        let first = scene.paste_elements(Vec2::new(10.0, 10.0));
        let second = scene.paste_elements(Vec2::new(10.0, 10.0));
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.clipboard_len(), 1);
        assert_ne!(first[0], second[0]);
        assert_ne!(first[0], a);
        for id in [first[0], second[0]] {
            assert_eq!(scene.get(id).unwrap().position(), Point::new(15.0, 15.0));
        }
        assert!(!scene.is_selected(a));
        assert!(!scene.is_selected(first[0]));
        assert!(scene.is_selected(second[0]));
    }

    #[test]
    fn test_paste_empty_clipboard_warns() {
        let capture = test_log::capture();
        let mut scene = DrawingManager::new();
        assert!(scene.paste_elements(Vec2::new(1.0, 1.0)).is_empty());
        assert_eq!(capture.warnings().len(), 1);
    }

    #[test]
    fn test_duplicate_bypasses_clipboard() {
        let mut scene = DrawingManager::new();
        let a = scene.add_element(rect(0.0, 0.0, 10.0, 10.0));
        scene.select(a);
        let copies = scene.duplicate_selected_elements(Vec2::new(10.0, 0.0));
        assert_eq!(copies.len(), 1);
        assert_eq!(scene.clipboard_len(), 0);
        assert_eq!(scene.get(copies[0]).unwrap().position(), Point::new(10.0, 0.0));
    }

    #[test]
    fn test_wire_follows_component() {
        let mut scene = DrawingManager::new();
        let resistor = scene.create_component("resistor", Point::new(30.0, 10.0)).unwrap();
        let wire = scene.add_element(Shape::Wire(Wire::from_points(vec![
            Point::new(-50.0, 10.0),
            Point::new(-10.0, 10.0),
        ])));
        let terminal = scene.terminal_at(Point::new(1.0, 10.0)).unwrap();
        assert!(scene.connect_wire(wire, WireEnd::End, terminal));
        assert_eq!(scene.get(wire).unwrap().nodes()[1], Point::new(0.0, 10.0));

        scene.select_only(resistor);
        scene.move_selected(Vec2::new(0.0, 20.0));
        assert_eq!(scene.get(wire).unwrap().nodes()[1], Point::new(0.0, 30.0));

        scene.rotate_selected(180.0);
        let end = scene.get(wire).unwrap().nodes()[1];
        assert!((end - Point::new(60.0, 30.0)).hypot() < 1e-9);

        let component = scene.get(resistor).unwrap().as_component().unwrap();
        assert_eq!(component.terminal(terminal.terminal).unwrap().wires(), &[wire]);

        scene.remove_element(resistor);
        assert!(scene.get(wire).unwrap().as_wire().unwrap().end_terminal().is_none());
    }

    #[test]
    fn test_rotate_ignores_plain_shapes() {
        let mut scene = DrawingManager::new();
        let a = scene.add_element(rect(0.0, 0.0, 10.0, 10.0));
        scene.select(a);
        assert_eq!(scene.rotate_selected(90.0), 0);
        assert_eq!(scene.flip_selected_horizontal(), 0);
    }

    struct FixedLoader;

    impl ResourceLoader for FixedLoader {
        fn load(&self, request: &ResourceRequest) -> Result<LoadedResource, ResourceError> {
            match request {
                ResourceRequest::Image { source } if source.ends_with(".png") => Ok(LoadedResource {
                    width: 32.0,
                    height: 16.0,
                }),
                _ => Err(ResourceError::Unsupported("test".into())),
            }
        }
    }

    #[test]
    fn test_load_pending_resources() {
        let mut scene = DrawingManager::new();
        let ok = scene.add_element(Shape::Image(ImageShape::new(Point::ZERO, 0.0, 0.0, "a.png")));
        let bad = scene.add_element(Shape::Image(ImageShape::new(Point::ZERO, 5.0, 5.0, "a.gif")));
        assert_eq!(scene.pending_resources().len(), 2);
        assert_eq!(scene.load_pending(&FixedLoader), 1);
        assert!(scene.pending_resources().is_empty());
        assert!((scene.get(ok).unwrap().bounds().width() - 32.0).abs() < f64::EPSILON);
        assert!(!scene.get(bad).unwrap().hit_test(Point::new(1.0, 1.0)));
        assert!(scene.scheduler().is_dirty());
    }

    #[test]
    fn test_failed_resource_logs_error() {
        let capture = test_log::capture();
        let mut scene = DrawingManager::new();
        let id = scene.add_element(Shape::Image(ImageShape::new(Point::ZERO, 5.0, 5.0, "a.png")));
        assert!(scene.complete_resource(id, Err(ResourceError::Decode("truncated".into()))));
        assert_eq!(capture.errors().len(), 1);
        assert!(capture.warnings().is_empty());
        match scene.get(id) {
            Some(Shape::Image(image)) => assert_eq!(image.load_state(), LoadState::Failed),
            other => panic!("expected an image, got {other:?}"),
        }
        assert!(scene.pending_resources().is_empty());
    }

    #[test]
    fn test_json_round_trip_and_atomic_failure() {
        let mut scene = DrawingManager::new();
        scene.add_element(rect(0.0, 0.0, 10.0, 10.0));
        scene.create_component("led", Point::new(50.0, 50.0));
        let json = scene.to_json();

        let mut other = DrawingManager::new();
        other.load_json(&json).unwrap();
        assert_eq!(other.to_json(), json);

        let bad = json!({"elements": [{"type": "Rectangle"}, {"type": "Blob"}]});
        assert!(other.load_json(&bad).is_err());
        assert_eq!(other.len(), 2);
    }

    #[test]
    fn test_delete_selected() {
        let mut scene = DrawingManager::new();
        let a = scene.add_element(rect(0.0, 0.0, 10.0, 10.0));
        scene.add_element(rect(20.0, 0.0, 10.0, 10.0));
        scene.select(a);
        assert_eq!(scene.delete_selected(), 1);
        assert_eq!(scene.len(), 1);
        assert!(scene.get(a).is_none());
    }
}
