//! Retained drawing surface.
//!
//! [`SceneSurface`] records what the core paints as a flat list of
//! [`RenderItem`]s: kurbo paths with peniko colors and an affine transform.
//! A GPU backend replays the list each frame.

use crate::renderer::to_stroke;
use circuitsketch_core::surface::{FontSpec, StrokeParams, Surface};
use kurbo::{Affine, Arc, BezPath, Point, Rect, Shape as _, Stroke, Vec2};
use peniko::Color;
use std::f64::consts::TAU;

/// Flattening tolerance for arcs.
const ARC_TOLERANCE: f64 = 0.1;

/// One recorded draw operation.
#[derive(Debug, Clone)]
pub enum RenderItem {
    Stroke {
        path: BezPath,
        stroke: Stroke,
        color: Color,
        transform: Affine,
    },
    Fill {
        path: BezPath,
        color: Color,
        transform: Affine,
    },
    Text {
        text: String,
        origin: Point,
        font: FontSpec,
        color: Color,
        transform: Affine,
    },
    Image {
        source: String,
        dest: Rect,
        transform: Affine,
    },
    Svg {
        markup: String,
        dest: Rect,
        transform: Affine,
    },
}

impl RenderItem {
    /// Approximate bounds in surface coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            RenderItem::Stroke {
                path,
                stroke,
                transform,
                ..
            } => {
                let half = stroke.width / 2.0;
                (*transform * path.clone()).bounding_box().inflate(half, half)
            }
            RenderItem::Fill { path, transform, .. } => (*transform * path.clone()).bounding_box(),
            RenderItem::Text {
                text,
                origin,
                font,
                transform,
                ..
            } => {
                let lines = text.lines().count().max(1) as f64;
                let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as f64;
                let rect = Rect::from_origin_size(*origin, (widest * font.size * 0.6, lines * font.size * 1.2));
                transform.transform_rect_bbox(rect)
            }
            RenderItem::Image { dest, transform, .. } | RenderItem::Svg { dest, transform, .. } => {
                transform.transform_rect_bbox(*dest)
            }
        }
    }
}

#[derive(Debug, Clone)]
struct DrawState {
    transform: Affine,
    stroke: StrokeParams,
    fill: Color,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            stroke: StrokeParams::solid(Color::BLACK, 1.0),
            fill: Color::BLACK,
        }
    }
}

/// A [`Surface`] that records render items instead of rasterizing.
#[derive(Debug, Clone)]
pub struct SceneSurface {
    viewport: Rect,
    state: DrawState,
    stack: Vec<DrawState>,
    path: BezPath,
    items: Vec<RenderItem>,
}

impl SceneSurface {
    /// Create a surface showing `viewport` (world coordinates).
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            state: DrawState::default(),
            stack: Vec::new(),
            path: BezPath::new(),
            items: Vec::new(),
        }
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub fn items(&self) -> &[RenderItem] {
        &self.items
    }

    /// Take the recorded items, leaving the surface empty for the next frame.
    pub fn take_items(&mut self) -> Vec<RenderItem> {
        self.reset();
        std::mem::take(&mut self.items)
    }

    /// Forget recorded items and any leftover state.
    pub fn clear(&mut self) {
        self.reset();
        self.items.clear();
    }

    fn reset(&mut self) {
        if !self.stack.is_empty() {
            log::warn!("{} unbalanced save() calls at end of frame", self.stack.len());
        }
        self.stack.clear();
        self.state = DrawState::default();
        self.path = BezPath::new();
    }

    /// Union of all item bounds, if anything was drawn.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.items
            .iter()
            .map(RenderItem::bounds)
            .reduce(|a, b| a.union(b))
    }

    fn current_point(&self) -> Option<Point> {
        self.path.elements().last().and_then(|el| el.end_point())
    }
}

impl Surface for SceneSurface {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => log::warn!("restore() without matching save()"),
        }
    }

    fn transform(&mut self, affine: Affine) {
        self.state.transform *= affine;
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn move_to(&mut self, point: Point) {
        self.path.move_to(point);
    }

    fn line_to(&mut self, point: Point) {
        if self.current_point().is_some() {
            self.path.line_to(point);
        } else {
            self.path.move_to(point);
        }
    }

    fn quad_to(&mut self, control: Point, end: Point) {
        if self.current_point().is_none() {
            self.path.move_to(control);
        }
        self.path.quad_to(control, end);
    }

    fn rect(&mut self, rect: Rect) {
        self.path.extend(rect.path_elements(ARC_TOLERANCE));
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) {
        let sweep = (end_angle - start_angle).clamp(-TAU, TAU);
        let start = center + Vec2::from_angle(start_angle) * radius;
        if self.current_point().is_some() {
            self.path.line_to(start);
        } else {
            self.path.move_to(start);
        }
        let arc = Arc::new(center, (radius, radius), start_angle, sweep, 0.0);
        arc.to_cubic_beziers(ARC_TOLERANCE, |p1, p2, p| self.path.curve_to(p1, p2, p));
    }

    fn close_path(&mut self) {
        self.path.close_path();
    }

    fn set_stroke(&mut self, stroke: &StrokeParams) {
        self.state.stroke = stroke.clone();
    }

    fn set_fill(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn stroke(&mut self) {
        if self.path.elements().is_empty() {
            return;
        }
        self.items.push(RenderItem::Stroke {
            path: self.path.clone(),
            stroke: to_stroke(&self.state.stroke),
            color: self.state.stroke.color,
            transform: self.state.transform,
        });
    }

    fn fill(&mut self) {
        if self.path.elements().is_empty() {
            return;
        }
        self.items.push(RenderItem::Fill {
            path: self.path.clone(),
            color: self.state.fill,
            transform: self.state.transform,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec) {
        self.items.push(RenderItem::Text {
            text: text.to_string(),
            origin,
            font: font.clone(),
            color: self.state.fill,
            transform: self.state.transform,
        });
    }

    fn draw_image(&mut self, source: &str, dest: Rect) {
        self.items.push(RenderItem::Image {
            source: source.to_string(),
            dest,
            transform: self.state.transform,
        });
    }

    fn draw_svg(&mut self, markup: &str, dest: Rect) {
        self.items.push(RenderItem::Svg {
            markup: markup.to_string(),
            dest,
            transform: self.state.transform,
        });
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }
}
