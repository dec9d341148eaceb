//! Drawing surface contract.
//!
//! Shapes paint through this immediate-mode interface and never talk to a
//! concrete backend. Coordinates are world coordinates; the optional
//! `transform` is scoped by `save`/`restore`.

use crate::shapes::ShapeStyle;
use kurbo::{Affine, Point, Rect};
use peniko::Color;

use crate::shapes::{LineCap, LineJoin};

/// Stroke parameters for the next `stroke` call.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeParams {
    pub color: Color,
    pub width: f64,
    pub dash: Vec<f64>,
    pub dash_offset: f64,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl StrokeParams {
    /// A plain solid stroke.
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
            dash_offset: 0.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
        }
    }

    /// Same stroke with a dash pattern.
    pub fn dashed(mut self, dash: &[f64]) -> Self {
        self.dash = dash.to_vec();
        self
    }
}

impl From<&ShapeStyle> for StrokeParams {
    fn from(style: &ShapeStyle) -> Self {
        Self {
            color: style.stroke(),
            width: style.line_width(),
            dash: style.line_dash().to_vec(),
            dash_offset: style.line_dash_offset(),
            cap: style.line_cap(),
            join: style.line_join(),
        }
    }
}

/// Font description for `fill_text`.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
}

/// Immediate-mode 2D drawing primitives.
pub trait Surface {
    /// Push the current state (transform, stroke, fill).
    fn save(&mut self);
    /// Pop the state pushed by the matching `save`.
    fn restore(&mut self);
    /// Concatenate `affine` onto the current transform.
    fn transform(&mut self, affine: Affine);

    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
    fn quad_to(&mut self, control: Point, end: Point);
    fn rect(&mut self, rect: Rect);
    /// Circular arc; angles in radians.
    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64);
    fn close_path(&mut self);

    fn set_stroke(&mut self, stroke: &StrokeParams);
    fn set_fill(&mut self, color: Color);
    /// Stroke the current path.
    fn stroke(&mut self);
    /// Fill the current path.
    fn fill(&mut self);

    /// Draw text with its top-left corner at `origin` using the fill color.
    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec);
    /// Blit a decoded raster image into `dest`.
    fn draw_image(&mut self, source: &str, dest: Rect);
    /// Blit decoded vector markup into `dest`.
    fn draw_svg(&mut self, markup: &str, dest: Rect);

    /// Visible region in world coordinates.
    fn viewport(&self) -> Rect;
}

/// Load a shape style into the surface's stroke and fill state.
pub fn apply_style(surface: &mut dyn Surface, style: &ShapeStyle) {
    surface.set_stroke(&StrokeParams::from(style));
    if let Some(fill) = style.fill() {
        surface.set_fill(fill);
    }
}

/// Fill (when the style has a fill color) and stroke the current path.
pub fn paint_path(surface: &mut dyn Surface, style: &ShapeStyle) {
    if style.fill_color().is_some() {
        surface.fill();
    }
    surface.stroke();
}
