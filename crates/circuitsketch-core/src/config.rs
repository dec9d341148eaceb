//! Editor configuration.

use crate::shapes::{SerializableColor, ShapeStyle};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Default extra tolerance added to every hit test, in pixels.
pub const DEFAULT_HIT_MARGIN: f64 = 5.0;
/// Default background grid spacing.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;
/// Default number of parameter steps used to sample a quadratic curve.
pub const DEFAULT_CURVE_SAMPLES: usize = 24;

/// Tunable defaults for an editor instance.
///
/// Every field has a default, so a partial JSON document is enough to
/// override just the values a host cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Hit margin assigned to newly created shapes.
    pub hit_margin: f64,
    /// Background grid spacing in pixels.
    pub grid_size: f64,
    /// Whether the background grid is drawn.
    pub show_grid: bool,
    /// Grid line color.
    pub grid_color: SerializableColor,
    /// Offset applied by paste and duplicate.
    pub paste_offset: Vec2,
    /// Parameter steps used to hit-test quadratic curves.
    pub curve_samples: usize,
    /// Selection handle edge length.
    pub handle_size: f64,
    /// Radius of point markers.
    pub point_radius: f64,
    /// Default font size for text boxes.
    pub font_size: f64,
    /// Style applied to new shapes.
    pub default_style: ShapeStyle,
    /// Overlay color for the marquee and selection handles.
    pub selection_color: SerializableColor,
    /// Douglas-Peucker tolerance applied to finished freehand strokes
    /// (0 disables simplification).
    pub freehand_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            hit_margin: DEFAULT_HIT_MARGIN,
            grid_size: DEFAULT_GRID_SIZE,
            show_grid: true,
            grid_color: SerializableColor::new(225, 225, 225, 255),
            paste_offset: Vec2::new(10.0, 10.0),
            curve_samples: DEFAULT_CURVE_SAMPLES,
            handle_size: 6.0,
            point_radius: 3.0,
            font_size: 16.0,
            default_style: ShapeStyle::default(),
            selection_color: SerializableColor::new(59, 130, 246, 255),
            freehand_tolerance: 0.5,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace out-of-range values with their defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.hit_margin.is_finite() && self.hit_margin >= 0.0) {
            log::warn!("config hitMargin {} out of range, using default", self.hit_margin);
            self.hit_margin = defaults.hit_margin;
        }
        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            log::warn!("config gridSize {} out of range, using default", self.grid_size);
            self.grid_size = defaults.grid_size;
        }
        if self.curve_samples < 2 {
            log::warn!("config curveSamples {} too small, using default", self.curve_samples);
            self.curve_samples = defaults.curve_samples;
        }
        if !(self.handle_size.is_finite() && self.handle_size > 0.0) {
            self.handle_size = defaults.handle_size;
        }
        if !(self.point_radius.is_finite() && self.point_radius > 0.0) {
            self.point_radius = defaults.point_radius;
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            self.font_size = defaults.font_size;
        }
        if !self.default_style.is_valid() {
            log::warn!("config defaultStyle {:?} out of range, using default", self.default_style);
            self.default_style = defaults.default_style;
        }
        if !(self.freehand_tolerance.is_finite() && self.freehand_tolerance >= 0.0) {
            self.freehand_tolerance = defaults.freehand_tolerance;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, Shape, ShapeTrait, shape_from_json};
    use crate::test_log;
    use kurbo::Point;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!((config.hit_margin - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.curve_samples, 24);
        assert!(config.show_grid);
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{ "gridSize": 10, "showGrid": false }"#).unwrap();
        assert!((config.grid_size - 10.0).abs() < f64::EPSILON);
        assert!(!config.show_grid);
        assert!((config.hit_margin - DEFAULT_HIT_MARGIN).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_falls_back() {
        let config = EditorConfig::from_json(r#"{ "hitMargin": -3, "curveSamples": 0 }"#).unwrap();
        assert!((config.hit_margin - DEFAULT_HIT_MARGIN).abs() < f64::EPSILON);
        assert_eq!(config.curve_samples, DEFAULT_CURVE_SAMPLES);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(EditorConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_invalid_default_style_falls_back() {
        let capture = test_log::capture();
        let mut style = serde_json::to_value(ShapeStyle::default()).unwrap();
        style["line_width"] = json!(-5.0);
        style["line_dash"] = json!([-3.0]);
        let config = EditorConfig::from_json(&json!({ "defaultStyle": style }).to_string()).unwrap();
        assert_eq!(config.default_style, ShapeStyle::default());
        assert_eq!(capture.warnings().len(), 1);

        let shape = crate::tools::prepare(
            Shape::Rectangle(Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0)),
            &config,
        );
        let json = shape.to_json();
        assert_eq!(json["lineWidth"], json!(1.0));
        assert_eq!(shape_from_json(&json).unwrap().to_json(), json);
    }
}
