//! Stroke and fill styling shared by every drawable shape.

use crate::validate::{self, EditPatch};
use peniko::Color;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. Also accepts `transparent`.
    pub fn from_hex(color: &str) -> Option<Self> {
        let color = color.trim();
        if color == "transparent" {
            return Some(Self::transparent());
        }
        let hex = color.strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let r = byte(&hex[0..1])? * 17;
                let g = byte(&hex[1..2])? * 17;
                let b = byte(&hex[2..3])? * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => Some(Self::new(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?, 255)),
            8 => Some(Self::new(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Hex form; the alpha byte is only written when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Shape of open stroke ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "butt" => Some(LineCap::Butt),
            "round" => Some(LineCap::Round),
            "square" => Some(LineCap::Square),
            _ => None,
        }
    }
}

/// Shape of stroke corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "miter" => Some(LineJoin::Miter),
            "round" => Some(LineJoin::Round),
            "bevel" => Some(LineJoin::Bevel),
            _ => None,
        }
    }
}

/// Style properties for shapes.
///
/// Fields are private so every write goes through a validated setter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    stroke_color: SerializableColor,
    fill_color: Option<SerializableColor>,
    line_width: f64,
    #[serde(default)]
    line_dash: Vec<f64>,
    #[serde(default)]
    line_dash_offset: f64,
    #[serde(default)]
    line_cap: LineCap,
    #[serde(default)]
    line_join: LineJoin,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            fill_color: None,
            line_width: 1.0,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
        }
    }
}

impl ShapeStyle {
    /// Keys recognized by [`ShapeStyle::edit`].
    pub const KEYS: [&'static str; 7] = [
        "strokeColor",
        "fillColor",
        "lineWidth",
        "lineDash",
        "lineDashOffset",
        "lineCap",
        "lineJoin",
    ];

    pub fn stroke_color(&self) -> SerializableColor {
        self.stroke_color
    }

    pub fn fill_color(&self) -> Option<SerializableColor> {
        self.fill_color
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn line_dash(&self) -> &[f64] {
        &self.line_dash
    }

    pub fn line_dash_offset(&self) -> f64 {
        self.line_dash_offset
    }

    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }

    pub fn set_stroke_color(&mut self, color: SerializableColor) {
        self.stroke_color = color;
    }

    pub fn set_fill_color(&mut self, color: Option<SerializableColor>) {
        self.fill_color = color;
    }

    pub fn set_line_width(&mut self, width: f64) -> bool {
        validate::assign(&mut self.line_width, "lineWidth", width, validate::is_positive)
    }

    pub fn set_line_dash(&mut self, dash: Vec<f64>) -> bool {
        if dash.iter().all(|d| validate::is_non_negative(*d)) {
            self.line_dash = dash;
            true
        } else {
            validate::reject("lineDash", format!("{dash:?}"), format!("{:?}", self.line_dash));
            false
        }
    }

    pub fn set_line_dash_offset(&mut self, offset: f64) -> bool {
        validate::assign(
            &mut self.line_dash_offset,
            "lineDashOffset",
            offset,
            validate::is_finite,
        )
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    /// Apply the recognized style keys of `patch`; other keys are ignored.
    pub fn edit(&mut self, patch: &EditPatch) {
        for (key, value) in patch {
            match key.as_str() {
                "strokeColor" => match value.as_str().and_then(SerializableColor::from_hex) {
                    Some(color) => self.stroke_color = color,
                    None => validate::reject("strokeColor", value, self.stroke_color),
                },
                "fillColor" => {
                    if value.is_null() {
                        self.fill_color = None;
                    } else {
                        match value.as_str().and_then(SerializableColor::from_hex) {
                            Some(color) => self.fill_color = Some(color),
                            None => validate::reject("fillColor", value, self.fill_json()),
                        }
                    }
                }
                "lineWidth" => {
                    if let Some(w) = validate::patch_number("lineWidth", value, self.line_width) {
                        self.set_line_width(w);
                    }
                }
                "lineDash" => match parse_dash(value) {
                    Some(dash) => {
                        self.set_line_dash(dash);
                    }
                    None => validate::reject("lineDash", value, format!("{:?}", self.line_dash)),
                },
                "lineDashOffset" => {
                    if let Some(o) =
                        validate::patch_number("lineDashOffset", value, self.line_dash_offset)
                    {
                        self.set_line_dash_offset(o);
                    }
                }
                "lineCap" => match value.as_str().and_then(LineCap::parse) {
                    Some(cap) => self.line_cap = cap,
                    None => validate::reject("lineCap", value, self.line_cap.as_str()),
                },
                "lineJoin" => match value.as_str().and_then(LineJoin::parse) {
                    Some(join) => self.line_join = join,
                    None => validate::reject("lineJoin", value, self.line_join.as_str()),
                },
                _ => {}
            }
        }
    }

    fn fill_json(&self) -> Value {
        self.fill_color
            .map(|c| Value::String(c.to_hex()))
            .unwrap_or(Value::Null)
    }

    /// Whether every field satisfies its setter's constraint.
    pub fn is_valid(&self) -> bool {
        validate::is_positive(self.line_width)
            && self.line_dash.iter().all(|d| validate::is_non_negative(*d))
            && validate::is_finite(self.line_dash_offset)
    }

    /// Write the style keys into a serialized shape object.
    pub fn write_json(&self, map: &mut Map<String, Value>) {
        map.insert("strokeColor".into(), json!(self.stroke_color.to_hex()));
        map.insert("fillColor".into(), self.fill_json());
        map.insert("lineWidth".into(), json!(self.line_width));
        map.insert("lineDash".into(), json!(self.line_dash));
        map.insert("lineDashOffset".into(), json!(self.line_dash_offset));
        map.insert("lineCap".into(), json!(self.line_cap.as_str()));
        map.insert("lineJoin".into(), json!(self.line_join.as_str()));
    }
}

fn parse_dash(value: &Value) -> Option<Vec<f64>> {
    value
        .as_array()?
        .iter()
        .map(validate::coerce_number)
        .collect()
}
