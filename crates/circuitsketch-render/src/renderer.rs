//! Render errors and style conversions shared by the backends.

use circuitsketch_core::error::ResourceError;
use circuitsketch_core::shapes::{LineCap, LineJoin};
use circuitsketch_core::surface::StrokeParams;
use kurbo::{Cap, Join, Stroke};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),
    #[error("Base64 decode failed: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Image decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid SVG: {0}")]
    Svg(String),
    #[error("Unsupported source: {0}")]
    Unsupported(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

impl From<RendererError> for ResourceError {
    fn from(err: RendererError) -> Self {
        match err {
            RendererError::Unsupported(what) => ResourceError::Unsupported(what),
            other => ResourceError::Decode(other.to_string()),
        }
    }
}

pub fn to_cap(cap: LineCap) -> Cap {
    match cap {
        LineCap::Butt => Cap::Butt,
        LineCap::Round => Cap::Round,
        LineCap::Square => Cap::Square,
    }
}

pub fn to_join(join: LineJoin) -> Join {
    match join {
        LineJoin::Miter => Join::Miter,
        LineJoin::Round => Join::Round,
        LineJoin::Bevel => Join::Bevel,
    }
}

/// Build a kurbo stroke from surface stroke parameters.
pub fn to_stroke(params: &StrokeParams) -> Stroke {
    let stroke = Stroke::new(params.width)
        .with_caps(to_cap(params.cap))
        .with_join(to_join(params.join));
    if params.dash.is_empty() {
        stroke
    } else {
        stroke.with_dashes(params.dash_offset, params.dash.iter().copied())
    }
}
