//! Resource loading for image and SVG shapes.
//!
//! Raster images arrive as base64 data URIs; SVG arrives as inline markup.
//! Loading only needs the natural size, so the loader decodes enough to
//! measure and never keeps pixel data.

use crate::renderer::{RenderResult, RendererError};
use base64::{Engine, engine::general_purpose::STANDARD};
use circuitsketch_core::error::ResourceError;
use circuitsketch_core::resource::{LoadedResource, ResourceLoader, ResourceRequest};

/// Size a browser gives an `<svg>` with no usable width, height or viewBox.
pub const DEFAULT_SVG_SIZE: (f64, f64) = (300.0, 150.0);

/// Decodes data URIs and inline SVG markup.
#[derive(Debug, Clone)]
pub struct DataUriLoader {
    max_bytes: usize,
}

impl Default for DataUriLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataUriLoader {
    /// Default limit on decoded payload size.
    pub const DEFAULT_MAX_BYTES: usize = 16 * 1024 * 1024;

    pub fn new() -> Self {
        Self {
            max_bytes: Self::DEFAULT_MAX_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Natural size of the image behind a `data:image/...;base64,` URI.
    pub fn decode_image(&self, source: &str) -> RenderResult<LoadedResource> {
        let (mime, bytes) = self.decode_data_uri(source)?;
        if mime == "image/svg+xml" {
            let markup = String::from_utf8(bytes).map_err(|e| RendererError::Svg(e.to_string()))?;
            return svg_size(&markup);
        }
        let decoded = image::load_from_memory(&bytes)?;
        log::debug!("decoded {mime} image {}x{}", decoded.width(), decoded.height());
        Ok(LoadedResource {
            width: f64::from(decoded.width()),
            height: f64::from(decoded.height()),
        })
    }

    fn decode_data_uri(&self, source: &str) -> RenderResult<(String, Vec<u8>)> {
        let Some(rest) = source.strip_prefix("data:") else {
            return Err(RendererError::Unsupported(preview(source)));
        };
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| RendererError::InvalidDataUri("missing ','".into()))?;
        let mut parts = header.split(';');
        let mime = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        if !parts.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(RendererError::Unsupported("data URI without base64 encoding".into()));
        }
        if !mime.starts_with("image/") {
            return Err(RendererError::Unsupported(format!("media type `{mime}`")));
        }
        // Base64 expands by 4/3; reject before allocating.
        if payload.len() / 4 * 3 > self.max_bytes {
            return Err(RendererError::InvalidDataUri(format!(
                "payload exceeds {} bytes",
                self.max_bytes
            )));
        }
        let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = STANDARD.decode(cleaned)?;
        Ok((mime, bytes))
    }
}

impl ResourceLoader for DataUriLoader {
    fn load(&self, request: &ResourceRequest) -> Result<LoadedResource, ResourceError> {
        let result = match request {
            ResourceRequest::Image { source } => self.decode_image(source),
            ResourceRequest::Svg { markup } => svg_size(markup),
        };
        result.map_err(ResourceError::from)
    }
}

fn preview(source: &str) -> String {
    const MAX: usize = 32;
    match source.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}...", &source[..i]),
        None => source.to_string(),
    }
}

/// Natural size of inline SVG markup, resolved by `usvg` from the root
/// element's `width`/`height` and `viewBox`.
pub fn svg_size(markup: &str) -> RenderResult<LoadedResource> {
    let mut options = usvg::Options::default();
    if let Some(size) = usvg::Size::from_wh(DEFAULT_SVG_SIZE.0 as f32, DEFAULT_SVG_SIZE.1 as f32) {
        options.default_size = size;
    }
    let tree = usvg::Tree::from_str(markup, &options).map_err(|e| RendererError::Svg(e.to_string()))?;
    let size = tree.size();
    log::debug!("measured svg {}x{}", size.width(), size.height());
    Ok(LoadedResource {
        width: f64::from(size.width()),
        height: f64::from(size.height()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuitsketch_core::drawing::DrawingManager;
    use circuitsketch_core::component::ComponentCatalog;
    use circuitsketch_core::resource::LoadState;
    use circuitsketch_core::shapes::{ImageShape, Shape, SvgDrawing};
    use kurbo::Point;
    use std::io::Cursor;

    fn png_data_uri(width: u32, height: u32) -> String {
        let img = image::RgbaImage::new(width, height);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(bytes))
    }

    #[test]
    fn test_png_natural_size() {
        let loaded = DataUriLoader::new().decode_image(&png_data_uri(3, 2)).unwrap();
        assert!((loaded.width - 3.0).abs() < f64::EPSILON);
        assert!((loaded.height - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_non_data_sources() {
        let loader = DataUriLoader::new();
        assert!(matches!(
            loader.decode_image("https://example.com/a.png"),
            Err(RendererError::Unsupported(_))
        ));
        assert!(matches!(
            loader.decode_image("data:text/plain;base64,aGk="),
            Err(RendererError::Unsupported(_))
        ));
        assert!(matches!(
            loader.decode_image("data:image/png;base64,!!!"),
            Err(RendererError::Base64(_))
        ));
        assert!(matches!(
            loader.decode_image("data:image/png;base64,aGVsbG8="),
            Err(RendererError::Image(_))
        ));
    }

    #[test]
    fn test_size_limit() {
        let loader = DataUriLoader::new().with_max_bytes(8);
        assert!(matches!(
            loader.decode_image(&png_data_uri(4, 4)),
            Err(RendererError::InvalidDataUri(_))
        ));
    }

    const SVG_NS: &str = "http://www.w3.org/2000/svg";

    fn size(markup: &str) -> (f64, f64) {
        let loaded = svg_size(markup).unwrap();
        (loaded.width, loaded.height)
    }

    #[test]
    fn test_svg_sizes() {
        assert_eq!(size(&format!(r#"<svg xmlns="{SVG_NS}" width="40" height="20px"/>"#)), (40.0, 20.0));
        assert_eq!(size(&format!(r#"<svg xmlns="{SVG_NS}" viewBox="0 0 60 30"/>"#)), (60.0, 30.0));
        assert_eq!(
            size(&format!(r#"<?xml version="1.0"?><svg xmlns="{SVG_NS}"></svg>"#)),
            DEFAULT_SVG_SIZE
        );
    }

    #[test]
    fn test_svg_comments_ignored() {
        let markup = format!(
            r#"<!-- <svg width="99" height="99"> --><svg xmlns="{SVG_NS}" width="10" height="10"/>"#
        );
        assert_eq!(size(&markup), (10.0, 10.0));
    }

    #[test]
    fn test_malformed_svg_rejected() {
        let truncated = format!(r#"<svg xmlns="{SVG_NS}" width="10" height="10"><path d="M0 0 L</g>"#);
        assert!(matches!(svg_size(&truncated), Err(RendererError::Svg(_))));
        assert!(matches!(svg_size("<div/>"), Err(RendererError::Svg(_))));
        assert!(matches!(svg_size("not markup"), Err(RendererError::Svg(_))));
    }

    #[test]
    fn test_malformed_svg_stays_unloaded() {
        let mut scene = DrawingManager::new();
        let id = scene.add_element(Shape::Svg(SvgDrawing::new(Point::ZERO, 20.0, 20.0, "<svg><g></svg>")));
        assert_eq!(scene.load_pending(&DataUriLoader::new()), 0);
        match scene.get(id) {
            Some(Shape::Svg(svg)) => assert_eq!(svg.load_state(), LoadState::Failed),
            other => panic!("expected svg, got {other:?}"),
        }
    }

    #[test]
    fn test_catalog_glyph_measures() {
        let catalog = ComponentCatalog::builtin();
        let resistor = catalog.get("resistor").unwrap();
        let loaded = svg_size(&resistor.glyph).unwrap();
        assert!((loaded.width - resistor.width).abs() < 1e-3);
        assert!((loaded.height - resistor.height).abs() < 1e-3);
    }

    #[test]
    fn test_svg_data_uri() {
        let markup = format!(r#"<svg xmlns="{SVG_NS}" width="8" height="6"/>"#);
        let uri = format!("data:image/svg+xml;base64,{}", STANDARD.encode(markup));
        let loaded = DataUriLoader::new().decode_image(&uri).unwrap();
        assert!((loaded.width - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scene_loads_pending_images() {
        let mut scene = DrawingManager::new();
        let good = scene.add_element(Shape::Image(ImageShape::new(Point::ZERO, 0.0, 0.0, png_data_uri(5, 7))));
        let bad = scene.add_element(Shape::Image(ImageShape::new(Point::ZERO, 10.0, 10.0, "nope")));
        assert_eq!(scene.load_pending(&DataUriLoader::new()), 1);

        match scene.get(good) {
            Some(Shape::Image(img)) => {
                assert!(img.is_loaded());
                assert!((img.width() - 5.0).abs() < f64::EPSILON);
                assert!((img.height() - 7.0).abs() < f64::EPSILON);
            }
            other => panic!("expected image, got {other:?}"),
        }
        match scene.get(bad) {
            Some(Shape::Image(img)) => assert!(!img.is_loaded()),
            other => panic!("expected image, got {other:?}"),
        }
        assert!(scene.pending_resources().is_empty());
    }
}
