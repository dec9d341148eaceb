//! CircuitSketch Render Library
//!
//! Backend-side implementations of the core's external collaborators: a
//! retained [`SceneSurface`] that records kurbo paths for a GPU renderer,
//! and a [`DataUriLoader`] that measures image and SVG resources.

mod loader;
mod renderer;
mod scene;

pub use loader::{DEFAULT_SVG_SIZE, DataUriLoader, svg_size};
pub use renderer::{RenderResult, RendererError, to_cap, to_join, to_stroke};
pub use scene::{RenderItem, SceneSurface};
