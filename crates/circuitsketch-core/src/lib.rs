//! CircuitSketch Core Library
//!
//! Platform-agnostic scene model for the CircuitSketch circuit editor:
//! shapes, components and wires, the drawing manager, and the pointer
//! tools that edit them. Painting and resource decoding go through the
//! [`Surface`] and [`ResourceLoader`] traits, implemented by a backend.

pub mod component;
pub mod config;
pub mod drawing;
pub mod editor;
pub mod error;
pub mod handles;
pub mod input;
pub mod resource;
pub mod schedule;
pub mod shapes;
pub mod surface;
pub mod tools;
pub mod validate;

#[cfg(test)]
mod test_log;

pub use component::{Component, ComponentCatalog, ComponentDefinition, Terminal, TerminalId};
pub use config::EditorConfig;
pub use drawing::{DrawingManager, WireEnd};
pub use editor::Editor;
pub use error::{ResourceError, ShapeError, ShapeResult};
pub use handles::{Affordance, Handle, HandleAnchor, HandleBox, HandleKind, HandleShape};
pub use input::{Modifiers, MouseButton, MouseEvent, PointerEvent};
pub use resource::{LoadState, LoadedResource, PendingResource, ResourceLoader, ResourceRequest};
pub use schedule::RenderScheduler;
pub use shapes::{Shape, ShapeId, ShapeStyle, ShapeTrait, shape_from_json};
pub use surface::{FontSpec, StrokeParams, Surface};
pub use tools::{EditRequestSource, Tool, ToolManager};
