//! Error types for contract violations.
//!
//! Bad user input never surfaces here: property setters reject and log
//! instead. These errors signal a caller bug, typically structurally
//! invalid serialized input.

use thiserror::Error;

/// A structurally invalid shape description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("expected a JSON object, found {0}")]
    NotAnObject(String),
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("unknown shape type `{0}`")]
    UnknownType(String),
    #[error("expected shape type `{expected}`, found `{found}`")]
    TypeMismatch { expected: &'static str, found: String },
    #[error("invalid shape id `{0}`")]
    InvalidId(String),
    #[error("malformed field `{field}`: {reason}")]
    MalformedField { field: &'static str, reason: String },
    #[error("group declares {declared} children but {supplied} were supplied")]
    ChildCountMismatch { declared: usize, supplied: usize },
}

/// Result type for (de)serialization of shapes.
pub type ShapeResult<T> = Result<T, ShapeError>;

/// Failure to decode an external resource (raster image or vector glyph).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("unsupported resource: {0}")]
    Unsupported(String),
}
