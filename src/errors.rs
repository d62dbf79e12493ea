//! Error types for the highlight core
//!
//! Capture, overlay and lifecycle paths never surface these to the host:
//! they are logged and the operation is abandoned. Only explicit host
//! mutations (adding a highlight, loading a payload) hand them back.

use thiserror::Error;

/// Failures while turning pixel geometry into relative geometry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The text layer has not been laid out (or collapsed to nothing)
    #[error("degenerate container: {width}x{height}")]
    DegenerateContainer { width: f64, height: f64 },

    /// A client rect carried NaN or an infinite coordinate
    #[error("client rect has non-finite coordinates")]
    NonFiniteRect,

    /// The selection produced no client rects at all
    #[error("selection produced no client rects")]
    NoRects,
}

/// Violations of the `RelativeRect` / `Position` invariants
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("coordinate is not finite")]
    NonFinite,

    #[error("inverted rect: ({x1}, {y1}) -> ({x2}, {y2})")]
    Inverted { x1: f64, y1: f64, x2: f64, y2: f64 },

    #[error("position has no rects")]
    Empty,

    #[error("bounding rect does not contain rect {index}")]
    NotContained { index: usize },
}

/// Rejected highlight store mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("duplicate highlight id: {0}")]
    DuplicateId(String),

    #[error("page numbers start at 1 (highlight {0})")]
    InvalidPageNumber(String),
}

/// Failures reading or writing the persisted highlight collection
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The stored payload is not a JSON array of records
    #[error("malformed highlight payload: {0}")]
    Malformed(String),

    #[error("failed to encode highlights: {0}")]
    Encode(#[from] serde_json::Error),

    /// The key-value backend itself refused the operation
    #[error("storage unavailable: {0}")]
    Storage(String),
}

/// Failures reported by a page surface (the DOM side of a rendered page)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("text layer has no parent node")]
    Detached,

    #[error("DOM operation failed: {0}")]
    Dom(String),
}
