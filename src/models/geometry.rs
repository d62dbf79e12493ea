//! Geometry models
//!
//! Two coordinate spaces meet here:
//!
//! - pixel space: `ClientRect` and `ContainerRect`, viewport pixels as the
//!   browser reports them at the current zoom
//! - relative space: `RelativeRect` and `Position`, fractions of the text layer
//!   size in `[0, 1]`, independent of zoom and DPI
//!
//! Relative types validate their invariants on construction and on
//! deserialization, so a `Position` that exists is always well-formed.

use serde::{Deserialize, Serialize};

use crate::errors::PositionError;

/// Slack allowed when checking containment of persisted rects
const CONTAINMENT_EPSILON: f64 = 1e-9;

/// A rectangle in viewport pixels (as returned by `Range.getClientRects()`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ClientRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.top.is_finite() && self.right.is_finite() && self.bottom.is_finite()
    }
}

/// The text layer's bounding box in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// True when the container can serve as a divisor: laid out, finite, non-zero
    pub fn is_degenerate(&self) -> bool {
        !(self.left.is_finite() && self.top.is_finite())
            || !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
    }
}

/// A rectangle in page-relative units
///
/// `width` and `height` are derived from the corners and are not settable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectFields", into = "RectFields")]
pub struct RelativeRect {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

/// Wire shape of a `RelativeRect`
///
/// `width`/`height` are written for consumers that read them directly, but
/// ignored on the way in: they are always recomputed from the corners.
#[derive(Serialize, Deserialize)]
struct RectFields {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

impl TryFrom<RectFields> for RelativeRect {
    type Error = PositionError;

    fn try_from(fields: RectFields) -> Result<Self, Self::Error> {
        RelativeRect::new(fields.x1, fields.y1, fields.x2, fields.y2)
    }
}

impl From<RelativeRect> for RectFields {
    fn from(rect: RelativeRect) -> Self {
        RectFields {
            x1: rect.x1,
            y1: rect.y1,
            x2: rect.x2,
            y2: rect.y2,
            width: rect.width(),
            height: rect.height(),
        }
    }
}

impl RelativeRect {
    /// Build a rect from its corners
    ///
    /// Coordinates must be finite and ordered (`x1 <= x2`, `y1 <= y2`); they
    /// are then clamped into `[0, 1]`, pinning fragments that spill past the
    /// text layer to its edge.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self, PositionError> {
        if !(x1.is_finite() && y1.is_finite() && x2.is_finite() && y2.is_finite()) {
            return Err(PositionError::NonFinite);
        }
        if x1 > x2 || y1 > y2 {
            return Err(PositionError::Inverted { x1, y1, x2, y2 });
        }

        Ok(Self {
            x1: x1.clamp(0.0, 1.0),
            y1: y1.clamp(0.0, 1.0),
            x2: x2.clamp(0.0, 1.0),
            y2: y2.clamp(0.0, 1.0),
        })
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn x2(&self) -> f64 {
        self.x2
    }

    pub fn y2(&self) -> f64 {
        self.y2
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Smallest rect covering both `self` and `other`
    pub fn union(&self, other: &RelativeRect) -> RelativeRect {
        RelativeRect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Check that `other` lies inside this rect
    pub fn contains(&self, other: &RelativeRect) -> bool {
        self.x1 <= other.x1 + CONTAINMENT_EPSILON
            && self.y1 <= other.y1 + CONTAINMENT_EPSILON
            && self.x2 >= other.x2 - CONTAINMENT_EPSILON
            && self.y2 >= other.y2 - CONTAINMENT_EPSILON
    }
}

/// Geometry of a selection: one rect per visual line fragment plus their bounding box
///
/// `rects` keeps the order the browser reported them in, which is not
/// guaranteed to be reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PositionFields")]
pub struct Position {
    bounding_rect: RelativeRect,
    rects: Vec<RelativeRect>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionFields {
    bounding_rect: RelativeRect,
    rects: Vec<RelativeRect>,
}

impl TryFrom<PositionFields> for Position {
    type Error = PositionError;

    fn try_from(fields: PositionFields) -> Result<Self, Self::Error> {
        Position::new(fields.bounding_rect, fields.rects)
    }
}

impl Position {
    /// Build a position from an explicit bounding rect, checking it covers every rect
    pub fn new(bounding_rect: RelativeRect, rects: Vec<RelativeRect>) -> Result<Self, PositionError> {
        if rects.is_empty() {
            return Err(PositionError::Empty);
        }
        if let Some(index) = rects.iter().position(|rect| !bounding_rect.contains(rect)) {
            return Err(PositionError::NotContained { index });
        }
        Ok(Self { bounding_rect, rects })
    }

    /// Build a position whose bounding rect is computed from `rects`
    pub fn from_rects(rects: Vec<RelativeRect>) -> Result<Self, PositionError> {
        let bounding_rect = crate::geometry::bounding_rect(&rects).ok_or(PositionError::Empty)?;
        Ok(Self { bounding_rect, rects })
    }

    pub fn bounding_rect(&self) -> &RelativeRect {
        &self.bounding_rect
    }

    pub fn rects(&self) -> &[RelativeRect] {
        &self.rects
    }
}
