//! Geometry normalizer
//!
//! Converts the pixel rects of a browser selection into page-relative
//! coordinates, aggregates them into a bounding box, and maps relative rects
//! back to percentage placement for the overlay.
//!
//! ```text
//! ClientRect (px, viewport)  --normalize_rect-->  RelativeRect (0..1)
//!                                                      |
//!                                               Placement::from_rect
//!                                                      v
//!                                     left/top/width/height in % of page
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::GeometryError;
use crate::models::{ClientRect, ContainerRect, Position, RelativeRect};

/// Convert one client rect into container-relative coordinates
pub fn normalize_rect(raw: &ClientRect, container: &ContainerRect) -> Result<RelativeRect, GeometryError> {
    if container.is_degenerate() {
        return Err(GeometryError::DegenerateContainer {
            width: container.width,
            height: container.height,
        });
    }
    if !raw.is_finite() {
        return Err(GeometryError::NonFiniteRect);
    }

    let x1 = (raw.left - container.left) / container.width;
    let y1 = (raw.top - container.top) / container.height;
    let x2 = (raw.right - container.left) / container.width;
    let y2 = (raw.bottom - container.top) / container.height;

    // Browsers never report right < left, but keep the rect well-formed if one does
    RelativeRect::new(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
        .map_err(|_| GeometryError::NonFiniteRect)
}

/// Bounding box of a set of rects, seeded from the first rect
///
/// Returns `None` for an empty slice.
pub fn bounding_rect(rects: &[RelativeRect]) -> Option<RelativeRect> {
    let (first, rest) = rects.split_first()?;
    Some(rest.iter().fold(*first, |acc, rect| acc.union(rect)))
}

/// Normalize every fragment of a selection and build its `Position`
pub fn normalize_selection(raws: &[ClientRect], container: &ContainerRect) -> Result<Position, GeometryError> {
    if raws.is_empty() {
        return Err(GeometryError::NoRects);
    }

    let rects = raws
        .iter()
        .map(|raw| normalize_rect(raw, container))
        .collect::<Result<Vec<_>, _>>()?;

    Position::from_rects(rects).map_err(|_| GeometryError::NoRects)
}

/// Percentage placement of a relative rect inside its page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub left_pct: f64,
    pub top_pct: f64,
    pub width_pct: f64,
    pub height_pct: f64,
}

impl Placement {
    pub fn from_rect(rect: &RelativeRect) -> Self {
        Self {
            left_pct: rect.x1() * 100.0,
            top_pct: rect.y1() * 100.0,
            width_pct: rect.width() * 100.0,
            height_pct: rect.height() * 100.0,
        }
    }

    /// Absolute pixel rect for a container of the given size
    pub fn to_pixels(&self, container: &ContainerRect) -> ClientRect {
        let left = container.left + self.left_pct / 100.0 * container.width;
        let top = container.top + self.top_pct / 100.0 * container.height;
        ClientRect::new(
            left,
            top,
            left + self.width_pct / 100.0 * container.width,
            top + self.height_pct / 100.0 * container.height,
        )
    }

    /// Inline CSS positioning fragment
    pub fn to_css(&self) -> String {
        format!(
            "position:absolute;left:{}%;top:{}%;width:{}%;height:{}%;",
            self.left_pct, self.top_pct, self.width_pct, self.height_pct
        )
    }
}
