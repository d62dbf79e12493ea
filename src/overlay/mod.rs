//! Overlay renderer
//!
//! Builds the per-page overlay from the highlight store: one clickable region
//! per rect of every highlight on the page. Like the layout display list,
//! the output is fully positioned data; the page surface only has to turn it
//! into elements.
//!
//! The overlay is dependent state. Pages are re-rendered on zoom and when
//! they scroll back into view, so the layer is rebuilt from a fresh read of
//! the store on every render.

use std::rc::Rc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::HighlightOptions;
use crate::geometry::Placement;
use crate::models::{PageNumber, SharedState};
use crate::plugin::callbacks::HighlightCallbacks;

/// Inline style of the overlay container: covers the page, lets events
/// through except where a region sits
pub const LAYER_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("left", "0"),
    ("top", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("pointer-events", "none"),
];

/// Cursor shown over a region, marking it as clickable
pub const REGION_CURSOR: &str = "pointer";

/// A single clickable rectangle representing one fragment of a highlight
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OverlayRegion {
    /// Owning highlight
    pub highlight_id: String,

    /// Index of the fragment within `position.rects`
    pub rect_index: usize,

    /// Percentage placement within the page
    pub placement: Placement,

    /// Background color
    pub color: String,

    /// Region opacity, below 1 so the text stays legible
    pub opacity: f64,

    /// CSS cursor while hovering the region
    pub cursor: String,

    /// Tooltip (comment, or the highlighted text)
    pub title: String,
}

impl OverlayRegion {
    /// CSS properties for this region, in application order
    pub fn style_properties(&self) -> Vec<(&'static str, String)> {
        let p = &self.placement;
        vec![
            ("position", "absolute".to_string()),
            ("left", format!("{}%", p.left_pct)),
            ("top", format!("{}%", p.top_pct)),
            ("width", format!("{}%", p.width_pct)),
            ("height", format!("{}%", p.height_pct)),
            ("background-color", self.color.clone()),
            ("opacity", self.opacity.to_string()),
            ("pointer-events", "auto".to_string()),
            ("cursor", self.cursor.clone()),
        ]
    }

    /// The same properties as an inline style string
    pub fn style(&self) -> String {
        self.style_properties()
            .into_iter()
            .map(|(name, value)| format!("{}:{};", name, value))
            .collect()
    }
}

/// Everything to paint on one page
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OverlayLayer {
    pub page_number: PageNumber,

    /// Class name for the container element
    pub class_name: String,

    /// Regions in store insertion order, then fragment order
    pub regions: Vec<OverlayRegion>,
}

impl OverlayLayer {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Builds overlay layers and routes region clicks back to the host
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    state: SharedState,
    callbacks: Rc<HighlightCallbacks>,
    default_color: String,
    opacity: f64,
    layer_class: String,
}

impl OverlayRenderer {
    pub fn new(state: SharedState, callbacks: Rc<HighlightCallbacks>, options: &HighlightOptions) -> Self {
        Self {
            state,
            callbacks,
            default_color: options.default_color.clone(),
            opacity: options.opacity,
            layer_class: options.layer_class.clone(),
        }
    }

    /// Build the overlay for `page_number` from the current store contents
    pub fn build_layer(&self, page_number: PageNumber) -> OverlayLayer {
        let state = self.state.borrow();
        let regions = state
            .store()
            .by_page(page_number)
            .flat_map(|highlight| {
                let color = if highlight.color.trim().is_empty() {
                    self.default_color.clone()
                } else {
                    highlight.color.clone()
                };
                highlight
                    .position
                    .rects()
                    .iter()
                    .enumerate()
                    .map(move |(rect_index, rect)| OverlayRegion {
                        highlight_id: highlight.id.clone(),
                        rect_index,
                        placement: Placement::from_rect(rect),
                        color: color.clone(),
                        opacity: self.opacity,
                        cursor: REGION_CURSOR.to_string(),
                        title: highlight.title().to_string(),
                    })
            })
            .collect();

        OverlayLayer {
            page_number,
            class_name: self.layer_class.clone(),
            regions,
        }
    }

    /// Hand the clicked highlight to the host
    ///
    /// Returns false when the id no longer exists (the region was painted
    /// before the highlight was removed).
    pub fn dispatch_click(&self, highlight_id: &str) -> bool {
        let highlight = self.state.borrow().store().get(highlight_id).cloned();
        match highlight {
            Some(highlight) => {
                self.callbacks.notify_highlight_click(&highlight);
                true
            }
            None => {
                debug!("click on stale overlay region for {}", highlight_id);
                false
            }
        }
    }
}
