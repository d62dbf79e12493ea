//! Plugin configuration
//!
//! Passed from JavaScript as a plain object; every field is optional.

use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_HIGHLIGHT_COLOR;
use crate::store::persistence::STORAGE_KEY;

/// Opacity used when none (or a nonsensical one) is configured
pub const DEFAULT_OVERLAY_OPACITY: f64 = 0.4;

/// Class name of the per-page overlay container
pub const DEFAULT_LAYER_CLASS: &str = "highlight-layer";

/// Configuration options for the highlight plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightOptions {
    /// Color for committed highlights and for stored records without one
    pub default_color: String,

    /// Overlay region opacity, in (0, 1)
    pub opacity: f64,

    /// Class name of the overlay container inserted after each text layer
    pub layer_class: String,

    /// Key the collection is persisted under
    pub storage_key: String,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
            opacity: DEFAULT_OVERLAY_OPACITY,
            layer_class: DEFAULT_LAYER_CLASS.to_string(),
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}

impl HighlightOptions {
    /// Replace out-of-range or empty values with their defaults
    ///
    /// Opacity must stay strictly between 0 and 1: full opacity would hide
    /// the text underneath.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.opacity > 0.0 && self.opacity < 1.0) {
            self.opacity = defaults.opacity;
        }
        if self.default_color.trim().is_empty() {
            self.default_color = defaults.default_color;
        }
        if self.layer_class.trim().is_empty() {
            self.layer_class = defaults.layer_class;
        }
        if self.storage_key.is_empty() {
            self.storage_key = defaults.storage_key;
        }
        self
    }
}
