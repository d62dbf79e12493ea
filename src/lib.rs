//! PDF Highlighter WASM Module
//!
//! Text-selection highlighting for a PDF viewer: captures selections on a
//! page's text layer, normalizes them to page-relative geometry, keeps the
//! highlight collection, and paints clickable overlays on each render.

pub mod api;
pub mod capture;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod models;
pub mod overlay;
pub mod plugin;
pub mod store;

// Re-export commonly used types
pub use api::PdfHighlighter;
pub use capture::{CaptureOutcome, SelectionCapture, SelectionSnapshot};
pub use config::HighlightOptions;
pub use models::*;
pub use overlay::{OverlayLayer, OverlayRegion, OverlayRenderer};
pub use plugin::{HighlightCallbacks, HighlightPlugin, PageSurface, RendererLifecycle};
pub use store::HighlightStore;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already initialized: {}", e).into());
    }

    log::info!("PDF highlighter WASM module initialized");
}
