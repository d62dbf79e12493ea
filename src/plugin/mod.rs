//! Plugin coordinator
//!
//! Binds selection capture and the overlay renderer to the document
//! renderer's lifecycle, so the host only forwards two hooks:
//!
//! ```text
//! renderer: onDocumentLoad()            -> on_document_ready()
//! renderer: onTextLayerRender(i, ele)   -> on_page_rendered(i, surface)
//!                                            |- bind pointer-release (once per surface)
//!                                            `- build + mount overlay (every time)
//! ```
//!
//! Nothing is assumed about hook order beyond "a page renders at least once
//! before its overlay is expected". Hooks may fire for any page, any number
//! of times.

pub mod callbacks;
pub mod surface;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{error, info};

use crate::capture::{CaptureOutcome, SelectionCapture, SelectionSnapshot};
use crate::config::HighlightOptions;
use crate::models::{ContainerRect, PageNumber, SharedState};
use crate::overlay::{OverlayLayer, OverlayRenderer};

pub use callbacks::HighlightCallbacks;
pub use surface::{PageSurface, SurfaceId};

/// The two capability methods a document renderer drives
pub trait RendererLifecycle {
    /// The document finished loading
    fn on_document_ready(&self);

    /// The text layer of page `page_index` (0-based) was rendered
    fn on_page_rendered<S: PageSurface + ?Sized>(&self, page_index: u32, surface: &S);
}

/// The pluggable unit a host attaches to its renderer
#[derive(Debug)]
pub struct HighlightPlugin {
    state: SharedState,
    options: HighlightOptions,
    capture: SelectionCapture,
    overlay: OverlayRenderer,

    /// Which surface currently carries the pointer-release listener of each page
    bound: RefCell<HashMap<PageNumber, SurfaceId>>,
}

impl HighlightPlugin {
    pub fn new(state: SharedState, options: HighlightOptions, callbacks: HighlightCallbacks) -> Self {
        let options = options.normalized();
        let callbacks = Rc::new(callbacks);
        Self {
            capture: SelectionCapture::new(Rc::clone(&state), Rc::clone(&callbacks)),
            overlay: OverlayRenderer::new(Rc::clone(&state), callbacks, &options),
            state,
            options,
            bound: RefCell::new(HashMap::new()),
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    /// Overlay for `page_number` as it would be painted now
    pub fn overlay_for_page(&self, page_number: PageNumber) -> OverlayLayer {
        self.overlay.build_layer(page_number)
    }

    /// Pointer-release on the text layer of `page_number`
    pub fn handle_pointer_release(
        &self,
        page_number: PageNumber,
        selection: Option<&SelectionSnapshot>,
        container: &ContainerRect,
    ) -> CaptureOutcome {
        self.capture.handle_pointer_release(selection, page_number, container)
    }

    /// Click on an overlay region
    pub fn handle_overlay_click(&self, highlight_id: &str) -> bool {
        self.overlay.dispatch_click(highlight_id)
    }

    /// Number of pages with a live pointer-release binding
    pub fn bound_page_count(&self) -> usize {
        self.bound.borrow().len()
    }

    fn ensure_bound<S: PageSurface + ?Sized>(&self, page_number: PageNumber, surface: &S) {
        let id = surface.surface_id();
        if self.bound.borrow().get(&page_number) == Some(&id) {
            return;
        }

        match surface.bind_pointer_release(page_number) {
            Ok(()) => {
                let mut bound = self.bound.borrow_mut();
                // A reused element may have moved here from another page
                bound.retain(|_, existing| *existing != id);
                bound.insert(page_number, id);
            }
            Err(e) => error!("Failed to bind selection listener on page {}: {}", page_number, e),
        }
    }
}

impl RendererLifecycle for HighlightPlugin {
    fn on_document_ready(&self) {
        self.bound.borrow_mut().clear();
        info!(
            "document ready ({} highlights in store)",
            self.state.borrow().store().len()
        );
    }

    fn on_page_rendered<S: PageSurface + ?Sized>(&self, page_index: u32, surface: &S) {
        let page_number = page_index.saturating_add(1);
        self.ensure_bound(page_number, surface);

        let layer = self.overlay.build_layer(page_number);
        if let Err(e) = surface.mount_overlay(&layer) {
            error!("Failed to mount highlight overlay on page {}: {}", page_number, e);
        }
    }
}
