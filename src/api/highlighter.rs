//! `PdfHighlighter`: the object a JavaScript host attaches to its PDF viewer
//!
//! ```js
//! const highlighter = new PdfHighlighter({ opacity: 0.3 }, callbacks);
//! viewer.on("documentload", () => highlighter.onDocumentLoad());
//! viewer.on("textlayerrender", (i, el) => highlighter.onTextLayerRender(i, el));
//! ```

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::api::callbacks::callbacks_from_js;
use crate::api::dom::{DomTextLayer, ListenerRegistry};
use crate::api::helpers::{deserialize, deserialize_or_default, js_error, serialize};
use crate::api::storage::BrowserStorage;
use crate::config::HighlightOptions;
use crate::models::{AnnotatorState, Highlight, HighlightPatch, PageNumber};
use crate::plugin::{HighlightPlugin, RendererLifecycle};
use crate::store::persistence::{load_highlights, save_highlights};
use crate::store::HighlightStore;

#[wasm_bindgen]
pub struct PdfHighlighter {
    plugin: Rc<HighlightPlugin>,
    registry: Rc<ListenerRegistry>,
}

#[wasm_bindgen]
impl PdfHighlighter {
    /// Create a highlighter with an empty collection
    ///
    /// `options` and `callbacks` may both be `undefined`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue, callbacks: JsValue) -> Result<PdfHighlighter, JsValue> {
        let options: HighlightOptions = deserialize_or_default(options, "Invalid highlighter options")?;
        let callbacks = callbacks_from_js(&callbacks);
        let state = AnnotatorState::new(HighlightStore::new()).into_shared();

        Ok(PdfHighlighter {
            plugin: Rc::new(HighlightPlugin::new(state, options, callbacks)),
            registry: Rc::new(ListenerRegistry::new()),
        })
    }

    /// Renderer hook: a document finished loading
    #[wasm_bindgen(js_name = onDocumentLoad)]
    pub fn on_document_load(&self) {
        self.registry.clear();
        self.plugin.on_document_ready();
    }

    /// Renderer hook: the text layer of page `page_index` (0-based) was rendered
    #[wasm_bindgen(js_name = onTextLayerRender)]
    pub fn on_text_layer_render(&self, page_index: u32, element: JsValue) {
        let element = match element.dyn_into::<HtmlElement>() {
            Ok(element) => element,
            Err(_) => {
                log::warn!("Text layer node not found for page index {}", page_index);
                return;
            }
        };

        let surface = DomTextLayer::new(element, Rc::clone(&self.plugin), Rc::clone(&self.registry));
        self.plugin.on_page_rendered(page_index, &surface);
    }

    /// Route a click on a highlight region, as the overlay would
    #[wasm_bindgen(js_name = handleOverlayClick)]
    pub fn handle_overlay_click(&self, highlight_id: &str) -> bool {
        self.plugin.handle_overlay_click(highlight_id)
    }

    /// Add a full highlight record; duplicate ids and page 0 are rejected
    #[wasm_bindgen(js_name = addHighlight)]
    pub fn add_highlight(&self, highlight: JsValue) -> Result<(), JsValue> {
        let highlight: Highlight = deserialize(highlight, "Invalid highlight")?;
        self.plugin
            .state()
            .borrow_mut()
            .store_mut()
            .add(highlight)
            .map_err(js_error)
    }

    /// Remove a highlight; returns whether it existed
    #[wasm_bindgen(js_name = removeHighlight)]
    pub fn remove_highlight(&self, id: &str) -> bool {
        self.plugin.state().borrow_mut().store_mut().remove(id).is_some()
    }

    /// Apply a partial update; returns whether the id was found
    #[wasm_bindgen(js_name = updateHighlight)]
    pub fn update_highlight(&self, id: &str, patch: JsValue) -> Result<bool, JsValue> {
        let patch: HighlightPatch = deserialize(patch, "Invalid highlight patch")?;
        Ok(self.plugin.state().borrow_mut().store_mut().update(id, patch))
    }

    /// Every highlight, in insertion order
    #[wasm_bindgen(js_name = highlights)]
    pub fn highlights(&self) -> Result<JsValue, JsValue> {
        let state = self.plugin.state().borrow();
        serialize(state.store().as_slice(), "Failed to serialize highlights")
    }

    /// Highlights on one page (1-based), in insertion order
    #[wasm_bindgen(js_name = highlightsForPage)]
    pub fn highlights_for_page(&self, page_number: PageNumber) -> Result<JsValue, JsValue> {
        let state = self.plugin.state().borrow();
        let page: Vec<&Highlight> = state.store().by_page(page_number).collect();
        serialize(&page, "Failed to serialize highlights")
    }

    /// The captured selection waiting to be committed, or `null`
    #[wasm_bindgen(js_name = pendingSelection)]
    pub fn pending_selection(&self) -> Result<JsValue, JsValue> {
        let state = self.plugin.state().borrow();
        match state.pending() {
            Some(selection) => serialize(selection, "Failed to serialize pending selection"),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = clearPendingSelection)]
    pub fn clear_pending_selection(&self) {
        self.plugin.state().borrow_mut().clear_pending();
    }

    /// Turn the pending selection into a highlight
    ///
    /// Returns the new highlight, or `null` when nothing was pending.
    #[wasm_bindgen(js_name = commitPendingSelection)]
    pub fn commit_pending_selection(&self, color: Option<String>) -> Result<JsValue, JsValue> {
        let color = color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.plugin.options().default_color.clone());

        let committed = self.plugin.state().borrow_mut().commit_pending(&color);
        match committed {
            Some(highlight) => serialize(&highlight, "Failed to serialize highlight"),
            None => Ok(JsValue::NULL),
        }
    }

    /// Replace the collection with the one saved in `localStorage`
    ///
    /// Returns the number of highlights loaded.
    #[wasm_bindgen(js_name = loadFromStorage)]
    pub fn load_from_storage(&self) -> Result<usize, JsValue> {
        let storage = BrowserStorage::local().map_err(js_error)?;
        let store = load_highlights(&storage, &self.plugin.options().storage_key);
        let count = store.len();
        self.plugin.state().borrow_mut().replace_store(store);
        Ok(count)
    }

    /// Write the collection to `localStorage`
    #[wasm_bindgen(js_name = saveToStorage)]
    pub fn save_to_storage(&self) -> Result<(), JsValue> {
        let storage = BrowserStorage::local().map_err(js_error)?;
        let state = self.plugin.state().borrow();
        save_highlights(&storage, &self.plugin.options().storage_key, state.store()).map_err(js_error)
    }

    /// The overlay regions that would be painted on `page_number` now
    #[wasm_bindgen(js_name = overlayForPage)]
    pub fn overlay_for_page(&self, page_number: PageNumber) -> Result<JsValue, JsValue> {
        serialize(&self.plugin.overlay_for_page(page_number), "Failed to serialize overlay")
    }

    /// Effective (normalized) options
    #[wasm_bindgen(js_name = options)]
    pub fn options(&self) -> Result<JsValue, JsValue> {
        serialize(self.plugin.options(), "Failed to serialize options")
    }
}
