//! DOM side of the plugin
//!
//! `DomTextLayer` adapts a rendered text-layer element to `PageSurface`.
//! Listener closures are owned by a `ListenerRegistry` instead of being
//! leaked with `forget()`: rebinding an element, or remounting a page's
//! overlay, removes and drops what was there before.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{DomRectList, Element, HtmlElement, MouseEvent};

use crate::api::helpers::describe_js;
use crate::capture::SelectionSnapshot;
use crate::errors::SurfaceError;
use crate::models::{ClientRect, ContainerRect, PageNumber};
use crate::overlay::{OverlayLayer, LAYER_STYLE};
use crate::plugin::{HighlightPlugin, PageSurface, SurfaceId};

const SURFACE_ID_ATTR: &str = "data-highlight-surface";
const PAGE_NUMBER_ATTR: &str = "data-page-number";
const HIGHLIGHT_ID_ATTR: &str = "data-highlight-id";

type MouseListener = Closure<dyn FnMut(MouseEvent)>;

struct ReleaseBinding {
    element: HtmlElement,
    page_number: PageNumber,
    listener: MouseListener,
}

impl ReleaseBinding {
    fn detach(self) {
        if let Err(e) = self
            .element
            .remove_event_listener_with_callback("mouseup", self.listener.as_ref().unchecked_ref())
        {
            log::debug!("Could not detach selection listener on page {}: {}", self.page_number, describe_js(&e));
        }
    }
}

struct OverlayMount {
    layer: Element,
    // Kept alive for as long as the layer is mounted
    _listener: MouseListener,
}

/// Owner of every DOM listener the plugin installs
#[derive(Default)]
pub struct ListenerRegistry {
    last_surface_id: Cell<SurfaceId>,
    releases: RefCell<HashMap<SurfaceId, ReleaseBinding>>,
    overlays: RefCell<HashMap<PageNumber, OverlayMount>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable id for `element`, stamped on it as a data attribute
    fn surface_id_for(&self, element: &HtmlElement) -> SurfaceId {
        if let Some(id) = element
            .get_attribute(SURFACE_ID_ATTR)
            .and_then(|raw| raw.parse::<SurfaceId>().ok())
        {
            return id;
        }

        let id = self.last_surface_id.get() + 1;
        self.last_surface_id.set(id);
        if let Err(e) = element.set_attribute(SURFACE_ID_ATTR, &id.to_string()) {
            log::warn!("Could not tag text layer: {}", describe_js(&e));
        }
        id
    }

    /// Install `listener` as the pointer-release handler of `element`
    ///
    /// Drops the element's previous handler, and any handler still bound
    /// to `page_number` through an element that has since been replaced.
    fn bind_release(
        &self,
        surface_id: SurfaceId,
        page_number: PageNumber,
        element: &HtmlElement,
        listener: MouseListener,
    ) -> Result<(), SurfaceError> {
        let mut releases = self.releases.borrow_mut();
        let stale: Vec<SurfaceId> = releases
            .iter()
            .filter(|(id, binding)| **id == surface_id || binding.page_number == page_number)
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            if let Some(old) = releases.remove(&id) {
                old.detach();
            }
        }

        element
            .add_event_listener_with_callback("mouseup", listener.as_ref().unchecked_ref())
            .map_err(dom_error)?;
        releases.insert(
            surface_id,
            ReleaseBinding {
                element: element.clone(),
                page_number,
                listener,
            },
        );
        Ok(())
    }

    /// Record the overlay now mounted for `page_number`, removing the previous one
    fn replace_overlay(&self, page_number: PageNumber, layer: Element, listener: MouseListener) {
        let previous = self.overlays.borrow_mut().insert(
            page_number,
            OverlayMount {
                layer,
                _listener: listener,
            },
        );
        if let Some(previous) = previous {
            previous.layer.remove();
        }
    }

    /// Detach everything (a new document is loading)
    pub fn clear(&self) {
        for (_, binding) in self.releases.borrow_mut().drain() {
            binding.detach();
        }
        for (_, mount) in self.overlays.borrow_mut().drain() {
            mount.layer.remove();
        }
    }
}

/// A rendered text layer
pub struct DomTextLayer {
    element: HtmlElement,
    plugin: Rc<HighlightPlugin>,
    registry: Rc<ListenerRegistry>,
}

impl DomTextLayer {
    pub fn new(element: HtmlElement, plugin: Rc<HighlightPlugin>, registry: Rc<ListenerRegistry>) -> Self {
        Self {
            element,
            plugin,
            registry,
        }
    }

    fn build_layer_element(&self, layer: &OverlayLayer) -> Result<Element, SurfaceError> {
        let document = self.element.owner_document().ok_or(SurfaceError::Detached)?;

        let container = create_div(&document)?;
        container.set_class_name(&layer.class_name);
        container
            .set_attribute(PAGE_NUMBER_ATTR, &layer.page_number.to_string())
            .map_err(dom_error)?;
        for (name, value) in LAYER_STYLE {
            container.style().set_property(name, value).map_err(dom_error)?;
        }

        for region in &layer.regions {
            let element = create_div(&document)?;
            element
                .set_attribute(HIGHLIGHT_ID_ATTR, &region.highlight_id)
                .map_err(dom_error)?;
            element.set_title(&region.title);
            for (name, value) in region.style_properties() {
                element.style().set_property(name, &value).map_err(dom_error)?;
            }
            container.append_child(&element).map_err(dom_error)?;
        }

        Ok(container.into())
    }
}

impl PageSurface for DomTextLayer {
    fn surface_id(&self) -> SurfaceId {
        self.registry.surface_id_for(&self.element)
    }

    fn bind_pointer_release(&self, page_number: PageNumber) -> Result<(), SurfaceError> {
        let plugin = Rc::clone(&self.plugin);
        let element = self.element.clone();
        let listener = MouseListener::new(move |_event: MouseEvent| {
            let selection = read_selection();
            let container = container_rect(&element);
            plugin.handle_pointer_release(page_number, selection.as_ref(), &container);
        });

        self.registry
            .bind_release(self.surface_id(), page_number, &self.element, listener)
    }

    fn mount_overlay(&self, layer: &OverlayLayer) -> Result<(), SurfaceError> {
        let parent = self.element.parent_node().ok_or(SurfaceError::Detached)?;
        let layer_element = self.build_layer_element(layer)?;

        // One delegated listener per layer; regions carry their highlight id
        let plugin = Rc::clone(&self.plugin);
        let listener = MouseListener::new(move |event: MouseEvent| {
            let highlight_id = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.get_attribute(HIGHLIGHT_ID_ATTR));
            if let Some(highlight_id) = highlight_id {
                event.stop_propagation();
                plugin.handle_overlay_click(&highlight_id);
            }
        });
        layer_element
            .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
            .map_err(dom_error)?;

        let next_sibling = self.element.next_sibling();
        parent
            .insert_before(&layer_element, next_sibling.as_ref())
            .map_err(dom_error)?;

        self.registry.replace_overlay(layer.page_number, layer_element, listener);
        Ok(())
    }
}

fn create_div(document: &web_sys::Document) -> Result<HtmlElement, SurfaceError> {
    document
        .create_element("div")
        .map_err(dom_error)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| SurfaceError::Dom("created element is not an HtmlElement".to_string()))
}

fn dom_error(value: JsValue) -> SurfaceError {
    SurfaceError::Dom(describe_js(&value))
}

/// Bounding box of the text layer in viewport pixels
pub fn container_rect(element: &HtmlElement) -> ContainerRect {
    let rect = element.get_bounding_client_rect();
    ContainerRect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

/// Snapshot the document's native selection
///
/// Client rects are only read for a non-collapsed selection with a range.
pub fn read_selection() -> Option<SelectionSnapshot> {
    let selection = web_sys::window()?.get_selection().ok()??;

    let range_count = selection.range_count();
    let is_collapsed = selection.is_collapsed();
    let text: String = selection.to_string().into();

    let client_rects = if range_count > 0 && !is_collapsed {
        selection
            .get_range_at(0)
            .ok()
            .and_then(|range| range.get_client_rects())
            .map(|list| client_rects(&list))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    Some(SelectionSnapshot {
        range_count,
        is_collapsed,
        text,
        client_rects,
    })
}

fn client_rects(list: &DomRectList) -> Vec<ClientRect> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|rect| ClientRect::new(rect.left(), rect.top(), rect.right(), rect.bottom()))
        .collect()
}
