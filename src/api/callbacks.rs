//! Host callbacks supplied as a plain JavaScript object
//!
//! ```js
//! new PdfHighlighter(options, {
//!   setSelectedText: (text) => ...,
//!   setSelectedPosition: (position) => ...,
//!   setSelectedPageNumber: (n) => ...,
//!   onHighlightClick: (highlight) => ...,
//!   onSelectionFinished: ({ selectedText, pageNumber, position }) => ...,
//! })
//! ```
//!
//! Missing or non-function properties are treated as absent callbacks.

use js_sys::{Function, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::api::helpers::{describe_js, serialize};
use crate::plugin::HighlightCallbacks;

/// Build callbacks from a JS object (`undefined`/`null` gives none)
pub fn callbacks_from_js(value: &JsValue) -> HighlightCallbacks {
    let mut callbacks = HighlightCallbacks::new();
    if value.is_undefined() || value.is_null() {
        return callbacks;
    }

    if let Some(f) = js_function(value, "setSelectedText") {
        callbacks = callbacks.set_selected_text(move |text| invoke(&f, &JsValue::from_str(text)));
    }
    if let Some(f) = js_function(value, "setSelectedPosition") {
        callbacks = callbacks.set_selected_position(move |position| invoke_with(&f, position));
    }
    if let Some(f) = js_function(value, "setSelectedPageNumber") {
        callbacks = callbacks.set_selected_page_number(move |page| invoke(&f, &JsValue::from(page)));
    }
    if let Some(f) = js_function(value, "onHighlightClick") {
        callbacks = callbacks.on_highlight_click(move |highlight| invoke_with(&f, highlight));
    }
    if let Some(f) = js_function(value, "onSelectionFinished") {
        callbacks = callbacks.on_selection_finished(move |selection| invoke_with(&f, selection));
    }
    callbacks
}

fn js_function(object: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(object, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn invoke_with<T: Serialize + ?Sized>(f: &Function, value: &T) {
    // serialize() already logs the failure
    if let Ok(arg) = serialize(value, "Failed to serialize callback argument") {
        invoke(f, &arg);
    }
}

fn invoke(f: &Function, arg: &JsValue) {
    if let Err(e) = f.call1(&JsValue::NULL, arg) {
        log::error!("Host callback threw: {}", describe_js(&e));
    }
}
