//! WASM API test
//!
//! Exercises `PdfHighlighter` against a real DOM. Run with
//! `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use pdf_highlight_wasm::PdfHighlighter;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Event, HtmlElement, MouseEvent, MouseEventInit};

wasm_bindgen_test_configure!(run_in_browser);

const RECORD: &str = r##"{
    "id": "highlight-fixed",
    "text": "pinned",
    "pageNumber": 1,
    "position": {
        "boundingRect": {"x1": 0.1, "y1": 0.1, "x2": 0.35, "y2": 0.3, "width": 0.25, "height": 0.2},
        "rects": [{"x1": 0.1, "y1": 0.1, "x2": 0.35, "y2": 0.3, "width": 0.25, "height": 0.2}]
    },
    "color": "#ffeb3b",
    "createdAt": 1700000000000
}"##;

fn record() -> JsValue {
    js_sys::JSON::parse(RECORD).unwrap()
}

fn text_layer() -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let page = document.create_element("div").unwrap();
    let layer = document.create_element("div").unwrap();
    page.append_child(&layer).unwrap();
    document.body().unwrap().append_child(&page).unwrap();
    layer.dyn_into::<HtmlElement>().unwrap()
}

fn sized_text_layer(text: &str) -> HtmlElement {
    let layer = text_layer();
    layer.set_text_content(Some(text));
    layer.style().set_property("width", "200px").unwrap();
    layer.style().set_property("height", "100px").unwrap();
    layer
}

/// Callback object whose functions push their argument onto `sink`
fn recording_callbacks(names: &[&str], sink: &Array) -> (JsValue, Vec<Closure<dyn Fn(JsValue)>>) {
    let callbacks = Object::new();
    let mut closures = Vec::new();
    for name in names {
        let sink = sink.clone();
        let tag = name.to_string();
        let closure = Closure::<dyn Fn(JsValue)>::new(move |value: JsValue| {
            let entry = Array::of2(&JsValue::from_str(&tag), &value);
            sink.push(&entry);
        });
        Reflect::set(&callbacks, &JsValue::from_str(name), closure.as_ref()).unwrap();
        closures.push(closure);
    }
    (callbacks.into(), closures)
}

/// Arguments recorded for callback `name`
fn recorded(sink: &Array, name: &str) -> Vec<JsValue> {
    sink.iter()
        .map(|entry| Array::from(&entry))
        .filter(|entry| entry.get(0).as_string().as_deref() == Some(name))
        .map(|entry| entry.get(1))
        .collect()
}

fn overlay_count(layer: &HtmlElement) -> u32 {
    layer
        .parent_element()
        .unwrap()
        .query_selector_all(".highlight-layer")
        .unwrap()
        .length()
}

#[wasm_bindgen_test]
fn test_highlighter_creation_with_defaults() {
    let highlighter = PdfHighlighter::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    assert!(highlighter.pending_selection().unwrap().is_null());
}

#[wasm_bindgen_test]
fn test_add_and_list_highlights() {
    let highlighter = PdfHighlighter::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    highlighter.add_highlight(record()).unwrap();

    // Same id again is rejected
    assert!(highlighter.add_highlight(record()).is_err());

    let all: js_sys::Array = highlighter.highlights().unwrap().dyn_into().unwrap();
    assert_eq!(all.length(), 1);
    let page_two: js_sys::Array = highlighter.highlights_for_page(2).unwrap().dyn_into().unwrap();
    assert_eq!(page_two.length(), 0);

    assert!(highlighter.remove_highlight("highlight-fixed"));
    assert!(!highlighter.remove_highlight("highlight-fixed"));
}

#[wasm_bindgen_test]
fn test_render_mounts_single_overlay_per_page() {
    let highlighter = PdfHighlighter::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    highlighter.add_highlight(record()).unwrap();
    let layer = text_layer();

    highlighter.on_document_load();
    highlighter.on_text_layer_render(0, layer.clone().into());
    highlighter.on_text_layer_render(0, layer.clone().into());

    assert_eq!(overlay_count(&layer), 1);
    let region = layer
        .parent_element()
        .unwrap()
        .query_selector("[data-highlight-id=\"highlight-fixed\"]")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    assert_eq!(region.style().get_property_value("left").unwrap(), "10%");
}

#[wasm_bindgen_test]
fn test_document_load_removes_overlays() {
    let highlighter = PdfHighlighter::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    let layer = text_layer();

    highlighter.on_text_layer_render(0, layer.clone().into());
    assert_eq!(overlay_count(&layer), 1);

    highlighter.on_document_load();
    assert_eq!(overlay_count(&layer), 0);
}

#[wasm_bindgen_test]
fn test_non_element_text_layer_is_ignored() {
    let highlighter = PdfHighlighter::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    highlighter.on_text_layer_render(0, JsValue::NULL);
}

#[wasm_bindgen_test]
fn test_commit_without_pending_returns_null() {
    let highlighter = PdfHighlighter::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
    assert!(highlighter.commit_pending_selection(None).unwrap().is_null());
}

#[wasm_bindgen_test]
fn test_storage_round_trip() {
    let options = js_sys::JSON::parse(r#"{"storageKey": "pdfHighlightsTest"}"#).unwrap();
    let highlighter = PdfHighlighter::new(options.clone(), JsValue::UNDEFINED).unwrap();
    highlighter.add_highlight(record()).unwrap();
    highlighter.save_to_storage().unwrap();

    let restored = PdfHighlighter::new(options, JsValue::UNDEFINED).unwrap();
    assert_eq!(restored.load_from_storage().unwrap(), 1);
}

#[wasm_bindgen_test]
fn test_click_reaches_host_callback() {
    let clicked = js_sys::Array::new();
    let callbacks = js_sys::Object::new();
    let sink = clicked.clone();
    let on_click = Closure::<dyn Fn(JsValue)>::new(move |highlight: JsValue| {
        sink.push(&highlight);
    });
    js_sys::Reflect::set(&callbacks, &"onHighlightClick".into(), on_click.as_ref()).unwrap();

    let highlighter = PdfHighlighter::new(JsValue::UNDEFINED, callbacks.into()).unwrap();
    highlighter.add_highlight(record()).unwrap();

    assert!(highlighter.handle_overlay_click("highlight-fixed"));
    assert!(!highlighter.handle_overlay_click("highlight-missing"));
    assert_eq!(clicked.length(), 1);
}

#[wasm_bindgen_test]
fn test_region_click_reaches_host_and_stops_there() {
    let sink = Array::new();
    let (callbacks, _closures) = recording_callbacks(&["onHighlightClick"], &sink);
    let highlighter = PdfHighlighter::new(JsValue::UNDEFINED, callbacks).unwrap();
    highlighter.add_highlight(record()).unwrap();

    let layer = text_layer();
    highlighter.on_text_layer_render(0, layer.clone().into());

    let page = layer.parent_element().unwrap();
    let page_clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&page_clicks);
    let page_listener = Closure::<dyn FnMut(Event)>::new(move |_event: Event| counter.set(counter.get() + 1));
    page.add_event_listener_with_callback("click", page_listener.as_ref().unchecked_ref())
        .unwrap();

    let region = page
        .query_selector("[data-highlight-id=\"highlight-fixed\"]")
        .unwrap()
        .unwrap();
    let init = MouseEventInit::new();
    init.set_bubbles(true);
    let click = MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
    region.dispatch_event(&click).unwrap();

    let clicked = recorded(&sink, "onHighlightClick");
    assert_eq!(clicked.len(), 1);
    let id = Reflect::get(&clicked[0], &"id".into()).unwrap();
    assert_eq!(id.as_string().as_deref(), Some("highlight-fixed"));
    assert_eq!(page_clicks.get(), 0);
}

#[wasm_bindgen_test]
fn test_mouseup_over_selected_text_captures_selection() {
    let sink = Array::new();
    let (callbacks, _closures) = recording_callbacks(
        &["setSelectedText", "setSelectedPageNumber", "onSelectionFinished"],
        &sink,
    );
    let highlighter = PdfHighlighter::new(JsValue::UNDEFINED, callbacks).unwrap();
    let layer = sized_text_layer("quick brown fox");
    highlighter.on_document_load();
    highlighter.on_text_layer_render(1, layer.clone().into());

    let document = web_sys::window().unwrap().document().unwrap();
    let range = document.create_range().unwrap();
    range.select_node_contents(&layer).unwrap();
    let selection = web_sys::window().unwrap().get_selection().unwrap().unwrap();
    selection.remove_all_ranges().unwrap();
    selection.add_range(&range).unwrap();

    layer.dispatch_event(&MouseEvent::new("mouseup").unwrap()).unwrap();
    selection.remove_all_ranges().unwrap();

    let pending = highlighter.pending_selection().unwrap();
    assert!(!pending.is_null());
    let text = Reflect::get(&pending, &"selectedText".into()).unwrap();
    assert_eq!(text.as_string().as_deref(), Some("quick brown fox"));
    let page = Reflect::get(&pending, &"pageNumber".into()).unwrap();
    assert_eq!(page.as_f64(), Some(2.0));

    assert_eq!(recorded(&sink, "setSelectedText")[0].as_string().as_deref(), Some("quick brown fox"));
    assert_eq!(recorded(&sink, "setSelectedPageNumber")[0].as_f64(), Some(2.0));
    assert_eq!(recorded(&sink, "onSelectionFinished").len(), 1);
}

#[wasm_bindgen_test]
fn test_mouseup_without_selection_keeps_slot_empty() {
    let sink = Array::new();
    let (callbacks, _closures) = recording_callbacks(&["onSelectionFinished"], &sink);
    let highlighter = PdfHighlighter::new(JsValue::UNDEFINED, callbacks).unwrap();
    let layer = sized_text_layer("nothing selected");
    highlighter.on_text_layer_render(0, layer.clone().into());

    web_sys::window().unwrap().get_selection().unwrap().unwrap().remove_all_ranges().unwrap();
    layer.dispatch_event(&MouseEvent::new("mouseup").unwrap()).unwrap();

    assert!(highlighter.pending_selection().unwrap().is_null());
    assert!(recorded(&sink, "onSelectionFinished").is_empty());
}
