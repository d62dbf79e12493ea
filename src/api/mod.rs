//! PDF Highlighter WASM API
//!
//! The JavaScript-facing side of the crate. Everything here adapts browser
//! objects (text-layer elements, the native selection, `localStorage`,
//! callback objects) to the core traits; no highlight logic lives here.
//!
//! # Module Structure
//!
//! - `helpers`: serialization and error conversion at the JS boundary
//! - `callbacks`: host callback object -> `HighlightCallbacks`
//! - `dom`: text-layer surface, selection reading, listener ownership
//! - `storage`: `localStorage` backend
//! - `highlighter`: the exported `PdfHighlighter` class

pub mod callbacks;
pub mod dom;
pub mod helpers;
pub mod highlighter;
pub mod storage;

pub use highlighter::PdfHighlighter;
