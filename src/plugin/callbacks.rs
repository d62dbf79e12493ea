//! Host notifications
//!
//! Every callback is optional; an absent one means that notification is
//! skipped, never an error.

use std::fmt;

use crate::models::{Highlight, PageNumber, PendingSelection, Position};

/// Callbacks the host registers with the plugin
#[derive(Default)]
pub struct HighlightCallbacks {
    set_selected_text: Option<Box<dyn Fn(&str)>>,
    set_selected_position: Option<Box<dyn Fn(&Position)>>,
    set_selected_page_number: Option<Box<dyn Fn(PageNumber)>>,
    on_highlight_click: Option<Box<dyn Fn(&Highlight)>>,
    on_selection_finished: Option<Box<dyn Fn(&PendingSelection)>>,
}

impl HighlightCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_selected_text(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.set_selected_text = Some(Box::new(f));
        self
    }

    pub fn set_selected_position(mut self, f: impl Fn(&Position) + 'static) -> Self {
        self.set_selected_position = Some(Box::new(f));
        self
    }

    pub fn set_selected_page_number(mut self, f: impl Fn(PageNumber) + 'static) -> Self {
        self.set_selected_page_number = Some(Box::new(f));
        self
    }

    pub fn on_highlight_click(mut self, f: impl Fn(&Highlight) + 'static) -> Self {
        self.on_highlight_click = Some(Box::new(f));
        self
    }

    pub fn on_selection_finished(mut self, f: impl Fn(&PendingSelection) + 'static) -> Self {
        self.on_selection_finished = Some(Box::new(f));
        self
    }

    /// Announce a new pending selection
    ///
    /// Order: text, position, page number, then the combined notification.
    pub fn notify_selection(&self, selection: &PendingSelection) {
        if let Some(f) = &self.set_selected_text {
            f(&selection.selected_text);
        }
        if let Some(f) = &self.set_selected_position {
            f(&selection.position);
        }
        if let Some(f) = &self.set_selected_page_number {
            f(selection.page_number);
        }
        if let Some(f) = &self.on_selection_finished {
            f(selection);
        }
    }

    /// Announce a click on an overlay region
    pub fn notify_highlight_click(&self, highlight: &Highlight) {
        if let Some(f) = &self.on_highlight_click {
            f(highlight);
        }
    }
}

impl fmt::Debug for HighlightCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightCallbacks")
            .field("set_selected_text", &self.set_selected_text.is_some())
            .field("set_selected_position", &self.set_selected_position.is_some())
            .field("set_selected_page_number", &self.set_selected_page_number.is_some())
            .field("on_highlight_click", &self.on_highlight_click.is_some())
            .field("on_selection_finished", &self.on_selection_finished.is_some())
            .finish()
    }
}
