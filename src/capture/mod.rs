//! Selection capture
//!
//! Turns a pointer-release over a text layer into a pending selection. It
//! never creates a highlight: committing is an explicit host action, so
//! incidental selections (copying text, say) do not spam the store.
//!
//! A plain click leaves a collapsed selection behind and is rejected by the
//! second precondition, so it never disturbs the pending slot.

use std::rc::Rc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::GeometryError;
use crate::geometry::normalize_selection;
use crate::models::{ClientRect, ContainerRect, PageNumber, PendingSelection, SharedState};
use crate::plugin::callbacks::HighlightCallbacks;

/// What the browser reported about the native selection at pointer-release
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    /// `Selection.rangeCount`
    pub range_count: u32,

    /// `Selection.isCollapsed`
    pub is_collapsed: bool,

    /// `Selection.toString()`, untrimmed
    pub text: String,

    /// Client rects of the first range
    pub client_rects: Vec<ClientRect>,
}

/// Why a pointer-release did not produce a pending selection
#[derive(Debug, Clone, PartialEq)]
pub enum AbortReason {
    /// Page numbers are 1-based
    InvalidPage,
    NoSelection,
    Collapsed,
    EmptyText,
    NoRects,
    Geometry(GeometryError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Captured(PendingSelection),
    Aborted(AbortReason),
}

impl CaptureOutcome {
    pub fn is_captured(&self) -> bool {
        matches!(self, CaptureOutcome::Captured(_))
    }
}

/// Run the precondition checks in order and normalize the geometry
pub fn evaluate_selection(
    selection: Option<&SelectionSnapshot>,
    page_number: PageNumber,
    container: &ContainerRect,
) -> Result<PendingSelection, AbortReason> {
    if page_number == 0 {
        return Err(AbortReason::InvalidPage);
    }
    let selection = match selection {
        Some(s) if s.range_count > 0 => s,
        _ => return Err(AbortReason::NoSelection),
    };
    if selection.is_collapsed {
        return Err(AbortReason::Collapsed);
    }

    let selected_text = selection.text.trim();
    if selected_text.is_empty() {
        return Err(AbortReason::EmptyText);
    }
    if selection.client_rects.is_empty() {
        return Err(AbortReason::NoRects);
    }

    let position = normalize_selection(&selection.client_rects, container).map_err(AbortReason::Geometry)?;

    Ok(PendingSelection {
        selected_text: selected_text.to_string(),
        page_number,
        position,
    })
}

/// Writes captured selections into the state owner and notifies the host
#[derive(Debug, Clone)]
pub struct SelectionCapture {
    state: SharedState,
    callbacks: Rc<HighlightCallbacks>,
}

impl SelectionCapture {
    pub fn new(state: SharedState, callbacks: Rc<HighlightCallbacks>) -> Self {
        Self { state, callbacks }
    }

    /// Handle a pointer-release on the text layer of `page_number`
    pub fn handle_pointer_release(
        &self,
        selection: Option<&SelectionSnapshot>,
        page_number: PageNumber,
        container: &ContainerRect,
    ) -> CaptureOutcome {
        match evaluate_selection(selection, page_number, container) {
            Ok(pending) => {
                self.state.borrow_mut().set_pending(pending.clone());
                // State borrow is released: callbacks may call back into it
                self.callbacks.notify_selection(&pending);
                debug!(
                    "captured selection on page {} ({} rects)",
                    page_number,
                    pending.position.rects().len()
                );
                CaptureOutcome::Captured(pending)
            }
            Err(reason) => {
                debug!("selection capture aborted on page {}: {:?}", page_number, reason);
                CaptureOutcome::Aborted(reason)
            }
        }
    }
}
