//! Annotator state management
//!
//! This module contains the AnnotatorState struct, the single owner of the
//! highlight store and the pending-selection slot. Components receive it as
//! a `SharedState` handle rather than reaching for a global.
//!
//! There is exactly one pending selection for the whole document, not one
//! per page: a selection on page 5 replaces a pending one on page 2.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

use crate::models::{Highlight, PendingSelection};
use crate::store::HighlightStore;

/// Shared handle to the state owner (single UI thread)
pub type SharedState = Rc<RefCell<AnnotatorState>>;

/// Complete annotator state
#[derive(Debug, Clone, Default)]
pub struct AnnotatorState {
    /// Committed highlights
    store: HighlightStore,

    /// Most recent uncommitted selection
    pending: Option<PendingSelection>,
}

impl AnnotatorState {
    /// Create a state owner around an existing store
    pub fn new(store: HighlightStore) -> Self {
        Self { store, pending: None }
    }

    /// Wrap into a shared handle
    pub fn into_shared(self) -> SharedState {
        Rc::new(RefCell::new(self))
    }

    pub fn store(&self) -> &HighlightStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut HighlightStore {
        &mut self.store
    }

    /// Replace the whole store (e.g. after loading from storage)
    pub fn replace_store(&mut self, store: HighlightStore) {
        self.store = store;
    }

    /// Get the pending selection (if any)
    pub fn pending(&self) -> Option<&PendingSelection> {
        self.pending.as_ref()
    }

    /// Set the pending selection, replacing any previous one
    pub fn set_pending(&mut self, selection: PendingSelection) {
        self.pending = Some(selection);
    }

    /// Clear the pending selection (abandoned by the host)
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Take the pending selection out of its slot
    pub fn take_pending(&mut self) -> Option<PendingSelection> {
        self.pending.take()
    }

    /// Commit the pending selection as a new highlight
    ///
    /// Clears the slot and returns the stored highlight. Does nothing when no
    /// selection is pending; the slot keeps its selection if the store
    /// rejects it.
    pub fn commit_pending(&mut self, color: &str) -> Option<Highlight> {
        let highlight = self.pending.clone()?.into_highlight(color);

        match self.store.add(highlight.clone()) {
            Ok(()) => {
                self.pending = None;
                debug!("committed pending selection as {}", highlight.id);
                Some(highlight)
            }
            Err(e) => {
                warn!("could not commit pending selection: {}", e);
                None
            }
        }
    }
}
