//! Highlight store
//!
//! Ordered, in-memory collection of highlights. Insertion order is the
//! render order, so it is preserved by every operation. The store is only
//! mutated by the host; capture and overlay read it.

pub mod persistence;

use std::collections::HashSet;

use log::debug;
use serde::Serialize;

use crate::errors::StoreError;
use crate::models::{Highlight, HighlightPatch, PageNumber};

/// Serializes as a plain JSON array; loading goes through `persistence`,
/// which re-checks every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HighlightStore {
    highlights: Vec<Highlight>,

    /// Ids of `highlights`, for constant-time duplicate checks
    #[serde(skip)]
    ids: HashSet<String>,
}

impl HighlightStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a highlight
    ///
    /// A duplicate id is rejected and the store is left unchanged, as is a
    /// page number of 0.
    pub fn add(&mut self, highlight: Highlight) -> Result<(), StoreError> {
        if highlight.page_number == 0 {
            return Err(StoreError::InvalidPageNumber(highlight.id));
        }
        if !self.ids.insert(highlight.id.clone()) {
            return Err(StoreError::DuplicateId(highlight.id));
        }
        debug!("adding highlight {} on page {}", highlight.id, highlight.page_number);
        self.highlights.push(highlight);
        Ok(())
    }

    /// Remove the highlight with `id`, keeping the order of the rest
    pub fn remove(&mut self, id: &str) -> Option<Highlight> {
        if !self.ids.remove(id) {
            return None;
        }
        let index = self.highlights.iter().position(|h| h.id == id)?;
        Some(self.highlights.remove(index))
    }

    /// Merge `patch` into the highlight with `id`; returns false when absent
    pub fn update(&mut self, id: &str, patch: HighlightPatch) -> bool {
        match self.highlights.iter_mut().find(|h| h.id == id) {
            Some(highlight) => {
                highlight.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Highlights on `page_number`, in insertion order
    pub fn by_page(&self, page_number: PageNumber) -> impl Iterator<Item = &Highlight> + '_ {
        self.highlights.iter().filter(move |h| h.page_number == page_number)
    }

    pub fn get(&self, id: &str) -> Option<&Highlight> {
        self.highlights.iter().find(|h| h.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Highlight> {
        self.highlights.iter()
    }

    pub fn as_slice(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn len(&self) -> usize {
        self.highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    pub fn clear(&mut self) {
        self.highlights.clear();
        self.ids.clear();
    }

    /// Distinct page numbers that carry at least one highlight, ascending
    pub fn pages(&self) -> Vec<PageNumber> {
        let mut pages: Vec<PageNumber> = self.highlights.iter().map(|h| h.page_number).collect();
        pages.sort_unstable();
        pages.dedup();
        pages
    }
}

impl<'a> IntoIterator for &'a HighlightStore {
    type Item = &'a Highlight;
    type IntoIter = std::slice::Iter<'a, Highlight>;

    fn into_iter(self) -> Self::IntoIter {
        self.highlights.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, RelativeRect};

    fn highlight(id: &str, page: PageNumber) -> Highlight {
        let position = Position::from_rects(vec![RelativeRect::new(0.1, 0.1, 0.2, 0.2).unwrap()]).unwrap();
        Highlight {
            id: id.to_string(),
            text: format!("text {}", id),
            page_number: page,
            position,
            color: "#ffeb3b".to_string(),
            comment: None,
            created_at: 0,
        }
    }

    fn ids<'a>(iter: impl Iterator<Item = &'a Highlight>) -> Vec<&'a str> {
        iter.map(|h| h.id.as_str()).collect()
    }

    #[test]
    fn test_by_page_keeps_insertion_order() {
        let mut store = HighlightStore::new();
        store.add(highlight("a", 2)).unwrap();
        store.add(highlight("b", 1)).unwrap();
        store.add(highlight("c", 2)).unwrap();

        assert_eq!(ids(store.by_page(2)), vec!["a", "c"]);
        assert_eq!(ids(store.by_page(1)), vec!["b"]);
        assert_eq!(store.by_page(3).count(), 0);
        // Pure read: same answer twice
        assert_eq!(ids(store.by_page(2)), vec!["a", "c"]);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut store = HighlightStore::new();
        store.add(highlight("a", 1)).unwrap();

        let err = store.add(highlight("a", 5)).unwrap_err();
        assert_eq!(err, StoreError::DuplicateId("a".to_string()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").map(|h| h.page_number), Some(1));
    }

    #[test]
    fn test_page_zero_is_rejected() {
        let mut store = HighlightStore::new();
        assert!(matches!(store.add(highlight("z", 0)), Err(StoreError::InvalidPageNumber(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_then_remove_restores_content() {
        let mut store = HighlightStore::new();
        store.add(highlight("a", 1)).unwrap();
        store.add(highlight("b", 1)).unwrap();
        let before = store.clone();

        store.add(highlight("x", 3)).unwrap();
        let removed = store.remove("x").unwrap();
        assert_eq!(removed.id, "x");
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = HighlightStore::new();
        store.add(highlight("a", 1)).unwrap();
        store.add(highlight("b", 2)).unwrap();

        assert!(store.remove("x").is_none());
        assert_eq!(ids(store.iter()), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_middle_preserves_order() {
        let mut store = HighlightStore::new();
        for id in ["a", "b", "c", "d"] {
            store.add(highlight(id, 1)).unwrap();
        }
        store.remove("b");
        assert_eq!(ids(store.iter()), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_id_index_follows_remove_and_clear() {
        let mut store = HighlightStore::new();
        store.add(highlight("a", 1)).unwrap();
        store.add(highlight("b", 1)).unwrap();
        assert!(store.contains("a"));

        store.remove("a");
        assert!(!store.contains("a"));
        store.add(highlight("a", 2)).unwrap();
        assert_eq!(ids(store.iter()), vec!["b", "a"]);

        store.clear();
        assert!(!store.contains("b"));
        store.add(highlight("b", 1)).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rejected_page_does_not_reserve_id() {
        let mut store = HighlightStore::new();
        assert!(store.add(highlight("z", 0)).is_err());
        assert!(!store.contains("z"));
        store.add(highlight("z", 4)).unwrap();
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = HighlightStore::new();
        store.add(highlight("a", 1)).unwrap();

        assert!(store.update("a", HighlightPatch::comment("check this")));
        assert_eq!(store.get("a").and_then(|h| h.comment.as_deref()), Some("check this"));
        assert!(!store.update("missing", HighlightPatch::color("#000")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_pages_are_distinct_and_sorted() {
        let mut store = HighlightStore::new();
        store.add(highlight("a", 3)).unwrap();
        store.add(highlight("b", 1)).unwrap();
        store.add(highlight("c", 3)).unwrap();
        assert_eq!(store.pages(), vec![1, 3]);
    }
}
