//! Loading and saving the highlight collection
//!
//! The whole collection lives under one key as a JSON array of highlight
//! records, with no version field. Loading is defensive: a payload that is
//! not an array yields an empty store, and individual records that fail to
//! decode are skipped.

use std::cell::RefCell;
use std::collections::HashMap;

use log::{error, info, warn};

use super::HighlightStore;
use crate::errors::PersistenceError;
use crate::models::Highlight;

/// Key the collection is stored under
pub const STORAGE_KEY: &str = "pdfHighlights";

/// A string key-value backend (`localStorage` in the browser)
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// In-memory backend, for native hosts and tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key with a raw payload
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.items.borrow_mut().insert(key.to_string(), value.to_string());
        storage
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Serialize the whole collection to its JSON array form
pub fn to_json(store: &HighlightStore) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(store)?)
}

/// Decode a stored payload
///
/// Fails only when the payload is not a JSON array. Records inside the
/// array that cannot be decoded, or that the store rejects, are skipped
/// with a warning.
pub fn from_json(payload: &str) -> Result<HighlightStore, PersistenceError> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(payload).map_err(|e| PersistenceError::Malformed(e.to_string()))?;

    let mut store = HighlightStore::new();
    for (index, record) in records.into_iter().enumerate() {
        let highlight: Highlight = match serde_json::from_value(record) {
            Ok(highlight) => highlight,
            Err(e) => {
                warn!("skipping stored highlight #{}: {}", index, e);
                continue;
            }
        };
        if let Err(e) = store.add(highlight) {
            warn!("skipping stored highlight #{}: {}", index, e);
        }
    }
    Ok(store)
}

/// Load the collection from `storage`
///
/// Never fails: a missing key, an unreadable backend, or a malformed
/// payload all produce an empty store (the latter two are logged).
pub fn load_highlights(storage: &dyn KeyValueStorage, key: &str) -> HighlightStore {
    let payload = match storage.get_item(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => return HighlightStore::new(),
        Err(e) => {
            error!("Failed to read saved highlights: {}", e);
            return HighlightStore::new();
        }
    };

    match from_json(&payload) {
        Ok(store) => {
            info!("loaded {} saved highlights", store.len());
            store
        }
        Err(e) => {
            error!("Failed to parse saved highlights: {}", e);
            HighlightStore::new()
        }
    }
}

/// Write the whole collection to `storage`
pub fn save_highlights(
    storage: &dyn KeyValueStorage,
    key: &str,
    store: &HighlightStore,
) -> Result<(), PersistenceError> {
    let payload = to_json(store)?;
    storage.set_item(key, &payload)?;
    info!("saved {} highlights", store.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position, RelativeRect};

    const VALID_RECORD: &str = r##"{
        "id": "highlight-1",
        "text": "first",
        "pageNumber": 1,
        "position": {
            "boundingRect": {"x1":0.1,"y1":0.1,"x2":0.3,"y2":0.2,"width":0.2,"height":0.1},
            "rects": [{"x1":0.1,"y1":0.1,"x2":0.3,"y2":0.2,"width":0.2,"height":0.1}]
        },
        "color": "#ffeb3b",
        "createdAt": 1700000000000
    }"##;

    struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
            Err(PersistenceError::Storage("quota".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Storage("quota".to_string()))
        }
    }

    #[test]
    fn test_missing_key_loads_empty() {
        let storage = MemoryStorage::new();
        assert!(load_highlights(&storage, STORAGE_KEY).is_empty());
    }

    #[test]
    fn test_non_array_payload_loads_empty() {
        for payload in [r#"{"id":"x"}"#, "42", "not json at all", ""] {
            let storage = MemoryStorage::with_item(STORAGE_KEY, payload);
            assert!(load_highlights(&storage, STORAGE_KEY).is_empty(), "payload {:?}", payload);
        }
        assert!(matches!(from_json("{}"), Err(PersistenceError::Malformed(_))));
    }

    #[test]
    fn test_unreadable_backend_loads_empty() {
        assert!(load_highlights(&FailingStorage, STORAGE_KEY).is_empty());
    }

    #[test]
    fn test_broken_records_are_skipped() {
        let payload = format!(
            r#"[{valid}, {{"id":"no-position","text":"x","pageNumber":1}}, {{"id":"page-zero","text":"x","pageNumber":0,
                "position":{{"boundingRect":{{"x1":0,"y1":0,"x2":0.1,"y2":0.1}},"rects":[{{"x1":0,"y1":0,"x2":0.1,"y2":0.1}}]}}}}, {valid}]"#,
            valid = VALID_RECORD
        );
        let store = from_json(&payload).unwrap();
        // Only the first copy of the valid record survives; the second is a duplicate id
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("highlight-1").map(|h| h.created_at), Some(1_700_000_000_000));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let mut store = HighlightStore::new();
        let position = Position::from_rects(vec![
            RelativeRect::new(0.1, 0.1, 0.5, 0.15).unwrap(),
            RelativeRect::new(0.05, 0.15, 0.3, 0.2).unwrap(),
        ])
        .unwrap();
        let mut h = Highlight::new("two lines", 7, position, "#00ff00");
        h.comment = Some("remember".to_string());
        store.add(h).unwrap();

        let storage = MemoryStorage::new();
        save_highlights(&storage, STORAGE_KEY, &store).unwrap();

        let raw = storage.get_item(STORAGE_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"pageNumber\":7"));

        assert_eq!(load_highlights(&storage, STORAGE_KEY), store);
    }

    #[test]
    fn test_save_reports_backend_failure() {
        let store = HighlightStore::new();
        assert!(matches!(
            save_highlights(&FailingStorage, STORAGE_KEY, &store),
            Err(PersistenceError::Storage(_))
        ));
    }
}
