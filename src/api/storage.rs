//! `window.localStorage` backend for the highlight collection

use crate::api::helpers::describe_js;
use crate::errors::PersistenceError;
use crate::store::persistence::KeyValueStorage;

/// Browser local storage
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    /// Open the page's local storage
    pub fn local() -> Result<Self, PersistenceError> {
        let window = web_sys::window().ok_or_else(|| PersistenceError::Storage("No window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| PersistenceError::Storage(describe_js(&e)))?
            .ok_or_else(|| PersistenceError::Storage("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.storage
            .get_item(key)
            .map_err(|e| PersistenceError::Storage(describe_js(&e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PersistenceError::Storage(describe_js(&e)))
    }
}
