//! `localStorage` backing for the experience stores.

use vashuu_game::{KeyValueStore, StorageError};

use crate::dom::{js_error_message, local_storage};

/// [`KeyValueStore`] over the browser's `localStorage`.
///
/// Every call re-resolves the storage handle so a page with storage disabled
/// keeps working; reads fall back to "nothing stored" and writes report
/// failure to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage =
            local_storage().map_err(|err| StorageError::Unavailable(js_error_message(&err)))?;
        storage
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(js_error_message(&err)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage =
            local_storage().map_err(|err| StorageError::Unavailable(js_error_message(&err)))?;
        storage
            .set_item(key, value)
            .map_err(|err| StorageError::WriteRejected {
                key: key.to_string(),
                reason: js_error_message(&err),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let storage =
            local_storage().map_err(|err| StorageError::Unavailable(js_error_message(&err)))?;
        storage
            .remove_item(key)
            .map_err(|err| StorageError::Unavailable(js_error_message(&err)))
    }
}
