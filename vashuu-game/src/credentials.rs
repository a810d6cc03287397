//! Single-slot local credential record.
//!
//! The password "hash" is a reversible base64 encoding. It only keeps the
//! plaintext out of casual view; it is not a security boundary.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_NICKNAME, DEFAULT_PASSWORD, USER_KEY};
use crate::storage::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub nickname: String,
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<u64>,
}

impl CredentialRecord {
    /// Record used when nothing has been saved yet.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            nickname: DEFAULT_NICKNAME.to_string(),
            password_hash: encode_password(DEFAULT_PASSWORD),
            created_at: None,
        }
    }
}

/// Reversible encoding of a password (standard base64 of its UTF-8 bytes).
#[must_use]
pub fn encode_password(password: &str) -> String {
    STANDARD.encode(password.as_bytes())
}

#[derive(Debug, Clone)]
pub struct CredentialStore<S> {
    store: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Overwrite the stored record. Empty fields fall back to the defaults.
    /// Returns `false` when the storage rejects the write.
    pub fn save(&self, nickname: &str, password: &str, now_ms: u64) -> bool {
        let nickname = if nickname.is_empty() {
            DEFAULT_NICKNAME
        } else {
            nickname
        };
        let password = if password.is_empty() {
            DEFAULT_PASSWORD
        } else {
            password
        };
        let record = CredentialRecord {
            nickname: nickname.to_string(),
            password_hash: encode_password(password),
            created_at: Some(now_ms),
        };
        let result = serde_json::to_string(&record)
            .map_err(crate::storage::StorageError::from)
            .and_then(|json| self.store.set_item(USER_KEY, &json));
        match result {
            Ok(()) => true,
            Err(err) => {
                log::error!("Failed to save user: {err}");
                false
            }
        }
    }

    /// Stored record, the fallback when absent, `None` when storage access
    /// fails or the stored value is corrupt.
    #[must_use]
    pub fn load(&self) -> Option<CredentialRecord> {
        match self.store.get_item(USER_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(record) => Some(record),
                Err(err) => {
                    log::error!("Failed to load user: {err}");
                    None
                }
            },
            Ok(None) => Some(CredentialRecord::fallback()),
            Err(err) => {
                log::error!("Failed to load user: {err}");
                None
            }
        }
    }

    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        self.load()
            .is_some_and(|record| record.password_hash == encode_password(candidate))
    }

    /// Nickname to greet with; the default when storage is unreadable.
    #[must_use]
    pub fn nickname(&self) -> String {
        self.load()
            .map_or_else(|| DEFAULT_NICKNAME.to_string(), |record| record.nickname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::storage::test_support::BrokenStore;

    #[test]
    fn load_without_save_returns_default_pair() {
        let creds = CredentialStore::new(MemoryStore::new());
        let record = creds.load().expect("fallback record");
        assert_eq!(record.nickname, "vashuu");
        assert_eq!(record.password_hash, encode_password("1410"));
        assert!(creds.verify("1410"));
        assert!(!creds.verify("0000"));
    }

    #[test]
    fn encoding_matches_browser_btoa_for_ascii() {
        assert_eq!(encode_password("1410"), "MTQxMA==");
        assert_eq!(encode_password("queen"), "cXVlZW4=");
    }

    #[test]
    fn save_overwrites_single_slot() {
        let store = MemoryStore::new();
        let creds = CredentialStore::new(store.clone());
        assert!(creds.save("pookie", "sunflower", 10));
        assert!(creds.save("princess", "rose", 20));
        assert_eq!(store.len(), 1);

        let record = creds.load().unwrap();
        assert_eq!(record.nickname, "princess");
        assert_eq!(record.created_at, Some(20));
        assert!(creds.verify("rose"));
        assert!(!creds.verify("sunflower"));

        let raw = store.raw(USER_KEY).unwrap();
        assert!(raw.contains("\"passwordHash\""));
        assert!(raw.contains("\"createdAt\":20"));
    }

    #[test]
    fn empty_fields_fall_back_to_defaults() {
        let creds = CredentialStore::new(MemoryStore::new());
        assert!(creds.save("", "", 5));
        let record = creds.load().unwrap();
        assert_eq!(record.nickname, "vashuu");
        assert!(creds.verify("1410"));
    }

    #[test]
    fn storage_failures_are_reported_not_thrown() {
        let creds = CredentialStore::new(BrokenStore);
        assert!(!creds.save("x", "y", 1));
        assert!(creds.load().is_none());
        assert!(!creds.verify("1410"));
        assert_eq!(creds.nickname(), "vashuu");
    }

    #[test]
    fn corrupt_record_reads_as_failure() {
        let store = MemoryStore::new();
        store.set_item(USER_KEY, "{not json").unwrap();
        let creds = CredentialStore::new(store);
        assert!(creds.load().is_none());
    }
}
