//! Append-only progress log persisted as one JSON document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{EXPORT_FILE_PREFIX, PROGRESS_KEY};
use crate::storage::{KeyValueStore, StorageError};

/// Free-form step fields (`{"step": 2, "answer": "..."}`).
pub type StepFields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepEvent {
    #[serde(flatten)]
    pub fields: StepFields,
    pub timestamp: u64,
}

impl StepEvent {
    /// Numeric `step` field, when present.
    #[must_use]
    pub fn step(&self) -> Option<u64> {
        self.fields.get("step").and_then(Value::as_u64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub steps: Vec<StepEvent>,
    pub final_revealed: bool,
}

/// A document ready to be handed to the platform as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Build step fields from a `json!` object literal. Non-object values yield
/// an empty map.
#[must_use]
pub fn step_fields(value: Value) -> StepFields {
    match value {
        Value::Object(map) => map,
        _ => StepFields::new(),
    }
}

#[derive(Debug, Clone)]
pub struct ProgressStore<S> {
    store: S,
}

impl<S: KeyValueStore> ProgressStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Append `fields` stamped with `now_ms` and write the whole record back.
    /// Timestamps are clamped so the log never goes backwards. Returns `false`
    /// when storage fails.
    pub fn append(&self, mut fields: StepFields, now_ms: u64) -> bool {
        fields.remove("timestamp");
        let mut progress = self.load().unwrap_or_default();
        let floor = progress.steps.last().map_or(0, |last| last.timestamp);
        progress.steps.push(StepEvent {
            fields,
            timestamp: now_ms.max(floor),
        });
        match self.write(&progress) {
            Ok(()) => true,
            Err(err) => {
                log::error!("Failed to save progress: {err}");
                false
            }
        }
    }

    /// Stored progress, or `None` when absent, corrupt or unreadable.
    #[must_use]
    pub fn load(&self) -> Option<ProgressRecord> {
        let raw = match self.store.get_item(PROGRESS_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                log::error!("Failed to load progress: {err}");
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|err| log::error!("Failed to load progress: {err}"))
            .ok()
    }

    /// Flag the final message as revealed. No-op without stored progress.
    pub fn mark_final_revealed(&self) -> bool {
        let Some(mut progress) = self.load() else {
            return false;
        };
        progress.final_revealed = true;
        self.write(&progress)
            .map_err(|err| log::error!("Failed to save progress: {err}"))
            .is_ok()
    }

    /// Pretty-printed export named after `now_ms`; `None` without progress.
    #[must_use]
    pub fn export(&self, now_ms: u64) -> Option<ExportDocument> {
        let progress = self.load()?;
        let contents = serde_json::to_string_pretty(&progress)
            .map_err(|err| log::error!("Failed to export progress: {err}"))
            .ok()?;
        Some(ExportDocument {
            filename: format!("{EXPORT_FILE_PREFIX}{now_ms}.json"),
            mime_type: "application/json",
            contents,
        })
    }

    fn write(&self, progress: &ProgressRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string(progress)?;
        self.store.set_item(PROGRESS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::storage::test_support::BrokenStore;
    use serde_json::json;

    #[test]
    fn append_initializes_and_preserves_order() {
        let progress = ProgressStore::new(MemoryStore::new());
        assert!(progress.load().is_none());

        assert!(progress.append(step_fields(json!({"step": 1, "name": "queen"})), 1_000));
        assert!(progress.append(step_fields(json!({"step": 2, "answer": "melt"})), 2_000));

        let record = progress.load().unwrap();
        assert!(!record.final_revealed);
        let steps: Vec<_> = record.steps.iter().filter_map(StepEvent::step).collect();
        assert_eq!(steps, vec![1, 2]);
        assert_eq!(record.steps[1].fields["answer"], json!("melt"));
    }

    #[test]
    fn timestamps_never_decrease() {
        let progress = ProgressStore::new(MemoryStore::new());
        progress.append(step_fields(json!({"step": 1})), 5_000);
        progress.append(step_fields(json!({"step": 2})), 4_000);
        let record = progress.load().unwrap();
        assert_eq!(record.steps[0].timestamp, 5_000);
        assert_eq!(record.steps[1].timestamp, 5_000);
    }

    #[test]
    fn caller_timestamp_field_is_replaced() {
        let progress = ProgressStore::new(MemoryStore::new());
        progress.append(step_fields(json!({"step": 3, "timestamp": 1})), 42);
        let record = progress.load().unwrap();
        assert_eq!(record.steps[0].timestamp, 42);
        assert!(!record.steps[0].fields.contains_key("timestamp"));
    }

    #[test]
    fn stored_layout_is_flat() {
        let store = MemoryStore::new();
        let progress = ProgressStore::new(store.clone());
        progress.append(step_fields(json!({"step": 1})), 7);
        let raw: Value = serde_json::from_str(&store.raw(PROGRESS_KEY).unwrap()).unwrap();
        assert_eq!(
            raw,
            json!({"steps": [{"step": 1, "timestamp": 7}], "finalRevealed": false})
        );
    }

    #[test]
    fn mark_final_revealed_requires_progress() {
        let progress = ProgressStore::new(MemoryStore::new());
        assert!(!progress.mark_final_revealed());
        progress.append(step_fields(json!({"step": 1})), 1);
        assert!(progress.mark_final_revealed());
        assert!(progress.load().unwrap().final_revealed);
    }

    #[test]
    fn export_is_noop_without_progress() {
        let progress = ProgressStore::new(MemoryStore::new());
        assert!(progress.export(99).is_none());
        progress.append(step_fields(json!({"step": 1})), 1);
        let doc = progress.export(1_700_000_000_000).unwrap();
        assert_eq!(doc.filename, "vashuu_progress_1700000000000.json");
        assert_eq!(doc.mime_type, "application/json");
        assert!(doc.contents.contains("\n  \"steps\""));
    }

    #[test]
    fn corrupt_and_failing_storage_degrade_quietly() {
        let store = MemoryStore::new();
        store.set_item(PROGRESS_KEY, "[oops").unwrap();
        assert!(ProgressStore::new(store).load().is_none());

        let broken = ProgressStore::new(BrokenStore);
        assert!(!broken.append(step_fields(json!({"step": 1})), 1));
        assert!(broken.load().is_none());
        assert!(broken.export(1).is_none());
    }

    #[test]
    fn step_fields_ignores_non_objects() {
        assert!(step_fields(json!([1, 2])).is_empty());
    }
}
