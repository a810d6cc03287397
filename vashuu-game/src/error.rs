use crate::audio::AudioError;
use crate::storage::StorageError;

/// Errors surfaced by the flow controller and its collaborators.
///
/// None of them is fatal: callers log and carry on.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Screen \"{0}\" not found")]
    UnknownScreen(String),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid experience config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid experience config: {0}")]
    InvalidConfig(String),
}
