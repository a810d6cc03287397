//! For Vashuu experience engine
//!
//! Platform-agnostic core of the "For Vashuu" quiz experience: answer
//! validation, local persistence, text reveal, music fades, decorative effect
//! triggers, screen navigation, the catch mini-game and the controller tying
//! them together. No DOM, no real clock; the platform drives [`Experience`].

pub mod answers;
pub mod audio;
pub mod catch_game;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod decor;
pub mod error;
pub mod flow;
pub mod numbers;
pub mod progress;
pub mod reveal;
pub mod screens;
pub mod script;
pub mod storage;
pub mod timeline;

// Re-export commonly used types
pub use answers::{Question, normalize};
pub use audio::{AudioCommand, AudioError, AudioFader, FadeDirection};
pub use catch_game::{Arena, CatchConfig, CatchPhase, CatchSession, GameReport, Point, Target};
pub use config::{ExperienceConfig, Prompt};
pub use credentials::{CredentialRecord, CredentialStore, encode_password};
pub use decor::{
    AmbientSpec, Burst, Cadence, Decor, Particle, ParticleField, ParticleKind, Renderer, Spark,
    VectorAnimation, VectorOptions, VectorSlot,
};
pub use error::FlowError;
pub use flow::{
    Command, Commands, Experience, FinalView, Input, QuestionView, Step, Tally, Wake,
};
pub use progress::{ExportDocument, ProgressRecord, ProgressStore, StepEvent, StepFields};
pub use reveal::{RevealSlot, RevealState, Reveals};
pub use screens::{InputId, Navigator, ScreenId};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use timeline::{TimerId, Timeline};
