//! Tunable experience data: timings, music, catch game, assets and copy.
//!
//! Every section has a compiled-in default. The shipped values live in
//! `vashuu-web/static/assets/data/experience.json`; partial documents fill the
//! gaps from the defaults.

use serde::{Deserialize, Serialize};

use crate::catch_game::CatchConfig;
use crate::constants::{
    FADE_IN_MS, FADE_OUT_MS, FINAL_REVEAL_CHAR_MS, FOCUS_DELAY_MS, GAME_SETTLE_MS, LANDING_VOLUME,
    MUSIC_RETRY_DELAY_MS, MUSIC_START_DELAY_MS, MUSIC_TRACK, Q3_SETTLE_MS, Q4_SETTLE_MS,
    REVEAL_CHAR_MS, SHAKE_MS, TOGGLE_VOLUME, UNLOCK_HOLD_MS,
};
use crate::decor::AmbientSpec;
use crate::error::FlowError;

const DEFAULT_EXPERIENCE_DATA: &str =
    include_str!("../../vashuu-web/static/assets/data/experience.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimingConfig {
    pub focus_delay_ms: u64,
    pub shake_ms: u64,
    pub reveal_char_ms: u64,
    pub final_reveal_char_ms: u64,
    pub unlock_hold_ms: u64,
    pub q3_settle_ms: u64,
    pub game_settle_ms: u64,
    pub q4_settle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            focus_delay_ms: FOCUS_DELAY_MS,
            shake_ms: SHAKE_MS,
            reveal_char_ms: REVEAL_CHAR_MS,
            final_reveal_char_ms: FINAL_REVEAL_CHAR_MS,
            unlock_hold_ms: UNLOCK_HOLD_MS,
            q3_settle_ms: Q3_SETTLE_MS,
            game_settle_ms: GAME_SETTLE_MS,
            q4_settle_ms: Q4_SETTLE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MusicConfig {
    pub track: String,
    pub landing_volume: f64,
    pub toggle_volume: f64,
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
    pub start_delay_ms: u64,
    pub retry_delay_ms: u64,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            track: MUSIC_TRACK.to_string(),
            landing_volume: LANDING_VOLUME,
            toggle_volume: TOGGLE_VOLUME,
            fade_in_ms: FADE_IN_MS,
            fade_out_ms: FADE_OUT_MS,
            start_delay_ms: MUSIC_START_DELAY_MS,
            retry_delay_ms: MUSIC_RETRY_DELAY_MS,
        }
    }
}

/// Vector animation asset paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetConfig {
    pub hearts_bottom: String,
    pub heart_pulse: String,
    pub rose: String,
    pub rose2: String,
    pub squeeze_bunny: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            hearts_bottom: "assets/animations/hearts_bottom.json".to_string(),
            heart_pulse: "assets/animations/heart_pulse.json".to_string(),
            rose: "assets/animations/rose.json".to_string(),
            rose2: "assets/animations/rose2.json".to_string(),
            squeeze_bunny: "assets/animations/squeeze_bunny.json".to_string(),
        }
    }
}

/// Hint shown on a wrong answer and reward revealed on a right one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub hint: String,
    pub reward: String,
}

impl Prompt {
    fn new(hint: &str, reward: &str) -> Self {
        Self {
            hint: hint.to_string(),
            reward: reward.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MessageConfig {
    pub q1_date: Prompt,
    pub q1_name: Prompt,
    pub q2: Prompt,
    pub q3: Prompt,
    pub q4: Prompt,
    pub game_reward: String,
    pub final_message: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            q1_date: Prompt::new(
                "Think about our special day... 💕",
                "Yesh... 14/10. The day we met. The day I first saw you, my princess.",
            ),
            q1_name: Prompt::new("Hint: It starts with Q... 💕", "You are my queen."),
            q2: Prompt::new(
                "Try again, baby! 💕",
                "You melt me every time I see you, beautiful.",
            ),
            q3: Prompt::new(
                "Hint: (ur fav flower, pookie) 💕",
                "You are my delicate and sweet sunflower.",
            ),
            q4: Prompt::new(
                "Think about what I want most... 💕",
                "You're my sunflower and my rose.\nI can't wait to feel your warmth again.",
            ),
            game_reward: "You're amazing, pookie!".to_string(),
            final_message: "You are so beautiful — I still can't believe I have you.\n\
                            You melt me anytime I think about you, baby.\n\
                            You're my sunflower, my rose, my pookie — forever."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstSpec {
    pub count: u32,
    pub color: String,
}

impl BurstSpec {
    fn new(count: u32, color: &str) -> Self {
        Self {
            count,
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectsConfig {
    pub q1_burst: BurstSpec,
    pub unlock_burst: BurstSpec,
    pub q2_burst: BurstSpec,
    pub q3_burst: BurstSpec,
    pub game_burst: BurstSpec,
    pub q4_burst: BurstSpec,
    pub landing_ambient: AmbientSpec,
    pub q1_ambient: AmbientSpec,
    pub unlock_ambient: AmbientSpec,
    pub q2_ambient: AmbientSpec,
    pub q3_ambient: AmbientSpec,
    pub game_ambient: AmbientSpec,
    pub q4_ambient: AmbientSpec,
    pub final_ambient: AmbientSpec,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            q1_burst: BurstSpec::new(45, "#FFB6C1"),
            unlock_burst: BurstSpec::new(60, "#ffd6e0"),
            q2_burst: BurstSpec::new(50, "#FF69B4"),
            q3_burst: BurstSpec::new(50, "#FFD700"),
            game_burst: BurstSpec::new(60, "#FF1493"),
            q4_burst: BurstSpec::new(70, "#FF69B4"),
            landing_ambient: AmbientSpec::butterflies(12),
            q1_ambient: AmbientSpec::hearts(15),
            unlock_ambient: AmbientSpec::hearts(25),
            q2_ambient: AmbientSpec::hearts(20),
            q3_ambient: AmbientSpec::hearts(15),
            game_ambient: AmbientSpec::hearts(20),
            q4_ambient: AmbientSpec::hearts(20),
            final_ambient: AmbientSpec::hearts(20),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceConfig {
    pub timing: TimingConfig,
    pub music: MusicConfig,
    #[serde(rename = "catch")]
    pub catch_game: CatchConfig,
    pub assets: AssetConfig,
    pub messages: MessageConfig,
    pub effects: EffectsConfig,
}

impl ExperienceConfig {
    /// Parse a config document; missing sections take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Config`] when the document is not valid JSON or a
    /// field has the wrong shape, and [`FlowError::InvalidConfig`] when the
    /// catch settings could not run a game.
    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        let config: Self = serde_json::from_str(json)?;
        config.catch_game.validate()?;
        Ok(config)
    }

    /// Shipped config, or the compiled defaults if it fails to parse.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_EXPERIENCE_DATA).unwrap_or_else(|err| {
            log::warn!("{err}; using built-in experience config");
            Self::default()
        })
    }
}
