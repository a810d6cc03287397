//! Centralized timing, storage and content constants for the experience.
//!
//! Defaults here seed [`crate::config::ExperienceConfig`]; anything a deployment
//! may want to retune lives in the config, everything else stays fixed.

// Storage keys -------------------------------------------------------------
pub const USER_KEY: &str = "user";
pub const PROGRESS_KEY: &str = "progress";
pub const EXPORT_FILE_PREFIX: &str = "vashuu_progress_";

// Credentials --------------------------------------------------------------
pub const DEFAULT_NICKNAME: &str = "vashuu";
pub const DEFAULT_PASSWORD: &str = "1410";

// Screen timing ------------------------------------------------------------
pub(crate) const FOCUS_DELAY_MS: u64 = 50;
pub(crate) const SHAKE_MS: u64 = 500;
pub(crate) const REVEAL_CHAR_MS: u64 = 80;
pub(crate) const FINAL_REVEAL_CHAR_MS: u64 = 100;
pub(crate) const REVEAL_LINE_PAUSE_FACTOR: u64 = 3;
pub(crate) const UNLOCK_HOLD_MS: u64 = 800;
pub(crate) const Q3_SETTLE_MS: u64 = 1_500;
pub(crate) const GAME_SETTLE_MS: u64 = 600;
pub(crate) const Q4_SETTLE_MS: u64 = 1_200;

// Music --------------------------------------------------------------------
pub(crate) const MUSIC_TRACK: &str = "assets/music/this_is_for_u.mp3";
pub const FADE_STEPS: u32 = 20;
pub(crate) const LANDING_VOLUME: f64 = 0.6;
pub(crate) const TOGGLE_VOLUME: f64 = 0.7;
pub(crate) const FADE_IN_MS: u64 = 1_400;
pub(crate) const FADE_OUT_MS: u64 = 800;
pub(crate) const MUSIC_START_DELAY_MS: u64 = 100;
pub(crate) const MUSIC_RETRY_DELAY_MS: u64 = 100;

// Catch game ---------------------------------------------------------------
pub(crate) const CATCH_TARGETS: u32 = 10;
pub(crate) const SPAWN_INTERVAL_MS: u64 = 1_200;
pub(crate) const TARGET_LIFETIME_MS: u64 = 3_000;
pub(crate) const HIT_RADIUS_PX: f64 = 60.0;
pub(crate) const REPORT_DELAY_MS: u64 = 500;
pub(crate) const SPAWN_MIN_LEFT_PCT: f64 = 5.0;
pub(crate) const SPAWN_LEFT_SPAN_PCT: f64 = 85.0;
pub(crate) const ARENA_WIDTH_PX: f64 = 360.0;
pub(crate) const ARENA_HEIGHT_PX: f64 = 480.0;
pub(crate) const TARGET_SIZE_PX: f64 = 40.0;

// Decor --------------------------------------------------------------------
pub(crate) const AMBIENT_PULSE_CHANCE: f64 = 0.3;
pub(crate) const BURST_MIN_DISTANCE_PX: f64 = 200.0;
pub(crate) const BURST_MAX_DISTANCE_PX: f64 = 300.0;
pub(crate) const BURST_MIN_SECS: f64 = 1.0;
pub(crate) const BURST_SPREAD_SECS: f64 = 0.5;
pub(crate) const PARTICLE_MIN_SECS: f64 = 8.0;
pub(crate) const PARTICLE_SPREAD_SECS: f64 = 4.0;
pub(crate) const PARTICLE_MAX_DELAY_SECS: f64 = 2.0;
