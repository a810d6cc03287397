//! Startup helpers shared by the browser runtime and its tests.

use vashuu_game::{Experience, ExperienceConfig, KeyValueStore};

/// Build the controller from the bundled config, on the landing screen.
pub fn build_experience<S: KeyValueStore + Clone>(store: S, seed: u64, now: u64) -> Experience<S> {
    let config = ExperienceConfig::load_from_static();
    log::info!(
        "experience ready: {} catch targets, music {}",
        config.catch_game.target_count,
        config.music.track
    );
    Experience::new(store, config, seed, now)
}

/// Browser timer delay for a wake due at `due`, seen at `now`.
#[must_use]
pub fn timer_delay_ms(due: u64, now: u64) -> u32 {
    u32::try_from(due.saturating_sub(now)).unwrap_or(u32::MAX)
}
