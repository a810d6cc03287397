//! Single-track music fader.
//!
//! The fader owns the playback state machine and emits [`AudioCommand`]s for
//! the platform to execute. Fades are 20 linear steps driven by the shared
//! [`Timeline`]; starting any fade cancels the one in flight.

use rand::Rng;

use crate::constants::FADE_STEPS;
use crate::numbers::lerp_step;
use crate::timeline::{TimerId, Timeline};

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const CACHE_SUFFIX_LEN: usize = 6;

/// Instructions for the platform audio element.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// Point the element at `src` and start buffering.
    Load { src: String },
    /// Silent play/pause/rewind cycle to satisfy autoplay gating. Failures
    /// are ignored.
    Prime,
    Play,
    Pause,
    SetVolume(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    #[error("Audio not unlocked - user interaction required")]
    Locked,
    #[error("Audio failed to load: {0}")]
    Load(String),
    #[error("Audio playback rejected: {0}")]
    Playback(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeWake;

#[derive(Debug, Clone, Copy)]
struct Fade {
    direction: FadeDirection,
    from: f64,
    to: f64,
    step: u32,
    step_ms: u64,
    timer: TimerId,
}

/// Append a `?v=<now>&r=<base36>` disambiguator to `path`, replacing any
/// existing query.
pub fn cache_busted(path: &str, now_ms: u64, rng: &mut impl Rng) -> String {
    let base = path.split('?').next().unwrap_or(path);
    let suffix: String = (0..CACHE_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!("{base}?v={now_ms}&r={suffix}")
}

#[derive(Debug, Clone)]
pub struct AudioFader {
    unlocked: bool,
    playing: bool,
    loading: bool,
    volume: f64,
    target_volume: f64,
    fade: Option<Fade>,
    outbox: Vec<AudioCommand>,
}

impl Default for AudioFader {
    fn default() -> Self {
        Self {
            unlocked: false,
            playing: false,
            loading: false,
            volume: 0.0,
            target_volume: 0.7,
            fade: None,
            outbox: Vec::new(),
        }
    }
}

impl AudioFader {
    #[must_use]
    pub const fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn volume(&self) -> f64 {
        self.volume
    }

    #[must_use]
    pub const fn target_volume(&self) -> f64 {
        self.target_volume
    }

    #[must_use]
    pub fn fading(&self) -> Option<FadeDirection> {
        self.fade.map(|fade| fade.direction)
    }

    /// Mark audio as unlocked. Optimistic: the flag is set whether or not the
    /// prime cycle succeeds, and it never goes back.
    pub fn unlock(&mut self) {
        self.unlocked = true;
        self.outbox.push(AudioCommand::Prime);
    }

    /// Request a cache-busted load of `path`. Returns the resolved source.
    pub fn load(&mut self, path: &str, now_ms: u64, rng: &mut impl Rng) -> String {
        let src = cache_busted(path, now_ms, rng);
        self.loading = true;
        self.outbox.push(AudioCommand::Load { src: src.clone() });
        src
    }

    /// Platform report: enough data buffered to play through.
    pub fn loaded(&mut self) {
        self.loading = false;
    }

    /// Platform report: the load failed.
    pub fn load_failed(&mut self, reason: impl Into<String>) -> AudioError {
        self.loading = false;
        AudioError::Load(reason.into())
    }

    /// Start playback at volume 0 and ramp up to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::Locked`] before [`AudioFader::unlock`].
    pub fn fade_in<E: From<FadeWake>>(
        &mut self,
        target: f64,
        duration_ms: u64,
        timeline: &mut Timeline<E>,
    ) -> Result<(), AudioError> {
        if !self.unlocked {
            return Err(AudioError::Locked);
        }
        if self.playing {
            return Ok(());
        }
        self.cancel_fade(timeline);
        self.target_volume = target.clamp(0.0, 1.0);
        self.set_volume(0.0);
        self.outbox.push(AudioCommand::Play);
        self.playing = true;
        self.begin_fade(FadeDirection::In, 0.0, self.target_volume, duration_ms, timeline);
        Ok(())
    }

    /// Like [`AudioFader::fade_in`], but a fade-out in flight is reversed:
    /// playback continues and the volume ramps from where it is back up to
    /// `target`.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::Locked`] before [`AudioFader::unlock`].
    pub fn resume<E: From<FadeWake>>(
        &mut self,
        target: f64,
        duration_ms: u64,
        timeline: &mut Timeline<E>,
    ) -> Result<(), AudioError> {
        if !self.unlocked {
            return Err(AudioError::Locked);
        }
        if !self.playing || self.fading() != Some(FadeDirection::Out) {
            return self.fade_in(target, duration_ms, timeline);
        }
        self.cancel_fade(timeline);
        self.target_volume = target.clamp(0.0, 1.0);
        self.outbox.push(AudioCommand::Play);
        self.begin_fade(FadeDirection::In, self.volume, self.target_volume, duration_ms, timeline);
        Ok(())
    }

    /// Ramp the current volume down to 0, then pause. No-op when not playing.
    pub fn fade_out<E: From<FadeWake>>(&mut self, duration_ms: u64, timeline: &mut Timeline<E>) {
        if !self.playing {
            return;
        }
        self.cancel_fade(timeline);
        self.begin_fade(FadeDirection::Out, self.volume, 0.0, duration_ms, timeline);
    }

    /// Advance the fade in flight. Returns the direction of a fade that just
    /// finished.
    pub fn on_wake<E: From<FadeWake>>(
        &mut self,
        _wake: FadeWake,
        timeline: &mut Timeline<E>,
    ) -> Option<FadeDirection> {
        let mut fade = self.fade.take()?;
        fade.step += 1;
        self.set_volume(lerp_step(fade.from, fade.to, fade.step, FADE_STEPS));
        if fade.step < FADE_STEPS {
            fade.timer = timeline.schedule(fade.step_ms, FadeWake);
            self.fade = Some(fade);
            return None;
        }
        if fade.direction == FadeDirection::Out {
            self.outbox.push(AudioCommand::Pause);
            self.playing = false;
        }
        Some(fade.direction)
    }

    /// Platform report: the play request was refused.
    pub fn playback_rejected<E>(
        &mut self,
        reason: impl Into<String>,
        timeline: &mut Timeline<E>,
    ) -> AudioError {
        self.cancel_fade(timeline);
        self.playing = false;
        AudioError::Playback(reason.into())
    }

    pub fn cancel_fade<E>(&mut self, timeline: &mut Timeline<E>) {
        if let Some(fade) = self.fade.take() {
            timeline.cancel(fade.timer);
        }
    }

    /// Commands queued since the last drain.
    pub fn drain_commands(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.outbox)
    }

    fn begin_fade<E: From<FadeWake>>(
        &mut self,
        direction: FadeDirection,
        from: f64,
        to: f64,
        duration_ms: u64,
        timeline: &mut Timeline<E>,
    ) {
        let step_ms = duration_ms / u64::from(FADE_STEPS);
        let timer = timeline.schedule(step_ms, FadeWake);
        self.fade = Some(Fade {
            direction,
            from,
            to,
            step: 0,
            step_ms,
            timer,
        });
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
        self.outbox.push(AudioCommand::SetVolume(self.volume));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn run(fader: &mut AudioFader, tl: &mut Timeline<FadeWake>) -> Vec<FadeDirection> {
        let mut done = Vec::new();
        while let Some((_, wake)) = tl.pop_due(u64::MAX) {
            done.extend(fader.on_wake(wake, tl));
        }
        done
    }

    #[test]
    fn fade_in_before_unlock_rejects() {
        let mut tl: Timeline<FadeWake> = Timeline::new(0);
        let mut fader = AudioFader::default();
        assert_eq!(fader.fade_in(0.6, 1_400, &mut tl), Err(AudioError::Locked));
        assert!(!fader.is_playing());
        assert!(tl.is_empty());
        assert!(fader.drain_commands().is_empty());
    }

    #[test]
    fn fade_in_ramps_linearly_in_twenty_steps() {
        let mut tl = Timeline::new(0);
        let mut fader = AudioFader::default();
        fader.unlock();
        fader.fade_in(0.6, 1_400, &mut tl).unwrap();
        assert!(fader.is_playing());
        assert_eq!(tl.next_due(), Some(70));

        let commands = fader.drain_commands();
        assert_eq!(
            commands,
            vec![AudioCommand::Prime, AudioCommand::SetVolume(0.0), AudioCommand::Play]
        );

        assert_eq!(run(&mut fader, &mut tl), vec![FadeDirection::In]);
        assert_eq!(tl.now(), 1_400);
        assert!((fader.volume() - 0.6).abs() < 1e-9);
        let volumes = fader
            .drain_commands()
            .into_iter()
            .filter(|c| matches!(c, AudioCommand::SetVolume(_)))
            .count();
        assert_eq!(volumes, 20);
    }

    #[test]
    fn fade_in_is_noop_while_playing() {
        let mut tl: Timeline<FadeWake> = Timeline::new(0);
        let mut fader = AudioFader::default();
        fader.unlock();
        fader.fade_in(0.6, 1_400, &mut tl).unwrap();
        let pending = tl.len();
        fader.fade_in(0.9, 100, &mut tl).unwrap();
        assert_eq!(tl.len(), pending);
        assert!((fader.target_volume() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn fade_out_cancels_fade_in_and_pauses() {
        let mut tl = Timeline::new(0);
        let mut fader = AudioFader::default();
        fader.unlock();
        fader.fade_in(0.8, 1_000, &mut tl).unwrap();
        for _ in 0..10 {
            let (_, wake) = tl.pop_due(u64::MAX).unwrap();
            fader.on_wake(wake, &mut tl);
        }
        assert!((fader.volume() - 0.4).abs() < 1e-9);

        fader.fade_out(800, &mut tl);
        assert_eq!(tl.len(), 1);
        assert_eq!(fader.fading(), Some(FadeDirection::Out));
        assert_eq!(run(&mut fader, &mut tl), vec![FadeDirection::Out]);
        assert!(!fader.is_playing());
        assert!(fader.volume().abs() < 1e-9);
        assert_eq!(fader.drain_commands().last(), Some(&AudioCommand::Pause));
    }

    #[test]
    fn fade_out_when_stopped_is_noop() {
        let mut tl: Timeline<FadeWake> = Timeline::new(0);
        let mut fader = AudioFader::default();
        fader.fade_out(800, &mut tl);
        assert!(tl.is_empty());
    }

    #[test]
    fn rejected_playback_resets_state() {
        let mut tl: Timeline<FadeWake> = Timeline::new(0);
        let mut fader = AudioFader::default();
        fader.unlock();
        fader.fade_in(0.6, 1_400, &mut tl).unwrap();
        let err = fader.playback_rejected("NotAllowedError", &mut tl);
        assert_eq!(err, AudioError::Playback("NotAllowedError".into()));
        assert!(!fader.is_playing());
        assert!(tl.is_empty());
        assert!(fader.is_unlocked());
    }

    #[test]
    fn load_appends_cache_buster() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut fader = AudioFader::default();
        let src = fader.load("assets/music/track.mp3?v=old", 1_234, &mut rng);
        assert!(src.starts_with("assets/music/track.mp3?v=1234&r="));
        assert_eq!(src.rsplit("&r=").next().map(str::len), Some(CACHE_SUFFIX_LEN));
        assert!(fader.is_loading());
        fader.loaded();
        assert!(!fader.is_loading());
        assert_eq!(
            fader.load_failed("404"),
            AudioError::Load("404".into())
        );
    }

    #[test]
    fn resume_reverses_a_fade_out_without_pausing() {
        let mut tl = Timeline::new(0);
        let mut fader = AudioFader::default();
        fader.unlock();
        fader.fade_in(0.6, 1_400, &mut tl).unwrap();
        run(&mut fader, &mut tl);
        fader.fade_out(800, &mut tl);
        for _ in 0..10 {
            let (_, wake) = tl.pop_due(u64::MAX).unwrap();
            fader.on_wake(wake, &mut tl);
        }
        assert!((fader.volume() - 0.3).abs() < 1e-9);
        fader.drain_commands();

        fader.resume(0.7, 1_400, &mut tl).unwrap();
        assert_eq!(fader.fading(), Some(FadeDirection::In));
        assert_eq!(fader.drain_commands(), vec![AudioCommand::Play]);
        assert_eq!(run(&mut fader, &mut tl), vec![FadeDirection::In]);
        assert!(fader.is_playing());
        assert!((fader.volume() - 0.7).abs() < 1e-9);
        assert!(!fader.drain_commands().contains(&AudioCommand::Pause));
    }

    #[test]
    fn resume_from_silence_is_a_plain_fade_in() {
        let mut tl: Timeline<FadeWake> = Timeline::new(0);
        let mut fader = AudioFader::default();
        assert_eq!(fader.resume(0.6, 1_400, &mut tl), Err(AudioError::Locked));
        fader.unlock();
        fader.drain_commands();
        fader.resume(0.6, 1_400, &mut tl).unwrap();
        assert!(fader.is_playing());
        assert_eq!(
            fader.drain_commands(),
            vec![AudioCommand::SetVolume(0.0), AudioCommand::Play]
        );
    }
}
