//! Decorative effects: ambient particle streams, one-shot bursts and vector
//! animation slots.
//!
//! Nothing here affects flow. The controller triggers effects; the platform
//! renders whatever [`Decor`] currently holds.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    AMBIENT_PULSE_CHANCE, BURST_MAX_DISTANCE_PX, BURST_MIN_DISTANCE_PX, BURST_MIN_SECS,
    BURST_SPREAD_SECS, PARTICLE_MAX_DELAY_SECS, PARTICLE_MIN_SECS, PARTICLE_SPREAD_SECS,
};
use crate::numbers::f64_to_ms;
use crate::screens::ScreenId;
use crate::timeline::{TimerId, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
    Heart,
    Butterfly,
    Petal,
    Sparkle,
}

impl ParticleKind {
    /// Emoji glyph, for kinds drawn as text.
    #[must_use]
    pub const fn glyph(self) -> Option<&'static str> {
        match self {
            Self::Heart => Some("💖"),
            Self::Butterfly => Some("🦋"),
            Self::Petal | Self::Sparkle => None,
        }
    }

    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Heart => "particle heart-particle",
            Self::Butterfly => "particle butterfly-particle",
            Self::Petal => "particle petal-particle",
            Self::Sparkle => "particle sparkle-particle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Fast,
    #[default]
    Medium,
    Slow,
}

impl Cadence {
    #[must_use]
    pub const fn interval_ms(self) -> u64 {
        match self {
            Self::Fast => 300,
            Self::Medium => 500,
            Self::Slow => 800,
        }
    }
}

/// How an ambient stream is seeded: an initial batch of `count` particles one
/// `cadence` apart, then a chance of one more every two intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientSpec {
    pub kind: ParticleKind,
    pub count: u32,
    #[serde(default)]
    pub cadence: Cadence,
}

impl AmbientSpec {
    #[must_use]
    pub const fn hearts(count: u32) -> Self {
        Self {
            kind: ParticleKind::Heart,
            count,
            cadence: Cadence::Medium,
        }
    }

    #[must_use]
    pub const fn butterflies(count: u32) -> Self {
        Self {
            kind: ParticleKind::Butterfly,
            count,
            cadence: Cadence::Medium,
        }
    }
}

/// Particle containers, one per screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParticleField {
    Landing,
    Q1,
    Unlock,
    Q2,
    Q3,
    Game,
    Q4,
    Final,
}

impl ParticleField {
    pub const ALL: [Self; 8] = [
        Self::Landing,
        Self::Q1,
        Self::Unlock,
        Self::Q2,
        Self::Q3,
        Self::Game,
        Self::Q4,
        Self::Final,
    ];

    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::Landing => "landing-particles",
            Self::Q1 => "q1-particles",
            Self::Unlock => "unlock-container",
            Self::Q2 => "q2-particles",
            Self::Q3 => "q3-particles",
            Self::Game => "game-particles",
            Self::Q4 => "q4-particles",
            Self::Final => "final-particles",
        }
    }

    #[must_use]
    pub const fn screen(self) -> ScreenId {
        match self {
            Self::Landing => ScreenId::Landing,
            Self::Q1 => ScreenId::Q1,
            Self::Unlock => ScreenId::Unlock,
            Self::Q2 => ScreenId::Q2,
            Self::Q3 => ScreenId::Q3,
            Self::Game => ScreenId::Game,
            Self::Q4 => ScreenId::Q4,
            Self::Final => ScreenId::Final,
        }
    }

    #[must_use]
    pub const fn for_screen(screen: ScreenId) -> Self {
        match screen {
            ScreenId::Landing => Self::Landing,
            ScreenId::Q1 => Self::Q1,
            ScreenId::Unlock => Self::Unlock,
            ScreenId::Q2 => Self::Q2,
            ScreenId::Q3 => Self::Q3,
            ScreenId::Game => Self::Game,
            ScreenId::Q4 => Self::Q4,
            ScreenId::Final => Self::Final,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: u64,
    pub kind: ParticleKind,
    pub left_pct: f64,
    pub delay_secs: f64,
    pub duration_secs: f64,
    pub born_at: u64,
}

impl Particle {
    #[must_use]
    pub fn expires_at(&self) -> u64 {
        self.born_at + f64_to_ms((self.delay_secs + self.duration_secs) * 1_000.0)
    }
}

/// One spark flying out of a burst, relative to the container center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub angle: f64,
    pub distance_px: f64,
    pub duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Burst {
    pub id: u64,
    pub field: ParticleField,
    pub color: String,
    pub sparks: Vec<Spark>,
}

/// Containers hosting a vector animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VectorSlot {
    UnlockHearts,
    Q2Pulse,
    Q3Rose,
    Q4Rose,
    GameBunny,
    FinalHeartPulse,
    FinalSqueezeBunny,
}

impl VectorSlot {
    pub const ALL: [Self; 7] = [
        Self::UnlockHearts,
        Self::Q2Pulse,
        Self::Q3Rose,
        Self::Q4Rose,
        Self::GameBunny,
        Self::FinalHeartPulse,
        Self::FinalSqueezeBunny,
    ];

    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::UnlockHearts => "unlock-lottie",
            Self::Q2Pulse => "q2-lottie",
            Self::Q3Rose => "q3-rose",
            Self::Q4Rose => "q4-rose",
            Self::GameBunny => "game-lottie",
            Self::FinalHeartPulse => "final-heart-pulse",
            Self::FinalSqueezeBunny => "final-squeeze-bunny",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
    #[default]
    Svg,
    Canvas,
    Html,
}

/// Player options handed to the vector animation runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorOptions {
    #[serde(rename = "loop")]
    pub looping: bool,
    pub autoplay: bool,
    #[serde(default)]
    pub renderer: Renderer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

impl VectorOptions {
    #[must_use]
    pub const fn once() -> Self {
        Self {
            looping: false,
            autoplay: true,
            renderer: Renderer::Svg,
            width: None,
            height: None,
        }
    }

    #[must_use]
    pub const fn looping() -> Self {
        Self {
            looping: true,
            autoplay: true,
            renderer: Renderer::Svg,
            width: None,
            height: None,
        }
    }
}

/// An animation mounted in a slot. `generation` changes on every load so the
/// platform knows to rebuild the player even for the same asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorAnimation {
    pub path: String,
    pub options: VectorOptions,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorWake {
    Emit(ParticleField),
    Pulse(ParticleField),
    ClearBurst(u64),
}

#[derive(Debug, Clone)]
struct Stream {
    spec: AmbientSpec,
    emitted: u32,
    emit_timer: Option<TimerId>,
    pulse_timer: TimerId,
}

#[derive(Debug, Clone, Default)]
pub struct Decor {
    streams: BTreeMap<ParticleField, Stream>,
    particles: BTreeMap<ParticleField, Vec<Particle>>,
    bursts: Vec<(Burst, TimerId)>,
    vectors: BTreeMap<VectorSlot, VectorAnimation>,
    next_id: u64,
}

impl Decor {
    /// Start an ambient stream in `field`, replacing any stream already there.
    pub fn start<E: From<DecorWake>>(
        &mut self,
        field: ParticleField,
        spec: AmbientSpec,
        timeline: &mut Timeline<E>,
    ) {
        self.stop(field, timeline);
        let interval = spec.cadence.interval_ms();
        let emit_timer = (spec.count > 0).then(|| timeline.schedule(0, DecorWake::Emit(field)));
        let pulse_timer = timeline.schedule(interval * 2, DecorWake::Pulse(field));
        self.streams.insert(
            field,
            Stream {
                spec,
                emitted: 0,
                emit_timer,
                pulse_timer,
            },
        );
        log::debug!("ambient {} started ({} x{:?})", field.element_id(), spec.count, spec.kind);
    }

    /// Stop the stream in `field` and remove its particles.
    pub fn stop<E>(&mut self, field: ParticleField, timeline: &mut Timeline<E>) {
        if let Some(stream) = self.streams.remove(&field) {
            if let Some(timer) = stream.emit_timer {
                timeline.cancel(timer);
            }
            timeline.cancel(stream.pulse_timer);
        }
        self.particles.remove(&field);
    }

    pub fn stop_screen<E>(&mut self, screen: ScreenId, timeline: &mut Timeline<E>) {
        self.stop(ParticleField::for_screen(screen), timeline);
    }

    /// Stop every stream and burst. Vector slots keep their animations.
    pub fn stop_all<E>(&mut self, timeline: &mut Timeline<E>) {
        for field in ParticleField::ALL {
            self.stop(field, timeline);
        }
        for (_, timer) in self.bursts.drain(..) {
            timeline.cancel(timer);
        }
    }

    /// Fire `count` sparks evenly around the circle from the center of `field`.
    pub fn burst<E: From<DecorWake>>(
        &mut self,
        field: ParticleField,
        count: u32,
        color: &str,
        timeline: &mut Timeline<E>,
        rng: &mut impl Rng,
    ) -> u64 {
        let id = self.next_id();
        let sparks: Vec<Spark> = (0..count)
            .map(|i| Spark {
                angle: TAU * f64::from(i) / f64::from(count),
                distance_px: rng.gen_range(BURST_MIN_DISTANCE_PX..BURST_MAX_DISTANCE_PX),
                duration_secs: BURST_MIN_SECS + rng.gen_range(0.0..BURST_SPREAD_SECS),
            })
            .collect();
        let longest = sparks
            .iter()
            .map(|spark| spark.duration_secs)
            .fold(0.0, f64::max);
        let timer = timeline.schedule(f64_to_ms(longest * 1_000.0), DecorWake::ClearBurst(id));
        self.bursts.push((
            Burst {
                id,
                field,
                color: color.to_string(),
                sparks,
            },
            timer,
        ));
        id
    }

    /// Mount `path` in `slot`, replacing whatever played there.
    pub fn load_vector(&mut self, slot: VectorSlot, path: &str, options: VectorOptions) {
        let generation = self.next_id();
        self.vectors.insert(
            slot,
            VectorAnimation {
                path: path.to_string(),
                options,
                generation,
            },
        );
    }

    pub fn clear_vectors(&mut self) {
        self.vectors.clear();
    }

    pub fn on_wake<E: From<DecorWake>>(
        &mut self,
        wake: DecorWake,
        timeline: &mut Timeline<E>,
        rng: &mut impl Rng,
    ) {
        match wake {
            DecorWake::Emit(field) => self.emit(field, timeline, rng),
            DecorWake::Pulse(field) => self.pulse(field, timeline, rng),
            DecorWake::ClearBurst(id) => self.bursts.retain(|(burst, _)| burst.id != id),
        }
    }

    fn emit<E: From<DecorWake>>(
        &mut self,
        field: ParticleField,
        timeline: &mut Timeline<E>,
        rng: &mut impl Rng,
    ) {
        let Some(stream) = self.streams.get_mut(&field) else {
            return;
        };
        stream.emitted += 1;
        let AmbientSpec { kind, count, cadence } = stream.spec;
        stream.emit_timer = (stream.emitted < count)
            .then(|| timeline.schedule(cadence.interval_ms(), DecorWake::Emit(field)));
        self.spawn(field, kind, timeline.now(), rng);
    }

    fn pulse<E: From<DecorWake>>(
        &mut self,
        field: ParticleField,
        timeline: &mut Timeline<E>,
        rng: &mut impl Rng,
    ) {
        let Some(stream) = self.streams.get_mut(&field) else {
            return;
        };
        stream.pulse_timer =
            timeline.schedule(stream.spec.cadence.interval_ms() * 2, DecorWake::Pulse(field));
        let kind = stream.spec.kind;
        let now = timeline.now();
        if let Some(particles) = self.particles.get_mut(&field) {
            particles.retain(|particle| particle.expires_at() > now);
        }
        if rng.gen_bool(AMBIENT_PULSE_CHANCE) {
            self.spawn(field, kind, now, rng);
        }
    }

    fn spawn(&mut self, field: ParticleField, kind: ParticleKind, now: u64, rng: &mut impl Rng) {
        let id = self.next_id();
        self.particles.entry(field).or_default().push(Particle {
            id,
            kind,
            left_pct: rng.gen_range(0.0..100.0),
            delay_secs: rng.gen_range(0.0..PARTICLE_MAX_DELAY_SECS),
            duration_secs: PARTICLE_MIN_SECS + rng.gen_range(0.0..PARTICLE_SPREAD_SECS),
            born_at: now,
        });
    }

    const fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    #[must_use]
    pub fn is_streaming(&self, field: ParticleField) -> bool {
        self.streams.contains_key(&field)
    }

    #[must_use]
    pub fn stream(&self, field: ParticleField) -> Option<AmbientSpec> {
        self.streams.get(&field).map(|stream| stream.spec)
    }

    #[must_use]
    pub fn particles(&self, field: ParticleField) -> &[Particle] {
        self.particles.get(&field).map_or(&[], Vec::as_slice)
    }

    pub fn bursts(&self) -> impl Iterator<Item = &Burst> {
        self.bursts.iter().map(|(burst, _)| burst)
    }

    pub fn bursts_in(&self, field: ParticleField) -> impl Iterator<Item = &Burst> {
        self.bursts().filter(move |burst| burst.field == field)
    }

    #[must_use]
    pub fn vector(&self, slot: VectorSlot) -> Option<&VectorAnimation> {
        self.vectors.get(&slot)
    }
}
