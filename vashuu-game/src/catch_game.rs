//! Catch-the-hearts mini-game.
//!
//! Targets fall through the arena for a fixed lifetime; pointer events catch
//! the newest target strictly within the hit radius. Reaching the target count
//! ends the session and, after a short settle, sends a [`GameReport`] through
//! the channel the session was built with. There is no way to lose.

use std::sync::mpsc::Sender;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ARENA_HEIGHT_PX, ARENA_WIDTH_PX, CATCH_TARGETS, HIT_RADIUS_PX, REPORT_DELAY_MS,
    SPAWN_INTERVAL_MS, SPAWN_LEFT_SPAN_PCT, SPAWN_MIN_LEFT_PCT, TARGET_LIFETIME_MS,
    TARGET_SIZE_PX,
};
use crate::error::FlowError;
use crate::numbers::progress_ratio;
use crate::timeline::{TimerId, Timeline};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatchConfig {
    pub target_count: u32,
    pub spawn_interval_ms: u64,
    pub target_lifetime_ms: u64,
    pub hit_radius_px: f64,
    pub report_delay_ms: u64,
    pub spawn_min_left_pct: f64,
    pub spawn_left_span_pct: f64,
}

impl Default for CatchConfig {
    fn default() -> Self {
        Self {
            target_count: CATCH_TARGETS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            target_lifetime_ms: TARGET_LIFETIME_MS,
            hit_radius_px: HIT_RADIUS_PX,
            report_delay_ms: REPORT_DELAY_MS,
            spawn_min_left_pct: SPAWN_MIN_LEFT_PCT,
            spawn_left_span_pct: SPAWN_LEFT_SPAN_PCT,
        }
    }
}

impl CatchConfig {
    /// Reject settings that would stall or break a session.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), FlowError> {
        let problem = if self.target_count == 0 {
            Some("catch.targetCount must be at least 1")
        } else if self.spawn_interval_ms == 0 {
            Some("catch.spawnIntervalMs must be positive")
        } else if self.target_lifetime_ms == 0 {
            Some("catch.targetLifetimeMs must be positive")
        } else if self.hit_radius_px <= 0.0 {
            Some("catch.hitRadiusPx must be positive")
        } else if self.spawn_left_span_pct <= 0.0 {
            Some("catch.spawnLeftSpanPct must be positive")
        } else {
            None
        };
        problem.map_or(Ok(()), |msg| Err(FlowError::InvalidConfig(msg.to_string())))
    }

    /// Clamp counts and timings into the range a session can run with.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.target_count = self.target_count.max(1);
        self.spawn_interval_ms = self.spawn_interval_ms.max(1);
        self.target_lifetime_ms = self.target_lifetime_ms.max(1);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchPhase {
    Idle,
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Arena geometry in CSS pixels, relative to its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    pub target_size: f64,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH_PX,
            height: ARENA_HEIGHT_PX,
            target_size: TARGET_SIZE_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: u64,
    pub left_pct: f64,
    pub spawned_at: u64,
    expire_timer: TimerId,
}

impl Target {
    /// Fraction of the fall completed at `now`.
    #[must_use]
    pub fn fall_progress(&self, now: u64, lifetime_ms: u64) -> f64 {
        progress_ratio(now.saturating_sub(self.spawned_at), lifetime_ms)
    }

    /// Center of the glyph at `now`. The glyph enters just above the arena and
    /// leaves at the bottom edge.
    #[must_use]
    pub fn center(&self, arena: &Arena, now: u64, lifetime_ms: u64) -> Point {
        let half = arena.target_size / 2.0;
        let top = (arena.height + arena.target_size)
            .mul_add(self.fall_progress(now, lifetime_ms), -arena.target_size);
        Point::new(self.left_pct / 100.0 * arena.width + half, top + half)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameReport {
    pub catch_count: u32,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchWake {
    Spawn,
    Expire(u64),
    Report,
}

#[derive(Debug)]
pub struct CatchSession {
    config: CatchConfig,
    arena: Arena,
    phase: CatchPhase,
    caught: u32,
    targets: Vec<Target>,
    started_at: u64,
    elapsed_ms: Option<u64>,
    spawn_timer: Option<TimerId>,
    report_timer: Option<TimerId>,
    reports: Sender<GameReport>,
    next_id: u64,
}

impl CatchSession {
    pub fn new(config: CatchConfig, reports: Sender<GameReport>) -> Self {
        Self {
            config: config.sanitized(),
            arena: Arena::default(),
            phase: CatchPhase::Idle,
            caught: 0,
            targets: Vec::new(),
            started_at: 0,
            elapsed_ms: None,
            spawn_timer: None,
            report_timer: None,
            reports,
            next_id: 0,
        }
    }

    /// Enter `Active`, spawn the first target now and keep spawning on the
    /// configured interval. No-op unless idle.
    pub fn start<E: From<CatchWake>>(&mut self, timeline: &mut Timeline<E>, rng: &mut impl Rng) {
        if self.phase != CatchPhase::Idle {
            return;
        }
        self.phase = CatchPhase::Active;
        self.started_at = timeline.now();
        self.spawn(timeline, rng);
        self.spawn_timer = Some(timeline.schedule(self.config.spawn_interval_ms, CatchWake::Spawn));
        log::info!("catch game started, target {}", self.config.target_count);
    }

    pub fn on_wake<E: From<CatchWake>>(
        &mut self,
        wake: CatchWake,
        timeline: &mut Timeline<E>,
        rng: &mut impl Rng,
    ) {
        match wake {
            CatchWake::Spawn => {
                self.spawn_timer = None;
                if self.phase == CatchPhase::Active && self.caught < self.config.target_count {
                    self.spawn(timeline, rng);
                    self.spawn_timer =
                        Some(timeline.schedule(self.config.spawn_interval_ms, CatchWake::Spawn));
                }
            }
            CatchWake::Expire(id) => self.targets.retain(|target| target.id != id),
            CatchWake::Report => {
                self.report_timer = None;
                let report = GameReport {
                    catch_count: self.caught,
                    elapsed_ms: self.elapsed_ms.unwrap_or_default(),
                };
                if self.reports.send(report).is_err() {
                    log::warn!("catch game report dropped: receiver gone");
                }
            }
        }
    }

    /// Hit-test a pointer position in arena coordinates. Returns the caught
    /// target id, at most one per event.
    pub fn pointer<E: From<CatchWake>>(
        &mut self,
        at: Point,
        timeline: &mut Timeline<E>,
    ) -> Option<u64> {
        if self.phase != CatchPhase::Active {
            return None;
        }
        let now = timeline.now();
        let index = self.targets.iter().rposition(|target| {
            target.center(&self.arena, now, self.config.target_lifetime_ms).distance(at)
                < self.config.hit_radius_px
        })?;
        let target = self.targets.remove(index);
        timeline.cancel(target.expire_timer);
        self.caught += 1;
        log::debug!("caught {} / {}", self.caught, self.config.target_count);
        if self.caught >= self.config.target_count {
            self.finish(timeline);
        }
        Some(target.id)
    }

    /// Platform report of the arena's rendered size.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.arena.width = width;
            self.arena.height = height;
        }
    }

    /// Cancel every pending timer and drop all targets.
    pub fn teardown<E>(&mut self, timeline: &mut Timeline<E>) {
        for timer in [self.spawn_timer.take(), self.report_timer.take()]
            .into_iter()
            .flatten()
        {
            timeline.cancel(timer);
        }
        self.clear_targets(timeline);
        self.phase = CatchPhase::Idle;
    }

    fn finish<E: From<CatchWake>>(&mut self, timeline: &mut Timeline<E>) {
        self.phase = CatchPhase::Finished;
        if let Some(timer) = self.spawn_timer.take() {
            timeline.cancel(timer);
        }
        self.clear_targets(timeline);
        let elapsed = timeline.now().saturating_sub(self.started_at);
        self.elapsed_ms = Some(elapsed);
        self.report_timer = Some(timeline.schedule(self.config.report_delay_ms, CatchWake::Report));
        log::info!("catch game finished in {elapsed} ms");
    }

    fn clear_targets<E>(&mut self, timeline: &mut Timeline<E>) {
        for target in self.targets.drain(..) {
            timeline.cancel(target.expire_timer);
        }
    }

    fn spawn<E: From<CatchWake>>(&mut self, timeline: &mut Timeline<E>, rng: &mut impl Rng) {
        self.next_id += 1;
        let id = self.next_id;
        let span = self.config.spawn_left_span_pct;
        let offset = if span > 0.0 { rng.gen_range(0.0..span) } else { 0.0 };
        let left_pct = self.config.spawn_min_left_pct + offset;
        let expire_timer = timeline.schedule(self.config.target_lifetime_ms, CatchWake::Expire(id));
        self.targets.push(Target {
            id,
            left_pct,
            spawned_at: timeline.now(),
            expire_timer,
        });
    }

    #[must_use]
    pub const fn phase(&self) -> CatchPhase {
        self.phase
    }

    #[must_use]
    pub const fn caught(&self) -> u32 {
        self.caught
    }

    #[must_use]
    pub const fn config(&self) -> &CatchConfig {
        &self.config
    }

    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    #[must_use]
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Live targets with their centers at `now`.
    pub fn positions(&self, now: u64) -> impl Iterator<Item = (u64, Point)> + '_ {
        self.targets.iter().map(move |target| {
            (
                target.id,
                target.center(&self.arena, now, self.config.target_lifetime_ms),
            )
        })
    }

    #[must_use]
    pub fn score_label(&self) -> String {
        format!("{} / {}", self.caught, self.config.target_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::sync::mpsc;

    fn session(seed: u64) -> (CatchSession, mpsc::Receiver<GameReport>, Timeline<CatchWake>, ChaCha8Rng) {
        let (tx, rx) = mpsc::channel();
        let mut tl = Timeline::new(10_000);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut game = CatchSession::new(CatchConfig::default(), tx);
        game.start(&mut tl, &mut rng);
        (game, rx, tl, rng)
    }

    fn advance(game: &mut CatchSession, tl: &mut Timeline<CatchWake>, until: u64, rng: &mut ChaCha8Rng) {
        while let Some((_, wake)) = tl.pop_due(until) {
            game.on_wake(wake, tl, rng);
        }
        tl.settle(until);
    }

    fn newest_center(game: &CatchSession, now: u64) -> Point {
        game.positions(now).last().map(|(_, p)| p).unwrap()
    }

    #[test]
    fn start_spawns_immediately_within_bounds() {
        let (game, _rx, tl, _) = session(1);
        assert_eq!(game.phase(), CatchPhase::Active);
        assert_eq!(game.targets().len(), 1);
        let left = game.targets()[0].left_pct;
        assert!((5.0..90.0).contains(&left));
        assert_eq!(tl.next_due(), Some(11_200));
        assert_eq!(game.score_label(), "0 / 10");
    }

    #[test]
    fn targets_fall_and_expire_uncaught() {
        let (mut game, _rx, mut tl, mut rng) = session(2);
        let top = newest_center(&game, 10_000).y;
        let later = newest_center(&game, 11_500).y;
        assert!(later > top);
        advance(&mut game, &mut tl, 13_000, &mut rng);
        assert!(game.targets().iter().all(|t| t.spawned_at > 10_000));
        assert_eq!(game.caught(), 0);
    }

    #[test]
    fn miss_outside_radius_catches_nothing() {
        let (mut game, _rx, mut tl, _) = session(3);
        let center = newest_center(&game, tl.now());
        let far = Point::new(center.x + 60.0, center.y);
        assert_eq!(game.pointer(far, &mut tl), None);
        assert_eq!(game.caught(), 0);
        assert_eq!(game.targets().len(), 1);
    }

    #[test]
    fn catching_target_count_finishes_and_reports_once() {
        let (mut game, rx, mut tl, mut rng) = session(4);
        let mut now = tl.now();
        while game.phase() == CatchPhase::Active {
            let center = newest_center(&game, now);
            assert!(game.pointer(center, &mut tl).is_some());
            now += 1_200;
            advance(&mut game, &mut tl, now, &mut rng);
        }
        assert_eq!(game.phase(), CatchPhase::Finished);
        assert_eq!(game.caught(), 10);
        assert!(game.targets().is_empty());

        let spare = Point::new(0.0, 0.0);
        assert_eq!(game.pointer(spare, &mut tl), None);

        advance(&mut game, &mut tl, now + 500, &mut rng);
        let report = rx.try_recv().unwrap();
        assert_eq!(report.catch_count, 10);
        assert_eq!(report.elapsed_ms, 9 * 1_200);
        assert!(rx.try_recv().is_err());
        assert!(tl.is_empty());
    }

    #[test]
    fn one_catch_per_event_newest_first() {
        let (mut game, _rx, mut tl, mut rng) = session(5);
        advance(&mut game, &mut tl, 11_200, &mut rng);
        assert_eq!(game.targets().len(), 2);
        let newest = game.targets()[1].id;
        let center = newest_center(&game, tl.now());
        assert_eq!(game.pointer(center, &mut tl), Some(newest));
        assert_eq!(game.caught(), 1);
        assert_eq!(game.targets().len(), 1);
    }

    #[test]
    fn teardown_cancels_everything() {
        let (mut game, rx, mut tl, mut rng) = session(6);
        advance(&mut game, &mut tl, 12_400, &mut rng);
        game.teardown(&mut tl);
        assert!(tl.is_empty());
        assert!(game.targets().is_empty());
        assert_eq!(game.phase(), CatchPhase::Idle);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn resize_moves_hit_geometry() {
        let (mut game, _rx, tl, _) = session(7);
        let before = newest_center(&game, tl.now()).x;
        game.resize(720.0, 960.0);
        let after = newest_center(&game, tl.now()).x;
        assert!(after > before);
        game.resize(0.0, 10.0);
        assert!((game.arena().width - 720.0).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_settings_still_run_a_bounded_session() {
        let (tx, _rx) = mpsc::channel();
        let mut tl = Timeline::new(0);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let config = CatchConfig {
            spawn_left_span_pct: 0.0,
            spawn_interval_ms: 0,
            target_lifetime_ms: 0,
            ..CatchConfig::default()
        };
        let mut game = CatchSession::new(config, tx);
        game.start(&mut tl, &mut rng);
        assert!((game.targets()[0].left_pct - 5.0).abs() < f64::EPSILON);
        assert_eq!(tl.next_due(), Some(1));

        advance(&mut game, &mut tl, 50, &mut rng);
        assert_eq!(tl.now(), 50);
        assert!(game.targets().len() <= 1);
    }

    #[test]
    fn shipped_settings_validate() {
        assert!(CatchConfig::default().validate().is_ok());
        let broken = CatchConfig {
            spawn_left_span_pct: -1.0,
            ..CatchConfig::default()
        };
        assert!(matches!(broken.validate(), Err(FlowError::InvalidConfig(_))));
    }
}
