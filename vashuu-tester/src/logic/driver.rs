//! Headless driver: an [`Experience`] on a virtual clock.

use anyhow::{Result, bail, ensure};
use rand::Rng;
use vashuu_game::{
    AudioCommand, CatchPhase, Command, Experience, ExperienceConfig, Input, MemoryStore, Point,
    Question, ScreenId,
};

pub const START_MS: u64 = 1_700_000_000_000;
const SETTLE_SLICE_MS: u64 = 20;

pub struct Driver {
    experience: Experience<MemoryStore>,
    store: MemoryStore,
    commands: Vec<Command>,
}

impl Driver {
    pub fn new(config: ExperienceConfig, seed: u64) -> Self {
        let store = MemoryStore::new();
        Self {
            experience: Experience::new(store.clone(), config, seed, START_MS),
            store,
            commands: Vec::new(),
        }
    }

    pub const fn experience(&self) -> &Experience<MemoryStore> {
        &self.experience
    }

    pub const fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Every command emitted so far.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn audio_count(&self, command: &AudioCommand) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Audio(a) if a == command))
            .count()
    }

    pub fn input(&mut self, input: Input) {
        let now = self.experience.now();
        let out = self.experience.handle(input, now);
        self.commands.extend(out);
    }

    pub fn submit(&mut self, question: Question, answer: &str) {
        self.input(Input::Submit {
            question,
            answer: answer.to_string(),
        });
    }

    /// Advance virtual time by `ms`, firing due wakes in order.
    pub fn settle(&mut self, ms: u64) {
        let until = self.experience.now() + ms;
        while let Some(due) = self.experience.next_wake().filter(|due| *due <= until) {
            let out = self.experience.advance(due);
            self.commands.extend(out);
        }
        let out = self.experience.advance(until);
        self.commands.extend(out);
    }

    pub fn settle_until(&mut self, screen: ScreenId, limit_ms: u64) -> Result<()> {
        let limit = self.experience.now() + limit_ms;
        while self.experience.screen() != screen {
            if self.experience.now() >= limit {
                bail!(
                    "expected {screen} within {limit_ms} ms, still on {}",
                    self.experience.screen()
                );
            }
            self.settle(SETTLE_SLICE_MS);
        }
        Ok(())
    }

    /// Play the catch game, tapping the newest heart each tick and missing
    /// with probability `miss_chance`.
    pub fn play_catch(&mut self, rng: &mut impl Rng, miss_chance: f64) -> Result<()> {
        let limit = self.experience.now() + 120_000;
        while self
            .experience
            .game()
            .is_some_and(|game| game.phase() == CatchPhase::Active)
        {
            ensure!(self.experience.now() < limit, "catch game never finished");
            let now = self.experience.now();
            let newest = self
                .experience
                .game()
                .and_then(|game| game.positions(now).last().map(|(_, point)| point));
            if let Some(point) = newest {
                let at = if rng.gen_bool(miss_chance) {
                    Point::new(point.x + 500.0, point.y + 500.0)
                } else {
                    Point::new(
                        point.x + rng.gen_range(-20.0..20.0),
                        point.y + rng.gen_range(-20.0..20.0),
                    )
                };
                self.input(Input::Pointer(at));
            }
            self.settle(100);
        }
        Ok(())
    }

    /// Landing through Q2.
    pub fn reach_q2(&mut self) -> Result<()> {
        self.input(Input::Start);
        self.submit(Question::Q1Date, "14/10");
        self.settle(200);
        self.submit(Question::Q1Name, "queen");
        self.settle_until(ScreenId::Q2, 15_000)
    }

    /// Q2 through the start of the catch game.
    pub fn reach_game(&mut self) -> Result<()> {
        self.submit(Question::Q2, "melt");
        let limit = self.experience.now() + 15_000;
        while !self.experience.continue_visible() {
            ensure!(self.experience.now() < limit, "continue button never appeared");
            self.settle(SETTLE_SLICE_MS);
        }
        self.input(Input::Continue);
        self.submit(Question::Q3, "sunflower");
        self.settle_until(ScreenId::Game, 15_000)
    }

    /// Landing to the final screen with a perfect catch game.
    pub fn play_through(&mut self, rng: &mut impl Rng) -> Result<()> {
        self.reach_q2()?;
        self.reach_game()?;
        self.play_catch(rng, 0.0)?;
        self.settle_until(ScreenId::Q4, 10_000)?;
        self.submit(Question::Q4, "your kisses");
        self.settle_until(ScreenId::Final, 20_000)
    }
}
