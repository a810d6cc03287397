//! The experience controller.
//!
//! [`Experience`] owns every component and the single [`Timeline`] they share.
//! The platform feeds it [`Input`]s and wall-clock time, executes the returned
//! [`Command`]s, renders from the accessors, and calls
//! [`Experience::advance`] whenever [`Experience::next_wake`] comes due.

use std::collections::{BTreeMap, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use smallvec::SmallVec;

use crate::answers::{Question, normalize};
use crate::audio::{AudioCommand, AudioFader, FadeDirection, FadeWake};
use crate::catch_game::{CatchSession, CatchWake, GameReport, Point};
use crate::config::{ExperienceConfig, Prompt};
use crate::credentials::CredentialStore;
use crate::decor::{Decor, DecorWake, ParticleField};
use crate::progress::{ExportDocument, ProgressRecord, ProgressStore};
use crate::reveal::{RevealSlot, RevealWake, Reveals};
use crate::screens::{FocusWake, InputId, Navigator, ScreenId};
use crate::script::{self, Beat};
use crate::storage::KeyValueStore;
use crate::timeline::{TimerId, Timeline};

/// Everything the platform can report.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Landing start button.
    Start,
    Submit { question: Question, answer: String },
    /// Q2 continue button.
    Continue,
    /// Pointer or touch in catch arena coordinates.
    Pointer(Point),
    ArenaResized { width: f64, height: f64 },
    OpenMessage,
    CloseMessage,
    ToggleMusic,
    Export,
    Replay,
    MusicReady,
    MusicFailed(String),
    PlaybackRejected(String),
}

/// Side effects the platform has to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Audio(AudioCommand),
    Focus(InputId),
    ClearInput(InputId),
    Download(ExportDocument),
}

pub type Commands = SmallVec<[Command; 4]>;

/// Position in the linear flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Landing,
    Q1Date,
    Q1Name,
    Unlock,
    Q2,
    Q3,
    MiniGame,
    Q4,
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub input_visible: bool,
    pub hint: Option<String>,
    pub shaking: bool,
    pub attempts: u32,
    pub solved: bool,
}

impl Default for QuestionView {
    fn default() -> Self {
        Self {
            input_visible: true,
            hint: None,
            shaking: false,
            attempts: 0,
            solved: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalView {
    pub armed: bool,
    pub modal_open: bool,
    pub badge_visible: bool,
    pub message_started: bool,
}

impl Default for FinalView {
    fn default() -> Self {
        Self {
            armed: false,
            modal_open: false,
            badge_visible: true,
            message_started: false,
        }
    }
}

/// In-memory counters. Reset on replay, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub q1_tries: u32,
    pub game_score: u32,
    pub game_time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Reveal(RevealWake),
    Fade(FadeWake),
    Focus(FocusWake),
    Decor(DecorWake),
    Catch(CatchWake),
    Music,
    Script,
    Unshake(Question),
}

impl From<RevealWake> for Wake {
    fn from(wake: RevealWake) -> Self {
        Self::Reveal(wake)
    }
}

impl From<FadeWake> for Wake {
    fn from(wake: FadeWake) -> Self {
        Self::Fade(wake)
    }
}

impl From<FocusWake> for Wake {
    fn from(wake: FocusWake) -> Self {
        Self::Focus(wake)
    }
}

impl From<DecorWake> for Wake {
    fn from(wake: DecorWake) -> Self {
        Self::Decor(wake)
    }
}

impl From<CatchWake> for Wake {
    fn from(wake: CatchWake) -> Self {
        Self::Catch(wake)
    }
}

pub struct Experience<S> {
    config: ExperienceConfig,
    credentials: CredentialStore<S>,
    progress: ProgressStore<S>,
    timeline: Timeline<Wake>,
    rng: ChaCha8Rng,
    navigator: Navigator,
    reveals: Reveals,
    audio: AudioFader,
    decor: Decor,
    game: Option<CatchSession>,
    reports_tx: Sender<GameReport>,
    reports_rx: Receiver<GameReport>,
    arena_size: Option<(f64, f64)>,
    questions: BTreeMap<Question, QuestionView>,
    unshake_timers: BTreeMap<Question, TimerId>,
    name_section_visible: bool,
    continue_visible: bool,
    game_reward: Option<String>,
    final_view: FinalView,
    tally: Tally,
    script: VecDeque<Beat>,
    script_timer: Option<TimerId>,
    awaiting: Option<RevealSlot>,
    music_timer: Option<TimerId>,
    music_retry: bool,
    outbox: Commands,
}

impl<S: KeyValueStore + Clone> Experience<S> {
    /// Build the controller on the landing screen with butterflies flying.
    pub fn new(store: S, config: ExperienceConfig, seed: u64, now: u64) -> Self {
        let (reports_tx, reports_rx) = mpsc::channel();
        let mut experience = Self {
            credentials: CredentialStore::new(store.clone()),
            progress: ProgressStore::new(store),
            timeline: Timeline::new(now),
            rng: ChaCha8Rng::seed_from_u64(seed),
            navigator: Navigator::default(),
            reveals: Reveals::default(),
            audio: AudioFader::default(),
            decor: Decor::default(),
            game: None,
            reports_tx,
            reports_rx,
            arena_size: None,
            questions: BTreeMap::new(),
            unshake_timers: BTreeMap::new(),
            name_section_visible: false,
            continue_visible: false,
            game_reward: None,
            final_view: FinalView::default(),
            tally: Tally::default(),
            script: VecDeque::new(),
            script_timer: None,
            awaiting: None,
            music_timer: None,
            music_retry: false,
            outbox: Commands::new(),
            config,
        };
        let landing = experience.config.effects.landing_ambient;
        experience
            .decor
            .start(ParticleField::Landing, landing, &mut experience.timeline);
        experience
    }

    /// Fire everything due by `now`, then apply `input`.
    pub fn handle(&mut self, input: Input, now: u64) -> Commands {
        self.pump(now);
        match input {
            Input::Start => self.start(),
            Input::Submit { question, answer } => self.submit(question, &answer),
            Input::Continue => {
                if self.navigator.is_active(ScreenId::Q2) && self.continue_visible {
                    self.continue_visible = false;
                    self.play(script::q2_continue(&self.config));
                }
            }
            Input::Pointer(at) => {
                if let Some(game) = self.game.as_mut() {
                    game.pointer(at, &mut self.timeline);
                }
            }
            Input::ArenaResized { width, height } => {
                self.arena_size = Some((width, height));
                if let Some(game) = self.game.as_mut() {
                    game.resize(width, height);
                }
            }
            Input::OpenMessage => self.open_message(),
            Input::CloseMessage => self.final_view.modal_open = false,
            Input::ToggleMusic => self.toggle_music(),
            Input::Export => self.export(),
            Input::Replay => self.replay(),
            Input::MusicReady => {
                self.audio.loaded();
                self.schedule_music(self.config.music.start_delay_ms);
            }
            Input::MusicFailed(reason) => {
                let err = self.audio.load_failed(reason);
                log::error!("Music load error: {err}");
            }
            Input::PlaybackRejected(reason) => {
                let err = self.audio.playback_rejected(reason, &mut self.timeline);
                log::error!("Music play error: {err}");
                self.retry_music();
            }
        }
        self.take_commands()
    }

    /// Fire everything due by `now`.
    pub fn advance(&mut self, now: u64) -> Commands {
        self.pump(now);
        self.take_commands()
    }

    /// When the platform should next call [`Experience::advance`].
    #[must_use]
    pub fn next_wake(&self) -> Option<u64> {
        self.timeline.next_due()
    }

    fn pump(&mut self, now: u64) {
        while let Some((_, wake)) = self.timeline.pop_due(now) {
            self.dispatch(wake);
        }
        self.timeline.settle(now);
    }

    fn dispatch(&mut self, wake: Wake) {
        match wake {
            Wake::Reveal(wake) => {
                if self.reveals.on_wake(wake, &mut self.timeline) {
                    self.on_reveal_complete(wake.0);
                }
            }
            Wake::Fade(wake) => {
                if self.audio.on_wake(wake, &mut self.timeline) == Some(FadeDirection::In) {
                    self.music_retry = false;
                }
            }
            Wake::Focus(wake) => {
                let input = self.navigator.on_wake(wake);
                self.outbox.push(Command::Focus(input));
            }
            Wake::Decor(wake) => self.decor.on_wake(wake, &mut self.timeline, &mut self.rng),
            Wake::Catch(wake) => {
                if let Some(game) = self.game.as_mut() {
                    game.on_wake(wake, &mut self.timeline, &mut self.rng);
                }
                while let Ok(report) = self.reports_rx.try_recv() {
                    self.on_game_complete(report);
                }
            }
            Wake::Music => {
                self.music_timer = None;
                self.start_music();
            }
            Wake::Script => {
                self.script_timer = None;
                self.run_script();
            }
            Wake::Unshake(question) => {
                self.unshake_timers.remove(&question);
                self.view_mut(question).shaking = false;
            }
        }
    }

    fn take_commands(&mut self) -> Commands {
        let audio = self.audio.drain_commands();
        self.outbox.extend(audio.into_iter().map(Command::Audio));
        std::mem::take(&mut self.outbox)
    }

    fn start(&mut self) {
        if !self.navigator.is_active(ScreenId::Landing) {
            return;
        }
        self.audio.unlock();
        let now = self.timeline.now();
        let src = self.audio.load(&self.config.music.track, now, &mut self.rng);
        log::debug!("loading music from {src}");
        self.music_retry = true;
        self.play(script::start(&self.config));
    }

    fn schedule_music(&mut self, delay_ms: u64) {
        if let Some(timer) = self.music_timer.take() {
            self.timeline.cancel(timer);
        }
        self.music_timer = Some(self.timeline.schedule(delay_ms, Wake::Music));
    }

    fn start_music(&mut self) {
        let music = &self.config.music;
        if let Err(err) = self
            .audio
            .resume(music.landing_volume, music.fade_in_ms, &mut self.timeline)
        {
            log::error!("Music play error: {err}");
            self.retry_music();
        }
    }

    fn retry_music(&mut self) {
        if self.music_retry {
            self.music_retry = false;
            self.schedule_music(self.config.music.retry_delay_ms);
        }
    }

    fn toggle_music(&mut self) {
        let music = &self.config.music;
        if self.music_playing() {
            self.audio.fade_out(music.fade_out_ms, &mut self.timeline);
        } else if let Err(err) =
            self.audio
                .resume(music.toggle_volume, music.fade_in_ms, &mut self.timeline)
        {
            log::error!("Music toggle error: {err}");
        }
    }

    fn submit(&mut self, question: Question, answer: &str) {
        if !self.accepting(question) {
            log::debug!("ignoring {question:?} answer: input not active");
            return;
        }
        self.outbox.push(Command::ClearInput(question.input()));
        if question.accepts(answer) {
            self.on_correct(question, &normalize(answer));
        } else {
            self.on_wrong(question);
        }
    }

    fn accepting(&self, question: Question) -> bool {
        let view = self.question(question);
        self.navigator.is_active(question.screen())
            && view.input_visible
            && !view.solved
            && (question != Question::Q1Name || self.name_section_visible)
    }

    fn on_wrong(&mut self, question: Question) {
        if matches!(question, Question::Q1Date | Question::Q1Name) {
            self.tally.q1_tries += 1;
        }
        let hint = self.prompt(question).hint.clone();
        let view = self.view_mut(question);
        view.attempts += 1;
        view.hint = Some(hint);
        view.shaking = true;
        if let Some(timer) = self.unshake_timers.remove(&question) {
            self.timeline.cancel(timer);
        }
        let timer = self
            .timeline
            .schedule(self.config.timing.shake_ms, Wake::Unshake(question));
        self.unshake_timers.insert(question, timer);
        log::debug!("{question:?} rejected");
    }

    fn on_correct(&mut self, question: Question, answer: &str) {
        let view = self.view_mut(question);
        view.hint = None;
        view.input_visible = false;
        view.solved = true;
        log::info!("{question:?} accepted");
        let beats = match question {
            Question::Q1Date => script::q1_date_solved(&self.config),
            Question::Q1Name => script::q1_name_solved(&self.config),
            Question::Q2 => script::q2_solved(&self.config, answer),
            Question::Q3 => script::q3_solved(&self.config, answer),
            Question::Q4 => script::q4_solved(&self.config, answer),
        };
        self.play(beats);
    }

    fn on_game_complete(&mut self, report: GameReport) {
        log::info!(
            "catch game reported {} in {} ms",
            report.catch_count,
            report.elapsed_ms
        );
        self.tally.game_score = report.catch_count;
        self.tally.game_time_ms = report.elapsed_ms;
        self.play(script::game_complete(&self.config, report));
    }

    fn open_message(&mut self) {
        if !self.navigator.is_active(ScreenId::Final) || !self.final_view.armed {
            return;
        }
        self.final_view.modal_open = true;
        if self.final_view.message_started {
            return;
        }
        self.final_view.message_started = true;
        let per_char = self.config.timing.final_reveal_char_ms;
        if self.reveals.start(
            RevealSlot::FinalTypewriter,
            &self.config.messages.final_message,
            per_char,
            &mut self.timeline,
        ) {
            self.final_view.badge_visible = false;
        }
    }

    fn export(&mut self) {
        match self.progress.export(self.timeline.now()) {
            Some(doc) => {
                log::info!("exporting progress as {}", doc.filename);
                self.outbox.push(Command::Download(doc));
            }
            None => log::info!("no progress to export"),
        }
    }

    fn replay(&mut self) {
        log::info!("replay requested");
        self.clear_script();
        if let Some(timer) = self.music_timer.take() {
            self.timeline.cancel(timer);
        }
        self.music_retry = false;
        self.audio
            .fade_out(self.config.music.fade_out_ms, &mut self.timeline);
        self.decor.stop_all(&mut self.timeline);
        self.decor.clear_vectors();
        self.teardown_game();
        self.reveals.clear_all(&mut self.timeline);
        for (_, timer) in std::mem::take(&mut self.unshake_timers) {
            self.timeline.cancel(timer);
        }
        self.questions.clear();
        self.name_section_visible = false;
        self.continue_visible = false;
        self.game_reward = None;
        self.final_view = FinalView::default();
        self.tally = Tally::default();
        self.play(script::replay(&self.config));
    }

    fn on_reveal_complete(&mut self, slot: RevealSlot) {
        if slot == RevealSlot::FinalTypewriter {
            self.final_view.badge_visible = false;
        }
        if self.awaiting == Some(slot) {
            self.awaiting = None;
            self.run_script();
        }
    }

    fn clear_script(&mut self) {
        self.script.clear();
        self.awaiting = None;
        if let Some(timer) = self.script_timer.take() {
            self.timeline.cancel(timer);
        }
    }

    /// Replace the running script with `beats` and run it.
    fn play(&mut self, beats: Vec<Beat>) {
        self.clear_script();
        self.script.extend(beats);
        self.run_script();
    }

    fn run_script(&mut self) {
        while let Some(beat) = self.script.pop_front() {
            match beat {
                Beat::Persist(fields) => {
                    self.progress.append(fields, self.timeline.now());
                }
                Beat::Reveal {
                    slot,
                    text,
                    per_char_ms,
                    wait,
                } => {
                    let done = self
                        .reveals
                        .start(slot, &text, per_char_ms, &mut self.timeline);
                    if wait && !done {
                        self.awaiting = Some(slot);
                        return;
                    }
                }
                Beat::Burst(field, spec) => {
                    self.decor.burst(
                        field,
                        spec.count,
                        &spec.color,
                        &mut self.timeline,
                        &mut self.rng,
                    );
                }
                Beat::Vector(slot, path, options) => self.decor.load_vector(slot, &path, options),
                Beat::Show(screen) => self.show(screen),
                Beat::Ambient(field, spec) => self.decor.start(field, spec, &mut self.timeline),
                Beat::Pause(ms) => {
                    self.script_timer = Some(self.timeline.schedule(ms, Wake::Script));
                    return;
                }
                Beat::NameSection => {
                    self.name_section_visible = true;
                    self.navigator.focus_later(
                        InputId::Q1Name,
                        &mut self.timeline,
                        self.config.timing.focus_delay_ms,
                    );
                }
                Beat::ShowContinue => self.continue_visible = true,
                Beat::StartGame => self.start_game(),
                Beat::GameReward(text) => self.game_reward = Some(text),
                Beat::MarkFinalRevealed => {
                    self.progress.mark_final_revealed();
                }
                Beat::ArmModal => self.final_view.armed = true,
            }
        }
    }

    /// Activate `to`. Leaving a screen stops its reveals and ambient stream
    /// and tears down the catch session.
    fn show(&mut self, to: ScreenId) {
        let change = self
            .navigator
            .show(to, &mut self.timeline, self.config.timing.focus_delay_ms);
        if change.from == change.to {
            return;
        }
        self.reveals.cancel_screen(change.from, &mut self.timeline);
        self.decor.stop_screen(change.from, &mut self.timeline);
        if change.from == ScreenId::Game {
            self.teardown_game();
        }
    }

    fn start_game(&mut self) {
        self.teardown_game();
        let mut game = CatchSession::new(self.config.catch_game.clone(), self.reports_tx.clone());
        if let Some((width, height)) = self.arena_size {
            game.resize(width, height);
        }
        game.start(&mut self.timeline, &mut self.rng);
        self.game = Some(game);
    }

    fn teardown_game(&mut self) {
        if let Some(mut game) = self.game.take() {
            game.teardown(&mut self.timeline);
        }
        while self.reports_rx.try_recv().is_ok() {}
    }

    fn prompt(&self, question: Question) -> &Prompt {
        let messages = &self.config.messages;
        match question {
            Question::Q1Date => &messages.q1_date,
            Question::Q1Name => &messages.q1_name,
            Question::Q2 => &messages.q2,
            Question::Q3 => &messages.q3,
            Question::Q4 => &messages.q4,
        }
    }

    fn view_mut(&mut self, question: Question) -> &mut QuestionView {
        self.questions.entry(question).or_default()
    }

    // ----- view accessors ------------------------------------------------

    #[must_use]
    pub const fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    #[must_use]
    pub const fn now(&self) -> u64 {
        self.timeline.now()
    }

    #[must_use]
    pub const fn screen(&self) -> ScreenId {
        self.navigator.current()
    }

    #[must_use]
    pub fn step(&self) -> Step {
        match self.navigator.current() {
            ScreenId::Landing => Step::Landing,
            ScreenId::Q1 if self.name_section_visible => Step::Q1Name,
            ScreenId::Q1 => Step::Q1Date,
            ScreenId::Unlock => Step::Unlock,
            ScreenId::Q2 => Step::Q2,
            ScreenId::Q3 => Step::Q3,
            ScreenId::Game => Step::MiniGame,
            ScreenId::Q4 => Step::Q4,
            ScreenId::Final => Step::Final,
        }
    }

    #[must_use]
    pub fn question(&self, question: Question) -> QuestionView {
        self.questions.get(&question).cloned().unwrap_or_default()
    }

    #[must_use]
    pub const fn name_section_visible(&self) -> bool {
        self.name_section_visible
    }

    #[must_use]
    pub const fn continue_visible(&self) -> bool {
        self.continue_visible
    }

    #[must_use]
    pub fn game_reward(&self) -> Option<&str> {
        self.game_reward.as_deref()
    }

    #[must_use]
    pub const fn final_view(&self) -> &FinalView {
        &self.final_view
    }

    #[must_use]
    pub const fn tally(&self) -> Tally {
        self.tally
    }

    #[must_use]
    pub const fn reveals(&self) -> &Reveals {
        &self.reveals
    }

    #[must_use]
    pub const fn decor(&self) -> &Decor {
        &self.decor
    }

    #[must_use]
    pub const fn audio(&self) -> &AudioFader {
        &self.audio
    }

    #[must_use]
    pub const fn game(&self) -> Option<&CatchSession> {
        self.game.as_ref()
    }

    /// Whether the script is waiting on a reveal or a pause.
    #[must_use]
    pub const fn script_pending(&self) -> bool {
        self.awaiting.is_some() || self.script_timer.is_some()
    }

    #[must_use]
    pub fn music_playing(&self) -> bool {
        self.audio.is_playing() && self.audio.fading() != Some(FadeDirection::Out)
    }

    #[must_use]
    pub fn music_label(&self) -> &'static str {
        if self.music_playing() {
            "Pause Music"
        } else {
            "Play Music"
        }
    }

    /// Nickname greeted on the landing screen.
    #[must_use]
    pub fn greeting(&self) -> String {
        self.credentials.nickname()
    }

    #[must_use]
    pub const fn credentials(&self) -> &CredentialStore<S> {
        &self.credentials
    }

    #[must_use]
    pub fn progress(&self) -> Option<ProgressRecord> {
        self.progress.load()
    }

    /// Pending timers matching `pred`. Used by leak checks.
    pub fn pending_where(&self, pred: impl Fn(&Wake) -> bool) -> usize {
        self.timeline.count_where(pred)
    }
}
