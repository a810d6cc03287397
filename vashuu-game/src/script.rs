//! Step scripts: the beats each flow transition plays, in order.
//!
//! A script runs beat by beat until it reaches one that has to wait (an
//! awaited reveal or a pause); the controller resumes it when that finishes.

use serde_json::json;

use crate::catch_game::GameReport;
use crate::config::{BurstSpec, ExperienceConfig};
use crate::decor::{AmbientSpec, ParticleField, VectorOptions, VectorSlot};
use crate::progress::{StepFields, step_fields};
use crate::reveal::RevealSlot;
use crate::screens::ScreenId;

#[derive(Debug, Clone, PartialEq)]
pub enum Beat {
    Persist(StepFields),
    Reveal {
        slot: RevealSlot,
        text: String,
        per_char_ms: u64,
        wait: bool,
    },
    Burst(ParticleField, BurstSpec),
    Vector(VectorSlot, String, VectorOptions),
    Show(ScreenId),
    Ambient(ParticleField, AmbientSpec),
    Pause(u64),
    NameSection,
    ShowContinue,
    StartGame,
    GameReward(String),
    MarkFinalRevealed,
    ArmModal,
}

impl Beat {
    fn reveal(slot: RevealSlot, text: &str, per_char_ms: u64, wait: bool) -> Self {
        Self::Reveal {
            slot,
            text: text.to_string(),
            per_char_ms,
            wait,
        }
    }

    fn enter(screen: ScreenId, ambient: AmbientSpec) -> [Self; 2] {
        [
            Self::Show(screen),
            Self::Ambient(ParticleField::for_screen(screen), ambient),
        ]
    }
}

pub fn start(cfg: &ExperienceConfig) -> Vec<Beat> {
    Beat::enter(ScreenId::Q1, cfg.effects.q1_ambient).into()
}

pub fn q1_date_solved(cfg: &ExperienceConfig) -> Vec<Beat> {
    vec![
        Beat::Burst(ParticleField::Q1, cfg.effects.q1_burst.clone()),
        Beat::NameSection,
        Beat::reveal(
            RevealSlot::Q1Message,
            &cfg.messages.q1_date.reward,
            cfg.timing.reveal_char_ms,
            false,
        ),
    ]
}

pub fn q1_name_solved(cfg: &ExperienceConfig) -> Vec<Beat> {
    let mut beats = vec![
        Beat::Persist(step_fields(json!({"step": 1, "date": "14/10", "name": "queen"}))),
        Beat::reveal(
            RevealSlot::Q1NameMessage,
            &cfg.messages.q1_name.reward,
            cfg.timing.reveal_char_ms,
            true,
        ),
        Beat::Burst(ParticleField::Unlock, cfg.effects.unlock_burst.clone()),
        Beat::Vector(
            VectorSlot::UnlockHearts,
            cfg.assets.hearts_bottom.clone(),
            VectorOptions::once(),
        ),
    ];
    beats.extend(Beat::enter(ScreenId::Unlock, cfg.effects.unlock_ambient));
    beats.push(Beat::Pause(cfg.timing.unlock_hold_ms));
    beats.extend(Beat::enter(ScreenId::Q2, cfg.effects.q2_ambient));
    beats
}

pub fn q2_solved(cfg: &ExperienceConfig, answer: &str) -> Vec<Beat> {
    vec![
        Beat::Persist(step_fields(json!({"step": 2, "answer": answer}))),
        Beat::reveal(
            RevealSlot::Q2Message,
            &cfg.messages.q2.reward,
            cfg.timing.reveal_char_ms,
            true,
        ),
        Beat::Burst(ParticleField::Q2, cfg.effects.q2_burst.clone()),
        Beat::Vector(
            VectorSlot::Q2Pulse,
            cfg.assets.heart_pulse.clone(),
            VectorOptions::once(),
        ),
        Beat::ShowContinue,
    ]
}

pub fn q2_continue(cfg: &ExperienceConfig) -> Vec<Beat> {
    let mut beats: Vec<Beat> = Beat::enter(ScreenId::Q3, cfg.effects.q3_ambient).into();
    beats.push(Beat::Vector(
        VectorSlot::Q3Rose,
        cfg.assets.rose.clone(),
        VectorOptions::looping(),
    ));
    beats
}

pub fn q3_solved(cfg: &ExperienceConfig, answer: &str) -> Vec<Beat> {
    let mut beats = vec![
        Beat::Persist(step_fields(json!({"step": 3, "answer": answer}))),
        Beat::reveal(
            RevealSlot::Q3Message,
            &cfg.messages.q3.reward,
            cfg.timing.reveal_char_ms,
            true,
        ),
        Beat::Burst(ParticleField::Q3, cfg.effects.q3_burst.clone()),
        Beat::Pause(cfg.timing.q3_settle_ms),
    ];
    beats.extend(Beat::enter(ScreenId::Game, cfg.effects.game_ambient));
    beats.push(Beat::StartGame);
    beats
}

pub fn game_complete(cfg: &ExperienceConfig, report: GameReport) -> Vec<Beat> {
    let mut beats = vec![
        Beat::GameReward(cfg.messages.game_reward.clone()),
        Beat::Vector(
            VectorSlot::GameBunny,
            cfg.assets.squeeze_bunny.clone(),
            VectorOptions::once(),
        ),
        Beat::Persist(step_fields(json!({
            "step": 4,
            "gameScore": report.catch_count,
            "time": report.elapsed_ms,
        }))),
        Beat::Burst(ParticleField::Game, cfg.effects.game_burst.clone()),
        Beat::Pause(cfg.timing.game_settle_ms),
    ];
    beats.extend(Beat::enter(ScreenId::Q4, cfg.effects.q4_ambient));
    beats
}

pub fn q4_solved(cfg: &ExperienceConfig, answer: &str) -> Vec<Beat> {
    let mut beats = vec![
        Beat::Persist(step_fields(json!({"step": 5, "answer": answer}))),
        Beat::Vector(VectorSlot::Q4Rose, cfg.assets.rose2.clone(), VectorOptions::looping()),
        Beat::reveal(
            RevealSlot::Q4Typewriter,
            &cfg.messages.q4.reward,
            cfg.timing.reveal_char_ms,
            true,
        ),
        Beat::Burst(ParticleField::Q4, cfg.effects.q4_burst.clone()),
        Beat::Pause(cfg.timing.q4_settle_ms),
        Beat::Show(ScreenId::Final),
        Beat::Vector(
            VectorSlot::FinalHeartPulse,
            cfg.assets.heart_pulse.clone(),
            VectorOptions::looping(),
        ),
        Beat::Vector(
            VectorSlot::FinalSqueezeBunny,
            cfg.assets.squeeze_bunny.clone(),
            VectorOptions::looping(),
        ),
        Beat::Ambient(ParticleField::Final, cfg.effects.final_ambient),
    ];
    beats.extend([Beat::MarkFinalRevealed, Beat::ArmModal]);
    beats
}

pub fn replay(cfg: &ExperienceConfig) -> Vec<Beat> {
    Beat::enter(ScreenId::Landing, cfg.effects.landing_ambient).into()
}
