//! Render snapshot of an [`Experience`].
//!
//! Pages never touch the controller; they render from an [`ExperienceView`]
//! captured after every input and wake. That keeps them renderable on the
//! server for tests.

use std::collections::BTreeMap;
use std::rc::Rc;

use vashuu_game::{
    Burst, CatchPhase, Experience, FinalView, KeyValueStore, Particle, ParticleField, Question,
    QuestionView, RevealSlot, RevealState, ScreenId, VectorAnimation, VectorSlot,
};

#[derive(Debug, Clone, PartialEq)]
pub struct TargetView {
    pub id: u64,
    pub left_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameView {
    pub phase: CatchPhase,
    pub score_label: String,
    pub targets: Vec<TargetView>,
    pub lifetime_ms: u64,
    pub target_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceView {
    pub screen: ScreenId,
    pub greeting: String,
    pub questions: BTreeMap<Question, QuestionView>,
    pub name_section_visible: bool,
    pub continue_visible: bool,
    pub reveals: BTreeMap<RevealSlot, RevealState>,
    pub particles: BTreeMap<ParticleField, Vec<Particle>>,
    pub bursts: Vec<Burst>,
    pub vectors: BTreeMap<VectorSlot, VectorAnimation>,
    pub game: Option<GameView>,
    pub game_reward: Option<String>,
    pub final_view: FinalView,
    pub music_label: &'static str,
}

impl ExperienceView {
    #[must_use]
    pub fn capture<S: KeyValueStore + Clone>(experience: &Experience<S>) -> Rc<Self> {
        let reveals = experience.reveals();
        let decor = experience.decor();
        let game = experience.game().map(|session| GameView {
            phase: session.phase(),
            score_label: session.score_label(),
            targets: session
                .targets()
                .iter()
                .map(|target| TargetView {
                    id: target.id,
                    left_pct: target.left_pct,
                })
                .collect(),
            lifetime_ms: session.config().target_lifetime_ms,
            target_size: session.arena().target_size,
        });

        Rc::new(Self {
            screen: experience.screen(),
            greeting: experience.greeting(),
            questions: Question::ALL
                .into_iter()
                .map(|question| (question, experience.question(question)))
                .collect(),
            name_section_visible: experience.name_section_visible(),
            continue_visible: experience.continue_visible(),
            reveals: RevealSlot::ALL
                .into_iter()
                .filter_map(|slot| reveals.state(slot).map(|state| (slot, state.clone())))
                .collect(),
            particles: ParticleField::ALL
                .into_iter()
                .map(|field| (field, decor.particles(field).to_vec()))
                .filter(|(_, particles)| !particles.is_empty())
                .collect(),
            bursts: decor.bursts().cloned().collect(),
            vectors: VectorSlot::ALL
                .into_iter()
                .filter_map(|slot| decor.vector(slot).map(|anim| (slot, anim.clone())))
                .collect(),
            game,
            game_reward: experience.game_reward().map(str::to_string),
            final_view: experience.final_view().clone(),
            music_label: experience.music_label(),
        })
    }

    #[must_use]
    pub fn question(&self, question: Question) -> QuestionView {
        self.questions.get(&question).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn reveal(&self, slot: RevealSlot) -> Option<&RevealState> {
        self.reveals.get(&slot)
    }

    #[must_use]
    pub fn particles(&self, field: ParticleField) -> &[Particle] {
        self.particles.get(&field).map_or(&[], Vec::as_slice)
    }

    pub fn bursts_in(&self, field: ParticleField) -> impl Iterator<Item = &Burst> {
        self.bursts.iter().filter(move |burst| burst.field == field)
    }

    #[must_use]
    pub fn vector(&self, slot: VectorSlot) -> Option<&VectorAnimation> {
        self.vectors.get(&slot)
    }

    #[must_use]
    pub fn is_active(&self, screen: ScreenId) -> bool {
        self.screen == screen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vashuu_game::{ExperienceConfig, Input, MemoryStore};

    const T0: u64 = 1_700_000_000_000;

    #[test]
    fn fresh_capture_shows_landing_with_butterflies() {
        let exp = Experience::new(MemoryStore::new(), ExperienceConfig::default(), 3, T0);
        let view = ExperienceView::capture(&exp);
        assert_eq!(view.screen, ScreenId::Landing);
        assert_eq!(view.greeting, "vashuu");
        assert!(view.game.is_none());
        assert!(view.question(Question::Q2).input_visible);
        assert_eq!(view.music_label, "Play Music");
    }

    #[test]
    fn capture_follows_the_controller() {
        let mut exp = Experience::new(MemoryStore::new(), ExperienceConfig::default(), 3, T0);
        exp.handle(Input::Start, T0);
        exp.handle(
            Input::Submit {
                question: Question::Q1Date,
                answer: "nope".to_string(),
            },
            T0 + 10,
        );
        let view = ExperienceView::capture(&exp);
        assert!(view.is_active(ScreenId::Q1));
        assert!(view.question(Question::Q1Date).hint.is_some());
        assert!(!view.name_section_visible);
    }
}
