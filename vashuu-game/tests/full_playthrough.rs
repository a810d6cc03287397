use serde_json::json;
use vashuu_game::{
    CatchPhase, Command, Experience, ExperienceConfig, Input, InputId, MemoryStore,
    ParticleField, Question, RevealSlot, ScreenId, Step, VectorSlot, Wake,
    catch_game::CatchWake, constants::PROGRESS_KEY, decor::DecorWake,
};

const T0: u64 = 1_700_000_000_000;

fn load_config() -> ExperienceConfig {
    ExperienceConfig::from_json(include_str!(
        "../../vashuu-web/static/assets/data/experience.json"
    ))
    .unwrap()
}

fn experience(store: MemoryStore) -> Experience<MemoryStore> {
    Experience::new(store, load_config(), 7, T0)
}

fn submit(exp: &mut Experience<MemoryStore>, question: Question, answer: &str) -> Vec<Command> {
    let now = exp.now();
    exp.handle(
        Input::Submit {
            question,
            answer: answer.to_string(),
        },
        now,
    )
    .into_vec()
}

/// Run virtual time forward by `ms`, firing every due timer in order.
fn settle(exp: &mut Experience<MemoryStore>, ms: u64) -> Vec<Command> {
    let until = exp.now() + ms;
    let mut out = Vec::new();
    while let Some(due) = exp.next_wake().filter(|due| *due <= until) {
        out.extend(exp.advance(due));
    }
    out.extend(exp.advance(until));
    out
}

/// Run until `screen` is active or `limit_ms` of virtual time has passed.
fn settle_until(exp: &mut Experience<MemoryStore>, screen: ScreenId, limit_ms: u64) {
    let limit = exp.now() + limit_ms;
    while exp.screen() != screen && exp.now() < limit {
        settle(exp, 10);
    }
    assert_eq!(exp.screen(), screen, "timed out waiting for {screen}");
}

fn play_catch_game(exp: &mut Experience<MemoryStore>) {
    let limit = exp.now() + 60_000;
    while exp.game().is_some_and(|game| game.phase() == CatchPhase::Active) {
        assert!(exp.now() < limit, "catch game never finished");
        let now = exp.now();
        let newest = exp
            .game()
            .and_then(|game| game.positions(now).last().map(|(_, point)| point));
        if let Some(point) = newest {
            exp.handle(Input::Pointer(point), now);
        }
        settle(exp, 100);
    }
}

fn reach_q2(exp: &mut Experience<MemoryStore>) {
    exp.handle(Input::Start, T0);
    submit(exp, Question::Q1Date, "the day we met");
    submit(exp, Question::Q1Name, "Queen");
    settle_until(exp, ScreenId::Q2, 10_000);
}

#[test]
fn date_then_name_unlocks_and_moves_to_q2() {
    let store = MemoryStore::new();
    let mut exp = experience(store.clone());
    exp.handle(Input::Start, T0);

    let commands = submit(&mut exp, Question::Q1Date, "the day we met");
    assert!(commands.contains(&Command::ClearInput(InputId::Q1Date)));
    assert!(!exp.question(Question::Q1Date).input_visible);
    assert!(exp.name_section_visible());
    assert_eq!(exp.step(), Step::Q1Name);
    assert!(exp.reveals().is_running(RevealSlot::Q1Message));
    assert!(exp.decor().bursts_in(ParticleField::Q1).count() == 1);
    let focus = settle(&mut exp, 50);
    assert!(focus.contains(&Command::Focus(InputId::Q1Name)));

    submit(&mut exp, Question::Q1Name, "Queen");
    let record = exp.progress().unwrap();
    assert_eq!(record.steps.len(), 1);
    assert_eq!(record.steps[0].fields["step"], json!(1));
    assert_eq!(record.steps[0].fields["name"], json!("queen"));
    assert_eq!(exp.screen(), ScreenId::Q1);

    settle_until(&mut exp, ScreenId::Unlock, 5_000);
    assert_eq!(exp.reveals().text(RevealSlot::Q1NameMessage), "You are my queen.");
    assert!(exp.decor().vector(VectorSlot::UnlockHearts).is_some());
    let unlocked_at = exp.now();

    settle_until(&mut exp, ScreenId::Q2, 2_000);
    assert!(exp.now() - unlocked_at >= 800);
    assert!(exp.decor().is_streaming(ParticleField::Q2));
    assert!(!exp.decor().is_streaming(ParticleField::Unlock));
    assert!(store.raw(PROGRESS_KEY).is_some());
}

#[test]
fn wrong_q2_answer_changes_nothing_but_the_hint() {
    let mut exp = experience(MemoryStore::new());
    reach_q2(&mut exp);
    let before = exp.progress().unwrap().steps.len();

    let commands = submit(&mut exp, Question::Q2, "banana");
    assert!(commands.contains(&Command::ClearInput(InputId::Q2)));
    let view = exp.question(Question::Q2);
    assert_eq!(view.hint.as_deref(), Some("Try again, baby! 💕"));
    assert!(view.input_visible);
    settle(&mut exp, 5_000);
    assert_eq!(exp.screen(), ScreenId::Q2);
    assert_eq!(exp.progress().unwrap().steps.len(), before);
    assert!(exp.reveals().is_blank(RevealSlot::Q2Message));
}

#[test]
fn full_playthrough_reaches_final_and_reveals_message_once() {
    let store = MemoryStore::new();
    let mut exp = experience(store);
    reach_q2(&mut exp);

    submit(&mut exp, Question::Q2, "you melt me");
    assert!(!exp.continue_visible());
    settle(&mut exp, 5_000);
    assert!(exp.continue_visible());
    assert_eq!(exp.screen(), ScreenId::Q2);
    exp.handle(Input::Continue, exp.now());
    assert_eq!(exp.screen(), ScreenId::Q3);
    assert!(exp.decor().vector(VectorSlot::Q3Rose).is_some());

    submit(&mut exp, Question::Q3, "Sunflowers");
    settle_until(&mut exp, ScreenId::Game, 10_000);
    assert!(exp.game().is_some());

    play_catch_game(&mut exp);
    settle_until(&mut exp, ScreenId::Q4, 5_000);
    assert_eq!(exp.game_reward(), Some("You're amazing, pookie!"));
    assert_eq!(exp.tally().game_score, 10);
    assert!(exp.game().is_none());
    assert_eq!(exp.pending_where(|w| matches!(w, Wake::Catch(_))), 0);

    submit(&mut exp, Question::Q4, "your kisses");
    settle_until(&mut exp, ScreenId::Final, 15_000);
    assert_eq!(
        exp.reveals().state(RevealSlot::Q4Typewriter).unwrap().lines.len(),
        2
    );

    let record = exp.progress().unwrap();
    let steps: Vec<u64> = record.steps.iter().filter_map(|s| s.step()).collect();
    assert_eq!(steps, vec![1, 2, 3, 4, 5]);
    assert!(record.final_revealed);
    assert!(record.steps.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(record.steps[3].fields["gameScore"], json!(10));

    assert!(exp.final_view().armed);
    assert!(exp.final_view().badge_visible);
    exp.handle(Input::OpenMessage, exp.now());
    assert!(exp.final_view().modal_open);
    settle(&mut exp, 20_000);
    assert!(!exp.final_view().badge_visible);
    let message = exp.reveals().text(RevealSlot::FinalTypewriter);
    assert_eq!(message, load_config().messages.final_message);

    exp.handle(Input::CloseMessage, exp.now());
    exp.handle(Input::OpenMessage, exp.now());
    assert!(!exp.reveals().is_running(RevealSlot::FinalTypewriter));

    let commands = exp.handle(Input::Export, exp.now());
    let Some(Command::Download(doc)) = commands.first() else {
        panic!("export should produce a download");
    };
    assert!(doc.filename.starts_with("vashuu_progress_"));
    assert!(doc.contents.contains("\"finalRevealed\": true"));
}

#[test]
fn replay_returns_to_landing_and_keeps_progress() {
    let mut exp = experience(MemoryStore::new());
    reach_q2(&mut exp);
    submit(&mut exp, Question::Q2, "melt");
    settle(&mut exp, 200);

    exp.handle(Input::Replay, exp.now());
    assert_eq!(exp.screen(), ScreenId::Landing);
    assert!(!exp.script_pending());
    assert!(exp.decor().is_streaming(ParticleField::Landing));
    assert!(!exp.decor().is_streaming(ParticleField::Q2));
    assert!(exp.reveals().is_blank(RevealSlot::Q2Message));
    assert!(exp.question(Question::Q1Date).input_visible);
    assert!(!exp.name_section_visible());
    assert_eq!(exp.tally().q1_tries, 0);
    assert_eq!(exp.progress().unwrap().steps.len(), 2);

    settle(&mut exp, 10_000);
    assert_eq!(exp.screen(), ScreenId::Landing);
    assert!(!exp.continue_visible());
}

#[test]
fn replay_during_the_game_tears_it_down() {
    let mut exp = experience(MemoryStore::new());
    reach_q2(&mut exp);
    submit(&mut exp, Question::Q2, "melt");
    settle(&mut exp, 5_000);
    exp.handle(Input::Continue, exp.now());
    submit(&mut exp, Question::Q3, "sunflower");
    settle_until(&mut exp, ScreenId::Game, 10_000);
    settle(&mut exp, 2_000);

    exp.handle(Input::Replay, exp.now());
    assert!(exp.game().is_none());
    assert_eq!(exp.pending_where(|w| matches!(w, Wake::Catch(_))), 0);
    assert_eq!(
        exp.pending_where(|w| matches!(w, Wake::Decor(DecorWake::Emit(f)) if *f != ParticleField::Landing)),
        0
    );
    assert_eq!(
        exp.pending_where(|w| matches!(w, Wake::Catch(CatchWake::Report))),
        0
    );
    settle(&mut exp, 30_000);
    assert_eq!(exp.screen(), ScreenId::Landing);
}

#[test]
fn landing_greets_saved_nickname() {
    let store = MemoryStore::new();
    let exp = experience(store.clone());
    assert!(exp.credentials().save("pookie", "", T0));
    assert_eq!(exp.greeting(), "pookie");
    assert!(exp.credentials().verify("1410"));
}
