//! Scenario catalog. Each scenario drives a fresh experience and checks one
//! behaviour end to end.

use anyhow::{Context, Result, ensure};
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use vashuu_game::answers::{DATE_PHRASES, FLOWER_PHRASES, MELT_PHRASES};
use vashuu_game::constants::{DEFAULT_PASSWORD, PROGRESS_KEY};
use vashuu_game::{
    AudioCommand, CatchPhase, Command, Input, ParticleField, ProgressRecord, Question, RevealSlot,
    ScreenId, Wake,
};

use crate::logic::driver::Driver;

pub type ScenarioFn = fn(&mut Driver, &mut ChaCha8Rng) -> Result<()>;

#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub run: ScenarioFn,
}

const CATALOG: &[Scenario] = &[
    Scenario {
        name: "happy-path",
        description: "Correct answers straight through to the final message",
        run: happy_path,
    },
    Scenario {
        name: "wrong-answers",
        description: "Wrong answers only show hints and never advance",
        run: wrong_answers,
    },
    Scenario {
        name: "fuzzy-answers",
        description: "Accepted phrases survive case and whitespace noise",
        run: fuzzy_answers,
    },
    Scenario {
        name: "catch-game",
        description: "Sloppy play still finishes the catch game exactly once",
        run: catch_game,
    },
    Scenario {
        name: "replay",
        description: "Replay at a random moment returns cleanly to the landing screen",
        run: replay,
    },
    Scenario {
        name: "music-blocked",
        description: "Blocked playback retries once and then gives up",
        run: music_blocked,
    },
    Scenario {
        name: "export",
        description: "Exported progress parses back with every step",
        run: export,
    },
    Scenario {
        name: "credentials",
        description: "Default credentials verify and the nickname is greeted",
        run: credentials,
    },
];

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATALOG.iter().map(|s| (s.name, s.description))
}

pub fn get_scenario(name: &str) -> Option<Scenario> {
    CATALOG.iter().copied().find(|s| s.name == name)
}

pub fn all_names() -> Vec<String> {
    CATALOG.iter().map(|s| s.name.to_string()).collect()
}

fn stored_progress(driver: &Driver) -> Result<ProgressRecord> {
    let raw = driver
        .store()
        .raw(PROGRESS_KEY)
        .context("no progress stored")?;
    serde_json::from_str(&raw).context("stored progress is not valid JSON")
}

fn happy_path(driver: &mut Driver, rng: &mut ChaCha8Rng) -> Result<()> {
    driver.play_through(rng)?;
    let record = stored_progress(driver)?;
    let steps: Vec<u64> = record.steps.iter().filter_map(|s| s.step()).collect();
    ensure!(steps == [1, 2, 3, 4, 5], "unexpected step order {steps:?}");
    ensure!(record.final_revealed, "final flag not stored");

    driver.input(Input::OpenMessage);
    driver.settle(30_000);
    let expected = driver.experience().config().messages.final_message.clone();
    let shown = driver.experience().reveals().text(RevealSlot::FinalTypewriter);
    ensure!(shown == expected, "final message mismatch: {shown:?}");
    ensure!(
        !driver.experience().final_view().badge_visible,
        "badge still visible after reveal"
    );

    driver.input(Input::CloseMessage);
    driver.input(Input::OpenMessage);
    ensure!(
        !driver.experience().reveals().is_running(RevealSlot::FinalTypewriter),
        "final message revealed twice"
    );
    Ok(())
}

fn noise(rng: &mut ChaCha8Rng) -> String {
    const WORDS: &[&str] = &["banana", "tuesday", "pizza", "xyz", "lol", "42", "idk"];
    let count = rng.gen_range(1..=3);
    (0..count)
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn expect_rejected(driver: &mut Driver, question: Question, answer: &str) -> Result<()> {
    let screen = driver.experience().screen();
    let before = driver.experience().question(question).attempts;
    let stored = driver.store().raw(PROGRESS_KEY);
    driver.submit(question, answer);
    let view = driver.experience().question(question);
    ensure!(view.attempts == before + 1, "{question:?} did not count {answer:?}");
    ensure!(view.hint.is_some(), "{question:?} showed no hint");
    driver.settle(1_000);
    ensure!(
        driver.experience().screen() == screen,
        "{question:?} advanced on {answer:?}"
    );
    ensure!(
        driver.store().raw(PROGRESS_KEY) == stored,
        "{question:?} persisted a wrong answer"
    );
    Ok(())
}

fn wrong_answers(driver: &mut Driver, rng: &mut ChaCha8Rng) -> Result<()> {
    driver.input(Input::Start);
    for _ in 0..rng.gen_range(1..4) {
        let answer = noise(rng);
        expect_rejected(driver, Question::Q1Date, &answer)?;
    }
    driver.submit(Question::Q1Date, "14 oct");
    driver.settle(100);
    expect_rejected(driver, Question::Q1Name, &noise(rng))?;
    let tries = driver.experience().tally().q1_tries;
    ensure!(tries >= 2, "q1 tries not tallied: {tries}");
    driver.submit(Question::Q1Name, "Queen");
    driver.settle_until(ScreenId::Q2, 15_000)?;
    expect_rejected(driver, Question::Q2, &noise(rng))?;
    ensure!(
        driver.experience().reveals().is_blank(RevealSlot::Q2Message),
        "wrong Q2 answer revealed the reward"
    );
    Ok(())
}

fn scramble(rng: &mut ChaCha8Rng, phrase: &str) -> String {
    let cased: String = phrase
        .chars()
        .map(|c| {
            if rng.gen_bool(0.5) {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect();
    let pad = |rng: &mut ChaCha8Rng| " ".repeat(rng.gen_range(0..3));
    format!("{}{cased}{}", pad(rng), pad(rng))
}

fn pick<'a>(rng: &mut ChaCha8Rng, phrases: &[&'a str]) -> Result<&'a str> {
    phrases.choose(rng).copied().context("empty phrase list")
}

fn fuzzy_answers(driver: &mut Driver, rng: &mut ChaCha8Rng) -> Result<()> {
    driver.input(Input::Start);
    let date_phrase = pick(rng, DATE_PHRASES)?;
    let date = scramble(rng, date_phrase);
    driver.submit(Question::Q1Date, &date);
    ensure!(
        driver.experience().name_section_visible(),
        "date {date:?} was rejected"
    );
    driver.submit(Question::Q1Name, &scramble(rng, "queen"));
    driver.settle_until(ScreenId::Q2, 15_000)?;

    let melt_phrase = format!("you {} me", pick(rng, MELT_PHRASES)?);
    let melt = scramble(rng, &melt_phrase);
    driver.submit(Question::Q2, &melt);
    ensure!(
        driver.experience().question(Question::Q2).solved,
        "q2 answer {melt:?} was rejected"
    );
    driver.settle(8_000);
    driver.input(Input::Continue);
    let flower_phrase = pick(rng, FLOWER_PHRASES)?;
    let flower = scramble(rng, flower_phrase);
    driver.submit(Question::Q3, &flower);
    ensure!(
        driver.experience().question(Question::Q3).solved,
        "q3 answer {flower:?} was rejected"
    );
    Ok(())
}

fn catch_game(driver: &mut Driver, rng: &mut ChaCha8Rng) -> Result<()> {
    driver.reach_q2()?;
    driver.reach_game()?;
    let miss_chance = rng.gen_range(0.1..0.6);
    driver.play_catch(rng, miss_chance)?;
    let target = driver.experience().config().catch_game.target_count;
    let phase = driver.experience().game().map(|game| game.phase());
    ensure!(phase == Some(CatchPhase::Finished), "game ended as {phase:?}");
    driver.settle_until(ScreenId::Q4, 10_000)?;
    let tally = driver.experience().tally();
    ensure!(tally.game_score == target, "score {} != {target}", tally.game_score);
    ensure!(
        driver
            .experience()
            .pending_where(|w| matches!(w, Wake::Catch(_)))
            == 0,
        "catch timers leaked past the game"
    );
    let games = stored_progress(driver)?
        .steps
        .iter()
        .filter(|s| s.step() == Some(4))
        .count();
    ensure!(games == 1, "game recorded {games} times");
    Ok(())
}

fn replay(driver: &mut Driver, rng: &mut ChaCha8Rng) -> Result<()> {
    driver.reach_q2()?;
    if rng.gen_bool(0.5) {
        driver.reach_game()?;
    }
    driver.settle(rng.gen_range(0..3_000));
    let steps_before = stored_progress(driver)?.steps.len();

    driver.input(Input::Replay);
    let exp = driver.experience();
    ensure!(exp.screen() == ScreenId::Landing, "replay left {}", exp.screen());
    ensure!(exp.game().is_none(), "game survived replay");
    ensure!(!exp.script_pending(), "script survived replay");
    ensure!(
        exp.pending_where(|w| matches!(w, Wake::Decor(vashuu_game::decor::DecorWake::Emit(f)) if *f != ParticleField::Landing))
            == 0,
        "ambient streams survived replay"
    );
    ensure!(
        stored_progress(driver)?.steps.len() == steps_before,
        "replay touched stored progress"
    );
    driver.settle(20_000);
    ensure!(
        driver.experience().screen() == ScreenId::Landing,
        "stale timers moved off the landing screen"
    );
    Ok(())
}

fn music_blocked(driver: &mut Driver, _rng: &mut ChaCha8Rng) -> Result<()> {
    driver.input(Input::Start);
    driver.input(Input::MusicReady);
    driver.settle(200);
    ensure!(driver.audio_count(&AudioCommand::Play) == 1, "music never started");
    driver.input(Input::PlaybackRejected("NotAllowedError".to_string()));
    driver.settle(300);
    ensure!(driver.audio_count(&AudioCommand::Play) == 2, "music was not retried");
    driver.input(Input::PlaybackRejected("NotAllowedError".to_string()));
    driver.settle(2_000);
    ensure!(
        driver.audio_count(&AudioCommand::Play) == 2,
        "music retried more than once"
    );
    ensure!(!driver.experience().music_playing(), "music reported playing");
    Ok(())
}

fn export(driver: &mut Driver, rng: &mut ChaCha8Rng) -> Result<()> {
    driver.input(Input::Export);
    ensure!(
        !driver
            .commands()
            .iter()
            .any(|c| matches!(c, Command::Download(_))),
        "exported with nothing stored"
    );
    driver.play_through(rng)?;
    driver.input(Input::Export);
    let doc = driver
        .commands()
        .iter()
        .rev()
        .find_map(|c| match c {
            Command::Download(doc) => Some(doc),
            _ => None,
        })
        .context("export produced no download")?;
    ensure!(doc.filename.ends_with(".json"), "bad filename {}", doc.filename);
    let record: ProgressRecord =
        serde_json::from_str(&doc.contents).context("export is not valid JSON")?;
    ensure!(record.steps.len() == 5, "export has {} steps", record.steps.len());
    ensure!(record.final_revealed, "export lost the final flag");
    Ok(())
}

fn credentials(driver: &mut Driver, rng: &mut ChaCha8Rng) -> Result<()> {
    let creds = driver.experience().credentials();
    ensure!(creds.verify(DEFAULT_PASSWORD), "default password rejected");
    ensure!(!creds.verify("wrong"), "wrong password accepted");
    let nickname = format!("pookie{}", rng.gen_range(1..100));
    ensure!(
        creds.save(&nickname, "", crate::logic::driver::START_MS),
        "save failed"
    );
    ensure!(
        driver.experience().greeting() == nickname,
        "greeting did not follow the stored nickname"
    );
    ensure!(
        driver.experience().credentials().verify(DEFAULT_PASSWORD),
        "empty password did not fall back to the default"
    );
    Ok(())
}
