use futures::executor::block_on;
use std::rc::Rc;
use vashuu_game::{
    CatchPhase, Experience, ExperienceConfig, Input, MemoryStore, Question, ScreenId,
};
use vashuu_web::pages::{ExperienceShell, FinalPage, GamePage, LandingPage, Q1Page, ScreenProps};
use vashuu_web::view::ExperienceView;
use yew::{Callback, LocalServerRenderer};

const T0: u64 = 1_700_000_000_000;

fn experience() -> Experience<MemoryStore> {
    Experience::new(MemoryStore::new(), ExperienceConfig::default(), 11, T0)
}

fn settle(exp: &mut Experience<MemoryStore>, ms: u64) {
    let until = exp.now() + ms;
    while let Some(due) = exp.next_wake().filter(|due| *due <= until) {
        exp.advance(due);
    }
    exp.advance(until);
}

fn settle_until(exp: &mut Experience<MemoryStore>, screen: ScreenId) {
    let limit = exp.now() + 30_000;
    while exp.screen() != screen && exp.now() < limit {
        settle(exp, 20);
    }
    assert_eq!(exp.screen(), screen);
}

fn submit(exp: &mut Experience<MemoryStore>, question: Question, answer: &str) {
    let now = exp.now();
    exp.handle(
        Input::Submit {
            question,
            answer: answer.to_string(),
        },
        now,
    );
}

fn props(exp: &Experience<MemoryStore>) -> ScreenProps {
    ScreenProps {
        view: ExperienceView::capture(exp),
        on_input: Callback::noop(),
    }
}

fn render_shell(exp: &Experience<MemoryStore>) -> String {
    block_on(LocalServerRenderer::<ExperienceShell>::with_props(props(exp)).render())
}

fn reach_game(exp: &mut Experience<MemoryStore>) {
    exp.handle(Input::Start, T0);
    submit(exp, Question::Q1Date, "14/10");
    submit(exp, Question::Q1Name, "queen");
    settle_until(exp, ScreenId::Q2);
    submit(exp, Question::Q2, "melt");
    settle(exp, 6_000);
    let now = exp.now();
    exp.handle(Input::Continue, now);
    submit(exp, Question::Q3, "sunflower");
    settle_until(exp, ScreenId::Game);
}

#[test]
fn landing_page_greets_and_offers_start() {
    let mut exp = experience();
    settle(&mut exp, 3_000);
    let html = block_on(LocalServerRenderer::<LandingPage>::with_props(props(&exp)).render());
    assert!(html.contains("For Vashuu"));
    assert!(html.contains("Hi vashuu"));
    assert!(html.contains("start-btn"));
    assert!(html.contains("landing-particles"));
    assert!(html.contains("butterfly-particle"));
}

#[test]
fn shell_marks_only_the_current_screen_active() {
    let exp = experience();
    let html = render_shell(&exp);
    for screen in ScreenId::ALL {
        assert!(html.contains(screen.element_id()), "missing {screen}");
    }
    assert_eq!(html.matches("screen active").count(), 1);
    assert!(html.contains("status-live"));
}

#[test]
fn q1_shows_hint_after_wrong_date() {
    let mut exp = experience();
    exp.handle(Input::Start, T0);
    submit(&mut exp, Question::Q1Date, "yesterday");
    let html = block_on(LocalServerRenderer::<Q1Page>::with_props(props(&exp)).render());
    assert!(html.contains("Think about our special day"));
    assert!(html.contains("id=\"q1-date-input\""));
    assert!(!html.contains("id=\"q1-name-input\""));
}

#[test]
fn q1_reveals_name_section_after_the_date() {
    let mut exp = experience();
    exp.handle(Input::Start, T0);
    submit(&mut exp, Question::Q1Date, "14/10");
    settle(&mut exp, 400);
    let html = block_on(LocalServerRenderer::<Q1Page>::with_props(props(&exp)).render());
    assert!(html.contains("q1-name-section"));
    assert!(html.contains("id=\"q1-name-input\""));
    assert!(!html.contains("id=\"q1-date-input\""));
    assert!(html.contains("reveal-line"));
}

#[test]
fn game_page_shows_score_and_falling_hearts() {
    let mut exp = experience();
    reach_game(&mut exp);
    settle(&mut exp, 1_500);
    assert_eq!(
        exp.game().map(|game| game.phase()),
        Some(CatchPhase::Active)
    );
    let html = block_on(LocalServerRenderer::<GamePage>::with_props(props(&exp)).render());
    assert!(html.contains("0 / 10"));
    assert!(html.contains("catch-target"));
    assert!(html.contains("game-area"));
}

#[test]
fn final_page_modal_and_music_label() {
    let mut exp = experience();
    reach_game(&mut exp);
    let limit = exp.now() + 60_000;
    while exp.screen() == ScreenId::Game && exp.now() < limit {
        let now = exp.now();
        let newest = exp
            .game()
            .and_then(|game| game.positions(now).last().map(|(_, point)| point));
        if let Some(point) = newest {
            exp.handle(Input::Pointer(point), now);
        }
        settle(&mut exp, 100);
    }
    settle_until(&mut exp, ScreenId::Q4);
    submit(&mut exp, Question::Q4, "hug");
    settle_until(&mut exp, ScreenId::Final);

    let closed = block_on(LocalServerRenderer::<FinalPage>::with_props(props(&exp)).render());
    assert!(closed.contains("open-message-btn"));
    assert!(closed.contains("Play Music"));
    assert!(!closed.contains("role=\"dialog\""));

    let now = exp.now();
    exp.handle(Input::OpenMessage, now);
    settle(&mut exp, 2_000);
    let open = block_on(LocalServerRenderer::<FinalPage>::with_props(props(&exp)).render());
    assert!(open.contains("role=\"dialog\""));
    assert!(open.contains("final-typewriter"));
    assert!(open.contains("You are so"));
}

#[test]
fn captured_views_compare_by_value() {
    let exp = experience();
    let a = ExperienceView::capture(&exp);
    let b = ExperienceView::capture(&exp);
    assert_eq!(a, b);
    assert!(!Rc::ptr_eq(&a, &b));
}
