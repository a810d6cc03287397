//! Browser driver for the experience controller.
//!
//! Owns the controller, feeds it inputs with wall-clock time, carries out the
//! commands it returns and keeps a single timeout armed for its next wake.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo::timers::callback::Timeout;
use vashuu_game::{Command, Commands, Experience, Input, ScreenId};
use yew::Callback;

use super::bootstrap::{build_experience, timer_delay_ms};
use crate::a11y::{screen_announcement, set_status};
use crate::audio::AudioDriver;
use crate::dom::{clear_input, console_error, download, focus_input, js_error_message, now_ms, random_seed};
use crate::storage::BrowserStore;
use crate::view::ExperienceView;

pub struct Runtime {
    experience: RefCell<Experience<BrowserStore>>,
    audio: AudioDriver,
    timer: RefCell<Option<Timeout>>,
    screen: Cell<ScreenId>,
    on_change: Callback<Rc<ExperienceView>>,
    this: Weak<Self>,
}

impl Runtime {
    #[must_use]
    pub fn start(on_change: Callback<Rc<ExperienceView>>) -> Rc<Self> {
        let runtime = Rc::new_cyclic(|this: &Weak<Self>| {
            let reporter = this.clone();
            let report = Callback::from(move |input: Input| {
                if let Some(runtime) = reporter.upgrade() {
                    runtime.dispatch(input);
                }
            });
            let experience = build_experience(BrowserStore, random_seed(), now_ms());
            Self {
                screen: Cell::new(experience.screen()),
                experience: RefCell::new(experience),
                audio: AudioDriver::new(report),
                timer: RefCell::new(None),
                on_change,
                this: this.clone(),
            }
        });
        runtime.rearm();
        runtime
    }

    #[must_use]
    pub fn view(&self) -> Rc<ExperienceView> {
        ExperienceView::capture(&self.experience.borrow())
    }

    pub fn dispatch(&self, input: Input) {
        log::debug!("input {input:?}");
        let commands = {
            let mut experience = self.experience.borrow_mut();
            let now = now_ms().max(experience.now());
            experience.handle(input, now)
        };
        self.settle(commands);
    }

    fn tick(&self) {
        let commands = {
            let mut experience = self.experience.borrow_mut();
            let now = now_ms().max(experience.now());
            experience.advance(now)
        };
        self.settle(commands);
    }

    fn settle(&self, commands: Commands) {
        for command in commands {
            self.execute(command);
        }
        self.announce();
        self.rearm();
        self.on_change.emit(self.view());
    }

    fn execute(&self, command: Command) {
        match command {
            Command::Audio(audio) => self.audio.run(audio),
            Command::Focus(input) => focus_input(input.element_id()),
            Command::ClearInput(input) => clear_input(input.element_id()),
            Command::Download(doc) => {
                if let Err(err) = download(&doc) {
                    console_error(&format!("export failed: {}", js_error_message(&err)));
                }
            }
        }
    }

    fn announce(&self) {
        let screen = self.experience.borrow().screen();
        if self.screen.replace(screen) != screen {
            log::info!("showing {screen}");
            set_status(screen_announcement(screen));
        }
    }

    fn rearm(&self) {
        let next = self.experience.borrow().next_wake();
        let timeout = next.map(|due| {
            let this = self.this.clone();
            Timeout::new(timer_delay_ms(due, now_ms()), move || {
                if let Some(runtime) = this.upgrade() {
                    runtime.tick();
                }
            })
        });
        // Dropping the previous timeout cancels it.
        self.timer.replace(timeout);
    }
}
