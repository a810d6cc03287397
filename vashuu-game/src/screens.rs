//! Fixed screen set and the navigator keeping exactly one of them active.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;
use crate::timeline::{TimerId, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScreenId {
    Landing,
    Q1,
    Unlock,
    Q2,
    Q3,
    Game,
    Q4,
    Final,
}

impl ScreenId {
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
            Self::Landing => "screen-landing",
            Self::Q1 => "screen-q1",
            Self::Unlock => "screen-unlock",
            Self::Q2 => "screen-q2",
            Self::Q3 => "screen-q3",
            Self::Game => "screen-game",
            Self::Q4 => "screen-q4",
            Self::Final => "screen-final",
        }
    }

    /// First text input on the screen, focused shortly after activation.
    #[must_use]
    pub const fn first_input(self) -> Option<InputId> {
        match self {
            Self::Q1 => Some(InputId::Q1Date),
            Self::Q2 => Some(InputId::Q2),
            Self::Q3 => Some(InputId::Q3),
            Self::Q4 => Some(InputId::Q4),
            Self::Landing | Self::Unlock | Self::Game | Self::Final => None,
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Element-id lookup. Navigation inside the crate is typed, so only ids
/// arriving as text (markup, logs, tooling) go through here.
impl FromStr for ScreenId {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|screen| screen.element_id() == s)
            .ok_or_else(|| FlowError::UnknownScreen(s.to_string()))
    }
}

/// Text inputs that can receive focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InputId {
    Q1Date,
    Q1Name,
    Q2,
    Q3,
    Q4,
}

impl InputId {
    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::Q1Date => "q1-date-input",
            Self::Q1Name => "q1-name-input",
            Self::Q2 => "q2-input",
            Self::Q3 => "q3-input",
            Self::Q4 => "q4-input",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusWake(pub InputId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenChange {
    pub from: ScreenId,
    pub to: ScreenId,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    current: ScreenId,
    focus_timer: Option<TimerId>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: ScreenId::Landing,
            focus_timer: None,
        }
    }
}

impl Navigator {
    #[must_use]
    pub const fn current(&self) -> ScreenId {
        self.current
    }

    #[must_use]
    pub fn is_active(&self, screen: ScreenId) -> bool {
        self.current == screen
    }

    /// Activate `to`, deactivating every other screen, and queue focus on its
    /// first input after `focus_delay_ms`.
    pub fn show<E: From<FocusWake>>(
        &mut self,
        to: ScreenId,
        timeline: &mut Timeline<E>,
        focus_delay_ms: u64,
    ) -> ScreenChange {
        let change = ScreenChange {
            from: self.current,
            to,
        };
        self.current = to;
        if let Some(timer) = self.focus_timer.take() {
            timeline.cancel(timer);
        }
        if let Some(input) = to.first_input() {
            self.focus_later(input, timeline, focus_delay_ms);
        }
        log::info!("screen {} -> {}", change.from, change.to);
        change
    }

    pub fn focus_later<E: From<FocusWake>>(
        &mut self,
        input: InputId,
        timeline: &mut Timeline<E>,
        delay_ms: u64,
    ) {
        if let Some(timer) = self.focus_timer.take() {
            timeline.cancel(timer);
        }
        self.focus_timer = Some(timeline.schedule(delay_ms, FocusWake(input)));
    }

    /// Focus timer fired; returns the input the platform should focus.
    pub const fn on_wake(&mut self, FocusWake(input): FocusWake) -> InputId {
        self.focus_timer = None;
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_keeps_exactly_one_active_screen() {
        let mut tl: Timeline<FocusWake> = Timeline::new(0);
        let mut nav = Navigator::default();
        assert!(nav.is_active(ScreenId::Landing));

        let change = nav.show(ScreenId::Q2, &mut tl, 50);
        assert_eq!(change.from, ScreenId::Landing);
        let active: Vec<_> = ScreenId::ALL.into_iter().filter(|s| nav.is_active(*s)).collect();
        assert_eq!(active, vec![ScreenId::Q2]);
    }

    #[test]
    fn input_screens_schedule_focus_after_delay() {
        let mut tl: Timeline<FocusWake> = Timeline::new(1_000);
        let mut nav = Navigator::default();
        nav.show(ScreenId::Q1, &mut tl, 50);
        assert_eq!(tl.next_due(), Some(1_050));
        let (_, wake) = tl.pop_due(1_050).unwrap();
        assert_eq!(nav.on_wake(wake), InputId::Q1Date);

        nav.show(ScreenId::Unlock, &mut tl, 50);
        assert!(tl.is_empty());
    }

    #[test]
    fn leaving_before_focus_cancels_it() {
        let mut tl: Timeline<FocusWake> = Timeline::new(0);
        let mut nav = Navigator::default();
        nav.show(ScreenId::Q3, &mut tl, 50);
        nav.show(ScreenId::Game, &mut tl, 50);
        assert!(tl.is_empty());
    }

    #[test]
    fn unknown_screen_names_are_rejected() {
        let err = "screen-bonus".parse::<ScreenId>().unwrap_err();
        assert!(matches!(err, FlowError::UnknownScreen(ref name) if name == "screen-bonus"));
        for screen in ScreenId::ALL {
            assert_eq!(screen.element_id().parse::<ScreenId>().unwrap(), screen);
        }
    }
}
