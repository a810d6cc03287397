//! Typewriter-style text reveal.
//!
//! [`plan`] turns a text into a delay-chained list of operations without
//! touching a single character: whitespace runs, tabs and emoji come out
//! exactly as they went in. [`Reveals`] plays plans into named containers on
//! a [`Timeline`].

use std::collections::{HashMap, VecDeque};

use crate::constants::REVEAL_LINE_PAUSE_FACTOR;
use crate::screens::ScreenId;
use crate::timeline::{TimerId, Timeline};

/// Containers that receive revealed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RevealSlot {
    Q1Message,
    Q1NameMessage,
    Q2Message,
    Q3Message,
    Q4Typewriter,
    FinalTypewriter,
}

impl RevealSlot {
    pub const ALL: [Self; 6] = [
        Self::Q1Message,
        Self::Q1NameMessage,
        Self::Q2Message,
        Self::Q3Message,
        Self::Q4Typewriter,
        Self::FinalTypewriter,
    ];

    #[must_use]
    pub const fn element_id(self) -> &'static str {
        match self {
            Self::Q1Message => "q1-message",
            Self::Q1NameMessage => "q1-name-message",
            Self::Q2Message => "q2-message",
            Self::Q3Message => "q3-message",
            Self::Q4Typewriter => "q4-typewriter",
            Self::FinalTypewriter => "final-typewriter",
        }
    }

    #[must_use]
    pub const fn screen(self) -> ScreenId {
        match self {
            Self::Q1Message | Self::Q1NameMessage => ScreenId::Q1,
            Self::Q2Message => ScreenId::Q2,
            Self::Q3Message => ScreenId::Q3,
            Self::Q4Typewriter => ScreenId::Q4,
            Self::FinalTypewriter => ScreenId::Final,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOp {
    /// Start a new line block.
    OpenLine,
    /// Append one character to the current block.
    Push(char),
    /// The last character of the last line has been rendered.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealStep {
    /// Delay after the previous step.
    pub after_ms: u64,
    pub op: RevealOp,
}

/// Delay-chained operations revealing `text`.
///
/// Character `k` of a line lands `k * per_char_ms` after the line opens and a
/// line of `n` characters settles `n * per_char_ms` after it opens. Lines are
/// split on `\n` and separated by a `3 * per_char_ms` pause.
#[must_use]
pub fn plan(text: &str, per_char_ms: u64) -> Vec<RevealStep> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut steps = Vec::with_capacity(text.len() + lines.len() * 2);
    let mut carry = 0;
    for (index, line) in lines.iter().enumerate() {
        steps.push(RevealStep {
            after_ms: carry,
            op: RevealOp::OpenLine,
        });
        let mut count = 0_u64;
        for ch in line.chars() {
            steps.push(RevealStep {
                after_ms: if count == 0 { 0 } else { per_char_ms },
                op: RevealOp::Push(ch),
            });
            count += 1;
        }
        let settle = if count == 0 { 0 } else { per_char_ms };
        if index + 1 < lines.len() {
            carry = settle + per_char_ms * REVEAL_LINE_PAUSE_FACTOR;
        } else {
            steps.push(RevealStep {
                after_ms: settle,
                op: RevealOp::Complete,
            });
        }
    }
    steps
}

/// Total time a reveal takes from start to completion.
#[must_use]
pub fn duration_ms(text: &str, per_char_ms: u64) -> u64 {
    plan(text, per_char_ms).iter().map(|step| step.after_ms).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealWake(pub RevealSlot);

/// Rendered content of one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealState {
    pub lines: Vec<String>,
    pub complete: bool,
}

impl RevealState {
    /// Rendered text with line blocks joined by `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone)]
struct Running {
    steps: VecDeque<RevealStep>,
    timer: Option<TimerId>,
}

#[derive(Debug, Clone, Default)]
pub struct Reveals {
    states: HashMap<RevealSlot, RevealState>,
    running: HashMap<RevealSlot, Running>,
}

impl Reveals {
    /// Clear `slot` and start revealing `text` into it, superseding any reveal
    /// already running there. Returns `true` if the reveal completed
    /// synchronously (only possible for an empty text with no delay).
    pub fn start<E: From<RevealWake>>(
        &mut self,
        slot: RevealSlot,
        text: &str,
        per_char_ms: u64,
        timeline: &mut Timeline<E>,
    ) -> bool {
        self.cancel(slot, timeline);
        self.states.insert(slot, RevealState::default());
        self.running.insert(
            slot,
            Running {
                steps: plan(text, per_char_ms).into(),
                timer: None,
            },
        );
        self.pump(slot, timeline, false)
    }

    /// Handle a fired tick. Returns `true` when the reveal in `slot` just
    /// completed.
    pub fn on_wake<E: From<RevealWake>>(
        &mut self,
        RevealWake(slot): RevealWake,
        timeline: &mut Timeline<E>,
    ) -> bool {
        match self.running.get_mut(&slot) {
            Some(running) => running.timer = None,
            None => return false,
        }
        self.pump(slot, timeline, true)
    }

    fn pump<E: From<RevealWake>>(
        &mut self,
        slot: RevealSlot,
        timeline: &mut Timeline<E>,
        mut waited: bool,
    ) -> bool {
        let Some(running) = self.running.get_mut(&slot) else {
            return false;
        };
        let state = self.states.entry(slot).or_default();
        while let Some(step) = running.steps.front().copied() {
            if step.after_ms > 0 && !waited {
                running.timer = Some(timeline.schedule(step.after_ms, RevealWake(slot)));
                return false;
            }
            waited = false;
            running.steps.pop_front();
            match step.op {
                RevealOp::OpenLine => state.lines.push(String::new()),
                RevealOp::Push(ch) => {
                    if let Some(line) = state.lines.last_mut() {
                        line.push(ch);
                    }
                }
                RevealOp::Complete => {
                    state.complete = true;
                    self.running.remove(&slot);
                    return true;
                }
            }
        }
        self.running.remove(&slot);
        state.complete = true;
        true
    }

    /// Stop the reveal in `slot`, keeping whatever was already rendered.
    pub fn cancel<E>(&mut self, slot: RevealSlot, timeline: &mut Timeline<E>) {
        if let Some(timer) = self.running.remove(&slot).and_then(|running| running.timer) {
            timeline.cancel(timer);
        }
    }

    /// Stop every reveal whose container lives on `screen`.
    pub fn cancel_screen<E>(&mut self, screen: ScreenId, timeline: &mut Timeline<E>) {
        for slot in RevealSlot::ALL {
            if slot.screen() == screen {
                self.cancel(slot, timeline);
            }
        }
    }

    /// Stop everything and empty every container.
    pub fn clear_all<E>(&mut self, timeline: &mut Timeline<E>) {
        for slot in RevealSlot::ALL {
            self.cancel(slot, timeline);
        }
        self.states.clear();
    }

    #[must_use]
    pub fn state(&self, slot: RevealSlot) -> Option<&RevealState> {
        self.states.get(&slot)
    }

    #[must_use]
    pub fn text(&self, slot: RevealSlot) -> String {
        self.states
            .get(&slot)
            .map(RevealState::text)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_running(&self, slot: RevealSlot) -> bool {
        self.running.contains_key(&slot)
    }

    /// Whether the container holds any rendered text or an active reveal.
    #[must_use]
    pub fn is_blank(&self, slot: RevealSlot) -> bool {
        !self.is_running(slot)
            && self
                .states
                .get(&slot)
                .is_none_or(|state| state.lines.iter().all(|line| line.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pushed(steps: &[RevealStep]) -> Vec<char> {
        steps
            .iter()
            .filter_map(|step| match step.op {
                RevealOp::Push(ch) => Some(ch),
                _ => None,
            })
            .collect()
    }

    fn drive(reveals: &mut Reveals, tl: &mut Timeline<RevealWake>) -> Vec<u64> {
        let mut completions = Vec::new();
        while let Some((_, wake)) = tl.pop_due(u64::MAX) {
            if reveals.on_wake(wake, tl) {
                completions.push(tl.now());
            }
        }
        completions
    }

    #[test]
    fn plan_keeps_whitespace_runs() {
        let steps = plan("a  b", 10);
        assert_eq!(pushed(&steps), vec!['a', ' ', ' ', 'b']);
    }

    #[test]
    fn plan_reproduces_every_input_exactly() {
        for text in ["", " ", "\t x \t", "You melt me", "line one\n\n  line three ", "💖 ok"] {
            let steps = plan(text, 5);
            let mut rebuilt = String::new();
            let mut first = true;
            for step in &steps {
                match step.op {
                    RevealOp::OpenLine if first => first = false,
                    RevealOp::OpenLine => rebuilt.push('\n'),
                    RevealOp::Push(ch) => rebuilt.push(ch),
                    RevealOp::Complete => {}
                }
            }
            assert_eq!(rebuilt, text);
            assert_eq!(steps.last().map(|s| s.op), Some(RevealOp::Complete));
        }
    }

    #[test]
    fn plan_timing_matches_delay_chain() {
        assert_eq!(duration_ms("abc", 80), 240);
        assert_eq!(duration_ms("", 80), 0);
        // 2 chars + resolve (160) + pause (240) + 1 char + resolve (80)
        assert_eq!(duration_ms("ab\nc", 80), 480);
    }

    #[test]
    fn reveal_renders_lines_into_separate_blocks() {
        let mut tl = Timeline::new(0);
        let mut reveals = Reveals::default();
        assert!(!reveals.start(RevealSlot::Q4Typewriter, "hi\nyou", 10, &mut tl));
        assert_eq!(reveals.text(RevealSlot::Q4Typewriter), "h");

        let done = drive(&mut reveals, &mut tl);
        assert_eq!(done, vec![duration_ms("hi\nyou", 10)]);
        let state = reveals.state(RevealSlot::Q4Typewriter).unwrap();
        assert_eq!(state.lines, vec!["hi".to_string(), "you".to_string()]);
        assert!(state.complete);
        assert!(!reveals.is_running(RevealSlot::Q4Typewriter));
    }

    #[test]
    fn restarting_supersedes_previous_reveal() {
        let mut tl = Timeline::new(0);
        let mut reveals = Reveals::default();
        reveals.start(RevealSlot::Q2Message, "first message", 10, &mut tl);
        if let Some((_, wake)) = tl.pop_due(10) {
            assert!(!reveals.on_wake(wake, &mut tl));
        }
        reveals.start(RevealSlot::Q2Message, "second", 10, &mut tl);
        assert_eq!(tl.len(), 1);

        drive(&mut reveals, &mut tl);
        assert_eq!(reveals.text(RevealSlot::Q2Message), "second");
    }

    #[test]
    fn cancel_screen_stops_only_that_screen() {
        let mut tl: Timeline<RevealWake> = Timeline::new(0);
        let mut reveals = Reveals::default();
        reveals.start(RevealSlot::Q1Message, "abc", 10, &mut tl);
        reveals.start(RevealSlot::Q3Message, "xyz", 10, &mut tl);
        reveals.cancel_screen(ScreenId::Q1, &mut tl);
        assert!(!reveals.is_running(RevealSlot::Q1Message));
        assert!(reveals.is_running(RevealSlot::Q3Message));
        assert_eq!(reveals.text(RevealSlot::Q1Message), "a");
        assert_eq!(tl.len(), 1);
    }

    #[test]
    fn blank_detection_ignores_whitespace() {
        let mut tl = Timeline::new(0);
        let mut reveals = Reveals::default();
        assert!(reveals.is_blank(RevealSlot::FinalTypewriter));
        reveals.start(RevealSlot::FinalTypewriter, "x", 10, &mut tl);
        assert!(!reveals.is_blank(RevealSlot::FinalTypewriter));
        drive(&mut reveals, &mut tl);
        assert!(!reveals.is_blank(RevealSlot::FinalTypewriter));
        reveals.clear_all(&mut tl);
        assert!(reveals.is_blank(RevealSlot::FinalTypewriter));
    }
}
