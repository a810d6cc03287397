//! Answer validation, one predicate table per question.
//!
//! Answers are normalized (trimmed, lowercased) before matching. Every
//! predicate is pure.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::reveal::RevealSlot;
use crate::screens::{InputId, ScreenId};

/// Phrases that identify the day they met.
pub const DATE_PHRASES: &[&str] = &[
    "14 oct",
    "14/10",
    "14-10",
    "1410",
    "14 10",
    "the day we met",
    "day we met",
    "when we met",
    "october 14",
    "14th october",
    "oct 14",
    "14th oct",
    "fourteenth october",
    "october fourteenth",
];

pub const NAME_PHRASES: &[&str] = &["queen"];
pub const MELT_PHRASES: &[&str] = &["melt"];
pub const FLOWER_PHRASES: &[&str] = &["sunflower", "sun flower", "sun-flowers"];

static WANT_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?i)(you|kiss|hug|you baby|your kisses|me)")
        .map_err(|err| log::error!("answer pattern failed to compile: {err}"))
        .ok()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Question {
    Q1Date,
    Q1Name,
    Q2,
    Q3,
    Q4,
}

impl Question {
    pub const ALL: [Self; 5] = [Self::Q1Date, Self::Q1Name, Self::Q2, Self::Q3, Self::Q4];

    #[must_use]
    pub const fn input(self) -> InputId {
        match self {
            Self::Q1Date => InputId::Q1Date,
            Self::Q1Name => InputId::Q1Name,
            Self::Q2 => InputId::Q2,
            Self::Q3 => InputId::Q3,
            Self::Q4 => InputId::Q4,
        }
    }

    #[must_use]
    pub const fn from_input(input: InputId) -> Self {
        match input {
            InputId::Q1Date => Self::Q1Date,
            InputId::Q1Name => Self::Q1Name,
            InputId::Q2 => Self::Q2,
            InputId::Q3 => Self::Q3,
            InputId::Q4 => Self::Q4,
        }
    }

    #[must_use]
    pub const fn screen(self) -> ScreenId {
        match self {
            Self::Q1Date | Self::Q1Name => ScreenId::Q1,
            Self::Q2 => ScreenId::Q2,
            Self::Q3 => ScreenId::Q3,
            Self::Q4 => ScreenId::Q4,
        }
    }

    /// Container receiving the reward message.
    #[must_use]
    pub const fn message_slot(self) -> RevealSlot {
        match self {
            Self::Q1Date => RevealSlot::Q1Message,
            Self::Q1Name => RevealSlot::Q1NameMessage,
            Self::Q2 => RevealSlot::Q2Message,
            Self::Q3 => RevealSlot::Q3Message,
            Self::Q4 => RevealSlot::Q4Typewriter,
        }
    }

    /// Whether `answer` passes this question's rule.
    #[must_use]
    pub fn accepts(self, answer: &str) -> bool {
        let answer = normalize(answer);
        match self {
            Self::Q1Date => is_meeting_date(&answer),
            Self::Q1Name => contains_any(&answer, NAME_PHRASES),
            Self::Q2 => contains_any(&answer, MELT_PHRASES),
            Self::Q3 => contains_any(&answer, FLOWER_PHRASES),
            Self::Q4 => WANT_PATTERN
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(&answer)),
        }
    }
}

#[must_use]
pub fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

fn contains_any(answer: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| answer.contains(phrase))
}

fn is_meeting_date(answer: &str) -> bool {
    contains_any(answer, DATE_PHRASES)
        || (answer.contains("14") && (answer.contains("oct") || answer.contains("10")))
        || answer.contains("met")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_accepts_phrases_and_loose_forms() {
        for answer in [
            "14/10",
            "  The Day We Met ",
            "October 14",
            "oct 14th",
            "14.10.2023",
            "we met at the station",
            "FOURTEENTH OCTOBER",
        ] {
            assert!(Question::Q1Date.accepts(answer), "{answer}");
        }
        for answer in ["", "14 march", "someday", "10/14"] {
            assert_eq!(Question::Q1Date.accepts(answer), answer == "10/14", "{answer}");
        }
    }

    #[test]
    fn name_requires_queen() {
        assert!(Question::Q1Name.accepts("Queen"));
        assert!(Question::Q1Name.accepts("my queen 👑"));
        assert!(!Question::Q1Name.accepts("princess"));
    }

    #[test]
    fn melt_and_flower_rules() {
        assert!(Question::Q2.accepts("you MELT me"));
        assert!(!Question::Q2.accepts("banana"));
        assert!(Question::Q3.accepts("Sunflowers!"));
        assert!(Question::Q3.accepts("a sun flower"));
        assert!(Question::Q3.accepts("sun-flowers"));
        assert!(!Question::Q3.accepts("sun-flower"));
        assert!(!Question::Q3.accepts("rose"));
    }

    #[test]
    fn want_pattern_matches_anywhere() {
        assert!(Question::Q4.accepts("KISSES"));
        assert!(Question::Q4.accepts("a big hug"));
        assert!(Question::Q4.accepts("home"));
        assert!(!Question::Q4.accepts("cake"));
    }

    #[test]
    fn predicates_are_deterministic() {
        for question in Question::ALL {
            for answer in ["melt", "queen", "14 oct", "sunflower", "hug", "nope"] {
                assert_eq!(question.accepts(answer), question.accepts(answer));
            }
        }
    }

    #[test]
    fn inputs_round_trip() {
        for question in Question::ALL {
            assert_eq!(Question::from_input(question.input()), question);
        }
    }
}
