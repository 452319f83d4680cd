use crate::constants::{
    AWAY_PARTICIPANT_SELECTOR, HOME_PARTICIPANT_SELECTOR, SIMPLE_TEXT_PARTICIPANT_SELECTOR,
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::fmt;

static HOME_PARTICIPANT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(HOME_PARTICIPANT_SELECTOR).expect("home participant selector"));
static AWAY_PARTICIPANT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(AWAY_PARTICIPANT_SELECTOR).expect("away participant selector"));
static SIMPLE_TEXT_PARTICIPANT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(SIMPLE_TEXT_PARTICIPANT_SELECTOR).expect("simple text participant selector")
});

/// Which participant strategy produced the names of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Primary,
    Fallback,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Primary => write!(f, "primary"),
            StrategyKind::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participants {
    pub home: Vec<String>,
    pub away: Vec<String>,
}

impl Participants {
    /// A strategy only counts as matching when it found home names.
    pub fn is_match(&self) -> bool {
        !self.home.is_empty()
    }
}

/// A way of locating home/away participant names in a results page.
pub trait ParticipantStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn select(&self, document: &Html) -> Participants;
}

/// Dedicated home/away participant nodes.
pub struct ClassPrefixStrategy;

impl ParticipantStrategy for ClassPrefixStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Primary
    }

    fn select(&self, document: &Html) -> Participants {
        Participants {
            home: document.select(&HOME_PARTICIPANT).map(first_text).collect(),
            away: document.select(&AWAY_PARTICIPANT).map(first_text).collect(),
        }
    }
}

/// One shared node sequence; even positions are home, odd positions away.
pub struct ParityStrategy;

impl ParticipantStrategy for ParityStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fallback
    }

    fn select(&self, document: &Html) -> Participants {
        let mut participants = Participants::default();
        for (i, name) in document
            .select(&SIMPLE_TEXT_PARTICIPANT)
            .map(first_text)
            .enumerate()
        {
            if i % 2 == 0 {
                participants.home.push(name);
            } else {
                participants.away.push(name);
            }
        }
        participants
    }
}

pub fn default_strategies() -> Vec<Box<dyn ParticipantStrategy>> {
    vec![Box::new(ClassPrefixStrategy), Box::new(ParityStrategy)]
}

/// First non-blank text node below `element`, trimmed. Empty when there is none.
pub(crate) fn first_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .unwrap_or_default()
        .to_string()
}
