//! Extraction of raw match fields from a rendered results page.

pub mod strategies;

use crate::constants::{AWAY_SCORE_SELECTOR, EVENT_TIME_SELECTOR, HOME_SCORE_SELECTOR};
use crate::error::{Result, ScraperError};
use crate::types::RenderedDocument;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, warn};

pub use strategies::{
    default_strategies, ClassPrefixStrategy, ParityStrategy, ParticipantStrategy, Participants,
    StrategyKind,
};
use strategies::first_text;

static HOME_SCORE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(HOME_SCORE_SELECTOR).expect("home score selector"));
static AWAY_SCORE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(AWAY_SCORE_SELECTOR).expect("away score selector"));
static EVENT_TIME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(EVENT_TIME_SELECTOR).expect("event time selector"));

/// Parallel field sequences scraped from one season page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub scores_home: Vec<u32>,
    pub scores_away: Vec<u32>,
    pub names_home: Vec<String>,
    pub names_away: Vec<String>,
    pub raw_times: Vec<String>,
    /// `None` when no strategy found any participant
    pub strategy: Option<StrategyKind>,
}

impl Extraction {
    /// Number of records the sequences describe, once they agree in length.
    pub fn ensure_aligned(&self, season_label: &str) -> Result<usize> {
        let expected = self.scores_home.len();
        let counts = [
            ("scores_home", self.scores_home.len()),
            ("scores_away", self.scores_away.len()),
            ("names_home", self.names_home.len()),
            ("names_away", self.names_away.len()),
            ("raw_times", self.raw_times.len()),
        ];
        if counts.iter().all(|(_, n)| *n == expected) {
            return Ok(expected);
        }
        let details = counts
            .iter()
            .map(|(name, n)| format!("{name}={n}"))
            .collect::<Vec<_>>()
            .join(", ");
        Err(ScraperError::SchemaMismatch {
            season: season_label.to_string(),
            details,
        })
    }
}

pub struct RecordExtractor {
    strategies: Vec<Box<dyn ParticipantStrategy>>,
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new(default_strategies())
    }
}

impl RecordExtractor {
    pub fn new(strategies: Vec<Box<dyn ParticipantStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn extract(&self, document: &RenderedDocument) -> Result<Extraction> {
        self.extract_html(document.html())
    }

    pub fn extract_html(&self, html: &str) -> Result<Extraction> {
        let document = Html::parse_document(html);

        let scores_home = parse_scores(&document, &HOME_SCORE)?;
        let scores_away = parse_scores(&document, &AWAY_SCORE)?;
        let raw_times: Vec<String> = document.select(&EVENT_TIME).map(first_text).collect();

        let (participants, strategy) = self.select_participants(&document);
        debug!(
            "extracted scores={} names={} times={} strategy={:?}",
            scores_home.len(),
            participants.home.len(),
            raw_times.len(),
            strategy
        );

        Ok(Extraction {
            scores_home,
            scores_away,
            names_home: participants.home,
            names_away: participants.away,
            raw_times,
            strategy,
        })
    }

    fn select_participants(&self, document: &Html) -> (Participants, Option<StrategyKind>) {
        for strategy in &self.strategies {
            let participants = strategy.select(document);
            if participants.is_match() {
                if strategy.kind() == StrategyKind::Fallback {
                    warn!("primary participant markup missing; using {} strategy", strategy.kind());
                }
                return (participants, Some(strategy.kind()));
            }
        }
        (Participants::default(), None)
    }
}

fn parse_scores(document: &Html, selector: &Selector) -> Result<Vec<u32>> {
    document
        .select(selector)
        .map(first_text)
        .map(|token| {
            token
                .parse::<u32>()
                .map_err(|_| ScraperError::InvalidScore { token })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_row(time: &str, home: &str, away: &str, hs: &str, aws: &str) -> String {
        format!(
            r#"<div class="event__match">
                <div class="event__time">{time}</div>
                <div class="event__participant event__participant--home">{home}</div>
                <div class="event__participant event__participant--away fontBold">{away}</div>
                <div class="event__score event__score--home">{hs}</div>
                <div class="event__score event__score--away">{aws}</div>
            </div>"#
        )
    }

    #[test]
    fn test_primary_extraction() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            event_row("04.01. 18:30", "Jets", "Bills", "17", "20"),
            event_row("28.12. 20:15", "Colts", "Titans", "3", "0"),
        );
        let extraction = RecordExtractor::default().extract_html(&html).unwrap();

        assert_eq!(extraction.scores_home, vec![17, 3]);
        assert_eq!(extraction.scores_away, vec![20, 0]);
        assert_eq!(extraction.names_home, vec!["Jets", "Colts"]);
        assert_eq!(extraction.names_away, vec!["Bills", "Titans"]);
        assert_eq!(extraction.raw_times, vec!["04.01. 18:30", "28.12. 20:15"]);
        assert_eq!(extraction.strategy, Some(StrategyKind::Primary));
        assert_eq!(extraction.ensure_aligned("2000-2001").unwrap(), 2);
    }

    #[test]
    fn test_fallback_activates_when_primary_is_empty() {
        let name = |n: &str| {
            format!(r#"<span class="wcl-simpleText_Asp-0 wcl-scores-simpleText-01_pV2Wk">{n}</span>"#)
        };
        let html = format!(
            r#"<html><body>
                <div class="event__time">16.08. 16:00</div>{}{}
                <div class="event__score event__score--home">2</div>
                <div class="event__score event__score--away">1</div>
                <div class="event__time">17.08. 14:00</div>{}{}
                <div class="event__score event__score--home">0</div>
                <div class="event__score event__score--away">0</div>
            </body></html>"#,
            name("Arsenal"),
            name("Chelsea"),
            name("Everton"),
            name("Fulham"),
        );
        let extraction = RecordExtractor::default().extract_html(&html).unwrap();

        assert_eq!(extraction.strategy, Some(StrategyKind::Fallback));
        assert_eq!(extraction.names_home, vec!["Arsenal", "Everton"]);
        assert_eq!(extraction.names_away, vec!["Chelsea", "Fulham"]);
        assert_eq!(extraction.ensure_aligned("2019-2020").unwrap(), 2);
    }

    #[test]
    fn test_odd_fallback_node_count_is_a_schema_mismatch() {
        let name = |n: &str| {
            format!(r#"<span class="wcl-simpleText_Asp-0 wcl-scores-simpleText-01_pV2Wk">{n}</span>"#)
        };
        let html = format!(
            r#"<html><body>
                <div class="event__time">16.08. 16:00</div>{}{}{}
                <div class="event__score event__score--home">2</div>
                <div class="event__score event__score--away">1</div>
            </body></html>"#,
            name("Arsenal"),
            name("Chelsea"),
            name("Everton"),
        );
        let extraction = RecordExtractor::default().extract_html(&html).unwrap();

        assert_eq!(extraction.strategy, Some(StrategyKind::Fallback));
        assert_eq!(extraction.names_home, vec!["Arsenal", "Everton"]);
        assert_eq!(extraction.names_away, vec!["Chelsea"]);
        match extraction.ensure_aligned("2019-2020").unwrap_err() {
            ScraperError::SchemaMismatch { details, .. } => {
                assert!(details.contains("names_home=2"));
                assert!(details.contains("names_away=1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_integer_score_is_fatal() {
        let html = event_row("04.01. 18:30", "Jets", "Bills", "-", "20");
        let err = RecordExtractor::default().extract_html(&html).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidScore { ref token } if token == "-"));
    }

    #[test]
    fn test_empty_page_yields_no_strategy() {
        let extraction = RecordExtractor::default()
            .extract_html("<html><body><p>No matches</p></body></html>")
            .unwrap();
        assert_eq!(extraction.strategy, None);
        assert_eq!(extraction.ensure_aligned("2000").unwrap(), 0);
    }

    #[test]
    fn test_length_mismatch_is_reported() {
        let html = format!(
            "{}<div class=\"event__time\">05.01. 19:00</div>",
            event_row("04.01. 18:30", "Jets", "Bills", "17", "20")
        );
        let extraction = RecordExtractor::default().extract_html(&html).unwrap();
        let err = extraction.ensure_aligned("2000-2001").unwrap_err();
        match err {
            ScraperError::SchemaMismatch { season, details } => {
                assert_eq!(season, "2000-2001");
                assert!(details.contains("raw_times=2"));
                assert!(details.contains("scores_home=1"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
