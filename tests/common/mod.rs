#![allow(dead_code)]

use async_trait::async_trait;
use flashscore_scraper::browser::{ControlProbe, RenderSession, Renderer};
use flashscore_scraper::loader::{PageLoader, PaginationSettings};
use flashscore_scraper::normalize::DateNormalizer;
use flashscore_scraper::parser::RecordExtractor;
use flashscore_scraper::pipeline::SeasonAggregator;
use flashscore_scraper::{Result, ScraperError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const HOST: &str = "www.flashscore.test";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Control present until every batch is revealed
    Normal,
    /// Control present but never clickable
    Hidden,
    /// Probing the control fails outright
    Broken,
    /// Control never goes away
    Endless,
    /// Control reports ready but is gone by the time it is clicked
    Vanishing,
}

#[derive(Debug, Clone)]
pub struct FakePage {
    pub batches: Vec<String>,
    pub control: ControlMode,
    pub source_fails: bool,
    pub close_fails: bool,
}

impl FakePage {
    pub fn new(batches: Vec<String>) -> Self {
        Self {
            batches,
            control: ControlMode::Normal,
            source_fails: false,
            close_fails: false,
        }
    }

    pub fn with_control(mut self, control: ControlMode) -> Self {
        self.control = control;
        self
    }

    pub fn with_failing_source(mut self) -> Self {
        self.source_fails = true;
        self
    }

    pub fn with_failing_close(mut self) -> Self {
        self.close_fails = true;
        self
    }
}

/// Serves scripted pages keyed by URL and counts session lifecycle calls.
#[derive(Default)]
pub struct FakeRenderer {
    pages: HashMap<String, FakePage>,
    pub opened: AtomicUsize,
    pub closed: Arc<AtomicUsize>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn open(&self, url: &str) -> Result<Box<dyn RenderSession>> {
        let page = self.pages.get(url).cloned().ok_or_else(|| ScraperError::Navigation {
            url: url.to_string(),
            message: "404".to_string(),
        })?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            url: url.to_string(),
            page,
            revealed: 1,
            closed: Arc::clone(&self.closed),
        }))
    }
}

struct FakeSession {
    url: String,
    page: FakePage,
    revealed: usize,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderSession for FakeSession {
    fn url(&self) -> &str {
        &self.url
    }

    async fn probe_control(&mut self, _selector: &str, _timeout: Duration) -> Result<ControlProbe> {
        match self.page.control {
            ControlMode::Broken => Err(ScraperError::Pagination {
                url: self.url.clone(),
                message: "target crashed".to_string(),
            }),
            ControlMode::Hidden => Ok(ControlProbe::NotInteractable),
            ControlMode::Endless | ControlMode::Vanishing => Ok(ControlProbe::Ready),
            ControlMode::Normal if self.revealed < self.page.batches.len() => Ok(ControlProbe::Ready),
            ControlMode::Normal => Ok(ControlProbe::NotFound),
        }
    }

    async fn activate_control(&mut self, _selector: &str) -> Result<bool> {
        match self.page.control {
            ControlMode::Vanishing => Ok(false),
            ControlMode::Normal => {
                self.revealed += 1;
                Ok(true)
            }
            _ => Ok(true),
        }
    }

    async fn page_source(&mut self) -> Result<String> {
        if self.page.source_fails {
            return Err(ScraperError::Session("page source unavailable".to_string()));
        }
        let shown = self.revealed.min(self.page.batches.len());
        Ok(format!(
            "<html><body><div class=\"sportName\">{}</div></body></html>",
            self.page.batches[..shown].concat()
        ))
    }

    async fn close(&mut self) -> Result<()> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if self.page.close_fails {
            return Err(ScraperError::Session("browser already gone".to_string()));
        }
        Ok(())
    }
}

pub fn match_row(time: &str, home: &str, away: &str, home_score: &str, away_score: &str) -> String {
    format!(
        r#"<div class="event__match event__match--static">
            <div class="event__time">{time}</div>
            <div class="event__participant event__participant--home">{home}</div>
            <div class="event__participant event__participant--away fontBold">{away}</div>
            <div class="event__score event__score--home">{home_score}</div>
            <div class="event__score event__score--away">{away_score}</div>
        </div>"#
    )
}

/// Row in the newer markup, where both names use the same node type.
pub fn simple_text_row(time: &str, home: &str, away: &str, home_score: &str, away_score: &str) -> String {
    format!(
        r#"<div class="event__match">
            <div class="event__time">{time}</div>
            <span class="wcl-simpleText_Asp-0 wcl-scores-simpleText-01_pV2Wk">{home}</span>
            <span class="wcl-simpleText_Asp-0 wcl-scores-simpleText-01_pV2Wk wcl-bold">{away}</span>
            <div class="event__score event__score--home">{home_score}</div>
            <div class="event__score event__score--away">{away_score}</div>
        </div>"#
    )
}

pub fn fast_settings() -> PaginationSettings {
    PaginationSettings {
        settle_ms: 0,
        interact_timeout_ms: 0,
        ..PaginationSettings::default()
    }
}

pub fn aggregator(renderer: Arc<FakeRenderer>) -> SeasonAggregator {
    let loader = PageLoader::new(renderer, fast_settings());
    SeasonAggregator::new(loader, RecordExtractor::default(), DateNormalizer::default(), HOST)
}
