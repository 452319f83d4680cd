use crate::browser::{ControlProbe, RenderSession, Renderer};
use crate::constants::{
    DEFAULT_INTERACT_TIMEOUT_MS, DEFAULT_MAX_REVEALS, DEFAULT_SETTLE_MS, SHOW_MORE_SELECTOR,
};
use crate::error::Result;
use crate::metrics::ScrapeMetrics;
use crate::types::RenderedDocument;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Pagination options, read from the `[pagination]` config section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    pub control_selector: String,
    pub interact_timeout_ms: u64,
    pub settle_ms: u64,
    pub max_reveals: usize,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            control_selector: SHOW_MORE_SELECTOR.to_string(),
            interact_timeout_ms: DEFAULT_INTERACT_TIMEOUT_MS,
            settle_ms: DEFAULT_SETTLE_MS,
            max_reveals: DEFAULT_MAX_REVEALS,
        }
    }
}

impl PaginationSettings {
    fn interact_timeout(&self) -> Duration {
        Duration::from_millis(self.interact_timeout_ms)
    }

    fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Why the reveal loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhaustion {
    ControlAbsent,
    NotInteractable,
    CapReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationReport {
    pub reveals: usize,
    pub exhaustion: Exhaustion,
}

/// Opens a season page and clicks "show more" until nothing is left to reveal.
pub struct PageLoader {
    renderer: Arc<dyn Renderer>,
    settings: PaginationSettings,
}

impl PageLoader {
    pub fn new(renderer: Arc<dyn Renderer>, settings: PaginationSettings) -> Self {
        Self { renderer, settings }
    }

    /// Load `url` fully. The session is closed on every exit path.
    #[instrument(skip(self))]
    pub async fn load(&self, url: &str) -> Result<RenderedDocument> {
        let mut session = self.renderer.open(url).await?;

        let outcome = match self.reveal_all(session.as_mut()).await {
            Ok(report) => session.page_source().await.map(|html| (report, html)),
            Err(e) => Err(e),
        };

        if let Err(e) = session.close().await {
            warn!("Failed to close rendering session for {}: {}", url, e);
        }
        let (report, html) = outcome?;

        debug!(
            "Loaded {} after {} reveals ({:?})",
            url, report.reveals, report.exhaustion
        );
        Ok(RenderedDocument::new(url, html, report))
    }

    async fn reveal_all(&self, session: &mut dyn RenderSession) -> Result<PaginationReport> {
        let selector = self.settings.control_selector.as_str();
        let mut reveals = 0usize;

        loop {
            if reveals >= self.settings.max_reveals {
                warn!(
                    "Stopping pagination on {} after {} reveals (cap reached)",
                    session.url(),
                    reveals
                );
                return Ok(PaginationReport {
                    reveals,
                    exhaustion: Exhaustion::CapReached,
                });
            }

            let exhaustion = match session
                .probe_control(selector, self.settings.interact_timeout())
                .await?
            {
                ControlProbe::Ready => {
                    if session.activate_control(selector).await? {
                        reveals += 1;
                        ScrapeMetrics::record_reveal();
                        debug!("Revealed more results on {} (#{})", session.url(), reveals);
                        tokio::time::sleep(self.settings.settle_interval()).await;
                        continue;
                    }
                    Exhaustion::ControlAbsent
                }
                ControlProbe::NotFound => Exhaustion::ControlAbsent,
                ControlProbe::NotInteractable => Exhaustion::NotInteractable,
            };

            return Ok(PaginationReport { reveals, exhaustion });
        }
    }
}
