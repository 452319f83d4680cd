use super::{ControlProbe, RenderSession, Renderer};
use crate::constants::{
    CONTROL_POLL_INTERVAL_MS, DEFAULT_IMPLICIT_WAIT_MS, DEFAULT_INITIAL_SETTLE_MS,
};
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Browser launch options, read from the `[browser]` config section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub no_sandbox: bool,
    /// How long the reveal control may take to show up at all
    pub implicit_wait_ms: u64,
    /// Pause after the first navigation before the page is inspected
    pub initial_settle_ms: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            no_sandbox: false,
            implicit_wait_ms: DEFAULT_IMPLICIT_WAIT_MS,
            initial_settle_ms: DEFAULT_INITIAL_SETTLE_MS,
        }
    }
}

impl BrowserSettings {
    /// Fill in the executable from `CHROME_EXECUTABLE` when the config left it out.
    pub fn with_env_fallback(mut self) -> Self {
        if self.chrome_executable.is_none() {
            self.chrome_executable = std::env::var_os("CHROME_EXECUTABLE").map(PathBuf::from);
        }
        self
    }

    fn browser_config(&self) -> Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder();
        if !self.headless {
            builder = builder.with_head();
        }
        if self.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(ScraperError::Session)
    }
}

/// Launches a dedicated headless Chrome per session.
pub struct ChromeRenderer {
    settings: BrowserSettings,
}

impl ChromeRenderer {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Renderer for ChromeRenderer {
    async fn open(&self, url: &str) -> Result<Box<dyn RenderSession>> {
        let config = self.settings.browser_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::Session(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let mut session = ChromeSession {
            url: url.to_string(),
            browser,
            page: None,
            handler_task,
            implicit_wait: Duration::from_millis(self.settings.implicit_wait_ms),
        };

        match session.navigate().await {
            Ok(()) => {
                tokio::time::sleep(Duration::from_millis(self.settings.initial_settle_ms)).await;
                Ok(Box::new(session))
            }
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    warn!("Failed to close browser after navigation error: {}", close_err);
                }
                Err(e)
            }
        }
    }
}

pub struct ChromeSession {
    url: String,
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
    implicit_wait: Duration,
}

impl ChromeSession {
    async fn navigate(&mut self) -> Result<()> {
        let page = self
            .browser
            .new_page(self.url.as_str())
            .await
            .map_err(|e| self.navigation_error(e))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| self.navigation_error(e))?;
        self.page = Some(page);
        Ok(())
    }

    fn navigation_error(&self, e: impl ToString) -> ScraperError {
        ScraperError::Navigation {
            url: self.url.clone(),
            message: e.to_string(),
        }
    }

    fn pagination_error(&self, e: impl ToString) -> ScraperError {
        ScraperError::Pagination {
            url: self.url.clone(),
            message: e.to_string(),
        }
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| ScraperError::Session(format!("no page open for {}", self.url)))
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, script: String) -> Result<T> {
        let page = self.page()?.clone();
        let result = page
            .evaluate(script)
            .await
            .map_err(|e| self.pagination_error(e))?;
        result.into_value::<T>().map_err(|e| self.pagination_error(e))
    }
}

/// Quote `selector` as a JavaScript string literal.
fn js_string(selector: &str) -> String {
    serde_json::Value::String(selector.to_string()).to_string()
}

fn control_state_script(selector: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector({sel});
            if (!el) return "missing";
            const style = window.getComputedStyle(el);
            const rect = el.getBoundingClientRect();
            if (style.display === "none" || style.visibility === "hidden" || el.disabled) return "hidden";
            if (rect.width === 0 && rect.height === 0) return "hidden";
            return "ready";
        }})()"#,
        sel = js_string(selector)
    )
}

/// Decide what one polled control state means after `elapsed`.
///
/// `None` keeps polling. A control that never shows up stops counting at the
/// implicit wait; one that stays hidden stops at the interact timeout.
fn classify(
    state: &str,
    elapsed: Duration,
    implicit_wait: Duration,
    timeout: Duration,
) -> Option<ControlProbe> {
    match state {
        "ready" => Some(ControlProbe::Ready),
        "missing" if elapsed >= implicit_wait => Some(ControlProbe::NotFound),
        "hidden" if elapsed >= timeout => Some(ControlProbe::NotInteractable),
        _ if elapsed >= timeout => Some(ControlProbe::NotFound),
        _ => None,
    }
}

fn activate_script(selector: &str) -> String {
    format!(
        r#"(() => {{
            const el = document.querySelector({sel});
            if (!el) return false;
            el.scrollIntoView();
            el.click();
            return true;
        }})()"#,
        sel = js_string(selector)
    )
}

#[async_trait]
impl RenderSession for ChromeSession {
    fn url(&self) -> &str {
        &self.url
    }

    async fn probe_control(&mut self, selector: &str, timeout: Duration) -> Result<ControlProbe> {
        let started = Instant::now();
        let poll = Duration::from_millis(CONTROL_POLL_INTERVAL_MS);
        let script = control_state_script(selector);
        loop {
            let state: String = self.eval(script.clone()).await?;
            if let Some(probe) = classify(&state, started.elapsed(), self.implicit_wait, timeout) {
                return Ok(probe);
            }
            tokio::time::sleep(poll).await;
        }
    }

    async fn activate_control(&mut self, selector: &str) -> Result<bool> {
        let clicked: bool = self.eval(activate_script(selector)).await?;
        debug!("activate control on {}: clicked={}", self.url, clicked);
        Ok(clicked)
    }

    async fn page_source(&mut self) -> Result<String> {
        let page = self.page()?.clone();
        page.content()
            .await
            .map_err(|e| ScraperError::Session(e.to_string()))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("page close failed for {}: {}", self.url, e);
            }
        }
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            debug!("browser process wait failed for {}: {}", self.url, e);
        }
        self.handler_task.abort();
        closed
            .map(|_| ())
            .map_err(|e| ScraperError::Session(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_is_quoted_for_js() {
        let script = activate_script(r#"[class="a b"]"#);
        assert!(script.contains(r#"document.querySelector("[class=\"a b\"]")"#));
    }

    const WAIT: Duration = Duration::from_millis(3_000);
    const TIMEOUT: Duration = Duration::from_millis(10_000);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_ready_control_is_reported_immediately() {
        assert_eq!(classify("ready", ms(0), WAIT, TIMEOUT), Some(ControlProbe::Ready));
    }

    #[test]
    fn test_missing_control_waits_for_implicit_wait() {
        assert_eq!(classify("missing", ms(2_999), WAIT, TIMEOUT), None);
        assert_eq!(
            classify("missing", ms(3_000), WAIT, TIMEOUT),
            Some(ControlProbe::NotFound)
        );
    }

    #[test]
    fn test_hidden_control_waits_for_interact_timeout() {
        assert_eq!(classify("hidden", ms(3_000), WAIT, TIMEOUT), None);
        assert_eq!(classify("hidden", ms(9_999), WAIT, TIMEOUT), None);
        assert_eq!(
            classify("hidden", ms(10_000), WAIT, TIMEOUT),
            Some(ControlProbe::NotInteractable)
        );
    }

    #[test]
    fn test_unknown_state_gives_up_at_timeout() {
        assert_eq!(classify("detached", ms(5_000), WAIT, TIMEOUT), None);
        assert_eq!(
            classify("detached", ms(10_000), WAIT, TIMEOUT),
            Some(ControlProbe::NotFound)
        );
    }

    #[test]
    fn test_short_timeout_cuts_implicit_wait() {
        let timeout = ms(1_000);
        assert_eq!(classify("missing", ms(500), WAIT, timeout), None);
        assert_eq!(
            classify("missing", ms(1_000), WAIT, timeout),
            Some(ControlProbe::NotFound)
        );
        assert_eq!(
            classify("hidden", ms(1_000), WAIT, timeout),
            Some(ControlProbe::NotInteractable)
        );
    }

    #[test]
    fn test_default_settings() {
        let settings = BrowserSettings::default();
        assert!(settings.headless);
        assert_eq!(settings.implicit_wait_ms, 3_000);
        assert_eq!(settings.initial_settle_ms, 1_000);
    }
}
