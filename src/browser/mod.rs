//! Rendering sessions for dynamically loaded results pages.
//!
//! A [`Renderer`] opens one [`RenderSession`] per page. The session owns the
//! underlying browser and must be closed by whoever opened it.

pub mod chrome;

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub use chrome::{BrowserSettings, ChromeRenderer};

/// State of the "reveal more" control after waiting for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlProbe {
    /// Present, visible and enabled
    Ready,
    /// Never appeared within the implicit wait
    NotFound,
    /// Present but not clickable within the timeout
    NotInteractable,
}

#[async_trait]
pub trait RenderSession: Send {
    /// URL the session was opened on
    fn url(&self) -> &str;

    /// Wait up to `timeout` for the control matching `selector` to become clickable.
    ///
    /// Errors are reserved for failures of the session itself; a missing or
    /// hidden control is reported through [`ControlProbe`].
    async fn probe_control(&mut self, selector: &str, timeout: Duration) -> Result<ControlProbe>;

    /// Scroll the control into view and click it. Returns `false` when the
    /// control disappeared before it could be clicked.
    async fn activate_control(&mut self, selector: &str) -> Result<bool>;

    /// Current serialized DOM
    async fn page_source(&mut self) -> Result<String>;

    /// Release the browser backing this session.
    async fn close(&mut self) -> Result<()>;
}

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Open a fresh session navigated to `url`.
    async fn open(&self, url: &str) -> Result<Box<dyn RenderSession>>;
}
