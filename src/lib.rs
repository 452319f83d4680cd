pub mod browser;
pub mod config;
pub mod constants;
pub mod error;
pub mod job;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod storage;
pub mod types;

pub use error::{Result, ScraperError};
pub use types::{Dataset, LeagueTarget, MatchRecord, RenderedDocument, SeasonSpec};
