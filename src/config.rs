use crate::browser::BrowserSettings;
use crate::constants::{DEFAULT_HOST, DEFAULT_ROLLOVER_MONTH};
use crate::error::{Result, ScraperError};
use crate::loader::PaginationSettings;
use crate::pipeline::SeasonFailurePolicy;
use crate::types::{LeagueTarget, SeasonSpec};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub pagination: PaginationSettings,
    #[serde(default)]
    pub scrape: ScrapeSettings,
    #[serde(default, rename = "job")]
    pub jobs: Vec<JobConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    pub host: String,
    pub rollover_month: u32,
    pub on_season_error: SeasonFailurePolicy,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            rollover_month: DEFAULT_ROLLOVER_MONTH,
            on_season_error: SeasonFailurePolicy::Abort,
        }
    }
}

/// One league to scrape into one CSV file.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub out_path: PathBuf,
    pub start_year: i32,
    /// Exclusive
    pub end_year: i32,
    pub sport: String,
    pub country: String,
    pub league: String,
    #[serde(default = "default_has_seasons")]
    pub has_seasons: bool,
    /// 0 silent, 1 progress, 2 debug
    #[serde(default)]
    pub verbosity_level: u8,
}

fn default_has_seasons() -> bool {
    true
}

impl JobConfig {
    pub fn season_spec(&self) -> Result<SeasonSpec> {
        SeasonSpec::new(self.start_year, self.end_year, self.has_seasons)
    }

    pub fn target(&self) -> LeagueTarget {
        LeagueTarget::new(&self.sport, &self.country, &self.league)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        for job in &config.jobs {
            job.season_spec()?;
        }
        Ok(config)
    }
}
