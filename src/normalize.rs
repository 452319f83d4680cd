//! Resolution of year-less archive dates into absolute timestamps.
//!
//! Results pages render kick-off times as `"DD.MM. HH:MM"`. The year is
//! recovered from the season label: single-year seasons use the label as is,
//! two-year seasons (`"2002-2003"`) assign months from the rollover month
//! onwards to the first year and earlier months to the second.

use crate::constants::DEFAULT_ROLLOVER_MONTH;
use crate::error::{Result, ScraperError};
use crate::types::SeasonSpec;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

static DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}\.(\d{2})\.").expect("date prefix pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    rollover_month: u32,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self {
            rollover_month: DEFAULT_ROLLOVER_MONTH,
        }
    }
}

impl DateNormalizer {
    pub fn new(rollover_month: u32) -> Result<Self> {
        if !(1..=12).contains(&rollover_month) {
            return Err(ScraperError::Config(format!(
                "rollover month must be within 1..=12, got {rollover_month}"
            )));
        }
        Ok(Self { rollover_month })
    }

    /// Turn `"DD.MM. HH:MM"` into a timestamp using the season's year(s).
    pub fn normalize(
        &self,
        raw: &str,
        season: &SeasonSpec,
        season_label: &str,
    ) -> Result<NaiveDateTime> {
        let raw = raw.trim();
        let captures = DATE_PREFIX.captures(raw).ok_or_else(|| ScraperError::InvalidDate {
            raw: raw.to_string(),
            reason: "expected a 'DD.MM.' prefix".to_string(),
        })?;
        let prefix_len = captures.get(0).map(|m| m.end()).unwrap_or_default();
        let month: u32 = captures[1].parse().map_err(|_| ScraperError::InvalidDate {
            raw: raw.to_string(),
            reason: "month is not a number".to_string(),
        })?;

        let year = self.resolve_year(month, season, season_label)?;
        let full = format!("{}{}{}", &raw[..prefix_len], year, &raw[prefix_len..]);

        NaiveDateTime::parse_from_str(&full, TIMESTAMP_FORMAT).map_err(|e| {
            ScraperError::InvalidDate {
                raw: raw.to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Pick the calendar year a month of `season_label` falls in.
    pub fn resolve_year<'a>(
        &self,
        month: u32,
        season: &SeasonSpec,
        season_label: &'a str,
    ) -> Result<&'a str> {
        if !season.has_seasons {
            return Ok(season_label);
        }
        let (first, second) = season_label.split_once('-').ok_or_else(|| {
            ScraperError::InvalidDate {
                raw: season_label.to_string(),
                reason: "season label is not of the form YYYY-YYYY".to_string(),
            }
        })?;
        if month < self.rollover_month {
            Ok(second)
        } else {
            Ok(first)
        }
    }
}
