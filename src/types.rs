use crate::error::{Result, ScraperError};
use crate::loader::PaginationReport;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Year range and labelling convention for one league's archive.
///
/// Seasons are iterated over `[start_year, end_year)`. When `has_seasons`
/// is set a season spans two calendar years and is labelled `"YYYY-YYYY"`,
/// otherwise it is labelled `"YYYY"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonSpec {
    pub start_year: i32,
    pub end_year: i32,
    pub has_seasons: bool,
}

impl SeasonSpec {
    pub fn new(start_year: i32, end_year: i32, has_seasons: bool) -> Result<Self> {
        if start_year >= end_year {
            return Err(ScraperError::InvalidSeason(format!(
                "start year {start_year} must be lower than end year {end_year}"
            )));
        }
        Ok(Self {
            start_year,
            end_year,
            has_seasons,
        })
    }

    pub fn years(&self) -> Range<i32> {
        self.start_year..self.end_year
    }

    /// Label of the season starting in `year`
    pub fn label_for(&self, year: i32) -> String {
        if self.has_seasons {
            format!("{}-{}", year, year + 1)
        } else {
            year.to_string()
        }
    }

    pub fn season_count(&self) -> usize {
        self.years().len()
    }
}

/// Sport / country / league triple identifying an archive on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueTarget {
    pub sport: String,
    pub country: String,
    pub league: String,
}

impl LeagueTarget {
    pub fn new(sport: impl Into<String>, country: impl Into<String>, league: impl Into<String>) -> Self {
        Self {
            sport: sport.into(),
            country: country.into(),
            league: league.into(),
        }
    }

    pub fn base_url(&self, host: &str) -> String {
        format!("https://{}/{}/{}/{}", host, self.sport, self.country, self.league)
    }

    /// `https://<host>/<sport>/<country>/<league>-<season_label>/results/`
    pub fn season_url(&self, host: &str, season_label: &str) -> String {
        format!("{}-{}/results/", self.base_url(host), season_label)
    }
}

/// One finished match, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "DT", with = "crate::storage::csv_datetime")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "Home")]
    pub home_name: String,
    #[serde(rename = "Away")]
    pub away_name: String,
    #[serde(rename = "Home_points")]
    pub home_score: u32,
    #[serde(rename = "Away_points")]
    pub away_score: u32,
    #[serde(rename = "season")]
    pub season_label: String,
    pub country: String,
    pub league: String,
}

/// Ordered collection of match records.
///
/// Each newly scraped season is placed ahead of everything accumulated so
/// far, so the most recently processed season comes first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<MatchRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }

    pub fn prepend_season(&mut self, mut batch: Vec<MatchRecord>) {
        batch.append(&mut self.records);
        self.records = batch;
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a MatchRecord;
    type IntoIter = std::slice::Iter<'a, MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Page source of one season after pagination has been exhausted.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    url: String,
    html: String,
    pagination: PaginationReport,
}

impl RenderedDocument {
    pub fn new(url: impl Into<String>, html: impl Into<String>, pagination: PaginationReport) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            pagination,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn pagination(&self) -> &PaginationReport {
        &self.pagination
    }
}
