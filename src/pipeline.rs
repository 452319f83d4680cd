use crate::error::{Result, ScraperError};
use crate::loader::{PageLoader, PaginationReport};
use crate::metrics::ScrapeMetrics;
use crate::normalize::DateNormalizer;
use crate::parser::{Extraction, RecordExtractor, StrategyKind};
use crate::types::{Dataset, LeagueTarget, MatchRecord, SeasonSpec};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// What to do when one season of a multi-season run fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonFailurePolicy {
    /// Abort the run with the first failure
    #[default]
    Abort,
    /// Log the failure and continue with the next season
    Skip,
}

/// Outcome of one successfully scraped season
#[derive(Debug, Clone)]
pub struct SeasonOutcome {
    pub season_label: String,
    pub url: String,
    pub records: usize,
    pub strategy: Option<StrategyKind>,
    pub pagination: PaginationReport,
}

#[derive(Debug)]
pub struct SeasonFailure {
    pub season_label: String,
    pub error: ScraperError,
}

/// Result of a complete multi-season run
#[derive(Debug, Default)]
pub struct RunReport {
    pub dataset: Dataset,
    pub seasons: Vec<SeasonOutcome>,
    pub failures: Vec<SeasonFailure>,
}

/// Drives load → extract → normalize for every season of a league.
pub struct SeasonAggregator {
    loader: PageLoader,
    extractor: RecordExtractor,
    normalizer: DateNormalizer,
    host: String,
    failure_policy: SeasonFailurePolicy,
}

impl SeasonAggregator {
    pub fn new(
        loader: PageLoader,
        extractor: RecordExtractor,
        normalizer: DateNormalizer,
        host: impl Into<String>,
    ) -> Self {
        Self {
            loader,
            extractor,
            normalizer,
            host: host.into(),
            failure_policy: SeasonFailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: SeasonFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub async fn run(&self, spec: &SeasonSpec, target: &LeagueTarget) -> Result<Dataset> {
        Ok(self.run_with_report(spec, target).await?.dataset)
    }

    /// Scrape every season in `[start_year, end_year)`, oldest first.
    #[instrument(skip(self, spec), fields(league = %target.league, country = %target.country))]
    pub async fn run_with_report(
        &self,
        spec: &SeasonSpec,
        target: &LeagueTarget,
    ) -> Result<RunReport> {
        let mut report = RunReport::default();

        for year in spec.years() {
            let season_label = spec.label_for(year);
            info!("Scraping {} season {}", target.league, season_label);

            match self.scrape_season(spec, target, &season_label).await {
                Ok((batch, outcome)) => {
                    report.dataset.prepend_season(batch);
                    report.seasons.push(outcome);
                    debug!("Total number of matches scraped: {}", report.dataset.len());
                }
                Err(e) => {
                    ScrapeMetrics::record_season_failed(&target.league);
                    let e = e.in_season(&season_label);
                    match self.failure_policy {
                        SeasonFailurePolicy::Abort => {
                            error!("Season {} failed, aborting run: {}", season_label, e);
                            return Err(e);
                        }
                        SeasonFailurePolicy::Skip => {
                            warn!("Season {} failed, skipping: {}", season_label, e);
                            report.failures.push(SeasonFailure {
                                season_label,
                                error: e,
                            });
                        }
                    }
                }
            }
        }

        Ok(report)
    }

    async fn scrape_season(
        &self,
        spec: &SeasonSpec,
        target: &LeagueTarget,
        season_label: &str,
    ) -> Result<(Vec<MatchRecord>, SeasonOutcome)> {
        let started = Instant::now();
        let url = target.season_url(&self.host, season_label);
        info!("Scraping data from {}", url);

        let document = self.loader.load(&url).await?;
        let extraction = self.extractor.extract(&document)?;
        if extraction.strategy == Some(StrategyKind::Fallback) {
            ScrapeMetrics::record_fallback_strategy();
        }

        let batch = assemble_records(&extraction, &self.normalizer, spec, season_label, target)?;
        ScrapeMetrics::record_season_scraped(
            &target.league,
            batch.len(),
            started.elapsed().as_secs_f64(),
        );

        let outcome = SeasonOutcome {
            season_label: season_label.to_string(),
            url,
            records: batch.len(),
            strategy: extraction.strategy,
            pagination: *document.pagination(),
        };
        Ok((batch, outcome))
    }
}

/// Zip the extracted sequences into records, in document order.
pub fn assemble_records(
    extraction: &Extraction,
    normalizer: &DateNormalizer,
    spec: &SeasonSpec,
    season_label: &str,
    target: &LeagueTarget,
) -> Result<Vec<MatchRecord>> {
    let count = extraction.ensure_aligned(season_label)?;
    let mut records = Vec::with_capacity(count);

    for i in 0..count {
        let timestamp = normalizer.normalize(&extraction.raw_times[i], spec, season_label)?;
        records.push(MatchRecord {
            timestamp,
            home_name: extraction.names_home[i].clone(),
            away_name: extraction.names_away[i].clone(),
            home_score: extraction.scores_home[i],
            away_score: extraction.scores_away[i],
            season_label: season_label.to_string(),
            country: target.country.clone(),
            league: target.league.clone(),
        });
    }

    Ok(records)
}
