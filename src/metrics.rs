//! Scrape metrics
//!
//! Thin wrappers over the `metrics` facade. Nothing is exported unless the
//! embedding application installs a recorder.

/// Metrics collection for season scraping
pub struct ScrapeMetrics;

impl ScrapeMetrics {
    /// Record one activation of the "show more" control
    pub fn record_reveal() {
        ::metrics::counter!("fs_pagination_reveals_total").increment(1);
    }

    /// Record a season that produced records
    pub fn record_season_scraped(league: &str, matches: usize, duration_secs: f64) {
        ::metrics::counter!("fs_seasons_scraped_total", "league" => league.to_string()).increment(1);
        ::metrics::counter!("fs_matches_scraped_total", "league" => league.to_string())
            .increment(matches as u64);
        ::metrics::histogram!("fs_season_duration_seconds").record(duration_secs);
    }

    pub fn record_season_failed(league: &str) {
        ::metrics::counter!("fs_seasons_failed_total", "league" => league.to_string()).increment(1);
    }

    /// Record a page that needed the parity fallback for participant names
    pub fn record_fallback_strategy() {
        ::metrics::counter!("fs_participant_fallback_total").increment(1);
    }
}
