use crate::config::JobConfig;
use crate::error::Result;
use crate::pipeline::{RunReport, SeasonAggregator};
use crate::storage;
use crate::types::Dataset;
use tracing::info;

/// One configured league scrape and the dataset it has accumulated.
pub struct ScrapeJob {
    config: JobConfig,
    dataset: Dataset,
}

impl ScrapeJob {
    pub fn new(config: JobConfig) -> Result<Self> {
        config.season_spec()?;
        Ok(Self {
            config,
            dataset: Dataset::new(),
        })
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Scrape every configured season; write the CSV when `save_csv` is set.
    pub async fn run(&mut self, aggregator: &SeasonAggregator, save_csv: bool) -> Result<RunReport> {
        let spec = self.config.season_spec()?;
        let target = self.config.target();

        let mut report = aggregator.run_with_report(&spec, &target).await?;
        // The job keeps the records; the returned report only carries season outcomes.
        self.dataset = std::mem::take(&mut report.dataset);

        if save_csv {
            self.save_csv()?;
        }
        Ok(report)
    }

    pub fn data(&self) -> &Dataset {
        &self.dataset
    }

    pub fn save_csv(&self) -> Result<()> {
        storage::write_csv(&self.dataset, &self.config.out_path)?;
        info!(
            "Saving {} data to {}",
            self.config.league,
            self.config.out_path.display()
        );
        Ok(())
    }
}
