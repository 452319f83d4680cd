use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};

use flashscore_scraper::browser::ChromeRenderer;
use flashscore_scraper::config::{Config, JobConfig};
use flashscore_scraper::job::ScrapeJob;
use flashscore_scraper::loader::PageLoader;
use flashscore_scraper::logging;
use flashscore_scraper::normalize::DateNormalizer;
use flashscore_scraper::parser::RecordExtractor;
use flashscore_scraper::pipeline::{RunReport, SeasonAggregator, SeasonFailurePolicy};

#[derive(Parser)]
#[command(name = "flashscore_scraper")]
#[command(about = "Historical match results scraper for Flashscore archives")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML config with [browser], [pagination], [scrape] and [[job]] sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v progress, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one league into a CSV file
    Scrape {
        #[arg(long)]
        sport: String,
        #[arg(long)]
        country: String,
        #[arg(long)]
        league: String,
        /// Lower year of the first season
        #[arg(long)]
        start_year: i32,
        /// Exclusive upper bound
        #[arg(long)]
        end_year: i32,
        /// Seasons are single calendar years ("YYYY" instead of "YYYY-YYYY")
        #[arg(long)]
        single_year: bool,
        #[arg(long)]
        out: PathBuf,
        /// Continue with the next season when one fails
        #[arg(long)]
        skip_failed: bool,
    },
    /// Run every [[job]] of the config file sequentially
    Batch {
        /// Only run these leagues (comma-separated)
        #[arg(long)]
        leagues: Option<String>,
    },
}

fn build_aggregator(config: &Config) -> anyhow::Result<SeasonAggregator> {
    let renderer = Arc::new(ChromeRenderer::new(config.browser.clone().with_env_fallback()));
    let loader = PageLoader::new(renderer, config.pagination.clone());
    let normalizer = DateNormalizer::new(config.scrape.rollover_month)?;
    Ok(
        SeasonAggregator::new(loader, RecordExtractor::default(), normalizer, &config.scrape.host)
            .with_failure_policy(config.scrape.on_season_error),
    )
}

fn print_summary(league: &str, report: &RunReport, records: usize, out: &std::path::Path) {
    println!("\n📊 Results for {}:", league);
    println!("   Seasons scraped: {}", report.seasons.len());
    println!("   Matches: {}", records);
    println!("   Output file: {}", out.display());
    if !report.failures.is_empty() {
        println!("\n⚠️  Seasons skipped:");
        for failure in &report.failures {
            println!("   - {}: {}", failure.season_label, failure.error);
        }
    }
}

async fn run_jobs(
    jobs: Vec<JobConfig>,
    aggregator: &SeasonAggregator,
    verbosity: u8,
) -> anyhow::Result<()> {
    for job_config in jobs {
        let span = tracing::info_span!("job", league = %job_config.league);

        let mut job = ScrapeJob::new(job_config)?;
        info!(
            "Starting {} from {} to {}",
            job.config().league,
            job.config().start_year,
            job.config().end_year
        );

        match job.run(aggregator, true).instrument(span).await {
            Ok(report) if verbosity > 0 => {
                print_summary(&job.config().league, &report, job.data().len(), &job.config().out_path);
            }
            Ok(_) => {}
            Err(e) => {
                error!("Scrape of {} failed: {}", job.config().league, e);
                return Err(e).with_context(|| format!("scraping {}", job.config().league));
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let jobs = match cli.command {
        Commands::Scrape {
            sport,
            country,
            league,
            start_year,
            end_year,
            single_year,
            out,
            skip_failed,
        } => {
            if skip_failed {
                config.scrape.on_season_error = SeasonFailurePolicy::Skip;
            }
            vec![JobConfig {
                out_path: out,
                start_year,
                end_year,
                sport,
                country,
                league,
                has_seasons: !single_year,
                verbosity_level: cli.verbose,
            }]
        }
        Commands::Batch { leagues } => {
            if cli.config.is_none() {
                anyhow::bail!("batch requires --config with at least one [[job]]");
            }
            let wanted: Option<Vec<String>> =
                leagues.map(|list| list.split(',').map(|s| s.trim().to_string()).collect());
            let jobs: Vec<JobConfig> = config
                .jobs
                .iter()
                .filter(|job| wanted.as_ref().map_or(true, |w| w.contains(&job.league)))
                .cloned()
                .collect();
            jobs
        }
    };

    let verbosity = jobs
        .iter()
        .map(|job| job.verbosity_level)
        .chain(std::iter::once(cli.verbose))
        .max()
        .unwrap_or_default();
    logging::init_logging(verbosity);
    if jobs.is_empty() {
        warn!("No jobs selected");
    }

    let aggregator = build_aggregator(&config)?;
    run_jobs(jobs, &aggregator, verbosity).await
}
