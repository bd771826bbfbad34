//! Run coordinator - top-level scrape orchestration
//!
//! This module drives one batch run:
//! - Loading robots.txt and resolving the politeness delay
//! - Discovering categories from the homepage navigation
//! - Running the paginator once per category
//! - Writing the dated CSV export

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, FetchGate, FetchOutcome};
use crate::crawler::paginator::{CategoryStats, Paginator};
use crate::crawler::parser::{discover_categories, CategoryLink};
use crate::output::{export_file_name, write_csv_file};
use crate::record::{ProductRecord, RecordTemplate};
use crate::robots::fetch_robots;
use crate::ScrapeError;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Categories found in the site navigation
    pub categories: usize,
    /// Records written to the export
    pub records: usize,
    /// Counters summed over all categories
    pub stats: CategoryStats,
    /// Delay applied before every listing and product fetch
    pub delay: Duration,
    /// Path of the CSV export
    pub export_path: PathBuf,
}

/// One scrape run against the configured site
pub struct Harvester {
    config: Config,
    root: Url,
    gate: FetchGate,
    template: RecordTemplate,
    delay: Duration,
}

impl Harvester {
    /// Creates a harvester dated today
    ///
    /// Fetches robots.txt once; the gate built from it is used for every
    /// later request in the run.
    pub async fn new(config: Config) -> Result<Self, ScrapeError> {
        Self::with_run_date(config, Local::now().date_naive()).await
    }

    /// Creates a harvester whose records and export carry `run_date`
    pub async fn with_run_date(config: Config, run_date: NaiveDate) -> Result<Self, ScrapeError> {
        let root = Url::parse(&config.site.root_url)?;
        let client = build_http_client(&config.user_agent, config.scraper.request_timeout_secs)?;
        let robots = fetch_robots(&client, &root).await?;
        let gate = FetchGate::new(client, robots, config.user_agent.client_name.clone());

        let delay = match gate.crawl_delay() {
            Some(delay) => {
                tracing::info!("Using robots.txt crawl delay of {:?}", delay);
                delay
            }
            None => {
                let delay = config.scraper.default_delay();
                tracing::info!("No crawl delay in robots.txt, using default {:?}", delay);
                delay
            }
        };

        let template = RecordTemplate::for_site(&config.site, run_date);

        Ok(Self {
            config,
            root,
            gate,
            template,
            delay,
        })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Where this run's export is written
    pub fn export_path(&self) -> PathBuf {
        Path::new(&self.config.output.directory).join(export_file_name(
            &self.config.site.source_slug,
            &self.template.date,
        ))
    }

    /// Discovers `(name, url)` category pairs from the homepage
    ///
    /// A homepage denied by robots.txt yields no categories.
    pub async fn discover_categories(&self) -> Result<Vec<CategoryLink>, ScrapeError> {
        let page = match self.gate.fetch(self.root.as_str()).await? {
            FetchOutcome::Fetched(page) => page,
            FetchOutcome::Denied { url } => {
                tracing::warn!("Homepage {} disallowed by robots.txt, no categories", url);
                return Ok(Vec::new());
            }
        };

        let base = Url::parse(&page.final_url)?;
        let categories = discover_categories(&page.body, &base)?;
        tracing::info!("Discovered {} categories", categories.len());
        Ok(categories)
    }

    /// Scrapes every category and returns all records in traversal order
    pub async fn scrape_all(
        &self,
        categories: &[CategoryLink],
    ) -> Result<(Vec<ProductRecord>, CategoryStats), ScrapeError> {
        let paginator =
            Paginator::from_config(&self.gate, &self.template, self.delay, &self.config.scraper);

        let mut records = Vec::new();
        let mut stats = CategoryStats::default();

        for (idx, category) in categories.iter().enumerate() {
            tracing::info!(
                "Scraping category {}/{} '{}' at {}",
                idx + 1,
                categories.len(),
                category.name,
                category.url
            );

            let scrape = paginator
                .scrape_category(&category.url, &category.name)
                .await?;

            tracing::info!(
                "Category '{}': {} records from {} listing pages",
                category.name,
                scrape.records.len(),
                scrape.stats.listing_pages
            );

            stats.merge(&scrape.stats);
            records.extend(scrape.records);
        }

        Ok((records, stats))
    }

    /// Runs the whole batch: discover, scrape, export
    ///
    /// Any unhandled failure aborts the run before the export is written.
    pub async fn run(&self) -> Result<RunSummary, ScrapeError> {
        let start_time = std::time::Instant::now();

        let categories = self.discover_categories().await?;
        let (records, stats) = self.scrape_all(&categories).await?;

        let export_path = self.export_path();
        write_csv_file(&records, &export_path)?;

        tracing::info!(
            "Scrape completed: {} records from {} categories in {:?}",
            records.len(),
            categories.len(),
            start_time.elapsed()
        );

        Ok(RunSummary {
            categories: categories.len(),
            records: records.len(),
            stats,
            delay: self.delay,
            export_path,
        })
    }
}

/// Runs a complete scrape with today's date
///
/// # Example
///
/// ```no_run
/// use shopfront_harvest::config::load_config;
/// use shopfront_harvest::crawler::run_scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = run_scrape(config).await?;
/// println!("{} records", summary.records);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config) -> Result<RunSummary, ScrapeError> {
    let harvester = Harvester::new(config).await?;
    harvester.run().await
}
