//! Shopfront Harvest main entry point
//!
//! This is the command-line interface for the product scraper.

use clap::Parser;
use shopfront_harvest::config::{load_config_with_hash, Config};
use shopfront_harvest::crawler::Harvester;
use shopfront_harvest::output::print_run_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shopfront Harvest: a polite single-site product scraper
///
/// Walks the site's category pages while respecting robots.txt, extracts
/// product records and writes them to a dated CSV file.
#[derive(Parser, Debug)]
#[command(name = "shopfront-harvest")]
#[command(version)]
#[command(about = "A polite single-site product scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long, conflicts_with = "list_categories")]
    dry_run: bool,

    /// Fetch robots.txt and the homepage, print the categories and exit
    #[arg(long, conflicts_with = "dry_run")]
    list_categories: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.list_categories {
        handle_list_categories(config).await?;
    } else {
        handle_scrape(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shopfront_harvest=info,warn"),
            1 => EnvFilter::new("shopfront_harvest=debug,info"),
            2 => EnvFilter::new("shopfront_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Shopfront Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Root URL: {}", config.site.root_url);
    println!("  Source: {} ({})", config.site.source_name, config.site.source_slug);
    println!("  Currency: {}", config.site.currency);

    println!("\nUser Agent:");
    println!("  User-Agent: {}", config.user_agent.header_value());
    println!("  From: {}", config.user_agent.contact_email);

    println!("\nScraper:");
    println!("  Items per listing page: {}", config.scraper.items_per_page);
    println!(
        "  Default delay: {}s (robots.txt Crawl-delay takes precedence)",
        config.scraper.default_delay_secs
    );
    println!("  Request timeout: {}s", config.scraper.request_timeout_secs);
    println!("  On product error: {:?}", config.scraper.on_product_error);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    println!("\n✓ Configuration is valid");
}

/// Handles the --list-categories mode
async fn handle_list_categories(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let harvester = Harvester::new(config).await?;
    let categories = harvester.discover_categories().await?;

    println!("Categories ({}):", categories.len());
    for category in &categories {
        println!("  - {}: {}", category.name, category.url);
    }

    Ok(())
}

/// Handles the main scrape run
async fn handle_scrape(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting scrape of {}", config.site.root_url);

    let harvester = Harvester::new(config).await?;
    match harvester.run().await {
        Ok(summary) => {
            tracing::info!("Scrape completed successfully");
            print_run_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
