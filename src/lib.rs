//! Shopfront Harvest: a polite single-site product scraper
//!
//! This crate walks the category pages of one e-commerce site, respecting its
//! robots.txt, extracts product records (name, price, size, description) from
//! each product page and writes them to a dated CSV export.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod robots;

use thiserror::Error;

/// Main error type for scraping operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid CSS selector '{0}'")]
    Selector(&'static str),

    #[error("Missing {what} on {url}")]
    MissingMarkup { url: String, what: &'static str },

    #[error("Missing field '{field}' in product data on {url}")]
    MissingField { url: String, field: &'static str },

    #[error("Malformed JSON payload on {url}: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Robots.txt error: {0}")]
    Robots(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for scraping operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_scrape, FetchGate, FetchOutcome, Harvester, RunSummary};
pub use record::{ProductRecord, RecordTemplate};
