use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for a scrape run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The single site being scraped
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site root; robots.txt and the homepage are resolved against it
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Human-readable source name stamped on every record
    #[serde(rename = "source-name")]
    pub source_name: String,

    /// Short identifier used in the export file name
    #[serde(rename = "source-slug")]
    pub source_slug: String,

    /// ISO 4217 currency code stamped on every record
    pub currency: String,
}

/// Client identification sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Product token, also the identifier matched against robots.txt groups
    #[serde(rename = "client-name")]
    pub client_name: String,

    /// Version appended to the product token
    #[serde(rename = "client-version")]
    pub client_version: String,

    /// Sent in the `From` header
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// The `User-Agent` header value: `ClientName/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.client_name, self.client_version)
    }
}

/// What to do when a product page lacks the expected markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductErrorPolicy {
    /// Propagate the error and abort the run
    #[default]
    Abort,
    /// Log, count the product as skipped and continue
    Skip,
}

/// Traversal behavior
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Maximum product links taken from each listing page
    #[serde(rename = "items-per-page", default = "default_items_per_page")]
    pub items_per_page: usize,

    /// Politeness delay (seconds) used when robots.txt has no Crawl-delay
    #[serde(rename = "default-delay-secs", default = "default_delay_secs")]
    pub default_delay_secs: f64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(rename = "on-product-error", default)]
    pub on_product_error: ProductErrorPolicy,
}

/// Largest accepted `default-delay-secs`
pub const MAX_DEFAULT_DELAY_SECS: f64 = 3600.0;

impl ScraperConfig {
    /// The configured delay, capped at [`MAX_DEFAULT_DELAY_SECS`]
    ///
    /// Values validation would reject (negative or NaN) become zero.
    pub fn default_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.default_delay_secs.min(MAX_DEFAULT_DELAY_SECS))
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
            default_delay_secs: default_delay_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            on_product_error: ProductErrorPolicy::default(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the dated CSV export is written to
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_items_per_page() -> usize {
    3
}

fn default_delay_secs() -> f64 {
    1.0
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_output_directory() -> String {
    ".".to_string()
}
