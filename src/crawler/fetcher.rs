//! HTTP fetch gate
//!
//! Every request the scraper issues after loading robots.txt goes through
//! [`FetchGate::fetch`], which checks the site policy first and only then
//! performs the GET with the run's identifying client.

use crate::config::UserAgentConfig;
use crate::robots::ParsedRobots;
use crate::ScrapeError;
use reqwest::header::{HeaderMap, HeaderValue, FROM};
use reqwest::Client;
use std::time::Duration;

/// A page body returned by an allowed fetch
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The URL that was requested
    pub url: String,
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value (empty if absent)
    pub content_type: String,
    /// Page body content
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Result of a gated fetch
///
/// `Denied` is not an error: it means "no data available" and callers must
/// check for it before parsing anything.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The policy allowed the URL and the request completed
    Fetched(FetchedPage),

    /// robots.txt disallows the URL for our client; no request was made
    Denied {
        /// The URL that was refused
        url: String,
    },
}

/// Builds an HTTP client with the run's identifying headers
///
/// Every request carries `User-Agent: ClientName/Version` and a `From`
/// header with the contact address.
///
/// # Example
///
/// ```no_run
/// use shopfront_harvest::config::UserAgentConfig;
/// use shopfront_harvest::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     client_name: "Capacity-Building".to_string(),
///     client_version: "1.0".to_string(),
///     contact_email: "scraper@example.org".to_string(),
/// };
///
/// let client = build_http_client(&config, 30).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, ScrapeError> {
    let mut headers = HeaderMap::new();
    let from = HeaderValue::from_str(&config.contact_email).map_err(|e| {
        crate::ConfigError::Validation(format!("contact-email is not a valid header: {}", e))
    })?;
    headers.insert(FROM, from);

    let client = Client::builder()
        .user_agent(config.header_value())
        .default_headers(headers)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// HTTP session bound to one site's robots.txt policy
///
/// Built once per run and passed by reference to everything that fetches.
#[derive(Debug, Clone)]
pub struct FetchGate {
    client: Client,
    robots: ParsedRobots,
    robots_token: String,
}

impl FetchGate {
    /// Creates a gate from an existing client and policy
    ///
    /// `robots_token` is the product token matched against robots.txt groups.
    pub fn new(client: Client, robots: ParsedRobots, robots_token: impl Into<String>) -> Self {
        Self {
            client,
            robots,
            robots_token: robots_token.into(),
        }
    }

    /// Crawl-delay the policy asks of our client, if any
    pub fn crawl_delay(&self) -> Option<Duration> {
        self.robots
            .crawl_delay(&self.robots_token)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Whether the policy lets our client fetch `url`
    pub fn is_allowed(&self, url: &str) -> bool {
        self.robots.is_allowed(url, &self.robots_token)
    }

    /// Fetches `url` if the policy allows it
    ///
    /// Network failures propagate as [`ScrapeError::Http`]. Non-2xx responses
    /// are returned as pages with their status; they are logged but not
    /// treated specially.
    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome, ScrapeError> {
        if !self.is_allowed(url) {
            tracing::info!("URL {} disallowed by robots.txt", url);
            return Ok(FetchOutcome::Denied {
                url: url.to_string(),
            });
        }

        tracing::debug!("GET {}", url);
        let http_err = |source: reqwest::Error| ScrapeError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http_err)?;
        let status = response.status();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.text().await.map_err(http_err)?;

        let page = FetchedPage {
            url: url.to_string(),
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        };

        if !page.is_success() {
            tracing::warn!("HTTP {} for {}", page.status_code, url);
        }

        Ok(FetchOutcome::Fetched(page))
    }
}
