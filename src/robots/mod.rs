//! Robots.txt handling module
//!
//! The site's robots.txt is fetched once at the start of a run and consulted
//! before every request through the fetch gate.

mod parser;

pub use parser::ParsedRobots;

use crate::ScrapeError;
use reqwest::{Client, StatusCode};
use url::Url;

/// Returns the well-known robots.txt location for a site root
pub fn robots_url(root: &Url) -> Result<Url, ScrapeError> {
    Ok(root.join("/robots.txt")?)
}

/// Fetches and parses robots.txt for a site
///
/// Status handling follows the usual crawler convention:
///
/// | Response | Policy |
/// |----------|--------|
/// | 2xx | Parse the body |
/// | 401, 403 | Disallow everything |
/// | other 4xx | Allow everything |
/// | 5xx | Error, the run does not start |
///
/// # Arguments
///
/// * `client` - The HTTP client carrying the identifying headers
/// * `root` - The site root URL
pub async fn fetch_robots(client: &Client, root: &Url) -> Result<ParsedRobots, ScrapeError> {
    let url = robots_url(root)?;
    tracing::debug!("Fetching robots.txt from {}", url);

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|source| ScrapeError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status.is_success() {
        let body = response.text().await.map_err(|source| ScrapeError::Http {
            url: url.to_string(),
            source,
        })?;
        return Ok(ParsedRobots::from_content(&body));
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::warn!("robots.txt at {} is restricted ({}), disallowing all", url, status);
        return Ok(ParsedRobots::disallow_all());
    }

    if status.is_client_error() {
        tracing::info!("No robots.txt at {} ({}), allowing all", url, status);
        return Ok(ParsedRobots::allow_all());
    }

    Err(ScrapeError::Robots(format!(
        "unexpected status {} for {}",
        status, url
    )))
}
