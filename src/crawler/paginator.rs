//! Category pagination
//!
//! Walks one category's listing pages, following the "next page" control
//! until it disappears, and parses a bounded number of products per page.

use crate::config::{ProductErrorPolicy, ScraperConfig};
use crate::crawler::fetcher::{FetchGate, FetchOutcome};
use crate::crawler::parser::{extract_product_links, find_next_page};
use crate::crawler::product::parse_product;
use crate::record::{ProductRecord, RecordTemplate};
use crate::ScrapeError;
use std::time::Duration;
use url::Url;

/// Counters for one category traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryStats {
    /// Listing pages fetched
    pub listing_pages: usize,
    /// Product pages fetched (allowed by robots.txt)
    pub products_fetched: usize,
    /// Product pages successfully parsed
    pub products_parsed: usize,
    /// Fetches refused by robots.txt, listing or product
    pub denied: usize,
    /// Product pages skipped after a parse failure
    pub skipped: usize,
}

impl CategoryStats {
    pub fn merge(&mut self, other: &CategoryStats) {
        self.listing_pages += other.listing_pages;
        self.products_fetched += other.products_fetched;
        self.products_parsed += other.products_parsed;
        self.denied += other.denied;
        self.skipped += other.skipped;
    }
}

/// Records collected from one category
#[derive(Debug, Clone, Default)]
pub struct CategoryScrape {
    pub records: Vec<ProductRecord>,
    pub stats: CategoryStats,
}

/// Sequential category traversal over a shared fetch gate
pub struct Paginator<'a> {
    gate: &'a FetchGate,
    template: &'a RecordTemplate,
    delay: Duration,
    items_per_page: usize,
    on_product_error: ProductErrorPolicy,
}

impl<'a> Paginator<'a> {
    pub fn new(
        gate: &'a FetchGate,
        template: &'a RecordTemplate,
        delay: Duration,
        items_per_page: usize,
    ) -> Self {
        Self {
            gate,
            template,
            delay,
            items_per_page,
            on_product_error: ProductErrorPolicy::Abort,
        }
    }

    /// Builds a paginator using the traversal limits from configuration
    pub fn from_config(
        gate: &'a FetchGate,
        template: &'a RecordTemplate,
        delay: Duration,
        config: &ScraperConfig,
    ) -> Self {
        Self::new(gate, template, delay, config.items_per_page)
            .with_error_policy(config.on_product_error)
    }

    pub fn with_error_policy(mut self, policy: ProductErrorPolicy) -> Self {
        self.on_product_error = policy;
        self
    }

    /// Scrapes a category starting at `start_url`
    ///
    /// For each listing page: wait, fetch, take the first `items_per_page`
    /// product links, and for each wait, fetch and parse. Then move to the
    /// "next page" link if there is one. A denied listing page ends the
    /// category; a denied product is counted and never parsed.
    ///
    /// There is no cycle detection: a site whose "next" links loop will be
    /// walked until it stops looping.
    pub async fn scrape_category(
        &self,
        start_url: &str,
        category: &str,
    ) -> Result<CategoryScrape, ScrapeError> {
        let mut scrape = CategoryScrape::default();
        let mut current = Some(start_url.to_string());

        while let Some(listing_url) = current.take() {
            tokio::time::sleep(self.delay).await;

            let page = match self.gate.fetch(&listing_url).await? {
                FetchOutcome::Fetched(page) => page,
                FetchOutcome::Denied { .. } => {
                    scrape.stats.denied += 1;
                    break;
                }
            };
            scrape.stats.listing_pages += 1;

            let base = Url::parse(&page.final_url)?;
            let links = extract_product_links(&page.body, &base)?;
            let next = find_next_page(&page.body, &base)?;

            tracing::debug!(
                "Listing {} of '{}': {} product links, taking {}",
                scrape.stats.listing_pages,
                category,
                links.len(),
                links.len().min(self.items_per_page)
            );

            for link in links.iter().take(self.items_per_page) {
                self.scrape_product(link, category, &mut scrape).await?;
            }

            current = next;
        }

        Ok(scrape)
    }

    async fn scrape_product(
        &self,
        link: &str,
        category: &str,
        scrape: &mut CategoryScrape,
    ) -> Result<(), ScrapeError> {
        tokio::time::sleep(self.delay).await;

        let page = match self.gate.fetch(link).await? {
            FetchOutcome::Fetched(page) => page,
            FetchOutcome::Denied { .. } => {
                scrape.stats.denied += 1;
                return Ok(());
            }
        };
        scrape.stats.products_fetched += 1;

        match parse_product(&page.body, link, Some(category), self.template) {
            Ok(records) => {
                scrape.stats.products_parsed += 1;
                scrape.records.extend(records);
                Ok(())
            }
            Err(e) if self.on_product_error == ProductErrorPolicy::Skip => {
                tracing::warn!("Skipping product {}: {}", link, e);
                scrape.stats.skipped += 1;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
