//! Crawler module for the category traversal and product extraction
//!
//! This module contains the core scraping logic, including:
//! - The robots.txt-gated HTTP fetcher
//! - Listing, navigation and product page parsing
//! - Category pagination
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod paginator;
mod parser;
mod product;

pub use coordinator::{run_scrape, Harvester, RunSummary};
pub use fetcher::{build_http_client, FetchGate, FetchOutcome, FetchedPage};
pub use paginator::{CategoryScrape, CategoryStats, Paginator};
pub use parser::{
    discover_categories, extract_product_links, find_next_page, resolve_link, CategoryLink,
};
pub use product::parse_product;
