//! Run summary reporting

use crate::crawler::RunSummary;

/// Prints a run summary to stdout
pub fn print_run_summary(summary: &RunSummary) {
    println!("=== Scrape Summary ===\n");

    println!("Overview:");
    println!("  Categories scraped: {}", summary.categories);
    println!("  Records exported: {}", summary.records);
    println!("  Politeness delay: {:.1}s", summary.delay.as_secs_f64());
    println!();

    let stats = &summary.stats;
    println!("Pages:");
    println!("  Listing pages: {}", stats.listing_pages);
    println!("  Product pages fetched: {}", stats.products_fetched);
    println!("  Product pages parsed: {}", stats.products_parsed);
    if stats.skipped > 0 {
        println!("  Product pages skipped: {}", stats.skipped);
    }
    if stats.denied > 0 {
        println!("  Denied by robots.txt: {}", stats.denied);
    }
    println!();

    println!("Export: {}", summary.export_path.display());
}
