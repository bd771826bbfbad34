//! HTML extraction for listing pages and site navigation
//!
//! This module pulls the links the traversal needs out of fetched pages:
//! - product links from a category listing
//! - the "next page" link from the pagination widget
//! - category links from the homepage navigation menu

use crate::ScrapeError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Product cards on a listing page
const PRODUCT_TITLE: &str = "h3.product-title";
/// Pagination control pointing to the following listing page
const NEXT_PAGE: &str = "ul.page-numbers a.next";
/// Navigation dropdowns listing the categories
const CATEGORY_MENU: &str = "div.sub-menu-dropdown";
const ANCHOR: &str = "a";

/// A category discovered in the site navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    pub name: String,
    pub url: String,
}

pub(crate) fn selector(css: &'static str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css))
}

/// Collects the text of an element, trimmed
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts product page links from a category listing page
///
/// Takes the first anchor inside each product title, in page order. Cards
/// without a usable href are skipped. The caller applies the per-page cap.
///
/// # Example
///
/// ```
/// use shopfront_harvest::crawler::extract_product_links;
/// use url::Url;
///
/// let html = r#"<h3 class="product-title"><a href="/product/rice/">Rice</a></h3>"#;
/// let base = Url::parse("https://shop.example.com/category/grains/").unwrap();
/// let links = extract_product_links(html, &base).unwrap();
/// assert_eq!(links, vec!["https://shop.example.com/product/rice/".to_string()]);
/// ```
pub fn extract_product_links(html: &str, base_url: &Url) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let title_selector = selector(PRODUCT_TITLE)?;
    let anchor_selector = selector(ANCHOR)?;

    let mut links = Vec::new();
    for title in document.select(&title_selector) {
        let Some(anchor) = title.select(&anchor_selector).next() else {
            tracing::debug!("Product title without a link on {}", base_url);
            continue;
        };

        match anchor.value().attr("href").and_then(|href| resolve_link(href, base_url)) {
            Some(link) => links.push(link),
            None => tracing::debug!("Product link without usable href on {}", base_url),
        }
    }

    Ok(links)
}

/// Finds the "next page" link in a listing's pagination widget
///
/// Returns `None` when the widget, the control or its href is absent; that
/// is the normal end of a category.
pub fn find_next_page(html: &str, base_url: &Url) -> Result<Option<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let next_selector = selector(NEXT_PAGE)?;

    Ok(document
        .select(&next_selector)
        .next()
        .and_then(|next| next.value().attr("href"))
        .and_then(|href| resolve_link(href, base_url)))
}

/// Discovers category links from the homepage navigation menus
pub fn discover_categories(html: &str, base_url: &Url) -> Result<Vec<CategoryLink>, ScrapeError> {
    let document = Html::parse_document(html);
    let menu_selector = selector(CATEGORY_MENU)?;
    let anchor_selector = selector(ANCHOR)?;

    let mut categories = Vec::new();
    for menu in document.select(&menu_selector) {
        for anchor in menu.select(&anchor_selector) {
            let Some(url) = anchor
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            else {
                continue;
            };

            categories.push(CategoryLink {
                name: element_text(&anchor),
                url,
            });
        }
    }

    Ok(categories)
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
