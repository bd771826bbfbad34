//! Product page parser
//!
//! Turns the HTML of one product page into records. Variant products embed
//! their purchasable combinations as JSON on the variations form and yield
//! one record per variant; simple products yield a single record priced from
//! the page's JSON-LD block.

use crate::crawler::parser::{element_text, selector};
use crate::record::{ProductRecord, RecordTemplate};
use crate::ScrapeError;
use scraper::Html;
use serde_json::Value;

const TITLE: &str = "h1.product_title";
const VARIATIONS_FORM: &str = "form.variations_form";
const VARIATIONS_ATTR: &str = "data-product_variations";
const JSON_LD: &str = r#"script[type="application/ld+json"]"#;
/// SEO plugin graph; describes the page, not the product
const DECOY_JSON_LD_CLASS: &str = "yoast-schema-graph";
/// Variant attribute keys look like `attribute_pa_size`
const VARIANT_ATTRIBUTE_PREFIX: &str = "attri";

/// Parses a product page into one or more records
///
/// # Arguments
///
/// * `html` - The product page body
/// * `link` - The product URL, stored on every record
/// * `category` - The category the product was reached from
/// * `template` - Run-wide source, currency and date
///
/// # Errors
///
/// A missing title, a missing or malformed JSON payload, or a payload without
/// a price is an error for the whole page. The caller decides whether that
/// aborts the run.
pub fn parse_product(
    html: &str,
    link: &str,
    category: Option<&str>,
    template: &RecordTemplate,
) -> Result<Vec<ProductRecord>, ScrapeError> {
    let document = Html::parse_document(html);

    let name = document
        .select(&selector(TITLE)?)
        .next()
        .map(|title| element_text(&title))
        .ok_or_else(|| ScrapeError::MissingMarkup {
            url: link.to_string(),
            what: "product title",
        })?;

    let base = |price: f64| {
        let mut record = template.record(link, category, price);
        record.name = Some(name.clone());
        record
    };

    if let Some(variants) = variant_payload(&document, link)? {
        return variants
            .iter()
            .map(|entry| -> Result<ProductRecord, ScrapeError> {
                let (size, price) = parse_variant(entry, link)?;
                let mut record = base(price);
                record.size = Some(size);
                Ok(record)
            })
            .collect();
    }

    let data = structured_data(&document, link)?;
    let price = first_offer_price(&data, link)?;
    let mut record = base(price);
    record.description = data
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(vec![record])
}

/// Reads the variant entries from the variations form, if the page has one
///
/// A form whose payload is `false` (variants loaded on demand) is treated as
/// having no inline variants.
fn variant_payload(document: &Html, link: &str) -> Result<Option<Vec<Value>>, ScrapeError> {
    let Some(form) = document.select(&selector(VARIATIONS_FORM)?).next() else {
        return Ok(None);
    };

    let raw = form
        .value()
        .attr(VARIATIONS_ATTR)
        .ok_or_else(|| ScrapeError::MissingMarkup {
            url: link.to_string(),
            what: "variations payload",
        })?;

    let payload: Value = serde_json::from_str(raw).map_err(|source| ScrapeError::Json {
        url: link.to_string(),
        source,
    })?;

    match payload {
        Value::Array(entries) => Ok(Some(entries)),
        Value::Bool(false) => {
            tracing::debug!("Variations for {} are not inlined", link);
            Ok(None)
        }
        _ => Err(ScrapeError::MissingField {
            url: link.to_string(),
            field: "product_variations",
        }),
    }
}

/// Extracts `(size, price)` from one variant entry
///
/// The size is the first attribute, in encoded order, whose key starts with
/// the variant prefix.
fn parse_variant(entry: &Value, link: &str) -> Result<(String, f64), ScrapeError> {
    let size = entry
        .get("attributes")
        .and_then(Value::as_object)
        .and_then(|attributes| {
            attributes
                .iter()
                .find(|(key, _)| key.starts_with(VARIANT_ATTRIBUTE_PREFIX))
        })
        .map(|(_, value)| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .ok_or_else(|| ScrapeError::MissingField {
            url: link.to_string(),
            field: "attributes",
        })?;

    let price = entry
        .get("display_price")
        .and_then(coerce_price)
        .ok_or_else(|| ScrapeError::MissingField {
            url: link.to_string(),
            field: "display_price",
        })?;

    Ok((size, price))
}

/// Decodes the first JSON-LD block that is not the SEO graph
fn structured_data(document: &Html, link: &str) -> Result<Value, ScrapeError> {
    let script = document
        .select(&selector(JSON_LD)?)
        .find(|script| !script.value().classes().any(|c| c == DECOY_JSON_LD_CLASS))
        .ok_or_else(|| ScrapeError::MissingMarkup {
            url: link.to_string(),
            what: "JSON-LD product data",
        })?;

    let text: String = script.text().collect();
    serde_json::from_str(&text).map_err(|source| ScrapeError::Json {
        url: link.to_string(),
        source,
    })
}

fn first_offer_price(data: &Value, link: &str) -> Result<f64, ScrapeError> {
    let offer = match data.get("offers") {
        Some(Value::Array(offers)) => offers.first(),
        Some(offer @ Value::Object(_)) => Some(offer),
        _ => None,
    }
    .ok_or_else(|| ScrapeError::MissingField {
        url: link.to_string(),
        field: "offers",
    })?;

    offer
        .get("price")
        .and_then(coerce_price)
        .ok_or_else(|| ScrapeError::MissingField {
            url: link.to_string(),
            field: "offers.price",
        })
}

/// Accepts JSON numbers and numeric strings
fn coerce_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|price| price.is_finite())
}
