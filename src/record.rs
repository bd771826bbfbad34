//! Product records and the per-run values stamped onto them

use crate::config::SiteConfig;
use chrono::NaiveDate;

/// Format of the capture date on records and in export file names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One product, or one purchasable variant of a product
///
/// `link`, `price` and `currency` are always present. Variant products yield
/// one record per variant, differing only in `size` and `price`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub link: String,
    pub source: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub subsubcategory: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub uid: Option<String>,
    pub price: f64,
    pub regular_price: Option<f64>,
    pub currency: String,
    pub in_stock: Option<String>,
    pub description: Option<String>,
    pub date: String,
}

impl ProductRecord {
    /// Column names in export order
    pub const COLUMNS: [&'static str; 15] = [
        "link",
        "source",
        "category",
        "subcategory",
        "subsubcategory",
        "name",
        "brand",
        "size",
        "uid",
        "price",
        "regular_price",
        "currency",
        "in_stock",
        "description",
        "date",
    ];

    /// Returns the cell value for each column, `None` where the field is unset
    pub fn cells(&self) -> [Option<String>; 15] {
        [
            Some(self.link.clone()),
            Some(self.source.clone()),
            self.category.clone(),
            self.subcategory.clone(),
            self.subsubcategory.clone(),
            self.name.clone(),
            self.brand.clone(),
            self.size.clone(),
            self.uid.clone(),
            Some(self.price.to_string()),
            self.regular_price.map(|p| p.to_string()),
            Some(self.currency.clone()),
            self.in_stock.clone(),
            self.description.clone(),
            Some(self.date.clone()),
        ]
    }
}

/// Values shared by every record of one run
///
/// Built once when the run starts, so all records carry the same capture date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTemplate {
    pub source: String,
    pub currency: String,
    pub date: String,
}

impl RecordTemplate {
    pub fn new(source: impl Into<String>, currency: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            source: source.into(),
            currency: currency.into(),
            date: date.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn for_site(site: &SiteConfig, date: NaiveDate) -> Self {
        Self::new(site.source_name.clone(), site.currency.clone(), date)
    }

    /// Starts a record for `link` with everything but the product data filled in
    pub fn record(&self, link: &str, category: Option<&str>, price: f64) -> ProductRecord {
        ProductRecord {
            link: link.to_string(),
            source: self.source.clone(),
            category: category.map(str::to_string),
            subcategory: None,
            subsubcategory: None,
            name: None,
            brand: None,
            size: None,
            uid: None,
            price,
            regular_price: None,
            currency: self.currency.clone(),
            in_stock: None,
            description: None,
            date: self.date.clone(),
        }
    }
}
