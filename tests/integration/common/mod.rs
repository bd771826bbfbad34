//! Shared fixtures: configuration, gates and synthetic shop pages

use chrono::NaiveDate;
use shopfront_harvest::config::{
    Config, OutputConfig, ProductErrorPolicy, ScraperConfig, SiteConfig, UserAgentConfig,
};
use shopfront_harvest::crawler::{build_http_client, FetchGate};
use shopfront_harvest::record::RecordTemplate;
use shopfront_harvest::robots::ParsedRobots;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_NAME: &str = "TestBot";

pub fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

/// Creates a test configuration pointed at the mock server
pub fn create_test_config(base_url: &str, output_dir: &str) -> Config {
    Config {
        site: SiteConfig {
            root_url: format!("{}/", base_url),
            source_name: "Test Shop".to_string(),
            source_slug: "testshop".to_string(),
            currency: "NGN".to_string(),
        },
        user_agent: UserAgentConfig {
            client_name: CLIENT_NAME.to_string(),
            client_version: "1.0".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        scraper: ScraperConfig {
            items_per_page: 3,
            default_delay_secs: 0.0,
            request_timeout_secs: 5,
            on_product_error: ProductErrorPolicy::Abort,
        },
        output: OutputConfig {
            directory: output_dir.to_string(),
        },
    }
}

pub fn template() -> RecordTemplate {
    RecordTemplate::new("Test Shop", "NGN", run_date())
}

/// A gate bound to the given robots.txt body, without fetching it
pub fn gate(robots: &str) -> FetchGate {
    let config = create_test_config("http://127.0.0.1", "/tmp");
    let client = build_http_client(&config.user_agent, 5).unwrap();
    FetchGate::new(client, ParsedRobots::from_content(robots), CLIENT_NAME)
}

/// A listing page with one product card per path and an optional next link
pub fn listing_page(product_paths: &[String], next: Option<&str>) -> String {
    let mut html = String::from("<html><body><ul class=\"products\">");
    for product_path in product_paths {
        html.push_str(&format!(
            r#"<li class="product"><h3 class="product-title"><a href="{}">Product</a></h3></li>"#,
            product_path
        ));
    }
    html.push_str("</ul>");

    html.push_str(r#"<nav class="woocommerce-pagination"><ul class="page-numbers">"#);
    html.push_str(r#"<li><span aria-current="page" class="page-numbers current">1</span></li>"#);
    if let Some(next) = next {
        html.push_str(&format!(
            r#"<li><a class="next page-numbers" href="{}">&rarr;</a></li>"#,
            next
        ));
    }
    html.push_str("</ul></nav></body></html>");
    html
}

/// A product page without variants, priced through JSON-LD
pub fn simple_product_page(name: &str, price: &str) -> String {
    format!(
        r#"<html><head>
        <script type="application/ld+json" class="yoast-schema-graph">{{"@context": "https://schema.org", "@graph": []}}</script>
        <script type="application/ld+json">{{"@context": "https://schema.org/", "@type": "Product",
            "name": "{name}", "description": "About {name}",
            "offers": [{{"@type": "Offer", "price": "{price}", "priceCurrency": "NGN"}}]}}</script>
        </head><body><h1 class="product_title entry-title">{name}</h1></body></html>"#
    )
}

/// A product page with inline size variants `(size, price)`
pub fn variant_product_page(name: &str, variants: &[(&str, f64)]) -> String {
    let entries: Vec<String> = variants
        .iter()
        .map(|(size, price)| {
            format!(
                r#"{{"attributes": {{"attribute_pa_size": "{size}"}}, "display_price": {price}, "variation_id": 1}}"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
        <h1 class="product_title entry-title">{name}</h1>
        <form class="variations_form cart" data-product_variations='[{}]'></form>
        </body></html>"#,
        entries.join(",")
    )
}

/// Mounts an HTML response for GET `route`, expected exactly `times` times
pub async fn mount_html(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=UTF-8"),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts robots.txt
pub async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .expect(1)
        .mount(server)
        .await;
}
