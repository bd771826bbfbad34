//! Category traversal against a mock shop

use crate::common::{
    gate, listing_page, mount_html, simple_product_page, template, variant_product_page,
};
use shopfront_harvest::config::ProductErrorPolicy;
use shopfront_harvest::crawler::Paginator;
use shopfront_harvest::ScrapeError;
use std::time::Duration;
use wiremock::MockServer;

const ALLOW_ALL: &str = "User-agent: *\nAllow: /";

fn product_paths(prefix: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("/product/{}-{}/", prefix, i))
        .collect()
}

#[tokio::test]
async fn test_pagination_chain_fetches_each_listing_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Three listing pages chained by "next", the last without one
    let routes = [
        "/product-category/grains/",
        "/product-category/grains/page/2/",
        "/product-category/grains/page/3/",
    ];
    for (i, route) in routes.iter().enumerate() {
        let products = product_paths(&format!("p{}", i), 1);
        let next = routes.get(i + 1).copied();
        mount_html(&mock_server, route, listing_page(&products, next), 1).await;
        mount_html(
            &mock_server,
            &products[0],
            simple_product_page(&format!("Item {}", i), "100"),
            1,
        )
        .await;
    }

    let gate = gate(ALLOW_ALL);
    let template = template();
    let paginator = Paginator::new(&gate, &template, Duration::ZERO, 3);

    let scrape = paginator
        .scrape_category(&format!("{}{}", base_url, routes[0]), "Grains")
        .await
        .expect("Traversal failed");

    assert_eq!(scrape.stats.listing_pages, 3);
    assert_eq!(scrape.records.len(), 3);
    let names: Vec<_> = scrape
        .records
        .iter()
        .map(|r| r.name.clone().unwrap())
        .collect();
    assert_eq!(names, vec!["Item 0", "Item 1", "Item 2"]);

    // Wiremock verifies the expect(1) counts when the server drops
}

#[tokio::test]
async fn test_at_most_three_products_per_listing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let products = product_paths("bulk", 5);
    mount_html(
        &mock_server,
        "/product-category/bulk/",
        listing_page(&products, None),
        1,
    )
    .await;
    for (i, product) in products.iter().enumerate() {
        let expected = if i < 3 { 1 } else { 0 };
        mount_html(
            &mock_server,
            product,
            simple_product_page("Bulk", "10"),
            expected,
        )
        .await;
    }

    let gate = gate(ALLOW_ALL);
    let template = template();
    let paginator = Paginator::new(&gate, &template, Duration::ZERO, 3);

    let scrape = paginator
        .scrape_category(&format!("{}/product-category/bulk/", base_url), "Bulk")
        .await
        .expect("Traversal failed");

    assert_eq!(scrape.records.len(), 3);
    assert_eq!(scrape.stats.products_fetched, 3);
    let links: Vec<_> = scrape.records.iter().map(|r| r.link.clone()).collect();
    assert_eq!(
        links,
        products[..3]
            .iter()
            .map(|p| format!("{}{}", base_url, p))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_denied_products_are_never_parsed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let products = product_paths("secret", 3);
    mount_html(
        &mock_server,
        "/product-category/secret/",
        listing_page(&products, None),
        1,
    )
    .await;
    for product in &products {
        mount_html(&mock_server, product, simple_product_page("Secret", "1"), 0).await;
    }

    let gate = gate("User-agent: *\nDisallow: /product/");
    let template = template();
    let paginator = Paginator::new(&gate, &template, Duration::ZERO, 3);

    let scrape = paginator
        .scrape_category(&format!("{}/product-category/secret/", base_url), "Secret")
        .await
        .expect("Denied products must not fail the traversal");

    assert!(scrape.records.is_empty());
    assert_eq!(scrape.stats.denied, 3);
    assert_eq!(scrape.stats.products_fetched, 0);
    assert_eq!(scrape.stats.products_parsed, 0);
}

#[tokio::test]
async fn test_denied_listing_ends_category() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/product-category/hidden/",
        listing_page(&product_paths("h", 1), None),
        0,
    )
    .await;

    let gate = gate("User-agent: *\nDisallow: /product-category/hidden/");
    let template = template();
    let paginator = Paginator::new(&gate, &template, Duration::ZERO, 3);

    let scrape = paginator
        .scrape_category(&format!("{}/product-category/hidden/", base_url), "Hidden")
        .await
        .unwrap();

    assert!(scrape.records.is_empty());
    assert_eq!(scrape.stats.listing_pages, 0);
    assert_eq!(scrape.stats.denied, 1);
}

#[tokio::test]
async fn test_variant_products_expand_per_variant() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let products = vec!["/product/rice/".to_string(), "/product/oil/".to_string()];
    mount_html(
        &mock_server,
        "/product-category/staples/",
        listing_page(&products, None),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        "/product/rice/",
        variant_product_page("Rice", &[("1kg", 1500.0), ("5kg", 7000.0)]),
        1,
    )
    .await;
    mount_html(&mock_server, "/product/oil/", simple_product_page("Oil", "900"), 1).await;

    let gate = gate(ALLOW_ALL);
    let template = template();
    let paginator = Paginator::new(&gate, &template, Duration::ZERO, 3);

    let scrape = paginator
        .scrape_category(&format!("{}/product-category/staples/", base_url), "Staples")
        .await
        .unwrap();

    assert_eq!(scrape.records.len(), 3);
    assert_eq!(scrape.stats.products_parsed, 2);

    let rice: Vec<_> = scrape
        .records
        .iter()
        .filter(|r| r.name.as_deref() == Some("Rice"))
        .collect();
    assert_eq!(rice.len(), 2);
    assert_eq!(rice[0].size.as_deref(), Some("1kg"));
    assert_eq!(rice[0].price, 1500.0);
    assert_eq!(rice[1].size.as_deref(), Some("5kg"));
    assert_eq!(rice[1].price, 7000.0);
    assert_eq!(rice[0].link, rice[1].link);

    let oil = &scrape.records[2];
    assert_eq!(oil.price, 900.0);
    assert_eq!(oil.description.as_deref(), Some("About Oil"));
    assert!(oil.size.is_none());
}

#[tokio::test]
async fn test_broken_product_aborts_by_default() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let products = product_paths("broken", 2);
    mount_html(
        &mock_server,
        "/product-category/broken/",
        listing_page(&products, None),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        &products[0],
        "<html><body>Maintenance</body></html>".to_string(),
        1,
    )
    .await;
    // Never reached: the first failure aborts the traversal
    mount_html(&mock_server, &products[1], simple_product_page("Ok", "5"), 0).await;

    let gate = gate(ALLOW_ALL);
    let template = template();
    let paginator = Paginator::new(&gate, &template, Duration::ZERO, 3);

    let result = paginator
        .scrape_category(&format!("{}/product-category/broken/", base_url), "Broken")
        .await;

    assert!(matches!(
        result,
        Err(ScrapeError::MissingMarkup {
            what: "product title",
            ..
        })
    ));
}

#[tokio::test]
async fn test_broken_product_skipped_when_configured() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let products = product_paths("mixed", 3);
    mount_html(
        &mock_server,
        "/product-category/mixed/",
        listing_page(&products, None),
        1,
    )
    .await;
    mount_html(&mock_server, &products[0], simple_product_page("A", "5"), 1).await;
    mount_html(
        &mock_server,
        &products[1],
        "<html><body><h1 class=\"product_title\">No data</h1></body></html>".to_string(),
        1,
    )
    .await;
    mount_html(&mock_server, &products[2], simple_product_page("C", "7"), 1).await;

    let gate = gate(ALLOW_ALL);
    let template = template();
    let paginator = Paginator::new(&gate, &template, Duration::ZERO, 3)
        .with_error_policy(ProductErrorPolicy::Skip);

    let scrape = paginator
        .scrape_category(&format!("{}/product-category/mixed/", base_url), "Mixed")
        .await
        .unwrap();

    assert_eq!(scrape.records.len(), 2);
    assert_eq!(scrape.stats.skipped, 1);
    assert_eq!(scrape.stats.products_parsed, 2);
    assert_eq!(scrape.stats.products_fetched, 3);
}
