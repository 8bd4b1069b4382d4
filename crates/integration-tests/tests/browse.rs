//! Browsing: home, shop filters, search and product pages.

use reqwest::StatusCode;
use reqwest::header::{CACHE_CONTROL, CONTENT_SECURITY_POLICY, X_FRAME_OPTIONS};
use shophub_integration_tests::TestServer;

#[tokio::test]
async fn test_health() {
    let server = TestServer::spawn().await;
    let resp = server.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");
}

#[tokio::test]
async fn test_home_shows_categories_and_featured_products() {
    let server = TestServer::spawn().await;
    let body = server.get_text("/").await;

    assert!(body.contains("Welcome to ShopHub"));
    assert!(body.contains("/shop?category=electronics"));
    assert!(body.contains("/shop?category=books"));
    assert!(body.contains("Wireless Headphones"));
}

#[tokio::test]
async fn test_pages_carry_security_headers() {
    let server = TestServer::spawn().await;
    let resp = server.get("/shop").await;

    let headers = resp.headers();
    assert_eq!(headers.get(X_FRAME_OPTIONS).expect("frame options"), "DENY");
    assert!(
        headers
            .get(CONTENT_SECURITY_POLICY)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|csp| csp.contains("script-src 'none'"))
    );
    assert_eq!(headers.get(CACHE_CONTROL).expect("cache control"), "no-store");
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = TestServer::spawn().await;
    let resp = server
        .client()
        .get(server.url("/health"))
        .header("x-request-id", "trace-abc-123")
        .send()
        .await
        .expect("request");
    assert_eq!(resp.headers().get("x-request-id").expect("id"), "trace-abc-123");
}

#[tokio::test]
async fn test_shop_filters_by_category_and_sorts() {
    let server = TestServer::spawn().await;
    let body = server
        .get_text("/shop?category=books&sort=price-high&max_price=300")
        .await;

    let mystery = body.find("Mystery Novel Collection").expect("mystery novels");
    let rust_book = body.find("The Rust Programming Language").expect("rust book");
    assert!(mystery < rust_book, "higher price should come first");
    assert!(!body.contains("Smart Watch"));
    assert!(body.contains("2 products"));
}

#[tokio::test]
async fn test_shop_price_ceiling() {
    let server = TestServer::spawn().await;
    let body = server.get_text("/shop?max_price=50").await;

    assert!(body.contains("Bluetooth Speaker"));
    assert!(!body.contains("Smart Watch"));
    assert!(!body.contains("Leather Jacket"));
}

#[tokio::test]
async fn test_shop_ignores_bad_parameters() {
    let server = TestServer::spawn().await;
    let resp = server
        .get("/shop?category=nope&sort=sideways&max_price=lots")
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("14 products"));
}

#[tokio::test]
async fn test_search_matches_titles_and_descriptions() {
    let server = TestServer::spawn().await;

    let body = server.get_text("/search?q=LEATHER").await;
    assert!(body.contains("Leather Jacket"));
    assert!(!body.contains("Wireless Headphones"));

    let body = server.get_text("/search?q=zzzz").await;
    assert!(body.contains("No results for"));

    let body = server.get_text("/search").await;
    assert!(body.contains("Type something to search"));
}

#[tokio::test]
async fn test_product_page() {
    let server = TestServer::spawn().await;
    let body = server.get_text("/product/2").await;

    assert!(body.contains("Smart Watch"));
    assert!(body.contains("$199.99"));
    assert!(body.contains("SHP-2"));
    assert!(body.contains("15 in stock"));
    assert!(body.contains("Related Products"));
}

#[tokio::test]
async fn test_unknown_product_and_page() {
    let server = TestServer::spawn().await;

    let resp = server.get("/product/404").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.expect("body").contains("Product Not Found"));

    let resp = server.get("/nowhere").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.expect("body").contains("Page Not Found"));
}

#[tokio::test]
async fn test_static_assets() {
    let server = TestServer::spawn().await;
    let resp = server.get("/static/images/placeholder.svg").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(CACHE_CONTROL).expect("cache control"),
        "public, max-age=3600"
    );
}
