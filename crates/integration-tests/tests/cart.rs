//! Cart behavior across requests.

use reqwest::StatusCode;
use shophub_integration_tests::TestServer;

#[tokio::test]
async fn test_adding_twice_increments_quantity() {
    let server = TestServer::spawn().await;

    server.add_to_cart("1").await;
    server.add_to_cart("1").await;

    assert_eq!(server.cart_count().await, 2);
    let body = server.get_text("/cart").await;
    assert!(body.contains("Wireless Headphones"));
    assert!(body.contains("$159.98"));
}

#[tokio::test]
async fn test_cart_totals_span_lines() {
    let server = TestServer::spawn().await;

    server.add_to_cart("3").await;
    server.add_to_cart("7").await;

    assert_eq!(server.cart_count().await, 2);
    let body = server.get_text("/cart").await;
    // 49.99 + 24.99
    assert!(body.contains("$74.98"));
}

#[tokio::test]
async fn test_add_redirects_back_to_product() {
    let server = TestServer::spawn().await;
    let resp = server
        .post_form("/cart/add", &[("product_id", "5"), ("redirect", "/product/5")])
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/product/5");
}

#[tokio::test]
async fn test_unknown_product_is_rejected() {
    let server = TestServer::spawn().await;
    let resp = server.post_form("/cart/add", &[("product_id", "999")]).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(server.cart_count().await, 0);
}

#[tokio::test]
async fn test_update_and_remove() {
    let server = TestServer::spawn().await;
    server.add_to_cart("4").await;
    server.add_to_cart("6").await;

    server
        .post_form("/cart/update", &[("id", "4"), ("quantity", "3")])
        .await;
    assert_eq!(server.cart_count().await, 4);

    server
        .post_form("/cart/update", &[("id", "4"), ("quantity", "0")])
        .await;
    assert_eq!(server.cart_count().await, 1);
    assert!(!server.get_text("/cart").await.contains("Designer T-Shirt"));

    server.post_form("/cart/remove", &[("id", "6")]).await;
    assert_eq!(server.cart_count().await, 0);
    assert!(server.get_text("/cart").await.contains("Your Cart is Empty"));
}

#[tokio::test]
async fn test_carts_are_per_visitor() {
    let server = TestServer::spawn().await;
    server.add_to_cart("2").await;

    let other = server.other_client();
    let count = other
        .get(server.url("/cart/count"))
        .send()
        .await
        .expect("request")
        .text()
        .await
        .expect("body");

    assert_eq!(count, "0");
    assert_eq!(server.cart_count().await, 1);
}
