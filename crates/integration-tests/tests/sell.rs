//! Multipart listing uploads.

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use shophub_integration_tests::TestServer;

fn listing() -> Form {
    Form::new()
        .text("title", "Vintage Camera")
        .text("description", "35mm film camera in working order")
        .text("price", "150.00")
        .text("category", "1")
        .text("stock", "2")
}

#[tokio::test]
async fn test_sell_form() {
    let server = TestServer::spawn().await;
    let body = server.get_text("/sell").await;

    assert!(body.contains("Sell a Product"));
    assert!(body.contains("multipart/form-data"));
    assert!(body.contains("Electronics"));
}

#[tokio::test]
async fn test_upload_listing() {
    let server = TestServer::spawn().await;
    let image = Part::bytes(b"\x89PNG\r\n\x1a\n".to_vec())
        .file_name("camera.png")
        .mime_str("image/png")
        .expect("mime");

    let resp = server
        .client()
        .post(server.url("/sell"))
        .multipart(listing().part("image", image))
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Product Listed Successfully!"));
    assert!(body.contains("Vintage Camera"));
    assert!(body.contains("$150.00"));
    assert!(body.contains("src=\"/sell/image\""));
    assert!(!body.contains("base64,"));

    let image = server.get("/sell/image").await;
    assert_eq!(image.status(), StatusCode::OK);
    assert_eq!(
        image.headers().get("content-type").expect("content type"),
        "image/png"
    );
    assert_eq!(image.bytes().await.expect("bytes").as_ref(), b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn test_listing_with_image_url() {
    let server = TestServer::spawn().await;
    let resp = server
        .client()
        .post(server.url("/sell"))
        .multipart(listing().text("image_url", "https://images.unsplash.com/photo-1"))
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.expect("body").contains("List Another Product"));
}

#[tokio::test]
async fn test_incomplete_listing_is_unprocessable() {
    let server = TestServer::spawn().await;
    let form = Form::new()
        .text("title", "Vintage Camera")
        .text("price", "150.00")
        .text("category", "1")
        .text("stock", "2")
        .text("image_url", "https://images.unsplash.com/photo-1");

    let resp = server
        .client()
        .post(server.url("/sell"))
        .multipart(form)
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Please fill in: description"));
    // Entered values and the chosen image survive the round trip.
    assert!(body.contains("value=\"Vintage Camera\""));
    assert!(body.contains("src=\"https://images.unsplash.com/photo-1\""));
}

#[tokio::test]
async fn test_resubmit_after_rejected_upload() {
    let server = TestServer::spawn().await;
    let photo = vec![0_u8; 8 * 1024 * 1024];
    let image = Part::bytes(photo.clone())
        .file_name("camera.png")
        .mime_str("image/png")
        .expect("mime");
    let untitled = Form::new()
        .text("title", "")
        .text("description", "35mm film camera in working order")
        .text("price", "150.00")
        .text("category", "1")
        .text("stock", "2")
        .part("image", image);

    let resp = server
        .client()
        .post(server.url("/sell"))
        .multipart(untitled)
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.expect("body");
    assert!(body.contains("src=\"/sell/image\""));
    assert!(body.len() < 64 * 1024, "page is {} bytes", body.len());

    let kept = server.get("/sell/image").await;
    assert_eq!(kept.status(), StatusCode::OK);
    assert_eq!(kept.bytes().await.expect("bytes").len(), photo.len());

    // The corrected form is sent without choosing the file again.
    let resp = server
        .client()
        .post(server.url("/sell"))
        .multipart(listing())
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Product Listed Successfully!"));
    assert!(body.contains("src=\"/sell/image\""));

    // Starting a new listing forgets the image.
    assert_eq!(server.get("/sell").await.status(), StatusCode::OK);
    assert_eq!(server.get("/sell/image").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_price_is_unprocessable() {
    let server = TestServer::spawn().await;
    let form = Form::new()
        .text("title", "Vintage Camera")
        .text("description", "Works")
        .text("price", "free")
        .text("category", "1")
        .text("stock", "2")
        .text("image_url", "https://images.unsplash.com/photo-1");

    let resp = server
        .client()
        .post(server.url("/sell"))
        .multipart(form)
        .send()
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
