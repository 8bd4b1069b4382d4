//! Integration tests for the `ShopHub` storefront.
//!
//! Each test spawns the full application, middleware included, on an
//! ephemeral local port and talks to it over HTTP with a cookie-keeping
//! client, so the session behaves the way it does in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shophub-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `browse` - Home, shop filters, search and product pages
//! - `cart` - Adding, updating and removing cart lines
//! - `checkout` - The checkout wizard end to end
//! - `sell` - Multipart listing uploads
//! - `profile` - Mock sign in and order history

use std::time::Duration;

use reqwest::{Client, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use shophub_storefront::config::StorefrontConfig;
use shophub_storefront::state::AppState;
use shophub_storefront::{app, mock_data};

/// A storefront running on a random local port.
///
/// The server task is aborted when this is dropped.
pub struct TestServer {
    base_url: String,
    client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a storefront with simulated delays switched off.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind or the client cannot be built.
    pub async fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: format!("http://{addr}"),
            checkout_delay: Duration::ZERO,
            listing_delay: Duration::ZERO,
            ..StorefrontConfig::default()
        };
        let app = app(AppState::new(config, mock_data::catalog()));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: new_client(),
            handle,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The visitor's client. Cookies persist across requests.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// A second visitor with its own cookie jar.
    #[must_use]
    pub fn other_client(&self) -> Client {
        new_client()
    }

    /// GET `path`, following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// GET `path` and return the body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not text.
    pub async fn get_text(&self, path: &str) -> String {
        self.get(path)
            .await
            .text()
            .await
            .expect("Failed to read response body")
    }

    /// POST a urlencoded form to `path`, following redirects.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Add one unit of a product to the cart.
    ///
    /// # Panics
    ///
    /// Panics if the storefront does not accept the product.
    pub async fn add_to_cart(&self, product_id: &str) {
        let resp = self
            .post_form("/cart/add", &[("product_id", product_id)])
            .await;
        assert!(resp.status().is_success(), "add to cart: {}", resp.status());
    }

    /// Units in the cart as reported by `/cart/count`.
    ///
    /// # Panics
    ///
    /// Panics if the count is not a number.
    pub async fn cart_count(&self) -> u32 {
        self.get_text("/cart/count")
            .await
            .trim()
            .parse()
            .expect("Cart count is not a number")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
