//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (categories, featured products)
//! GET  /health                 - Health check
//!
//! # Browsing
//! GET  /shop                   - Product listing (?category, ?sort, ?max_price)
//! GET  /search                 - Search results (?q)
//! GET  /product/{id}           - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add one unit of a product
//! POST /cart/update            - Set a line's quantity (0 or less removes it)
//! POST /cart/remove            - Remove a line
//! GET  /cart/count             - Number of units in the cart (plain text)
//!
//! # Checkout
//! GET  /checkout               - Current wizard step, or the confirmation
//! POST /checkout/info          - Submit contact details
//! POST /checkout/shipping      - Submit shipping address
//! POST /checkout/payment       - Place the order
//! POST /checkout/back          - Return to the previous step
//!
//! # Selling
//! GET  /sell                   - Listing form
//! POST /sell                   - Submit a listing (multipart)
//!
//! # Profile
//! GET  /profile                - Profile, or sign-in form when signed out
//! POST /profile/login          - Mock sign in
//! POST /profile/logout         - Sign out
//! ```
//!
//! Form posts answer with `303 See Other` on success and re-render the form
//! with `422 Unprocessable Entity` when input is missing or invalid.

pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;
pub mod profile;
pub mod search;
pub mod sell;
pub mod shop;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::instrument;

use shophub_core::Cart;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;
use crate::storage::{Storage, StorageError};

/// Largest accepted sell form, including the uploaded image.
const SELL_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Data every page needs for the navigation bar.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Units in the cart, shown as a badge when non-zero.
    pub cart_count: u32,
    pub signed_in: bool,
}

impl Layout {
    /// Build the layout from an already loaded cart.
    #[must_use]
    pub fn new(cart: &Cart, signed_in: bool) -> Self {
        Self {
            cart_count: cart.item_count(),
            signed_in,
        }
    }

    /// Load the cart and sign-in state from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(storage: &Storage) -> std::result::Result<Self, StorageError> {
        let cart = storage.cart().await?;
        let signed_in = storage.user().await?.is_some();
        Ok(Self::new(&cart, signed_in))
    }
}

/// Generic not found page.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
    pub heading: String,
    pub message: String,
}

/// Fallback for unknown paths.
#[instrument(skip(storage))]
pub async fn not_found(storage: Storage) -> Result<Response> {
    let page = NotFoundTemplate {
        layout: Layout::load(&storage).await?,
        heading: "Page Not Found".to_string(),
        message: "We couldn't find the page you were looking for.".to_string(),
    };
    Ok((StatusCode::NOT_FOUND, page).into_response())
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/info", post(checkout::submit_info))
        .route("/shipping", post(checkout::submit_shipping))
        .route("/payment", post(checkout::place_order))
        .route("/back", post(checkout::back))
}

/// Create the sell routes router.
pub fn sell_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(sell::form).post(sell::submit))
        .route("/image", get(sell::image))
        .layer(DefaultBodyLimit::max(SELL_BODY_LIMIT))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::show))
        .route("/login", post(profile::login))
        .route("/logout", post(profile::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/shop", get(shop::index))
        .route("/search", get(search::search))
        .route("/product/{id}", get(products::show))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/sell", sell_routes())
        .nest("/profile", profile_routes())
}
