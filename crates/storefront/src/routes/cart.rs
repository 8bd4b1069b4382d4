//! Cart route handlers.
//!
//! Every mutation loads the stored cart, applies one change, writes the
//! whole cart back and redirects. Quantities are not checked against stock.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use shophub_core::{Cart, CartItem, ProductId};

use super::Layout;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::storage::Storage;

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    /// Quantity submitted by the minus button. Reaching zero removes the line.
    pub decrement_to: i64,
    /// Quantity submitted by the plus button.
    pub increment_to: i64,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let quantity = i64::from(item.quantity);
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            image_url: item.image_url.clone(),
            quantity: item.quantity,
            price: item.price.to_string(),
            line_price: item.line_total().to_string(),
            decrement_to: quantity - 1,
            increment_to: quantity + 1,
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    /// Local path to return to, e.g. the product page the button was on.
    pub redirect: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// Redirect to `target` if it is a path on this site, otherwise to the cart.
fn redirect_back(target: Option<&str>) -> Redirect {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            Redirect::to(path)
        }
        _ => Redirect::to("/cart"),
    }
}

/// Display cart page.
#[instrument(skip(storage))]
pub async fn show(storage: Storage) -> Result<CartShowTemplate> {
    let cart = storage.cart().await?;
    let signed_in = storage.user().await?.is_some();

    Ok(CartShowTemplate {
        layout: Layout::new(&cart, signed_in),
        cart: CartView::from(&cart),
    })
}

/// Add one unit of a product to the cart.
#[instrument(skip(state, storage))]
pub async fn add(
    State(state): State<AppState>,
    storage: Storage,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = form
        .product_id
        .parse::<ProductId>()
        .ok()
        .and_then(|id| state.catalog().product(id))
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut cart = storage.cart().await?;
    cart.add(product);
    storage.save_cart(&cart).await?;

    add_breadcrumb(
        "cart",
        "Added product",
        Some(&[("product_id", form.product_id.as_str())]),
    );
    tracing::info!(product_id = %product.id, items = cart.item_count(), "Added to cart");

    Ok(redirect_back(form.redirect.as_deref()))
}

/// Set a cart line's quantity. Zero or less removes the line.
#[instrument(skip(storage))]
pub async fn update(storage: Storage, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let mut cart = storage.cart().await?;
    cart.set_quantity(&form.id, form.quantity);
    storage.save_cart(&cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Remove a line from the cart.
#[instrument(skip(storage))]
pub async fn remove(storage: Storage, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let mut cart = storage.cart().await?;
    cart.remove(&form.id);
    storage.save_cart(&cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Number of units in the cart, as plain text.
#[instrument(skip(storage))]
pub async fn count(storage: Storage) -> Result<Response> {
    let cart = storage.cart().await?;
    Ok(cart.item_count().to_string().into_response())
}
