//! Profile route handlers.
//!
//! Sign-in is a mock: any well-formed email is accepted and nothing is
//! verified.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use shophub_core::{Email, Order, Price};

use super::Layout;
use super::checkout::OrderView;
use crate::error::Result;
use crate::filters;
use crate::middleware::{self, OptionalUser};
use crate::mock_data::{self, SellerProduct};
use crate::models::CurrentUser;
use crate::storage::Storage;

/// Sign-in form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
}

/// Seller product display data.
#[derive(Debug, Clone)]
pub struct SellerProductView {
    pub title: String,
    pub price: String,
    pub sales: u32,
    pub image_url: String,
}

impl From<&SellerProduct> for SellerProductView {
    fn from(product: &SellerProduct) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price.to_string(),
            sales: product.sales,
            image_url: product.image_url.clone(),
        }
    }
}

/// Signed-in profile page.
#[derive(Template, WebTemplate)]
#[template(path = "profile/index.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub name: String,
    pub email: String,
    pub order_count: usize,
    pub total_spent: String,
    pub orders: Vec<OrderView>,
    pub products: Vec<SellerProductView>,
}

/// Sign-in page.
#[derive(Template, WebTemplate)]
#[template(path = "profile/sign_in.html")]
pub struct SignInTemplate {
    pub layout: Layout,
    pub email: String,
    pub error: Option<String>,
}

/// Orders for the profile: this session's newest first, then the history.
fn order_history(mut session_orders: Vec<Order>) -> Vec<Order> {
    session_orders.reverse();
    session_orders.extend(mock_data::sample_orders());
    session_orders
}

/// Display the profile, or the sign-in form when signed out.
#[instrument(skip_all)]
pub async fn show(OptionalUser(user): OptionalUser, storage: Storage) -> Result<Response> {
    let cart = storage.cart().await?;
    let layout = Layout::new(&cart, user.is_some());

    let Some(user) = user else {
        return Ok(SignInTemplate {
            layout,
            email: String::new(),
            error: None,
        }
        .into_response());
    };

    let orders = order_history(storage.orders().await?);
    let total_spent: Price = orders.iter().map(|o| o.total).sum();

    Ok(ProfileTemplate {
        layout,
        name: user.display_name().to_string(),
        email: user.email.to_string(),
        order_count: orders.len(),
        total_spent: total_spent.to_string(),
        orders: orders.iter().map(OrderView::from).collect(),
        products: mock_data::seller_products()
            .iter()
            .map(SellerProductView::from)
            .collect(),
    }
    .into_response())
}

/// Mock sign in.
#[instrument(skip_all)]
pub async fn login(storage: Storage, Form(form): Form<LoginForm>) -> Result<Response> {
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(err) => {
            tracing::debug!(error = %err, "Sign in rejected");
            let page = SignInTemplate {
                layout: Layout::load(&storage).await?,
                email: form.email,
                error: Some(err.to_string()),
            };
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    middleware::sign_in(&storage, &CurrentUser::sign_in(email)).await?;
    Ok(Redirect::to("/profile").into_response())
}

/// Sign out.
#[instrument(skip(storage))]
pub async fn logout(storage: Storage) -> Result<Redirect> {
    middleware::sign_out(&storage).await?;
    Ok(Redirect::to("/profile"))
}
