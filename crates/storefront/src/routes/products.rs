//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use shophub_core::{Category, Product, ProductId};

use super::{Layout, NotFoundTemplate};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;
use crate::storage::Storage;

/// Stock level that fills the availability bar.
const STOCK_BAR_MAX: u32 = 30;

/// Placeholder for products without a photo.
const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

/// Product card data for listing templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub image_url: String,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            price: product.price.to_string(),
            image_url: product
                .image_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

/// Build cards for a list of products.
pub fn cards<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<ProductCardView> {
    products.into_iter().map(ProductCardView::from).collect()
}

/// Category link data.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategoryView {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}

/// Product detail display data.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub stock: u32,
    pub stock_bar_max: u32,
    pub sku: String,
    pub category: Option<CategoryView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductView,
    pub related_products: Vec<ProductCardView>,
}

/// Display product detail page.
///
/// Unparseable and unknown IDs both get the not found page.
#[instrument(skip(state, storage))]
pub async fn show(
    State(state): State<AppState>,
    storage: Storage,
    Path(id): Path<String>,
) -> Result<Response> {
    let layout = Layout::load(&storage).await?;
    let catalog = state.catalog();

    let Some(product) = id
        .parse::<ProductId>()
        .ok()
        .and_then(|id| catalog.product(id))
    else {
        tracing::debug!(product_id = %id, "Unknown product");
        let page = NotFoundTemplate {
            layout,
            heading: "Product Not Found".to_string(),
            message: "This product doesn't exist or is no longer available.".to_string(),
        };
        return Ok((StatusCode::NOT_FOUND, page).into_response());
    };

    let view = ProductView {
        id: product.id.to_string(),
        title: product.title.clone(),
        description: product.description.clone(),
        price: product.price.to_string(),
        image_url: product
            .image_url
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        stock: product.stock,
        stock_bar_max: STOCK_BAR_MAX.max(product.stock),
        sku: format!("SHP-{}", product.id),
        category: catalog.category(product.category_id).map(CategoryView::from),
    };

    Ok(ProductShowTemplate {
        layout,
        product: view,
        related_products: cards(catalog.related(product)),
    }
    .into_response())
}
