//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use super::Layout;
use super::products::{CategoryView, ProductCardView, cards};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;
use crate::storage::Storage;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryView>,
    pub featured_products: Vec<ProductCardView>,
}

/// Display the home page.
#[instrument(skip(state, storage))]
pub async fn home(State(state): State<AppState>, storage: Storage) -> Result<HomeTemplate> {
    let catalog = state.catalog();

    Ok(HomeTemplate {
        layout: Layout::load(&storage).await?,
        categories: catalog.categories().iter().map(CategoryView::from).collect(),
        featured_products: cards(catalog.featured()),
    })
}
