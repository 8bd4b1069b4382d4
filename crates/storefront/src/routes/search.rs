//! Search route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use super::Layout;
use super::products::{ProductCardView, cards};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;
use crate::storage::Storage;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub layout: Layout,
    /// The query as typed, for the search box and heading.
    pub query: String,
    /// False when the query is blank; the page then shows a prompt instead
    /// of an empty result list.
    pub has_query: bool,
    pub results: Vec<ProductCardView>,
}

/// Display search results.
#[instrument(skip(state, storage))]
pub async fn search(
    State(state): State<AppState>,
    storage: Storage,
    Query(query): Query<SearchQuery>,
) -> Result<SearchTemplate> {
    let results = cards(state.catalog().search(&query.q));
    tracing::debug!(results = results.len(), "Search complete");

    Ok(SearchTemplate {
        layout: Layout::load(&storage).await?,
        has_query: !query.q.trim().is_empty(),
        query: query.q,
        results,
    })
}
