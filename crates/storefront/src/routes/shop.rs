//! Shop listing route handler.
//!
//! Filters live entirely in the query string so every state of the page
//! is a shareable URL. Malformed parameters fall back to their defaults
//! instead of rejecting the request.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::instrument;

use shophub_core::catalog::DEFAULT_MAX_PRICE;
use shophub_core::{Catalog, Price, ProductQuery, SortOrder};

use super::Layout;
use super::products::{ProductCardView, cards};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;
use crate::storage::Storage;

/// Shop query parameters, all optional.
#[derive(Debug, Default, Deserialize)]
pub struct ShopParams {
    pub category: Option<String>,
    pub sort: Option<String>,
    pub max_price: Option<String>,
}

/// Shop filters after applying defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopFilters {
    /// Slug of a known category, if one is selected.
    pub category: Option<String>,
    pub sort: SortOrder,
    /// Price ceiling in whole dollars.
    pub max_price: u32,
}

impl ShopFilters {
    /// Resolve raw parameters against the catalog.
    #[must_use]
    pub fn resolve(params: &ShopParams, catalog: &Catalog) -> Self {
        let category = params
            .category
            .as_deref()
            .and_then(|slug| catalog.category_by_slug(slug))
            .map(|c| c.slug.clone());

        Self {
            category,
            sort: params
                .sort
                .as_deref()
                .map_or(SortOrder::Newest, SortOrder::parse),
            max_price: params
                .max_price
                .as_deref()
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(DEFAULT_MAX_PRICE),
        }
    }

    /// The catalog query for these filters.
    #[must_use]
    pub fn query(&self) -> ProductQuery {
        ProductQuery {
            category: self.category.clone(),
            max_price: Price::from_dollars(self.max_price),
            sort: self.sort,
            ..ProductQuery::default()
        }
    }

    /// Link to the shop with these filters, replacing the category.
    #[must_use]
    pub fn href_with_category(&self, category: Option<&str>) -> String {
        let mut href = format!("/shop?sort={}&max_price={}", self.sort.as_str(), self.max_price);
        if let Some(slug) = category {
            href.push_str("&category=");
            href.push_str(slug);
        }
        href
    }
}

/// Category filter entry.
#[derive(Debug, Clone)]
pub struct CategoryFilterView {
    pub name: String,
    pub href: String,
    pub selected: bool,
}

/// Sort menu entry.
#[derive(Debug, Clone)]
pub struct SortOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Shop page template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryFilterView>,
    pub all_categories_href: String,
    pub all_categories_selected: bool,
    /// Selected category slug, or empty.
    pub category: String,
    pub sort_options: Vec<SortOptionView>,
    pub max_price: u32,
    pub slider_max: u32,
    pub reset_price_href: String,
    pub products: Vec<ProductCardView>,
}

/// Display the shop listing.
#[instrument(skip(state, storage))]
pub async fn index(
    State(state): State<AppState>,
    storage: Storage,
    Query(params): Query<ShopParams>,
) -> Result<ShopTemplate> {
    let catalog = state.catalog();
    let selection = ShopFilters::resolve(&params, catalog);
    let products = cards(catalog.query(&selection.query()));

    let categories = catalog
        .categories()
        .iter()
        .map(|c| CategoryFilterView {
            name: c.name.clone(),
            href: selection.href_with_category(Some(&c.slug)),
            selected: selection.category.as_deref() == Some(c.slug.as_str()),
        })
        .collect();

    let sort_options = SortOrder::all()
        .into_iter()
        .map(|sort| SortOptionView {
            value: sort.as_str(),
            label: sort.label(),
            selected: sort == selection.sort,
        })
        .collect();

    let reset_price_href = ShopFilters {
        max_price: DEFAULT_MAX_PRICE,
        ..selection.clone()
    }
    .href_with_category(selection.category.as_deref());

    Ok(ShopTemplate {
        layout: Layout::load(&storage).await?,
        categories,
        all_categories_href: selection.href_with_category(None),
        all_categories_selected: selection.category.is_none(),
        category: selection.category.clone().unwrap_or_default(),
        sort_options,
        max_price: selection.max_price,
        slider_max: DEFAULT_MAX_PRICE.max(selection.max_price),
        reset_price_href,
        products,
    })
}
