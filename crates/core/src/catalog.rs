//! Product catalog and catalog queries.
//!
//! The catalog is a fixed list of products and categories loaded at startup.
//! Nothing here mutates it; every query returns borrowed products in a new
//! `Vec`, so listing pages can filter and sort without cloning the catalog.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId};

/// Upper bound of the shop's price slider, in dollars.
pub const DEFAULT_MAX_PRICE: u32 = 300;

/// Number of products shown in the home page "featured" section.
pub const FEATURED_COUNT: usize = 6;

/// Number of related products shown on a product page.
pub const RELATED_COUNT: usize = 4;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
    pub category_id: CategoryId,
    pub image_url: Option<String>,
}

impl Product {
    /// Case-insensitive substring match against title and description.
    ///
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Newest,
    /// Cheapest first.
    PriceLowToHigh,
    /// Most expensive first.
    PriceHighToLow,
}

impl SortOrder {
    /// Parse a sort key from a query parameter. Unknown keys fall back to
    /// [`SortOrder::Newest`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-low" => Self::PriceLowToHigh,
            "price-high" => Self::PriceHighToLow,
            _ => Self::Newest,
        }
    }

    /// Query parameter value for this order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLowToHigh => "price-low",
            Self::PriceHighToLow => "price-high",
        }
    }

    /// Label shown in the sort menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest",
            Self::PriceLowToHigh => "Price: Low to High",
            Self::PriceHighToLow => "Price: High to Low",
        }
    }

    /// All sort orders, in menu order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Newest, Self::PriceLowToHigh, Self::PriceHighToLow]
    }

    /// Sort products in place. Stable, so ties keep catalog order.
    pub fn apply(self, products: &mut [&Product]) {
        match self {
            Self::Newest => {}
            Self::PriceLowToHigh => products.sort_by(|a, b| a.price.cmp(&b.price)),
            Self::PriceHighToLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
        }
    }
}

/// Shop listing query: category filter, price ceiling, and sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Category slug. Unknown slugs do not filter anything.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Price,
    /// Inclusive upper price bound.
    pub max_price: Price,
    pub sort: SortOrder,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            category: None,
            min_price: Price::ZERO,
            max_price: Price::from_dollars(DEFAULT_MAX_PRICE),
            sort: SortOrder::Newest,
        }
    }
}

/// The full product catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
}

impl Catalog {
    /// Create a catalog from products and categories.
    #[must_use]
    pub const fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All categories in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look up a category by ID.
    #[must_use]
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up a category by slug.
    #[must_use]
    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// The first few products, for the home page.
    #[must_use]
    pub fn featured(&self) -> &[Product] {
        let end = self.products.len().min(FEATURED_COUNT);
        self.products.get(..end).unwrap_or_default()
    }

    /// Free-text search over titles and descriptions.
    ///
    /// Matching is case-insensitive and uses the term as typed, surrounding
    /// spaces included. A blank term returns nothing rather than the whole
    /// catalog.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Product> {
        if term.trim().is_empty() {
            return Vec::new();
        }

        let needle = term.to_lowercase();
        self.products.iter().filter(|p| p.matches(&needle)).collect()
    }

    /// Filter and sort products for the shop listing.
    #[must_use]
    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        let category = query
            .category
            .as_deref()
            .and_then(|slug| self.category_by_slug(slug))
            .map(|c| c.id);

        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| category.is_none_or(|id| p.category_id == id))
            .filter(|p| p.price >= query.min_price && p.price <= query.max_price)
            .collect();

        query.sort.apply(&mut products);
        products
    }

    /// Other products from the same category, up to [`RELATED_COUNT`].
    #[must_use]
    pub fn related(&self, product: &Product) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category_id == product.category_id && p.id != product.id)
            .take(RELATED_COUNT)
            .collect()
    }
}
