//! Seller listing validation.
//!
//! The sell form collects raw strings. A [`ListingDraft`] turns them into a
//! [`SellerListing`] or reports what is wrong. Listings are never added to
//! the catalog.

use crate::catalog::{Catalog, Category};
use crate::types::{CategoryId, Price, PriceError};

/// Errors in a submitted listing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("Please fill in: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("Stock must be a whole number of zero or more (got {0:?})")]
    InvalidStock(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Image must be an uploaded image or an http(s) URL")]
    InvalidImage,
}

/// Raw sell form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub price: String,
    /// Category ID as submitted by the select box.
    pub category: String,
    pub stock: String,
    /// Either a `data:` URL for an uploaded file or a remote image URL.
    pub image_url: Option<String>,
}

/// A validated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerListing {
    pub title: String,
    pub description: String,
    pub price: Price,
    pub category: Category,
    pub stock: u32,
    pub image_url: String,
}

impl ListingDraft {
    /// Validate the draft against the catalog's categories.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::MissingFields`] first if anything is blank,
    /// then the first field-level problem found.
    pub fn validate(&self, catalog: &Catalog) -> Result<SellerListing, ListingError> {
        let image = self.image_url.as_deref().unwrap_or("").trim();
        let missing: Vec<&'static str> = [
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
            ("category", self.category.as_str()),
            ("price", self.price.as_str()),
            ("stock", self.stock.as_str()),
            ("image", image),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect();
        if !missing.is_empty() {
            return Err(ListingError::MissingFields(missing));
        }

        let category = self
            .category
            .trim()
            .parse::<CategoryId>()
            .ok()
            .and_then(|id| catalog.category(id))
            .ok_or_else(|| ListingError::UnknownCategory(self.category.clone()))?;

        let price = Price::parse(&self.price)?;

        let stock = self
            .stock
            .trim()
            .parse::<u32>()
            .map_err(|_| ListingError::InvalidStock(self.stock.clone()))?;

        if !is_image_url(image) {
            return Err(ListingError::InvalidImage);
        }

        Ok(SellerListing {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            category: category.clone(),
            stock,
            image_url: image.to_string(),
        })
    }
}

fn is_image_url(url: &str) -> bool {
    url.starts_with("data:image/") || url.starts_with("https://") || url.starts_with("http://")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(
            Vec::new(),
            vec![Category {
                id: CategoryId::new(2),
                name: "Fashion".to_string(),
                slug: "fashion".to_string(),
            }],
        )
    }

    fn draft() -> ListingDraft {
        ListingDraft {
            title: " Vintage Camera ".to_string(),
            description: "Works great".to_string(),
            price: "150.00".to_string(),
            category: "2".to_string(),
            stock: "3".to_string(),
            image_url: Some("data:image/png;base64,iVBORw0KGgo=".to_string()),
        }
    }

    #[test]
    fn test_valid_listing() {
        let listing = draft().validate(&catalog()).unwrap();
        assert_eq!(listing.title, "Vintage Camera");
        assert_eq!(listing.price, Price::from_dollars(150));
        assert_eq!(listing.category.name, "Fashion");
        assert_eq!(listing.stock, 3);
    }

    #[test]
    fn test_missing_fields_listed_in_form_order() {
        let err = ListingDraft {
            title: String::new(),
            image_url: None,
            ..draft()
        }
        .validate(&catalog())
        .unwrap_err();
        assert_eq!(err, ListingError::MissingFields(vec!["title", "image"]));
    }

    #[test]
    fn test_unknown_category() {
        let err = ListingDraft {
            category: "9".to_string(),
            ..draft()
        }
        .validate(&catalog())
        .unwrap_err();
        assert!(matches!(err, ListingError::UnknownCategory(_)));
    }

    #[test]
    fn test_bad_price_and_stock() {
        let err = ListingDraft {
            price: "-4".to_string(),
            ..draft()
        }
        .validate(&catalog())
        .unwrap_err();
        assert_eq!(err, ListingError::InvalidPrice(PriceError::Negative));

        let err = ListingDraft {
            stock: "2.5".to_string(),
            ..draft()
        }
        .validate(&catalog())
        .unwrap_err();
        assert!(matches!(err, ListingError::InvalidStock(_)));
    }

    #[test]
    fn test_image_must_look_like_an_image() {
        let err = ListingDraft {
            image_url: Some("javascript:alert(1)".to_string()),
            ..draft()
        }
        .validate(&catalog())
        .unwrap_err();
        assert_eq!(err, ListingError::InvalidImage);

        let listing = ListingDraft {
            image_url: Some("https://example.com/camera.jpg".to_string()),
            ..draft()
        }
        .validate(&catalog())
        .unwrap();
        assert_eq!(listing.image_url, "https://example.com/camera.jpg");
    }
}
