//! Per-visitor key/value storage.
//!
//! Each value is kept in the visitor's session as a JSON string under a
//! fixed key (see [`storage_keys`]). Writes always replace the whole value.
//! A value that no longer deserializes is logged and treated as absent, so
//! a corrupt cart reads back as an empty cart instead of failing the page.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tower_sessions::Session;

use shophub_core::{Cart, Checkout, Order};

use crate::models::{CurrentUser, storage_keys};

/// Errors from visitor storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The session store failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A value could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Visitor storage backed by the session.
#[derive(Debug, Clone)]
pub struct Storage {
    session: Session,
}

impl<S> FromRequestParts<S> for Storage
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self::new(session))
    }
}

impl Storage {
    /// Wrap a session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Load and deserialize the value under `key`.
    ///
    /// Returns `Ok(None)` if the key is unset or its value is corrupt.
    ///
    /// # Errors
    ///
    /// Returns an error only if the session store itself fails.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let raw = match self.session.get::<String>(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(tower_sessions::session::Error::SerdeJson(e)) => {
                tracing::warn!(key, error = %e, "Ignoring stored value of unexpected shape");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring corrupt stored value");
                Ok(None)
            }
        }
    }

    /// Serialize `value` and store it under `key`, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the session store fails.
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.session.insert(key, raw).await?;
        Ok(())
    }

    /// Delete the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.session.remove_value(key).await?;
        Ok(())
    }

    /// The visitor's cart, empty if none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn cart(&self) -> Result<Cart, StorageError> {
        Ok(self.load(storage_keys::CART).await?.unwrap_or_default())
    }

    /// Persist the full cart.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the session store fails.
    pub async fn save_cart(&self, cart: &Cart) -> Result<(), StorageError> {
        self.save(storage_keys::CART, cart).await
    }

    /// The signed-in user, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn user(&self) -> Result<Option<CurrentUser>, StorageError> {
        self.load(storage_keys::USER).await
    }

    /// Record the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the session store fails.
    pub async fn save_user(&self, user: &CurrentUser) -> Result<(), StorageError> {
        self.save(storage_keys::USER, user).await
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn remove_user(&self) -> Result<(), StorageError> {
        self.remove(storage_keys::USER).await
    }

    /// Checkout wizard progress, starting fresh if none is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn checkout(&self) -> Result<Checkout, StorageError> {
        Ok(self.load(storage_keys::CHECKOUT).await?.unwrap_or_default())
    }

    /// Persist checkout wizard progress.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the session store fails.
    pub async fn save_checkout(&self, checkout: &Checkout) -> Result<(), StorageError> {
        self.save(storage_keys::CHECKOUT, checkout).await
    }

    /// Forget checkout progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn clear_checkout(&self) -> Result<(), StorageError> {
        self.remove(storage_keys::CHECKOUT).await
    }

    /// Orders placed this session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn orders(&self) -> Result<Vec<Order>, StorageError> {
        Ok(self.load(storage_keys::ORDERS).await?.unwrap_or_default())
    }

    /// Append an order to the session's history.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the session store fails.
    pub async fn push_order(&self, order: Order) -> Result<(), StorageError> {
        let mut orders = self.orders().await?;
        orders.push(order);
        self.save(storage_keys::ORDERS, &orders).await
    }

    /// Image kept from a rejected sell form, as a URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn listing_image(&self) -> Result<Option<String>, StorageError> {
        self.load(storage_keys::LISTING_IMAGE).await
    }

    /// Keep a sell form image until the listing is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the session store fails.
    pub async fn save_listing_image(&self, image_url: &str) -> Result<(), StorageError> {
        self.save(storage_keys::LISTING_IMAGE, image_url).await
    }

    /// Drop any kept sell form image.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn clear_listing_image(&self) -> Result<(), StorageError> {
        self.remove(storage_keys::LISTING_IMAGE).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::DateTime;
    use shophub_core::{CategoryId, ContactInfo, Email, Price, Product, ProductId};

    use super::*;
    use crate::middleware::session::CacheStore;

    fn storage() -> Storage {
        Storage::new(Session::new(None, Arc::new(CacheStore::new(1 << 20)), None))
    }

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            price: Price::from_cents(1999),
            stock: 10,
            category_id: CategoryId::new(1),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_cart_round_trips_through_session() {
        let storage = storage();
        assert!(storage.cart().await.unwrap().is_empty());

        let mut cart = Cart::new();
        cart.add(&product(1));
        cart.add(&product(1));
        storage.save_cart(&cart).await.unwrap();

        let loaded = storage.cart().await.unwrap();
        assert_eq!(loaded, cart);
        assert_eq!(loaded.item_count(), 2);
    }

    #[tokio::test]
    async fn test_values_are_stored_as_json_strings() {
        let storage = storage();
        let mut cart = Cart::new();
        cart.add(&product(7));
        storage.save_cart(&cart).await.unwrap();

        let raw: String = storage
            .session
            .get(storage_keys::CART)
            .await
            .unwrap()
            .unwrap();
        assert!(raw.starts_with("[{"));
        assert!(raw.contains("\"id\":\"7\""));
    }

    #[tokio::test]
    async fn test_corrupt_cart_reads_as_empty() {
        let storage = storage();
        storage
            .session
            .insert(storage_keys::CART, "{not json")
            .await
            .unwrap();
        assert!(storage.cart().await.unwrap().is_empty());

        // A value that isn't even a string is treated the same way
        storage
            .session
            .insert(storage_keys::CART, 42)
            .await
            .unwrap();
        assert!(storage.cart().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_user_reads_as_signed_out() {
        let storage = storage();
        storage
            .session
            .insert(storage_keys::USER, "{\"email\":1}")
            .await
            .unwrap();
        assert!(storage.user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_sign_in_and_out() {
        let storage = storage();
        let user = CurrentUser::sign_in(Email::parse("sam@example.com").unwrap());
        storage.save_user(&user).await.unwrap();
        assert_eq!(storage.user().await.unwrap(), Some(user));

        storage.remove_user().await.unwrap();
        assert!(storage.user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_orders_append() {
        let storage = storage();
        let mut cart = Cart::new();
        cart.add(&product(2));

        let first = Order::from_cart(&cart, DateTime::from_timestamp_millis(1_000).unwrap());
        let second = Order::from_cart(&cart, DateTime::from_timestamp_millis(2_000).unwrap());
        storage.push_order(first.clone()).await.unwrap();
        storage.push_order(second.clone()).await.unwrap();

        assert_eq!(storage.orders().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_listing_image_is_kept_until_cleared() {
        let storage = storage();
        assert!(storage.listing_image().await.unwrap().is_none());

        storage
            .save_listing_image("data:image/png;base64,cG5n")
            .await
            .unwrap();
        assert_eq!(
            storage.listing_image().await.unwrap().as_deref(),
            Some("data:image/png;base64,cG5n")
        );

        storage.clear_listing_image().await.unwrap();
        assert!(storage.listing_image().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_checkout_defaults_and_clears() {
        let storage = storage();
        assert_eq!(storage.checkout().await.unwrap(), Checkout::new());

        let mut checkout = Checkout::new();
        checkout
            .submit_contact(ContactInfo {
                email: "sam@example.com".to_string(),
                first_name: "Sam".to_string(),
                last_name: "Lee".to_string(),
            })
            .unwrap();
        storage.save_checkout(&checkout).await.unwrap();
        assert_eq!(storage.checkout().await.unwrap(), checkout);

        storage.clear_checkout().await.unwrap();
        assert_eq!(storage.checkout().await.unwrap(), Checkout::new());
    }
}
