//! Session-related types.
//!
//! Types stored in the session for the mock sign-in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shophub_core::Email;

/// Session-stored user identity.
///
/// There are no passwords or tokens. Signing in only records who the
/// visitor says they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Random ID assigned at sign in.
    pub id: Uuid,
    /// User's email address.
    pub email: Email,
    /// Name shown on the profile page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl CurrentUser {
    /// Sign in as the owner of `email`, deriving a display name from it.
    #[must_use]
    pub fn sign_in(email: Email) -> Self {
        let name = email.display_name();
        Self {
            id: Uuid::new_v4(),
            email,
            full_name: (!name.is_empty()).then_some(name),
        }
    }

    /// Full name if known, otherwise the email address.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(self.email.as_str())
    }
}

/// Storage keys for visitor data.
pub mod keys {
    /// Serialized cart items.
    pub const CART: &str = "cart";

    /// The signed-in user record.
    pub const USER: &str = "user";

    /// Checkout wizard progress.
    pub const CHECKOUT: &str = "checkout";

    /// Orders placed during this session.
    pub const ORDERS: &str = "orders";

    /// Image carried over from a rejected sell form.
    pub const LISTING_IMAGE: &str = "listing_image";
}
