//! Checkout wizard state machine.
//!
//! ```text
//! Info ──submit_contact──▶ Shipping ──submit_shipping──▶ Payment ──place_order──▶ Success
//!   ◀────────back─────────    ◀──────────back───────────
//! ```
//!
//! Each step requires all of its fields to be non-blank before the wizard
//! advances. Payment details are validated but never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::order::Order;
use crate::types::{Email, EmailError};

/// Errors raised when a checkout step cannot advance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// One or more required fields were blank.
    #[error("Please fill in: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The contact email is malformed.
    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The action is not valid from the current step.
    #[error("Cannot {action} during the {step} step")]
    OutOfOrder {
        action: &'static str,
        step: CheckoutStep,
    },

    /// There is nothing to buy.
    #[error("Your cart is empty")]
    EmptyCart,
}

/// A step in the checkout wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Info,
    Shipping,
    Payment,
    Success,
}

impl CheckoutStep {
    /// The steps shown in the progress bar.
    pub const PROGRESS: [Self; 3] = [Self::Info, Self::Shipping, Self::Payment];

    /// Position of this step in the wizard.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Info => 0,
            Self::Shipping => 1,
            Self::Payment => 2,
            Self::Success => 3,
        }
    }

    /// Returns true if `self` has been reached when the wizard is at `current`.
    #[must_use]
    pub const fn reached_by(self, current: Self) -> bool {
        current.index() >= self.index()
    }

    /// Heading for the step's form.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Info => "Contact Information",
            Self::Shipping => "Shipping Address",
            Self::Payment => "Payment Information",
            Self::Success => "Order Confirmed",
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Shipping => write!(f, "shipping"),
            Self::Payment => write!(f, "payment"),
            Self::Success => write!(f, "success"),
        }
    }
}

/// Collect labels of blank fields.
fn blank_fields(fields: &[(&'static str, &str)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| *label)
        .collect()
}

fn require(fields: &[(&'static str, &str)]) -> Result<(), CheckoutError> {
    let missing = blank_fields(fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CheckoutError::MissingFields(missing))
    }
}

/// Contact step fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl ContactInfo {
    fn validate(&self) -> Result<Email, CheckoutError> {
        require(&[
            ("email", self.email.as_str()),
            ("first name", self.first_name.as_str()),
            ("last name", self.last_name.as_str()),
        ])?;
        Ok(Email::parse(&self.email)?)
    }
}

/// Shipping step fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

impl ShippingAddress {
    fn validate(&self) -> Result<(), CheckoutError> {
        require(&[
            ("street address", self.address.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("ZIP code", self.zip_code.as_str()),
        ])
    }
}

/// Payment step fields. Deserialize-only so they can't end up in storage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentDetails {
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub card_name: String,
    #[serde(default)]
    pub expiry: String,
    #[serde(default)]
    pub cvv: String,
}

impl PaymentDetails {
    /// Check that every payment field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] listing the blank fields.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        require(&[
            ("card number", self.card_number.as_str()),
            ("name on card", self.card_name.as_str()),
            ("expiry", self.expiry.as_str()),
            ("CVV", self.cvv.as_str()),
        ])
    }
}

/// Progress through checkout for one visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    step: CheckoutStep,
    contact: ContactInfo,
    shipping: ShippingAddress,
}

impl Checkout {
    /// Start a new checkout at the contact step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Contact details entered so far.
    #[must_use]
    pub const fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    /// Shipping address entered so far.
    #[must_use]
    pub const fn shipping(&self) -> &ShippingAddress {
        &self.shipping
    }

    /// Submit the contact step and move to shipping.
    ///
    /// May be resubmitted from any step before the order is placed.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is blank, the email is malformed, or the
    /// order has already been placed.
    pub fn submit_contact(&mut self, contact: ContactInfo) -> Result<(), CheckoutError> {
        if self.step == CheckoutStep::Success {
            return Err(CheckoutError::OutOfOrder {
                action: "change contact details",
                step: self.step,
            });
        }

        let email = contact.validate()?;
        self.contact = ContactInfo {
            email: email.into_inner(),
            first_name: contact.first_name.trim().to_string(),
            last_name: contact.last_name.trim().to_string(),
        };
        self.step = CheckoutStep::Shipping;
        Ok(())
    }

    /// Submit the shipping step and move to payment.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is blank or contact details have not
    /// been submitted yet.
    pub fn submit_shipping(&mut self, shipping: ShippingAddress) -> Result<(), CheckoutError> {
        if !matches!(self.step, CheckoutStep::Shipping | CheckoutStep::Payment) {
            return Err(CheckoutError::OutOfOrder {
                action: "enter a shipping address",
                step: self.step,
            });
        }

        shipping.validate()?;
        self.shipping = ShippingAddress {
            address: shipping.address.trim().to_string(),
            city: shipping.city.trim().to_string(),
            state: shipping.state.trim().to_string(),
            zip_code: shipping.zip_code.trim().to_string(),
        };
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Check that an order could be placed with these payment details,
    /// without changing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the wizard is not at the payment step, the cart
    /// is empty, or a payment field is blank.
    pub fn check_payment(&self, payment: &PaymentDetails, cart: &Cart) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::OutOfOrder {
                action: "place an order",
                step: self.step,
            });
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        payment.validate()
    }

    /// Place the order: snapshot the cart, empty it, and finish the wizard.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Checkout::check_payment`]. On error neither the
    /// cart nor the wizard changes.
    pub fn place_order(
        &mut self,
        payment: &PaymentDetails,
        cart: &mut Cart,
        placed_at: DateTime<Utc>,
    ) -> Result<Order, CheckoutError> {
        self.check_payment(payment, cart)?;

        let order = Order::from_cart(cart, placed_at);
        cart.clear();
        self.step = CheckoutStep::Success;
        Ok(order)
    }

    /// Go back one step. Has no effect on the first step or after success.
    pub fn back(&mut self) {
        self.step = match self.step {
            CheckoutStep::Shipping => CheckoutStep::Info,
            CheckoutStep::Payment => CheckoutStep::Shipping,
            step => step,
        };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::types::{CategoryId, Price, ProductId};

    fn contact() -> ContactInfo {
        ContactInfo {
            email: " shopper@example.com ".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    fn shipping() -> ShippingAddress {
        ShippingAddress {
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
        }
    }

    fn payment() -> PaymentDetails {
        PaymentDetails {
            card_number: "4242424242424242".to_string(),
            card_name: "Ada Lovelace".to_string(),
            expiry: "12/30".to_string(),
            cvv: "123".to_string(),
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&Product {
            id: ProductId::new(1),
            title: "Yoga Mat".to_string(),
            description: String::new(),
            price: Price::from_cents(2499),
            stock: 3,
            category_id: CategoryId::new(4),
            image_url: None,
        });
        cart
    }

    fn at() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn test_happy_path() {
        let mut checkout = Checkout::new();
        let mut cart = cart();
        assert_eq!(checkout.step(), CheckoutStep::Info);

        checkout.submit_contact(contact()).unwrap();
        assert_eq!(checkout.step(), CheckoutStep::Shipping);
        assert_eq!(checkout.contact().email, "shopper@example.com");

        checkout.submit_shipping(shipping()).unwrap();
        assert_eq!(checkout.step(), CheckoutStep::Payment);

        let order = checkout.place_order(&payment(), &mut cart, at()).unwrap();
        assert_eq!(checkout.step(), CheckoutStep::Success);
        assert_eq!(order.id, "ORD-1700000000000");
        assert_eq!(order.total, Price::from_cents(2499));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_contact_requires_all_fields() {
        let mut checkout = Checkout::new();
        let err = checkout
            .submit_contact(ContactInfo {
                email: "a@b.c".to_string(),
                first_name: "  ".to_string(),
                last_name: String::new(),
            })
            .unwrap_err();

        assert_eq!(
            err,
            CheckoutError::MissingFields(vec!["first name", "last name"])
        );
        assert_eq!(err.to_string(), "Please fill in: first name, last name");
        assert_eq!(checkout.step(), CheckoutStep::Info);
    }

    #[test]
    fn test_contact_rejects_bad_email() {
        let mut checkout = Checkout::new();
        let err = checkout
            .submit_contact(ContactInfo {
                email: "not-an-email".to_string(),
                ..contact()
            })
            .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidEmail(_)));
        assert_eq!(checkout.step(), CheckoutStep::Info);
    }

    #[test]
    fn test_shipping_requires_contact_first() {
        let mut checkout = Checkout::new();
        let err = checkout.submit_shipping(shipping()).unwrap_err();
        assert!(matches!(err, CheckoutError::OutOfOrder { .. }));
    }

    #[test]
    fn test_shipping_requires_all_fields() {
        let mut checkout = Checkout::new();
        checkout.submit_contact(contact()).unwrap();
        let err = checkout
            .submit_shipping(ShippingAddress {
                zip_code: String::new(),
                ..shipping()
            })
            .unwrap_err();
        assert_eq!(err, CheckoutError::MissingFields(vec!["ZIP code"]));
        assert_eq!(checkout.step(), CheckoutStep::Shipping);
    }

    #[test]
    fn test_payment_validation_leaves_cart_alone() {
        let mut checkout = Checkout::new();
        let mut cart = cart();
        checkout.submit_contact(contact()).unwrap();
        checkout.submit_shipping(shipping()).unwrap();

        let blank = PaymentDetails {
            cvv: String::new(),
            ..payment()
        };
        let err = checkout.place_order(&blank, &mut cart, at()).unwrap_err();
        assert_eq!(err, CheckoutError::MissingFields(vec!["CVV"]));
        assert_eq!(cart.len(), 1);
        assert_eq!(checkout.step(), CheckoutStep::Payment);
    }

    #[test]
    fn test_cannot_place_order_with_empty_cart() {
        let mut checkout = Checkout::new();
        checkout.submit_contact(contact()).unwrap();
        checkout.submit_shipping(shipping()).unwrap();

        let err = checkout
            .place_order(&payment(), &mut Cart::new(), at())
            .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn test_cannot_place_order_before_payment_step() {
        let mut checkout = Checkout::new();
        let mut cart = cart();
        checkout.submit_contact(contact()).unwrap();
        let err = checkout.place_order(&payment(), &mut cart, at()).unwrap_err();
        assert!(matches!(err, CheckoutError::OutOfOrder { .. }));
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_back() {
        let mut checkout = Checkout::new();
        checkout.back();
        assert_eq!(checkout.step(), CheckoutStep::Info);

        checkout.submit_contact(contact()).unwrap();
        checkout.submit_shipping(shipping()).unwrap();
        checkout.back();
        assert_eq!(checkout.step(), CheckoutStep::Shipping);
        checkout.back();
        assert_eq!(checkout.step(), CheckoutStep::Info);

        // Values survive going back
        assert_eq!(checkout.shipping().city, "Springfield");
    }

    #[test]
    fn test_no_changes_after_success() {
        let mut checkout = Checkout::new();
        let mut cart = cart();
        checkout.submit_contact(contact()).unwrap();
        checkout.submit_shipping(shipping()).unwrap();
        checkout.place_order(&payment(), &mut cart, at()).unwrap();

        checkout.back();
        assert_eq!(checkout.step(), CheckoutStep::Success);
        assert!(checkout.submit_contact(contact()).is_err());
    }

    #[test]
    fn test_progress() {
        assert!(CheckoutStep::Info.reached_by(CheckoutStep::Shipping));
        assert!(CheckoutStep::Shipping.reached_by(CheckoutStep::Shipping));
        assert!(!CheckoutStep::Payment.reached_by(CheckoutStep::Shipping));
    }
}
