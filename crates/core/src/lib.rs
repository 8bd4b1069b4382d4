//! ShopHub Core - Shared domain types and storefront logic.
//!
//! This crate provides the pieces of the storefront that do not touch I/O:
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`cart`] - The shopping cart container
//! - [`catalog`] - Products, categories, and catalog queries
//! - [`checkout`] - The checkout wizard state machine
//! - [`listing`] - Seller listing validation
//! - [`order`] - Orders produced by checkout
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP, no
//! sessions, no clocks. Callers pass in the current time where it matters,
//! which keeps everything here deterministic and easy to test.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod listing;
pub mod order;
pub mod types;

pub use cart::{Cart, CartItem};
pub use catalog::{Catalog, Category, Product, ProductQuery, SortOrder};
pub use checkout::{
    Checkout, CheckoutError, CheckoutStep, ContactInfo, PaymentDetails, ShippingAddress,
};
pub use listing::{ListingDraft, ListingError, SellerListing};
pub use order::{Order, OrderLine};
pub use types::*;
