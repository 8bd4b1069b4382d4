//! Orders produced by checkout.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::{OrderStatus, Price};

/// A line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    /// Unit price at the time of purchase.
    pub price: Price,
}

impl OrderLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order number, e.g. `ORD-1718000000000`.
    pub id: String,
    pub date: NaiveDate,
    pub total: Price,
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
}

impl Order {
    /// Snapshot a cart into a new order placed at `placed_at`.
    ///
    /// The order number is derived from the placement time in milliseconds.
    #[must_use]
    pub fn from_cart(cart: &Cart, placed_at: DateTime<Utc>) -> Self {
        Self {
            id: order_number(placed_at),
            date: placed_at.date_naive(),
            total: cart.total(),
            status: OrderStatus::InTransit,
            items: cart
                .items()
                .iter()
                .map(|item| OrderLine {
                    name: item.title.clone(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        }
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }
}

/// Order number for an order placed at the given instant.
#[must_use]
pub fn order_number(placed_at: DateTime<Utc>) -> String {
    format!("ORD-{}", placed_at.timestamp_millis())
}
