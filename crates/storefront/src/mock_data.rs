//! Static catalog and profile fixtures.
//!
//! There is no database. The catalog below is built once at startup and
//! shared read-only; the order history and seller products are shown on
//! every signed-in profile.

use chrono::NaiveDate;
use shophub_core::{
    Catalog, Category, CategoryId, Order, OrderLine, OrderStatus, Price, Product, ProductId,
};

/// A product the signed-in visitor is "selling".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerProduct {
    pub id: u32,
    pub title: String,
    pub price: Price,
    pub sales: u32,
    pub image_url: String,
}

fn category(id: i32, name: &str, slug: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        slug: slug.to_string(),
    }
}

fn product(
    id: i32,
    title: &str,
    description: &str,
    cents: i64,
    stock: u32,
    category: &Category,
) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        price: Price::from_cents(cents),
        stock,
        category_id: category.id,
        image_url: Some(format!("/static/images/{}.svg", category.slug)),
    }
}

/// The storefront catalog.
#[must_use]
pub fn catalog() -> Catalog {
    let electronics = category(1, "Electronics", "electronics");
    let fashion = category(2, "Fashion", "fashion");
    let home = category(3, "Home & Garden", "home-garden");
    let sports = category(4, "Sports", "sports");
    let books = category(5, "Books", "books");

    let products = vec![
        product(
            1,
            "Wireless Headphones",
            "Over-ear Bluetooth headphones with 30 hours of battery life and a foldable design.",
            7999,
            25,
            &electronics,
        ),
        product(
            2,
            "Smart Watch",
            "Fitness tracking, heart rate monitoring and notifications on a bright always-on display.",
            19999,
            15,
            &electronics,
        ),
        product(
            3,
            "Bluetooth Speaker",
            "Waterproof portable speaker with deep bass. Pairs two speakers for stereo sound.",
            4999,
            30,
            &electronics,
        ),
        product(
            4,
            "Designer T-Shirt",
            "Soft organic cotton tee with a relaxed fit. Available in classic colors.",
            3499,
            28,
            &fashion,
        ),
        product(
            5,
            "Leather Jacket",
            "Genuine leather biker jacket with quilted lining and heavy-duty zippers.",
            24999,
            8,
            &fashion,
        ),
        product(
            6,
            "Running Shoes",
            "Lightweight running shoes with responsive cushioning for road and track.",
            4999,
            20,
            &sports,
        ),
        product(
            7,
            "Yoga Mat",
            "Non-slip 6mm yoga mat with a carrying strap. Easy to clean.",
            2499,
            30,
            &sports,
        ),
        product(
            8,
            "Ceramic Plant Pot",
            "Hand-glazed ceramic pot with a drainage hole and bamboo saucer.",
            1999,
            22,
            &home,
        ),
        product(
            9,
            "Scented Candle Set",
            "Three soy wax candles in lavender, vanilla and cedar. 40 hours each.",
            2999,
            18,
            &home,
        ),
        product(
            10,
            "Desk Lamp",
            "Dimmable LED desk lamp with adjustable arm and USB charging port.",
            3999,
            14,
            &home,
        ),
        product(
            11,
            "The Rust Programming Language",
            "The official guide to Rust, covering ownership, traits and fearless concurrency.",
            3999,
            12,
            &books,
        ),
        product(
            12,
            "Mystery Novel Collection",
            "Box set of five bestselling mystery novels. Perfect for a long weekend.",
            5999,
            10,
            &books,
        ),
        product(
            13,
            "Noise Cancelling Earbuds",
            "True wireless earbuds with active noise cancelling and a pocket-sized charging case.",
            12999,
            16,
            &electronics,
        ),
        product(
            14,
            "Denim Jeans",
            "Slim fit stretch denim jeans with a classic five-pocket design.",
            6499,
            24,
            &fashion,
        ),
    ];

    Catalog::new(products, vec![electronics, fashion, home, sports, books])
}

fn line(name: &str, quantity: u32, cents: i64) -> OrderLine {
    OrderLine {
        name: name.to_string(),
        quantity,
        price: Price::from_cents(cents),
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Order history shown on every profile, newest first.
#[must_use]
pub fn sample_orders() -> Vec<Order> {
    vec![
        Order {
            id: "ORD-001".to_string(),
            date: date(2024, 2, 15),
            total: Price::from_cents(15997),
            status: OrderStatus::Delivered,
            items: vec![
                line("Wireless Headphones", 1, 7999),
                line("Designer T-Shirt", 1, 3499),
            ],
        },
        Order {
            id: "ORD-002".to_string(),
            date: date(2024, 2, 10),
            total: Price::from_cents(9998),
            status: OrderStatus::InTransit,
            items: vec![line("Running Shoes", 2, 4999)],
        },
        Order {
            id: "ORD-003".to_string(),
            date: date(2024, 2, 1),
            total: Price::from_cents(8999),
            status: OrderStatus::Delivered,
            items: vec![line("Yoga Mat", 1, 2499)],
        },
    ]
}

/// Products listed by the signed-in visitor.
#[must_use]
pub fn seller_products() -> Vec<SellerProduct> {
    vec![
        SellerProduct {
            id: 1,
            title: "Vintage Camera".to_string(),
            price: Price::from_dollars(150),
            sales: 12,
            image_url: "https://images.unsplash.com/photo-1612198188060-c7c2a3b66eae?w=400&h=300&fit=crop"
                .to_string(),
        },
        SellerProduct {
            id: 2,
            title: "Leather Watch".to_string(),
            price: Price::from_cents(8999),
            sales: 8,
            image_url: "https://images.unsplash.com/photo-1523170335684-f42b4a3b0d38?w=400&h=300&fit=crop"
                .to_string(),
        },
    ]
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let catalog = catalog();
        let ids: HashSet<_> = catalog.products().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), catalog.products().len());
    }

    #[test]
    fn test_every_product_has_a_known_category() {
        let catalog = catalog();
        for product in catalog.products() {
            assert!(
                catalog.category(product.category_id).is_some(),
                "{} has no category",
                product.title
            );
        }
    }

    #[test]
    fn test_prices_fit_the_default_price_filter() {
        let catalog = catalog();
        let everything = catalog.query(&shophub_core::ProductQuery::default());
        assert_eq!(everything.len(), catalog.products().len());
    }

    #[test]
    fn test_sample_orders_are_newest_first() {
        let orders = sample_orders();
        assert!(orders.windows(2).all(|w| w[0].date >= w[1].date));
    }
}
