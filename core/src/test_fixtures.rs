//! Shared fixtures for tests across the workspace.

use crate::model::{Product, ProductId, Role, UserId, UserSummary};
use chrono::Utc;
use rust_decimal::Decimal;

/// A product with sensible defaults: price 10.00, stock 5, no category.
#[must_use]
pub fn product_named(name: &str) -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::new(),
        name: name.to_string(),
        description: None,
        price: Decimal::new(1000, 2),
        original_price: None,
        category_id: None,
        size: None,
        color: None,
        brand: None,
        image: None,
        stock_quantity: 5,
        is_featured: false,
        created_at: now,
        updated_at: now,
    }
}

/// A regular user with a derived email.
#[must_use]
pub fn user_named(name: &str) -> UserSummary {
    UserSummary {
        id: UserId::new(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: None,
        role: Role::Regular,
        created_at: Utc::now(),
    }
}
