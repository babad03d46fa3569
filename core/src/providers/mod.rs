//! Storefront providers.
//!
//! This module defines traits for every capability the HTTP layer depends
//! on. Providers are **interfaces**, not implementations: the web handlers
//! depend on these traits, the `stitch-postgres` crate supplies the real
//! implementations, and [`crate::mocks`] supplies in-memory ones.
//!
//! This enables:
//! - **Testing**: handlers run against mocks at memory speed
//! - **Production**: the binary wires in the Postgres stores
//! - **Dependency injection**: every store receives its pool explicitly;
//!   there is no process-wide singleton

use crate::model::{CategoryId, OrderStatus, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod authenticator;
pub mod cart;
pub mod catalog;
pub mod ledger;
pub mod stats;
pub mod users;

// Re-export provider traits
pub use authenticator::Authenticator;
pub use cart::CartStore;
pub use catalog::CatalogStore;
pub use ledger::OrderLedger;
pub use stats::StatsProvider;
pub use users::UserDirectory;

// ═══════════════════════════════════════════════════════════════════════
// Pagination
// ═══════════════════════════════════════════════════════════════════════

/// Smallest allowed page size.
const MIN_PAGE_LIMIT: u32 = 1;
/// Largest allowed page size.
const MAX_PAGE_LIMIT: u32 = 100;

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,

    /// Rows per page.
    pub limit: u32,
}

impl PageRequest {
    /// Create a page request, clamping the page to at least 1 and the limit
    /// into `1..=100`.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(MIN_PAGE_LIMIT, MAX_PAGE_LIMIT),
        }
    }

    /// Row offset for this page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        ((self.page - 1) as i64) * (self.limit as i64)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// One page of results plus pagination bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows on this page.
    pub items: Vec<T>,

    /// Total matching rows across all pages.
    pub total: i64,

    /// Page number, starting at 1.
    pub page: u32,

    /// Total number of pages.
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Assemble a page from a query result and the request it answered.
    #[must_use]
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        let total_pages =
            u32::try_from((total.max(0) as u64).div_ceil(u64::from(request.limit))).unwrap_or(u32::MAX);
        Self {
            items,
            total,
            page: request.page,
            total_pages,
        }
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Catalog queries
// ═══════════════════════════════════════════════════════════════════════

/// Storefront product listing filters. All filters compose with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Restrict to a category by *name*; `all` (or absence) matches every
    /// category.
    pub category: Option<String>,

    /// Restrict to featured products.
    pub featured: bool,

    /// Case-insensitive substring match over name, description and brand.
    pub search: Option<String>,
}

/// Back-office product listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProductQuery {
    /// Page to fetch.
    #[serde(default)]
    pub page: PageRequest,

    /// Case-insensitive substring match over name, description and brand.
    pub search: Option<String>,

    /// Restrict to a category by id.
    pub category_id: Option<CategoryId>,
}

/// Fields for a new product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: Option<String>,
    /// Selling price.
    pub price: Decimal,
    /// Pre-discount price for strike-through display.
    pub original_price: Option<Decimal>,
    /// Owning category.
    pub category_id: Option<CategoryId>,
    /// Free-text size attribute.
    pub size: Option<String>,
    /// Free-text color attribute.
    pub color: Option<String>,
    /// Free-text brand attribute.
    pub brand: Option<String>,
    /// Opaque blob-store image reference.
    pub image: Option<String>,
    /// Initial units on hand.
    pub stock_quantity: i32,
    /// Featured on the landing page.
    pub is_featured: bool,
}

/// Partial product update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New selling price.
    pub price: Option<Decimal>,
    /// New pre-discount price.
    pub original_price: Option<Decimal>,
    /// New owning category.
    pub category_id: Option<CategoryId>,
    /// New size attribute.
    pub size: Option<String>,
    /// New color attribute.
    pub color: Option<String>,
    /// New brand attribute.
    pub brand: Option<String>,
    /// New image reference.
    pub image: Option<String>,
    /// New stock count (admin restock/correction; not the ledger path).
    pub stock_quantity: Option<i32>,
    /// New featured flag.
    pub is_featured: Option<bool>,
}

/// Fields for a new category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: Option<String>,
    /// Opaque blob-store image reference.
    pub image: Option<String>,
}

/// Partial category update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPatch {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New image reference.
    pub image: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Order placement
// ═══════════════════════════════════════════════════════════════════════

/// A (product, quantity) pair submitted for purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product to purchase.
    pub product_id: ProductId,

    /// Units to purchase. Must be positive.
    pub quantity: i32,
}

/// Everything the ledger needs to place an order, minus the (separately
/// authenticated) user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Line items in client-submitted order.
    pub items: Vec<LineItem>,

    /// Client-computed total; verified against the server-side computation,
    /// never stored as-is.
    pub total_amount: Decimal,

    /// Free-text shipping address.
    pub shipping_address: String,

    /// Free-text payment method tag (`card`, `paypal`,
    /// `cash-on-delivery`, ...). Presence-validated only.
    pub payment_method: String,

    /// Client-generated token making retried submissions safe. Optional.
    pub idempotency_key: Option<String>,
}

impl NewOrder {
    /// Validate request shape before any I/O.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Validation`](crate::CommerceError::Validation)
    /// when the item list is empty, any quantity is non-positive, or the
    /// address or payment method is blank.
    pub fn validate(&self) -> crate::Result<()> {
        if self.items.is_empty() {
            return Err(crate::CommerceError::Validation {
                reason: "order must contain at least one item".into(),
            });
        }
        if let Some(item) = self.items.iter().find(|i| i.quantity <= 0) {
            return Err(crate::CommerceError::Validation {
                reason: format!(
                    "quantity for product {} must be positive",
                    item.product_id
                ),
            });
        }
        if self.shipping_address.trim().is_empty() {
            return Err(crate::CommerceError::Validation {
                reason: "shipping address is required".into(),
            });
        }
        if self.payment_method.trim().is_empty() {
            return Err(crate::CommerceError::Validation {
                reason: "payment method is required".into(),
            });
        }
        Ok(())
    }
}

/// Outcome of a successful (or replayed) order placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedOrder {
    /// The order's id.
    pub order_id: crate::model::OrderId,

    /// Server-computed total that was stored.
    pub total_amount: Decimal,

    /// `true` when an idempotency key matched a previously committed order
    /// and no new order was created.
    pub replayed: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// Back-office queries
// ═══════════════════════════════════════════════════════════════════════

/// Back-office order listing query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    /// Page to fetch.
    #[serde(default)]
    pub page: PageRequest,

    /// Restrict to one status.
    pub status: Option<OrderStatus>,
}

/// Back-office user listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    /// Page to fetch.
    #[serde(default)]
    pub page: PageRequest,

    /// Case-insensitive substring match over name and email.
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 1);

        let req = PageRequest::new(3, 500);
        assert_eq!(req.limit, 100);
        assert_eq!(req.offset(), 200);
    }

    #[test]
    fn test_page_bookkeeping() {
        let page = Page::new(vec![1, 2, 3], 25, PageRequest::new(2, 10));
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(page.has_prev());

        let last = Page::new(vec![5], 25, PageRequest::new(3, 10));
        assert!(!last.has_next());
    }

    #[test]
    fn test_new_order_validation() {
        let valid = NewOrder {
            items: vec![LineItem {
                product_id: ProductId::new(),
                quantity: 2,
            }],
            total_amount: Decimal::new(2000, 2),
            shipping_address: "123 Main St".into(),
            payment_method: "card".into(),
            idempotency_key: None,
        };
        assert!(valid.validate().is_ok());

        let empty = NewOrder {
            items: vec![],
            ..valid.clone()
        };
        assert!(empty.validate().is_err());

        let zero_qty = NewOrder {
            items: vec![LineItem {
                product_id: ProductId::new(),
                quantity: 0,
            }],
            ..valid.clone()
        };
        assert!(zero_qty.validate().is_err());

        let blank_address = NewOrder {
            shipping_address: "   ".into(),
            ..valid.clone()
        };
        assert!(blank_address.validate().is_err());

        let blank_method = NewOrder {
            payment_method: String::new(),
            ..valid
        };
        assert!(blank_method.validate().is_err());
    }
}
