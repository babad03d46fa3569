//! Error types for storefront operations.

use crate::model::{CategoryId, OrderId, ProductId, UserId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for storefront operations.
pub type Result<T> = std::result::Result<T, CommerceError>;

/// Error taxonomy for the storefront.
///
/// Variants are grouped by the HTTP class they eventually map to; the web
/// layer owns the actual status codes.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommerceError {
    // ═══════════════════════════════════════════════════════════
    // Not Found
    // ═══════════════════════════════════════════════════════════

    /// Referenced product does not exist.
    #[error("Product {product_id} not found")]
    ProductNotFound {
        /// Missing product.
        product_id: ProductId,
    },

    /// Referenced category does not exist.
    #[error("Category {category_id} not found")]
    CategoryNotFound {
        /// Missing category.
        category_id: CategoryId,
    },

    /// Referenced order does not exist or is not visible to the caller.
    #[error("Order {order_id} not found")]
    OrderNotFound {
        /// Missing order.
        order_id: OrderId,
    },

    /// Referenced user does not exist.
    #[error("User {user_id} not found")]
    UserNotFound {
        /// Missing user.
        user_id: UserId,
    },

    /// No cart line for this product.
    #[error("Product {product_id} is not in the cart")]
    CartItemNotFound {
        /// Product without a cart line.
        product_id: ProductId,
    },

    // ═══════════════════════════════════════════════════════════
    // Authentication / Authorization
    // ═══════════════════════════════════════════════════════════

    /// No bearer token on the request.
    #[error("Access token required")]
    MissingToken,

    /// Bearer token unknown or expired.
    #[error("Invalid token")]
    InvalidToken,

    /// Caller authenticated but lacks the admin role.
    #[error("Admin access required")]
    AdminRequired,

    // ═══════════════════════════════════════════════════════════
    // Validation
    // ═══════════════════════════════════════════════════════════

    /// Request shape is invalid (empty items, non-positive quantity, blank
    /// address, ...).
    #[error("Invalid request: {reason}")]
    Validation {
        /// What was wrong.
        reason: String,
    },

    /// Submitted order status is outside the five-value enumeration.
    #[error("Invalid status: {status}")]
    InvalidStatus {
        /// The rejected status string.
        status: String,
    },

    /// Client-submitted total deviates from the server-computed one beyond
    /// the configured tolerance.
    #[error("Submitted total {submitted} does not match computed total {computed}")]
    TotalMismatch {
        /// Total the client sent.
        submitted: Decimal,
        /// Total the server computed from price snapshots and policy.
        computed: Decimal,
    },

    // ═══════════════════════════════════════════════════════════
    // Conflict
    // ═══════════════════════════════════════════════════════════

    /// Guarded stock decrement found fewer units than requested.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Contended product.
        product_id: ProductId,
        /// Units the order asked for.
        requested: i32,
        /// Units actually on hand.
        available: i32,
    },

    /// Category still referenced by at least one product.
    #[error("Cannot delete category {category_id} with existing products")]
    CategoryInUse {
        /// The referenced category.
        category_id: CategoryId,
    },

    /// Email address already registered.
    #[error("Email already exists")]
    DuplicateEmail,

    // ═══════════════════════════════════════════════════════════
    // System
    // ═══════════════════════════════════════════════════════════

    /// Database operation failed. The string is for logs only and must not
    /// reach clients verbatim.
    #[error("Database error: {0}")]
    Database(String),
}

impl CommerceError {
    /// Returns `true` if this error is due to invalid caller input.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stitch_core::CommerceError;
    /// assert!(CommerceError::Validation { reason: "empty items".into() }.is_user_error());
    /// assert!(!CommerceError::Database("down".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidStatus { .. }
                | Self::TotalMismatch { .. }
                | Self::MissingToken
                | Self::InvalidToken
                | Self::AdminRequired
        )
    }

    /// Returns `true` if this error is a concurrent-state conflict a client
    /// may resolve by adjusting and resubmitting.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::InsufficientStock { .. } | Self::CategoryInUse { .. } | Self::DuplicateEmail
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let conflict = CommerceError::InsufficientStock {
            product_id: ProductId::new(),
            requested: 3,
            available: 2,
        };
        assert!(conflict.is_conflict());
        assert!(!conflict.is_user_error());

        assert!(CommerceError::InvalidToken.is_user_error());
        assert!(!CommerceError::Database("boom".into()).is_conflict());
    }

    #[test]
    fn test_display_carries_context() {
        let id = ProductId::new();
        let err = CommerceError::ProductNotFound { product_id: id };
        assert!(err.to_string().contains(&id.to_string()));
    }
}
