//! Cart store trait.

use crate::error::Result;
use crate::model::{CartLineView, ProductId, UserId};
use std::future::Future;

/// Per-user cart line storage.
///
/// Lines are keyed by `(user, product)`. Quantity-vs-stock is checked at
/// mutation time only; a cart line can go stale when stock moves afterwards,
/// and the order ledger re-checks under its transaction.
pub trait CartStore: Send + Sync {
    /// All cart lines for a user, joined with product details.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn list_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<CartLineView>>> + Send;

    /// Add `quantity` units of a product, incrementing an existing line.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Product not found → `CommerceError::ProductNotFound`
    /// - Quantity non-positive → `CommerceError::Validation`
    /// - Resulting quantity exceeds current stock →
    ///   `CommerceError::InsufficientStock`
    fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Set a line's quantity outright; `0` removes the line.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - No such line → `CommerceError::CartItemNotFound`
    /// - Quantity negative → `CommerceError::Validation`
    /// - Quantity exceeds current stock → `CommerceError::InsufficientStock`
    fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Remove one line.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - No such line → `CommerceError::CartItemNotFound`
    fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Remove every line for a user.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn clear_for_user(&self, user_id: UserId) -> impl Future<Output = Result<()>> + Send;
}
