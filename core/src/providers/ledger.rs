//! Order ledger trait.

use crate::config::PricingPolicy;
use crate::error::Result;
use crate::model::{
    AdminOrderDetails, AdminOrderSummary, OrderId, OrderStatus, OrderWithItems, UserId,
};
use crate::providers::{NewOrder, OrderFilter, Page, PlacedOrder};
use std::future::Future;

/// The transactional component that converts line items into an immutable
/// order record.
///
/// [`place_order`](OrderLedger::place_order) is the only multi-step write in
/// the system. Its four effects (order row, item rows with price snapshots,
/// guarded stock decrements, scoped cart clear) commit together or not at
/// all.
pub trait OrderLedger: Send + Sync {
    /// Place an order atomically.
    ///
    /// Stock is decremented with a sufficiency guard, so it can never go
    /// negative regardless of concurrent placements; totals are recomputed
    /// server-side from price snapshots plus `policy`; a repeated
    /// idempotency key returns the previously committed order instead of
    /// creating a second one.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Request shape invalid → `CommerceError::Validation`
    /// - Referenced product missing → `CommerceError::ProductNotFound`
    /// - Submitted total deviates beyond tolerance →
    ///   `CommerceError::TotalMismatch`
    /// - Stock insufficient for any item →
    ///   `CommerceError::InsufficientStock`
    /// - Database unavailable → `CommerceError::Database`
    ///
    /// In every error case, no partial order is visible afterwards.
    fn place_order(
        &self,
        user_id: UserId,
        order: &NewOrder,
        policy: &PricingPolicy,
    ) -> impl Future<Output = Result<PlacedOrder>> + Send;

    /// The caller's orders with nested items, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn list_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<OrderWithItems>>> + Send;

    /// One order with items, visible only to its owner.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Order absent *or owned by someone else* →
    ///   `CommerceError::OrderNotFound`
    fn get_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> impl Future<Output = Result<OrderWithItems>> + Send;

    /// Back-office paged order listing with optional status filter.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn list_all(
        &self,
        filter: &OrderFilter,
    ) -> impl Future<Output = Result<Page<AdminOrderSummary>>> + Send;

    /// Back-office view of one order with buyer contact details.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Order not found → `CommerceError::OrderNotFound`
    fn get_details(
        &self,
        order_id: OrderId,
    ) -> impl Future<Output = Result<AdminOrderDetails>> + Send;

    /// Set an order's status. Any status is reachable from any status;
    /// there is no state-machine guard.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Order not found → `CommerceError::OrderNotFound`
    fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> impl Future<Output = Result<()>> + Send;
}
