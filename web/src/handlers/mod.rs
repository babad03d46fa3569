//! HTTP handlers for the storefront API.
//!
//! Handlers are generic over the provider traits carried by
//! [`AppState`](crate::state::AppState); the router instantiates them once
//! per concrete provider set. Request/response DTOs live next to the
//! handlers that use them.

pub mod admin;
pub mod cart;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;

use serde::Serialize;
use stitch_core::providers::Page;

/// Simple `{ message }` acknowledgement body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Build an acknowledgement.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Pagination block attached to back-office listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Page number, starting at 1.
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total matching rows.
    pub total: i64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl Pagination {
    /// Extract the bookkeeping from a result page.
    #[must_use]
    pub fn of<T>(page: &Page<T>) -> Self {
        Self {
            current_page: page.page,
            total_pages: page.total_pages,
            total: page.total,
            has_next: page.has_next(),
            has_prev: page.has_prev(),
        }
    }
}
