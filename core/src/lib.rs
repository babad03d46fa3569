//! # Stitch Core
//!
//! Domain model, error taxonomy and provider traits for the Stitch
//! storefront.
//!
//! The crate is free of I/O: it defines *what* the storefront does
//! (entities, invariants, the provider seams) while `stitch-postgres`
//! defines *how* it is stored and `stitch-web` how it is served.
//!
//! ## Architecture
//!
//! ```text
//! stitch-web ──── handlers depend on ────┐
//!                                        ▼
//!                              provider traits (this crate)
//!                                        ▲
//! stitch-postgres ── stores implement ───┘
//! ```
//!
//! The one component with real design weight is the
//! [`OrderLedger`](providers::OrderLedger): the only multi-step write in
//! the system, with a guarded stock decrement, server-side total
//! verification and idempotent replay.

pub mod config;
pub mod error;
pub mod model;
pub mod providers;

#[cfg(feature = "test-utils")]
pub mod mocks;
#[cfg(feature = "test-utils")]
pub mod test_fixtures;

// Re-export main types for convenience
pub use config::PricingPolicy;
pub use error::{CommerceError, Result};
pub use model::{
    CategoryId, Identity, OrderId, OrderStatus, ProductId, Role, UserId,
};
