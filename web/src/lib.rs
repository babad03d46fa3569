//! Axum HTTP layer for the Stitch storefront.
//!
//! This crate turns the provider traits from `stitch-core` into a REST API.
//! Handlers are thin: they extract, authenticate via the
//! [`Authenticator`](stitch_core::providers::Authenticator) provider, call
//! one provider method and map the result. Every status-code decision
//! lives in [`error::AppError`].
//!
//! # Request Flow
//!
//! 1. **HTTP request** arrives at an Axum handler
//! 2. **Extract** the bearer token and JSON/query data
//! 3. **Authenticate** through the state's `require_user`/`require_admin`
//! 4. **Call** the provider (catalog, cart, ledger, ...)
//! 5. **Map** domain errors to HTTP via `AppError`
//!
//! # Example
//!
//! ```ignore
//! use stitch_web::{app, AppState};
//!
//! let state = AppState::new(auth, catalog, cart, ledger, users, stats, policy);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app(state)).await?;
//! ```

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::BearerToken;
pub use router::{api_router, app};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
