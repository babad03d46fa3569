//! PostgreSQL provider implementations for the Stitch storefront.
//!
//! Every provider trait from `stitch-core` gets a store struct here that
//! owns a [`PgPool`] handed in at construction time; there is no
//! module-level pool singleton. Queries use the runtime sqlx API with
//! [`FromRow`](sqlx::FromRow) domain types, so the workspace builds without
//! a live `DATABASE_URL`.
//!
//! # Example
//!
//! ```no_run
//! use stitch_postgres::{connect, PostgresOrderLedger, MIGRATOR};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = connect("postgresql://localhost/stitch", 5).await?;
//! MIGRATOR.run(&pool).await?;
//! let ledger = PostgresOrderLedger::new(pool);
//! # Ok(())
//! # }
//! ```

mod auth;
mod cart;
mod catalog;
mod ledger;
mod stats;
mod users;

pub use auth::PostgresAuthenticator;
pub use cart::PostgresCartStore;
pub use catalog::PostgresCatalogStore;
pub use ledger::PostgresOrderLedger;
pub use stats::PostgresStatsProvider;
pub use users::PostgresUserDirectory;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use stitch_core::CommerceError;

/// Embedded migrations for the storefront schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Connect a pool with the given connection cap.
///
/// # Errors
///
/// Returns [`CommerceError::Database`] when the server is unreachable or
/// refuses the connection.
pub async fn connect(database_url: &str, max_connections: u32) -> stitch_core::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| CommerceError::Database(format!("Failed to connect: {e}")))
}

/// Shorthand for the per-query error mapping used across the stores.
fn db_err(context: &str, e: &sqlx::Error) -> CommerceError {
    CommerceError::Database(format!("{context}: {e}"))
}

/// Whether an insert bounced off a unique constraint.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
