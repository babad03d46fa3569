//! Mock providers for testing.
//!
//! In-memory implementations of every provider trait, deterministic and
//! lock-based. The catalog, cart and ledger mocks share product and cart
//! maps so that an order placed through [`MockOrderLedger`] is visible to
//! [`MockCartStore::list_for_user`] afterwards, mirroring how the Postgres
//! stores share one database.
//!
//! ```
//! use stitch_core::mocks::{MockCartStore, MockCatalogStore, MockOrderLedger, MockUserDirectory};
//!
//! let catalog = MockCatalogStore::new();
//! let cart = MockCartStore::with_catalog(&catalog);
//! let users = MockUserDirectory::new();
//! let ledger = MockOrderLedger::new(&catalog, &cart, &users);
//! ```

mod authenticator;
mod cart;
mod catalog;
mod ledger;
mod stats;
mod users;

pub use authenticator::MockAuthenticator;
pub use cart::MockCartStore;
pub use catalog::MockCatalogStore;
pub use ledger::MockOrderLedger;
pub use stats::MockStatsProvider;
pub use users::MockUserDirectory;

use crate::error::CommerceError;

/// Map a poisoned mock lock to the database-error variant.
fn poisoned() -> CommerceError {
    CommerceError::Database("mock lock poisoned".to_string())
}
