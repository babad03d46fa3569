//! Application state for Axum handlers.

use crate::error::AppError;
use crate::extractors::BearerToken;
use stitch_core::config::PricingPolicy;
use stitch_core::model::Identity;
use stitch_core::providers::{
    Authenticator, CartStore, CatalogStore, OrderLedger, StatsProvider, UserDirectory,
};
use stitch_core::CommerceError;

/// Application state shared across all HTTP handlers.
///
/// Generic over the provider traits so the same handlers serve the Postgres
/// stores in production and the mocks in tests. Providers are passed in at
/// construction; nothing here reaches for a global.
#[derive(Clone)]
pub struct AppState<A, C, K, L, U, S> {
    /// Bearer-token verification.
    pub authenticator: A,

    /// Products and categories.
    pub catalog: C,

    /// Per-user cart lines.
    pub cart: K,

    /// The order ledger.
    pub ledger: L,

    /// Back-office user management.
    pub users: U,

    /// Dashboard aggregates.
    pub stats: S,

    /// Server-owned shipping/tax policy for order total verification.
    pub pricing: PricingPolicy,
}

impl<A, C, K, L, U, S> AppState<A, C, K, L, U, S>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    /// Bundle the providers and policy into one state value.
    pub const fn new(
        authenticator: A,
        catalog: C,
        cart: K,
        ledger: L,
        users: U,
        stats: S,
        pricing: PricingPolicy,
    ) -> Self {
        Self {
            authenticator,
            catalog,
            cart,
            ledger,
            users,
            stats,
            pricing,
        }
    }

    /// Resolve the bearer token to an authenticated identity.
    ///
    /// # Errors
    ///
    /// Returns a 403 [`AppError`] when the token is unknown or expired.
    pub async fn require_user(&self, bearer: &BearerToken) -> Result<Identity, AppError> {
        Ok(self.authenticator.authenticate(&bearer.0).await?)
    }

    /// Resolve the bearer token and demand the admin role.
    ///
    /// # Errors
    ///
    /// Returns a 403 [`AppError`] when the token is invalid or the caller
    /// is not an admin.
    pub async fn require_admin(&self, bearer: &BearerToken) -> Result<Identity, AppError> {
        let identity = self.require_user(bearer).await?;
        if !identity.is_admin() {
            return Err(CommerceError::AdminRequired.into());
        }
        Ok(identity)
    }
}
