//! Public category browsing handlers.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use stitch_core::model::Category;
use stitch_core::providers::{
    Authenticator, CartStore, CatalogStore, OrderLedger, StatsProvider, UserDirectory,
};

/// List all categories, ordered by name.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/categories
/// ```
pub async fn list_categories<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
) -> Result<Json<Vec<Category>>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    Ok(Json(state.catalog.list_categories().await?))
}
