//! Public product browsing handlers.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use stitch_core::model::{ProductId, ProductView};
use stitch_core::providers::{
    Authenticator, CartStore, CatalogStore, OrderLedger, ProductFilter, StatsProvider,
    UserDirectory,
};
use uuid::Uuid;

/// Storefront listing filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    /// Category name; `all` disables the filter.
    pub category: Option<String>,

    /// `"true"` restricts to featured products.
    pub featured: Option<String>,

    /// Substring search over name, description and brand.
    pub search: Option<String>,
}

/// List products with optional filters.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/products?category=Shoes&featured=true&search=denim
/// ```
pub async fn list_products<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductView>>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    let filter = ProductFilter {
        category: query.category,
        featured: query.featured.as_deref() == Some("true"),
        search: query.search,
    };
    Ok(Json(state.catalog.list_products(&filter).await?))
}

/// Fetch a single product.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/products/:id
/// ```
pub async fn get_product<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductView>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    Ok(Json(state.catalog.get_product(ProductId(id)).await?))
}
