//! Cart handlers.
//!
//! All routes are authenticated; the cart is always the caller's own.

use crate::error::AppError;
use crate::extractors::BearerToken;
use crate::handlers::MessageResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use stitch_core::model::{CartLineView, ProductId};
use stitch_core::providers::{
    Authenticator, CartStore, CatalogStore, OrderLedger, StatsProvider, UserDirectory,
};
use uuid::Uuid;

/// Request to add units of a product to the cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    /// Product to add.
    pub product_id: Uuid,

    /// Units to add on top of any existing line.
    pub quantity: i32,
}

/// Request to overwrite a cart line's quantity.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartRequest {
    /// New quantity; `0` removes the line.
    pub quantity: i32,
}

/// The caller's cart, joined with product details.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/cart
/// Authorization: Bearer <token>
/// ```
pub async fn get_cart<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
) -> Result<Json<Vec<CartLineView>>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    let identity = state.require_user(&bearer).await?;
    Ok(Json(state.cart.list_for_user(identity.user_id).await?))
}

/// Add a product to the cart, incrementing an existing line.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/cart
/// Authorization: Bearer <token>
///
/// { "productId": "uuid", "quantity": 2 }
/// ```
pub async fn add_to_cart<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<MessageResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    let identity = state.require_user(&bearer).await?;
    state
        .cart
        .add_item(
            identity.user_id,
            ProductId(request.product_id),
            request.quantity,
        )
        .await?;
    Ok(Json(MessageResponse::new("Product added to cart")))
}

/// Overwrite one cart line's quantity.
///
/// # Endpoint
///
/// ```text
/// PUT /api/v1/cart/:product_id
/// Authorization: Bearer <token>
///
/// { "quantity": 3 }
/// ```
pub async fn update_cart_item<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Path(product_id): Path<Uuid>,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<MessageResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    let identity = state.require_user(&bearer).await?;
    state
        .cart
        .set_quantity(identity.user_id, ProductId(product_id), request.quantity)
        .await?;
    Ok(Json(MessageResponse::new("Cart updated successfully")))
}

/// Remove one cart line.
///
/// # Endpoint
///
/// ```text
/// DELETE /api/v1/cart/:product_id
/// Authorization: Bearer <token>
/// ```
pub async fn remove_cart_item<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Path(product_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    let identity = state.require_user(&bearer).await?;
    state
        .cart
        .remove_item(identity.user_id, ProductId(product_id))
        .await?;
    Ok(Json(MessageResponse::new("Item removed from cart")))
}

/// Clear the caller's cart.
///
/// # Endpoint
///
/// ```text
/// DELETE /api/v1/cart
/// Authorization: Bearer <token>
/// ```
pub async fn clear_cart<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
) -> Result<Json<MessageResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    let identity = state.require_user(&bearer).await?;
    state.cart.clear_for_user(identity.user_id).await?;
    Ok(Json(MessageResponse::new("Cart cleared successfully")))
}
