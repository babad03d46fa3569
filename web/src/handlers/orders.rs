//! Order handlers.
//!
//! `place_order` is the HTTP face of the ledger transaction; everything
//! else is reads scoped to the authenticated caller.

use crate::error::AppError;
use crate::extractors::BearerToken;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stitch_core::model::{OrderId, OrderWithItems, ProductId};
use stitch_core::providers::{
    Authenticator, CartStore, CatalogStore, LineItem, NewOrder, OrderLedger, StatsProvider,
    UserDirectory,
};
use stitch_core::CommerceError;
use uuid::Uuid;

/// One line item in a placement request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LineItemDto {
    /// Product to purchase.
    pub product_id: Uuid,

    /// Units to purchase.
    pub quantity: i32,

    /// Client's idea of the unit price. Accepted for interface
    /// compatibility; the ledger snapshots prices server-side and this
    /// value never influences what is stored.
    pub price: Option<Decimal>,
}

/// Request to place an order.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Line items in purchase order.
    pub items: Vec<LineItemDto>,

    /// Client-computed total, verified server-side.
    pub total_amount: Decimal,

    /// Free-text shipping address.
    pub shipping_address: String,

    /// Payment method tag (`card`, `paypal`, `cash-on-delivery`).
    pub payment_method: String,

    /// Client-generated token making retries safe. Optional.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Response after placing an order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    /// Confirmation message.
    pub message: String,

    /// The created (or replayed) order's id.
    pub order_id: OrderId,
}

/// Place an order.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/orders
/// Authorization: Bearer <token>
///
/// {
///   "items": [{ "product_id": "uuid", "quantity": 2 }],
///   "totalAmount": "20.00",
///   "shippingAddress": "123 Main St",
///   "paymentMethod": "card",
///   "idempotencyKey": "optional-client-token"
/// }
/// ```
///
/// # Response
///
/// `201` with the new order id, or `200` when the idempotency key matches a
/// previously committed order. Insufficient stock answers `409`; a total
/// that disagrees with the server's computation answers `400`.
pub async fn place_order<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    let identity = state.require_user(&bearer).await?;

    let order = NewOrder {
        items: request
            .items
            .iter()
            .map(|i| LineItem {
                product_id: ProductId(i.product_id),
                quantity: i.quantity,
            })
            .collect(),
        total_amount: request.total_amount,
        shipping_address: request.shipping_address,
        payment_method: request.payment_method,
        idempotency_key: request.idempotency_key,
    };

    let placed = state
        .ledger
        .place_order(identity.user_id, &order, &state.pricing)
        .await
        .inspect_err(|e| {
            if matches!(e, CommerceError::InsufficientStock { .. }) {
                metrics::counter!("stitch_orders_out_of_stock_total").increment(1);
            }
        })?;

    metrics::counter!("stitch_orders_placed_total").increment(1);

    let status = if placed.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(PlaceOrderResponse {
            message: "Order created successfully".to_string(),
            order_id: placed.order_id,
        }),
    ))
}

/// The caller's orders, newest first, with nested items.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/orders
/// Authorization: Bearer <token>
/// ```
pub async fn list_orders<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
) -> Result<Json<Vec<OrderWithItems>>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    let identity = state.require_user(&bearer).await?;
    Ok(Json(state.ledger.list_for_user(identity.user_id).await?))
}

/// One of the caller's orders; 404 when it exists but belongs to someone
/// else.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/orders/:id
/// Authorization: Bearer <token>
/// ```
pub async fn get_order<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderWithItems>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    let identity = state.require_user(&bearer).await?;
    Ok(Json(
        state
            .ledger
            .get_for_user(identity.user_id, OrderId(id))
            .await?,
    ))
}
