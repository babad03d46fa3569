//! Router composition.
//!
//! Composes all storefront handlers into a single Axum application.

use crate::handlers::{admin, cart, categories, health, orders, products};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use stitch_core::providers::{
    Authenticator, CartStore, CatalogStore, OrderLedger, StatsProvider, UserDirectory,
};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Build the complete application: `/health` plus the versioned API, with
/// tracing, request-id and CORS layers applied.
///
/// # Routes
///
/// ## Storefront
/// - `GET /api/v1/products` - List products (public)
/// - `GET /api/v1/products/:id` - Single product (public)
/// - `GET /api/v1/categories` - List categories (public)
/// - `GET/POST/DELETE /api/v1/cart` - The caller's cart
/// - `PUT/DELETE /api/v1/cart/:product_id` - One cart line
/// - `POST /api/v1/orders` - Place an order
/// - `GET /api/v1/orders` - The caller's orders
/// - `GET /api/v1/orders/:id` - One owned order
///
/// ## Back office (admin role required)
/// - `GET /api/v1/admin/dashboard/stats`
/// - `GET /api/v1/admin/users`, `PUT .../:id/role`, `DELETE .../:id`
/// - `GET/POST /api/v1/admin/products`, `PUT/DELETE .../:id`
/// - `GET/POST /api/v1/admin/categories`, `PUT/DELETE .../:id`
/// - `GET /api/v1/admin/orders`, `GET .../:id`, `PUT .../:id/status`
///
/// # Example
///
/// ```rust,ignore
/// let state = AppState::new(auth, catalog, cart, ledger, users, stats, policy);
/// let app = stitch_web::app(state);
/// axum::serve(listener, app).await?;
/// ```
pub fn app<A, C, K, L, U, S>(state: AppState<A, C, K, L, U, S>) -> Router
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_router(state))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// The versioned API routes, unlayered.
pub fn api_router<A, C, K, L, U, S>(state: AppState<A, C, K, L, U, S>) -> Router
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    Router::new()
        // Storefront
        .route("/products", get(products::list_products::<A, C, K, L, U, S>))
        .route("/products/:id", get(products::get_product::<A, C, K, L, U, S>))
        .route("/categories", get(categories::list_categories::<A, C, K, L, U, S>))

        // Cart
        .route("/cart", get(cart::get_cart::<A, C, K, L, U, S>)
            .post(cart::add_to_cart::<A, C, K, L, U, S>)
            .delete(cart::clear_cart::<A, C, K, L, U, S>))
        .route("/cart/:product_id", put(cart::update_cart_item::<A, C, K, L, U, S>)
            .delete(cart::remove_cart_item::<A, C, K, L, U, S>))

        // Orders
        .route("/orders", post(orders::place_order::<A, C, K, L, U, S>)
            .get(orders::list_orders::<A, C, K, L, U, S>))
        .route("/orders/:id", get(orders::get_order::<A, C, K, L, U, S>))

        // Back office
        .route("/admin/dashboard/stats", get(admin::dashboard_stats::<A, C, K, L, U, S>))
        .route("/admin/users", get(admin::list_users::<A, C, K, L, U, S>))
        .route("/admin/users/:id/role", put(admin::update_user_role::<A, C, K, L, U, S>))
        .route("/admin/users/:id", delete(admin::delete_user::<A, C, K, L, U, S>))
        .route("/admin/products", get(admin::list_products::<A, C, K, L, U, S>)
            .post(admin::create_product::<A, C, K, L, U, S>))
        .route("/admin/products/:id", put(admin::update_product::<A, C, K, L, U, S>)
            .delete(admin::delete_product::<A, C, K, L, U, S>))
        .route("/admin/categories", get(admin::list_categories::<A, C, K, L, U, S>)
            .post(admin::create_category::<A, C, K, L, U, S>))
        .route("/admin/categories/:id", put(admin::update_category::<A, C, K, L, U, S>)
            .delete(admin::delete_category::<A, C, K, L, U, S>))
        .route("/admin/orders", get(admin::list_orders::<A, C, K, L, U, S>))
        .route("/admin/orders/:id", get(admin::get_order_details::<A, C, K, L, U, S>))
        .route("/admin/orders/:id/status", put(admin::update_order_status::<A, C, K, L, U, S>))

        .with_state(state)
}
