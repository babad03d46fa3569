//! Back-office handlers.
//!
//! Every route here demands the admin role on top of a valid bearer token.

use crate::error::AppError;
use crate::extractors::BearerToken;
use crate::handlers::{MessageResponse, Pagination};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use stitch_core::model::{
    AdminOrderDetails, AdminOrderSummary, Category, CategoryId, DashboardStats, OrderId,
    OrderStatus, ProductId, ProductView, Role, UserId, UserSummary,
};
use stitch_core::providers::{
    AdminProductQuery, Authenticator, CartStore, CatalogStore, CategoryPatch, NewCategory,
    NewProduct, OrderFilter, OrderLedger, PageRequest, ProductPatch, StatsProvider, UserDirectory,
    UserQuery,
};
use stitch_core::CommerceError;
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════
// Query / body types
// ═══════════════════════════════════════════════════════════════════════

/// Common paged-listing query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Page number, starting at 1.
    pub page: Option<u32>,

    /// Rows per page.
    pub limit: Option<u32>,

    /// Substring search (users: name/email; products: name/description/
    /// brand).
    pub search: Option<String>,

    /// Products: restrict to a category id.
    pub category: Option<Uuid>,

    /// Orders: restrict to a status.
    pub status: Option<String>,
}

impl ListQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1), self.limit.unwrap_or(10))
    }
}

/// Body for a role change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    /// New role (`regular` | `admin`).
    pub role: String,
}

/// Body for an order status change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status, restricted to the five-value enumeration.
    pub status: String,
}

/// Paged user listing response.
#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    /// Users on this page.
    pub users: Vec<UserSummary>,
    /// Pagination bookkeeping.
    pub pagination: Pagination,
}

/// Paged product listing response.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListResponse {
    /// Products on this page.
    pub products: Vec<ProductView>,
    /// Pagination bookkeeping.
    pub pagination: Pagination,
}

/// Paged order listing response.
#[derive(Debug, Clone, Serialize)]
pub struct OrderListResponse {
    /// Orders on this page.
    pub orders: Vec<AdminOrderSummary>,
    /// Pagination bookkeeping.
    pub pagination: Pagination,
}

/// Category listing response.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListResponse {
    /// All categories.
    pub categories: Vec<Category>,
    /// Confirmation message.
    pub message: String,
}

/// Response wrapping a created or updated product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    /// Confirmation message.
    pub message: String,
    /// The affected product.
    pub product: ProductView,
}

/// Response wrapping a created or updated category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    /// Confirmation message.
    pub message: String,
    /// The affected category.
    pub category: Category,
}

// ═══════════════════════════════════════════════════════════════════════
// Dashboard
// ═══════════════════════════════════════════════════════════════════════

/// Dashboard aggregates.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/admin/dashboard/stats
/// Authorization: Bearer <admin token>
/// ```
pub async fn dashboard_stats<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
) -> Result<Json<DashboardStats>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    Ok(Json(state.stats.dashboard().await?))
}

// ═══════════════════════════════════════════════════════════════════════
// User management
// ═══════════════════════════════════════════════════════════════════════

/// Paged user listing.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/admin/users?page=1&limit=10&search=jane
/// ```
pub async fn list_users<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Query(query): Query<ListQuery>,
) -> Result<Json<UserListResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    let page = state
        .users
        .list_users(&UserQuery {
            page: query.page_request(),
            search: query.search.clone(),
        })
        .await?;
    let pagination = Pagination::of(&page);
    Ok(Json(UserListResponse {
        users: page.items,
        pagination,
    }))
}

/// Change a user's role.
///
/// # Endpoint
///
/// ```text
/// PUT /api/v1/admin/users/:id/role
///
/// { "role": "admin" }
/// ```
pub async fn update_user_role<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<MessageResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    let role = Role::parse(&request.role)
        .map_err(|reason| CommerceError::Validation { reason })?;
    state.users.update_role(UserId(id), role).await?;
    Ok(Json(MessageResponse::new("User role updated successfully")))
}

/// Delete a user.
///
/// # Endpoint
///
/// ```text
/// DELETE /api/v1/admin/users/:id
/// ```
pub async fn delete_user<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    state.users.delete_user(UserId(id)).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

// ═══════════════════════════════════════════════════════════════════════
// Product management
// ═══════════════════════════════════════════════════════════════════════

/// Paged product listing.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/admin/products?page=1&limit=10&search=denim&category=<uuid>
/// ```
pub async fn list_products<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    let page = state
        .catalog
        .list_products_paged(&AdminProductQuery {
            page: query.page_request(),
            search: query.search.clone(),
            category_id: query.category.map(CategoryId),
        })
        .await?;
    let pagination = Pagination::of(&page);
    Ok(Json(ProductListResponse {
        products: page.items,
        pagination,
    }))
}

/// Create a product. The image travels as an opaque blob-store reference.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/admin/products
/// ```
pub async fn create_product<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Json(new): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    let product = state.catalog.create_product(&new).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: "Product created successfully".to_string(),
            product,
        }),
    ))
}

/// Partially update a product.
///
/// # Endpoint
///
/// ```text
/// PUT /api/v1/admin/products/:id
/// ```
pub async fn update_product<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Path(id): Path<Uuid>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<ProductResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    let product = state.catalog.update_product(ProductId(id), &patch).await?;
    Ok(Json(ProductResponse {
        message: "Product updated successfully".to_string(),
        product,
    }))
}

/// Delete a product.
///
/// # Endpoint
///
/// ```text
/// DELETE /api/v1/admin/products/:id
/// ```
pub async fn delete_product<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    state.catalog.delete_product(ProductId(id)).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}

// ═══════════════════════════════════════════════════════════════════════
// Category management
// ═══════════════════════════════════════════════════════════════════════

/// All categories.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/admin/categories
/// ```
pub async fn list_categories<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
) -> Result<Json<CategoryListResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    let categories = state.catalog.list_categories().await?;
    Ok(Json(CategoryListResponse {
        categories,
        message: "Categories fetched successfully".to_string(),
    }))
}

/// Create a category.
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/admin/categories
/// ```
pub async fn create_category<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Json(new): Json<NewCategory>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    let category = state.catalog.create_category(&new).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            message: "Category created successfully".to_string(),
            category,
        }),
    ))
}

/// Partially update a category.
///
/// # Endpoint
///
/// ```text
/// PUT /api/v1/admin/categories/:id
/// ```
pub async fn update_category<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Path(id): Path<Uuid>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<CategoryResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    let category = state
        .catalog
        .update_category(CategoryId(id), &patch)
        .await?;
    Ok(Json(CategoryResponse {
        message: "Category updated successfully".to_string(),
        category,
    }))
}

/// Delete a category; refused with 409 while products reference it.
///
/// # Endpoint
///
/// ```text
/// DELETE /api/v1/admin/categories/:id
/// ```
pub async fn delete_category<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    state.catalog.delete_category(CategoryId(id)).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}

// ═══════════════════════════════════════════════════════════════════════
// Order management
// ═══════════════════════════════════════════════════════════════════════

/// Paged order listing with optional status filter.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/admin/orders?page=1&limit=10&status=pending
/// ```
pub async fn list_orders<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Query(query): Query<ListQuery>,
) -> Result<Json<OrderListResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(OrderStatus::parse(raw).map_err(|_| {
            CommerceError::InvalidStatus {
                status: raw.to_string(),
            }
        })?),
        None => None,
    };

    let page = state
        .ledger
        .list_all(&OrderFilter {
            page: query.page_request(),
            status,
        })
        .await?;
    let pagination = Pagination::of(&page);
    Ok(Json(OrderListResponse {
        orders: page.items,
        pagination,
    }))
}

/// One order with buyer contact details and items.
///
/// # Endpoint
///
/// ```text
/// GET /api/v1/admin/orders/:id
/// ```
pub async fn get_order_details<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminOrderDetails>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    Ok(Json(state.ledger.get_details(OrderId(id)).await?))
}

/// Set an order's status; any transition is allowed.
///
/// # Endpoint
///
/// ```text
/// PUT /api/v1/admin/orders/:id/status
///
/// { "status": "shipped" }
/// ```
pub async fn update_order_status<A, C, K, L, U, S>(
    State(state): State<AppState<A, C, K, L, U, S>>,
    bearer: BearerToken,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<MessageResponse>, AppError>
where
    A: Authenticator + Clone + 'static,
    C: CatalogStore + Clone + 'static,
    K: CartStore + Clone + 'static,
    L: OrderLedger + Clone + 'static,
    U: UserDirectory + Clone + 'static,
    S: StatsProvider + Clone + 'static,
{
    state.require_admin(&bearer).await?;
    let status = OrderStatus::parse(&request.status).map_err(|_| {
        CommerceError::InvalidStatus {
            status: request.status.clone(),
        }
    })?;
    state.ledger.update_status(OrderId(id), status).await?;
    Ok(Json(MessageResponse::new(
        "Order status updated successfully",
    )))
}
