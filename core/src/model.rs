//! Domain model for the storefront.
//!
//! Identifiers are UUID newtypes; money is [`Decimal`] throughout. Types that
//! come straight out of a database row derive [`sqlx::FromRow`] so the
//! Postgres stores can map queries without a macro-generated record type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct UserId(pub uuid::Uuid);

impl UserId {
    /// Generate a new random `UserId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct ProductId(pub uuid::Uuid);

impl ProductId {
    /// Generate a new random `ProductId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct CategoryId(pub uuid::Uuid);

impl CategoryId {
    /// Generate a new random `CategoryId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct OrderId(pub uuid::Uuid);

impl OrderId {
    /// Generate a new random `OrderId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Enumerations
// ═══════════════════════════════════════════════════════════════════════

/// User role.
///
/// Stored as lowercase text; `admin` unlocks the back-office routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer.
    Regular,
    /// Back-office administrator.
    Admin,
}

impl Role {
    /// Role name as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Admin => "admin",
        }
    }

    /// Parse a role from its stored name.
    ///
    /// # Errors
    ///
    /// Returns the offending string if it names no known role.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// Order lifecycle status.
///
/// `Pending` is the sole legal initial state. Transitions are admin-only
/// and unconstrained: any status is reachable from any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Freshly placed, awaiting confirmation.
    Pending,
    /// Confirmed by the back office.
    Confirmed,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled.
    Cancelled,
}

impl OrderStatus {
    /// Status name as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status from its stored name.
    ///
    /// # Errors
    ///
    /// Returns the offending string if it names no known status.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown order status: {s}")),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════════

/// Product row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Long description.
    pub description: Option<String>,

    /// Current selling price.
    pub price: Decimal,

    /// Pre-discount price, kept only for strike-through display.
    pub original_price: Option<Decimal>,

    /// Owning category, if any.
    pub category_id: Option<CategoryId>,

    /// Free-text size attribute.
    pub size: Option<String>,

    /// Free-text color attribute.
    pub color: Option<String>,

    /// Free-text brand attribute.
    pub brand: Option<String>,

    /// Opaque blob-store reference for the product image.
    pub image: Option<String>,

    /// Units on hand. Never negative; the ledger's guarded decrement is the
    /// only concurrent writer.
    pub stock_quantity: i32,

    /// Featured on the storefront landing page.
    pub is_featured: bool,

    /// Row created timestamp.
    pub created_at: DateTime<Utc>,

    /// Row updated timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Product joined with its category name, as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductView {
    /// The product row.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub product: Product,

    /// Name of the owning category, if any.
    pub category_name: Option<String>,
}

/// Category row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,

    /// Display name.
    pub name: String,

    /// Long description.
    pub description: Option<String>,

    /// Opaque blob-store reference for the category image.
    pub image: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Cart
// ═══════════════════════════════════════════════════════════════════════

/// One cart line joined with product details, as served to clients.
///
/// Cart lines are keyed by `(user, product)`; the user is implicit in every
/// cart operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartLineView {
    /// Referenced product.
    pub product_id: ProductId,

    /// Units in the cart. Always positive.
    pub quantity: i32,

    /// Product name.
    pub name: String,

    /// Current product price (not a snapshot).
    pub price: Decimal,

    /// Product image reference.
    pub image: Option<String>,

    /// Units the catalog currently has on hand.
    pub stock_quantity: i32,

    /// Product brand.
    pub brand: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Orders
// ═══════════════════════════════════════════════════════════════════════

/// Order row. Immutable after creation except for `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    /// Order ID.
    pub id: OrderId,

    /// Owning user.
    pub user_id: UserId,

    /// Server-computed total (items + shipping/tax policy).
    pub total_amount: Decimal,

    /// Lifecycle status.
    pub status: OrderStatus,

    /// Free-text, denormalized shipping address.
    pub shipping_address: String,

    /// Free-text payment method tag.
    pub payment_method: String,

    /// Client-supplied idempotency key, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,

    /// Placement timestamp.
    pub created_at: DateTime<Utc>,
}

/// Order item joined with product details.
///
/// `price` is the snapshot captured at placement time; it never changes,
/// even when the product is repriced or deleted (hence the optional joined
/// fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItemView {
    /// Referenced product.
    pub product_id: ProductId,

    /// Units ordered.
    pub quantity: i32,

    /// Price snapshot at order time.
    pub price: Decimal,

    /// Product name, when the product still exists.
    pub name: Option<String>,

    /// Product image reference, when the product still exists.
    pub image: Option<String>,
}

/// An order together with its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    /// The order row.
    #[serde(flatten)]
    pub order: Order,

    /// The order's items.
    pub items: Vec<OrderItemView>,
}

/// Order joined with buyer identity, for the back office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdminOrderSummary {
    /// The order row.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub order: Order,

    /// Buyer display name.
    pub user_name: String,

    /// Buyer email.
    pub user_email: String,
}

/// Full back-office view of one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminOrderDetails {
    /// Order plus buyer name/email.
    #[serde(flatten)]
    pub summary: AdminOrderSummary,

    /// Buyer phone, if on file.
    pub user_phone: Option<String>,

    /// The order's items.
    pub items: Vec<OrderItemView>,
}

// ═══════════════════════════════════════════════════════════════════════
// Users
// ═══════════════════════════════════════════════════════════════════════

/// User as listed in the back office. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    /// User ID.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Email address (unique).
    pub email: String,

    /// Phone number, if on file.
    pub phone: Option<String>,

    /// Role.
    pub role: Role,

    /// Account created timestamp.
    pub created_at: DateTime<Utc>,
}

/// The authenticated caller, as resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Authenticated user.
    pub user_id: UserId,

    /// Role at authentication time.
    pub role: Role,
}

impl Identity {
    /// Whether this identity may use the admin routes.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Dashboard
// ═══════════════════════════════════════════════════════════════════════

/// Back-office dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Registered users.
    pub total_users: i64,

    /// Products in the catalog.
    pub total_products: i64,

    /// Orders ever placed.
    pub total_orders: i64,

    /// Revenue summed over delivered orders.
    pub total_revenue: Decimal,

    /// Ten most recent orders, newest first.
    pub recent_orders: Vec<AdminOrderSummary>,

    /// Ten products with the least stock on hand.
    pub low_stock_products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation() {
        let id1 = ProductId::new();
        let id2 = ProductId::new();

        // IDs should be unique
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("admin"), Ok(Role::Admin));
        assert_eq!(Role::parse("REGULAR"), Ok(Role::Regular));
        assert!(Role::parse("superuser").is_err());
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_order_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Ok(status));
        }
        assert!(OrderStatus::parse("refunded").is_err());
    }

    #[test]
    fn test_identity_admin_check() {
        let admin = Identity {
            user_id: UserId::new(),
            role: Role::Admin,
        };
        let customer = Identity {
            user_id: UserId::new(),
            role: Role::Regular,
        };

        assert!(admin.is_admin());
        assert!(!customer.is_admin());
    }
}
