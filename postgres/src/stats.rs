//! PostgreSQL dashboard statistics.

use crate::db_err;
use rust_decimal::Decimal;
use sqlx::PgPool;
use stitch_core::error::Result;
use stitch_core::model::{AdminOrderSummary, DashboardStats, Product};
use stitch_core::providers::StatsProvider;

/// Stock level below which a product shows up on the dashboard.
const LOW_STOCK_THRESHOLD: i32 = 10;

/// PostgreSQL dashboard statistics provider.
#[derive(Clone)]
pub struct PostgresStatsProvider {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresStatsProvider {
    /// Create a new PostgreSQL statistics provider.
    ///
    /// # Arguments
    ///
    /// * `pool` - PostgreSQL connection pool
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> Result<i64> {
        sqlx::query_scalar(sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count rows", &e))
    }
}

impl StatsProvider for PostgresStatsProvider {
    async fn dashboard(&self) -> Result<DashboardStats> {
        let total_users = self.count("SELECT COUNT(*) FROM users").await?;
        let total_products = self.count("SELECT COUNT(*) FROM products").await?;
        let total_orders = self.count("SELECT COUNT(*) FROM orders").await?;

        let total_revenue: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE status = 'delivered'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to sum revenue", &e))?;

        let recent_orders: Vec<AdminOrderSummary> = sqlx::query_as(
            r"
            SELECT o.id, o.user_id, o.total_amount, o.status, o.shipping_address,
                   o.payment_method, o.idempotency_key, o.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM orders o
            JOIN users u ON o.user_id = u.id
            ORDER BY o.created_at DESC
            LIMIT 10
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to fetch recent orders", &e))?;

        let low_stock_products: Vec<Product> = sqlx::query_as(
            r"
            SELECT id, name, description, price, original_price, category_id,
                   size, color, brand, image, stock_quantity, is_featured,
                   created_at, updated_at
            FROM products
            WHERE stock_quantity < $1
            ORDER BY stock_quantity ASC
            LIMIT 10
            ",
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to fetch low-stock products", &e))?;

        Ok(DashboardStats {
            total_users,
            total_products,
            total_orders,
            total_revenue,
            recent_orders,
            low_stock_products,
        })
    }
}
