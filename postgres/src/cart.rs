//! PostgreSQL cart store.

use crate::db_err;
use sqlx::PgPool;
use stitch_core::error::{CommerceError, Result};
use stitch_core::model::{CartLineView, ProductId, UserId};
use stitch_core::providers::CartStore;

/// PostgreSQL cart store.
///
/// Quantity-vs-stock is checked at mutation time only; the ledger re-checks
/// under row locks when the cart is actually ordered.
#[derive(Clone)]
pub struct PostgresCartStore {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresCartStore {
    /// Create a new PostgreSQL cart store.
    ///
    /// # Arguments
    ///
    /// * `pool` - PostgreSQL connection pool
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn stock_of(&self, product_id: ProductId) -> Result<i32> {
        sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = $1")
            .bind(product_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to check stock", &e))?
            .ok_or(CommerceError::ProductNotFound { product_id })
    }
}

impl CartStore for PostgresCartStore {
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<CartLineView>> {
        sqlx::query_as(
            r"
            SELECT c.product_id, c.quantity, p.name, p.price, p.image,
                   p.stock_quantity, p.brand
            FROM cart_items c
            JOIN products p ON c.product_id = p.id
            WHERE c.user_id = $1
            ORDER BY c.added_at DESC
            ",
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list cart", &e))
    }

    async fn add_item(&self, user_id: UserId, product_id: ProductId, quantity: i32) -> Result<()> {
        if quantity <= 0 {
            return Err(CommerceError::Validation {
                reason: "quantity must be positive".to_string(),
            });
        }

        let stock = self.stock_of(product_id).await?;
        let current: Option<i32> = sqlx::query_scalar(
            "SELECT quantity FROM cart_items WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user_id.0)
        .bind(product_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to read cart line", &e))?;

        let requested = current.unwrap_or(0) + quantity;
        if requested > stock {
            return Err(CommerceError::InsufficientStock {
                product_id,
                requested,
                available: stock,
            });
        }

        sqlx::query(
            r"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            ",
        )
        .bind(user_id.0)
        .bind(product_id.0)
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to add cart line", &e))?;
        Ok(())
    }

    async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<()> {
        if quantity < 0 {
            return Err(CommerceError::Validation {
                reason: "quantity must not be negative".to_string(),
            });
        }

        if quantity == 0 {
            return self.remove_item(user_id, product_id).await;
        }

        let stock = self.stock_of(product_id).await?;
        if quantity > stock {
            return Err(CommerceError::InsufficientStock {
                product_id,
                requested: quantity,
                available: stock,
            });
        }

        let result = sqlx::query(
            r"
            UPDATE cart_items
            SET quantity = $3
            WHERE user_id = $1 AND product_id = $2
            ",
        )
        .bind(user_id.0)
        .bind(product_id.0)
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to update cart line", &e))?;

        if result.rows_affected() == 0 {
            return Err(CommerceError::CartItemNotFound { product_id });
        }
        Ok(())
    }

    async fn remove_item(&self, user_id: UserId, product_id: ProductId) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
                .bind(user_id.0)
                .bind(product_id.0)
                .execute(&self.pool)
                .await
                .map_err(|e| db_err("Failed to remove cart line", &e))?;

        if result.rows_affected() == 0 {
            return Err(CommerceError::CartItemNotFound { product_id });
        }
        Ok(())
    }

    async fn clear_for_user(&self, user_id: UserId) -> Result<()> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to clear cart", &e))?;
        Ok(())
    }
}
