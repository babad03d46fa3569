//! PostgreSQL order ledger.
//!
//! The one component in the system with multi-step write semantics. A
//! placement runs inside a single transaction at read-committed isolation:
//! `FOR UPDATE` row locks serialize concurrent decrements against the same
//! product, and the guarded `UPDATE ... WHERE stock_quantity >= $q` plus an
//! affected-row check keeps stock from ever going negative. No
//! in-application locks are involved.

use crate::{db_err, is_unique_violation};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use stitch_core::config::PricingPolicy;
use stitch_core::error::{CommerceError, Result};
use stitch_core::model::{
    AdminOrderDetails, AdminOrderSummary, Order, OrderId, OrderItemView, OrderStatus,
    OrderWithItems, UserId,
};
use stitch_core::providers::{NewOrder, OrderFilter, OrderLedger, Page, PlacedOrder};
use uuid::Uuid;

/// PostgreSQL order ledger.
#[derive(Clone)]
pub struct PostgresOrderLedger {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

/// Price/stock snapshot taken under `FOR UPDATE`.
#[derive(sqlx::FromRow)]
struct SnapshotRow {
    id: Uuid,
    price: Decimal,
    stock_quantity: i32,
}

/// Minimal projection used for idempotency replays.
#[derive(sqlx::FromRow)]
struct ReplayRow {
    id: Uuid,
    total_amount: Decimal,
}

impl PostgresOrderLedger {
    /// Create a new PostgreSQL order ledger.
    ///
    /// # Arguments
    ///
    /// * `pool` - PostgreSQL connection pool
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up a previously committed order for this `(user, key)` pair.
    async fn find_replay(&self, user_id: UserId, key: &str) -> Result<Option<PlacedOrder>> {
        let row: Option<ReplayRow> = sqlx::query_as(
            r"
            SELECT id, total_amount
            FROM orders
            WHERE user_id = $1 AND idempotency_key = $2
            ",
        )
        .bind(user_id.0)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to look up idempotency key", &e))?;

        Ok(row.map(|r| PlacedOrder {
            order_id: OrderId(r.id),
            total_amount: r.total_amount,
            replayed: true,
        }))
    }

    /// Execute the placement transaction.
    ///
    /// Returns `Ok(None)` when the order insert lost an idempotency race to
    /// a concurrent placement with the same key; the caller resolves the
    /// replay outside the (rolled back) transaction.
    async fn run_placement(
        &self,
        user_id: UserId,
        order: &NewOrder,
        policy: &PricingPolicy,
    ) -> Result<Option<PlacedOrder>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_err("Failed to start transaction", &e))?;

        // Lock every referenced product row and snapshot price + stock.
        // The locks are held until commit, so the snapshot stays accurate
        // for the whole placement.
        let product_ids: Vec<Uuid> = order.items.iter().map(|i| i.product_id.0).collect();
        let rows: Vec<SnapshotRow> = sqlx::query_as(
            r"
            SELECT id, price, stock_quantity
            FROM products
            WHERE id = ANY($1)
            FOR UPDATE
            ",
        )
        .bind(&product_ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| db_err("Failed to lock products", &e))?;

        let mut snapshots: HashMap<Uuid, (Decimal, i32)> = rows
            .into_iter()
            .map(|r| (r.id, (r.price, r.stock_quantity)))
            .collect();

        // Items are processed in client-submitted order; the first missing
        // product aborts the whole call.
        let mut subtotal = Decimal::ZERO;
        for item in &order.items {
            let (price, _) =
                snapshots
                    .get(&item.product_id.0)
                    .ok_or(CommerceError::ProductNotFound {
                        product_id: item.product_id,
                    })?;
            subtotal += *price * Decimal::from(item.quantity);
        }

        // The submitted total is never stored; it only has to agree with
        // the snapshot-derived one within the policy tolerance.
        let computed = policy.total_for(subtotal);
        if !policy.accepts(order.total_amount, computed) {
            return Err(CommerceError::TotalMismatch {
                submitted: order.total_amount,
                computed,
            });
        }

        let inserted: std::result::Result<ReplayRow, sqlx::Error> = sqlx::query_as(
            r"
            INSERT INTO orders (user_id, total_amount, shipping_address, payment_method, idempotency_key)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, total_amount
            ",
        )
        .bind(user_id.0)
        .bind(computed)
        .bind(&order.shipping_address)
        .bind(&order.payment_method)
        .bind(order.idempotency_key.as_deref())
        .fetch_one(&mut *tx)
        .await;

        let order_id = match inserted {
            Ok(row) => OrderId(row.id),
            Err(e) if is_unique_violation(&e) && order.idempotency_key.is_some() => {
                return Ok(None);
            }
            Err(e) => return Err(db_err("Failed to insert order", &e)),
        };

        for item in &order.items {
            let (price, remaining) = snapshots
                .get_mut(&item.product_id.0)
                .ok_or(CommerceError::ProductNotFound {
                    product_id: item.product_id,
                })?;
            let price = *price;

            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id.0)
            .bind(item.product_id.0)
            .bind(item.quantity)
            .bind(price)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_err("Failed to insert order item", &e))?;

            // Guarded decrement: the WHERE clause is the invariant. Zero
            // affected rows means insufficient stock and aborts the whole
            // transaction.
            let result = sqlx::query(
                r"
                UPDATE products
                SET stock_quantity = stock_quantity - $2
                WHERE id = $1 AND stock_quantity >= $2
                ",
            )
            .bind(item.product_id.0)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_err("Failed to decrement stock", &e))?;

            if result.rows_affected() == 0 {
                return Err(CommerceError::InsufficientStock {
                    product_id: item.product_id,
                    requested: item.quantity,
                    available: *remaining,
                });
            }
            *remaining -= item.quantity;
        }

        // Scoped cart clear: only the ordered products leave the cart, so a
        // "buy now" placement does not wipe unrelated cart lines.
        sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE user_id = $1 AND product_id = ANY($2)
            ",
        )
        .bind(user_id.0)
        .bind(&product_ids)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_err("Failed to clear ordered cart lines", &e))?;

        tx.commit()
            .await
            .map_err(|e| db_err("Failed to commit order", &e))?;

        Ok(Some(PlacedOrder {
            order_id,
            total_amount: computed,
            replayed: false,
        }))
    }

    /// Fetch the items of one order, joined with whatever product data
    /// still exists.
    async fn items_of(&self, order_id: OrderId) -> Result<Vec<OrderItemView>> {
        sqlx::query_as(
            r"
            SELECT oi.product_id, oi.quantity, oi.price, p.name, p.image
            FROM order_items oi
            LEFT JOIN products p ON oi.product_id = p.id
            WHERE oi.order_id = $1
            ",
        )
        .bind(order_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to fetch order items", &e))
    }
}

impl OrderLedger for PostgresOrderLedger {
    async fn place_order(
        &self,
        user_id: UserId,
        order: &NewOrder,
        policy: &PricingPolicy,
    ) -> Result<PlacedOrder> {
        order.validate()?;

        // Replay short-circuit before opening a transaction
        if let Some(key) = &order.idempotency_key {
            if let Some(replay) = self.find_replay(user_id, key).await? {
                return Ok(replay);
            }
        }

        match self.run_placement(user_id, order, policy).await? {
            Some(placed) => {
                tracing::info!(
                    order_id = %placed.order_id,
                    user_id = %user_id,
                    total = %placed.total_amount,
                    items = order.items.len(),
                    "order placed"
                );
                Ok(placed)
            }
            // A concurrent placement with the same key committed first;
            // surface that order instead.
            None => {
                let key = order
                    .idempotency_key
                    .as_deref()
                    .ok_or_else(|| CommerceError::Database("replay without key".to_string()))?;
                self.find_replay(user_id, key).await?.ok_or_else(|| {
                    CommerceError::Database(
                        "idempotency conflict without a matching order".to_string(),
                    )
                })
            }
        }
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OrderWithItems>> {
        let orders: Vec<Order> = sqlx::query_as(
            r"
            SELECT id, user_id, total_amount, status, shipping_address,
                   payment_method, idempotency_key, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to fetch orders", &e))?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items_of(order.id).await?;
            result.push(OrderWithItems { order, items });
        }
        Ok(result)
    }

    async fn get_for_user(&self, user_id: UserId, order_id: OrderId) -> Result<OrderWithItems> {
        let order: Order = sqlx::query_as(
            r"
            SELECT id, user_id, total_amount, status, shipping_address,
                   payment_method, idempotency_key, created_at
            FROM orders
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(order_id.0)
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to fetch order", &e))?
        .ok_or(CommerceError::OrderNotFound { order_id })?;

        let items = self.items_of(order.id).await?;
        Ok(OrderWithItems { order, items })
    }

    async fn list_all(&self, filter: &OrderFilter) -> Result<Page<AdminOrderSummary>> {
        let mut query = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            r"
            SELECT o.id, o.user_id, o.total_amount, o.status, o.shipping_address,
                   o.payment_method, o.idempotency_key, o.created_at,
                   u.name AS user_name, u.email AS user_email
            FROM orders o
            JOIN users u ON o.user_id = u.id
            ",
        );
        let mut count = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "SELECT COUNT(*) FROM orders o JOIN users u ON o.user_id = u.id",
        );

        if let Some(status) = filter.status {
            query.push(" WHERE o.status = ").push_bind(status);
            count.push(" WHERE o.status = ").push_bind(status);
        }

        query
            .push(" ORDER BY o.created_at DESC LIMIT ")
            .push_bind(i64::from(filter.page.limit))
            .push(" OFFSET ")
            .push_bind(filter.page.offset());

        let items: Vec<AdminOrderSummary> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list orders", &e))?;
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count orders", &e))?;

        Ok(Page::new(items, total, filter.page))
    }

    async fn get_details(&self, order_id: OrderId) -> Result<AdminOrderDetails> {
        #[derive(sqlx::FromRow)]
        struct DetailsRow {
            #[sqlx(flatten)]
            summary: AdminOrderSummary,
            user_phone: Option<String>,
        }

        let row: DetailsRow = sqlx::query_as(
            r"
            SELECT o.id, o.user_id, o.total_amount, o.status, o.shipping_address,
                   o.payment_method, o.idempotency_key, o.created_at,
                   u.name AS user_name, u.email AS user_email, u.phone AS user_phone
            FROM orders o
            JOIN users u ON o.user_id = u.id
            WHERE o.id = $1
            ",
        )
        .bind(order_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to fetch order details", &e))?
        .ok_or(CommerceError::OrderNotFound { order_id })?;

        let items = self.items_of(order_id).await?;
        Ok(AdminOrderDetails {
            summary: row.summary,
            user_phone: row.user_phone,
            items,
        })
    }

    async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<()> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET status = $2
            WHERE id = $1
            ",
        )
        .bind(order_id.0)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to update order status", &e))?;

        if result.rows_affected() == 0 {
            return Err(CommerceError::OrderNotFound { order_id });
        }

        tracing::info!(order_id = %order_id, status = status.as_str(), "order status updated");
        Ok(())
    }
}
