//! Mock order ledger for testing.

use crate::config::PricingPolicy;
use crate::error::{CommerceError, Result};
use crate::mocks::{poisoned, MockCartStore, MockCatalogStore, MockUserDirectory};
use crate::model::{
    AdminOrderDetails, AdminOrderSummary, Order, OrderId, OrderItemView, OrderStatus,
    OrderWithItems, Product, ProductId, UserId, UserSummary,
};
use crate::providers::{NewOrder, OrderFilter, OrderLedger, Page, PlacedOrder};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mock order ledger.
///
/// Shares the catalog's product map and the cart's line map so placements
/// decrement the same stock and clear the same cart the rest of the mock
/// suite sees. All effects of a placement apply under one lock scope, so
/// the atomicity contract holds by construction; `fail_next_commit` lets a
/// test abort a placement after all checks passed and verify nothing leaked.
#[derive(Debug, Clone)]
pub struct MockOrderLedger {
    products: Arc<Mutex<HashMap<ProductId, Product>>>,
    cart_lines: Arc<Mutex<HashMap<(UserId, ProductId), i32>>>,
    users: Arc<Mutex<HashMap<UserId, UserSummary>>>,
    orders: Arc<Mutex<HashMap<OrderId, OrderWithItems>>>,
    replay_index: Arc<Mutex<HashMap<(UserId, String), OrderId>>>,
    fail_commit: Arc<AtomicBool>,
}

impl MockOrderLedger {
    /// Create a ledger sharing state with the given mock stores.
    #[must_use]
    pub fn new(
        catalog: &MockCatalogStore,
        cart: &MockCartStore,
        users: &MockUserDirectory,
    ) -> Self {
        Self {
            products: catalog.products_handle(),
            cart_lines: cart.lines_handle(),
            users: users.users_handle(),
            orders: Arc::new(Mutex::new(HashMap::new())),
            replay_index: Arc::new(Mutex::new(HashMap::new())),
            fail_commit: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make the next placement fail after every check has passed, leaving
    /// no effect behind.
    pub fn fail_next_commit(&self) {
        self.fail_commit.store(true, Ordering::SeqCst);
    }

    /// Number of committed orders, for test assertions.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test code only).
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    fn buyer_of(users: &HashMap<UserId, UserSummary>, user_id: UserId) -> (String, String) {
        users.get(&user_id).map_or_else(
            || ("unknown".to_string(), "unknown@example.invalid".to_string()),
            |u| (u.name.clone(), u.email.clone()),
        )
    }
}

impl OrderLedger for MockOrderLedger {
    fn place_order(
        &self,
        user_id: UserId,
        order: &NewOrder,
        policy: &PricingPolicy,
    ) -> impl Future<Output = Result<PlacedOrder>> + Send {
        let products = Arc::clone(&self.products);
        let cart_lines = Arc::clone(&self.cart_lines);
        let orders = Arc::clone(&self.orders);
        let replay_index = Arc::clone(&self.replay_index);
        let fail_commit = Arc::clone(&self.fail_commit);
        let order = order.clone();
        let policy = policy.clone();

        async move {
            order.validate()?;

            // Idempotent replay short-circuits before any effect. Locks are
            // taken in the same global order as the commit path below.
            if let Some(key) = &order.idempotency_key {
                let orders = orders.lock().map_err(|_| poisoned())?;
                let replay_index = replay_index.lock().map_err(|_| poisoned())?;
                if let Some(order_id) = replay_index.get(&(user_id, key.clone())) {
                    let prior = orders
                        .get(order_id)
                        .ok_or(CommerceError::OrderNotFound { order_id: *order_id })?;
                    return Ok(PlacedOrder {
                        order_id: *order_id,
                        total_amount: prior.order.total_amount,
                        replayed: true,
                    });
                }
            }

            let mut products = products.lock().map_err(|_| poisoned())?;
            let mut cart_lines = cart_lines.lock().map_err(|_| poisoned())?;
            let mut orders = orders.lock().map_err(|_| poisoned())?;
            let mut replay_index = replay_index.lock().map_err(|_| poisoned())?;

            // Snapshot prices, in submitted order, failing on the first
            // missing product
            let mut subtotal = Decimal::ZERO;
            for item in &order.items {
                let product =
                    products
                        .get(&item.product_id)
                        .ok_or(CommerceError::ProductNotFound {
                            product_id: item.product_id,
                        })?;
                subtotal += product.price * Decimal::from(item.quantity);
            }

            let computed = policy.total_for(subtotal);
            if !policy.accepts(order.total_amount, computed) {
                return Err(CommerceError::TotalMismatch {
                    submitted: order.total_amount,
                    computed,
                });
            }

            // Guarded decrement check across all items before any mutation
            for item in &order.items {
                let product = products
                    .get(&item.product_id)
                    .ok_or(CommerceError::ProductNotFound {
                        product_id: item.product_id,
                    })?;
                if product.stock_quantity < item.quantity {
                    return Err(CommerceError::InsufficientStock {
                        product_id: item.product_id,
                        requested: item.quantity,
                        available: product.stock_quantity,
                    });
                }
            }

            if fail_commit.swap(false, Ordering::SeqCst) {
                return Err(CommerceError::Database("injected commit failure".into()));
            }

            // Commit point: apply all four effects under the held locks
            let mut items = Vec::with_capacity(order.items.len());
            for item in &order.items {
                let product = products
                    .get_mut(&item.product_id)
                    .ok_or(CommerceError::ProductNotFound {
                        product_id: item.product_id,
                    })?;
                product.stock_quantity -= item.quantity;
                items.push(OrderItemView {
                    product_id: item.product_id,
                    quantity: item.quantity,
                    price: product.price,
                    name: Some(product.name.clone()),
                    image: product.image.clone(),
                });
            }

            let order_id = OrderId::new();
            let row = Order {
                id: order_id,
                user_id,
                total_amount: computed,
                status: OrderStatus::Pending,
                shipping_address: order.shipping_address.clone(),
                payment_method: order.payment_method.clone(),
                idempotency_key: order.idempotency_key.clone(),
                created_at: Utc::now(),
            };
            orders.insert(order_id, OrderWithItems { order: row, items });

            if let Some(key) = &order.idempotency_key {
                replay_index.insert((user_id, key.clone()), order_id);
            }

            // Scoped cart clear: only the ordered products leave the cart
            let ordered: Vec<ProductId> = order.items.iter().map(|i| i.product_id).collect();
            cart_lines.retain(|(uid, pid), _| *uid != user_id || !ordered.contains(pid));

            Ok(PlacedOrder {
                order_id,
                total_amount: computed,
                replayed: false,
            })
        }
    }

    fn list_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<OrderWithItems>>> + Send {
        let orders = Arc::clone(&self.orders);

        async move {
            let orders = orders.lock().map_err(|_| poisoned())?;
            let mut mine: Vec<OrderWithItems> = orders
                .values()
                .filter(|o| o.order.user_id == user_id)
                .cloned()
                .collect();
            mine.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));
            Ok(mine)
        }
    }

    fn get_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> impl Future<Output = Result<OrderWithItems>> + Send {
        let orders = Arc::clone(&self.orders);

        async move {
            let orders = orders.lock().map_err(|_| poisoned())?;
            orders
                .get(&order_id)
                .filter(|o| o.order.user_id == user_id)
                .cloned()
                .ok_or(CommerceError::OrderNotFound { order_id })
        }
    }

    fn list_all(
        &self,
        filter: &OrderFilter,
    ) -> impl Future<Output = Result<Page<AdminOrderSummary>>> + Send {
        let orders = Arc::clone(&self.orders);
        let users = Arc::clone(&self.users);
        let filter = *filter;

        async move {
            let orders = orders.lock().map_err(|_| poisoned())?;
            let users = users.lock().map_err(|_| poisoned())?;

            let mut matched: Vec<AdminOrderSummary> = orders
                .values()
                .filter(|o| filter.status.is_none_or(|s| o.order.status == s))
                .map(|o| {
                    let (user_name, user_email) = Self::buyer_of(&users, o.order.user_id);
                    AdminOrderSummary {
                        order: o.order.clone(),
                        user_name,
                        user_email,
                    }
                })
                .collect();
            matched.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));

            let total = matched.len() as i64;
            let offset = usize::try_from(filter.page.offset()).unwrap_or(usize::MAX);
            let items: Vec<AdminOrderSummary> = matched
                .into_iter()
                .skip(offset)
                .take(filter.page.limit as usize)
                .collect();
            Ok(Page::new(items, total, filter.page))
        }
    }

    fn get_details(
        &self,
        order_id: OrderId,
    ) -> impl Future<Output = Result<AdminOrderDetails>> + Send {
        let orders = Arc::clone(&self.orders);
        let users = Arc::clone(&self.users);

        async move {
            let orders = orders.lock().map_err(|_| poisoned())?;
            let users = users.lock().map_err(|_| poisoned())?;

            let with_items = orders
                .get(&order_id)
                .ok_or(CommerceError::OrderNotFound { order_id })?;
            let (user_name, user_email) = Self::buyer_of(&users, with_items.order.user_id);
            let user_phone = users
                .get(&with_items.order.user_id)
                .and_then(|u| u.phone.clone());

            Ok(AdminOrderDetails {
                summary: AdminOrderSummary {
                    order: with_items.order.clone(),
                    user_name,
                    user_email,
                },
                user_phone,
                items: with_items.items.clone(),
            })
        }
    }

    fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> impl Future<Output = Result<()>> + Send {
        let orders = Arc::clone(&self.orders);

        async move {
            let mut orders = orders.lock().map_err(|_| poisoned())?;
            let order = orders
                .get_mut(&order_id)
                .ok_or(CommerceError::OrderNotFound { order_id })?;
            order.order.status = status;
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::providers::cart::CartStore;
    use crate::providers::catalog::CatalogStore;
    use crate::providers::LineItem;
    use crate::test_fixtures::product_named;

    fn suite() -> (MockCatalogStore, MockCartStore, MockOrderLedger) {
        let catalog = MockCatalogStore::new();
        let cart = MockCartStore::with_catalog(&catalog);
        let users = MockUserDirectory::new();
        let ledger = MockOrderLedger::new(&catalog, &cart, &users);
        (catalog, cart, ledger)
    }

    fn order_of(product_id: ProductId, quantity: i32, total: Decimal) -> NewOrder {
        NewOrder {
            items: vec![LineItem {
                product_id,
                quantity,
            }],
            total_amount: total,
            shipping_address: "123 Main St".into(),
            payment_method: "card".into(),
            idempotency_key: None,
        }
    }

    #[tokio::test]
    async fn test_placement_decrements_stock_and_clears_cart_line() {
        let (catalog, cart, ledger) = suite();
        let mut product = product_named("Denim Jacket");
        product.stock_quantity = 5;
        product.price = Decimal::new(1000, 2); // 10.00
        catalog.insert_product(product.clone());

        let user = UserId::new();
        cart.add_item(user, product.id, 2).await.expect("add");

        let placed = ledger
            .place_order(
                user,
                &order_of(product.id, 2, Decimal::new(2000, 2)),
                &PricingPolicy::default(),
            )
            .await
            .expect("order placed");

        assert!(!placed.replayed);
        assert_eq!(placed.total_amount, Decimal::new(2000, 2));
        assert_eq!(catalog.stock_of(product.id), Some(3));
        assert_eq!(cart.quantity_of(user, product.id), None);

        let mine = ledger.list_for_user(user).await.expect("list");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].items[0].price, Decimal::new(1000, 2));
    }

    #[tokio::test]
    async fn test_unrelated_cart_lines_survive_placement() {
        let (catalog, cart, ledger) = suite();
        let ordered = product_named("Ordered");
        let kept = product_named("Kept");
        catalog.insert_product(ordered.clone());
        catalog.insert_product(kept.clone());

        let user = UserId::new();
        cart.add_item(user, ordered.id, 1).await.expect("add");
        cart.add_item(user, kept.id, 1).await.expect("add");

        ledger
            .place_order(
                user,
                &order_of(ordered.id, 1, ordered.price),
                &PricingPolicy::default(),
            )
            .await
            .expect("placed");

        assert_eq!(cart.quantity_of(user, ordered.id), None);
        assert_eq!(cart.quantity_of(user, kept.id), Some(1));
    }

    #[tokio::test]
    async fn test_insufficient_stock_is_a_conflict() {
        let (catalog, _cart, ledger) = suite();
        let mut product = product_named("Limited");
        product.stock_quantity = 2;
        catalog.insert_product(product.clone());

        let err = ledger
            .place_order(
                UserId::new(),
                &order_of(product.id, 3, product.price * Decimal::from(3)),
                &PricingPolicy::default(),
            )
            .await
            .expect_err("must conflict");

        assert_eq!(
            err,
            CommerceError::InsufficientStock {
                product_id: product.id,
                requested: 3,
                available: 2,
            }
        );
        assert_eq!(catalog.stock_of(product.id), Some(2));
        assert_eq!(ledger.order_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_product_aborts_whole_order() {
        let (catalog, _cart, ledger) = suite();
        let product = product_named("Real");
        catalog.insert_product(product.clone());

        let order = NewOrder {
            items: vec![
                LineItem {
                    product_id: product.id,
                    quantity: 1,
                },
                LineItem {
                    product_id: ProductId::new(),
                    quantity: 1,
                },
            ],
            total_amount: product.price,
            shipping_address: "123 Main St".into(),
            payment_method: "card".into(),
            idempotency_key: None,
        };

        let err = ledger
            .place_order(UserId::new(), &order, &PricingPolicy::default())
            .await
            .expect_err("must fail");
        assert!(matches!(err, CommerceError::ProductNotFound { .. }));
        assert_eq!(catalog.stock_of(product.id), Some(product.stock_quantity));
        assert_eq!(ledger.order_count(), 0);
    }

    #[tokio::test]
    async fn test_total_mismatch_rejected_before_any_write() {
        let (catalog, _cart, ledger) = suite();
        let mut product = product_named("Priced");
        product.price = Decimal::new(1000, 2);
        catalog.insert_product(product.clone());

        let err = ledger
            .place_order(
                UserId::new(),
                &order_of(product.id, 2, Decimal::new(500, 2)),
                &PricingPolicy::default(),
            )
            .await
            .expect_err("must reject");
        assert!(matches!(err, CommerceError::TotalMismatch { .. }));
        assert_eq!(catalog.stock_of(product.id), Some(product.stock_quantity));
    }

    #[tokio::test]
    async fn test_injected_commit_failure_leaves_no_trace() {
        let (catalog, cart, ledger) = suite();
        let product = product_named("Fragile");
        catalog.insert_product(product.clone());

        let user = UserId::new();
        cart.add_item(user, product.id, 1).await.expect("add");

        ledger.fail_next_commit();
        let err = ledger
            .place_order(
                user,
                &order_of(product.id, 1, product.price),
                &PricingPolicy::default(),
            )
            .await
            .expect_err("injected failure");
        assert!(matches!(err, CommerceError::Database(_)));

        // Nothing committed: no order, stock intact, cart intact
        assert_eq!(ledger.order_count(), 0);
        assert_eq!(catalog.stock_of(product.id), Some(product.stock_quantity));
        assert_eq!(cart.quantity_of(user, product.id), Some(1));

        // And the switch resets
        ledger
            .place_order(
                user,
                &order_of(product.id, 1, product.price),
                &PricingPolicy::default(),
            )
            .await
            .expect("next placement succeeds");
    }

    #[tokio::test]
    async fn test_idempotent_replay_returns_prior_order() {
        let (catalog, _cart, ledger) = suite();
        let mut product = product_named("Replayable");
        product.stock_quantity = 5;
        catalog.insert_product(product.clone());

        let user = UserId::new();
        let mut order = order_of(product.id, 2, product.price * Decimal::from(2));
        order.idempotency_key = Some("retry-1".into());

        let first = ledger
            .place_order(user, &order, &PricingPolicy::default())
            .await
            .expect("first");
        let second = ledger
            .place_order(user, &order, &PricingPolicy::default())
            .await
            .expect("replay");

        assert!(!first.replayed);
        assert!(second.replayed);
        assert_eq!(first.order_id, second.order_id);
        // Stock decremented exactly once
        assert_eq!(catalog.stock_of(product.id), Some(3));
        assert_eq!(ledger.order_count(), 1);
    }

    #[tokio::test]
    async fn test_price_snapshot_survives_repricing() {
        let (catalog, _cart, ledger) = suite();
        let mut product = product_named("Snapshot");
        product.price = Decimal::new(1000, 2);
        catalog.insert_product(product.clone());

        let user = UserId::new();
        let placed = ledger
            .place_order(
                user,
                &order_of(product.id, 1, Decimal::new(1000, 2)),
                &PricingPolicy::default(),
            )
            .await
            .expect("placed");

        // Reprice after the order exists
        catalog
            .update_product(
                product.id,
                &crate::providers::ProductPatch {
                    price: Some(Decimal::new(9900, 2)),
                    ..crate::providers::ProductPatch::default()
                },
            )
            .await
            .expect("reprice");

        let fetched = ledger
            .get_for_user(user, placed.order_id)
            .await
            .expect("fetch");
        assert_eq!(fetched.items[0].price, Decimal::new(1000, 2));
    }

    #[tokio::test]
    async fn test_ownership_enforced_on_get() {
        let (catalog, _cart, ledger) = suite();
        let product = product_named("Private");
        catalog.insert_product(product.clone());

        let owner = UserId::new();
        let placed = ledger
            .place_order(
                owner,
                &order_of(product.id, 1, product.price),
                &PricingPolicy::default(),
            )
            .await
            .expect("placed");

        let stranger = UserId::new();
        assert_eq!(
            ledger.get_for_user(stranger, placed.order_id).await,
            Err(CommerceError::OrderNotFound {
                order_id: placed.order_id
            })
        );
    }
}
