//! Mock cart store for testing.

use crate::error::{CommerceError, Result};
use crate::mocks::{poisoned, MockCatalogStore};
use crate::model::{CartLineView, Product, ProductId, UserId};
use crate::providers::CartStore;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock cart store.
///
/// Shares the product map of the [`MockCatalogStore`] it is built from, so
/// stock checks and joined views see the same catalog the tests seeded.
#[derive(Debug, Clone)]
pub struct MockCartStore {
    lines: Arc<Mutex<HashMap<(UserId, ProductId), i32>>>,
    products: Arc<Mutex<HashMap<ProductId, Product>>>,
}

impl MockCartStore {
    /// Create a cart store backed by the given catalog's products.
    #[must_use]
    pub fn with_catalog(catalog: &MockCatalogStore) -> Self {
        Self {
            lines: Arc::new(Mutex::new(HashMap::new())),
            products: catalog.products_handle(),
        }
    }

    /// Shared handle to the cart lines.
    pub(crate) fn lines_handle(&self) -> Arc<Mutex<HashMap<(UserId, ProductId), i32>>> {
        Arc::clone(&self.lines)
    }

    /// Quantity currently in the cart, for test assertions.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test code only).
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn quantity_of(&self, user_id: UserId, product_id: ProductId) -> Option<i32> {
        self.lines.lock().unwrap().get(&(user_id, product_id)).copied()
    }
}

impl CartStore for MockCartStore {
    fn list_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<CartLineView>>> + Send {
        let lines = Arc::clone(&self.lines);
        let products = Arc::clone(&self.products);

        async move {
            let lines = lines.lock().map_err(|_| poisoned())?;
            let products = products.lock().map_err(|_| poisoned())?;

            let mut views: Vec<CartLineView> = lines
                .iter()
                .filter(|((uid, _), _)| *uid == user_id)
                .filter_map(|((_, pid), qty)| {
                    products.get(pid).map(|p| CartLineView {
                        product_id: *pid,
                        quantity: *qty,
                        name: p.name.clone(),
                        price: p.price,
                        image: p.image.clone(),
                        stock_quantity: p.stock_quantity,
                        brand: p.brand.clone(),
                    })
                })
                .collect();
            views.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(views)
        }
    }

    fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> impl Future<Output = Result<()>> + Send {
        let lines = Arc::clone(&self.lines);
        let products = Arc::clone(&self.products);

        async move {
            if quantity <= 0 {
                return Err(CommerceError::Validation {
                    reason: "quantity must be positive".into(),
                });
            }

            let products = products.lock().map_err(|_| poisoned())?;
            let stock = products
                .get(&product_id)
                .map(|p| p.stock_quantity)
                .ok_or(CommerceError::ProductNotFound { product_id })?;

            let mut lines = lines.lock().map_err(|_| poisoned())?;
            let current = lines.get(&(user_id, product_id)).copied().unwrap_or(0);
            let requested = current + quantity;
            if requested > stock {
                return Err(CommerceError::InsufficientStock {
                    product_id,
                    requested,
                    available: stock,
                });
            }
            lines.insert((user_id, product_id), requested);
            Ok(())
        }
    }

    fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> impl Future<Output = Result<()>> + Send {
        let lines = Arc::clone(&self.lines);
        let products = Arc::clone(&self.products);

        async move {
            if quantity < 0 {
                return Err(CommerceError::Validation {
                    reason: "quantity must not be negative".into(),
                });
            }

            let mut lines = lines.lock().map_err(|_| poisoned())?;
            if !lines.contains_key(&(user_id, product_id)) {
                return Err(CommerceError::CartItemNotFound { product_id });
            }

            if quantity == 0 {
                lines.remove(&(user_id, product_id));
                return Ok(());
            }

            let products = products.lock().map_err(|_| poisoned())?;
            let stock = products
                .get(&product_id)
                .map(|p| p.stock_quantity)
                .ok_or(CommerceError::ProductNotFound { product_id })?;
            if quantity > stock {
                return Err(CommerceError::InsufficientStock {
                    product_id,
                    requested: quantity,
                    available: stock,
                });
            }
            lines.insert((user_id, product_id), quantity);
            Ok(())
        }
    }

    fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> impl Future<Output = Result<()>> + Send {
        let lines = Arc::clone(&self.lines);

        async move {
            lines
                .lock()
                .map_err(|_| poisoned())?
                .remove(&(user_id, product_id))
                .map(|_| ())
                .ok_or(CommerceError::CartItemNotFound { product_id })
        }
    }

    fn clear_for_user(&self, user_id: UserId) -> impl Future<Output = Result<()>> + Send {
        let lines = Arc::clone(&self.lines);

        async move {
            lines
                .lock()
                .map_err(|_| poisoned())?
                .retain(|(uid, _), _| *uid != user_id);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_fixtures::product_named;

    #[tokio::test]
    async fn test_add_increments_and_checks_stock() {
        let catalog = MockCatalogStore::new();
        let mut product = product_named("Scarf");
        product.stock_quantity = 3;
        catalog.insert_product(product.clone());

        let cart = MockCartStore::with_catalog(&catalog);
        let user = UserId::new();

        cart.add_item(user, product.id, 2).await.expect("first add");
        cart.add_item(user, product.id, 1).await.expect("increment");
        assert_eq!(cart.quantity_of(user, product.id), Some(3));

        // A fourth unit exceeds stock
        assert_eq!(
            cart.add_item(user, product.id, 1).await,
            Err(CommerceError::InsufficientStock {
                product_id: product.id,
                requested: 4,
                available: 3,
            })
        );
    }

    #[tokio::test]
    async fn test_set_quantity_zero_removes() {
        let catalog = MockCatalogStore::new();
        let product = product_named("Belt");
        catalog.insert_product(product.clone());

        let cart = MockCartStore::with_catalog(&catalog);
        let user = UserId::new();

        cart.add_item(user, product.id, 2).await.expect("add");
        cart.set_quantity(user, product.id, 0).await.expect("zero");
        assert_eq!(cart.quantity_of(user, product.id), None);

        assert_eq!(
            cart.set_quantity(user, product.id, 1).await,
            Err(CommerceError::CartItemNotFound {
                product_id: product.id
            })
        );
    }
}
