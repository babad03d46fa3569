//! Mock catalog store for testing.

use crate::error::{CommerceError, Result};
use crate::mocks::poisoned;
use crate::model::{Category, CategoryId, Product, ProductId, ProductView};
use crate::providers::{
    AdminProductQuery, CatalogStore, CategoryPatch, NewCategory, NewProduct, Page, ProductFilter,
    ProductPatch,
};
use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Mock catalog store.
///
/// Uses in-memory storage for testing. The product map is shared with
/// [`super::MockCartStore`] and [`super::MockOrderLedger`] when they are
/// constructed from this catalog.
#[derive(Debug, Clone, Default)]
pub struct MockCatalogStore {
    products: Arc<Mutex<HashMap<ProductId, Product>>>,
    categories: Arc<Mutex<HashMap<CategoryId, Category>>>,
}

impl MockCatalogStore {
    /// Create an empty mock catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the product map.
    pub(crate) fn products_handle(&self) -> Arc<Mutex<HashMap<ProductId, Product>>> {
        Arc::clone(&self.products)
    }

    /// Seed a product directly.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test code only).
    #[allow(clippy::unwrap_used)]
    pub fn insert_product(&self, product: Product) {
        self.products.lock().unwrap().insert(product.id, product);
    }

    /// Seed a category directly.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test code only).
    #[allow(clippy::unwrap_used)]
    pub fn insert_category(&self, category: Category) {
        self.categories
            .lock()
            .unwrap()
            .insert(category.id, category);
    }

    /// Current stock for a product, for test assertions.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned (test code only).
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn stock_of(&self, product_id: ProductId) -> Option<i32> {
        self.products
            .lock()
            .unwrap()
            .get(&product_id)
            .map(|p| p.stock_quantity)
    }

    fn category_name(
        categories: &HashMap<CategoryId, Category>,
        category_id: Option<CategoryId>,
    ) -> Option<String> {
        category_id
            .and_then(|id| categories.get(&id))
            .map(|c| c.name.clone())
    }

    fn matches_search(product: &Product, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        let hit = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(&needle))
        };
        product.name.to_lowercase().contains(&needle)
            || hit(&product.description)
            || hit(&product.brand)
    }
}

impl CatalogStore for MockCatalogStore {
    fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> impl Future<Output = Result<Vec<ProductView>>> + Send {
        let products = Arc::clone(&self.products);
        let categories = Arc::clone(&self.categories);
        let filter = filter.clone();

        async move {
            let products = products.lock().map_err(|_| poisoned())?;
            let categories = categories.lock().map_err(|_| poisoned())?;

            let mut views: Vec<ProductView> = products
                .values()
                .filter(|p| !filter.featured || p.is_featured)
                .filter(|p| {
                    filter
                        .search
                        .as_deref()
                        .is_none_or(|needle| Self::matches_search(p, needle))
                })
                .map(|p| ProductView {
                    product: p.clone(),
                    category_name: Self::category_name(&categories, p.category_id),
                })
                .filter(|v| match filter.category.as_deref() {
                    None | Some("all") => true,
                    Some(name) => v.category_name.as_deref() == Some(name),
                })
                .collect();

            views.sort_by(|a, b| b.product.created_at.cmp(&a.product.created_at));
            Ok(views)
        }
    }

    fn get_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<ProductView>> + Send {
        let products = Arc::clone(&self.products);
        let categories = Arc::clone(&self.categories);

        async move {
            let products = products.lock().map_err(|_| poisoned())?;
            let categories = categories.lock().map_err(|_| poisoned())?;

            let product = products
                .get(&product_id)
                .cloned()
                .ok_or(CommerceError::ProductNotFound { product_id })?;
            let category_name = Self::category_name(&categories, product.category_id);
            Ok(ProductView {
                product,
                category_name,
            })
        }
    }

    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>>> + Send {
        let categories = Arc::clone(&self.categories);

        async move {
            let categories = categories.lock().map_err(|_| poisoned())?;
            let mut all: Vec<Category> = categories.values().cloned().collect();
            all.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(all)
        }
    }

    fn list_products_paged(
        &self,
        query: &AdminProductQuery,
    ) -> impl Future<Output = Result<Page<ProductView>>> + Send {
        let products = Arc::clone(&self.products);
        let categories = Arc::clone(&self.categories);
        let query = query.clone();

        async move {
            let products = products.lock().map_err(|_| poisoned())?;
            let categories = categories.lock().map_err(|_| poisoned())?;

            let mut views: Vec<ProductView> = products
                .values()
                .filter(|p| {
                    query
                        .search
                        .as_deref()
                        .is_none_or(|needle| Self::matches_search(p, needle))
                })
                .filter(|p| query.category_id.is_none_or(|id| p.category_id == Some(id)))
                .map(|p| ProductView {
                    product: p.clone(),
                    category_name: Self::category_name(&categories, p.category_id),
                })
                .collect();
            views.sort_by(|a, b| b.product.created_at.cmp(&a.product.created_at));

            let total = views.len() as i64;
            let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
            let items: Vec<ProductView> = views
                .into_iter()
                .skip(offset)
                .take(query.page.limit as usize)
                .collect();
            Ok(Page::new(items, total, query.page))
        }
    }

    fn create_product(&self, new: &NewProduct) -> impl Future<Output = Result<ProductView>> + Send {
        let products = Arc::clone(&self.products);
        let categories = Arc::clone(&self.categories);
        let new = new.clone();

        async move {
            let mut products = products.lock().map_err(|_| poisoned())?;
            let categories = categories.lock().map_err(|_| poisoned())?;

            let now = Utc::now();
            let product = Product {
                id: ProductId::new(),
                name: new.name,
                description: new.description,
                price: new.price,
                original_price: new.original_price,
                category_id: new.category_id,
                size: new.size,
                color: new.color,
                brand: new.brand,
                image: new.image,
                stock_quantity: new.stock_quantity,
                is_featured: new.is_featured,
                created_at: now,
                updated_at: now,
            };
            let category_name = Self::category_name(&categories, product.category_id);
            products.insert(product.id, product.clone());
            Ok(ProductView {
                product,
                category_name,
            })
        }
    }

    fn update_product(
        &self,
        product_id: ProductId,
        patch: &ProductPatch,
    ) -> impl Future<Output = Result<ProductView>> + Send {
        let products = Arc::clone(&self.products);
        let categories = Arc::clone(&self.categories);
        let patch = patch.clone();

        async move {
            let mut products = products.lock().map_err(|_| poisoned())?;
            let categories = categories.lock().map_err(|_| poisoned())?;

            let product = products
                .get_mut(&product_id)
                .ok_or(CommerceError::ProductNotFound { product_id })?;

            if let Some(name) = patch.name {
                product.name = name;
            }
            if let Some(description) = patch.description {
                product.description = Some(description);
            }
            if let Some(price) = patch.price {
                product.price = price;
            }
            if let Some(original_price) = patch.original_price {
                product.original_price = Some(original_price);
            }
            if let Some(category_id) = patch.category_id {
                product.category_id = Some(category_id);
            }
            if let Some(size) = patch.size {
                product.size = Some(size);
            }
            if let Some(color) = patch.color {
                product.color = Some(color);
            }
            if let Some(brand) = patch.brand {
                product.brand = Some(brand);
            }
            if let Some(image) = patch.image {
                product.image = Some(image);
            }
            if let Some(stock_quantity) = patch.stock_quantity {
                product.stock_quantity = stock_quantity;
            }
            if let Some(is_featured) = patch.is_featured {
                product.is_featured = is_featured;
            }
            product.updated_at = Utc::now();

            let category_name = Self::category_name(&categories, product.category_id);
            Ok(ProductView {
                product: product.clone(),
                category_name,
            })
        }
    }

    fn delete_product(&self, product_id: ProductId) -> impl Future<Output = Result<()>> + Send {
        let products = Arc::clone(&self.products);

        async move {
            products
                .lock()
                .map_err(|_| poisoned())?
                .remove(&product_id)
                .map(|_| ())
                .ok_or(CommerceError::ProductNotFound { product_id })
        }
    }

    fn create_category(&self, new: &NewCategory) -> impl Future<Output = Result<Category>> + Send {
        let categories = Arc::clone(&self.categories);
        let new = new.clone();

        async move {
            let mut categories = categories.lock().map_err(|_| poisoned())?;
            let category = Category {
                id: CategoryId::new(),
                name: new.name,
                description: new.description,
                image: new.image,
            };
            categories.insert(category.id, category.clone());
            Ok(category)
        }
    }

    fn update_category(
        &self,
        category_id: CategoryId,
        patch: &CategoryPatch,
    ) -> impl Future<Output = Result<Category>> + Send {
        let categories = Arc::clone(&self.categories);
        let patch = patch.clone();

        async move {
            let mut categories = categories.lock().map_err(|_| poisoned())?;
            let category = categories
                .get_mut(&category_id)
                .ok_or(CommerceError::CategoryNotFound { category_id })?;

            if let Some(name) = patch.name {
                category.name = name;
            }
            if let Some(description) = patch.description {
                category.description = Some(description);
            }
            if let Some(image) = patch.image {
                category.image = Some(image);
            }
            Ok(category.clone())
        }
    }

    fn delete_category(&self, category_id: CategoryId) -> impl Future<Output = Result<()>> + Send {
        let products = Arc::clone(&self.products);
        let categories = Arc::clone(&self.categories);

        async move {
            let products = products.lock().map_err(|_| poisoned())?;
            let mut categories = categories.lock().map_err(|_| poisoned())?;

            if !categories.contains_key(&category_id) {
                return Err(CommerceError::CategoryNotFound { category_id });
            }
            if products.values().any(|p| p.category_id == Some(category_id)) {
                return Err(CommerceError::CategoryInUse { category_id });
            }
            categories.remove(&category_id);
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
    async fn test_category_referential_guard() {
        let catalog = MockCatalogStore::new();
        let category = Category {
            id: CategoryId::new(),
            name: "Shoes".into(),
            description: None,
            image: None,
        };
        catalog.insert_category(category.clone());

        let mut product = product_named("Runner");
        product.category_id = Some(category.id);
        catalog.insert_product(product.clone());

        assert_eq!(
            catalog.delete_category(category.id).await,
            Err(CommerceError::CategoryInUse {
                category_id: category.id
            })
        );

        catalog
            .delete_product(product.id)
            .await
            .expect("product deletes");
        catalog
            .delete_category(category.id)
            .await
            .expect("empty category deletes");
    }

    #[tokio::test]
    async fn test_featured_and_search_filters() {
        let catalog = MockCatalogStore::new();
        let mut featured = product_named("Featured Jacket");
        featured.is_featured = true;
        catalog.insert_product(featured);
        catalog.insert_product(product_named("Plain Tee"));

        let all = catalog
            .list_products(&ProductFilter::default())
            .await
            .expect("list");
        assert_eq!(all.len(), 2);

        let featured_only = catalog
            .list_products(&ProductFilter {
                featured: true,
                ..ProductFilter::default()
            })
            .await
            .expect("list");
        assert_eq!(featured_only.len(), 1);
        assert_eq!(featured_only[0].product.name, "Featured Jacket");

        let searched = catalog
            .list_products(&ProductFilter {
                search: Some("tee".into()),
                ..ProductFilter::default()
            })
            .await
            .expect("list");
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].product.name, "Plain Tee");
    }
}
