//! PostgreSQL catalog store.

use crate::db_err;
use sqlx::{PgPool, Postgres, QueryBuilder};
use stitch_core::error::{CommerceError, Result};
use stitch_core::model::{Category, CategoryId, ProductId, ProductView};
use stitch_core::providers::{
    AdminProductQuery, CatalogStore, CategoryPatch, NewCategory, NewProduct, Page, ProductFilter,
    ProductPatch,
};
use uuid::Uuid;

/// Joined product columns selected by every product read.
const PRODUCT_VIEW_COLUMNS: &str = r"
    SELECT p.id, p.name, p.description, p.price, p.original_price, p.category_id,
           p.size, p.color, p.brand, p.image, p.stock_quantity, p.is_featured,
           p.created_at, p.updated_at, c.name AS category_name
    FROM products p
    LEFT JOIN categories c ON p.category_id = c.id
";

/// PostgreSQL catalog store.
///
/// Owns product and category reads/writes except the order-time stock
/// decrement, which belongs to the ledger's transaction.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

impl PostgresCatalogStore {
    /// Create a new PostgreSQL catalog store.
    ///
    /// # Arguments
    ///
    /// * `pool` - PostgreSQL connection pool
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn product_view(&self, product_id: ProductId) -> Result<ProductView> {
        let mut query = QueryBuilder::<Postgres>::new(PRODUCT_VIEW_COLUMNS);
        query.push(" WHERE p.id = ").push_bind(product_id.0);

        query
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to fetch product", &e))?
            .ok_or(CommerceError::ProductNotFound { product_id })
    }

    fn push_search(query: &mut QueryBuilder<'_, Postgres>, needle: &str) {
        let pattern = format!("%{needle}%");
        query
            .push(" AND (p.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.brand ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

impl CatalogStore for PostgresCatalogStore {
    async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<ProductView>> {
        let mut query = QueryBuilder::<Postgres>::new(PRODUCT_VIEW_COLUMNS);
        query.push(" WHERE 1=1");

        match filter.category.as_deref() {
            None | Some("all") => {}
            Some(name) => {
                query.push(" AND c.name = ").push_bind(name.to_string());
            }
        }
        if filter.featured {
            query.push(" AND p.is_featured = TRUE");
        }
        if let Some(needle) = filter.search.as_deref() {
            Self::push_search(&mut query, needle);
        }
        query.push(" ORDER BY p.created_at DESC");

        query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list products", &e))
    }

    async fn get_product(&self, product_id: ProductId) -> Result<ProductView> {
        self.product_view(product_id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        sqlx::query_as(
            r"
            SELECT id, name, description, image
            FROM categories
            ORDER BY name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list categories", &e))
    }

    async fn list_products_paged(&self, query: &AdminProductQuery) -> Result<Page<ProductView>> {
        let mut rows_query = QueryBuilder::<Postgres>::new(PRODUCT_VIEW_COLUMNS);
        rows_query.push(" WHERE 1=1");
        let mut count_query = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM products p LEFT JOIN categories c ON p.category_id = c.id WHERE 1=1",
        );

        if let Some(needle) = query.search.as_deref() {
            Self::push_search(&mut rows_query, needle);
            Self::push_search(&mut count_query, needle);
        }
        if let Some(category_id) = query.category_id {
            rows_query
                .push(" AND p.category_id = ")
                .push_bind(category_id.0);
            count_query
                .push(" AND p.category_id = ")
                .push_bind(category_id.0);
        }

        rows_query
            .push(" ORDER BY p.created_at DESC LIMIT ")
            .push_bind(i64::from(query.page.limit))
            .push(" OFFSET ")
            .push_bind(query.page.offset());

        let items: Vec<ProductView> = rows_query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("Failed to list products", &e))?;
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to count products", &e))?;

        Ok(Page::new(items, total, query.page))
    }

    async fn create_product(&self, new: &NewProduct) -> Result<ProductView> {
        let id: Uuid = sqlx::query_scalar(
            r"
            INSERT INTO products
                (name, description, price, original_price, category_id,
                 size, color, brand, image, stock_quantity, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            ",
        )
        .bind(&new.name)
        .bind(new.description.as_deref())
        .bind(new.price)
        .bind(new.original_price)
        .bind(new.category_id.map(|c| c.0))
        .bind(new.size.as_deref())
        .bind(new.color.as_deref())
        .bind(new.brand.as_deref())
        .bind(new.image.as_deref())
        .bind(new.stock_quantity)
        .bind(new.is_featured)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to create product", &e))?;

        self.product_view(ProductId(id)).await
    }

    async fn update_product(
        &self,
        product_id: ProductId,
        patch: &ProductPatch,
    ) -> Result<ProductView> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                original_price = COALESCE($5, original_price),
                category_id = COALESCE($6, category_id),
                size = COALESCE($7, size),
                color = COALESCE($8, color),
                brand = COALESCE($9, brand),
                image = COALESCE($10, image),
                stock_quantity = COALESCE($11, stock_quantity),
                is_featured = COALESCE($12, is_featured),
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(product_id.0)
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.price)
        .bind(patch.original_price)
        .bind(patch.category_id.map(|c| c.0))
        .bind(patch.size.as_deref())
        .bind(patch.color.as_deref())
        .bind(patch.brand.as_deref())
        .bind(patch.image.as_deref())
        .bind(patch.stock_quantity)
        .bind(patch.is_featured)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to update product", &e))?;

        if result.rows_affected() == 0 {
            return Err(CommerceError::ProductNotFound { product_id });
        }

        self.product_view(product_id).await
    }

    async fn delete_product(&self, product_id: ProductId) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete product", &e))?;

        if result.rows_affected() == 0 {
            return Err(CommerceError::ProductNotFound { product_id });
        }
        Ok(())
    }

    async fn create_category(&self, new: &NewCategory) -> Result<Category> {
        sqlx::query_as(
            r"
            INSERT INTO categories (name, description, image)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, image
            ",
        )
        .bind(&new.name)
        .bind(new.description.as_deref())
        .bind(new.image.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to create category", &e))
    }

    async fn update_category(
        &self,
        category_id: CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category> {
        sqlx::query_as(
            r"
            UPDATE categories
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                image = COALESCE($4, image)
            WHERE id = $1
            RETURNING id, name, description, image
            ",
        )
        .bind(category_id.0)
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.image.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to update category", &e))?
        .ok_or(CommerceError::CategoryNotFound { category_id })
    }

    async fn delete_category(&self, category_id: CategoryId) -> Result<()> {
        // Application-layer referential guard: existence first, then
        // products referencing the category.
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(category_id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("Failed to check category", &e))?;
        if !exists {
            return Err(CommerceError::CategoryNotFound { category_id });
        }

        let in_use: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE category_id = $1)")
                .bind(category_id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_err("Failed to check category references", &e))?;
        if in_use {
            return Err(CommerceError::CategoryInUse { category_id });
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete category", &e))?;
        Ok(())
    }
}
