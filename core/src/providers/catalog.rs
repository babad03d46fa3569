//! Catalog store trait.

use crate::error::Result;
use crate::model::{Category, CategoryId, ProductId, ProductView};
use crate::providers::{
    AdminProductQuery, CategoryPatch, NewCategory, NewProduct, Page, ProductFilter, ProductPatch,
};
use std::future::Future;

/// Product and category storage.
///
/// Covers the public storefront reads and the back-office CRUD. The one
/// write this trait does *not* own is the stock decrement at order time,
/// which belongs to the ledger's transaction.
pub trait CatalogStore: Send + Sync {
    /// Storefront product listing, newest first, category name joined.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> impl Future<Output = Result<Vec<ProductView>>> + Send;

    /// Single product with category name.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Product not found → `CommerceError::ProductNotFound`
    fn get_product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<ProductView>> + Send;

    /// All categories, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>>> + Send;

    /// Back-office paged product listing.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn list_products_paged(
        &self,
        query: &AdminProductQuery,
    ) -> impl Future<Output = Result<Page<ProductView>>> + Send;

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn create_product(
        &self,
        new: &NewProduct,
    ) -> impl Future<Output = Result<ProductView>> + Send;

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Product not found → `CommerceError::ProductNotFound`
    fn update_product(
        &self,
        product_id: ProductId,
        patch: &ProductPatch,
    ) -> impl Future<Output = Result<ProductView>> + Send;

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Product not found → `CommerceError::ProductNotFound`
    fn delete_product(&self, product_id: ProductId) -> impl Future<Output = Result<()>> + Send;

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns error if the database query fails.
    fn create_category(
        &self,
        new: &NewCategory,
    ) -> impl Future<Output = Result<Category>> + Send;

    /// Apply a partial update to a category.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Category not found → `CommerceError::CategoryNotFound`
    fn update_category(
        &self,
        category_id: CategoryId,
        patch: &CategoryPatch,
    ) -> impl Future<Output = Result<Category>> + Send;

    /// Delete a category.
    ///
    /// The referential guard lives here, in the application layer: deletion
    /// fails while any product references the category.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Database query fails
    /// - Category not found → `CommerceError::CategoryNotFound`
    /// - Products still reference it → `CommerceError::CategoryInUse`
    fn delete_category(&self, category_id: CategoryId)
        -> impl Future<Output = Result<()>> + Send;
}
