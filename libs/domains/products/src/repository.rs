use api_features::FindQuery;
use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::Product;

/// Product persistence.
///
/// Implemented over MongoDB and in memory; list queries arrive as a
/// backend-neutral [`FindQuery`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a new product
    async fn create(&self, product: Product) -> ProductResult<Product>;

    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>>;

    /// Products matching the query, in its order and window
    async fn find(&self, query: FindQuery) -> ProductResult<Vec<Product>>;

    /// Size of the whole collection
    async fn count(&self) -> ProductResult<u64>;

    /// Replace the product with the same id, inserting it when absent
    async fn upsert(&self, product: Product) -> ProductResult<Product>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: &str) -> ProductResult<bool>;

    /// Drop every product and insert `products`
    async fn replace_all(&self, products: Vec<Product>) -> ProductResult<u64>;
}
