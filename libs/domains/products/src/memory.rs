//! In-memory ProductRepository, for tests and local runs without MongoDB.

use api_features::{memory, FindQuery};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::ProductResult;
use crate::models::Product;
use crate::repository::ProductRepository;

/// Products kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn find(&self, query: FindQuery) -> ProductResult<Vec<Product>> {
        let documents = {
            let products = self.products.read().await;
            memory::to_documents(products.as_slice())?
        };
        let matched = memory::evaluate(&query, documents)?;
        Ok(memory::from_documents(matched)?)
    }

    async fn count(&self) -> ProductResult<u64> {
        Ok(self.products.read().await.len() as u64)
    }

    async fn upsert(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => products.push(product.clone()),
        }
        Ok(product)
    }

    async fn delete(&self, id: &str) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }

    async fn replace_all(&self, products: Vec<Product>) -> ProductResult<u64> {
        let count = products.len() as u64;
        *self.products.write().await = products;
        Ok(count)
    }
}
