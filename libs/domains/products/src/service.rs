//! Product Service - Business logic layer

use api_features::{ApiFeatures, FindQuery, ParameterMapping};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductInput, ProductPage};
use crate::repository::ProductRepository;

pub const DEFAULT_PAGE_SIZE: i64 = 4;

/// Product fields stored as numbers; equality filters on them compare numerically.
pub const NUMERIC_FIELDS: [&str; 4] = ["price", "rating", "stock", "num_of_reviews"];

/// Product service providing business logic operations
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    default_page_size: i64,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page size used when the request carries no usable `size`.
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.default_page_size = page_size;
        self
    }

    fn page_size(&self, params: &ParameterMapping) -> i64 {
        params
            .text("size")
            .and_then(|size| size.trim().parse::<i64>().ok())
            .unwrap_or(self.default_page_size)
    }

    /// One page of products narrowed by the request's query parameters.
    #[instrument(skip(self, params))]
    pub async fn list_products(&self, params: ParameterMapping) -> ProductResult<ProductPage> {
        let page_size = self.page_size(&params);
        let product_count = self.repository.count().await?;

        let query = ApiFeatures::new(FindQuery::new(), params)
            .with_numeric_fields(NUMERIC_FIELDS)
            .search()
            .filter()
            .pagination(page_size)
            .sort()
            .into_query();

        let products = self.repository.find(query).await?;
        tracing::debug!(count = products.len(), product_count, "Listed products");

        Ok(ProductPage {
            count: products.len(),
            product_count,
            products,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Create a product on behalf of `user`
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(
        &self,
        input: ProductInput,
        user: Option<String>,
    ) -> ProductResult<Product> {
        input.validate()?;
        self.repository.create(Product::new(input, user)).await
    }

    /// Replace the product under `id`, creating it when it does not exist.
    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: &str, input: ProductInput) -> ProductResult<Product> {
        input.validate()?;

        let existing = self.repository.get_by_id(id).await?;
        if existing.is_none() {
            tracing::info!(product_id = %id, "Product missing, creating it");
        }

        let product = Product::replacing(id.to_string(), input, existing.as_ref());
        self.repository.upsert(product).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &str) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Replace the whole catalog with `inputs`.
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn seed_products(&self, inputs: Vec<ProductInput>) -> ProductResult<u64> {
        let products = inputs
            .into_iter()
            .map(|input| {
                input.validate()?;
                Ok(Product::new(input, None))
            })
            .collect::<ProductResult<Vec<_>>>()?;

        self.repository.replace_all(products).await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            default_page_size: self.default_page_size,
        }
    }
}
