//! MongoDB implementation of ProductRepository

use api_features::{FindQuery, MongoQuery};
use async_trait::async_trait;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::Product;
use crate::repository::ProductRepository;

pub const COLLECTION: &str = "products";

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Product>(collection_name),
        }
    }

    /// Indexes backing the catalog's filters and sorts
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let index = |keys: Document, name: &str| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        };

        let indexes = vec![
            index(doc! { "category": 1, "price": 1 }, "idx_category_price"),
            index(doc! { "price": 1 }, "idx_price"),
            index(doc! { "created_at": -1 }, "idx_created_at"),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, product), fields(product_name = %product.name))]
    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: &str) -> ProductResult<Option<Product>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self, query))]
    async fn find(&self, query: FindQuery) -> ProductResult<Vec<Product>> {
        tracing::debug!(filter = %query.filter_document(), "Finding products");
        let products = MongoQuery::from_parts(self.collection.clone(), query)
            .execute()
            .await?;
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> ProductResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn upsert(&self, product: Product) -> ProductResult<Product> {
        self.collection
            .replace_one(doc! { "_id": product.id.as_str() }, &product)
            .upsert(true)
            .await?;

        tracing::info!(product_id = %product.id, "Product saved");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> ProductResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn replace_all(&self, products: Vec<Product>) -> ProductResult<u64> {
        let deleted = self.collection.delete_many(doc! {}).await?;
        tracing::info!(deleted = deleted.deleted_count, "Products deleted");

        if products.is_empty() {
            return Ok(0);
        }

        let inserted = self.collection.insert_many(&products).await?;
        tracing::info!(inserted = inserted.inserted_ids.len(), "Products added");
        Ok(inserted.inserted_ids.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::input;
    use api_features::{ApiFeatures, ParameterMapping};
    use mongodb::Client;

    async fn repository() -> MongoProductRepository {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = Client::with_uri_str(url).await.unwrap();
        MongoProductRepository::with_collection(&client.database("shop_test"), "products_test")
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_crud_round_trip() {
        let repo = repository().await;
        repo.replace_all(Vec::new()).await.unwrap();

        let product = repo
            .create(Product::new(input("Hub", "Accessories", 49.0), None))
            .await
            .unwrap();
        assert_eq!(repo.get_by_id(&product.id).await.unwrap(), Some(product.clone()));

        let mut changed = product.clone();
        changed.price = 39.0;
        repo.upsert(changed).await.unwrap();
        assert_eq!(repo.get_by_id(&product.id).await.unwrap().unwrap().price, 39.0);

        assert!(repo.delete(&product.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_find_with_features() {
        let repo = repository().await;
        repo.replace_all(vec![
            Product::new(input("USB Hub", "Accessories", 49.0), None),
            Product::new(input("Monitor", "Displays", 229.0), None),
            Product::new(input("usb cable", "Cables", 9.0), None),
        ])
        .await
        .unwrap();

        let params = ParameterMapping::from_query_str("keyword=usb&sort=price,asc");
        let query = ApiFeatures::new(FindQuery::new(), params)
            .search()
            .filter()
            .pagination(10)
            .sort()
            .into_query();

        let names: Vec<_> = repo
            .find(query)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["usb cable", "USB Hub"]);
    }
}
