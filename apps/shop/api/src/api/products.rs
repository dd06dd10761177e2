//! Catalog routes backed by the `products` collection.

use axum::Router;
use domain_products::{MongoProductRepository, ProductService, handlers};

use crate::state::AppState;

pub fn service(state: &AppState) -> ProductService<MongoProductRepository> {
    ProductService::new(MongoProductRepository::new(&state.db))
        .with_page_size(state.config.products_page_size)
}

pub fn router(state: &AppState) -> Router {
    handlers::router(service(state), state.auth.clone())
}
