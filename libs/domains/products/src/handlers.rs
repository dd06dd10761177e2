//! HTTP handlers for the catalog

use axum::{
    extract::State,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use axum_helpers::{
    authorize_roles, jwt_auth_middleware, JwtAuth, JwtClaims, QueryParams, RequiredRoles,
    UuidPath, ValidatedJson,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ProductResult;
use crate::models::{Product, ProductInput};
use crate::repository::ProductRepository;
use crate::service::ProductService;

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub count: usize,
    pub product_count: u64,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Catalog routes, all behind the JWT middleware.
///
/// Updating and deleting additionally require the `admin` role.
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let admin = Router::new()
        .route(
            "/admin/products/{id}",
            put(update_product).delete(delete_product),
        )
        .route_layer(middleware::from_fn_with_state(
            RequiredRoles::new(["admin"]),
            authorize_roles,
        ));

    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/admin/products/new", post(create_product))
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware))
        .with_state(shared_service)
}

/// `GET /products?keyword=&page=&size=&sort=&<field>[gte]=`
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    QueryParams(params): QueryParams,
) -> ProductResult<Json<ProductListResponse>> {
    let page = service.list_products(params).await?;
    Ok(Json(ProductListResponse {
        success: true,
        count: page.count,
        product_count: page.product_count,
        products: page.products,
    }))
}

async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.get_product(&id.to_string()).await?;
    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    claims: JwtClaims,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.create_product(input, Some(claims.sub)).await?;
    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> ProductResult<Json<ProductResponse>> {
    let product = service.update_product(&id.to_string(), input).await?;
    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<MessageResponse>> {
    service.delete_product(&id.to_string()).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Product is deleted".to_string(),
    }))
}
