use api_features::QueryError;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => AppError::NotFound("Product not found".to_string()),
            ProductError::Validation(msg) => AppError::BadRequest(msg),
            ProductError::Query(QueryError::Database(e)) => AppError::Database(e.to_string()),
            ProductError::Query(e) => AppError::BadRequest(e.to_string()),
            ProductError::Database(msg) => AppError::Database(msg),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ProductError {
    fn from(err: validator::ValidationErrors) -> Self {
        ProductError::Validation(err.to_string())
    }
}
