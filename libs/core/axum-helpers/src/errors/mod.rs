pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Error as UuidError;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// {
///   "success": false,
///   "code": 1004,
///   "error": "NOT_FOUND",
///   "message": "Product not found"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    pub message: String,
    /// Structured details such as validation field errors
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Error type returned by handlers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON parsing error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    #[error("UUID error: {0}")]
    UuidError(#[from] UuidError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Status, client message, details and code for this error.
    fn parts(self) -> (StatusCode, String, Option<serde_json::Value>, ErrorCode) {
        match self {
            AppError::SerdeJson(e) => {
                tracing::error!(error_code = ErrorCode::SerdeJsonError.code(), "JSON parsing error: {:?}", e);
                server_error(ErrorCode::SerdeJsonError)
            }
            AppError::Database(e) => {
                tracing::error!(error_code = ErrorCode::DatabaseError.code(), "Database error: {}", e);
                server_error(ErrorCode::DatabaseError)
            }
            AppError::Io(e) => {
                tracing::error!(error_code = ErrorCode::IoError.code(), "I/O error: {:?}", e);
                server_error(ErrorCode::IoError)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = ErrorCode::JsonExtraction.code(), "JSON extraction error: {:?}", e);
                (e.status(), e.body_text(), None, ErrorCode::JsonExtraction)
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Validation error: {:?}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError.default_message().to_string(),
                    serde_json::to_value(&e).ok(),
                    ErrorCode::ValidationError,
                )
            }
            AppError::UuidError(e) => {
                tracing::warn!(error_code = ErrorCode::InvalidUuid.code(), "UUID error: {:?}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidUuid.default_message().to_string(),
                    None,
                    ErrorCode::InvalidUuid,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::BadRequest)
            }
            AppError::Unauthorized(msg) => {
                tracing::info!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, msg, None, ErrorCode::Unauthorized)
            }
            AppError::Forbidden(msg) => {
                tracing::info!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, msg, None, ErrorCode::Forbidden)
            }
            AppError::NotFound(msg) => {
                tracing::info!(error_code = ErrorCode::NotFound.code(), "Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg, None, ErrorCode::NotFound)
            }
            AppError::Conflict(msg) => {
                tracing::info!("Conflict: {}", msg);
                (StatusCode::CONFLICT, msg, None, ErrorCode::Conflict)
            }
            AppError::UnprocessableEntity(msg) => {
                tracing::info!("Unprocessable entity: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg, None, ErrorCode::UnprocessableEntity)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal server error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None, ErrorCode::InternalError)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg, None, ErrorCode::ServiceUnavailable)
            }
        }
    }
}

fn server_error(code: ErrorCode) -> (StatusCode, String, Option<serde_json::Value>, ErrorCode) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        code.default_message().to_string(),
        None,
        code,
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = self.parts();

        let mut body = ErrorResponse::new(code, message);
        body.details = details;

        (status, Json(body)).into_response()
    }
}

/// Build an error response outside of [`AppError`], e.g. in middleware.
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_keeps_message() {
        let response = AppError::NotFound("Product not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_of(response).await;
        assert!(!body.success);
        assert_eq!(body.error, "NOT_FOUND");
        assert_eq!(body.message, "Product not found");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let response = AppError::Database("connection reset by peer".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.code, 2003);
        assert_eq!(body.message, "Database error occurred");
    }

    #[tokio::test]
    async fn test_bad_request_code() {
        let response = AppError::BadRequest("Email is exists".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_of(response).await.error, "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_error_response_helper() {
        let response = error_response(
            StatusCode::FORBIDDEN,
            "Role (user) is not allowed to access this resource".to_string(),
            ErrorCode::Forbidden,
        );
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_of(response).await.code, 1007);
    }
}
