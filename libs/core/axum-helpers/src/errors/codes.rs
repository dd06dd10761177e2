//! Error codes carried by every error response.
//!
//! Each code has a string identifier for clients, an integer for logs and a
//! default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    ValidationError,
    InvalidUuid,
    JsonExtraction,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    UnprocessableEntity,
    BadRequest,

    // Server errors (1000s)
    InternalError,
    ServiceUnavailable,

    // Database errors (2000s)
    DatabaseError,

    // I/O errors (4000s)
    IoError,

    // Serialization errors (5000s)
    SerdeJsonError,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::UnprocessableEntity => "UNPROCESSABLE_ENTITY",
            Self::BadRequest => "BAD_REQUEST",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::IoError => "IO_ERROR",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
        }
    }

    /// Integer code used in structured logs.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::Conflict => 1008,
            Self::UnprocessableEntity => 1009,
            Self::BadRequest => 1010,
            Self::ServiceUnavailable => 1011,
            Self::DatabaseError => 2003,
            Self::IoError => 4001,
            Self::SerdeJsonError => 5001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Login first to access this resource",
            Self::Forbidden => "Access forbidden",
            Self::Conflict => "Resource already exists",
            Self::UnprocessableEntity => "Request cannot be processed",
            Self::BadRequest => "Bad request",
            Self::InternalError => "Internal Server Error",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::DatabaseError => "Database error occurred",
            Self::IoError => "I/O error occurred",
            Self::SerdeJsonError => "JSON serialization error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_identifiers() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::BadRequest.as_str(), "BAD_REQUEST");
        assert_eq!(ErrorCode::DatabaseError.code(), 2003);
        assert_eq!(ErrorCode::NotFound.to_string(), "NOT_FOUND");
    }

    #[test]
    fn test_error_code_serde_uses_identifier() {
        let json = serde_json::to_string(&ErrorCode::InvalidUuid).unwrap();
        assert_eq!(json, "\"INVALID_UUID\"");

        let code: ErrorCode = serde_json::from_str("\"FORBIDDEN\"").unwrap();
        assert_eq!(code, ErrorCode::Forbidden);
    }

    #[test]
    fn test_integer_codes_are_unique() {
        let all = [
            ErrorCode::ValidationError,
            ErrorCode::InvalidUuid,
            ErrorCode::JsonExtraction,
            ErrorCode::NotFound,
            ErrorCode::Unauthorized,
            ErrorCode::Forbidden,
            ErrorCode::Conflict,
            ErrorCode::UnprocessableEntity,
            ErrorCode::BadRequest,
            ErrorCode::InternalError,
            ErrorCode::ServiceUnavailable,
            ErrorCode::DatabaseError,
            ErrorCode::IoError,
            ErrorCode::SerdeJsonError,
        ];
        let codes: std::collections::HashSet<i32> = all.iter().map(ErrorCode::code).collect();
        assert_eq!(codes.len(), all.len());
    }
}
