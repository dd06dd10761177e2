use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("No user with email '{0}'")]
    EmailNotFound(String),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Old password is incorrect")]
    IncorrectPassword,

    #[error("Password reset token is invalid or expired")]
    InvalidResetToken,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => {
                AppError::NotFound(format!("User does not found with id : {}", id))
            }
            UserError::EmailNotFound(_) => {
                AppError::NotFound("User not found with this email".to_string())
            }
            UserError::DuplicateEmail(_) => AppError::BadRequest("Email is exists".to_string()),
            UserError::InvalidCredentials => {
                AppError::Unauthorized("Invalid Email or Password".to_string())
            }
            UserError::IncorrectPassword => {
                AppError::BadRequest("Old password is incorrect".to_string())
            }
            UserError::InvalidResetToken => AppError::BadRequest(
                "Password reset token is invalid or has been expired".to_string(),
            ),
            UserError::PasswordMismatch => {
                AppError::BadRequest("Password does not match".to_string())
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Email(msg) => AppError::InternalServerError(msg),
            UserError::Database(msg) => AppError::Database(msg),
            UserError::PasswordHash(msg) | UserError::Token(msg) | UserError::Internal(msg) => {
                tracing::error!("Internal user error: {}", msg);
                AppError::InternalServerError("An internal error occurred".to_string())
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for UserError {
    fn from(err: validator::ValidationErrors) -> Self {
        UserError::Validation(err.to_string())
    }
}
