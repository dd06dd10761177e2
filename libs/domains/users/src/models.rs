use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// User roles
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Hosted profile picture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub public_id: String,
    pub url: String,
}

impl Default for Avatar {
    fn default() -> Self {
        Self {
            public_id: "default".to_string(),
            url: "default".to_string(),
        }
    }
}

/// User entity as stored in MongoDB
///
/// Carries the password hash and reset token; API responses use
/// [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// UUID v7 string, stored as `_id`
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    /// Lowercased, unique
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    #[serde(default)]
    pub avatar: Avatar,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    /// Hex SHA-256 of the emailed reset token
    #[serde(default)]
    pub reset_password_token: Option<String>,
    #[serde(default)]
    pub reset_password_expire: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(name: String, email: String, password_hash: String, avatar: Avatar) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name,
            email,
            password_hash,
            avatar,
            role: Role::User,
            created_at: Utc::now(),
            reset_password_token: None,
            reset_password_expire: None,
        }
    }

    /// Whether `token_hash` is the stored reset token and has not expired at `now`.
    pub fn reset_token_matches(&self, token_hash: &str, now: DateTime<Utc>) -> bool {
        self.reset_password_token.as_deref() == Some(token_hash)
            && self.reset_password_expire.is_some_and(|expire| expire > now)
    }

    pub fn clear_reset_token(&mut self) {
        self.reset_password_token = None;
        self.reset_password_expire = None;
    }
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Avatar,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 30, message = "Your name cannot exceed 30 characters"))]
    pub name: String,
    #[validate(email(message = "Email invalid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Your password must be longer than 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub avatar: Option<Avatar>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email invalid"))]
    pub email: String,
    #[validate(length(min = 6, message = "Your password must be longer than 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Email invalid"))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, message = "Your password must be longer than 6 characters"))]
    pub password: String,
    #[serde(alias = "confirmPassword")]
    #[validate(length(
        min = 6,
        message = "Your confirm password must be longer than 6 characters"
    ))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[serde(alias = "oldPassword")]
    pub old_password: String,
    #[validate(length(min = 6, message = "Your password must be longer than 6 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 30, message = "Your name cannot exceed 30 characters"))]
    pub name: String,
    #[validate(email(message = "Email invalid"))]
    pub email: String,
}

/// Admin update of another user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 30, message = "Your name cannot exceed 30 characters"))]
    pub name: String,
    #[validate(email(message = "Email invalid"))]
    pub email: String,
    pub role: Role,
}
