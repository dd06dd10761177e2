use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
///
/// Emails are unique; `create` and `update` fail with
/// [`UserError::DuplicateEmail`] when another user holds the address.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: &str) -> UserResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    /// User holding the hashed reset token, expired or not
    async fn get_by_reset_token(&self, token_hash: &str) -> UserResult<Option<User>>;

    /// All users in insertion order
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Replace the stored user with the same id
    async fn update(&self, user: User) -> UserResult<User>;

    /// Returns `false` when nothing was deleted
    async fn delete(&self, id: &str) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &[User], email: &str, except_id: Option<&str>) -> bool {
    users
        .iter()
        .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id.as_str()) != except_id)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if email_taken(&users, &user.email, None) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.push(user.clone());
        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn get_by_reset_token(&self, token_hash: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|u| u.reset_password_token.as_deref() == Some(token_hash))
            .cloned())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if email_taken(&users, &user.email, Some(&user.id)) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        let existing = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| UserError::NotFound(user.id.clone()))?;
        *existing = user.clone();

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: &str) -> UserResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);

        let deleted = users.len() < before;
        if deleted {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(deleted)
    }
}
