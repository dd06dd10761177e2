use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::{OsRng, RngCore},
    },
};
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::mailer::{LogMailer, ResetMailer};
use crate::models::{
    LoginRequest, RegisterRequest, ResetPasswordRequest, UpdatePasswordRequest,
    UpdateProfileRequest, UpdateUserRequest, User,
};
use crate::repository::UserRepository;

/// Lifetime of a password reset token.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 30;

const RESET_TOKEN_BYTES: usize = 20;

/// Hex SHA-256 of a reset token, the form kept in storage.
pub fn hash_reset_token(token: &str) -> String {
    const_hex::encode(Sha256::digest(token.as_bytes()))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    mailer: Arc<dyn ResetMailer>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            mailer: Arc::new(LogMailer),
        }
    }

    pub fn with_mailer(mut self, mailer: impl ResetMailer + 'static) -> Self {
        self.mailer = Arc::new(mailer);
        self
    }

    /// Create an account with the `user` role
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<User> {
        input.validate()?;

        let email = normalize_email(&input.email);
        if self.repository.get_by_email(&email).await?.is_some() {
            return Err(UserError::DuplicateEmail(email));
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(
            input.name.trim().to_string(),
            email,
            password_hash,
            input.avatar.unwrap_or_default(),
        );

        self.repository.create(user).await
    }

    /// Check credentials, failing the same way for unknown email and wrong password
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginRequest) -> UserResult<User> {
        input.validate()?;

        let user = self
            .repository
            .get_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Wrong password");
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Issue a reset token and mail `{base_url}/api/v1/password/reset/{token}`.
    ///
    /// Returns the address the link went to.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str, base_url: &str) -> UserResult<String> {
        let email = normalize_email(email);
        let mut user = self
            .repository
            .get_by_email(&email)
            .await?
            .ok_or_else(|| UserError::EmailNotFound(email.clone()))?;

        let token = generate_reset_token();
        user.reset_password_token = Some(hash_reset_token(&token));
        user.reset_password_expire = Some(Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES));
        let mut user = self.repository.update(user).await?;

        let reset_url = format!(
            "{}/api/v1/password/reset/{}",
            base_url.trim_end_matches('/'),
            token
        );

        if let Err(e) = self.mailer.send_reset_link(&user.email, &reset_url).await {
            tracing::warn!(user_id = %user.id, error = %e, "Reset mail failed, discarding token");
            user.clear_reset_token();
            self.repository.update(user).await?;
            return Err(e);
        }

        Ok(user.email)
    }

    /// Set a new password using an emailed reset token
    #[instrument(skip(self, token, input))]
    pub async fn reset_password(&self, token: &str, input: ResetPasswordRequest) -> UserResult<User> {
        input.validate()?;

        let token_hash = hash_reset_token(token);
        let mut user = self
            .repository
            .get_by_reset_token(&token_hash)
            .await?
            .filter(|user| user.reset_token_matches(&token_hash, Utc::now()))
            .ok_or(UserError::InvalidResetToken)?;

        if input.password != input.confirm_password {
            return Err(UserError::PasswordMismatch);
        }

        user.password_hash = hash_password(&input.password)?;
        user.clear_reset_token();

        tracing::info!(user_id = %user.id, "Password reset");
        self.repository.update(user).await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, input))]
    pub async fn update_password(&self, id: &str, input: UpdatePasswordRequest) -> UserResult<User> {
        input.validate()?;

        let mut user = self.get_user(id).await?;
        if !verify_password(&input.old_password, &user.password_hash)? {
            return Err(UserError::IncorrectPassword);
        }

        user.password_hash = hash_password(&input.password)?;
        self.repository.update(user).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_profile(&self, id: &str, input: UpdateProfileRequest) -> UserResult<User> {
        input.validate()?;

        let mut user = self.get_user(id).await?;
        user.name = input.name.trim().to_string();
        user.email = normalize_email(&input.email);
        self.repository.update(user).await
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.list().await
    }

    /// Admin update of name, email and role
    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: &str, input: UpdateUserRequest) -> UserResult<User> {
        input.validate()?;

        let mut user = self.get_user(id).await?;
        user.name = input.name.trim().to_string();
        user.email = normalize_email(&input.email);
        user.role = input.role;
        self.repository.update(user).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            mailer: Arc::clone(&self.mailer),
        }
    }
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    const_hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MockResetMailer;
    use crate::models::Role;
    use crate::repository::InMemoryUserRepository;
    use std::sync::Mutex;

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Jane".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            avatar: None,
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    /// Mailer that records the URL it was asked to send.
    fn capturing_mailer(sent: Arc<Mutex<Vec<String>>>) -> MockResetMailer {
        let mut mailer = MockResetMailer::new();
        mailer.expect_send_reset_link().returning(move |_, url| {
            sent.lock().unwrap().push(url.to_string());
            Ok(())
        });
        mailer
    }

    fn token_from(url: &str) -> &str {
        url.rsplit('/').next().unwrap()
    }

    #[test]
    fn test_hash_reset_token_is_sha256_hex() {
        assert_eq!(
            hash_reset_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_generated_tokens_are_hex_and_distinct() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_eq!(a.len(), RESET_TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let service = UserService::new(InMemoryUserRepository::new());
        let user = service.register(register_request("Jane@Example.com")).await.unwrap();

        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.role, Role::User);
        assert_ne!(user.password_hash, "secret1");

        let logged_in = service
            .login(login_request("jane@example.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = UserService::new(InMemoryUserRepository::new());
        service.register(register_request("jane@example.com")).await.unwrap();

        let err = service.register(register_request("jane@example.com")).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = UserService::new(InMemoryUserRepository::new());
        service.register(register_request("jane@example.com")).await.unwrap();

        let wrong_password = service.login(login_request("jane@example.com", "wrong-pass")).await;
        let unknown_email = service.login(login_request("nobody@example.com", "secret1")).await;

        assert!(matches!(wrong_password, Err(UserError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_forgot_and_reset_password() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let service = UserService::new(InMemoryUserRepository::new())
            .with_mailer(capturing_mailer(sent.clone()));
        service.register(register_request("jane@example.com")).await.unwrap();

        let email = service
            .forgot_password("jane@example.com", "http://shop.test/")
            .await
            .unwrap();
        assert_eq!(email, "jane@example.com");

        let url = sent.lock().unwrap()[0].clone();
        assert!(url.starts_with("http://shop.test/api/v1/password/reset/"));

        let reset = ResetPasswordRequest {
            password: "newpass1".to_string(),
            confirm_password: "newpass1".to_string(),
        };
        let user = service.reset_password(token_from(&url), reset.clone()).await.unwrap();
        assert!(user.reset_password_token.is_none());

        service
            .login(login_request("jane@example.com", "newpass1"))
            .await
            .unwrap();

        // Tokens are single use
        let err = service.reset_password(token_from(&url), reset).await.unwrap_err();
        assert!(matches!(err, UserError::InvalidResetToken));
    }

    #[tokio::test]
    async fn test_reset_password_mismatch() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let service = UserService::new(InMemoryUserRepository::new())
            .with_mailer(capturing_mailer(sent.clone()));
        service.register(register_request("jane@example.com")).await.unwrap();
        service.forgot_password("jane@example.com", "http://shop.test").await.unwrap();

        let url = sent.lock().unwrap()[0].clone();
        let reset = ResetPasswordRequest {
            password: "newpass1".to_string(),
            confirm_password: "newpass2".to_string(),
        };

        let err = service.reset_password(token_from(&url), reset).await.unwrap_err();
        assert!(matches!(err, UserError::PasswordMismatch));
    }

    #[tokio::test]
    async fn test_expired_reset_token_is_rejected() {
        let repository = InMemoryUserRepository::new();
        let mut user = User::new(
            "Jane".to_string(),
            "jane@example.com".to_string(),
            hash_password("secret1").unwrap(),
            Default::default(),
        );
        user.reset_password_token = Some(hash_reset_token("stale"));
        user.reset_password_expire = Some(Utc::now() - Duration::minutes(1));
        repository.create(user).await.unwrap();

        let service = UserService::new(repository);
        let reset = ResetPasswordRequest {
            password: "newpass1".to_string(),
            confirm_password: "newpass1".to_string(),
        };

        let err = service.reset_password("stale", reset).await.unwrap_err();
        assert!(matches!(err, UserError::InvalidResetToken));
    }

    #[tokio::test]
    async fn test_failed_mail_discards_token() {
        let mut mailer = MockResetMailer::new();
        mailer
            .expect_send_reset_link()
            .returning(|_, _| Err(UserError::Email("smtp down".to_string())));

        let service = UserService::new(InMemoryUserRepository::new()).with_mailer(mailer);
        let user = service.register(register_request("jane@example.com")).await.unwrap();

        let err = service
            .forgot_password("jane@example.com", "http://shop.test")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Email(_)));

        let stored = service.get_user(&user.id).await.unwrap();
        assert!(stored.reset_password_token.is_none());
        assert!(stored.reset_password_expire.is_none());
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email() {
        let mut mailer = MockResetMailer::new();
        mailer.expect_send_reset_link().never();

        let service = UserService::new(InMemoryUserRepository::new()).with_mailer(mailer);
        let err = service
            .forgot_password("nobody@example.com", "http://shop.test")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_password_checks_old_password() {
        let service = UserService::new(InMemoryUserRepository::new());
        let user = service.register(register_request("jane@example.com")).await.unwrap();

        let wrong = UpdatePasswordRequest {
            old_password: "not-it".to_string(),
            password: "newpass1".to_string(),
        };
        assert!(matches!(
            service.update_password(&user.id, wrong).await,
            Err(UserError::IncorrectPassword)
        ));

        let right = UpdatePasswordRequest {
            old_password: "secret1".to_string(),
            password: "newpass1".to_string(),
        };
        service.update_password(&user.id, right).await.unwrap();
        service
            .login(login_request("jane@example.com", "newpass1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_admin_update_and_delete() {
        let service = UserService::new(InMemoryUserRepository::new());
        let user = service.register(register_request("jane@example.com")).await.unwrap();

        let update = UpdateUserRequest {
            name: "Jane Admin".to_string(),
            email: "jane@example.com".to_string(),
            role: Role::Admin,
        };
        let updated = service.update_user(&user.id, update).await.unwrap();
        assert_eq!(updated.role, Role::Admin);

        service.delete_user(&user.id).await.unwrap();
        assert!(matches!(
            service.delete_user(&user.id).await,
            Err(UserError::NotFound(_))
        ));
    }
}
