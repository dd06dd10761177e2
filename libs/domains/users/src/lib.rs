//! Users Domain
//!
//! Accounts, authentication and administration for the shop.
//!
//! # Features
//!
//! - Registration and login issuing JWTs (body and HttpOnly cookie)
//! - Password hashing with Argon2
//! - Password recovery through single-use, 30 minute reset tokens
//! - Role-based access control for the admin routes
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, token cookie
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Password hashing, reset tokens, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB and in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_users::{InMemoryUserRepository, SessionSettings, UserService, handlers};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = UserService::new(InMemoryUserRepository::new());
//! let auth = JwtAuth::new(&JwtConfig::new("a-signing-secret-of-at-least-32-chars", 3600)?);
//!
//! let router = handlers::router(service, auth, SessionSettings::default());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod mailer;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use handlers::SessionSettings;
pub use mailer::{LogMailer, ResetMailer};
pub use models::{Avatar, Role, User, UserResponse};
pub use crate::mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
