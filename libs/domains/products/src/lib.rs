//! Products Domain
//!
//! The shop's catalog: products listed through the `api_features` query
//! pipeline and managed by authenticated users and admins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, JWT and role guards
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Query pipeline, validation, upsert rules
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB and in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let repository = MongoProductRepository::new(&client.database("shop"));
//! let service = ProductService::new(repository);
//!
//! let auth = JwtAuth::new(&JwtConfig::new("a-signing-secret-of-at-least-32-chars", 3600)?);
//! let router = handlers::router(service, auth);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use memory::InMemoryProductRepository;
pub use models::{Product, ProductImage, ProductInput, ProductPage, Review};
pub use crate::mongodb::MongoProductRepository;
pub use repository::ProductRepository;
pub use service::{ProductService, DEFAULT_PAGE_SIZE, NUMERIC_FIELDS};
