//! Database connectivity for the shop services.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB connector and health checks
//! - `config` - `MongoConfig` loading through `core_config::FromEnv`
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let products = client.database(&config.database).collection::<Product>("products");
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
