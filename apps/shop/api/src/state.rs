//! Shared application state handed to the route builders.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    pub db: Database,
    /// Token issuer and verifier shared by both domains
    pub auth: JwtAuth,
}
