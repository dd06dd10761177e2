//! API routes module
//!
//! Domain routers are nested under `/api/v1` by `axum_helpers::create_router`.

pub mod health;
pub mod products;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .merge(products::router(state))
        .merge(users::router(state))
}
