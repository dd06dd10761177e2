//! Account, password recovery and user administration routes.

use axum::Router;
use domain_users::{MongoUserRepository, SessionSettings, UserService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let service = UserService::new(MongoUserRepository::new(&state.db));
    let settings = SessionSettings {
        secure_cookies: state.config.environment.secure_cookies(),
        public_url: state.config.public_url.clone(),
    };

    handlers::router(service, state.auth.clone(), settings)
}
