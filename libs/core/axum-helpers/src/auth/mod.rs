//! Stateless JWT authentication.
//!
//! Tokens are HS256-signed and travel either as `Authorization: Bearer` or in
//! the HttpOnly `token` cookie.
//!
//! ```ignore
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/me", get(handler))
//!     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod cookie;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use cookie::{TOKEN_COOKIE, clear_token_cookie, cookie_value, token_cookie};
pub use jwt::{JwtAuth, JwtClaims};
pub use middleware::{RequiredRoles, authorize_roles, jwt_auth_middleware};
