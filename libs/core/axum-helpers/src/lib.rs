//! # Axum Helpers
//!
//! Building blocks shared by the HTTP services.
//!
//! - **[`auth`]**: stateless JWT issuance, auth and role middleware, token cookie
//! - **[`server`]**: router layers, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: structured error responses with error codes
//! - **[`extractors`]**: UUID path, validated JSON and query-parameter extractors

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{
    JwtAuth, JwtClaims, JwtConfig, RequiredRoles, TOKEN_COOKIE, authorize_roles,
    clear_token_cookie, cookie_value, jwt_auth_middleware, token_cookie,
};

pub use server::{
    API_PREFIX, HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app,
    create_production_app, create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, parse_origins, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse, error_response};

pub use extractors::{QueryParams, UuidPath, ValidatedJson};
