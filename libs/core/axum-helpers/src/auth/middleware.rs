use super::cookie::{TOKEN_COOKIE, cookie_value};
use super::jwt::{JwtAuth, JwtClaims};
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use std::sync::Arc;

/// Bearer token from `Authorization`, falling back to the `token` cookie.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| cookie_value(headers, TOKEN_COOKIE))
}

/// Reject unauthenticated requests and expose [`JwtClaims`] to handlers.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/me", get(profile))
///     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_token(request.headers()) else {
        tracing::debug!("No JWT found in Authorization header or cookie");
        return Err(AppError::Unauthorized(
            "Login first to access this resource".to_string(),
        ));
    };

    let claims = auth.verify_token(&token).map_err(|e| {
        tracing::debug!("JWT verification failed: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Json Web Token is expired. Try again!!!".to_string())
            }
            _ => AppError::Unauthorized("Json Web Token is invalid. Try again!!!".to_string()),
        }
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Roles allowed through [`authorize_roles`].
#[derive(Debug, Clone)]
pub struct RequiredRoles(Arc<[String]>);

impl RequiredRoles {
    pub fn new<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, role: &str) -> bool {
        self.0.iter().any(|allowed| allowed == role)
    }
}

/// Reject requests whose token role is not in [`RequiredRoles`].
///
/// Must run after [`jwt_auth_middleware`].
pub async fn authorize_roles(
    State(roles): State<RequiredRoles>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(claims) = request.extensions().get::<JwtClaims>() else {
        return Err(AppError::Unauthorized(
            "Login first to access this resource".to_string(),
        ));
    };

    if !roles.allows(&claims.role) {
        tracing::info!(user_id = %claims.sub, role = %claims.role, "Role not permitted");
        return Err(AppError::Forbidden(format!(
            "Role ({}) is not allowed to access this resource",
            claims.role
        )));
    }

    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for JwtClaims
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<JwtClaims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Login first to access this resource".to_string()))
    }
}
