use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use axum_helpers::{
    JwtAuth, JwtClaims, RequiredRoles, UuidPath, ValidatedJson, authorize_roles,
    clear_token_cookie, jwt_auth_middleware, token_cookie,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UpdatePasswordRequest, UpdateProfileRequest, UpdateUserRequest, User, UserResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// How issued tokens and reset links are presented to clients.
#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    /// Mark the token cookie `Secure`
    pub secure_cookies: bool,
    /// Base of reset links; the request's `Host` is used when unset
    pub public_url: Option<String>,
}

struct UsersState<R: UserRepository> {
    service: UserService<R>,
    auth: JwtAuth,
    settings: SessionSettings,
}

type SharedState<R> = State<Arc<UsersState<R>>>;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub success: bool,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UsersEnvelope {
    pub success: bool,
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Account and admin routes.
///
/// Registration, login, logout and password recovery are public; profile
/// routes need a token and `/admin/*` additionally the `admin` role.
pub fn router<R: UserRepository + 'static>(
    service: UserService<R>,
    auth: JwtAuth,
    settings: SessionSettings,
) -> Router {
    let state = Arc::new(UsersState {
        service,
        auth: auth.clone(),
        settings,
    });

    let admin = Router::new()
        .route("/admin/users", get(list_users))
        .route(
            "/admin/user/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            RequiredRoles::new(["admin"]),
            authorize_roles,
        ));

    let protected = Router::new()
        .route("/me", get(profile))
        .route("/me/update", put(update_profile))
        .route("/password/update", put(update_password))
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/password/forgot", post(forgot_password))
        .route("/password/reset/{token}", put(reset_password))
        .merge(protected)
        .with_state(state)
}

/// Issue a token for `user` as both the body and the `token` cookie.
fn send_token<R: UserRepository>(state: &UsersState<R>, user: User) -> UserResult<Response> {
    let role = user.role.to_string();
    let token = state
        .auth
        .create_token(&user.id, &user.email, &user.name, &role)
        .map_err(|e| UserError::Token(e.to_string()))?;

    let cookie = token_cookie(
        &token,
        state.auth.expires_in_secs(),
        state.settings.secure_cookies,
    );

    tracing::debug!(user_id = %user.id, "Token issued");
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(TokenResponse {
            success: true,
            token,
            user: user.into(),
        }),
    )
        .into_response())
}

fn user_envelope(user: User) -> Json<UserEnvelope> {
    Json(UserEnvelope {
        success: true,
        user: user.into(),
    })
}

async fn register<R: UserRepository>(
    State(state): SharedState<R>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<Response> {
    let user = state.service.register(input).await?;
    send_token(&state, user)
}

async fn login<R: UserRepository>(
    State(state): SharedState<R>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Response> {
    let user = state.service.login(input).await?;
    send_token(&state, user)
}

async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_token_cookie())],
        Json(MessageResponse {
            success: true,
            message: Some("Logged out".to_string()),
        }),
    )
}

async fn forgot_password<R: UserRepository>(
    State(state): SharedState<R>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<ForgotPasswordRequest>,
) -> UserResult<Json<MessageResponse>> {
    let base_url = match &state.settings.public_url {
        Some(url) => url.clone(),
        None => {
            let host = headers
                .get(header::HOST)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("localhost");
            format!("http://{}", host)
        }
    };

    let email = state.service.forgot_password(&input.email, &base_url).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: Some(format!("Email sent to: {}", email)),
    }))
}

async fn reset_password<R: UserRepository>(
    State(state): SharedState<R>,
    Path(token): Path<String>,
    ValidatedJson(input): ValidatedJson<ResetPasswordRequest>,
) -> UserResult<Response> {
    let user = state.service.reset_password(&token, input).await?;
    send_token(&state, user)
}

async fn profile<R: UserRepository>(
    State(state): SharedState<R>,
    claims: JwtClaims,
) -> UserResult<Json<UserEnvelope>> {
    let user = state.service.get_user(&claims.sub).await?;
    Ok(user_envelope(user))
}

async fn update_password<R: UserRepository>(
    State(state): SharedState<R>,
    claims: JwtClaims,
    ValidatedJson(input): ValidatedJson<UpdatePasswordRequest>,
) -> UserResult<Response> {
    let user = state.service.update_password(&claims.sub, input).await?;
    send_token(&state, user)
}

async fn update_profile<R: UserRepository>(
    State(state): SharedState<R>,
    claims: JwtClaims,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> UserResult<Json<UserEnvelope>> {
    let user = state.service.update_profile(&claims.sub, input).await?;
    Ok(user_envelope(user))
}

async fn list_users<R: UserRepository>(
    State(state): SharedState<R>,
) -> UserResult<Json<UsersEnvelope>> {
    let users = state.service.list_users().await?;
    Ok(Json(UsersEnvelope {
        success: true,
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

async fn get_user<R: UserRepository>(
    State(state): SharedState<R>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<UserEnvelope>> {
    let user = state.service.get_user(&id.to_string()).await?;
    Ok(user_envelope(user))
}

async fn update_user<R: UserRepository>(
    State(state): SharedState<R>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUserRequest>,
) -> UserResult<Json<UserEnvelope>> {
    let user = state.service.update_user(&id.to_string(), input).await?;
    Ok(user_envelope(user))
}

async fn delete_user<R: UserRepository>(
    State(state): SharedState<R>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<MessageResponse>> {
    state.service.delete_user(&id.to_string()).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: None,
    }))
}
