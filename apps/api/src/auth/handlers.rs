use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::extractor::AuthUser;
use crate::auth::service::{self, AuthPayload, LoginRequest, RegisterRequest, TokenStatus};
use crate::errors::AppError;
use crate::extract::Json;
use crate::models::user::User;
use crate::response::Reply;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ValidateRequest {
    pub token: String,
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Reply<AuthPayload>, AppError> {
    let payload = service::register(&state.repos, state.hasher.as_ref(), &state.tokens, req).await?;
    Ok(Reply::created("User registered", payload))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Reply<AuthPayload>, AppError> {
    let payload = service::login(&state.repos, state.hasher.as_ref(), &state.tokens, req).await?;
    Ok(Reply::ok("Login successful", payload))
}

/// POST /api/auth/validate
pub async fn handle_validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Reply<TokenStatus> {
    let status = service::validate_token(&state.tokens, &req.token);
    let message = if status.valid { "Token is valid" } else { "Token is invalid" };
    Reply::ok(message, status)
}

/// GET /api/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Reply<User>, AppError> {
    let me = service::current_user(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Current user", me))
}

/// GET /api/auth/health
pub async fn handle_health() -> Reply<Value> {
    Reply::ok(
        "Auth service is healthy",
        json!({ "status": "ok", "service": "auth", "version": env!("CARGO_PKG_VERSION") }),
    )
}
