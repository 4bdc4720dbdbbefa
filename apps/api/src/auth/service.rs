use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::SecretHasher;
use crate::auth::tokens::TokenService;
use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::store::Repositories;
use crate::validation::Validator;

pub const MIN_PASSWORD_LEN: usize = 6;
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct TokenStatus {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(
    repos: &Repositories,
    hasher: &dyn SecretHasher,
    tokens: &TokenService,
    req: RegisterRequest,
) -> Result<AuthPayload, AppError> {
    let mut v = Validator::new();
    let email = normalize_email(&req.email);
    v.check(
        email.contains('@') && email.len() >= 3 && email.len() <= 254,
        "email must be a valid address",
    );
    v.check(
        req.password.chars().count() >= MIN_PASSWORD_LEN,
        format!("password must be at least {MIN_PASSWORD_LEN} characters"),
    );
    let display_name = v.required("display_name", &req.display_name, 100);
    v.finish()?;

    let user = repos
        .users
        .create(&NewUser {
            email,
            password_hash: hasher.hash(&req.password).await?,
            display_name,
        })
        .await?;
    info!("Registered user {}", user.id);

    let token = tokens.issue(user.id, &user.email)?;
    Ok(AuthPayload { token, user })
}

pub async fn login(
    repos: &Repositories,
    hasher: &dyn SecretHasher,
    tokens: &TokenService,
    req: LoginRequest,
) -> Result<AuthPayload, AppError> {
    let email = normalize_email(&req.email);
    let Some(user) = repos.users.find_by_email(&email).await? else {
        warn!("Login attempt for unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };
    if !hasher.verify(&req.password, &user.password_hash).await {
        warn!("Failed login for user {}", user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }
    if !user.is_active {
        return Err(AppError::Forbidden("Account is disabled".to_string()));
    }

    repos.users.record_login(user.id).await?;
    let token = tokens.issue(user.id, &user.email)?;
    Ok(AuthPayload { token, user })
}

/// Never fails: an unusable token is reported as `valid: false`.
pub fn validate_token(tokens: &TokenService, token: &str) -> TokenStatus {
    match tokens.validate(token.trim()) {
        Ok(claims) => TokenStatus {
            valid: true,
            user_id: Some(claims.sub),
        },
        Err(_) => TokenStatus {
            valid: false,
            user_id: None,
        },
    }
}

pub async fn current_user(repos: &Repositories, user_id: Uuid) -> Result<User, AppError> {
    repos
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
