use axum::extract::State;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::Json;
use crate::models::user_config::UserConfig;
use crate::response::Reply;
use crate::state::AppState;
use crate::user_config::service::{self, UserConfigRequest};

/// GET /api/configuracionusuario
pub async fn handle_get(State(state): State<AppState>, user: AuthUser) -> Result<Reply<UserConfig>, AppError> {
    let config = service::get_or_create_default(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Settings retrieved", config))
}

/// PUT /api/configuracionusuario
pub async fn handle_update(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UserConfigRequest>,
) -> Result<Reply<UserConfig>, AppError> {
    let config = service::update(&state.repos, user.user_id, req).await?;
    Ok(Reply::ok("Settings updated", config))
}

/// POST /api/configuracionusuario/restablecer
pub async fn handle_reset(State(state): State<AppState>, user: AuthUser) -> Result<Reply<UserConfig>, AppError> {
    let config = service::reset(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Settings reset to defaults", config))
}
