use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::Path;
use crate::models::trash::{EmptyTrashSummary, TrashEntityType, TrashItem};
use crate::response::Reply;
use crate::state::AppState;
use crate::trash::service;

#[derive(Serialize)]
pub struct TrashCount {
    pub count: i64,
}

/// Restore outcome as a reply; `false` from the service is a 404.
pub fn reply_restored(restored: bool, entity_type: TrashEntityType, id: Uuid) -> Result<Reply<bool>, AppError> {
    if restored {
        Ok(Reply::ok(format!("{} restored", entity_type.as_str()), true))
    } else {
        Err(AppError::NotFound(format!(
            "No trashed {} with id {id}",
            entity_type.as_str()
        )))
    }
}

pub fn reply_purged(purged: bool, entity_type: TrashEntityType, id: Uuid) -> Result<Reply<bool>, AppError> {
    if purged {
        Ok(Reply::ok(format!("{} permanently deleted", entity_type.as_str()), true))
    } else {
        Err(AppError::NotFound(format!(
            "No trashed {} with id {id}",
            entity_type.as_str()
        )))
    }
}

/// GET /api/papelera
pub async fn handle_list(State(state): State<AppState>, user: AuthUser) -> Result<Reply<Vec<TrashItem>>, AppError> {
    let items = service::list_trashed(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Trash retrieved", items))
}

/// GET /api/papelera/contar
pub async fn handle_count(State(state): State<AppState>, user: AuthUser) -> Result<Reply<TrashCount>, AppError> {
    let count = service::count(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Trash counted", TrashCount { count }))
}

/// POST /api/papelera/:tipo/:id/restaurar
pub async fn handle_restore(
    State(state): State<AppState>,
    user: AuthUser,
    Path((tipo, id)): Path<(String, Uuid)>,
) -> Result<Reply<bool>, AppError> {
    let entity_type = service::parse_entity_type(&tipo)?;
    let restored = service::restore(&state.repos, entity_type, id, user.user_id).await?;
    reply_restored(restored, entity_type, id)
}

/// DELETE /api/papelera/:tipo/:id
pub async fn handle_purge(
    State(state): State<AppState>,
    user: AuthUser,
    Path((tipo, id)): Path<(String, Uuid)>,
) -> Result<Reply<bool>, AppError> {
    let entity_type = service::parse_entity_type(&tipo)?;
    let purged = service::purge(&state.repos, entity_type, id, user.user_id).await?;
    reply_purged(purged, entity_type, id)
}

/// DELETE /api/papelera/vaciar
pub async fn handle_empty(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Reply<EmptyTrashSummary>, AppError> {
    let summary = service::empty_all(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Trash emptied", summary))
}
