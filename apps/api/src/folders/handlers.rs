use axum::extract::State;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{Json, Path};
use crate::folders::service::{self, FolderRequest, ReorderRequest};
use crate::models::folder::{Folder, FolderSummary};
use crate::response::Reply;
use crate::state::AppState;

/// GET /api/carpetas
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Reply<Vec<FolderSummary>>, AppError> {
    let folders = service::list(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Folders retrieved", folders))
}

/// GET /api/carpetas/:id
pub async fn handle_get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<Folder>, AppError> {
    let folder = service::get(&state.repos, user.user_id, id).await?;
    Ok(Reply::ok("Folder retrieved", folder))
}

/// POST /api/carpetas
pub async fn handle_create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<FolderRequest>,
) -> Result<Reply<Folder>, AppError> {
    let folder = service::create(&state.repos, user.user_id, req).await?;
    Ok(Reply::created("Folder created", folder))
}

/// PUT /api/carpetas/:id
pub async fn handle_update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<FolderRequest>,
) -> Result<Reply<Folder>, AppError> {
    let folder = service::update(&state.repos, user.user_id, id, req).await?;
    Ok(Reply::ok("Folder updated", folder))
}

/// PUT /api/carpetas/orden
pub async fn handle_reorder(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<ReorderRequest>,
) -> Result<Reply<()>, AppError> {
    service::reorder(&state.repos, user.user_id, req).await?;
    Ok(Reply::message("Folders reordered"))
}

/// DELETE /api/carpetas/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<()>, AppError> {
    service::send_to_trash(&state.repos, user.user_id, id).await?;
    Ok(Reply::message("Folder moved to trash"))
}
