use axum::extract::State;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{Json, Path, Query};
use crate::models::note::Note;
use crate::models::page::Page;
use crate::models::trash::TrashEntityType;
use crate::notes::repository::NoteScope;
use crate::notes::service::{self, MoveNoteRequest, NoteRequest, SearchParams, ToggleResult};
use crate::response::Reply;
use crate::state::AppState;
use crate::trash::handlers::{reply_purged, reply_restored};
use crate::trash::service as trash;

/// GET /api/notas
pub async fn handle_list(State(state): State<AppState>, user: AuthUser) -> Result<Reply<Vec<Note>>, AppError> {
    let notes = service::list(&state.repos, user.user_id, NoteScope::Active).await?;
    Ok(Reply::ok("Notes retrieved", notes))
}

/// GET /api/notas/favoritas
pub async fn handle_favorites(State(state): State<AppState>, user: AuthUser) -> Result<Reply<Vec<Note>>, AppError> {
    let notes = service::list(&state.repos, user.user_id, NoteScope::Favorites).await?;
    Ok(Reply::ok("Favorite notes retrieved", notes))
}

/// GET /api/notas/archivadas
pub async fn handle_archived(State(state): State<AppState>, user: AuthUser) -> Result<Reply<Vec<Note>>, AppError> {
    let notes = service::list(&state.repos, user.user_id, NoteScope::Archived).await?;
    Ok(Reply::ok("Archived notes retrieved", notes))
}

/// GET /api/notas/carpeta/:folder_id
pub async fn handle_by_folder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(folder_id): Path<Uuid>,
) -> Result<Reply<Vec<Note>>, AppError> {
    let notes = service::list(&state.repos, user.user_id, NoteScope::Folder(folder_id)).await?;
    Ok(Reply::ok("Folder notes retrieved", notes))
}

/// GET /api/notas/buscar
pub async fn handle_search(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Reply<Page<Note>>, AppError> {
    let page = service::search(&state.repos, user.user_id, params).await?;
    Ok(Reply::ok("Search completed", page))
}

/// GET /api/notas/etiquetas
pub async fn handle_tags(State(state): State<AppState>, user: AuthUser) -> Result<Reply<Vec<String>>, AppError> {
    let tags = service::tags(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Tags retrieved", tags))
}

/// GET /api/notas/:id
pub async fn handle_get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<Note>, AppError> {
    let note = service::get(&state.repos, user.user_id, id).await?;
    Ok(Reply::ok("Note retrieved", note))
}

/// POST /api/notas
pub async fn handle_create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<NoteRequest>,
) -> Result<Reply<Note>, AppError> {
    let note = service::create(&state.repos, user.user_id, req).await?;
    Ok(Reply::created("Note created", note))
}

/// PUT /api/notas/:id
pub async fn handle_update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<NoteRequest>,
) -> Result<Reply<Note>, AppError> {
    let note = service::update(&state.repos, user.user_id, id, req).await?;
    Ok(Reply::ok("Note updated", note))
}

/// PATCH /api/notas/:id/favorita
pub async fn handle_toggle_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<ToggleResult>, AppError> {
    let result = service::toggle_favorite(&state.repos, user.user_id, id).await?;
    Ok(Reply::ok("Favorite flag updated", result))
}

/// PATCH /api/notas/:id/archivar
pub async fn handle_toggle_archived(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<ToggleResult>, AppError> {
    let result = service::toggle_archived(&state.repos, user.user_id, id).await?;
    Ok(Reply::ok("Archived flag updated", result))
}

/// PUT /api/notas/:id/mover
pub async fn handle_move(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveNoteRequest>,
) -> Result<Reply<Note>, AppError> {
    let note = service::move_to_folder(&state.repos, user.user_id, id, req).await?;
    Ok(Reply::ok("Note moved", note))
}

/// DELETE /api/notas/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<()>, AppError> {
    service::send_to_trash(&state.repos, user.user_id, id).await?;
    Ok(Reply::message("Note moved to trash"))
}

/// POST /api/notas/:id/restaurar
pub async fn handle_restore(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<bool>, AppError> {
    let restored = trash::restore(&state.repos, TrashEntityType::Note, id, user.user_id).await?;
    reply_restored(restored, TrashEntityType::Note, id)
}

/// DELETE /api/notas/:id/permanente
pub async fn handle_delete_permanently(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<bool>, AppError> {
    let purged = trash::purge(&state.repos, TrashEntityType::Note, id, user.user_id).await?;
    reply_purged(purged, TrashEntityType::Note, id)
}
