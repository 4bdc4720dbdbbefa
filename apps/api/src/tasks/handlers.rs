use axum::extract::State;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{Json, Path};
use crate::models::task::{KanbanColumn, Task, TaskStats};
use crate::models::trash::TrashEntityType;
use crate::response::Reply;
use crate::state::AppState;
use crate::tasks::service::{self, MoveTaskRequest, TaskRequest};
use crate::trash::handlers::{reply_purged, reply_restored};
use crate::trash::service as trash;

/// GET /api/tareas
pub async fn handle_list(State(state): State<AppState>, user: AuthUser) -> Result<Reply<Vec<Task>>, AppError> {
    let tasks = service::list(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Tasks retrieved", tasks))
}

/// GET /api/tareas/pendientes
pub async fn handle_pending(State(state): State<AppState>, user: AuthUser) -> Result<Reply<Vec<Task>>, AppError> {
    let tasks = service::pending(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Pending tasks retrieved", tasks))
}

/// GET /api/tareas/vencidas
pub async fn handle_overdue(State(state): State<AppState>, user: AuthUser) -> Result<Reply<Vec<Task>>, AppError> {
    let tasks = service::overdue(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Overdue tasks retrieved", tasks))
}

/// GET /api/tareas/kanban
pub async fn handle_kanban(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Reply<Vec<KanbanColumn>>, AppError> {
    let board = service::kanban(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Kanban board retrieved", board))
}

/// GET /api/tareas/estadisticas
pub async fn handle_stats(State(state): State<AppState>, user: AuthUser) -> Result<Reply<TaskStats>, AppError> {
    let stats = service::stats(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Task statistics retrieved", stats))
}

/// GET /api/tareas/estado/:status
pub async fn handle_by_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(status): Path<String>,
) -> Result<Reply<Vec<Task>>, AppError> {
    let tasks = service::by_status(&state.repos, user.user_id, &status).await?;
    Ok(Reply::ok("Tasks retrieved", tasks))
}

/// GET /api/tareas/prioridad/:priority
pub async fn handle_by_priority(
    State(state): State<AppState>,
    user: AuthUser,
    Path(priority): Path<i16>,
) -> Result<Reply<Vec<Task>>, AppError> {
    let tasks = service::by_priority(&state.repos, user.user_id, priority).await?;
    Ok(Reply::ok("Tasks retrieved", tasks))
}

/// GET /api/tareas/:id
pub async fn handle_get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<Task>, AppError> {
    let task = service::get(&state.repos, user.user_id, id).await?;
    Ok(Reply::ok("Task retrieved", task))
}

/// POST /api/tareas
pub async fn handle_create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<TaskRequest>,
) -> Result<Reply<Task>, AppError> {
    let task = service::create(&state.repos, user.user_id, req).await?;
    Ok(Reply::created("Task created", task))
}

/// PUT /api/tareas/:id
pub async fn handle_update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<TaskRequest>,
) -> Result<Reply<Task>, AppError> {
    let task = service::update(&state.repos, user.user_id, id, req).await?;
    Ok(Reply::ok("Task updated", task))
}

/// PATCH /api/tareas/:id/completar
pub async fn handle_toggle_complete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<Task>, AppError> {
    let task = service::toggle_complete(&state.repos, user.user_id, id).await?;
    Ok(Reply::ok("Task completion toggled", task))
}

/// PUT /api/tareas/:id/mover
pub async fn handle_move(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveTaskRequest>,
) -> Result<Reply<Task>, AppError> {
    let task = service::move_to_status(&state.repos, user.user_id, id, req).await?;
    Ok(Reply::ok("Task moved", task))
}

/// DELETE /api/tareas/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<()>, AppError> {
    service::send_to_trash(&state.repos, user.user_id, id).await?;
    Ok(Reply::message("Task moved to trash"))
}

/// POST /api/tareas/:id/restaurar
pub async fn handle_restore(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<bool>, AppError> {
    let restored = trash::restore(&state.repos, TrashEntityType::Task, id, user.user_id).await?;
    reply_restored(restored, TrashEntityType::Task, id)
}

/// DELETE /api/tareas/:id/permanente
pub async fn handle_delete_permanently(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Reply<bool>, AppError> {
    let purged = trash::purge(&state.repos, TrashEntityType::Task, id, user.user_id).await?;
    reply_purged(purged, TrashEntityType::Task, id)
}
