use axum::extract::State;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{Json, Path, Query};
use crate::journal::service::{
    self, CreateEntryRequest, ListParams, PinCheck, PinRequest, PinStatus, RemoveGlobalPinRequest,
    SetGlobalPinRequest, UpdateEntryRequest,
};
use crate::models::journal::JournalEntryView;
use crate::response::Reply;
use crate::state::AppState;
use crate::validation::parse_date;

/// GET /api/diario
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Reply<Vec<JournalEntryView>>, AppError> {
    let entries = service::list(&state.repos, user.user_id, params).await?;
    Ok(Reply::ok("Journal entries retrieved", entries))
}

/// POST /api/diario
pub async fn handle_create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<CreateEntryRequest>,
) -> Result<Reply<JournalEntryView>, AppError> {
    let entry = service::create_entry(&state.repos, state.hasher.as_ref(), user.user_id, req).await?;
    Ok(Reply::created("Journal entry created", entry))
}

/// GET /api/diario/:fecha
pub async fn handle_get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(fecha): Path<String>,
) -> Result<Reply<JournalEntryView>, AppError> {
    let date = parse_date("fecha", &fecha)?;
    let entry = service::get_entry(&state.repos, user.user_id, date).await?;
    Ok(Reply::ok("Journal entry retrieved", entry))
}

/// PUT /api/diario/:fecha
pub async fn handle_update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(fecha): Path<String>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Reply<JournalEntryView>, AppError> {
    let date = parse_date("fecha", &fecha)?;
    let entry = service::update_entry(&state.repos, state.hasher.as_ref(), user.user_id, date, req).await?;
    Ok(Reply::ok("Journal entry updated", entry))
}

/// DELETE /api/diario/:fecha
pub async fn handle_delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(fecha): Path<String>,
) -> Result<Reply<()>, AppError> {
    let date = parse_date("fecha", &fecha)?;
    service::send_to_trash(&state.repos, user.user_id, date).await?;
    Ok(Reply::message("Journal entry moved to trash"))
}

/// POST /api/diario/:fecha/verificar-pin
pub async fn handle_verify_pin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(fecha): Path<String>,
    Json(req): Json<PinRequest>,
) -> Result<Reply<PinCheck>, AppError> {
    let date = parse_date("fecha", &fecha)?;
    let valid = service::verify_pin(&state.repos, state.hasher.as_ref(), user.user_id, date, &req.pin).await?;
    let message = if valid { "PIN is correct" } else { "PIN is incorrect" };
    Ok(Reply::ok(message, PinCheck { valid }))
}

/// POST /api/diario/:fecha/desbloquear
pub async fn handle_unlock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(fecha): Path<String>,
    Json(req): Json<PinRequest>,
) -> Result<Reply<JournalEntryView>, AppError> {
    let date = parse_date("fecha", &fecha)?;
    let entry = service::unlock_entry(&state.repos, state.hasher.as_ref(), user.user_id, date, &req.pin).await?;
    Ok(Reply::ok("Journal entry unlocked", entry))
}

/// GET /api/diario/pin
pub async fn handle_pin_status(State(state): State<AppState>, user: AuthUser) -> Result<Reply<PinStatus>, AppError> {
    let has_pin = service::has_global_pin(&state.repos, user.user_id).await?;
    Ok(Reply::ok("Diary PIN status", PinStatus { has_pin }))
}

/// PUT /api/diario/pin
pub async fn handle_set_pin(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<SetGlobalPinRequest>,
) -> Result<Reply<()>, AppError> {
    service::set_global_pin(&state.repos, state.hasher.as_ref(), user.user_id, req).await?;
    Ok(Reply::message("Diary PIN saved"))
}

/// DELETE /api/diario/pin
pub async fn handle_remove_pin(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<RemoveGlobalPinRequest>,
) -> Result<Reply<()>, AppError> {
    service::remove_global_pin(&state.repos, state.hasher.as_ref(), user.user_id, req).await?;
    Ok(Reply::message("Diary PIN removed"))
}

/// POST /api/diario/pin/verificar
pub async fn handle_verify_global_pin(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PinRequest>,
) -> Result<Reply<PinCheck>, AppError> {
    let valid = service::verify_global_pin(&state.repos, state.hasher.as_ref(), user.user_id, &req.pin).await?;
    let message = if valid { "PIN is correct" } else { "PIN is incorrect" };
    Ok(Reply::ok(message, PinCheck { valid }))
}
