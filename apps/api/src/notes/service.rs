use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::note::{Note, NoteFields, NoteQuery, NoteSortField, SortDirection};
use crate::models::page::Page;
use crate::notes::repository::NoteScope;
use crate::store::Repositories;
use crate::validation::Validator;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
pub struct NoteRequest {
    pub title: String,
    pub content: Option<String>,
    pub folder_id: Option<Uuid>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoveNoteRequest {
    pub folder_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub folder_id: Option<Uuid>,
    pub tag: Option<String>,
    pub favorite: Option<bool>,
    pub archived: Option<bool>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort_by: Option<NoteSortField>,
    pub direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResult {
    pub id: Uuid,
    pub value: bool,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Note {id} not found"))
}

/// A referenced folder must be one of the caller's live folders.
async fn ensure_folder(repos: &Repositories, owner_id: Uuid, folder_id: Option<Uuid>) -> Result<(), AppError> {
    if let Some(folder_id) = folder_id {
        if repos.folders.get(owner_id, folder_id).await?.is_none() {
            return Err(AppError::validation(format!(
                "folder_id {folder_id} does not reference one of your folders"
            )));
        }
    }
    Ok(())
}

fn validate(req: NoteRequest) -> Result<NoteFields, AppError> {
    let mut v = Validator::new();
    let title = v.required("title", &req.title, 200);
    let content = req.content.filter(|c| !c.trim().is_empty());
    let tags = v.tags(req.tags);
    v.finish()?;

    Ok(NoteFields {
        folder_id: req.folder_id,
        title,
        content,
        is_favorite: req.is_favorite,
        is_archived: req.is_archived,
        tags,
    })
}

pub fn build_query(params: SearchParams) -> Result<NoteQuery, AppError> {
    let mut v = Validator::new();
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    v.check(page >= 1, "page must be at least 1");
    v.range("page_size", i64::from(page_size), 1, i64::from(MAX_PAGE_SIZE));
    if let (Some(from), Some(to)) = (params.from, params.to) {
        v.check(from <= to, "from must not be after to");
    }
    let text = v.optional("q", params.q, 200);
    let tag = v.optional("tag", params.tag, 50);
    v.finish()?;

    Ok(NoteQuery {
        text,
        folder_id: params.folder_id,
        tag,
        is_favorite: params.favorite,
        is_archived: params.archived,
        created_from: params.from,
        created_to: params.to,
        sort_by: params.sort_by.unwrap_or_default(),
        direction: params.direction.unwrap_or_default(),
        page,
        page_size,
    })
}

pub async fn list(repos: &Repositories, owner_id: Uuid, scope: NoteScope) -> Result<Vec<Note>, AppError> {
    if let NoteScope::Folder(folder_id) = scope {
        if repos.folders.get(owner_id, folder_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Folder {folder_id} not found")));
        }
    }
    repos.notes.list(owner_id, scope).await
}

pub async fn get(repos: &Repositories, owner_id: Uuid, id: Uuid) -> Result<Note, AppError> {
    repos.notes.get(owner_id, id).await?.ok_or_else(|| not_found(id))
}

pub async fn create(repos: &Repositories, owner_id: Uuid, req: NoteRequest) -> Result<Note, AppError> {
    let fields = validate(req)?;
    ensure_folder(repos, owner_id, fields.folder_id).await?;
    let note = repos.notes.create(owner_id, &fields).await?;
    info!("Created note {} for user {owner_id}", note.id);
    Ok(note)
}

/// Keeping the note's current folder is allowed even after that folder went
/// to the trash; only a change of folder must point at a live one.
pub async fn update(repos: &Repositories, owner_id: Uuid, id: Uuid, req: NoteRequest) -> Result<Note, AppError> {
    let fields = validate(req)?;
    let current = get(repos, owner_id, id).await?;
    if fields.folder_id != current.folder_id {
        ensure_folder(repos, owner_id, fields.folder_id).await?;
    }
    repos
        .notes
        .update(owner_id, id, &fields)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn toggle_favorite(repos: &Repositories, owner_id: Uuid, id: Uuid) -> Result<ToggleResult, AppError> {
    let value = repos
        .notes
        .toggle_favorite(owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ToggleResult { id, value })
}

pub async fn toggle_archived(repos: &Repositories, owner_id: Uuid, id: Uuid) -> Result<ToggleResult, AppError> {
    let value = repos
        .notes
        .toggle_archived(owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ToggleResult { id, value })
}

/// Rewrites the whole note with its current values and the new folder.
pub async fn move_to_folder(
    repos: &Repositories,
    owner_id: Uuid,
    id: Uuid,
    req: MoveNoteRequest,
) -> Result<Note, AppError> {
    let current = get(repos, owner_id, id).await?;
    ensure_folder(repos, owner_id, req.folder_id).await?;
    let fields = NoteFields {
        folder_id: req.folder_id,
        ..NoteFields::from(&current)
    };
    repos
        .notes
        .update(owner_id, id, &fields)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn search(repos: &Repositories, owner_id: Uuid, params: SearchParams) -> Result<Page<Note>, AppError> {
    let query = build_query(params)?;
    let (items, total) = repos.notes.search(owner_id, &query).await?;
    Ok(Page::new(items, total, query.page, query.page_size))
}

pub async fn tags(repos: &Repositories, owner_id: Uuid) -> Result<Vec<String>, AppError> {
    repos.notes.tags(owner_id).await
}

pub async fn send_to_trash(repos: &Repositories, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
    if !repos.notes.soft_delete(owner_id, id).await? {
        return Err(not_found(id));
    }
    info!("Note {id} moved to trash by user {owner_id}");
    Ok(())
}
