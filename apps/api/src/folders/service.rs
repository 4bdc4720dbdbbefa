use std::collections::HashSet;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::folder::{Folder, FolderFields, FolderSummary, DEFAULT_COLOR, DEFAULT_ICON};
use crate::store::Repositories;
use crate::validation::{is_hex_color, Validator};

#[derive(Debug, Clone, Deserialize)]
pub struct FolderRequest {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub folder_ids: Vec<Uuid>,
}

fn validate(req: FolderRequest) -> Result<FolderFields, AppError> {
    let mut v = Validator::new();
    let name = v.required("name", &req.name, 100);
    let description = v.optional("description", req.description, 500);
    let color = v
        .optional("color", req.color, 7)
        .unwrap_or_else(|| DEFAULT_COLOR.to_string());
    v.check(is_hex_color(&color), "color must be a hex value like #RRGGBB");
    let icon = v
        .optional("icon", req.icon, 50)
        .unwrap_or_else(|| DEFAULT_ICON.to_string());
    if let Some(order) = req.display_order {
        v.check(order >= 0, "display_order must not be negative");
    }
    v.finish()?;

    Ok(FolderFields {
        name,
        description,
        color,
        icon,
        display_order: req.display_order,
    })
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Folder {id} not found"))
}

pub async fn list(repos: &Repositories, owner_id: Uuid) -> Result<Vec<FolderSummary>, AppError> {
    repos.folders.list(owner_id).await
}

pub async fn get(repos: &Repositories, owner_id: Uuid, id: Uuid) -> Result<Folder, AppError> {
    repos.folders.get(owner_id, id).await?.ok_or_else(|| not_found(id))
}

pub async fn create(repos: &Repositories, owner_id: Uuid, req: FolderRequest) -> Result<Folder, AppError> {
    let fields = validate(req)?;
    let folder = repos.folders.create(owner_id, &fields).await?;
    info!("Created folder {} for user {owner_id}", folder.id);
    Ok(folder)
}

pub async fn update(
    repos: &Repositories,
    owner_id: Uuid,
    id: Uuid,
    req: FolderRequest,
) -> Result<Folder, AppError> {
    let fields = validate(req)?;
    repos
        .folders
        .update(owner_id, id, &fields)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn reorder(repos: &Repositories, owner_id: Uuid, req: ReorderRequest) -> Result<(), AppError> {
    if req.folder_ids.is_empty() {
        return Err(AppError::validation("folder_ids must not be empty"));
    }
    let unique: HashSet<_> = req.folder_ids.iter().collect();
    if unique.len() != req.folder_ids.len() {
        return Err(AppError::validation("folder_ids must not contain duplicates"));
    }
    if !repos.folders.reorder(owner_id, &req.folder_ids).await? {
        return Err(AppError::NotFound("One or more folders were not found".to_string()));
    }
    Ok(())
}

/// Moves the folder to the trash. Its notes stay where they are.
pub async fn send_to_trash(repos: &Repositories, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
    if !repos.folders.soft_delete(owner_id, id).await? {
        return Err(not_found(id));
    }
    info!("Folder {id} moved to trash by user {owner_id}");
    Ok(())
}
