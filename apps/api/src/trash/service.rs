//! The papelera: everything soft-deleted, across notes, tasks, folders and
//! journal entries. Single-row restore and purge dispatch on the entity type
//! to the owning repository.

use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::trash::{EmptyTrashSummary, TrashEntityType, TrashItem, UnknownEntityType};
use crate::store::Repositories;

impl From<UnknownEntityType> for AppError {
    fn from(err: UnknownEntityType) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Parses a path segment such as `note`. Runs before any storage access.
pub fn parse_entity_type(raw: &str) -> Result<TrashEntityType, AppError> {
    Ok(raw.parse::<TrashEntityType>()?)
}

pub async fn list_trashed(repos: &Repositories, owner_id: Uuid) -> Result<Vec<TrashItem>, AppError> {
    repos.trash.list(owner_id).await
}

pub async fn count(repos: &Repositories, owner_id: Uuid) -> Result<i64, AppError> {
    repos.trash.count(owner_id).await
}

/// False when no trashed row of that type and id belongs to the owner.
pub async fn restore(
    repos: &Repositories,
    entity_type: TrashEntityType,
    id: Uuid,
    owner_id: Uuid,
) -> Result<bool, AppError> {
    let restored = match entity_type {
        TrashEntityType::Note => repos.notes.restore(owner_id, id).await?,
        TrashEntityType::Task => repos.tasks.restore(owner_id, id).await?,
        TrashEntityType::Folder => repos.folders.restore(owner_id, id).await?,
        TrashEntityType::Journal => repos.journal.restore(owner_id, id).await?,
    };
    if restored {
        info!("Restored {} {id} for user {owner_id}", entity_type.as_str());
    }
    Ok(restored)
}

/// Permanently deletes a trashed row. Live rows are never purged.
pub async fn purge(
    repos: &Repositories,
    entity_type: TrashEntityType,
    id: Uuid,
    owner_id: Uuid,
) -> Result<bool, AppError> {
    let purged = match entity_type {
        TrashEntityType::Note => repos.notes.purge(owner_id, id).await?,
        TrashEntityType::Task => repos.tasks.purge(owner_id, id).await?,
        TrashEntityType::Folder => repos.folders.purge(owner_id, id).await?,
        TrashEntityType::Journal => repos.journal.purge(owner_id, id).await?,
    };
    if purged {
        info!("Purged {} {id} for user {owner_id}", entity_type.as_str());
    }
    Ok(purged)
}

pub async fn empty_all(repos: &Repositories, owner_id: Uuid) -> Result<EmptyTrashSummary, AppError> {
    let summary = repos.trash.empty_all(owner_id).await?;
    info!("Emptied trash for user {owner_id}: {} rows", summary.total);
    Ok(summary)
}
