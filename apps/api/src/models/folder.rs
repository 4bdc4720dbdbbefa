use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_COLOR: &str = "#6366f1";
pub const DEFAULT_ICON: &str = "folder";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Folder {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    pub display_order: i32,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Folder plus the number of live notes it holds.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FolderSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub folder: Folder,
    pub note_count: i64,
}

/// Validated, complete set of writable folder columns.
/// `display_order: None` on create means "append after the last folder".
#[derive(Debug, Clone)]
pub struct FolderFields {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: String,
    pub display_order: Option<i32>,
}
