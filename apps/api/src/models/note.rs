use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Note {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub title: String,
    pub content: Option<String>,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub tags: Vec<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, complete set of writable note columns.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteFields {
    pub folder_id: Option<Uuid>,
    pub title: String,
    pub content: Option<String>,
    pub is_favorite: bool,
    pub is_archived: bool,
    pub tags: Vec<String>,
}

impl From<&Note> for NoteFields {
    fn from(note: &Note) -> Self {
        NoteFields {
            folder_id: note.folder_id,
            title: note.title.clone(),
            content: note.content.clone(),
            is_favorite: note.is_favorite,
            is_archived: note.is_archived,
            tags: note.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteSortField {
    Title,
    CreatedAt,
    #[default]
    UpdatedAt,
}

impl NoteSortField {
    pub fn column(self) -> &'static str {
        match self {
            NoteSortField::Title => "title",
            NoteSortField::CreatedAt => "created_at",
            NoteSortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Validated search over a caller's live notes.
#[derive(Debug, Clone, Default)]
pub struct NoteQuery {
    pub text: Option<String>,
    pub folder_id: Option<Uuid>,
    pub tag: Option<String>,
    pub is_favorite: Option<bool>,
    pub is_archived: Option<bool>,
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
    pub sort_by: NoteSortField,
    pub direction: SortDirection,
    pub page: u32,
    pub page_size: u32,
}

impl NoteQuery {
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }
}
