use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
#[error("invalid entity type '{0}'; expected one of note, task, folder, journal")]
pub struct UnknownEntityType(pub String);

/// The four entity kinds that can sit in the trash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrashEntityType {
    Note,
    Task,
    Folder,
    Journal,
}

impl TrashEntityType {
    /// Also the order in which the trash is emptied: notes before folders.
    pub const ALL: [TrashEntityType; 4] = [
        TrashEntityType::Note,
        TrashEntityType::Task,
        TrashEntityType::Folder,
        TrashEntityType::Journal,
    ];

    pub fn table(self) -> &'static str {
        match self {
            TrashEntityType::Note => "notes",
            TrashEntityType::Task => "tasks",
            TrashEntityType::Folder => "folders",
            TrashEntityType::Journal => "journal_entries",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrashEntityType::Note => "note",
            TrashEntityType::Task => "task",
            TrashEntityType::Folder => "folder",
            TrashEntityType::Journal => "journal",
        }
    }
}

impl std::str::FromStr for TrashEntityType {
    type Err = UnknownEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "note" => Ok(TrashEntityType::Note),
            "task" => Ok(TrashEntityType::Task),
            "folder" => Ok(TrashEntityType::Folder),
            "journal" => Ok(TrashEntityType::Journal),
            _ => Err(UnknownEntityType(s.to_string())),
        }
    }
}

impl TryFrom<String> for TrashEntityType {
    type Error = UnknownEntityType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One soft-deleted row, as listed by the trash.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TrashItem {
    #[sqlx(try_from = "String")]
    pub entity_type: TrashEntityType,
    pub id: Uuid,
    pub title: String,
    pub deleted_at: DateTime<Utc>,
    pub folder_name: Option<String>,
}

/// Rows removed by emptying the trash, per entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmptyTrashSummary {
    pub notes: u64,
    pub tasks: u64,
    pub folders: u64,
    pub journal: u64,
    pub total: u64,
}

impl EmptyTrashSummary {
    pub fn new(notes: u64, tasks: u64, folders: u64, journal: u64) -> Self {
        EmptyTrashSummary {
            notes,
            tasks,
            folders,
            journal,
            total: notes + tasks + folders + journal,
        }
    }
}
