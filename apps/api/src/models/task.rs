use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";

/// Columns every Kanban board shows, in display order.
pub const DEFAULT_COLUMNS: [&str; 3] = [STATUS_PENDING, STATUS_IN_PROGRESS, STATUS_COMPLETED];

#[derive(Debug, Error)]
#[error("priority must be between 1 and 4, got {0}")]
pub struct InvalidPriority(pub i16);

/// Task priority, persisted and serialized as its ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum Priority {
    Low = 1,
    #[default]
    Medium = 2,
    High = 3,
    Urgent = 4,
}

impl TryFrom<i16> for Priority {
    type Error = InvalidPriority;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            4 => Ok(Priority::Urgent),
            other => Err(InvalidPriority(other)),
        }
    }
}

impl From<Priority> for i16 {
    fn from(p: Priority) -> Self {
        p as i16
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    #[sqlx(try_from = "i16")]
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: String,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// Validated, complete set of writable task columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFields {
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: String,
}

impl From<&Task> for TaskFields {
    fn from(task: &Task) -> Self {
        TaskFields {
            title: task.title.clone(),
            description: task.description.clone(),
            is_completed: task.is_completed,
            priority: task.priority,
            due_date: task.due_date,
            completed_at: task.completed_at,
            status: task.status.clone(),
        }
    }
}

impl TaskFields {
    /// Moves the task to `status`, keeping completion in step with the
    /// `completed` column.
    pub fn with_status(mut self, status: String, now: DateTime<Utc>) -> Self {
        let completing = status == STATUS_COMPLETED;
        if completing && !self.is_completed {
            self.completed_at = Some(now);
        } else if !completing {
            self.completed_at = None;
        }
        self.is_completed = completing;
        self.status = status;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KanbanColumn {
    pub status: String,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub overdue: i64,
}
