use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::task::{
    KanbanColumn, Priority, Task, TaskFields, TaskStats, DEFAULT_COLUMNS, STATUS_COMPLETED,
    STATUS_PENDING,
};
use crate::store::Repositories;
use crate::validation::Validator;

pub const MAX_STATUS_LEN: usize = 50;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<i16>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub is_completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    pub status: String,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Task {id} not found"))
}

pub fn parse_priority(value: i16) -> Result<Priority, AppError> {
    Priority::try_from(value).map_err(|e| AppError::validation(e.to_string()))
}

/// Kanban statuses are free text: trimmed, 1 to 50 characters.
pub fn normalize_status(status: &str) -> Result<String, AppError> {
    let mut v = Validator::new();
    let status = v.required("status", status, MAX_STATUS_LEN);
    v.finish()?;
    Ok(status)
}

/// Applies a request on top of `base`. An explicit status wins over
/// `is_completed`; completion always follows the status.
fn apply(base: TaskFields, req: TaskRequest) -> Result<TaskFields, AppError> {
    let mut v = Validator::new();
    let title = v.required("title", &req.title, 200);
    let description = v.optional("description", req.description, 2000);
    let priority = match req.priority {
        Some(p) => match Priority::try_from(p) {
            Ok(p) => p,
            Err(e) => {
                v.fail(e.to_string());
                base.priority
            }
        },
        None => base.priority,
    };
    let status = match req.status {
        Some(s) => v.required("status", &s, MAX_STATUS_LEN),
        None => match req.is_completed {
            Some(true) => STATUS_COMPLETED.to_string(),
            Some(false) if base.status == STATUS_COMPLETED => STATUS_PENDING.to_string(),
            _ => base.status.clone(),
        },
    };
    v.finish()?;

    Ok(TaskFields {
        title,
        description,
        priority,
        due_date: req.due_date,
        ..base
    }
    .with_status(status, Utc::now()))
}

fn blank_task() -> TaskFields {
    TaskFields {
        title: String::new(),
        description: None,
        is_completed: false,
        priority: Priority::default(),
        due_date: None,
        completed_at: None,
        status: STATUS_PENDING.to_string(),
    }
}

/// Fixed columns first, then any other status alphabetically.
pub fn group_by_status(tasks: Vec<Task>) -> Vec<KanbanColumn> {
    let mut columns: Vec<KanbanColumn> = DEFAULT_COLUMNS
        .iter()
        .map(|s| KanbanColumn {
            status: s.to_string(),
            tasks: Vec::new(),
        })
        .collect();
    let mut extra: Vec<KanbanColumn> = Vec::new();

    for task in tasks {
        if let Some(col) = columns.iter_mut().find(|c| c.status == task.status) {
            col.tasks.push(task);
        } else if let Some(col) = extra.iter_mut().find(|c| c.status == task.status) {
            col.tasks.push(task);
        } else {
            extra.push(KanbanColumn {
                status: task.status.clone(),
                tasks: vec![task],
            });
        }
    }

    extra.sort_by(|a, b| a.status.cmp(&b.status));
    columns.extend(extra);
    columns
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub async fn list(repos: &Repositories, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
    repos.tasks.list(owner_id).await
}

pub async fn get(repos: &Repositories, owner_id: Uuid, id: Uuid) -> Result<Task, AppError> {
    repos.tasks.get(owner_id, id).await?.ok_or_else(|| not_found(id))
}

pub async fn create(repos: &Repositories, owner_id: Uuid, req: TaskRequest) -> Result<Task, AppError> {
    let fields = apply(blank_task(), req)?;
    let task = repos.tasks.create(owner_id, &fields).await?;
    info!("Created task {} for user {owner_id}", task.id);
    Ok(task)
}

pub async fn update(repos: &Repositories, owner_id: Uuid, id: Uuid, req: TaskRequest) -> Result<Task, AppError> {
    let current = get(repos, owner_id, id).await?;
    let fields = apply(TaskFields::from(&current), req)?;
    repos
        .tasks
        .update(owner_id, id, &fields)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn toggle_complete(repos: &Repositories, owner_id: Uuid, id: Uuid) -> Result<Task, AppError> {
    repos
        .tasks
        .toggle_complete(owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Rewrites the whole task with its current values and the new column.
pub async fn move_to_status(
    repos: &Repositories,
    owner_id: Uuid,
    id: Uuid,
    req: MoveTaskRequest,
) -> Result<Task, AppError> {
    let status = normalize_status(&req.status)?;
    let current = get(repos, owner_id, id).await?;
    let fields = TaskFields::from(&current).with_status(status, Utc::now());
    repos
        .tasks
        .update(owner_id, id, &fields)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn pending(repos: &Repositories, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
    repos.tasks.pending(owner_id).await
}

pub async fn overdue(repos: &Repositories, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
    repos.tasks.overdue(owner_id, today()).await
}

pub async fn by_status(repos: &Repositories, owner_id: Uuid, status: &str) -> Result<Vec<Task>, AppError> {
    let status = normalize_status(status)?;
    repos.tasks.by_status(owner_id, &status).await
}

pub async fn by_priority(repos: &Repositories, owner_id: Uuid, priority: i16) -> Result<Vec<Task>, AppError> {
    let priority = parse_priority(priority)?;
    repos.tasks.by_priority(owner_id, priority).await
}

pub async fn kanban(repos: &Repositories, owner_id: Uuid) -> Result<Vec<KanbanColumn>, AppError> {
    Ok(group_by_status(repos.tasks.list(owner_id).await?))
}

pub async fn stats(repos: &Repositories, owner_id: Uuid) -> Result<TaskStats, AppError> {
    repos.tasks.stats(owner_id, today()).await
}

pub async fn send_to_trash(repos: &Repositories, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
    if !repos.tasks.soft_delete(owner_id, id).await? {
        return Err(not_found(id));
    }
    info!("Task {id} moved to trash by user {owner_id}");
    Ok(())
}
