use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::task::{Priority, Task, TaskFields, TaskStats};

/// Order shared by every task listing: open first, most urgent first, then
/// earliest due date.
const TASK_ORDER: &str = "ORDER BY is_completed, priority DESC, due_date ASC NULLS LAST, created_at, id";

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError>;
    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, AppError>;
    async fn create(&self, owner_id: Uuid, fields: &TaskFields) -> Result<Task, AppError>;
    async fn update(&self, owner_id: Uuid, id: Uuid, fields: &TaskFields) -> Result<Option<Task>, AppError>;
    /// Flips completion in place. `None` when no live task matched.
    async fn toggle_complete(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, AppError>;
    async fn pending(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError>;
    async fn overdue(&self, owner_id: Uuid, today: NaiveDate) -> Result<Vec<Task>, AppError>;
    async fn by_status(&self, owner_id: Uuid, status: &str) -> Result<Vec<Task>, AppError>;
    async fn by_priority(&self, owner_id: Uuid, priority: Priority) -> Result<Vec<Task>, AppError>;
    async fn stats(&self, owner_id: Uuid, today: NaiveDate) -> Result<TaskStats, AppError>;
    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        PgTaskRepository { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        let sql = format!("SELECT * FROM tasks WHERE owner_id = $1 AND deleted_at IS NULL {TASK_ORDER}");
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create(&self, owner_id: Uuid, fields: &TaskFields) -> Result<Task, AppError> {
        Ok(sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks
                (owner_id, title, description, is_completed, priority, due_date, completed_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.is_completed)
        .bind(i16::from(fields.priority))
        .bind(fields.due_date)
        .bind(fields.completed_at)
        .bind(&fields.status)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, fields: &TaskFields) -> Result<Option<Task>, AppError> {
        Ok(sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, is_completed = $5, priority = $6,
                due_date = $7, completed_at = $8, status = $9
            WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.is_completed)
        .bind(i16::from(fields.priority))
        .bind(fields.due_date)
        .bind(fields.completed_at)
        .bind(&fields.status)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn toggle_complete(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, AppError> {
        // Right-hand sides see the pre-update row.
        Ok(sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET is_completed = NOT is_completed,
                completed_at = CASE WHEN is_completed THEN NULL ELSE now() END,
                status = CASE WHEN is_completed THEN 'pending' ELSE 'completed' END
            WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn pending(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        let sql = format!("SELECT * FROM pending_tasks WHERE owner_id = $1 {TASK_ORDER}");
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn overdue(&self, owner_id: Uuid, today: NaiveDate) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT * FROM pending_tasks WHERE owner_id = $1 AND due_date < $2 {TASK_ORDER}"
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .bind(today)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn by_status(&self, owner_id: Uuid, status: &str) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT * FROM tasks WHERE owner_id = $1 AND status = $2 AND deleted_at IS NULL {TASK_ORDER}"
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn by_priority(&self, owner_id: Uuid, priority: Priority) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT * FROM tasks WHERE owner_id = $1 AND priority = $2 AND deleted_at IS NULL {TASK_ORDER}"
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .bind(i16::from(priority))
            .fetch_all(&self.pool)
            .await?)
    }

    async fn stats(&self, owner_id: Uuid, today: NaiveDate) -> Result<TaskStats, AppError> {
        Ok(sqlx::query_as::<_, TaskStats>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE is_completed) AS completed,
                   COUNT(*) FILTER (WHERE NOT is_completed) AS pending,
                   COUNT(*) FILTER (WHERE NOT is_completed AND due_date < $2) AS overdue
            FROM tasks
            WHERE owner_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(owner_id)
        .bind(today)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = now() WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = NULL WHERE id = $1 AND owner_id = $2 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM tasks WHERE id = $1 AND owner_id = $2 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
