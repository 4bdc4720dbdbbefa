use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::errors::AppError;
use crate::models::journal::{JournalEntry, JournalFields};

fn date_taken(date: NaiveDate) -> AppError {
    AppError::Conflict(format!("A journal entry already exists for {date}"))
}

#[async_trait]
pub trait JournalRepository: Send + Sync {
    /// Live entries, newest date first, optionally bounded (inclusive).
    async fn list(
        &self,
        owner_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<JournalEntry>, AppError>;
    async fn get_by_date(&self, owner_id: Uuid, date: NaiveDate) -> Result<Option<JournalEntry>, AppError>;
    /// Fails with `Conflict` when a live entry already holds the date.
    async fn create(&self, owner_id: Uuid, date: NaiveDate, fields: &JournalFields) -> Result<JournalEntry, AppError>;
    async fn update(
        &self,
        owner_id: Uuid,
        date: NaiveDate,
        fields: &JournalFields,
    ) -> Result<Option<JournalEntry>, AppError>;
    async fn soft_delete(&self, owner_id: Uuid, date: NaiveDate) -> Result<bool, AppError>;
    /// Fails with `Conflict` when a live entry took the date meanwhile.
    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgJournalRepository {
    pool: PgPool,
}

impl PgJournalRepository {
    pub fn new(pool: PgPool) -> Self {
        PgJournalRepository { pool }
    }
}

#[async_trait]
impl JournalRepository for PgJournalRepository {
    async fn list(
        &self,
        owner_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<JournalEntry>, AppError> {
        Ok(sqlx::query_as::<_, JournalEntry>(
            r#"
            SELECT * FROM journal_entries
            WHERE owner_id = $1 AND deleted_at IS NULL
              AND ($2::date IS NULL OR entry_date >= $2)
              AND ($3::date IS NULL OR entry_date <= $3)
            ORDER BY entry_date DESC
            "#,
        )
        .bind(owner_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_by_date(&self, owner_id: Uuid, date: NaiveDate) -> Result<Option<JournalEntry>, AppError> {
        Ok(sqlx::query_as::<_, JournalEntry>(
            "SELECT * FROM journal_entries WHERE owner_id = $1 AND entry_date = $2 AND deleted_at IS NULL",
        )
        .bind(owner_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create(&self, owner_id: Uuid, date: NaiveDate, fields: &JournalFields) -> Result<JournalEntry, AppError> {
        sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (owner_id, entry_date, title, content, mood, pin_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(date)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(fields.mood)
        .bind(&fields.pin_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| if is_unique_violation(&e) { date_taken(date) } else { AppError::Database(e) })
    }

    async fn update(
        &self,
        owner_id: Uuid,
        date: NaiveDate,
        fields: &JournalFields,
    ) -> Result<Option<JournalEntry>, AppError> {
        Ok(sqlx::query_as::<_, JournalEntry>(
            r#"
            UPDATE journal_entries
            SET title = $3, content = $4, mood = $5, pin_hash = $6
            WHERE owner_id = $1 AND entry_date = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(date)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(fields.mood)
        .bind(&fields.pin_hash)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn soft_delete(&self, owner_id: Uuid, date: NaiveDate) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE journal_entries SET deleted_at = now()
            WHERE owner_id = $1 AND entry_date = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(owner_id)
        .bind(date)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE journal_entries SET deleted_at = NULL
            WHERE id = $1 AND owner_id = $2 AND deleted_at IS NOT NULL
            RETURNING entry_date
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await;
        match result {
            Ok(row) => Ok(row.is_some()),
            Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(
                "Another journal entry already exists for that date".to_string(),
            )),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM journal_entries WHERE id = $1 AND owner_id = $2 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
