use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::folder::{Folder, FolderFields, FolderSummary};

#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// Live folders by display order, with their live note counts.
    async fn list(&self, owner_id: Uuid) -> Result<Vec<FolderSummary>, AppError>;
    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Folder>, AppError>;
    async fn create(&self, owner_id: Uuid, fields: &FolderFields) -> Result<Folder, AppError>;
    async fn update(&self, owner_id: Uuid, id: Uuid, fields: &FolderFields) -> Result<Option<Folder>, AppError>;
    /// Sets `display_order` to each id's position. All-or-nothing: false when
    /// any id is not a live folder of the owner.
    async fn reorder(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<bool, AppError>;
    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

pub struct PgFolderRepository {
    pool: PgPool,
}

impl PgFolderRepository {
    pub fn new(pool: PgPool) -> Self {
        PgFolderRepository { pool }
    }
}

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<FolderSummary>, AppError> {
        Ok(sqlx::query_as::<_, FolderSummary>(
            r#"
            SELECT f.*,
                   (SELECT COUNT(*) FROM notes n
                    WHERE n.folder_id = f.id AND n.deleted_at IS NULL) AS note_count
            FROM folders f
            WHERE f.owner_id = $1 AND f.deleted_at IS NULL
            ORDER BY f.display_order, f.name
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Folder>, AppError> {
        Ok(sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create(&self, owner_id: Uuid, fields: &FolderFields) -> Result<Folder, AppError> {
        Ok(sqlx::query_as::<_, Folder>(
            r#"
            INSERT INTO folders (owner_id, name, description, color, icon, display_order)
            VALUES ($1, $2, $3, $4, $5,
                    COALESCE($6, (SELECT COALESCE(MAX(display_order) + 1, 0)
                                  FROM folders WHERE owner_id = $1 AND deleted_at IS NULL)))
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.color)
        .bind(&fields.icon)
        .bind(fields.display_order)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, fields: &FolderFields) -> Result<Option<Folder>, AppError> {
        Ok(sqlx::query_as::<_, Folder>(
            r#"
            UPDATE folders
            SET name = $3, description = $4, color = $5, icon = $6,
                display_order = COALESCE($7, display_order)
            WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.color)
        .bind(&fields.icon)
        .bind(fields.display_order)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn reorder(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        for (position, id) in ids.iter().enumerate() {
            let result = sqlx::query(
                r#"
                UPDATE folders SET display_order = $3
                WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL
                "#,
            )
            .bind(id)
            .bind(owner_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(false);
            }
        }
        tx.commit().await?;
        Ok(true)
    }

    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE folders SET deleted_at = now() WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE folders SET deleted_at = NULL WHERE id = $1 AND owner_id = $2 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        // notes.folder_id is ON DELETE SET NULL
        let result = sqlx::query(
            "DELETE FROM folders WHERE id = $1 AND owner_id = $2 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
