use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::note::{Note, NoteFields, NoteQuery};

/// Which live notes a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteScope {
    /// Everything not archived.
    Active,
    Favorites,
    Archived,
    /// Non-archived notes in one folder.
    Folder(Uuid),
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Most recently updated first.
    async fn list(&self, owner_id: Uuid, scope: NoteScope) -> Result<Vec<Note>, AppError>;
    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Note>, AppError>;
    async fn create(&self, owner_id: Uuid, fields: &NoteFields) -> Result<Note, AppError>;
    async fn update(&self, owner_id: Uuid, id: Uuid, fields: &NoteFields) -> Result<Option<Note>, AppError>;
    /// Flips `is_favorite`; the new value, or `None` when no live note matched.
    async fn toggle_favorite(&self, owner_id: Uuid, id: Uuid) -> Result<Option<bool>, AppError>;
    async fn toggle_archived(&self, owner_id: Uuid, id: Uuid) -> Result<Option<bool>, AppError>;
    /// One page of matches plus the total match count.
    async fn search(&self, owner_id: Uuid, query: &NoteQuery) -> Result<(Vec<Note>, i64), AppError>;
    /// Distinct tags over live notes, sorted.
    async fn tags(&self, owner_id: Uuid) -> Result<Vec<String>, AppError>;
    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError>;
}

/// Escapes LIKE metacharacters so user text matches literally.
pub fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn push_search_filters(qb: &mut QueryBuilder<'_, Postgres>, owner_id: Uuid, query: &NoteQuery) {
    qb.push(" WHERE owner_id = ")
        .push_bind(owner_id)
        .push(" AND deleted_at IS NULL");
    if let Some(text) = &query.text {
        let pattern = format!("%{}%", escape_like(text));
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR content ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(folder_id) = query.folder_id {
        qb.push(" AND folder_id = ").push_bind(folder_id);
    }
    if let Some(tag) = &query.tag {
        qb.push(" AND EXISTS (SELECT 1 FROM unnest(tags) AS t WHERE lower(t) = lower(")
            .push_bind(tag.clone())
            .push("))");
    }
    if let Some(favorite) = query.is_favorite {
        qb.push(" AND is_favorite = ").push_bind(favorite);
    }
    if let Some(archived) = query.is_archived {
        qb.push(" AND is_archived = ").push_bind(archived);
    }
    if let Some(from) = query.created_from {
        qb.push(" AND created_at::date >= ").push_bind(from);
    }
    if let Some(to) = query.created_to {
        qb.push(" AND created_at::date <= ").push_bind(to);
    }
}

pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        PgNoteRepository { pool }
    }

    async fn toggle(&self, column: &'static str, owner_id: Uuid, id: Uuid) -> Result<Option<bool>, AppError> {
        let sql = format!(
            "UPDATE notes SET {column} = NOT {column} \
             WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL \
             RETURNING {column}"
        );
        Ok(sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list(&self, owner_id: Uuid, scope: NoteScope) -> Result<Vec<Note>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM notes WHERE owner_id = ");
        qb.push_bind(owner_id).push(" AND deleted_at IS NULL");
        match scope {
            NoteScope::Active => {
                qb.push(" AND is_archived = FALSE");
            }
            NoteScope::Favorites => {
                qb.push(" AND is_favorite = TRUE");
            }
            NoteScope::Archived => {
                qb.push(" AND is_archived = TRUE");
            }
            NoteScope::Folder(folder_id) => {
                qb.push(" AND is_archived = FALSE AND folder_id = ").push_bind(folder_id);
            }
        }
        qb.push(" ORDER BY updated_at DESC, id");
        Ok(qb.build_query_as::<Note>().fetch_all(&self.pool).await?)
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Note>, AppError> {
        Ok(sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create(&self, owner_id: Uuid, fields: &NoteFields) -> Result<Note, AppError> {
        Ok(sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (owner_id, folder_id, title, content, is_favorite, is_archived, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(fields.folder_id)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(fields.is_favorite)
        .bind(fields.is_archived)
        .bind(&fields.tags)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, fields: &NoteFields) -> Result<Option<Note>, AppError> {
        Ok(sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET folder_id = $3, title = $4, content = $5,
                is_favorite = $6, is_archived = $7, tags = $8
            WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(fields.folder_id)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(fields.is_favorite)
        .bind(fields.is_archived)
        .bind(&fields.tags)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn toggle_favorite(&self, owner_id: Uuid, id: Uuid) -> Result<Option<bool>, AppError> {
        self.toggle("is_favorite", owner_id, id).await
    }

    async fn toggle_archived(&self, owner_id: Uuid, id: Uuid) -> Result<Option<bool>, AppError> {
        self.toggle("is_archived", owner_id, id).await
    }

    async fn search(&self, owner_id: Uuid, query: &NoteQuery) -> Result<(Vec<Note>, i64), AppError> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM notes");
        push_search_filters(&mut count_qb, owner_id, query);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM notes");
        push_search_filters(&mut qb, owner_id, query);
        qb.push(format!(
            " ORDER BY {} {}, id",
            query.sort_by.column(),
            query.direction.keyword()
        ));
        qb.push(" LIMIT ")
            .push_bind(i64::from(query.page_size))
            .push(" OFFSET ")
            .push_bind(query.offset());
        let items = qb.build_query_as::<Note>().fetch_all(&self.pool).await?;

        Ok((items, total))
    }

    async fn tags(&self, owner_id: Uuid) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT t
            FROM notes, unnest(tags) AS t
            WHERE owner_id = $1 AND deleted_at IS NULL
            ORDER BY t
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE notes SET deleted_at = now() WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE notes SET deleted_at = NULL WHERE id = $1 AND owner_id = $2 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM notes WHERE id = $1 AND owner_id = $2 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
