use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user_config::{UserConfig, UserConfigFields};

#[async_trait]
pub trait UserConfigRepository: Send + Sync {
    async fn get(&self, owner_id: Uuid) -> Result<Option<UserConfig>, AppError>;
    /// Inserts or replaces the owner's single settings row.
    async fn upsert(&self, owner_id: Uuid, fields: &UserConfigFields) -> Result<UserConfig, AppError>;
}

pub struct PgUserConfigRepository {
    pool: PgPool,
}

impl PgUserConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        PgUserConfigRepository { pool }
    }
}

#[async_trait]
impl UserConfigRepository for PgUserConfigRepository {
    async fn get(&self, owner_id: Uuid) -> Result<Option<UserConfig>, AppError> {
        Ok(
            sqlx::query_as::<_, UserConfig>("SELECT * FROM user_config WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn upsert(&self, owner_id: Uuid, fields: &UserConfigFields) -> Result<UserConfig, AppError> {
        Ok(sqlx::query_as::<_, UserConfig>(
            r#"
            INSERT INTO user_config
                (owner_id, theme, language, date_format, journal_requires_pin, notifications_enabled)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (owner_id) DO UPDATE
            SET theme = EXCLUDED.theme,
                language = EXCLUDED.language,
                date_format = EXCLUDED.date_format,
                journal_requires_pin = EXCLUDED.journal_requires_pin,
                notifications_enabled = EXCLUDED.notifications_enabled
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&fields.theme)
        .bind(&fields.language)
        .bind(&fields.date_format)
        .bind(fields.journal_requires_pin)
        .bind(fields.notifications_enabled)
        .fetch_one(&self.pool)
        .await?)
    }
}
