use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const THEMES: &[&str] = &["light", "dark", "system"];
pub const LANGUAGES: &[&str] = &["es", "en"];

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UserConfig {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub theme: String,
    pub language: String,
    pub date_format: String,
    pub journal_requires_pin: bool,
    pub notifications_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, complete set of writable settings.
#[derive(Debug, Clone, PartialEq)]
pub struct UserConfigFields {
    pub theme: String,
    pub language: String,
    pub date_format: String,
    pub journal_requires_pin: bool,
    pub notifications_enabled: bool,
}

impl Default for UserConfigFields {
    fn default() -> Self {
        UserConfigFields {
            theme: "system".to_string(),
            language: "es".to_string(),
            date_format: "dd/MM/yyyy".to_string(),
            journal_requires_pin: false,
            notifications_enabled: true,
        }
    }
}

impl From<&UserConfig> for UserConfigFields {
    fn from(config: &UserConfig) -> Self {
        UserConfigFields {
            theme: config.theme.clone(),
            language: config.language.clone(),
            date_format: config.date_format.clone(),
            journal_requires_pin: config.journal_requires_pin,
            notifications_enabled: config.notifications_enabled,
        }
    }
}
