use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user_config::{UserConfig, UserConfigFields, LANGUAGES, THEMES};
use crate::store::Repositories;
use crate::validation::Validator;

/// Omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UserConfigRequest {
    pub theme: Option<String>,
    pub language: Option<String>,
    pub date_format: Option<String>,
    pub journal_requires_pin: Option<bool>,
    pub notifications_enabled: Option<bool>,
}

/// The stored settings, created with defaults on first read.
pub async fn get_or_create_default(repos: &Repositories, owner_id: Uuid) -> Result<UserConfig, AppError> {
    if let Some(config) = repos.user_config.get(owner_id).await? {
        return Ok(config);
    }
    info!("Creating default settings for user {owner_id}");
    repos.user_config.upsert(owner_id, &UserConfigFields::default()).await
}

pub async fn update(repos: &Repositories, owner_id: Uuid, req: UserConfigRequest) -> Result<UserConfig, AppError> {
    let current = get_or_create_default(repos, owner_id).await?;
    let mut fields = UserConfigFields::from(&current);
    let mut v = Validator::new();

    if let Some(theme) = req.theme {
        let theme = theme.trim().to_lowercase();
        v.check(
            THEMES.contains(&theme.as_str()),
            format!("theme must be one of {}", THEMES.join(", ")),
        );
        fields.theme = theme;
    }
    if let Some(language) = req.language {
        let language = language.trim().to_lowercase();
        v.check(
            LANGUAGES.contains(&language.as_str()),
            format!("language must be one of {}", LANGUAGES.join(", ")),
        );
        fields.language = language;
    }
    if let Some(date_format) = req.date_format {
        fields.date_format = v.required("date_format", &date_format, 20);
    }
    if let Some(flag) = req.journal_requires_pin {
        fields.journal_requires_pin = flag;
    }
    if let Some(flag) = req.notifications_enabled {
        fields.notifications_enabled = flag;
    }
    v.finish()?;

    repos.user_config.upsert(owner_id, &fields).await
}

pub async fn reset(repos: &Repositories, owner_id: Uuid) -> Result<UserConfig, AppError> {
    info!("Resetting settings for user {owner_id}");
    repos.user_config.upsert(owner_id, &UserConfigFields::default()).await
}
