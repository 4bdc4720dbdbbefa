//! Journal entries (one per calendar day) and the two PIN gates: a per-entry
//! PIN stored on the entry, and the user's global diary PIN stored on the
//! user row. When the user's settings ask for it (`journal_requires_pin`) and
//! a global PIN is set, every entry reads as locked until a PIN is presented.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::SecretHasher;
use crate::errors::AppError;
use crate::models::journal::{JournalEntry, JournalEntryView, JournalFields};
use crate::store::Repositories;
use crate::validation::{is_valid_pin, Validator};

const PIN_FORMAT: &str = "pin must be 4 to 8 digits";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEntryRequest {
    pub entry_date: NaiveDate,
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<i16>,
    pub pin: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEntryRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<i16>,
    /// New PIN for the entry.
    pub pin: Option<String>,
    #[serde(default)]
    pub remove_pin: bool,
    /// Required when the entry is PIN-protected.
    pub current_pin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub pin: String,
}

#[derive(Debug, Deserialize)]
pub struct SetGlobalPinRequest {
    pub pin: String,
    pub current_pin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveGlobalPinRequest {
    pub current_pin: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct PinCheck {
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub struct PinStatus {
    pub has_pin: bool,
}

fn not_found(date: NaiveDate) -> AppError {
    AppError::NotFound(format!("No journal entry for {date}"))
}

fn validate_content(
    v: &mut Validator,
    title: Option<String>,
    content: Option<String>,
    mood: Option<i16>,
) -> (Option<String>, Option<String>) {
    let title = v.optional("title", title, 200);
    let content = content.filter(|c| !c.trim().is_empty());
    if let Some(mood) = mood {
        v.range("mood", i64::from(mood), 1, 5);
    }
    (title, content)
}

fn check_pin_format(v: &mut Validator, pin: Option<&str>) {
    if let Some(pin) = pin {
        v.check(is_valid_pin(pin), PIN_FORMAT);
    }
}

async fn load(repos: &Repositories, owner_id: Uuid, date: NaiveDate) -> Result<JournalEntry, AppError> {
    repos
        .journal
        .get_by_date(owner_id, date)
        .await?
        .ok_or_else(|| not_found(date))
}

/// The global diary PIN when the user's settings require it for reading.
async fn diary_lock(repos: &Repositories, owner_id: Uuid) -> Result<Option<String>, AppError> {
    let required = repos
        .user_config
        .get(owner_id)
        .await?
        .is_some_and(|config| config.journal_requires_pin);
    if !required {
        return Ok(None);
    }
    stored_global_pin(repos, owner_id).await
}

fn view(entry: JournalEntry, diary_locked: bool) -> JournalEntryView {
    if diary_locked {
        JournalEntryView::sealed(entry)
    } else {
        JournalEntryView::guarded(entry)
    }
}

pub async fn list(repos: &Repositories, owner_id: Uuid, params: ListParams) -> Result<Vec<JournalEntryView>, AppError> {
    if let (Some(from), Some(to)) = (params.from, params.to) {
        if from > to {
            return Err(AppError::validation("from must not be after to"));
        }
    }
    let diary_locked = diary_lock(repos, owner_id).await?.is_some();
    let entries = repos.journal.list(owner_id, params.from, params.to).await?;
    Ok(entries.into_iter().map(|entry| view(entry, diary_locked)).collect())
}

/// PIN-protected entries come back locked, as does every entry of a locked diary.
pub async fn get_entry(repos: &Repositories, owner_id: Uuid, date: NaiveDate) -> Result<JournalEntryView, AppError> {
    let diary_locked = diary_lock(repos, owner_id).await?.is_some();
    Ok(view(load(repos, owner_id, date).await?, diary_locked))
}

/// Rejects a second live entry for the same date; never overwrites.
pub async fn create_entry(
    repos: &Repositories,
    hasher: &dyn SecretHasher,
    owner_id: Uuid,
    req: CreateEntryRequest,
) -> Result<JournalEntryView, AppError> {
    let mut v = Validator::new();
    let (title, content) = validate_content(&mut v, req.title, req.content, req.mood);
    check_pin_format(&mut v, req.pin.as_deref());
    v.finish()?;

    if repos.journal.get_by_date(owner_id, req.entry_date).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "A journal entry already exists for {}",
            req.entry_date
        )));
    }

    let pin_hash = match req.pin.as_deref() {
        Some(pin) => Some(hasher.hash(pin).await?),
        None => None,
    };
    let entry = repos
        .journal
        .create(
            owner_id,
            req.entry_date,
            &JournalFields {
                title,
                content,
                mood: req.mood,
                pin_hash,
            },
        )
        .await?;
    info!("Created journal entry {} for user {owner_id}", entry.entry_date);
    Ok(JournalEntryView::unlocked(entry))
}

/// Updates the entry for `date`; never creates one.
pub async fn update_entry(
    repos: &Repositories,
    hasher: &dyn SecretHasher,
    owner_id: Uuid,
    date: NaiveDate,
    req: UpdateEntryRequest,
) -> Result<JournalEntryView, AppError> {
    let mut v = Validator::new();
    let (title, content) = validate_content(&mut v, req.title, req.content, req.mood);
    check_pin_format(&mut v, req.pin.as_deref());
    v.check(
        !(req.remove_pin && req.pin.is_some()),
        "pin and remove_pin cannot be combined",
    );
    v.finish()?;

    let current = load(repos, owner_id, date).await?;
    if let Some(hash) = &current.pin_hash {
        let unlocked = match req.current_pin.as_deref() {
            Some(pin) => hasher.verify(pin, hash).await,
            None => false,
        };
        if !unlocked {
            warn!("Rejected update of locked journal entry {date} for user {owner_id}");
            return Err(AppError::Forbidden(
                "This entry is PIN-protected; current_pin is missing or wrong".to_string(),
            ));
        }
    }

    let pin_hash = match (req.pin.as_deref(), req.remove_pin) {
        (Some(pin), _) => Some(hasher.hash(pin).await?),
        (None, true) => None,
        (None, false) => current.pin_hash,
    };
    let entry = repos
        .journal
        .update(
            owner_id,
            date,
            &JournalFields {
                title,
                content,
                mood: req.mood,
                pin_hash,
            },
        )
        .await?
        .ok_or_else(|| not_found(date))?;
    Ok(JournalEntryView::unlocked(entry))
}

/// False when there is no entry or the entry has no PIN.
pub async fn verify_pin(
    repos: &Repositories,
    hasher: &dyn SecretHasher,
    owner_id: Uuid,
    date: NaiveDate,
    pin: &str,
) -> Result<bool, AppError> {
    let stored = repos
        .journal
        .get_by_date(owner_id, date)
        .await?
        .and_then(|entry| entry.pin_hash);
    Ok(match stored {
        Some(hash) => hasher.verify(pin, &hash).await,
        None => false,
    })
}

/// Full entry once the PIN checks out. An entry's own PIN wins; otherwise a
/// locked diary takes the global PIN, and anything else opens directly.
pub async fn unlock_entry(
    repos: &Repositories,
    hasher: &dyn SecretHasher,
    owner_id: Uuid,
    date: NaiveDate,
    pin: &str,
) -> Result<JournalEntryView, AppError> {
    let entry = load(repos, owner_id, date).await?;
    let gate = match &entry.pin_hash {
        Some(hash) => Some(hash.clone()),
        None => diary_lock(repos, owner_id).await?,
    };
    if let Some(hash) = gate {
        if !hasher.verify(pin, &hash).await {
            warn!("Wrong PIN for journal entry {date} of user {owner_id}");
            return Err(AppError::Forbidden("Incorrect PIN".to_string()));
        }
    }
    Ok(JournalEntryView::unlocked(entry))
}

pub async fn send_to_trash(repos: &Repositories, owner_id: Uuid, date: NaiveDate) -> Result<(), AppError> {
    if !repos.journal.soft_delete(owner_id, date).await? {
        return Err(not_found(date));
    }
    info!("Journal entry {date} moved to trash by user {owner_id}");
    Ok(())
}

async fn stored_global_pin(repos: &Repositories, owner_id: Uuid) -> Result<Option<String>, AppError> {
    let user = repos
        .users
        .find_by_id(owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(user.diary_pin_hash)
}

pub async fn has_global_pin(repos: &Repositories, owner_id: Uuid) -> Result<bool, AppError> {
    Ok(stored_global_pin(repos, owner_id).await?.is_some())
}

/// False when no global PIN is set.
pub async fn verify_global_pin(
    repos: &Repositories,
    hasher: &dyn SecretHasher,
    owner_id: Uuid,
    pin: &str,
) -> Result<bool, AppError> {
    Ok(match stored_global_pin(repos, owner_id).await? {
        Some(hash) => hasher.verify(pin, &hash).await,
        None => false,
    })
}

/// Setting a first PIN needs nothing else; replacing one needs the current PIN.
pub async fn set_global_pin(
    repos: &Repositories,
    hasher: &dyn SecretHasher,
    owner_id: Uuid,
    req: SetGlobalPinRequest,
) -> Result<(), AppError> {
    if !is_valid_pin(&req.pin) {
        return Err(AppError::validation(PIN_FORMAT));
    }
    if let Some(hash) = stored_global_pin(repos, owner_id).await? {
        let confirmed = match req.current_pin.as_deref() {
            Some(pin) => hasher.verify(pin, &hash).await,
            None => false,
        };
        if !confirmed {
            return Err(AppError::Forbidden("Current diary PIN is missing or wrong".to_string()));
        }
    }
    let hash = hasher.hash(&req.pin).await?;
    if !repos.users.set_diary_pin_hash(owner_id, Some(&hash)).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    info!("Diary PIN set for user {owner_id}");
    Ok(())
}

pub async fn remove_global_pin(
    repos: &Repositories,
    hasher: &dyn SecretHasher,
    owner_id: Uuid,
    req: RemoveGlobalPinRequest,
) -> Result<(), AppError> {
    let Some(hash) = stored_global_pin(repos, owner_id).await? else {
        return Err(AppError::NotFound("No diary PIN is set".to_string()));
    };
    if !hasher.verify(&req.current_pin, &hash).await {
        return Err(AppError::Forbidden("Current diary PIN is wrong".to_string()));
    }
    repos.users.set_diary_pin_hash(owner_id, None).await?;
    info!("Diary PIN removed for user {owner_id}");
    Ok(())
}
