use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub entry_date: NaiveDate,
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<i16>,
    #[serde(skip_serializing)]
    pub pin_hash: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, complete set of writable journal columns.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalFields {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<i16>,
    pub pin_hash: Option<String>,
}

/// What callers see of an entry. PIN-protected entries are locked until the
/// PIN is presented.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntryView {
    pub id: Uuid,
    pub entry_date: NaiveDate,
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<i16>,
    pub has_pin: bool,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntryView {
    /// Hides the content when the entry carries a PIN.
    pub fn guarded(entry: JournalEntry) -> Self {
        let locked = entry.pin_hash.is_some();
        Self::build(entry, locked)
    }

    /// Hides the content regardless of the entry's own PIN.
    pub fn sealed(entry: JournalEntry) -> Self {
        Self::build(entry, true)
    }

    pub fn unlocked(entry: JournalEntry) -> Self {
        Self::build(entry, false)
    }

    fn build(entry: JournalEntry, locked: bool) -> Self {
        JournalEntryView {
            id: entry.id,
            entry_date: entry.entry_date,
            title: entry.title,
            content: if locked { None } else { entry.content },
            mood: entry.mood,
            has_pin: entry.pin_hash.is_some(),
            locked,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}
