//! In-memory repositories for service and router tests. Mirrors the
//! Postgres behaviour the services rely on: owner scoping, live/trashed
//! filtering, the unique constraints, listing order and FK side effects.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::auth::repository::UserRepository;
use crate::errors::AppError;
use crate::folders::repository::FolderRepository;
use crate::journal::repository::JournalRepository;
use crate::models::folder::{Folder, FolderFields, FolderSummary};
use crate::models::journal::{JournalEntry, JournalFields};
use crate::models::note::{Note, NoteFields, NoteQuery, NoteSortField, SortDirection};
use crate::models::task::{Priority, Task, TaskFields, TaskStats, STATUS_COMPLETED, STATUS_PENDING};
use crate::models::trash::{EmptyTrashSummary, TrashEntityType, TrashItem};
use crate::models::user::{NewUser, User};
use crate::models::user_config::{UserConfig, UserConfigFields};
use crate::notes::repository::{NoteRepository, NoteScope};
use crate::store::Repositories;
use crate::tasks::repository::TaskRepository;
use crate::trash::repository::TrashRepository;
use crate::user_config::repository::UserConfigRepository;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    folders: Vec<Folder>,
    notes: Vec<Note>,
    tasks: Vec<Task>,
    journal: Vec<JournalEntry>,
    configs: Vec<UserConfig>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn repositories() -> Repositories {
        let store = Arc::new(MemoryStore::default());
        Repositories {
            users: store.clone(),
            folders: store.clone(),
            notes: store.clone(),
            tasks: store.clone(),
            journal: store.clone(),
            user_config: store.clone(),
            trash: store,
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store lock poisoned")
    }
}

fn task_order(a: &Task, b: &Task) -> Ordering {
    a.is_completed
        .cmp(&b.is_completed)
        .then(b.priority.cmp(&a.priority))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.cmp(&b.id))
}

fn sorted_tasks(tables: &Tables, owner_id: Uuid, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
    let mut tasks: Vec<Task> = tables
        .tasks
        .iter()
        .filter(|t| t.owner_id == owner_id && t.deleted_at.is_none() && keep(t))
        .cloned()
        .collect();
    tasks.sort_by(task_order);
    tasks
}

fn note_matches(note: &Note, owner_id: Uuid, query: &NoteQuery) -> bool {
    if note.owner_id != owner_id || note.deleted_at.is_some() {
        return false;
    }
    if let Some(text) = &query.text {
        let needle = text.to_lowercase();
        let in_title = note.title.to_lowercase().contains(&needle);
        let in_content = note
            .content
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(&needle));
        if !in_title && !in_content {
            return false;
        }
    }
    if query.folder_id.is_some() && note.folder_id != query.folder_id {
        return false;
    }
    if let Some(tag) = &query.tag {
        let tag = tag.to_lowercase();
        if !note.tags.iter().any(|t| t.to_lowercase() == tag) {
            return false;
        }
    }
    if query.is_favorite.is_some_and(|f| f != note.is_favorite) {
        return false;
    }
    if query.is_archived.is_some_and(|a| a != note.is_archived) {
        return false;
    }
    let created = note.created_at.date_naive();
    if query.created_from.is_some_and(|from| created < from) {
        return false;
    }
    if query.created_to.is_some_and(|to| created > to) {
        return false;
    }
    true
}

fn note_order(a: &Note, b: &Note, sort_by: NoteSortField) -> Ordering {
    match sort_by {
        NoteSortField::Title => a.title.cmp(&b.title),
        NoteSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        NoteSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!(
                "Email {} is already registered",
                user.email
            )));
        }
        let now = Utc::now();
        let row = User {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            display_name: user.display_name.clone(),
            diary_pin_hash: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn record_login(&self, id: Uuid) -> Result<(), AppError> {
        if let Some(user) = self.tables().users.iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn set_diary_pin_hash(&self, id: Uuid, pin_hash: Option<&str>) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.diary_pin_hash = pin_hash.map(str::to_string);
        user.updated_at = Utc::now();
        Ok(true)
    }
}

#[async_trait]
impl FolderRepository for MemoryStore {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<FolderSummary>, AppError> {
        let tables = self.tables();
        let mut summaries: Vec<FolderSummary> = tables
            .folders
            .iter()
            .filter(|f| f.owner_id == owner_id && f.deleted_at.is_none())
            .map(|f| FolderSummary {
                folder: f.clone(),
                note_count: tables
                    .notes
                    .iter()
                    .filter(|n| n.folder_id == Some(f.id) && n.deleted_at.is_none())
                    .count() as i64,
            })
            .collect();
        summaries.sort_by(|a, b| {
            a.folder
                .display_order
                .cmp(&b.folder.display_order)
                .then_with(|| a.folder.name.cmp(&b.folder.name))
        });
        Ok(summaries)
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Folder>, AppError> {
        Ok(self
            .tables()
            .folders
            .iter()
            .find(|f| f.id == id && f.owner_id == owner_id && f.deleted_at.is_none())
            .cloned())
    }

    async fn create(&self, owner_id: Uuid, fields: &FolderFields) -> Result<Folder, AppError> {
        let mut tables = self.tables();
        let display_order = fields.display_order.unwrap_or_else(|| {
            tables
                .folders
                .iter()
                .filter(|f| f.owner_id == owner_id && f.deleted_at.is_none())
                .map(|f| f.display_order + 1)
                .max()
                .unwrap_or(0)
        });
        let now = Utc::now();
        let folder = Folder {
            id: Uuid::new_v4(),
            owner_id,
            name: fields.name.clone(),
            description: fields.description.clone(),
            color: fields.color.clone(),
            icon: fields.icon.clone(),
            display_order,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.folders.push(folder.clone());
        Ok(folder)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, fields: &FolderFields) -> Result<Option<Folder>, AppError> {
        let mut tables = self.tables();
        let Some(folder) = tables
            .folders
            .iter_mut()
            .find(|f| f.id == id && f.owner_id == owner_id && f.deleted_at.is_none())
        else {
            return Ok(None);
        };
        folder.name = fields.name.clone();
        folder.description = fields.description.clone();
        folder.color = fields.color.clone();
        folder.icon = fields.icon.clone();
        if let Some(order) = fields.display_order {
            folder.display_order = order;
        }
        folder.updated_at = Utc::now();
        Ok(Some(folder.clone()))
    }

    async fn reorder(&self, owner_id: Uuid, ids: &[Uuid]) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let all_live = ids.iter().all(|id| {
            tables
                .folders
                .iter()
                .any(|f| f.id == *id && f.owner_id == owner_id && f.deleted_at.is_none())
        });
        if !all_live {
            return Ok(false);
        }
        for (position, id) in ids.iter().enumerate() {
            if let Some(folder) = tables.folders.iter_mut().find(|f| f.id == *id) {
                folder.display_order = position as i32;
                folder.updated_at = Utc::now();
            }
        }
        Ok(true)
    }

    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let Some(folder) = tables
            .folders
            .iter_mut()
            .find(|f| f.id == id && f.owner_id == owner_id && f.deleted_at.is_none())
        else {
            return Ok(false);
        };
        folder.deleted_at = Some(Utc::now());
        Ok(true)
    }

    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let Some(folder) = tables
            .folders
            .iter_mut()
            .find(|f| f.id == id && f.owner_id == owner_id && f.deleted_at.is_some())
        else {
            return Ok(false);
        };
        folder.deleted_at = None;
        Ok(true)
    }

    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let before = tables.folders.len();
        tables
            .folders
            .retain(|f| !(f.id == id && f.owner_id == owner_id && f.deleted_at.is_some()));
        if tables.folders.len() == before {
            return Ok(false);
        }
        for note in tables.notes.iter_mut().filter(|n| n.folder_id == Some(id)) {
            note.folder_id = None;
        }
        Ok(true)
    }
}

impl MemoryStore {
    fn toggle_note(&self, owner_id: Uuid, id: Uuid, flag: fn(&mut Note) -> &mut bool) -> Option<bool> {
        let mut tables = self.tables();
        let note = tables
            .notes
            .iter_mut()
            .find(|n| n.id == id && n.owner_id == owner_id && n.deleted_at.is_none())?;
        let value = flag(note);
        *value = !*value;
        let flipped = *value;
        note.updated_at = Utc::now();
        Some(flipped)
    }
}

#[async_trait]
impl NoteRepository for MemoryStore {
    async fn list(&self, owner_id: Uuid, scope: NoteScope) -> Result<Vec<Note>, AppError> {
        let tables = self.tables();
        let mut notes: Vec<Note> = tables
            .notes
            .iter()
            .filter(|n| n.owner_id == owner_id && n.deleted_at.is_none())
            .filter(|n| match scope {
                NoteScope::Active => !n.is_archived,
                NoteScope::Favorites => n.is_favorite,
                NoteScope::Archived => n.is_archived,
                NoteScope::Folder(folder_id) => !n.is_archived && n.folder_id == Some(folder_id),
            })
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(notes)
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Note>, AppError> {
        Ok(self
            .tables()
            .notes
            .iter()
            .find(|n| n.id == id && n.owner_id == owner_id && n.deleted_at.is_none())
            .cloned())
    }

    async fn create(&self, owner_id: Uuid, fields: &NoteFields) -> Result<Note, AppError> {
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            owner_id,
            folder_id: fields.folder_id,
            title: fields.title.clone(),
            content: fields.content.clone(),
            is_favorite: fields.is_favorite,
            is_archived: fields.is_archived,
            tags: fields.tags.clone(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.tables().notes.push(note.clone());
        Ok(note)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, fields: &NoteFields) -> Result<Option<Note>, AppError> {
        let mut tables = self.tables();
        let Some(note) = tables
            .notes
            .iter_mut()
            .find(|n| n.id == id && n.owner_id == owner_id && n.deleted_at.is_none())
        else {
            return Ok(None);
        };
        note.folder_id = fields.folder_id;
        note.title = fields.title.clone();
        note.content = fields.content.clone();
        note.is_favorite = fields.is_favorite;
        note.is_archived = fields.is_archived;
        note.tags = fields.tags.clone();
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn toggle_favorite(&self, owner_id: Uuid, id: Uuid) -> Result<Option<bool>, AppError> {
        Ok(self.toggle_note(owner_id, id, |n| &mut n.is_favorite))
    }

    async fn toggle_archived(&self, owner_id: Uuid, id: Uuid) -> Result<Option<bool>, AppError> {
        Ok(self.toggle_note(owner_id, id, |n| &mut n.is_archived))
    }

    async fn search(&self, owner_id: Uuid, query: &NoteQuery) -> Result<(Vec<Note>, i64), AppError> {
        let tables = self.tables();
        let mut matches: Vec<Note> = tables
            .notes
            .iter()
            .filter(|n| note_matches(n, owner_id, query))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            let by_column = note_order(a, b, query.sort_by);
            let by_column = match query.direction {
                SortDirection::Asc => by_column,
                SortDirection::Desc => by_column.reverse(),
            };
            by_column.then(a.id.cmp(&b.id))
        });
        let total = matches.len() as i64;
        let items = matches
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .collect();
        Ok((items, total))
    }

    async fn tags(&self, owner_id: Uuid) -> Result<Vec<String>, AppError> {
        let tables = self.tables();
        let tags: BTreeSet<String> = tables
            .notes
            .iter()
            .filter(|n| n.owner_id == owner_id && n.deleted_at.is_none())
            .flat_map(|n| n.tags.iter().cloned())
            .collect();
        Ok(tags.into_iter().collect())
    }

    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let Some(note) = tables
            .notes
            .iter_mut()
            .find(|n| n.id == id && n.owner_id == owner_id && n.deleted_at.is_none())
        else {
            return Ok(false);
        };
        note.deleted_at = Some(Utc::now());
        Ok(true)
    }

    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let Some(note) = tables
            .notes
            .iter_mut()
            .find(|n| n.id == id && n.owner_id == owner_id && n.deleted_at.is_some())
        else {
            return Ok(false);
        };
        note.deleted_at = None;
        Ok(true)
    }

    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let before = tables.notes.len();
        tables
            .notes
            .retain(|n| !(n.id == id && n.owner_id == owner_id && n.deleted_at.is_some()));
        Ok(tables.notes.len() < before)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        Ok(sorted_tasks(&self.tables(), owner_id, |_| true))
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self
            .tables()
            .tasks
            .iter()
            .find(|t| t.id == id && t.owner_id == owner_id && t.deleted_at.is_none())
            .cloned())
    }

    async fn create(&self, owner_id: Uuid, fields: &TaskFields) -> Result<Task, AppError> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            owner_id,
            title: fields.title.clone(),
            description: fields.description.clone(),
            is_completed: fields.is_completed,
            priority: fields.priority,
            due_date: fields.due_date,
            completed_at: fields.completed_at,
            status: fields.status.clone(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        self.tables().tasks.push(task.clone());
        Ok(task)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, fields: &TaskFields) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables();
        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner_id && t.deleted_at.is_none())
        else {
            return Ok(None);
        };
        task.title = fields.title.clone();
        task.description = fields.description.clone();
        task.is_completed = fields.is_completed;
        task.priority = fields.priority;
        task.due_date = fields.due_date;
        task.completed_at = fields.completed_at;
        task.status = fields.status.clone();
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn toggle_complete(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables();
        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner_id && t.deleted_at.is_none())
        else {
            return Ok(None);
        };
        let now = Utc::now();
        if task.is_completed {
            task.is_completed = false;
            task.completed_at = None;
            task.status = STATUS_PENDING.to_string();
        } else {
            task.is_completed = true;
            task.completed_at = Some(now);
            task.status = STATUS_COMPLETED.to_string();
        }
        task.updated_at = now;
        Ok(Some(task.clone()))
    }

    async fn pending(&self, owner_id: Uuid) -> Result<Vec<Task>, AppError> {
        Ok(sorted_tasks(&self.tables(), owner_id, |t| !t.is_completed))
    }

    async fn overdue(&self, owner_id: Uuid, today: NaiveDate) -> Result<Vec<Task>, AppError> {
        Ok(sorted_tasks(&self.tables(), owner_id, |t| t.is_overdue(today)))
    }

    async fn by_status(&self, owner_id: Uuid, status: &str) -> Result<Vec<Task>, AppError> {
        Ok(sorted_tasks(&self.tables(), owner_id, |t| t.status == status))
    }

    async fn by_priority(&self, owner_id: Uuid, priority: Priority) -> Result<Vec<Task>, AppError> {
        Ok(sorted_tasks(&self.tables(), owner_id, |t| t.priority == priority))
    }

    async fn stats(&self, owner_id: Uuid, today: NaiveDate) -> Result<TaskStats, AppError> {
        let live = sorted_tasks(&self.tables(), owner_id, |_| true);
        let count = |keep: &dyn Fn(&Task) -> bool| live.iter().filter(|t| keep(t)).count() as i64;
        Ok(TaskStats {
            total: live.len() as i64,
            completed: count(&|t| t.is_completed),
            pending: count(&|t| !t.is_completed),
            overdue: count(&|t| t.is_overdue(today)),
        })
    }

    async fn soft_delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner_id && t.deleted_at.is_none())
        else {
            return Ok(false);
        };
        task.deleted_at = Some(Utc::now());
        Ok(true)
    }

    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner_id && t.deleted_at.is_some())
        else {
            return Ok(false);
        };
        task.deleted_at = None;
        Ok(true)
    }

    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let before = tables.tasks.len();
        tables
            .tasks
            .retain(|t| !(t.id == id && t.owner_id == owner_id && t.deleted_at.is_some()));
        Ok(tables.tasks.len() < before)
    }
}

#[async_trait]
impl JournalRepository for MemoryStore {
    async fn list(
        &self,
        owner_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<JournalEntry>, AppError> {
        let tables = self.tables();
        let mut entries: Vec<JournalEntry> = tables
            .journal
            .iter()
            .filter(|e| e.owner_id == owner_id && e.deleted_at.is_none())
            .filter(|e| from.map_or(true, |from| e.entry_date >= from))
            .filter(|e| to.map_or(true, |to| e.entry_date <= to))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
        Ok(entries)
    }

    async fn get_by_date(&self, owner_id: Uuid, date: NaiveDate) -> Result<Option<JournalEntry>, AppError> {
        Ok(self
            .tables()
            .journal
            .iter()
            .find(|e| e.owner_id == owner_id && e.entry_date == date && e.deleted_at.is_none())
            .cloned())
    }

    async fn create(&self, owner_id: Uuid, date: NaiveDate, fields: &JournalFields) -> Result<JournalEntry, AppError> {
        let mut tables = self.tables();
        if tables
            .journal
            .iter()
            .any(|e| e.owner_id == owner_id && e.entry_date == date && e.deleted_at.is_none())
        {
            return Err(AppError::Conflict(format!(
                "A journal entry already exists for {date}"
            )));
        }
        let now = Utc::now();
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            owner_id,
            entry_date: date,
            title: fields.title.clone(),
            content: fields.content.clone(),
            mood: fields.mood,
            pin_hash: fields.pin_hash.clone(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.journal.push(entry.clone());
        Ok(entry)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        date: NaiveDate,
        fields: &JournalFields,
    ) -> Result<Option<JournalEntry>, AppError> {
        let mut tables = self.tables();
        let Some(entry) = tables
            .journal
            .iter_mut()
            .find(|e| e.owner_id == owner_id && e.entry_date == date && e.deleted_at.is_none())
        else {
            return Ok(None);
        };
        entry.title = fields.title.clone();
        entry.content = fields.content.clone();
        entry.mood = fields.mood;
        entry.pin_hash = fields.pin_hash.clone();
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn soft_delete(&self, owner_id: Uuid, date: NaiveDate) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let Some(entry) = tables
            .journal
            .iter_mut()
            .find(|e| e.owner_id == owner_id && e.entry_date == date && e.deleted_at.is_none())
        else {
            return Ok(false);
        };
        entry.deleted_at = Some(Utc::now());
        Ok(true)
    }

    async fn restore(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let Some(date) = tables
            .journal
            .iter()
            .find(|e| e.id == id && e.owner_id == owner_id && e.deleted_at.is_some())
            .map(|e| e.entry_date)
        else {
            return Ok(false);
        };
        if tables
            .journal
            .iter()
            .any(|e| e.owner_id == owner_id && e.entry_date == date && e.deleted_at.is_none())
        {
            return Err(AppError::Conflict(
                "Another journal entry already exists for that date".to_string(),
            ));
        }
        if let Some(entry) = tables.journal.iter_mut().find(|e| e.id == id) {
            entry.deleted_at = None;
        }
        Ok(true)
    }

    async fn purge(&self, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let before = tables.journal.len();
        tables
            .journal
            .retain(|e| !(e.id == id && e.owner_id == owner_id && e.deleted_at.is_some()));
        Ok(tables.journal.len() < before)
    }
}

#[async_trait]
impl UserConfigRepository for MemoryStore {
    async fn get(&self, owner_id: Uuid) -> Result<Option<UserConfig>, AppError> {
        Ok(self
            .tables()
            .configs
            .iter()
            .find(|c| c.owner_id == owner_id)
            .cloned())
    }

    async fn upsert(&self, owner_id: Uuid, fields: &UserConfigFields) -> Result<UserConfig, AppError> {
        let mut tables = self.tables();
        let now = Utc::now();
        if let Some(config) = tables.configs.iter_mut().find(|c| c.owner_id == owner_id) {
            config.theme = fields.theme.clone();
            config.language = fields.language.clone();
            config.date_format = fields.date_format.clone();
            config.journal_requires_pin = fields.journal_requires_pin;
            config.notifications_enabled = fields.notifications_enabled;
            config.updated_at = now;
            return Ok(config.clone());
        }
        let config = UserConfig {
            id: Uuid::new_v4(),
            owner_id,
            theme: fields.theme.clone(),
            language: fields.language.clone(),
            date_format: fields.date_format.clone(),
            journal_requires_pin: fields.journal_requires_pin,
            notifications_enabled: fields.notifications_enabled,
            created_at: now,
            updated_at: now,
        };
        tables.configs.push(config.clone());
        Ok(config)
    }
}

fn trash_items(tables: &Tables, owner_id: Uuid) -> Vec<TrashItem> {
    let mut items = Vec::new();
    for note in tables.notes.iter().filter(|n| n.owner_id == owner_id) {
        let Some(deleted_at) = note.deleted_at else { continue };
        let folder_name = note
            .folder_id
            .and_then(|fid| tables.folders.iter().find(|f| f.id == fid))
            .map(|f| f.name.clone());
        items.push(TrashItem {
            entity_type: TrashEntityType::Note,
            id: note.id,
            title: note.title.clone(),
            deleted_at,
            folder_name,
        });
    }
    for task in tables.tasks.iter().filter(|t| t.owner_id == owner_id) {
        let Some(deleted_at) = task.deleted_at else { continue };
        items.push(TrashItem {
            entity_type: TrashEntityType::Task,
            id: task.id,
            title: task.title.clone(),
            deleted_at,
            folder_name: None,
        });
    }
    for folder in tables.folders.iter().filter(|f| f.owner_id == owner_id) {
        let Some(deleted_at) = folder.deleted_at else { continue };
        items.push(TrashItem {
            entity_type: TrashEntityType::Folder,
            id: folder.id,
            title: folder.name.clone(),
            deleted_at,
            folder_name: None,
        });
    }
    for entry in tables.journal.iter().filter(|e| e.owner_id == owner_id) {
        let Some(deleted_at) = entry.deleted_at else { continue };
        let title = entry
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| entry.entry_date.format("%Y-%m-%d").to_string());
        items.push(TrashItem {
            entity_type: TrashEntityType::Journal,
            id: entry.id,
            title,
            deleted_at,
            folder_name: None,
        });
    }
    items
}

#[async_trait]
impl TrashRepository for MemoryStore {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<TrashItem>, AppError> {
        let mut items = trash_items(&self.tables(), owner_id);
        items.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn count(&self, owner_id: Uuid) -> Result<i64, AppError> {
        Ok(trash_items(&self.tables(), owner_id).len() as i64)
    }

    async fn empty_all(&self, owner_id: Uuid) -> Result<EmptyTrashSummary, AppError> {
        let mut tables = self.tables();
        let trashed = |owner: Uuid, deleted: bool| owner == owner_id && deleted;

        let before = tables.notes.len();
        tables.notes.retain(|n| !trashed(n.owner_id, n.deleted_at.is_some()));
        let notes = (before - tables.notes.len()) as u64;

        let before = tables.tasks.len();
        tables.tasks.retain(|t| !trashed(t.owner_id, t.deleted_at.is_some()));
        let tasks = (before - tables.tasks.len()) as u64;

        let purged_folders: Vec<Uuid> = tables
            .folders
            .iter()
            .filter(|f| trashed(f.owner_id, f.deleted_at.is_some()))
            .map(|f| f.id)
            .collect();
        tables.folders.retain(|f| !purged_folders.contains(&f.id));
        for note in tables.notes.iter_mut() {
            if note.folder_id.is_some_and(|fid| purged_folders.contains(&fid)) {
                note.folder_id = None;
            }
        }

        let before = tables.journal.len();
        tables.journal.retain(|e| !trashed(e.owner_id, e.deleted_at.is_some()));
        let journal = (before - tables.journal.len()) as u64;

        Ok(EmptyTrashSummary::new(
            notes,
            tasks,
            purged_folders.len() as u64,
            journal,
        ))
    }
}
