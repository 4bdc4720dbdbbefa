//! Repository wiring. Each resource defines its repository trait next to its
//! service; `Repositories` bundles one implementation of each.

#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod memory;

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::repository::{PgUserRepository, UserRepository};
use crate::folders::repository::{FolderRepository, PgFolderRepository};
use crate::journal::repository::{JournalRepository, PgJournalRepository};
use crate::notes::repository::{NoteRepository, PgNoteRepository};
use crate::tasks::repository::{PgTaskRepository, TaskRepository};
use crate::trash::repository::{PgTrashRepository, TrashRepository};
use crate::user_config::repository::{PgUserConfigRepository, UserConfigRepository};

#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub folders: Arc<dyn FolderRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub journal: Arc<dyn JournalRepository>,
    pub user_config: Arc<dyn UserConfigRepository>,
    pub trash: Arc<dyn TrashRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Repositories {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            folders: Arc::new(PgFolderRepository::new(pool.clone())),
            notes: Arc::new(PgNoteRepository::new(pool.clone())),
            tasks: Arc::new(PgTaskRepository::new(pool.clone())),
            journal: Arc::new(PgJournalRepository::new(pool.clone())),
            user_config: Arc::new(PgUserConfigRepository::new(pool.clone())),
            trash: Arc::new(PgTrashRepository::new(pool)),
        }
    }
}
