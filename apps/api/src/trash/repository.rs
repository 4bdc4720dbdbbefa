use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::trash::{EmptyTrashSummary, TrashEntityType, TrashItem};

/// Cross-entity reads and bulk removal. Restoring or purging one row goes
/// through the owning entity's repository.
#[async_trait]
pub trait TrashRepository: Send + Sync {
    /// Every trashed row of the owner, most recently deleted first.
    async fn list(&self, owner_id: Uuid) -> Result<Vec<TrashItem>, AppError>;
    async fn count(&self, owner_id: Uuid) -> Result<i64, AppError>;
    /// Purges every trashed row of the owner in one transaction.
    async fn empty_all(&self, owner_id: Uuid) -> Result<EmptyTrashSummary, AppError>;
}

pub struct PgTrashRepository {
    pool: PgPool,
}

impl PgTrashRepository {
    pub fn new(pool: PgPool) -> Self {
        PgTrashRepository { pool }
    }
}

#[async_trait]
impl TrashRepository for PgTrashRepository {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<TrashItem>, AppError> {
        Ok(sqlx::query_as::<_, TrashItem>(
            r#"
            SELECT entity_type, id, title, deleted_at, folder_name
            FROM trash_items
            WHERE owner_id = $1
            ORDER BY deleted_at DESC, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn count(&self, owner_id: Uuid) -> Result<i64, AppError> {
        Ok(
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM trash_items WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn empty_all(&self, owner_id: Uuid) -> Result<EmptyTrashSummary, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut purged = [0u64; 4];
        for (slot, entity_type) in TrashEntityType::ALL.into_iter().enumerate() {
            let sql = format!(
                "DELETE FROM {} WHERE owner_id = $1 AND deleted_at IS NOT NULL",
                entity_type.table()
            );
            purged[slot] = sqlx::query(&sql)
                .bind(owner_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }
        tx.commit().await?;
        let [notes, tasks, folders, journal] = purged;
        Ok(EmptyTrashSummary::new(notes, tasks, folders, journal))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::auth::BcryptHasher;
    use crate::folders::service::{self as folders, FolderRequest};
    use crate::journal::service::{self as journal, CreateEntryRequest};
    use crate::notes::service::{self as notes, NoteRequest};
    use crate::store::{fixtures, Repositories};
    use crate::tasks::service::{self as tasks, TaskRequest};
    use crate::trash::service;

    fn folder_req(name: &str) -> FolderRequest {
        FolderRequest {
            name: name.to_string(),
            description: None,
            color: None,
            icon: None,
            display_order: None,
        }
    }

    fn note_req(title: &str, folder_id: Option<Uuid>) -> NoteRequest {
        NoteRequest {
            title: title.to_string(),
            content: Some("body".to_string()),
            folder_id,
            is_favorite: false,
            is_archived: false,
            tags: vec!["work".to_string()],
        }
    }

    fn task_req(title: &str) -> TaskRequest {
        TaskRequest {
            title: title.to_string(),
            ..TaskRequest::default()
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_list_orders_by_deletion_and_fills_titles(pool: PgPool) {
        let repos = Repositories::postgres(pool);
        let hasher = BcryptHasher::new(4);
        let owner = fixtures::owner(&repos).await;
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let folder = folders::create(&repos, owner, folder_req("Work")).await.unwrap();
        let note = notes::create(&repos, owner, note_req("Inside", Some(folder.id))).await.unwrap();
        let task = tasks::create(&repos, owner, task_req("Errand")).await.unwrap();
        let entry = journal::create_entry(
            &repos,
            &hasher,
            owner,
            CreateEntryRequest { entry_date: date, ..CreateEntryRequest::default() },
        )
        .await
        .unwrap();

        notes::send_to_trash(&repos, owner, note.id).await.unwrap();
        tasks::send_to_trash(&repos, owner, task.id).await.unwrap();
        journal::send_to_trash(&repos, owner, date).await.unwrap();

        let items = repos.trash.list(owner).await.unwrap();
        let ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![entry.id, task.id, note.id]);

        // untitled journal entries are listed under their date
        assert_eq!(items[0].entity_type, TrashEntityType::Journal);
        assert_eq!(items[0].title, "2024-06-01");
        assert_eq!(items[2].folder_name.as_deref(), Some("Work"));
        assert_eq!(items[1].folder_name, None);
        assert_eq!(repos.trash.count(owner).await.unwrap(), 3);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_restore_and_purge_dispatch_by_type(pool: PgPool) {
        let repos = Repositories::postgres(pool);
        let owner = fixtures::owner(&repos).await;
        let note = notes::create(&repos, owner, note_req("Keep", None)).await.unwrap();
        let task = tasks::create(&repos, owner, task_req("Drop")).await.unwrap();
        notes::send_to_trash(&repos, owner, note.id).await.unwrap();
        tasks::send_to_trash(&repos, owner, task.id).await.unwrap();

        // a note id under the task type matches nothing
        assert!(!service::restore(&repos, TrashEntityType::Task, note.id, owner).await.unwrap());
        assert!(service::restore(&repos, TrashEntityType::Note, note.id, owner).await.unwrap());
        let restored = notes::get(&repos, owner, note.id).await.unwrap();
        assert_eq!((restored.title, restored.tags), (note.title, note.tags));
        assert_eq!(restored.created_at, note.created_at);
        assert!(restored.deleted_at.is_none());

        assert!(service::purge(&repos, TrashEntityType::Task, task.id, owner).await.unwrap());
        assert!(!service::restore(&repos, TrashEntityType::Task, task.id, owner).await.unwrap());
        assert_eq!(repos.trash.count(owner).await.unwrap(), 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_empty_all_is_scoped_and_detaches_notes(pool: PgPool) {
        let repos = Repositories::postgres(pool);
        let owner = fixtures::owner(&repos).await;
        let other = fixtures::owner(&repos).await;

        let folder = folders::create(&repos, owner, folder_req("Old")).await.unwrap();
        let live = notes::create(&repos, owner, note_req("Live", Some(folder.id))).await.unwrap();
        let dead = notes::create(&repos, owner, note_req("Dead", Some(folder.id))).await.unwrap();
        let task = tasks::create(&repos, owner, task_req("Gone")).await.unwrap();
        notes::send_to_trash(&repos, owner, dead.id).await.unwrap();
        tasks::send_to_trash(&repos, owner, task.id).await.unwrap();
        folders::send_to_trash(&repos, owner, folder.id).await.unwrap();

        let theirs = tasks::create(&repos, other, task_req("Theirs")).await.unwrap();
        tasks::send_to_trash(&repos, other, theirs.id).await.unwrap();

        let summary = repos.trash.empty_all(owner).await.unwrap();
        assert_eq!(summary, EmptyTrashSummary::new(1, 1, 1, 0));
        assert_eq!(summary.total, 3);
        assert_eq!(repos.trash.count(owner).await.unwrap(), 0);
        assert_eq!(notes::get(&repos, owner, live.id).await.unwrap().folder_id, None);
        assert_eq!(repos.trash.count(other).await.unwrap(), 1);
    }
}
