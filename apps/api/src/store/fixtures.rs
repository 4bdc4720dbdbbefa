//! Setup shared by the Postgres repository tests. Those tests get a fresh,
//! migrated database from `#[sqlx::test]` and are ignored unless run with
//! `DATABASE_URL` set: `cargo test -- --ignored`.

use uuid::Uuid;

use crate::models::user::NewUser;
use crate::store::Repositories;

/// Inserts a user row so owner foreign keys resolve.
pub async fn owner(repos: &Repositories) -> Uuid {
    repos
        .users
        .create(&NewUser {
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: "x".to_string(),
            display_name: "Ana".to_string(),
        })
        .await
        .unwrap()
        .id
}
