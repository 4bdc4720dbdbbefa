pub mod folder;
pub mod journal;
pub mod note;
pub mod page;
pub mod task;
pub mod trash;
pub mod user;
pub mod user_config;
