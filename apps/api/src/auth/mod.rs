//! Accounts, session tokens and secret hashing.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod repository;
pub mod service;
pub mod tokens;

pub use extractor::AuthUser;
pub use password::{BcryptHasher, SecretHasher};
pub use tokens::TokenService;
