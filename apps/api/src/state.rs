use std::sync::Arc;

use crate::auth::{SecretHasher, TokenService};
use crate::store::Repositories;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub tokens: Arc<TokenService>,
    /// Pluggable hashing for passwords and PINs. Default: bcrypt.
    pub hasher: Arc<dyn SecretHasher>,
}
