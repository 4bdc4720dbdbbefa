use async_trait::async_trait;
use tracing::warn;

use crate::errors::AppError;

/// One-way hashing for passwords and PINs. Constant-time comparison is the
/// implementation's job.
#[async_trait]
pub trait SecretHasher: Send + Sync {
    async fn hash(&self, secret: &str) -> Result<String, AppError>;
    async fn verify(&self, secret: &str, hash: &str) -> bool;
}

/// bcrypt is CPU-bound for the whole cost factor, so both operations run via
/// tokio::task::spawn_blocking and leave the async workers free.
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        BcryptHasher { cost }
    }
}

#[async_trait]
impl SecretHasher for BcryptHasher {
    async fn hash(&self, secret: &str) -> Result<String, AppError> {
        let secret = secret.to_owned();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(secret, cost))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hashing task failed: {e}")))?
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hashing failed: {e}")))
    }

    async fn verify(&self, secret: &str, hash: &str) -> bool {
        let secret = secret.to_owned();
        let hash = hash.to_owned();
        match tokio::task::spawn_blocking(move || bcrypt::verify(secret, &hash)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                warn!("Stored hash could not be verified: {e}");
                false
            }
            Err(e) => {
                warn!("Verification task failed: {e}");
                false
            }
        }
    }
}
