use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;

use crate::user::User;

/// Errors produced by user store implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing data exists but cannot be decrypted or parsed. There
    /// is no recovery path short of operator intervention.
    #[error("store is corrupt: {reason}")]
    Corrupt { reason: String },
    /// Underlying file-system failure.
    #[error("store i/o failure: {reason}")]
    Io { reason: String },
}

/// Contract for the durable user collection. `load` on a fresh system
/// returns an empty collection; `save` fully replaces the previous
/// state. Implementations do not enforce the single-writer discipline —
/// the caller serializes mutating load/save cycles.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn load(&self) -> Result<Vec<User>, StoreError>;
    async fn save(&self, users: &[User]) -> Result<(), StoreError>;
}

/// In-memory store for tests and smoke runs. Holds the collection as
/// plain data; production uses the encrypted file store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    inner: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn load(&self) -> Result<Vec<User>, StoreError> {
        let users = self.inner.lock().map_err(|err| StoreError::Io {
            reason: format!("lock poisoned: {err}"),
        })?;
        Ok(users.clone())
    }

    async fn save(&self, users: &[User]) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().map_err(|err| StoreError::Io {
            reason: format!("lock poisoned: {err}"),
        })?;
        *guard = users.to_vec();
        Ok(())
    }
}
