use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::instrument;
use warden_core::store::{StoreError, UserStore};
use warden_core::user::User;

use crate::cipher::CbcCipher;
use crate::key_provider::KeyProvider;

/// File-backed user store: the collection is serialized to a canonical
/// JSON array, encrypted with AES-256-CBC, and written as a small JSON
/// blob `{iv, ciphertext}` (both base64). The whole file is replaced on
/// every save; an absent file means an empty collection.
pub struct EncryptedUserStore<P: KeyProvider> {
    path: PathBuf,
    key_provider: P,
}

#[derive(Debug, Serialize, Deserialize)]
struct EncryptedBlob {
    iv: String,
    ciphertext: String,
}

impl<P: KeyProvider> EncryptedUserStore<P> {
    pub fn new(path: impl Into<PathBuf>, key_provider: P) -> Self {
        Self {
            path: path.into(),
            key_provider,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn cipher(&self) -> Result<CbcCipher, StoreError> {
        let material = self
            .key_provider
            .get_or_create()
            .await
            .map_err(|e| StoreError::Io {
                reason: format!("key provider: {e}"),
            })?;
        Ok(CbcCipher::new(material.bytes))
    }
}

#[async_trait]
impl<P: KeyProvider> UserStore for EncryptedUserStore<P> {
    #[instrument(skip_all)]
    async fn load(&self) -> Result<Vec<User>, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            // Bootstrap case: no file yet, not an error.
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_err(err)),
        };

        let blob: EncryptedBlob = serde_json::from_slice(&raw).map_err(corrupt)?;
        let iv = STANDARD.decode(blob.iv).map_err(corrupt)?;
        let ciphertext = STANDARD.decode(blob.ciphertext).map_err(corrupt)?;

        let plaintext = self.cipher().await?.decrypt(&iv, &ciphertext).map_err(corrupt)?;
        serde_json::from_slice(&plaintext).map_err(corrupt)
    }

    #[instrument(skip_all, fields(users = users.len()))]
    async fn save(&self, users: &[User]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(users).map_err(corrupt)?;
        let (iv, ciphertext) = self.cipher().await?.encrypt(&json);

        let blob = EncryptedBlob {
            iv: STANDARD.encode(iv),
            ciphertext: STANDARD.encode(ciphertext),
        };
        write_blob(&self.path, &blob)
    }
}

/// Write the blob through a named tempfile and an atomic rename, so a
/// concurrent reader never observes a half-written file.
fn write_blob(path: &Path, blob: &EncryptedBlob) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(io_err)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
    let json = serde_json::to_vec(blob).map_err(corrupt)?;
    tmp.write_all(&json).map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

fn io_err<E: ToString>(err: E) -> StoreError {
    StoreError::Io {
        reason: err.to_string(),
    }
}

fn corrupt<E: ToString>(err: E) -> StoreError {
    StoreError::Corrupt {
        reason: err.to_string(),
    }
}
