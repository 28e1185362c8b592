//! Storage collaborator: "store bytes, get a URL and checksum back".
//!
//! Backends are chosen once at startup and injected as
//! `Arc<dyn StorageBackend>`.

use crate::checksum::md5_hex;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage rejected {name}: {reason}")]
    Rejected { name: String, reason: String },
}

/// Where stored bytes ended up, as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub url: String,
    /// Lower-case hex MD5 of the bytes the backend holds
    pub checksum: String,
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn store(
        &self,
        bytes: &[u8],
        suggested_name: &str,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Delete an object stored under `suggested_name`. Removing a name that
    /// isn't held is not an error.
    async fn remove(&self, suggested_name: &str) -> Result<(), StorageError>;
}

/// Keep names to a single safe path component
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

/// An entry held by [`InMemoryStorage`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Default)]
enum Corruption {
    #[default]
    None,
    All,
    Named(String),
}

/// In-process storage for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    objects: Mutex<BTreeMap<String, MemoryObject>>,
    corrupt: Corruption,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that flips a byte of everything it stores, to exercise
    /// checksum verification.
    pub fn corrupting() -> Self {
        Self {
            corrupt: Corruption::All,
            ..Self::default()
        }
    }

    /// Storage that only damages the object stored under `name`.
    pub fn corrupting_only(name: &str) -> Self {
        Self {
            corrupt: Corruption::Named(sanitize_name(name)),
            ..Self::default()
        }
    }

    fn corrupts(&self, name: &str) -> bool {
        match &self.corrupt {
            Corruption::None => false,
            Corruption::All => true,
            Corruption::Named(target) => target == name,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, MemoryObject>>, StorageError> {
        self.objects
            .lock()
            .map_err(|_| StorageError::Unavailable("storage lock poisoned".to_string()))
    }

    pub fn get(&self, name: &str) -> Option<MemoryObject> {
        self.objects.lock().ok()?.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn store(
        &self,
        bytes: &[u8],
        suggested_name: &str,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let name = sanitize_name(suggested_name);
        let mut held = bytes.to_vec();
        if self.corrupts(&name) {
            if let Some(first) = held.first_mut() {
                *first ^= 0xFF;
            }
        }
        let checksum = md5_hex(&held);

        self.lock()?.insert(
            name.clone(),
            MemoryObject {
                bytes: held,
                content_type: content_type.to_string(),
            },
        );

        Ok(StoredObject {
            url: format!("memory://{}", name),
            checksum,
        })
    }

    async fn remove(&self, suggested_name: &str) -> Result<(), StorageError> {
        self.lock()?.remove(&sanitize_name(suggested_name));
        Ok(())
    }
}

/// Writes objects as files under a root directory.
///
/// The reported checksum is computed from the file as read back, so a short
/// or damaged write shows up as a mismatch.
#[derive(Debug, Clone)]
pub struct LocalDirStorage {
    root: PathBuf,
}

impl LocalDirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl StorageBackend for LocalDirStorage {
    async fn store(
        &self,
        bytes: &[u8],
        suggested_name: &str,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(sanitize_name(suggested_name));
        tokio::fs::write(&path, bytes).await?;

        let written = tokio::fs::read(&path).await?;
        log::debug!(
            "Stored {} ({}, {} bytes)",
            path.display(),
            content_type,
            written.len()
        );

        let absolute = tokio::fs::canonicalize(&path).await?;
        Ok(StoredObject {
            url: format!("file://{}", absolute.display()),
            checksum: md5_hex(&written),
        })
    }

    async fn remove(&self, suggested_name: &str) -> Result<(), StorageError> {
        let path = self.root.join(sanitize_name(suggested_name));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
