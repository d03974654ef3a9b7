//! File-backed key-value store
//!
//! Keeps every key in a single JSON object on disk. The file is loaded
//! lazily on first access and rewritten after each mutation. The in-memory
//! copy only changes once the rewrite has succeeded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, warn};

use super::KeyValueStore;
use crate::error::StorageError;

type Entries = BTreeMap<String, String>;

/// Persistent store backed by one JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Loaded contents, `None` until first access
    entries: Mutex<Option<Entries>>,
}

impl FileStore {
    /// Creates a store for `path`. Nothing is read until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Entries, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store file {} not found, starting empty", self.path.display());
                return Ok(Entries::new());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let aside = self.corrupt_path();
                warn!(
                    "Store file {} is unreadable ({}), moving it to {} and starting empty",
                    self.path.display(),
                    e,
                    aside.display()
                );
                if let Err(rename_err) = tokio::fs::rename(&self.path, &aside).await {
                    error!(
                        "Could not move unreadable store file {}: {}",
                        self.path.display(),
                        rename_err
                    );
                    return Err(rename_err.into());
                }
                Ok(Entries::new())
            }
        }
    }

    /// Where an unreadable store file is kept, e.g. `store.json.corrupt`.
    pub fn corrupt_path(&self) -> PathBuf {
        let mut aside = self.path.clone().into_os_string();
        aside.push(".corrupt");
        PathBuf::from(aside)
    }

    async fn persist(&self, entries: &Entries) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(entries)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serialized).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Locks the entries, loading the file on first access.
    async fn loaded(&self) -> Result<MutexGuard<'_, Option<Entries>>, StorageError> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        Ok(guard)
    }

    async fn read<R>(&self, op: impl FnOnce(&Entries) -> R) -> Result<R, StorageError> {
        let guard = self.loaded().await?;
        match guard.as_ref() {
            Some(entries) => Ok(op(entries)),
            None => Err(StorageError::Unavailable("store not loaded".to_string())),
        }
    }

    /// Applies `op` to a copy of the entries and keeps the copy once it is on disk.
    ///
    /// `op` returns whether it changed anything; unchanged copies are discarded.
    async fn write(&self, op: impl FnOnce(&mut Entries) -> bool) -> Result<(), StorageError> {
        let mut guard = self.loaded().await?;
        let Some(current) = guard.as_mut() else {
            return Err(StorageError::Unavailable("store not loaded".to_string()));
        };

        let mut updated = current.clone();
        if !op(&mut updated) {
            return Ok(());
        }
        self.persist(&updated).await?;
        *current = updated;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.read(|entries| entries.get(key).cloned()).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.write(|entries| {
            entries.insert(key.to_string(), value);
            true
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.write(|entries| entries.remove(key).is_some()).await
    }

    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError> {
        self.write(|entries| {
            let mut changed = false;
            for key in keys {
                changed |= entries.remove(key).is_some();
            }
            changed
        })
        .await
    }

    async fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        self.read(|entries| entries.keys().cloned().collect()).await
    }
}
