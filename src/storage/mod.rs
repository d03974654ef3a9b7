//! Storage Module
//!
//! Asynchronous string-keyed persistence used by the cache and preferences.

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::StorageError;

pub use file::FileStore;
pub use memory::MemoryStore;

// == Key-Value Store ==
/// Opaque asynchronous string-keyed store.
///
/// Implementations own their own synchronization; callers share them
/// behind an `Arc<dyn KeyValueStore>`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any prior value.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Removes a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Removes every listed key in one batch.
    async fn remove_many(&self, keys: &[String]) -> Result<(), StorageError>;

    /// Lists every key currently stored.
    async fn list_keys(&self) -> Result<Vec<String>, StorageError>;
}
