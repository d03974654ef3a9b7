//! Favorites Store
//!
//! Persists the user's favorite coin ids in insertion order.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Backing-store key of the favorites list
pub const FAVORITES_KEY: &str = "@cryptotracker_favorites";

/// Favorite coin ids stored as a JSON array.
pub struct FavoritesStore {
    backend: Arc<dyn KeyValueStore>,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl FavoritesStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the favorite ids. Load failures yield an empty list.
    pub async fn list(&self) -> Vec<String> {
        match self.try_load().await {
            Ok(favorites) => favorites,
            Err(e) => {
                error!("Failed to load favorites: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn is_favorite(&self, id: &str) -> bool {
        self.list().await.iter().any(|fav| fav == id)
    }

    /// Adds `id` if absent, removes it if present.
    ///
    /// Returns whether `id` is a favorite afterwards. If the write fails the
    /// stored list is unchanged and the error is returned.
    pub async fn toggle(&self, id: &str) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut favorites = self.list().await;

        let now_favorite = match favorites.iter().position(|fav| fav == id) {
            Some(index) => {
                favorites.remove(index);
                false
            }
            None => {
                favorites.push(id.to_string());
                true
            }
        };

        self.save(&favorites).await?;
        Ok(now_favorite)
    }

    /// Removes every favorite.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.save(&[]).await
    }

    async fn try_load(&self) -> Result<Vec<String>, StorageError> {
        match self.backend.get(FAVORITES_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, favorites: &[String]) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(favorites)?;
        if let Err(e) = self.backend.set(FAVORITES_KEY, serialized).await {
            warn!("Failed to save favorites: {}", e);
            return Err(e);
        }
        Ok(())
    }
}
