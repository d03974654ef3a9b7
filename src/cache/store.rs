//! Cache Store Module
//!
//! Time-boxed cache-aside layer over an injected key-value backend.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock, DEFAULT_TTL_MS};
use crate::error::CacheError;
use crate::storage::KeyValueStore;

// == Cache Store ==
/// Generic read-through cache keyed by string.
///
/// Every read goes to the backing store; no entries are mirrored in memory.
/// Failures of the backing store never reach the caller: reads degrade to a
/// miss and writes to a no-op.
pub struct CacheStore {
    /// Persistence backend
    backend: Arc<dyn KeyValueStore>,
    /// Time source for freshness checks
    clock: Arc<dyn Clock>,
    /// Freshness window in milliseconds
    ttl_ms: u64,
    /// Performance statistics
    stats: Mutex<CacheStats>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a CacheStore over `backend` with the default 5 minute TTL.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            ttl_ms: DEFAULT_TTL_MS,
            stats: Mutex::new(CacheStats::new()),
        }
    }

    /// Overrides the freshness window.
    pub fn with_ttl(mut self, ttl_ms: u64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    /// Overrides the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the freshness window in milliseconds.
    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    // == Get ==
    /// Returns the cached payload if it exists and is still fresh.
    ///
    /// Missing, expired and undecodable entries are all a clean miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = self.clock.now_ms();
        match self.read_entry::<T>(key).await {
            Some(entry) if entry.is_fresh(now, self.ttl_ms) => {
                self.record(CacheStats::record_hit);
                Some(entry.into_data())
            }
            Some(entry) => {
                debug!("Cache entry {} expired ({} ms old)", key, entry.age_ms(now));
                self.record(CacheStats::record_miss);
                None
            }
            None => {
                self.record(CacheStats::record_miss);
                None
            }
        }
    }

    // == Get Stale ==
    /// Returns whatever payload was last stored under `key`, regardless of age.
    ///
    /// Only meant for fallback paths.
    pub async fn get_stale<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.read_entry::<T>(key).await?;
        debug!(
            "Serving stale cache entry {} ({} ms old)",
            key,
            entry.age_ms(self.clock.now_ms())
        );
        self.record(CacheStats::record_stale_hit);
        Some(entry.into_data())
    }

    // == Set ==
    /// Stores `data` under `key` stamped with the current time.
    ///
    /// Overwrites any prior entry. Write failures are logged and swallowed.
    pub async fn set<T: Serialize + ?Sized + Sync>(&self, key: &str, data: &T) {
        let entry = CacheEntry::new(data, self.clock.now_ms());
        let serialized = match serde_json::to_string(&entry) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!("Cache write error for {}: {}", key, e);
                self.record(CacheStats::record_write_failure);
                return;
            }
        };

        if let Err(e) = self.backend.set(key, serialized).await {
            warn!("Cache write error for {}: {}", key, e);
            self.record(CacheStats::record_write_failure);
        }
    }

    // == Clear All ==
    /// Removes every key starting with `prefix` in one batch.
    ///
    /// Returns the number of keys removed. Storage failures are logged and
    /// reported as zero removals.
    pub async fn clear_all(&self, prefix: &str) -> usize {
        let keys = match self.backend.list_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Cache clear error: {}", e);
                return 0;
            }
        };

        let matching: Vec<String> = keys
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect();

        if matching.is_empty() {
            return 0;
        }

        match self.backend.remove_many(&matching).await {
            Ok(()) => {
                debug!("Cleared {} cache entries with prefix {}", matching.len(), prefix);
                matching.len()
            }
            Err(e) => {
                warn!("Cache clear error: {}", e);
                0
            }
        }
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reads and decodes the entry at `key`, logging any failure as a miss.
    async fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        match self.try_read_entry(key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache read error: {}", e);
                if matches!(e, CacheError::Corrupt { .. }) {
                    self.record(CacheStats::record_corrupt);
                }
                None
            }
        }
    }

    async fn try_read_entry<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<CacheEntry<T>>, CacheError> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| CacheError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    fn record(&self, update: impl FnOnce(&mut CacheStats)) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        update(&mut stats);
    }
}
