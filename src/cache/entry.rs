//! Cache Entry Module
//!
//! Defines the persisted envelope for cached payloads.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached payload together with the moment it was written.
///
/// Serialized as `{ "data": ..., "timestamp": <unix ms> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Write timestamp (Unix milliseconds)
    pub timestamp: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Wraps `data` with the given write timestamp.
    pub fn new(data: T, timestamp: u64) -> Self {
        Self { data, timestamp }
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was written.
    ///
    /// Saturates at zero if the clock moved backwards.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    // == Is Fresh ==
    /// Checks whether the entry is still inside its freshness window.
    ///
    /// Boundary condition: an entry is fresh only while its age is strictly
    /// below `ttl_ms`. Once the full TTL has elapsed it is stale.
    pub fn is_fresh(&self, now: u64, ttl_ms: u64) -> bool {
        self.age_ms(now) < ttl_ms
    }

    /// Consumes the entry and returns the payload.
    pub fn into_data(self) -> T {
        self.data
    }
}
