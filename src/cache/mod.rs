//! Cache Module
//!
//! Time-boxed cache-aside storage with stale fallback.

mod clock;
mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Freshness window for cached entries (5 minutes)
pub const DEFAULT_TTL_MS: u64 = 5 * 60 * 1000;

/// Prefix shared by every cache key in the backing store
pub const CACHE_KEY_PREFIX: &str = "cache_";
