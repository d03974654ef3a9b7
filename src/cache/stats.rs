//! Cache Statistics Module
//!
//! Tracks cache effectiveness: fresh hits, misses, stale rescues and
//! recovered storage problems.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of fresh cache retrievals
    pub hits: u64,
    /// Number of fresh lookups that found nothing usable
    pub misses: u64,
    /// Number of stale entries served as a fallback
    pub stale_hits: u64,
    /// Number of stored payloads that failed to decode
    pub corrupt_entries: u64,
    /// Number of writes the backing store rejected
    pub write_failures: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the fresh-hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_stale_hit(&mut self) {
        self.stale_hits += 1;
    }

    pub fn record_corrupt(&mut self) {
        self.corrupt_entries += 1;
    }

    pub fn record_write_failure(&mut self) {
        self.write_failures += 1;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_stale_hits_do_not_affect_hit_rate() {
        let mut stats = CacheStats::new();
        stats.record_miss();
        stats.record_stale_hit();
        assert_eq!(stats.stale_hits, 1);
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_failure_counters() {
        let mut stats = CacheStats::new();
        stats.record_corrupt();
        stats.record_write_failure();
        stats.record_write_failure();
        assert_eq!(stats.corrupt_entries, 1);
        assert_eq!(stats.write_failures, 2);
    }
}
