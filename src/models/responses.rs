//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::market::Cryptocurrency;

/// Response body for `GET /coins`
#[derive(Debug, Clone, Serialize)]
pub struct CoinListResponse {
    pub coins: Vec<Cryptocurrency>,
    pub page: u32,
    pub per_page: u32,
    /// True when the page was full, so another page may exist
    pub has_more: bool,
}

/// Response body for `DELETE /cache`
#[derive(Debug, Clone, Serialize)]
pub struct ClearCacheResponse {
    pub message: String,
    pub removed: usize,
}

impl ClearCacheResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cleared {} cached entries", removed),
            removed,
        }
    }
}

/// Response body for `GET /favorites`
#[derive(Debug, Clone, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<String>,
}

/// Response body for `POST /favorites/:id/toggle`
#[derive(Debug, Clone, Serialize)]
pub struct ToggleFavoriteResponse {
    pub id: String,
    pub favorite: bool,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub stale_hits: u64,
    pub corrupt_entries: u64,
    pub write_failures: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            stale_hits: stats.stale_hits,
            corrupt_entries: stats.corrupt_entries,
            write_failures: stats.write_failures,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_cache_response_message() {
        let resp = ClearCacheResponse::new(3);
        assert_eq!(resp.message, "Cleared 3 cached entries");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"removed\":3"));
    }

    #[test]
    fn test_stats_response_from_cache_stats() {
        let stats = CacheStats {
            hits: 8,
            misses: 2,
            stale_hits: 1,
            ..Default::default()
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.stale_hits, 1);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
