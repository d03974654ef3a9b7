//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Default upstream market-data endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Runtime configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote market-data API
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
    /// Cache freshness window in milliseconds
    pub cache_ttl_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Path of the JSON file backing the key-value store
    pub storage_path: PathBuf,
    /// Page size used when a list request does not specify one
    pub default_per_page: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Upstream API base (default: CoinGecko v3)
    /// - `REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 15)
    /// - `CACHE_TTL_MS` - Cache freshness window (default: 300000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORAGE_PATH` - Key-value store file (default: crypto_tracker_store.json)
    /// - `DEFAULT_PER_PAGE` - Default list page size (default: 50)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
            request_timeout: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout),
            cache_ttl_ms: env::var("CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_ms),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            storage_path: env::var("STORAGE_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            default_per_page: env::var("DEFAULT_PER_PAGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u32| *v > 0)
                .unwrap_or(defaults.default_per_page),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: 15,
            cache_ttl_ms: 300_000,
            server_port: 3000,
            storage_path: PathBuf::from("crypto_tracker_store.json"),
            default_per_page: 50,
        }
    }
}
