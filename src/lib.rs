//! Crypto Tracker - market data for a cryptocurrency tracking app
//!
//! Fetches coin listings and details from a CoinGecko-style API, caches them
//! with a TTL and stale fallback, and keeps user favorites and settings.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod market;
pub mod models;
pub mod preferences;
pub mod storage;

pub use api::AppState;
pub use config::Config;
pub use error::{MarketError, Result};
pub use market::{ListPager, ListQuery, MarketDataClient};
