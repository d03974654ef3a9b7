//! Market Module
//!
//! Fetching, normalizing and caching cryptocurrency market data.

pub mod client;
pub mod keys;
pub mod pager;
pub mod raw;
pub mod types;
pub mod upstream;

pub use client::MarketDataClient;
pub use keys::{build_list_key, details_key, is_valid_coin_id, list_key};
pub use pager::{has_more, ListPager};
pub use types::{
    Category, CryptoDetails, Cryptocurrency, Currency, Links, ListQuery, SortOrder, CATEGORIES,
};
pub use upstream::{HttpMarketApi, MarketApi, MarketsRequest};
