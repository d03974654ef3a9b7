//! Market Data Client
//!
//! Cache-aside fetching of list and detail data with stale-on-error fallback.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::keys::{details_key, list_key};
use super::types::{CryptoDetails, Cryptocurrency, ListQuery};
use super::upstream::{MarketApi, MarketsRequest};
use crate::cache::{CacheStore, CACHE_KEY_PREFIX};
use crate::error::{MarketError, Result, TransportError};

/// Result of a list fetch that reached the upstream.
enum ListFetch {
    /// Records to cache and return
    Fetched(Vec<Cryptocurrency>),
    /// Search matched nothing; return empty without caching
    NoMatches,
}

// == Market Data Client ==
/// Produces normalized market data, preferring fresh cache and falling back
/// to stale cache when the network fails.
pub struct MarketDataClient {
    api: Arc<dyn MarketApi>,
    cache: Arc<CacheStore>,
}

impl MarketDataClient {
    // == Constructor ==
    pub fn new(api: Arc<dyn MarketApi>, cache: Arc<CacheStore>) -> Self {
        Self { api, cache }
    }

    /// The cache this client reads and writes.
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    // == Fetch List ==
    /// Returns one page of cryptocurrencies in upstream order.
    ///
    /// A fresh cache entry for the same parameters is returned without any
    /// network call unless `use_cache` is false. On network failure the last
    /// cached page for these parameters is returned regardless of age.
    pub async fn fetch_list(&self, query: &ListQuery) -> Result<Vec<Cryptocurrency>> {
        let key = list_key(query);

        if query.use_cache {
            if let Some(cached) = self.cache.get::<Vec<Cryptocurrency>>(&key).await {
                debug!("List cache hit for {}", key);
                return Ok(cached);
            }
        }

        match self.fetch_list_upstream(query).await {
            Ok(ListFetch::Fetched(coins)) => {
                self.cache.set(&key, &coins).await;
                Ok(coins)
            }
            Ok(ListFetch::NoMatches) => Ok(Vec::new()),
            Err(err) => self.recover_stale(&key, err).await,
        }
    }

    async fn fetch_list_upstream(
        &self,
        query: &ListQuery,
    ) -> std::result::Result<ListFetch, TransportError> {
        let request = if query.is_search() {
            let search = self.api.search(&query.search_query).await?;
            let Some(ids) = search.id_filter(query.per_page as usize) else {
                debug!("Search '{}' matched no coins", query.search_query);
                return Ok(ListFetch::NoMatches);
            };
            // Search results are not paginated upstream
            MarketsRequest {
                vs_currency: query.currency,
                ids: Some(ids),
                category: None,
                order: query.sort_order,
                per_page: query.per_page,
                page: 1,
            }
        } else {
            MarketsRequest {
                vs_currency: query.currency,
                ids: None,
                category: Some(query.category.clone()).filter(|c| !c.is_empty()),
                order: query.sort_order,
                per_page: query.per_page,
                page: query.page,
            }
        };

        let records = self.api.markets(&request).await?;
        debug!("Fetched {} market records", records.len());
        Ok(ListFetch::Fetched(
            records.into_iter().map(|r| r.normalize()).collect(),
        ))
    }

    // == Fetch Details ==
    /// Returns the detail record for coin `id`.
    ///
    /// The normalized record is what gets cached. Falls back to a stale
    /// entry on network failure.
    pub async fn fetch_details(&self, id: &str, use_cache: bool) -> Result<CryptoDetails> {
        let key = details_key(id);

        if use_cache {
            if let Some(cached) = self.cache.get::<CryptoDetails>(&key).await {
                debug!("Details cache hit for {}", key);
                return Ok(cached);
            }
        }

        match self.api.coin(id).await {
            Ok(raw) => {
                let details = raw.normalize(id);
                self.cache.set(&key, &details).await;
                Ok(details)
            }
            Err(err) => self.recover_stale(&key, err).await,
        }
    }

    // == Clear Cache ==
    /// Drops every cached list and detail entry. Never fails.
    pub async fn clear_cache(&self) -> usize {
        let removed = self.cache.clear_all(CACHE_KEY_PREFIX).await;
        info!("Cleared {} cached market entries", removed);
        removed
    }

    /// Serves the stale entry at `key`, or classifies `err` if there is none.
    async fn recover_stale<T: DeserializeOwned>(&self, key: &str, err: TransportError) -> Result<T> {
        match self.cache.get_stale::<T>(key).await {
            Some(stale) => {
                info!("Returning stale cache for {} due to error: {}", key, err);
                Ok(stale)
            }
            None => {
                let classified = MarketError::from(err);
                warn!("Fetch for {} failed with no cache to fall back on: {}", key, classified);
                Err(classified)
            }
        }
    }
}
