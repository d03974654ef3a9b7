//! List Pager
//!
//! Accumulates pages of a list query for infinite-scroll style consumers.

use std::sync::Arc;

use super::client::MarketDataClient;
use super::types::{Cryptocurrency, ListQuery};
use crate::error::Result;

/// Page size the pager requests by default
pub const PAGER_PER_PAGE: u32 = 25;

/// Returns true when a page of `len` items suggests more pages exist.
///
/// A full page means "maybe more"; a short page means the list is exhausted.
pub fn has_more(len: usize, per_page: u32) -> bool {
    len == per_page as usize
}

/// Pages through a list query, appending each loaded page.
pub struct ListPager {
    client: Arc<MarketDataClient>,
    query: ListQuery,
    items: Vec<Cryptocurrency>,
    has_more: bool,
}

impl ListPager {
    /// Creates a pager for `query`. The query's page is ignored; paging
    /// always starts at 1.
    pub fn new(client: Arc<MarketDataClient>, query: ListQuery) -> Self {
        Self {
            client,
            query: query.with_page(1),
            items: Vec::new(),
            has_more: true,
        }
    }

    /// Creates a pager with the default page size.
    pub fn with_default_page_size(client: Arc<MarketDataClient>, query: ListQuery) -> Self {
        Self::new(client, query.with_per_page(PAGER_PER_PAGE))
    }

    /// Loads page 1, using the cache when allowed.
    pub async fn load_first(&mut self) -> Result<&[Cryptocurrency]> {
        self.load_page(1, true).await
    }

    /// Reloads page 1 bypassing the fresh cache.
    pub async fn refresh(&mut self) -> Result<&[Cryptocurrency]> {
        self.load_page(1, false).await
    }

    /// Appends the next page if more may exist. Returns the number of new items.
    pub async fn load_more(&mut self) -> Result<usize> {
        if !self.has_more {
            return Ok(0);
        }
        let before = self.items.len();
        let next = self.query.page + 1;
        self.load_page(next, true).await?;
        Ok(self.items.len() - before)
    }

    pub fn items(&self) -> &[Cryptocurrency] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Last successfully loaded page.
    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    async fn load_page(&mut self, page: u32, use_cache: bool) -> Result<&[Cryptocurrency]> {
        let request = self
            .query
            .clone()
            .with_page(page)
            .with_use_cache(use_cache);
        let batch = self.client.fetch_list(&request).await?;

        self.has_more = has_more(batch.len(), self.query.per_page);
        if page == 1 {
            self.items = batch;
        } else {
            self.items.extend(batch);
        }
        self.query.page = page;
        Ok(self.items.as_slice())
    }
}
