//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming query strings and bodies.

use serde::Deserialize;

use crate::market::{Currency, ListQuery, SortOrder};
use crate::preferences::AppSettings;

/// Largest page size the upstream accepts
pub const MAX_PER_PAGE: u32 = 250;

/// Query string of `GET /coins`.
///
/// Missing currency and category fall back to the stored settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub currency: Option<Currency>,
    pub category: Option<String>,
    pub order: Option<SortOrder>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub use_cache: Option<bool>,
}

impl ListParams {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.page == Some(0) {
            return Some("Page must be 1 or greater".to_string());
        }
        match self.per_page {
            Some(0) => Some("per_page must be greater than 0".to_string()),
            Some(n) if n > MAX_PER_PAGE => Some(format!(
                "per_page exceeds maximum of {}",
                MAX_PER_PAGE
            )),
            _ => None,
        }
    }

    /// Builds the list query, filling gaps from `settings` and `default_per_page`.
    pub fn into_query(self, settings: &AppSettings, default_per_page: u32) -> ListQuery {
        let mut query = ListQuery::new(self.currency.unwrap_or(settings.currency))
            .with_category(
                self.category
                    .unwrap_or_else(|| settings.default_category.clone()),
            )
            .with_page(self.page.unwrap_or(1))
            .with_per_page(self.per_page.unwrap_or(default_per_page))
            .with_search(self.search.unwrap_or_default());
        if let Some(order) = self.order {
            query = query.with_sort_order(order);
        }
        if let Some(use_cache) = self.use_cache {
            query = query.with_use_cache(use_cache);
        }
        query
    }
}

/// Query string of `GET /coins/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsParams {
    pub use_cache: Option<bool>,
}
