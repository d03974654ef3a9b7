//! Cache Key Scheme
//!
//! Deterministic keys under which market data is cached.

use super::types::{Currency, ListQuery, SortOrder};

/// Prefix of list cache keys
pub const LIST_KEY_PREFIX: &str = "cache_coins_list";

/// Prefix of detail cache keys
pub const DETAILS_KEY_PREFIX: &str = "cache_coin_details_";

/// Builds the cache key for a list request.
///
/// Format: `cache_coins_list_<currency>_<category>_<sort>_<page>_<search>`.
/// The page size is not part of the key.
pub fn build_list_key(
    currency: Currency,
    category: &str,
    sort_order: SortOrder,
    page: u32,
    search_query: &str,
) -> String {
    format!(
        "{}_{}_{}_{}_{}_{}",
        LIST_KEY_PREFIX, currency, category, sort_order, page, search_query
    )
}

/// Cache key for `query`.
pub fn list_key(query: &ListQuery) -> String {
    build_list_key(
        query.currency,
        &query.category,
        query.sort_order,
        query.page,
        &query.search_query,
    )
}

/// Cache key for the details of coin `id`.
pub fn details_key(id: &str) -> String {
    format!("{}{}", DETAILS_KEY_PREFIX, id)
}

/// True for ids shaped like upstream coin ids (`bitcoin`, `usd-coin`, `wrapped-steth`).
///
/// Ids are lowercase ASCII letters, digits, `-`, `_` and `.`, and are not made of dots only.
pub fn is_valid_coin_id(id: &str) -> bool {
    !id.trim_matches('.').is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'))
}
