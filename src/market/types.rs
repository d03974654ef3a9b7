//! Market Domain Types
//!
//! Normalized records handed to the presentation layer, plus the query
//! parameters and display metadata that drive list requests.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// == Currency ==
/// Quote currency for prices and market metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Btc,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Btc,
    ];

    /// Wire code used by the upstream API and in cache keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Jpy => "jpy",
            Currency::Btc => "btc",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Btc => "₿",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar",
            Currency::Eur => "Euro",
            Currency::Gbp => "British Pound",
            Currency::Jpy => "Japanese Yen",
            Currency::Btc => "Bitcoin",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Sort Order ==
/// Upstream ordering of list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    MarketCapDesc,
    MarketCapAsc,
    PriceDesc,
    PriceAsc,
    VolumeDesc,
    NameAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        SortOrder::MarketCapDesc,
        SortOrder::MarketCapAsc,
        SortOrder::PriceDesc,
        SortOrder::PriceAsc,
        SortOrder::VolumeDesc,
        SortOrder::NameAsc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "market_cap_desc",
            SortOrder::MarketCapAsc => "market_cap_asc",
            SortOrder::PriceDesc => "price_desc",
            SortOrder::PriceAsc => "price_asc",
            SortOrder::VolumeDesc => "volume_desc",
            SortOrder::NameAsc => "name_asc",
        }
    }

    /// Short label for sort pickers.
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "Market Cap ↓",
            SortOrder::MarketCapAsc => "Market Cap ↑",
            SortOrder::PriceDesc => "Price ↓",
            SortOrder::PriceAsc => "Price ↑",
            SortOrder::VolumeDesc => "Volume ↓",
            SortOrder::NameAsc => "Name A-Z",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Categories ==
/// A list filter understood by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Upstream category id, empty for "no filter"
    pub id: &'static str,
    pub name: &'static str,
}

/// Categories offered for filtering.
pub const CATEGORIES: [Category; 8] = [
    Category { id: "", name: "All" },
    Category { id: "decentralized-finance-defi", name: "DeFi" },
    Category { id: "non-fungible-tokens-nft", name: "NFT" },
    Category { id: "gaming", name: "Gaming" },
    Category { id: "layer-1", name: "Layer 1" },
    Category { id: "layer-2", name: "Layer 2" },
    Category { id: "meme-token", name: "Meme" },
    Category { id: "stablecoins", name: "Stablecoins" },
];

// == Cryptocurrency ==
/// Normalized market snapshot for one asset.
///
/// `None` means the source did not report a value, which is distinct from zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cryptocurrency {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub market_cap_rank: u32,
    pub fully_diluted_valuation: Option<f64>,
    pub total_volume: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub price_change_24h: f64,
    pub price_change_percentage_24h: f64,
    pub market_cap_change_24h: f64,
    pub market_cap_change_percentage_24h: f64,
    pub circulating_supply: f64,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub ath: f64,
    pub ath_change_percentage: f64,
    pub ath_date: String,
    pub atl: f64,
    pub atl_change_percentage: f64,
    pub atl_date: String,
    pub last_updated: String,
}

// == Links ==
/// Project links. Each list is ordered and its first element is canonical.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub homepage: Vec<String>,
    #[serde(default)]
    pub blockchain_site: Vec<String>,
    /// Any other link groups, kept as received
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl Links {
    /// Canonical homepage, if one is listed.
    pub fn primary_homepage(&self) -> Option<&str> {
        first_non_blank(&self.homepage)
    }

    /// Canonical blockchain explorer, if one is listed.
    pub fn primary_explorer(&self) -> Option<&str> {
        first_non_blank(&self.blockchain_site)
    }
}

fn first_non_blank(urls: &[String]) -> Option<&str> {
    urls.first()
        .map(String::as_str)
        .filter(|url| !url.trim().is_empty())
}

// == Crypto Details ==
/// Cryptocurrency snapshot plus long-form detail.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CryptoDetails {
    #[serde(flatten)]
    pub coin: Cryptocurrency,
    /// Description text keyed by language code
    #[serde(default)]
    pub description: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub links: Option<Links>,
    /// Per-currency market breakdown, passed through from the source
    #[serde(default)]
    pub market_data: Option<serde_json::Value>,
}

impl CryptoDetails {
    /// English description, if present and non-empty.
    pub fn description_en(&self) -> Option<&str> {
        self.description
            .as_ref()
            .and_then(|d| d.get("en"))
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }
}

// == List Query ==
/// Default page size for list requests
pub const DEFAULT_PER_PAGE: u32 = 50;

/// Parameters of a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub currency: Currency,
    /// Category filter id, empty for none
    pub category: String,
    pub sort_order: SortOrder,
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
    pub search_query: String,
    /// When false the fresh-cache lookup is skipped
    pub use_cache: bool,
}

impl ListQuery {
    /// Creates a query with the default category, sort, paging and cache policy.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            category: String::new(),
            sort_order: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search_query: String::new(),
            use_cache: true,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Sets the page, clamped to at least 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size, clamped to at least 1.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn with_search(mut self, search_query: impl Into<String>) -> Self {
        self.search_query = search_query.into();
        self
    }

    pub fn with_use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// True when the query should go through the search endpoint.
    pub fn is_search(&self) -> bool {
        !self.search_query.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_codes_match_serde() {
        for currency in Currency::ALL {
            let json = serde_json::to_string(&currency).unwrap();
            assert_eq!(json, format!("\"{}\"", currency.as_str()));
        }
        for order in SortOrder::ALL {
            let json = serde_json::to_string(&order).unwrap();
            assert_eq!(json, format!("\"{}\"", order.as_str()));
        }
    }

    #[test]
    fn test_currency_display_info() {
        assert_eq!(Currency::Eur.symbol(), "€");
        assert_eq!(Currency::Btc.display_name(), "Bitcoin");
        assert_eq!(Currency::default(), Currency::Usd);
    }

    #[test]
    fn test_categories_start_with_all() {
        assert_eq!(CATEGORIES[0].id, "");
        assert_eq!(CATEGORIES[0].name, "All");
        assert!(CATEGORIES.iter().any(|c| c.id == "layer-2"));
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::new(Currency::Usd);
        assert_eq!(query.category, "");
        assert_eq!(query.sort_order, SortOrder::MarketCapDesc);
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 50);
        assert_eq!(query.search_query, "");
        assert!(query.use_cache);
        assert!(!query.is_search());
    }

    #[test]
    fn test_list_query_clamps_paging() {
        let query = ListQuery::new(Currency::Usd).with_page(0).with_per_page(0);
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 1);
    }

    #[test]
    fn test_blank_search_is_not_search() {
        assert!(!ListQuery::new(Currency::Usd).with_search("   ").is_search());
        assert!(ListQuery::new(Currency::Usd).with_search("eth").is_search());
    }

    #[test]
    fn test_links_canonical_entries() {
        let links = Links {
            homepage: vec!["https://bitcoin.org".into(), "".into()],
            blockchain_site: vec!["".into(), "https://explorer".into()],
            other: BTreeMap::new(),
        };
        assert_eq!(links.primary_homepage(), Some("https://bitcoin.org"));
        assert_eq!(links.primary_explorer(), None);
    }

    #[test]
    fn test_details_serialize_nulls() {
        let details = CryptoDetails::default();
        let json = serde_json::to_value(&details).unwrap();
        assert!(json["total_supply"].is_null());
        assert!(json["description"].is_null());
        assert_eq!(json["current_price"], 0.0);

        let back: CryptoDetails = serde_json::from_value(json).unwrap();
        assert_eq!(back, details);
    }
}
