//! Raw Upstream Payloads
//!
//! Partial schemas for what the remote API returns. Every field is optional;
//! the `normalize` functions apply the defaulting rules in one place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::types::{CryptoDetails, Cryptocurrency, Links};

// == Market Record ==
/// One element of `GET /coins/markets`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMarketRecord {
    pub id: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub fully_diluted_valuation: Option<f64>,
    pub total_volume: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap_change_24h: Option<f64>,
    pub market_cap_change_percentage_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub ath: Option<f64>,
    pub ath_change_percentage: Option<f64>,
    pub ath_date: Option<String>,
    pub atl: Option<f64>,
    pub atl_change_percentage: Option<f64>,
    pub atl_date: Option<String>,
    pub last_updated: Option<String>,
}

impl RawMarketRecord {
    /// Required numerics default to 0, strings to "", nullable fields stay `None`.
    pub fn normalize(self) -> Cryptocurrency {
        Cryptocurrency {
            id: self.id.unwrap_or_default(),
            symbol: self.symbol.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            image: self.image.unwrap_or_default(),
            current_price: self.current_price.unwrap_or_default(),
            market_cap: self.market_cap.unwrap_or_default(),
            market_cap_rank: self.market_cap_rank.unwrap_or_default(),
            fully_diluted_valuation: self.fully_diluted_valuation,
            total_volume: self.total_volume.unwrap_or_default(),
            high_24h: self.high_24h.unwrap_or_default(),
            low_24h: self.low_24h.unwrap_or_default(),
            price_change_24h: self.price_change_24h.unwrap_or_default(),
            price_change_percentage_24h: self.price_change_percentage_24h.unwrap_or_default(),
            market_cap_change_24h: self.market_cap_change_24h.unwrap_or_default(),
            market_cap_change_percentage_24h: self
                .market_cap_change_percentage_24h
                .unwrap_or_default(),
            circulating_supply: self.circulating_supply.unwrap_or_default(),
            total_supply: self.total_supply,
            max_supply: self.max_supply,
            ath: self.ath.unwrap_or_default(),
            ath_change_percentage: self.ath_change_percentage.unwrap_or_default(),
            ath_date: self.ath_date.unwrap_or_default(),
            atl: self.atl.unwrap_or_default(),
            atl_change_percentage: self.atl_change_percentage.unwrap_or_default(),
            atl_date: self.atl_date.unwrap_or_default(),
            last_updated: self.last_updated.unwrap_or_default(),
        }
    }
}

// == Coin Detail ==
/// Image URLs in several sizes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawImage {
    pub thumb: Option<String>,
    pub small: Option<String>,
    pub large: Option<String>,
}

/// Payload of `GET /coins/{id}`.
///
/// `description`, `links` and `market_data` stay untyped here; they are
/// read leniently during normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCoinDetail {
    pub id: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub image: Option<RawImage>,
    pub market_cap_rank: Option<u32>,
    pub last_updated: Option<String>,
    pub description: Option<Value>,
    pub links: Option<Value>,
    pub market_data: Option<Value>,
}

/// Lenient reader over the `market_data` block.
///
/// Each field is looked up on its own, so one mistyped field never hides
/// the others.
struct MarketDataView<'a>(Option<&'a Map<String, Value>>);

impl<'a> MarketDataView<'a> {
    fn new(market_data: Option<&'a Value>) -> Self {
        Self(market_data.and_then(Value::as_object))
    }

    fn field(&self, name: &str) -> Option<&'a Value> {
        self.0.and_then(|fields| fields.get(name))
    }

    /// `market_data.<name>` as a plain number.
    fn number(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(Value::as_f64)
    }

    /// `market_data.<name>.usd` as a number.
    fn usd_number(&self, name: &str) -> Option<f64> {
        self.field(name)
            .and_then(|per_currency| per_currency.get("usd"))
            .and_then(Value::as_f64)
    }

    /// `market_data.<name>.usd` as a string.
    fn usd_text(&self, name: &str) -> Option<String> {
        self.field(name)
            .and_then(|per_currency| per_currency.get("usd"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

impl RawCoinDetail {
    /// Maps the detail payload into `CryptoDetails`.
    ///
    /// Numerics are read from `market_data.<field>.usd` with a 0 default;
    /// `fully_diluted_valuation`, `total_supply` and `max_supply` stay `None`
    /// when absent. `requested_id` stands in if the payload has no id.
    pub fn normalize(self, requested_id: &str) -> CryptoDetails {
        let market = MarketDataView::new(self.market_data.as_ref());

        let coin = Cryptocurrency {
            id: self.id.unwrap_or_else(|| requested_id.to_string()),
            symbol: self.symbol.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            image: self.image.and_then(|i| i.large).unwrap_or_default(),
            current_price: market.usd_number("current_price").unwrap_or_default(),
            market_cap: market.usd_number("market_cap").unwrap_or_default(),
            market_cap_rank: self.market_cap_rank.unwrap_or_default(),
            fully_diluted_valuation: market.usd_number("fully_diluted_valuation"),
            total_volume: market.usd_number("total_volume").unwrap_or_default(),
            high_24h: market.usd_number("high_24h").unwrap_or_default(),
            low_24h: market.usd_number("low_24h").unwrap_or_default(),
            price_change_24h: market.number("price_change_24h").unwrap_or_default(),
            price_change_percentage_24h: market
                .number("price_change_percentage_24h")
                .unwrap_or_default(),
            market_cap_change_24h: market.number("market_cap_change_24h").unwrap_or_default(),
            market_cap_change_percentage_24h: market
                .number("market_cap_change_percentage_24h")
                .unwrap_or_default(),
            circulating_supply: market.number("circulating_supply").unwrap_or_default(),
            total_supply: market.number("total_supply"),
            max_supply: market.number("max_supply"),
            ath: market.usd_number("ath").unwrap_or_default(),
            ath_change_percentage: market
                .usd_number("ath_change_percentage")
                .unwrap_or_default(),
            ath_date: market.usd_text("ath_date").unwrap_or_default(),
            atl: market.usd_number("atl").unwrap_or_default(),
            atl_change_percentage: market
                .usd_number("atl_change_percentage")
                .unwrap_or_default(),
            atl_date: market.usd_text("atl_date").unwrap_or_default(),
            last_updated: self.last_updated.unwrap_or_default(),
        };

        CryptoDetails {
            coin,
            description: self.description.as_ref().and_then(decode_description),
            links: self.links.as_ref().and_then(decode_links),
            market_data: self.market_data,
        }
    }
}

/// Keeps the string entries of a `{ "<lang>": "<text>" }` object.
///
/// Null or non-string entries are skipped; a non-object section is dropped.
fn decode_description(value: &Value) -> Option<BTreeMap<String, String>> {
    let Some(languages) = value.as_object() else {
        if !value.is_null() {
            warn!("Ignoring malformed description section");
        }
        return None;
    };
    Some(
        languages
            .iter()
            .filter_map(|(lang, text)| text.as_str().map(|text| (lang.clone(), text.to_string())))
            .collect(),
    )
}

/// Reads the links object, keeping link groups that are not URL lists as-is.
///
/// `homepage` and `blockchain_site` keep their positions; non-string
/// elements become "" and a non-list value becomes an empty list.
fn decode_links(value: &Value) -> Option<Links> {
    let Some(groups) = value.as_object() else {
        if !value.is_null() {
            warn!("Ignoring malformed links section");
        }
        return None;
    };

    let mut links = Links::default();
    for (name, group) in groups {
        match name.as_str() {
            "homepage" => links.homepage = url_list(group),
            "blockchain_site" => links.blockchain_site = url_list(group),
            _ => {
                links.other.insert(name.clone(), group.clone());
            }
        }
    }
    Some(links)
}

fn url_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|urls| {
            urls.iter()
                .map(|url| url.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

// == Search ==
/// Payload of `GET /search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub coins: Vec<SearchCoin>,
}

/// One coin hit from the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCoin {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
}

impl SearchResponse {
    /// Comma-separated ids of the first `limit` hits, or `None` if there are none.
    pub fn id_filter(&self, limit: usize) -> Option<String> {
        let ids: Vec<&str> = self
            .coins
            .iter()
            .take(limit)
            .map(|coin| coin.id.as_str())
            .filter(|id| !id.is_empty())
            .collect();

        if ids.is_empty() {
            None
        } else {
            Some(ids.join(","))
        }
    }
}
