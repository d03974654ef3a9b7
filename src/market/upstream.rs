//! Upstream Market API
//!
//! Transport seam between the client and the remote price API. The
//! `HttpMarketApi` implementation talks HTTPS via reqwest; tests substitute
//! their own `MarketApi`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, Url,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::raw::{RawCoinDetail, RawMarketRecord, SearchResponse};
use super::types::{Currency, SortOrder};
use crate::config::Config;
use crate::error::{upstream_error_detail, TransportError};

// == Markets Request ==
/// Parameters of `GET /coins/markets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketsRequest {
    pub vs_currency: Currency,
    /// Comma-separated id filter (search branch only)
    pub ids: Option<String>,
    /// Category filter, omitted when `None`
    pub category: Option<String>,
    pub order: SortOrder,
    pub per_page: u32,
    pub page: u32,
}

impl MarketsRequest {
    /// Query-string pairs in the order the upstream documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("vs_currency", self.vs_currency.as_str().to_string())];
        if let Some(ids) = &self.ids {
            pairs.push(("ids", ids.clone()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        pairs.push(("order", self.order.as_str().to_string()));
        pairs.push(("per_page", self.per_page.to_string()));
        pairs.push(("page", self.page.to_string()));
        pairs.push(("sparkline", "false".to_string()));
        pairs
    }
}

/// Fixed query flags of `GET /coins/{id}`.
pub const DETAIL_QUERY: [(&str, &str); 6] = [
    ("localization", "false"),
    ("tickers", "false"),
    ("market_data", "true"),
    ("community_data", "false"),
    ("developer_data", "false"),
    ("sparkline", "false"),
];

// == Market Api ==
/// Remote market-data endpoints consumed by the client.
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// `GET /coins/markets`
    async fn markets(
        &self,
        request: &MarketsRequest,
    ) -> Result<Vec<RawMarketRecord>, TransportError>;

    /// `GET /coins/{id}`
    async fn coin(&self, id: &str) -> Result<RawCoinDetail, TransportError>;

    /// `GET /search?query=`
    async fn search(&self, query: &str) -> Result<SearchResponse, TransportError>;
}

// == Http Market Api ==
/// reqwest-backed implementation of `MarketApi`.
#[derive(Debug, Clone)]
pub struct HttpMarketApi {
    client: Client,
    base_url: String,
}

impl HttpMarketApi {
    /// Builds a client with the given base URL and per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client from configuration.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `segments` onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            TransportError::Other(format!("invalid base url {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| TransportError::Other(format!("base url {} has no path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T, Q>(&self, url: Url, query: &Q) -> Result<T, TransportError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        debug!("GET {}", url);

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail: upstream_error_detail(&body),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MarketApi for HttpMarketApi {
    async fn markets(
        &self,
        request: &MarketsRequest,
    ) -> Result<Vec<RawMarketRecord>, TransportError> {
        let url = self.endpoint(&["coins", "markets"])?;
        self.get_json(url, &request.query_pairs()).await
    }

    async fn coin(&self, id: &str) -> Result<RawCoinDetail, TransportError> {
        // Dot segments would be dropped from the path and hit another endpoint
        if id.trim_matches('.').is_empty() {
            return Err(TransportError::Other(format!("invalid coin id '{}'", id)));
        }
        let url = self.endpoint(&["coins", id])?;
        self.get_json(url, &DETAIL_QUERY).await
    }

    async fn search(&self, query: &str) -> Result<SearchResponse, TransportError> {
        let url = self.endpoint(&["search"])?;
        self.get_json(url, &[("query", query)]).await
    }
}
