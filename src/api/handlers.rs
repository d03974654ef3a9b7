//! API Handlers
//!
//! HTTP request handlers exposing the market-data core as JSON.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::ApiError;
use crate::market::{
    has_more, is_valid_coin_id, CryptoDetails, HttpMarketApi, MarketApi, MarketDataClient,
};
use crate::models::{
    ClearCacheResponse, CoinListResponse, DetailsParams, FavoritesResponse, HealthResponse,
    ListParams, StatsResponse, ToggleFavoriteResponse,
};
use crate::preferences::{AppSettings, FavoritesStore, SettingsStore, SettingsUpdate};
use crate::storage::{FileStore, KeyValueStore};

type ApiResult<T> = std::result::Result<T, ApiError>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub market: Arc<MarketDataClient>,
    pub favorites: Arc<FavoritesStore>,
    pub settings: Arc<SettingsStore>,
    /// Page size for list requests that do not specify one
    pub default_per_page: u32,
}

impl AppState {
    /// Wires the client and preference stores over one shared backend.
    pub fn new(api: Arc<dyn MarketApi>, backend: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        let cache = CacheStore::new(backend.clone()).with_ttl(config.cache_ttl_ms);
        Self {
            market: Arc::new(MarketDataClient::new(api, Arc::new(cache))),
            favorites: Arc::new(FavoritesStore::new(backend.clone())),
            settings: Arc::new(SettingsStore::new(backend)),
            default_per_page: config.default_per_page,
        }
    }

    /// Creates the production state: HTTPS upstream and file-backed storage.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api = HttpMarketApi::from_config(config)?;
        let backend = FileStore::new(config.storage_path.clone());
        Ok(Self::new(Arc::new(api), Arc::new(backend), config))
    }
}

fn check_coin_id(id: &str) -> ApiResult<()> {
    if is_valid_coin_id(id) {
        Ok(())
    } else {
        Err(ApiError::InvalidRequest(format!("Invalid coin id '{}'", id)))
    }
}

/// Handler for GET /coins
pub async fn list_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<CoinListResponse>> {
    if let Some(error_msg) = params.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let settings = state.settings.load().await;
    let query = params.into_query(&settings, state.default_per_page);
    let coins = state.market.fetch_list(&query).await?;

    Ok(Json(CoinListResponse {
        has_more: has_more(coins.len(), query.per_page),
        page: query.page,
        per_page: query.per_page,
        coins,
    }))
}

/// Handler for GET /coins/:id
pub async fn details_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DetailsParams>,
) -> ApiResult<Json<CryptoDetails>> {
    check_coin_id(&id)?;

    let details = state
        .market
        .fetch_details(&id, params.use_cache.unwrap_or(true))
        .await?;
    Ok(Json(details))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let removed = state.market.clear_cache().await;
    Json(ClearCacheResponse::new(removed))
}

/// Handler for GET /favorites
pub async fn favorites_handler(State(state): State<AppState>) -> Json<FavoritesResponse> {
    Json(FavoritesResponse {
        favorites: state.favorites.list().await,
    })
}

/// Handler for POST /favorites/:id/toggle
pub async fn toggle_favorite_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ToggleFavoriteResponse>> {
    check_coin_id(&id)?;

    let favorite = state.favorites.toggle(&id).await?;
    Ok(Json(ToggleFavoriteResponse { id, favorite }))
}

/// Handler for DELETE /favorites
pub async fn clear_favorites_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<FavoritesResponse>> {
    state.favorites.clear().await?;
    Ok(Json(FavoritesResponse {
        favorites: Vec::new(),
    }))
}

/// Handler for GET /settings
pub async fn settings_handler(State(state): State<AppState>) -> Json<AppSettings> {
    Json(state.settings.load().await)
}

/// Handler for PUT /settings
pub async fn update_settings_handler(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult<Json<AppSettings>> {
    if update.is_empty() {
        return Err(ApiError::InvalidRequest(
            "At least one setting must be provided".to_string(),
        ));
    }
    Ok(Json(state.settings.update(update).await?))
}

/// Handler for DELETE /settings
pub async fn reset_settings_handler(State(state): State<AppState>) -> ApiResult<Json<AppSettings>> {
    Ok(Json(state.settings.reset().await?))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.market.cache().stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
