//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, clear_favorites_handler, details_handler, favorites_handler,
    health_handler, list_handler, reset_settings_handler, settings_handler, stats_handler,
    toggle_favorite_handler, update_settings_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /coins` - List cryptocurrencies
/// - `GET /coins/:id` - Coin details
/// - `DELETE /cache` - Drop cached market data
/// - `GET|DELETE /favorites`, `POST /favorites/:id/toggle` - Favorites
/// - `GET|PUT|DELETE /settings` - Display settings
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/coins", get(list_handler))
        .route("/coins/:id", get(details_handler))
        .route("/cache", delete(clear_cache_handler))
        .route(
            "/favorites",
            get(favorites_handler).delete(clear_favorites_handler),
        )
        .route("/favorites/:id/toggle", post(toggle_favorite_handler))
        .route(
            "/settings",
            get(settings_handler)
                .put(update_settings_handler)
                .delete(reset_settings_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::TransportError;
    use crate::market::raw::{RawCoinDetail, RawMarketRecord, SearchResponse};
    use crate::market::{MarketApi, MarketsRequest};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    /// Upstream that always answers 429.
    struct RateLimitedApi;

    fn rate_limited() -> TransportError {
        TransportError::Status {
            status: 429,
            detail: None,
        }
    }

    #[async_trait]
    impl MarketApi for RateLimitedApi {
        async fn markets(
            &self,
            _request: &MarketsRequest,
        ) -> Result<Vec<RawMarketRecord>, TransportError> {
            Err(rate_limited())
        }

        async fn coin(&self, _id: &str) -> Result<RawCoinDetail, TransportError> {
            Err(rate_limited())
        }

        async fn search(&self, _query: &str) -> Result<SearchResponse, TransportError> {
            Err(rate_limited())
        }
    }

    fn create_test_app() -> Router {
        let state = AppState::new(
            Arc::new(RateLimitedApi),
            Arc::new(MemoryStore::new()),
            &Config::default(),
        );
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_coins_rate_limited() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/coins").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_invalid_currency_rejected() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/coins?currency=doge")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
