//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use crypto_tracker::error::TransportError;
use crypto_tracker::market::raw::{RawCoinDetail, RawMarketRecord, SearchResponse};
use crypto_tracker::market::{MarketApi, MarketsRequest};
use crypto_tracker::storage::MemoryStore;
use crypto_tracker::{api::create_router, AppState, Config};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

/// Upstream that names each coin after the requested currency.
#[derive(Default)]
struct StubApi {
    calls: AtomicUsize,
}

#[async_trait]
impl MarketApi for StubApi {
    async fn markets(&self, request: &MarketsRequest) -> Result<Vec<RawMarketRecord>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..request.per_page)
            .map(|i| RawMarketRecord {
                id: Some(format!("{}-coin-{}", request.vs_currency, i)),
                symbol: Some("btc".to_string()),
                ..Default::default()
            })
            .collect())
    }

    async fn coin(&self, id: &str) -> Result<RawCoinDetail, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if id == "missing" {
            return Err(TransportError::Status {
                status: 404,
                detail: Some("coin not found".to_string()),
            });
        }
        Ok(RawCoinDetail {
            id: Some(id.to_string()),
            name: Some("Bitcoin".to_string()),
            ..Default::default()
        })
    }

    async fn search(&self, _query: &str) -> Result<SearchResponse, TransportError> {
        Ok(SearchResponse::default())
    }
}

fn create_test_app() -> (Router, Arc<StubApi>) {
    let api = Arc::new(StubApi::default());
    let state = AppState::new(api.clone(), Arc::new(MemoryStore::new()), &Config::default());
    (create_router(state), api)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == Coins Endpoint Tests ==

#[tokio::test]
async fn test_list_endpoint_success() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(request("GET", "/coins?per_page=5"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["coins"].as_array().unwrap().len(), 5);
    assert_eq!(json["coins"][0]["id"], "usd-coin-0");
    assert_eq!(json["coins"][0]["total_supply"], Value::Null);
    assert_eq!(json["page"], 1);
    assert_eq!(json["has_more"], true);
}

#[tokio::test]
async fn test_list_endpoint_served_from_cache() {
    let (app, api) = create_test_app();

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(request("GET", "/coins?per_page=5"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(api.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_list_endpoint_rejects_large_page_size() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(request("GET", "/coins?per_page=500"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("per_page"));
}

#[tokio::test]
async fn test_details_endpoint_success() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(request("GET", "/coins/bitcoin"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["id"], "bitcoin");
    assert_eq!(json["name"], "Bitcoin");
}

#[tokio::test]
async fn test_details_endpoint_upstream_client_error() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(request("GET", "/coins/missing"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "coin not found");
}

#[tokio::test]
async fn test_details_endpoint_rejects_encoded_path_id() {
    let (app, api) = create_test_app();

    let response = app
        .oneshot(request("GET", "/coins/..%2Fsearch"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_clear_cache_then_refetch() {
    let (app, api) = create_test_app();

    app.clone()
        .oneshot(request("GET", "/coins?per_page=5"))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(request("DELETE", "/cache"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 1);

    app.oneshot(request("GET", "/coins?per_page=5"))
        .await
        .unwrap();
    assert_eq!(api.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_stats_endpoint_counts_hits() {
    let (app, _) = create_test_app();

    for _ in 0..2 {
        app.clone()
            .oneshot(request("GET", "/coins?per_page=5"))
            .await
            .unwrap();
    }

    let response = app.oneshot(request("GET", "/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
}

// == Favorites Endpoint Tests ==

#[tokio::test]
async fn test_favorites_toggle_cycle() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(request("POST", "/favorites/bitcoin/toggle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["favorite"], true);

    let response = app
        .clone()
        .oneshot(request("GET", "/favorites"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["favorites"], serde_json::json!(["bitcoin"]));

    let response = app
        .clone()
        .oneshot(request("POST", "/favorites/bitcoin/toggle"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["favorite"], false);

    let response = app.oneshot(request("GET", "/favorites")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["favorites"], serde_json::json!([]));
}

// == Settings Endpoint Tests ==

#[tokio::test]
async fn test_settings_defaults() {
    let (app, _) = create_test_app();

    let response = app.oneshot(request("GET", "/settings")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["currency"], "usd");
    assert_eq!(json["fontSize"], "medium");
    assert_eq!(json["theme"], "dark");
    assert_eq!(json["defaultCategory"], "");
}

#[tokio::test]
async fn test_settings_currency_applies_to_list() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/settings")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"currency":"eur"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["currency"], "eur");

    let response = app
        .clone()
        .oneshot(request("GET", "/coins?per_page=2"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["coins"][0]["id"], "eur-coin-0");

    let response = app.oneshot(request("DELETE", "/settings")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["currency"], "usd");
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let response = app.oneshot(request("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}
