use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use memelaunch::config::DiscoveryConfig;
use memelaunch::services::bitquery::BitqueryFeed;
use memelaunch::services::pumpfun::PumpFunFeed;
use memelaunch::services::{FeedError, TokenFeed};
use memelaunch::{Config, FeedKind};

const API_KEY: &str = "test-key";

const TRADES: &str = r#"{"data":{"Solana":{"DEXTrades":[
    {"Trade":{"Buy":{"Price":0.004,"PriceInUSD":0.0001,
      "Currency":{"Name":"Hot Cat","Symbol":"HCAT","MintAddress":"Mint1"}}},
     "Block":{"Time":"2024-05-01T10:00:00Z"}}
]}}}"#;

/// What the local upstream was asked for, in arrival order.
#[derive(Clone, Default)]
struct Seen(Arc<Mutex<Vec<String>>>);

impl Seen {
    fn record(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

async fn pump_listing(
    State(seen): State<Seen>,
    Path(kind): Path<String>,
    headers: HeaderMap,
) -> Json<Value> {
    let accept = headers
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    seen.record(format!("/pump/{} accept={}", kind, accept));
    Json(json!({
        "tokens": [
            {"id": format!("{}-1", kind), "market_cap": "42"},
            {"id": format!("{}-2", kind), "reply_count": 3}
        ]
    }))
}

async fn graphql(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Some(query) = body.get("query").and_then(Value::as_str) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    seen.record(query.to_string());
    (StatusCode::OK, TRADES).into_response()
}

/// Serves canned pump.fun and Bitquery answers on an ephemeral local port.
async fn spawn_upstream() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/pump/:kind", get(pump_listing))
        .route("/down/:kind", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/broken/:kind", get(|| async { Json(json!({"items": []})) }))
        .route("/graphql", post(graphql))
        .route(
            "/graphql-down",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "maintenance") }),
        )
        .route("/graphql-broken", post(|| async { Json(json!({"data": null})) }))
        .with_state(seen.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), seen)
}

fn discovery(pumpfun_url: String, bitquery_url: String, api_key: &str) -> DiscoveryConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        ("PUMPFUN_API_URL", pumpfun_url),
        ("BITQUERY_API_URL", bitquery_url),
        ("BITQUERY_API_KEY", api_key.to_string()),
        ("PUMPFUN_TIMEOUT_MS", "2000".to_string()),
        ("BITQUERY_TIMEOUT_MS", "2000".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned())
        .unwrap()
        .discovery
}

fn pumpfun(config: &DiscoveryConfig) -> PumpFunFeed {
    PumpFunFeed::new(reqwest::Client::new(), config)
}

fn bitquery(config: &DiscoveryConfig) -> BitqueryFeed {
    BitqueryFeed::new(reqwest::Client::new(), config)
}

#[tokio::test]
async fn pumpfun_requests_kind_path_under_trimmed_base() {
    let (base, seen) = spawn_upstream().await;
    let config = discovery(format!("{}/pump/", base), format!("{}/graphql", base), API_KEY);
    let feed = pumpfun(&config);

    let trending = feed.fetch(FeedKind::Trending).await.unwrap();
    let fresh = feed.fetch(FeedKind::New).await.unwrap();

    assert_eq!(
        seen.entries(),
        vec![
            "/pump/trending accept=application/json".to_string(),
            "/pump/new accept=application/json".to_string(),
        ]
    );
    assert_eq!(trending.len(), 2);
    assert_eq!(trending[0].id, "trending-1");
    assert_eq!(trending[0].market_cap, 42.0);
    assert_eq!(trending[1].reply_count, 3);
    assert!(fresh.iter().all(|t| t.is_new));
}

#[tokio::test]
async fn pumpfun_error_status_is_unavailable() {
    let (base, _) = spawn_upstream().await;
    let config = discovery(format!("{}/down", base), format!("{}/graphql", base), API_KEY);

    let err = pumpfun(&config).fetch(FeedKind::Trending).await.unwrap_err();
    match err {
        FeedError::Unavailable(reason) => assert!(reason.contains("500"), "{}", reason),
        other => panic!("expected Unavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn pumpfun_unexpected_shape_is_malformed() {
    let (base, _) = spawn_upstream().await;
    let config = discovery(format!("{}/broken", base), format!("{}/graphql", base), API_KEY);

    let err = pumpfun(&config).fetch(FeedKind::New).await.unwrap_err();
    assert!(matches!(err, FeedError::MalformedPayload(_)), "{:?}", err);
}

#[tokio::test]
async fn unreachable_upstream_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = format!("http://{}", addr);
    let config = discovery(base.clone(), format!("{}/graphql", base), API_KEY);
    let err = pumpfun(&config).fetch(FeedKind::Trending).await.unwrap_err();
    assert!(matches!(err, FeedError::Unavailable(_)), "{:?}", err);
}

#[tokio::test]
async fn bitquery_posts_query_with_api_key() {
    let (base, seen) = spawn_upstream().await;
    let config = discovery(format!("{}/pump", base), format!("{}/graphql", base), API_KEY);
    let feed = bitquery(&config);

    let trending = feed.fetch(FeedKind::Trending).await.unwrap();
    let fresh = feed.fetch(FeedKind::New).await.unwrap();

    let queries = seen.entries();
    assert_eq!(queries.len(), 2);
    assert!(queries[0].contains("descending: Trade_Buy_Price"));
    assert!(queries[1].contains("descending: Block_Time"));

    assert_eq!(trending[0].id, "Mint1");
    assert_eq!(trending[0].market_cap, 0.004 * 1_000_000_000.0);
    assert!(!trending[0].is_new);
    assert!(fresh[0].is_new);
}

#[tokio::test]
async fn bitquery_rejected_key_is_unavailable() {
    let (base, seen) = spawn_upstream().await;
    let config = discovery(format!("{}/pump", base), format!("{}/graphql", base), "wrong");

    let err = bitquery(&config).fetch(FeedKind::Trending).await.unwrap_err();
    assert!(matches!(err, FeedError::Unavailable(_)), "{:?}", err);
    assert!(seen.entries().is_empty());
}

#[tokio::test]
async fn bitquery_error_status_is_unavailable() {
    let (base, _) = spawn_upstream().await;
    let config = discovery(format!("{}/pump", base), format!("{}/graphql-down", base), API_KEY);

    let err = bitquery(&config).fetch(FeedKind::New).await.unwrap_err();
    assert!(matches!(err, FeedError::Unavailable(_)), "{:?}", err);
}

#[tokio::test]
async fn bitquery_missing_trades_is_malformed() {
    let (base, _) = spawn_upstream().await;
    let config = discovery(
        format!("{}/pump", base),
        format!("{}/graphql-broken", base),
        API_KEY,
    );

    let err = bitquery(&config).fetch(FeedKind::Trending).await.unwrap_err();
    assert!(matches!(err, FeedError::MalformedPayload(_)), "{:?}", err);
}
