use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultOnFailure, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use super::handlers::{
    admin_stats, admin_transactions, collect_fee, create_token, health, new_tokens, not_found,
    trending_tokens, verify_balance,
};
use super::rate_limit::{enforce_rate_limit, ApiRateLimiter};
use super::state::AppState;

pub fn create_router(state: AppState, limiter: Arc<ApiRateLimiter>) -> Router {
    let api = Router::new()
        .route("/tokens/trending", get(trending_tokens))
        .route("/tokens/new", get(new_tokens))
        .route("/tokens/create", post(create_token))
        .route("/payments/fee", post(collect_fee))
        .route("/payments/verify-balance", post(verify_balance))
        .route("/admin/transactions", get(admin_transactions))
        .route("/admin/stats", get(admin_stats))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(limiter, enforce_rate_limit));

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state);

    with_security_headers(router).layer(
        TraceLayer::new_for_http()
            .on_response(DefaultOnResponse::new().level(Level::INFO))
            .on_failure(DefaultOnFailure::new().level(Level::WARN)),
    )
}

const SECURITY_HEADERS: [(&str, &str); 6] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("referrer-policy", "no-referrer"),
    ("x-dns-prefetch-control", "off"),
    ("cross-origin-opener-policy", "same-origin"),
];

/// Standard hardening headers, added unless a handler already set them.
fn with_security_headers(router: Router) -> Router {
    SECURITY_HEADERS.into_iter().fold(router, |router, (name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ))
    })
}

pub fn cors_layer(frontend_url: &str) -> anyhow::Result<CorsLayer> {
    let origin: HeaderValue = frontend_url
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid FRONTEND_URL {}: {}", frontend_url, e))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_accepts_configured_origin() {
        assert!(cors_layer("http://localhost:5173").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }

    #[test]
    fn security_header_names_are_valid() {
        for (name, value) in SECURITY_HEADERS {
            assert!(HeaderName::from_bytes(name.as_bytes()).is_ok());
            assert!(HeaderValue::from_str(value).is_ok());
        }
    }
}
