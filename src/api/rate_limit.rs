use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use super::error::ApiError;

/// One bucket per client IP.
pub type ApiRateLimiter = DefaultKeyedRateLimiter<IpAddr>;

const WINDOW: Duration = Duration::from_secs(15 * 60);

/// Requests served without a peer address (in-process callers) share this key.
const UNKNOWN_PEER: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Allows each IP `per_window` requests per 15 minutes, all of them usable as
/// a burst.
pub fn api_rate_limiter(per_window: NonZeroU32) -> Arc<ApiRateLimiter> {
    let quota = Quota::with_period(WINDOW / per_window.get())
        .unwrap_or_else(|| Quota::per_second(per_window))
        .allow_burst(per_window);
    Arc::new(RateLimiter::keyed(quota))
}

/// Peer IP as recorded by `into_make_service_with_connect_info`.
fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(UNKNOWN_PEER)
}

pub async fn enforce_rate_limit(
    State(limiter): State<Arc<ApiRateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ip = client_ip(&request);
    if limiter.check_key(&ip).is_err() {
        tracing::warn!("Rate limit exceeded for {} on {}", ip, request.uri().path());
        return Err(ApiError::RateLimited);
    }
    Ok(next.run(request).await)
}
