//! Per-IP rate limiting middleware
//!
//! Token-bucket limiting keyed by client IP: a `governor` limiter per IP,
//! kept in a `DashMap` and dropped again once idle. Over-limit requests get
//! a 429 with a `Retry-After` header. The ledger core never sees a
//! rate-limited request.

use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    response::Response,
};
use dashmap::DashMap;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::config::RateLimitConfig;
use crate::error::{ErrorInfo, ErrorResponse};

/// Token bucket for one client IP
struct TokenBucket {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    /// Last access time (for cleanup)
    last_access: Instant,
}

impl TokenBucket {
    fn new(config: &RateLimitConfig) -> Self {
        let per_minute =
            NonZeroU32::new(config.per_minute).unwrap_or(NonZeroU32::new(60).unwrap());
        let burst = NonZeroU32::new(config.burst).unwrap_or(NonZeroU32::new(20).unwrap());
        let quota = Quota::per_minute(per_minute).allow_burst(burst);

        Self {
            limiter: RateLimiter::direct(quota),
            last_access: Instant::now(),
        }
    }

    fn check(&mut self) -> Result<(), Duration> {
        self.last_access = Instant::now();
        match self.limiter.check() {
            Ok(_) => Ok(()),
            Err(not_until) => Err(not_until.wait_time_from(DefaultClock::default().now())),
        }
    }
}

/// Rate limiter state shared across requests
pub struct RateLimitState {
    buckets: DashMap<IpAddr, TokenBucket>,
    config: RateLimitConfig,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
        }
    }

    /// Check if a request from this IP should be allowed
    pub fn check(&self, ip: IpAddr) -> Result<(), Duration> {
        if !self.config.enabled {
            return Ok(());
        }

        let mut bucket = self.buckets.entry(ip).or_insert_with(|| {
            debug!(ip = %ip, "Creating new rate limit bucket");
            TokenBucket::new(&self.config)
        });
        bucket.check()
    }

    /// Drop buckets idle for longer than `max_age`
    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.buckets
            .retain(|_, bucket| now.duration_since(bucket.last_access) <= max_age);
    }

    /// Number of tracked IPs
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

/// Rate limit layer
#[derive(Clone)]
pub struct RateLimitLayer {
    state: Arc<RateLimitState>,
}

impl RateLimitLayer {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            state: Arc::new(RateLimitState::new(config)),
        }
    }

    pub fn state(&self) -> Arc<RateLimitState> {
        Arc::clone(&self.state)
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            state: Arc::clone(&self.state),
        }
    }
}

/// Rate limit service
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    state: Arc<RateLimitState>,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = Arc::clone(&self.state);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let ip = extract_client_ip(&req);

            match state.check(ip) {
                Ok(()) => inner.call(req).await,
                Err(retry_after) => {
                    let retry_ms = retry_after.as_millis() as u64;
                    warn!(ip = %ip, retry_after_ms = retry_ms, "Rate limit exceeded");
                    Ok(rate_limit_response(retry_ms))
                }
            }
        })
    }
}

/// Extract client IP from request
fn extract_client_ip<B>(req: &Request<B>) -> IpAddr {
    // X-Forwarded-For first (for proxied requests)
    if let Some(forwarded) = req.headers().get("x-forwarded-for") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            if let Some(first_ip) = forwarded_str.split(',').next() {
                if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("x-real-ip") {
        if let Ok(real_ip_str) = real_ip.to_str() {
            if let Ok(ip) = real_ip_str.parse::<IpAddr>() {
                return ip;
            }
        }
    }

    if let Some(connect_info) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip();
    }

    IpAddr::from([127, 0, 0, 1])
}

/// Create rate limit exceeded response
fn rate_limit_response(retry_after_ms: u64) -> Response {
    let body = ErrorResponse {
        error: ErrorInfo {
            code: "rate_limit_exceeded".to_string(),
            message: format!("Rate limit exceeded, retry in {} ms", retry_after_ms),
        },
        request_id: None,
    };

    let mut response = Response::new(Body::from(
        serde_json::to_vec(&body).unwrap_or_default(),
    ));
    *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
    if let Ok(content_type) = "application/json".parse() {
        response.headers_mut().insert("Content-Type", content_type);
    }
    if let Ok(retry_after) = retry_after_ms.div_ceil(1000).to_string().parse() {
        response.headers_mut().insert("Retry-After", retry_after);
    }

    response
}

/// Background task to clean up stale rate limit buckets
pub async fn cleanup_task(state: Arc<RateLimitState>, interval: Duration, max_age: Duration) {
    let mut cleanup_interval = tokio::time::interval(interval);
    cleanup_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        cleanup_interval.tick().await;
        state.cleanup(max_age);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn test_config() -> RateLimitConfig {
        RateLimitConfig {
            enabled: true,
            per_minute: 60,
            burst: 5,
        }
    }

    #[test]
    fn allows_within_burst() {
        let state = RateLimitState::new(test_config());
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

        for _ in 0..5 {
            assert!(state.check(ip).is_ok());
        }
    }

    #[test]
    fn blocks_over_burst() {
        let state = RateLimitState::new(test_config());
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        for _ in 0..5 {
            let _ = state.check(ip);
        }
        assert!(state.check(ip).is_err());
    }

    #[test]
    fn ips_have_independent_buckets() {
        let state = RateLimitState::new(test_config());
        let first = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 3));
        let second = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 4));

        for _ in 0..6 {
            let _ = state.check(first);
        }
        assert!(state.check(second).is_ok());
    }

    #[test]
    fn disabled_limiter_always_allows() {
        let state = RateLimitState::new(RateLimitConfig {
            enabled: false,
            ..test_config()
        });
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5));

        for _ in 0..100 {
            assert!(state.check(ip).is_ok());
        }
    }

    #[test]
    fn cleanup_removes_stale_buckets() {
        let state = RateLimitState::new(test_config());
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 6));

        let _ = state.check(ip);
        assert_eq!(state.bucket_count(), 1);

        state.cleanup(Duration::ZERO);
        assert_eq!(state.bucket_count(), 0);
    }
}
