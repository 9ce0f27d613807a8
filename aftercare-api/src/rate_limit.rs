//! Per-client rate limiting
//!
//! Keyed governor limiter applied as middleware: each client IP gets a
//! fixed request budget per window. Exhausted budgets get a 429 with a
//! retry hint; ordering between surviving requests is not promised.

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use governor::clock::DefaultClock;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::AppState;

/// Keyed rate limiter with one bucket per client address
pub struct IpRateLimiter {
    limiter: RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>,
    window: Duration,
}

impl IpRateLimiter {
    /// Allow `max` requests per `window` per client key
    pub fn new(max: u32, window: Duration) -> Result<Self> {
        let burst = NonZeroU32::new(max)
            .ok_or_else(|| Error::Config("rate limit max must be at least 1".to_string()))?;
        let period = window
            .checked_div(max)
            .filter(|p| !p.is_zero())
            .ok_or_else(|| Error::Config("rate limit window too small for max".to_string()))?;
        let quota = Quota::with_period(period)
            .ok_or_else(|| Error::Config("invalid rate limit period".to_string()))?
            .allow_burst(burst);
        Ok(Self {
            limiter: RateLimiter::keyed(quota),
            window,
        })
    }

    /// Whether a request from `key` fits in the current window
    pub fn check(&self, key: &str) -> bool {
        self.limiter.check_key(&key.to_string()).is_ok()
    }

    /// Human form of the window for the 429 retry hint
    pub fn retry_after(&self) -> String {
        let secs = self.window.as_secs();
        if secs >= 60 && secs % 60 == 0 {
            let minutes = secs / 60;
            if minutes == 1 {
                "1 minute".to_string()
            } else {
                format!("{minutes} minutes")
            }
        } else {
            format!("{secs} seconds")
        }
    }
}

/// Client key for rate limiting: socket peer address when the listener
/// provides one, else the first X-Forwarded-For hop, else a shared bucket
fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    "unknown".to_string()
}

/// Axum middleware rejecting requests over the per-client budget
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);
    if state.limiter.check(&key) {
        return next.run(request).await;
    }

    tracing::warn!(client = %key, "Rate limit exceeded");
    let body = serde_json::json!({
        "error": "Too many requests",
        "message": "Too many requests from this IP, please try again later.",
        "retryAfter": state.limiter.retry_after(),
    });
    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_enforced_per_key() {
        let limiter = IpRateLimiter::new(3, Duration::from_secs(60)).unwrap();

        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));

        // A different client still has its full budget
        assert!(limiter.check("10.0.0.2"));
    }

    #[test]
    fn zero_max_is_a_config_error() {
        assert!(IpRateLimiter::new(0, Duration::from_secs(60)).is_err());
    }

    #[test]
    fn retry_after_is_humanized() {
        let limiter = IpRateLimiter::new(100, Duration::from_secs(60)).unwrap();
        assert_eq!(limiter.retry_after(), "1 minute");

        let limiter = IpRateLimiter::new(100, Duration::from_secs(90)).unwrap();
        assert_eq!(limiter.retry_after(), "90 seconds");
    }
}
