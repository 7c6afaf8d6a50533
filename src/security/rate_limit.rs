//! Per-identity fixed-window rate limiting.
//!
//! One counter per key, created on the first request observed for it. A
//! counter whose window has passed is reset in place rather than
//! incremented. The limiter is instantiated once and shared by every
//! protected route, so the quota covers the whole protected surface.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::observability::metrics;
use crate::security::error::AuthError;
use crate::security::identity::ResolvedIdentity;

/// Minimum spacing between two full sweeps of expired counters.
const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    count: u32,
    window_reset_at: Instant,
}

/// Fixed-window limiter keyed by identity id.
///
/// Admissions for one key are serialized by the map's per-shard entry lock;
/// unrelated keys on other shards proceed in parallel.
pub struct RateLimiter {
    counters: DashMap<String, WindowCounter>,
    window: Duration,
    max_requests: u32,
    max_tracked_keys: usize,
    last_sweep: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32, max_tracked_keys: usize) -> Self {
        Self {
            counters: DashMap::new(),
            window,
            max_requests,
            max_tracked_keys: max_tracked_keys.max(1),
            last_sweep: Mutex::new(None),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            Duration::from_millis(config.window_ms),
            config.max_requests,
            config.max_tracked_keys,
        )
    }

    /// Record one request for `key` at `now` and decide whether it may proceed.
    pub fn admit(&self, key: &str, now: Instant) -> Result<(), AuthError> {
        if self.counters.len() >= self.max_tracked_keys && !self.counters.contains_key(key) {
            self.sweep_expired(now);
        }

        let mut created = false;
        let decision = {
            let mut counter = self
                .counters
                .entry(key.to_string())
                .or_insert_with(|| {
                    created = true;
                    WindowCounter {
                        count: 0,
                        window_reset_at: now + self.window,
                    }
                });
            self.advance(&mut counter, now)
        };

        // The shard lock is released above; `len` must not run under it.
        if created {
            metrics::record_tracked_keys(self.counters.len());
        }

        decision
    }

    fn advance(&self, counter: &mut WindowCounter, now: Instant) -> Result<(), AuthError> {
        if now >= counter.window_reset_at {
            *counter = WindowCounter {
                count: 1,
                window_reset_at: now + self.window,
            };
            return Ok(());
        }

        counter.count = counter.count.saturating_add(1);
        if counter.count > self.max_requests {
            let remaining = counter.window_reset_at.saturating_duration_since(now);
            let retry_after_secs = remaining.as_millis().div_ceil(1000) as u64;
            return Err(AuthError::RateLimited { retry_after_secs });
        }

        Ok(())
    }

    /// Drop counters whose window has already passed.
    ///
    /// An expired counter would be reset on its next request anyway, so
    /// removing it changes no decision.
    fn sweep_expired(&self, now: Instant) {
        {
            let Ok(mut last) = self.last_sweep.lock() else {
                return;
            };
            if matches!(*last, Some(at) if now.saturating_duration_since(at) < SWEEP_INTERVAL) {
                return;
            }
            *last = Some(now);
        }

        let before = self.counters.len();
        self.counters.retain(|_, counter| now < counter.window_reset_at);
        let after = self.counters.len();
        metrics::record_tracked_keys(after);

        if after >= self.max_tracked_keys {
            tracing::warn!(
                tracked = after,
                ceiling = self.max_tracked_keys,
                "Rate limiter above key ceiling after sweep"
            );
        } else {
            tracing::debug!(removed = before - after, "Swept expired rate-limit counters");
        }
    }

    /// Requests counted so far in the current window for `key`.
    pub fn count(&self, key: &str) -> Option<u32> {
        self.counters.get(key).map(|c| c.count)
    }

    /// Number of keys with a counter.
    pub fn tracked_keys(&self) -> usize {
        self.counters.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }
}

/// Rate-limit key for a request: the resolved identity, else the peer address.
pub fn limit_key(request: &Request<Body>) -> String {
    if let Some(identity) = request.extensions().get::<ResolvedIdentity>() {
        return identity.id.clone();
    }
    match request.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => format!("ip:{}", addr.ip()),
        None => "ip:unknown".to_string(),
    }
}

/// Middleware admitting or rejecting a request against the shared limiter.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = limit_key(&request);

    match limiter.admit(&key, Instant::now()) {
        Ok(()) => next.run(request).await,
        Err(rejection) => {
            // The key may embed a self-issued token; log only its kind.
            let origin = request
                .extensions()
                .get::<ResolvedIdentity>()
                .map(|identity| identity.origin.as_str())
                .unwrap_or("address");
            tracing::warn!(origin, error = %rejection, "Rate limit exceeded");
            metrics::record_rate_limited(origin);
            rejection.into_response()
        }
    }
}
