//! Gateway middleware chain.
//!
//! # Chain
//! ```text
//! protected route:
//!     identity_middleware  (401 on failure, limiter never consulted)
//!     → rate_limit_middleware  (429 + Retry-After on failure)
//!     → handler (ResolvedIdentity + ClientDescriptor in extensions)
//!
//! unprotected route (health, info): handler directly
//! ```

pub mod identity;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::Request,
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};

use crate::observability::metrics;
use crate::security::rate_limit::rate_limit_middleware;
use crate::security::RateLimiter;

pub use identity::{identity_middleware, IdentityState};

/// Put `routes` behind identity resolution and then the shared rate limiter.
///
/// Uses `route_layer`, so unmatched paths still reach the fallback unauthenticated.
pub fn protect<S>(routes: Router<S>, identity: IdentityState, limiter: Arc<RateLimiter>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Last layer added runs first.
    routes
        .route_layer(from_fn_with_state(limiter, rate_limit_middleware))
        .route_layer(from_fn_with_state(identity, identity_middleware))
}

/// Record request count and latency.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let response = next.run(request).await;
    metrics::record_request(method.as_str(), response.status().as_u16(), start);
    response
}
