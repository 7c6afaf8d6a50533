//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with public and protected routes
//! - Put protected routes behind identity resolution and rate limiting
//! - Wire up middleware (request id, tracing, timeout, body limit, CORS)
//! - Serve until the shutdown broadcast fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::{CorsConfig, GatewayConfig};
use crate::data::DataStore;
use crate::http::middleware::{protect, track_requests, IdentityState};
use crate::http::request::{make_request_span, MakeRequestUuidV4, X_REQUEST_ID};
use crate::security::headers::with_security_headers;
use crate::security::{IdentityResolver, RateLimiter};
use crate::upstream::CurseForgeClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub resolver: Arc<IdentityResolver>,
    pub limiter: Arc<RateLimiter>,
    pub data: Arc<DataStore>,
    pub curseforge: Arc<CurseForgeClient>,
}

impl AppState {
    fn identity_state(&self) -> IdentityState {
        IdentityState {
            resolver: self.resolver.clone(),
            client_header: Arc::from(self.config.auth.client_header.as_str()),
        }
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// The fully layered router, for driving with `oneshot` in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let public = Router::new()
            .route("/health", get(api::system::health))
            .route("/v1/info", get(api::system::info))
            .route("/v1/translations", get(api::translations::list_languages));

        let protected = Router::new()
            .route("/v1/modpacks", get(api::modpacks::list_modpacks))
            .route("/v1/modpacks/list", get(api::modpacks::list_minimal))
            .route("/v1/modpacks/{id}", get(api::modpacks::get_modpack))
            .route(
                "/v1/modpacks/{id}/features/{lang}",
                get(api::modpacks::get_features),
            )
            .route(
                "/v1/translations/{lang}",
                get(api::translations::get_translations),
            )
            .route("/v1/curseforge/test", get(api::curseforge::test_connection))
            .route("/v1/curseforge/mods", post(api::curseforge::get_mods))
            .route("/v1/curseforge/mods/files", post(api::curseforge::get_mod_files))
            .route("/v1/curseforge/mods/{mod_id}", get(api::curseforge::get_mod));
        let protected = protect(protected, state.identity_state(), state.limiter.clone());

        let mut router = Router::new()
            .merge(public)
            .merge(protected)
            .fallback(api::system::not_found)
            .with_state(state);

        if config.security.enable_headers {
            router = with_security_headers(router);
        }

        router
            .layer(build_cors_layer(&config.cors))
            .layer(CompressionLayer::new())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(middleware::from_fn(track_requests))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// Run the server until a shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    if config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any)
}
