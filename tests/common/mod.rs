//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path as UrlPath, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use launcher_gateway::lifecycle::{build_state, Shutdown};
use launcher_gateway::{AppState, GatewayConfig, HttpServer};

pub const GOOD_BEARER: &str = "good-token";
pub const LAUNCHER_TOKEN: &str = "launcher-token-0123456789";
pub const CURSEFORGE_KEY: &str = "test-key";

/// Serve `router` on an ephemeral localhost port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Mock identity provider profile endpoint.
pub struct MockProfileServer {
    pub addr: SocketAddr,
    calls: Arc<AtomicUsize>,
}

impl MockProfileServer {
    /// Accepts `Bearer good-token` as player "abc"/"Steve"; anything else is 401.
    pub async fn start() -> Self {
        Self::start_with_delay(Duration::ZERO).await
    }

    /// Like `start`, but every answer is held back by `delay`.
    pub async fn start_with_delay(delay: Duration) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route("/minecraft/profile", get(profile))
            .with_state(ProfileState {
                calls: calls.clone(),
                delay,
            });

        Self {
            addr: serve(router).await,
            calls,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/minecraft/profile", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct ProfileState {
    calls: Arc<AtomicUsize>,
    delay: Duration,
}

async fn profile(State(state): State<ProfileState>, headers: HeaderMap) -> impl IntoResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {GOOD_BEARER}"));

    if authorized {
        (StatusCode::OK, Json(json!({ "id": "abc", "name": "Steve" })))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "UNAUTHORIZED" })))
    }
}

/// Mock CurseForge API rooted at `/v1`.
pub async fn start_mock_curseforge() -> SocketAddr {
    let router = Router::new()
        .route("/v1/games", get(cf_games))
        .route("/v1/mods/{id}", get(cf_mod))
        .route("/v1/mods", post(cf_mods))
        .route("/v1/mods/files", post(cf_files));
    serve(router).await
}

fn has_key(headers: &HeaderMap) -> bool {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == CURSEFORGE_KEY)
}

async fn cf_games(headers: HeaderMap) -> StatusCode {
    if has_key(&headers) {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    }
}

async fn cf_mod(headers: HeaderMap, UrlPath(id): UrlPath<u64>) -> impl IntoResponse {
    match (has_key(&headers), id) {
        (false, _) => (StatusCode::FORBIDDEN, Json(json!({}))),
        (true, 1) => (StatusCode::OK, Json(json!({ "data": { "id": 1, "name": "JEI" } }))),
        (true, 500) => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "secret": "x" }))),
        (true, _) => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn cf_mods(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "data": body["modIds"], "filterPcOnly": body["filterPcOnly"] }))
}

async fn cf_files(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "data": body["fileIds"] }))
}

fn write_json(dir: &Path, rel: &str, value: Value) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

/// Data directory with one modpack and `en`/`es` translations.
pub fn data_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_json(
        dir.path(),
        "modpacks.json",
        json!([{
            "id": "pack-1",
            "name": "Pack One",
            "version": "1.0.0",
            "minecraftVersion": "1.20.1",
            "modloader": "forge",
            "modloaderVersion": "47.2.0",
            "gamemode": "survival",
            "logo": "logo.png",
            "backgroundImage": "bg.png",
            "primaryColor": "#ff0000",
            "isNew": true,
            "isActive": true,
            "urlModpackZip": "https://example.com/pack-1.zip"
        }]),
    );
    write_json(
        dir.path(),
        "translations/en.json",
        json!({
            "modpacks": {
                "pack-1": { "name": "Pack One", "description": "Long text", "shortDescription": "Short text" }
            },
            "features": { "pack-1": [{ "title": "Quests", "description": "Many quests" }] },
            "ui": { "status": { "new": "New" }, "modloader": { "forge": "Forge" }, "gamemode": {} }
        }),
    );
    write_json(
        dir.path(),
        "translations/es.json",
        json!({
            "modpacks": { "pack-1": { "shortDescription": "Texto corto" } },
            "features": {},
            "ui": {}
        }),
    );
    dir
}

/// Config pointing at the given profile endpoint and data directory.
pub fn test_config(profile_url: &str, data_dir: &Path) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.auth.profile_url = profile_url.to_string();
    config.auth.verify_timeout_secs = 2;
    config.data.dir = data_dir.display().to_string();
    config.data.watch = false;
    config
}

/// A gateway running on an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub state: AppState,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestGateway {
    pub async fn spawn(config: GatewayConfig) -> Self {
        let state = build_state(config).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server = HttpServer::new(state.clone());
        let server_shutdown = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, server_shutdown).await;
        });

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        Self {
            addr,
            state,
            client,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path))
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
