//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration for inbound requests.
    pub timeouts: TimeoutConfig,

    /// Identity verification settings.
    pub auth: AuthConfig,

    /// Per-identity rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Static launcher data location.
    pub data: DataConfig,

    /// Mod registry pass-through.
    pub curseforge: CurseForgeConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Security hardening.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9374").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9374".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Identity verification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Profile endpoint used to verify federated bearer credentials.
    pub profile_url: String,

    /// Deadline for one profile lookup, in seconds.
    pub verify_timeout_secs: u64,

    /// How long a successful federated verification is reused, in seconds.
    pub cache_ttl_secs: u64,

    /// Ceiling on cached verifications before sweeping/evicting.
    pub cache_max_entries: usize,

    /// Headers carrying a self-issued token, checked in order.
    pub self_issued_headers: Vec<String>,

    /// Minimum trimmed length of a self-issued token.
    pub self_issued_min_len: usize,

    /// Header naming the calling client (logged only).
    pub client_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            profile_url: "https://api.minecraftservices.com/minecraft/profile".to_string(),
            verify_timeout_secs: 5,
            cache_ttl_secs: 5 * 60,
            cache_max_entries: 100_000,
            self_issued_headers: vec![
                "x-lk-token".to_string(),
                "x-luminakraft-token".to_string(),
            ],
            self_issued_min_len: 16,
            client_header: "x-luminakraft-client".to_string(),
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in milliseconds.
    pub window_ms: u64,

    /// Requests admitted per identity per window.
    pub max_requests: u32,

    /// Key count above which expired counters are swept.
    pub max_tracked_keys: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 180,
            max_tracked_keys: 100_000,
        }
    }
}

/// Static data store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding `modpacks.json` and `translations/`.
    pub dir: String,

    /// Language reported as default by the translations listing.
    pub default_language: String,

    /// Language served by modpack routes when the request has no `lang` query.
    pub query_language: String,

    /// Reload cached data when files under `dir` change.
    pub watch: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            default_language: "es".to_string(),
            query_language: "en".to_string(),
            watch: true,
        }
    }
}

/// CurseForge pass-through configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CurseForgeConfig {
    /// API key; the proxy answers 503 when unset.
    pub api_key: Option<String>,

    /// Base URL of the CurseForge API.
    pub api_url: String,

    /// Upstream request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CurseForgeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.curseforge.com/v1".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed browser origins. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}
