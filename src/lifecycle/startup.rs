//! Startup orchestration.
//!
//! Builds every shared component from a validated config, in dependency
//! order. Any failure here is fatal.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::GatewayConfig;
use crate::data::DataStore;
use crate::http::AppState;
use crate::security::{
    CredentialVerifier, FederatedVerifier, IdentityResolver, RateLimiter, SelfIssuedVerifier,
    VerificationCache,
};
use crate::upstream::CurseForgeClient;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid profile URL '{url}': {source}")]
    ProfileUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Federated first, self-issued second.
pub fn build_resolver(
    config: &GatewayConfig,
    client: reqwest::Client,
) -> Result<IdentityResolver, StartupError> {
    let auth = &config.auth;
    let profile_url = Url::parse(&auth.profile_url).map_err(|source| StartupError::ProfileUrl {
        url: auth.profile_url.clone(),
        source,
    })?;

    let federated = FederatedVerifier::new(
        client,
        profile_url,
        Duration::from_secs(auth.verify_timeout_secs),
        VerificationCache::new(
            Duration::from_secs(auth.cache_ttl_secs),
            auth.cache_max_entries,
        ),
    );
    let self_issued =
        SelfIssuedVerifier::new(auth.self_issued_headers.clone(), auth.self_issued_min_len);

    Ok(IdentityResolver::new(vec![
        Arc::new(federated) as Arc<dyn CredentialVerifier>,
        Arc::new(self_issued) as Arc<dyn CredentialVerifier>,
    ]))
}

/// Build the shared application state.
pub fn build_state(config: GatewayConfig) -> Result<AppState, StartupError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let resolver = build_resolver(&config, client.clone())?;
    let limiter = RateLimiter::from_config(&config.rate_limit);
    let data = DataStore::new(&config.data.dir, config.data.default_language.clone());
    let curseforge = CurseForgeClient::new(client, &config.curseforge);

    tracing::info!(
        profile_url = %config.auth.profile_url,
        window_ms = config.rate_limit.window_ms,
        max_requests = config.rate_limit.max_requests,
        data_dir = %config.data.dir,
        curseforge_configured = curseforge.is_configured(),
        "Gateway components initialized"
    );

    Ok(AppState {
        config: Arc::new(config),
        resolver: Arc::new(resolver),
        limiter: Arc::new(limiter),
        data: Arc::new(data),
        curseforge: Arc::new(curseforge),
    })
}
