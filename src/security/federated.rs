//! Federated credential verification against the external profile service.
//!
//! # Flow
//! ```text
//! bearer credential
//!     → VerificationCache (live hit: return, no network)
//!     → GET profile_url (Bearer credential, 5s deadline)
//!     → 200 + non-empty "id" → ResolvedIdentity → cache for TTL
//! ```
//!
//! No lock is held while the profile call is in flight; the cache write
//! happens only after it resolves.
//!
//! The credential is the bearer value with surrounding whitespace trimmed.
//! That trimmed token is what the profile service receives and what the
//! cache is keyed on, so `Bearer  abc ` and `Bearer abc` share one entry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::security::cache::VerificationCache;
use crate::security::error::VerifyError;
use crate::security::identity::{IdentityOrigin, ResolvedIdentity, SELF_ISSUED_PREFIX};
use crate::security::resolver::CredentialVerifier;

/// Display name used when the profile carries none.
pub const DEFAULT_DISPLAY_NAME: &str = "MinecraftUser";

/// Subset of the profile document the gateway relies on.
#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Verifies `Authorization: Bearer` credentials by fetching the caller's profile.
pub struct FederatedVerifier {
    client: reqwest::Client,
    profile_url: Url,
    timeout: Duration,
    cache: VerificationCache,
}

impl FederatedVerifier {
    pub fn new(
        client: reqwest::Client,
        profile_url: Url,
        timeout: Duration,
        cache: VerificationCache,
    ) -> Self {
        Self {
            client,
            profile_url,
            timeout,
            cache,
        }
    }

    pub fn cache(&self) -> &VerificationCache {
        &self.cache
    }

    /// Cache-first verification of a raw bearer credential.
    pub async fn verify_federated(&self, credential: &str) -> Result<ResolvedIdentity, VerifyError> {
        if let Some(identity) = self.cache.get(credential, Instant::now()) {
            return Ok(identity);
        }

        let identity = self.fetch_profile(credential).await?;
        self.cache.insert(credential, identity.clone(), Instant::now());
        Ok(identity)
    }

    async fn fetch_profile(&self, credential: &str) -> Result<ResolvedIdentity, VerifyError> {
        let response = self
            .client
            .get(self.profile_url.clone())
            .bearer_auth(credential)
            .header(header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(VerifyError::Rejected(status.as_u16()));
        }

        let profile: ProfileResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                VerifyError::Timeout(self.timeout.as_secs())
            } else {
                VerifyError::Malformed(e.to_string())
            }
        })?;

        identity_from_profile(profile)
    }

    fn classify(&self, error: reqwest::Error) -> VerifyError {
        if error.is_timeout() {
            VerifyError::Timeout(self.timeout.as_secs())
        } else {
            // Strip the URL so the error never carries query material.
            VerifyError::Unavailable(error.without_url().to_string())
        }
    }
}

fn identity_from_profile(profile: ProfileResponse) -> Result<ResolvedIdentity, VerifyError> {
    let id = profile
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or(VerifyError::MissingSubject)?;
    if id.starts_with(SELF_ISSUED_PREFIX) {
        return Err(VerifyError::ReservedSubject);
    }

    let display_name = profile
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());

    Ok(ResolvedIdentity::federated(id, display_name))
}

/// Extract a non-empty bearer token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl CredentialVerifier for FederatedVerifier {
    fn origin(&self) -> IdentityOrigin {
        IdentityOrigin::Federated
    }

    fn credential(&self, headers: &HeaderMap) -> Option<String> {
        bearer_token(headers).map(str::to_string)
    }

    async fn verify(&self, credential: &str) -> Result<ResolvedIdentity, VerifyError> {
        self.verify_federated(credential).await
    }
}
