//! Identity resolution over an ordered list of verifier strategies.
//!
//! The order is a priority policy: the first verifier whose credential
//! verifies wins. A failing verifier hands over to the next one; only when
//! every verifier has nothing to try or fails does the request become
//! `Unauthorized`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::observability::metrics;
use crate::security::error::{AuthError, VerifyError};
use crate::security::identity::{IdentityOrigin, ResolvedIdentity};

/// One identity source.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Origin stamped on identities this verifier produces.
    fn origin(&self) -> IdentityOrigin;

    /// Credential material this verifier would examine, if the request carries any.
    fn credential(&self, headers: &HeaderMap) -> Option<String>;

    /// Verify the raw credential.
    async fn verify(&self, credential: &str) -> Result<ResolvedIdentity, VerifyError>;
}

/// Resolves a request's headers to a single identity.
pub struct IdentityResolver {
    verifiers: Vec<Arc<dyn CredentialVerifier>>,
}

impl IdentityResolver {
    /// Verifiers are tried in the given order.
    pub fn new(verifiers: Vec<Arc<dyn CredentialVerifier>>) -> Self {
        Self { verifiers }
    }

    pub async fn resolve(&self, headers: &HeaderMap) -> Result<ResolvedIdentity, AuthError> {
        for verifier in &self.verifiers {
            let origin = verifier.origin();
            let Some(credential) = verifier.credential(headers) else {
                continue;
            };

            match verifier.verify(&credential).await {
                Ok(identity) => {
                    metrics::record_auth_outcome(origin.as_str(), "verified");
                    return Ok(identity);
                }
                Err(e) if e.is_upstream_unavailable() => {
                    metrics::record_auth_outcome(origin.as_str(), e.kind());
                    tracing::warn!(origin = %origin, error = %e, "Identity provider unavailable");
                }
                Err(e) => {
                    metrics::record_auth_outcome(origin.as_str(), e.kind());
                    tracing::debug!(origin = %origin, error = %e, "Credential rejected");
                }
            }
        }

        Err(AuthError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubVerifier {
        header: &'static str,
        origin: IdentityOrigin,
        accept: bool,
        calls: AtomicUsize,
    }

    impl StubVerifier {
        fn new(header: &'static str, origin: IdentityOrigin, accept: bool) -> Arc<Self> {
            Arc::new(Self {
                header,
                origin,
                accept,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CredentialVerifier for StubVerifier {
        fn origin(&self) -> IdentityOrigin {
            self.origin
        }

        fn credential(&self, headers: &HeaderMap) -> Option<String> {
            headers
                .get(self.header)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        }

        async fn verify(&self, credential: &str) -> Result<ResolvedIdentity, VerifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.accept {
                Ok(ResolvedIdentity {
                    id: credential.to_string(),
                    display_name: "stub".into(),
                    origin: self.origin,
                })
            } else {
                Err(VerifyError::Rejected(401))
            }
        }
    }

    fn resolver_of(first: &Arc<StubVerifier>, second: &Arc<StubVerifier>) -> IdentityResolver {
        IdentityResolver::new(vec![
            first.clone() as Arc<dyn CredentialVerifier>,
            second.clone() as Arc<dyn CredentialVerifier>,
        ])
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, v.parse().unwrap());
        }
        map
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let first = StubVerifier::new("x-first", IdentityOrigin::Federated, true);
        let second = StubVerifier::new("x-second", IdentityOrigin::SelfIssued, true);
        let resolver = resolver_of(&first, &second);

        let identity = resolver
            .resolve(&headers(&[("x-first", "one"), ("x-second", "two")]))
            .await
            .unwrap();
        assert_eq!(identity.id, "one");
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_falls_through_to_next_verifier() {
        let first = StubVerifier::new("x-first", IdentityOrigin::Federated, false);
        let second = StubVerifier::new("x-second", IdentityOrigin::SelfIssued, true);
        let resolver = resolver_of(&first, &second);

        let identity = resolver
            .resolve(&headers(&[("x-first", "one"), ("x-second", "two")]))
            .await
            .unwrap();
        assert_eq!(identity.id, "two");
        assert_eq!(identity.origin, IdentityOrigin::SelfIssued);
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_absent_credentials_are_skipped_without_verifying() {
        let first = StubVerifier::new("x-first", IdentityOrigin::Federated, true);
        let second = StubVerifier::new("x-second", IdentityOrigin::SelfIssued, true);
        let resolver = resolver_of(&first, &second);

        let result = resolver.resolve(&HeaderMap::new()).await;
        assert_eq!(result, Err(AuthError::Unauthorized));
        assert_eq!(first.calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_failures_are_unauthorized() {
        let first = StubVerifier::new("x-first", IdentityOrigin::Federated, false);
        let second = StubVerifier::new("x-second", IdentityOrigin::SelfIssued, false);
        let resolver = resolver_of(&first, &second);

        let result = resolver
            .resolve(&headers(&[("x-first", "one"), ("x-second", "two")]))
            .await;
        assert_eq!(result, Err(AuthError::Unauthorized));
    }
}
