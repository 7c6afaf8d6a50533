//! Self-issued (launcher-generated) token verification.
//!
//! Purely structural: no claims are carried, so acceptance only proves the
//! caller presents a plausible random token. The trimmed token becomes the
//! identity key, prefixed into its own namespace.

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::security::error::VerifyError;
use crate::security::identity::{IdentityOrigin, ResolvedIdentity};
use crate::security::resolver::CredentialVerifier;

/// Minimum trimmed token length accepted by default.
pub const DEFAULT_MIN_LEN: usize = 16;

/// Display name used for every self-issued identity.
pub const OFFLINE_DISPLAY_NAME: &str = "OfflineUser";

fn is_base64url(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Validate `raw` and derive its identity.
pub fn verify_self_issued(raw: &str, min_len: usize) -> Result<ResolvedIdentity, VerifyError> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len < min_len {
        return Err(VerifyError::TooShort { len, min: min_len });
    }
    if !trimmed.chars().all(is_base64url) {
        return Err(VerifyError::InvalidAlphabet);
    }

    Ok(ResolvedIdentity::self_issued(trimmed, OFFLINE_DISPLAY_NAME))
}

/// Reads a launcher token from the first configured header that carries one.
pub struct SelfIssuedVerifier {
    headers: Vec<String>,
    min_len: usize,
}

impl SelfIssuedVerifier {
    pub fn new(headers: Vec<String>, min_len: usize) -> Self {
        Self { headers, min_len }
    }
}

#[async_trait]
impl CredentialVerifier for SelfIssuedVerifier {
    fn origin(&self) -> IdentityOrigin {
        IdentityOrigin::SelfIssued
    }

    fn credential(&self, headers: &HeaderMap) -> Option<String> {
        self.headers
            .iter()
            .filter_map(|name| headers.get(name.as_str()))
            .filter_map(|value| value.to_str().ok())
            .find(|value| !value.trim().is_empty())
            .map(str::to_string)
    }

    async fn verify(&self, credential: &str) -> Result<ResolvedIdentity, VerifyError> {
        verify_self_issued(credential, self.min_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::identity::{IdentityOrigin, SELF_ISSUED_PREFIX};

    #[test]
    fn test_accepts_twenty_char_base64url() {
        let identity = verify_self_issued("AbCdEfGhIj0123456789", DEFAULT_MIN_LEN).unwrap();
        assert_eq!(identity.id, "lk_AbCdEfGhIj0123456789");
        assert_eq!(identity.display_name, OFFLINE_DISPLAY_NAME);
        assert_eq!(identity.origin, IdentityOrigin::SelfIssued);
    }

    #[test]
    fn test_rejects_short_tokens() {
        for len in 0..DEFAULT_MIN_LEN {
            let token = "a".repeat(len);
            assert!(
                matches!(
                    verify_self_issued(&token, DEFAULT_MIN_LEN),
                    Err(VerifyError::TooShort { .. })
                ),
                "length {len} should be rejected"
            );
        }
        assert!(verify_self_issued(&"a".repeat(DEFAULT_MIN_LEN), DEFAULT_MIN_LEN).is_ok());
    }

    #[test]
    fn test_rejects_characters_outside_alphabet() {
        for bad in ['=', '+', '/', '.', ' ', '$', 'é', '!'] {
            let token = format!("abcdefgh{bad}ijklmnop");
            assert!(
                verify_self_issued(&token, DEFAULT_MIN_LEN).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let padded = verify_self_issued("  abcdefghijklmnop_-\n", DEFAULT_MIN_LEN).unwrap();
        let bare = verify_self_issued("abcdefghijklmnop_-", DEFAULT_MIN_LEN).unwrap();
        assert_eq!(padded, bare);

        // Padding does not count toward the minimum length.
        assert!(verify_self_issued("   short   ", DEFAULT_MIN_LEN).is_err());
    }

    #[test]
    fn test_credential_header_priority() {
        let verifier = SelfIssuedVerifier::new(
            vec!["x-lk-token".into(), "x-luminakraft-token".into()],
            DEFAULT_MIN_LEN,
        );
        let mut headers = HeaderMap::new();
        assert_eq!(verifier.credential(&headers), None);

        headers.insert("x-luminakraft-token", "secondaryheadertoken".parse().unwrap());
        assert_eq!(verifier.credential(&headers).as_deref(), Some("secondaryheadertoken"));

        headers.insert("x-lk-token", "primaryheadertoken00".parse().unwrap());
        assert_eq!(verifier.credential(&headers).as_deref(), Some("primaryheadertoken00"));
    }

    #[test]
    fn test_ids_always_in_reserved_namespace() {
        for token in ["abcdefghijklmnop", "0000000000000000", "lk_lk_lk_lk_lk_lk_"] {
            let identity = verify_self_issued(token, DEFAULT_MIN_LEN).unwrap();
            assert!(identity.id.starts_with(SELF_ISSUED_PREFIX));
            assert_eq!(&identity.id[SELF_ISSUED_PREFIX.len()..], token);
        }
    }
}
