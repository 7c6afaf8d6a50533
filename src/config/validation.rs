//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (windows and timeouts > 0)
//! - Check that addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} is not a valid header name: {value}")]
    InvalidHeader { field: &'static str, value: String },

    #[error("auth.self_issued_headers must name at least one header")]
    NoSelfIssuedHeaders,
}

fn check_positive(errors: &mut Vec<ValidationError>, field: &'static str, value: u64) {
    if value == 0 {
        errors.push(ValidationError::Zero { field });
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

fn check_header(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if HeaderName::from_bytes(value.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidHeader {
            field,
            value: value.to_string(),
        });
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    check_positive(&mut errors, "timeouts.request_secs", config.timeouts.request_secs);

    check_url(&mut errors, "auth.profile_url", &config.auth.profile_url);
    check_positive(&mut errors, "auth.verify_timeout_secs", config.auth.verify_timeout_secs);
    check_positive(&mut errors, "auth.cache_ttl_secs", config.auth.cache_ttl_secs);
    check_positive(&mut errors, "auth.cache_max_entries", config.auth.cache_max_entries as u64);
    check_positive(&mut errors, "auth.self_issued_min_len", config.auth.self_issued_min_len as u64);
    if config.auth.self_issued_headers.is_empty() {
        errors.push(ValidationError::NoSelfIssuedHeaders);
    }
    for name in &config.auth.self_issued_headers {
        check_header(&mut errors, "auth.self_issued_headers", name);
    }
    check_header(&mut errors, "auth.client_header", &config.auth.client_header);

    check_positive(&mut errors, "rate_limit.window_ms", config.rate_limit.window_ms);
    check_positive(&mut errors, "rate_limit.max_requests", config.rate_limit.max_requests.into());
    check_positive(
        &mut errors,
        "rate_limit.max_tracked_keys",
        config.rate_limit.max_tracked_keys as u64,
    );

    check_url(&mut errors, "curseforge.api_url", &config.curseforge.api_url);
    check_positive(&mut errors, "curseforge.timeout_secs", config.curseforge.timeout_secs);

    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = GatewayConfig::default();
        config.rate_limit.window_ms = 0;
        config.rate_limit.max_requests = 0;
        config.auth.profile_url = "not a url".into();
        config.listener.bind_address = "localhost".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::Zero {
            field: "rate_limit.window_ms"
        }));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidUrl { field: "auth.profile_url", .. })));
    }

    #[test]
    fn test_rejects_bad_header_names() {
        let mut config = GatewayConfig::default();
        config.auth.self_issued_headers = vec!["bad header".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidHeader { .. }));

        config.auth.self_issued_headers.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoSelfIssuedHeaders]);
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = GatewayConfig::default();
        config.curseforge.api_url = "ftp://example.com".into();
        assert!(validate_config(&config).is_err());
    }
}
