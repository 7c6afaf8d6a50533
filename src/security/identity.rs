//! Caller identity types attached to authenticated requests.

use std::fmt;
use std::net::SocketAddr;

use serde::Serialize;

/// Namespace prefix for identities derived from self-issued tokens.
///
/// Federated subjects carrying this prefix are refused so the two id spaces
/// never overlap.
pub const SELF_ISSUED_PREFIX: &str = "lk_";

/// Where a resolved identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityOrigin {
    /// Verified against the external profile service.
    Federated,
    /// Launcher-generated token accepted on structure alone.
    SelfIssued,
}

impl IdentityOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityOrigin::Federated => "federated",
            IdentityOrigin::SelfIssued => "self_issued",
        }
    }
}

impl fmt::Display for IdentityOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity produced by the resolver for a single request.
///
/// `id` is the stable key used for caching and rate limiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedIdentity {
    pub id: String,
    pub display_name: String,
    pub origin: IdentityOrigin,
}

impl ResolvedIdentity {
    pub fn federated(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            origin: IdentityOrigin::Federated,
        }
    }

    pub fn self_issued(token: &str, display_name: impl Into<String>) -> Self {
        Self {
            id: format!("{SELF_ISSUED_PREFIX}{token}"),
            display_name: display_name.into(),
            origin: IdentityOrigin::SelfIssued,
        }
    }
}

/// Lightweight description of the calling client, used for logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDescriptor {
    /// Declared client name header, `"unknown"` when absent.
    pub name: String,
    /// Peer network address, when the connection exposes one.
    pub address: Option<SocketAddr>,
}

impl ClientDescriptor {
    pub const UNKNOWN: &'static str = "unknown";
}
