//! Request authorization and rate limiting.
//!
//! # Data Flow
//! ```text
//! Incoming request (protected route):
//!     → resolver.rs (ordered verifiers, first success wins)
//!         → federated.rs (Authorization: Bearer, cache.rs first)
//!         → self_issued.rs (launcher token header, structural only)
//!     → rate_limit.rs (fixed window keyed by identity id)
//!     → handler
//!
//! Any failure → error.rs → terminal JSON response
//! ```
//!
//! # Design Decisions
//! - Fail closed: no identity, no handler
//! - Verification causes are logged, never returned to the caller
//! - Shared state lives in sharded maps; no lock spans a network call

pub mod cache;
pub mod error;
pub mod federated;
pub mod headers;
pub mod identity;
pub mod rate_limit;
pub mod resolver;
pub mod self_issued;

pub use cache::VerificationCache;
pub use error::{AuthError, VerifyError};
pub use federated::FederatedVerifier;
pub use identity::{ClientDescriptor, IdentityOrigin, ResolvedIdentity};
pub use rate_limit::RateLimiter;
pub use resolver::{CredentialVerifier, IdentityResolver};
pub use self_issued::SelfIssuedVerifier;
