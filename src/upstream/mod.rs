//! Outbound mod-registry proxy.
//!
//! # Data Flow
//! ```text
//! protected /v1/curseforge/* request
//!     → curseforge.rs (validate body, add x-api-key, 10s deadline)
//!     → api.curseforge.com
//!     → upstream JSON, or UpstreamError → gateway JSON error
//! ```

pub mod curseforge;

pub use curseforge::{CurseForgeClient, UpstreamError};
