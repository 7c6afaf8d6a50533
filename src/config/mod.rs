//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (PORT, RATE_LIMIT_*, CURSEFORGE_*, ...)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    AuthConfig, CorsConfig, CurseForgeConfig, DataConfig, GatewayConfig, ListenerConfig,
    LogFormat, ObservabilityConfig, RateLimitConfig, SecurityConfig, TimeoutConfig,
};
pub use validation::ValidationError;
