//! LuminaKraft launcher gateway library.

pub mod api;
pub mod config;
pub mod data;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::schema::GatewayConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
