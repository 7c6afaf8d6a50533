//! Static launcher data (modpacks and translations).
//!
//! # Data Flow
//! ```text
//! data/ directory
//!     → store.rs (lazy read, cached per document)
//!     → models.rs (typed records, translated views)
//!     → api handlers
//!
//! On file change:
//!     watcher.rs → DataStore::clear() → next lookup re-reads
//! ```

pub mod models;
pub mod store;
pub mod watcher;

pub use store::{DataError, DataStore};
pub use watcher::DataWatcher;
