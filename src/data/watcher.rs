//! Data directory watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::data::store::DataStore;

/// Clears the data store's caches whenever a file under its directory changes.
pub struct DataWatcher {
    path: PathBuf,
    store: Arc<DataStore>,
}

impl DataWatcher {
    pub fn new(path: &Path, store: Arc<DataStore>) -> Self {
        Self {
            path: path.to_path_buf(),
            store,
        }
    }

    /// Start watching in notify's background thread.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let store = self.store.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                        tracing::info!(paths = ?event.paths, "Data change detected, reloading");
                        store.clear();
                    }
                }
                Err(e) => tracing::error!(error = %e, "Data watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::Recursive)?;

        tracing::info!(path = ?self.path, "Data watcher started");
        Ok(watcher)
    }
}
