//! Verification cache for federated credentials.
//!
//! Keyed by the exact raw credential string. Expiry is lazy: an entry whose
//! deadline has passed is removed the next time it is looked up, and
//! treated as absent in the meantime. Growth is bounded by a ceiling that
//! triggers an expired-entry sweep on insert.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::observability::metrics;
use crate::security::identity::ResolvedIdentity;

#[derive(Debug, Clone)]
struct CacheEntry {
    identity: ResolvedIdentity,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// A thread-safe, TTL-bounded credential → identity cache.
#[derive(Clone)]
pub struct VerificationCache {
    inner: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl VerificationCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Live identity for `credential` at `now`, evicting it if expired.
    pub fn get(&self, credential: &str, now: Instant) -> Option<ResolvedIdentity> {
        if let Some(entry) = self.inner.get(credential) {
            if entry.is_live(now) {
                metrics::record_verification_cache("hit");
                return Some(entry.identity.clone());
            }
        }

        // Re-checked under the shard write lock so a concurrent refresh survives.
        self.inner
            .remove_if(credential, |_, entry| !entry.is_live(now));
        metrics::record_verification_cache("miss");
        None
    }

    /// Store `identity` for `credential`, live until `now + ttl`.
    pub fn insert(&self, credential: &str, identity: ResolvedIdentity, now: Instant) {
        if self.inner.len() >= self.max_entries && !self.inner.contains_key(credential) {
            self.make_room(now);
        }

        self.inner.insert(
            credential.to_string(),
            CacheEntry {
                identity,
                expires_at: now + self.ttl,
            },
        );
        metrics::record_verification_cache_size(self.inner.len());
    }

    /// Drop expired entries; if still full, evict the soonest-expiring one.
    fn make_room(&self, now: Instant) {
        self.inner.retain(|_, entry| entry.is_live(now));
        if self.inner.len() < self.max_entries {
            return;
        }

        let oldest = self
            .inner
            .iter()
            .min_by_key(|entry| entry.value().expires_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.inner.remove(&key);
            tracing::debug!(max_entries = self.max_entries, "Verification cache full, evicted oldest entry");
        }
    }

    /// Number of stored entries, live or not yet swept.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
