//! Research Cache Store
//!
//! Content-addressed, time-boxed cache avoiding repeated identical lookups
//! against external sources. One JSON file per entry under the cache
//! directory; keys are SHA-256 digests of the normalised query signature.
//!
//! # Failure behavior
//! - Corrupted or unreadable entries are treated as a miss (logged warning)
//! - Write failures are logged and swallowed; the pipeline proceeds uncached
//!
//! Cache I/O is deliberately synchronous: the only suspension points in the
//! pipeline are network-bound source calls and the rate-limiter wait.

use crate::types::{ContactIdentity, EvidenceFragment};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// One cached lookup result
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// Write timestamp, compared against the TTL on read
    timestamp: DateTime<Utc>,
    /// The raw fragments the source returned (possibly empty)
    fragments: Vec<EvidenceFragment>,
}

/// File-backed cache store with a fixed TTL
pub struct CacheStore {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    /// Create a store rooted at `cache_dir` with entries valid for `ttl`.
    ///
    /// The directory is created if missing; failure to create it degrades
    /// to a store that always misses (logged, never fatal).
    pub fn new(cache_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        let cache_dir = cache_dir.into();
        if let Err(e) = std::fs::create_dir_all(&cache_dir) {
            tracing::warn!(
                path = %cache_dir.display(),
                error = %e,
                "Could not create cache directory; caching disabled for this run"
            );
        }
        Self { cache_dir, ttl }
    }

    /// Derive the cache key for a source lookup.
    ///
    /// SHA-256 over `source|identity-token|extra`, hex encoded: deterministic
    /// and collision-resistant across sources and query parameters.
    pub fn key(source: &str, identity: &ContactIdentity, extra: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update(b"|");
        hasher.update(identity.token().as_bytes());
        hasher.update(b"|");
        hasher.update(extra.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Fetch a cached result, returning `None` on miss, expiry or corruption.
    pub fn get(&self, key: &str) -> Option<Vec<EvidenceFragment>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Unreadable cache entry, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Corrupt cache entry, treating as miss");
                return None;
            }
        };

        if Utc::now() - entry.timestamp >= self.ttl {
            tracing::debug!(key = %key, "Cache entry expired");
            return None;
        }

        Some(entry.fragments)
    }

    /// Store a lookup result. Write failures are logged and swallowed.
    pub fn set(&self, key: &str, fragments: &[EvidenceFragment]) {
        let entry = CacheEntry {
            timestamp: Utc::now(),
            fragments: fragments.to_vec(),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Could not serialize cache entry");
                return;
            }
        };

        if let Err(e) = std::fs::write(self.entry_path(key), json) {
            tracing::warn!(key = %key, error = %e, "Could not write cache entry");
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Cache directory this store writes under
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }
}
