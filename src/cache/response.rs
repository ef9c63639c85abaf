//! Persisted response cache for context-free replies.
//!
//! Caching only applies to queries asked without conversation context, so
//! two users asking the same normalized question share one entry. The key
//! is a SHA-256 digest of the trimmed, lowercased query text: identical
//! normalized queries always collide to the same entry, and the newest
//! write wins.
//!
//! # Persistence
//!
//! One JSON file maps `query hash → entry`. The file is loaded wholesale
//! at construction and rewritten wholesale (tmp file + rename) after every
//! mutation. A missing or corrupt file degrades to an empty cache with a
//! warning; a failed write is logged and swallowed, leaving the cache
//! usable in memory for the rest of the process. Whole-file rewrites make
//! concurrent writers across processes unsafe — the cache assumes a single
//! owning process.
//!
//! # Expiry
//!
//! Entries older than the configured TTL are removed lazily on read and in
//! bulk via [`ResponseCache::evict_expired`]. The check is strictly
//! greater-than: an entry aged exactly TTL is still valid.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::telemetry;

/// File name of the flat store inside the cache directory.
const CACHE_FILE_NAME: &str = "responses.json";

/// A single cached reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The raw query text as the user sent it.
    pub query: String,
    /// The reply that was served.
    pub response: String,
    /// Unix timestamp when the entry was created.
    pub created_at: u64,
    /// Model that produced the reply.
    pub model: String,
}

/// Persistent store serialized to JSON.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    entries: HashMap<String, CacheEntry>,
}

/// TTL response cache backed by a single flat JSON file.
pub struct ResponseCache {
    inner: Mutex<CacheFile>,
    path: PathBuf,
    ttl_secs: u64,
}

impl ResponseCache {
    /// Create a cache from the assistant configuration.
    ///
    /// Loads any existing entries from `<cache_dir>/responses.json`.
    pub fn new(config: &Config) -> Self {
        Self::with_path(config.cache_dir.join(CACHE_FILE_NAME), config.cache_ttl_hours)
    }

    /// Create a cache at an explicit file path (used by tests).
    pub fn with_path(path: PathBuf, ttl_hours: u64) -> Self {
        let store = Self::load(&path);
        info!(path = %path.display(), entries = store.entries.len(), "response cache loaded");
        Self {
            inner: Mutex::new(store),
            path,
            ttl_secs: ttl_hours * 3600,
        }
    }

    /// Content hash of the normalized query: hex SHA-256 of the trimmed,
    /// lowercased text.
    pub fn query_hash(query: &str) -> String {
        let normalized = query.trim().to_lowercase();
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Look up a reply. Returns `None` if absent or expired.
    ///
    /// An expired entry is removed on the spot and the removal persisted;
    /// a true hit has no side effects beyond the read.
    pub fn get(&self, query: &str) -> Option<String> {
        let key = Self::query_hash(query);
        let now = Self::now_secs();
        let mut store = self.lock();

        let expired = store
            .entries
            .get(&key)
            .map(|e| self.is_expired(now, e.created_at));
        match expired {
            Some(true) => {
                debug!(key = %&key[..8], "cache entry expired, removing");
                store.entries.remove(&key);
                self.persist(&store);
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
            Some(false) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                store.entries.get(&key).map(|e| e.response.clone())
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Insert (or overwrite) the entry for this query and persist.
    pub fn put(&self, query: &str, response: &str, model: &str) {
        let key = Self::query_hash(query);
        let mut store = self.lock();
        store.entries.insert(
            key,
            CacheEntry {
                query: query.to_string(),
                response: response.to_string(),
                created_at: Self::now_secs(),
                model: model.to_string(),
            },
        );
        self.persist(&store);
    }

    /// Remove every expired entry, persisting once if anything was removed.
    ///
    /// Returns the number of entries removed.
    pub fn evict_expired(&self) -> usize {
        let now = Self::now_secs();
        let mut store = self.lock();
        let before = store.entries.len();
        let ttl = self.ttl_secs;
        store
            .entries
            .retain(|_, e| now.saturating_sub(e.created_at) <= ttl);
        let removed = before - store.entries.len();
        if removed > 0 {
            self.persist(&store);
            info!(removed, "evicted expired cache entries");
        }
        removed
    }

    /// Read-only aggregate statistics. Does not mutate or evict.
    pub fn stats(&self) -> CacheStats {
        let now = Self::now_secs();
        let store = self.lock();
        let total = store.entries.len();
        let expired = store
            .entries
            .values()
            .filter(|e| self.is_expired(now, e.created_at))
            .count();
        CacheStats {
            total,
            expired,
            valid: total - expired,
            storage_bytes: std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0),
        }
    }

    // -- private helpers ---------------------------------------------------

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheFile> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Strictly greater-than: age exactly equal to the TTL is not expired.
    fn is_expired(&self, now: u64, created_at: u64) -> bool {
        now.saturating_sub(created_at) > self.ttl_secs
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn load(path: &Path) -> CacheFile {
        match std::fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(store) => store,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cache file is corrupt, starting empty");
                    CacheFile::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CacheFile::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read cache file, starting empty");
                CacheFile::default()
            }
        }
    }

    /// Whole-file rewrite via tmp file + rename. Failures are logged and
    /// swallowed; the in-memory cache stays authoritative for this process.
    fn persist(&self, store: &CacheFile) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let json = match serde_json::to_string_pretty(store) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize cache");
                return;
            }
        };
        let tmp_path = self.path.with_extension("json.tmp");
        if let Err(e) = std::fs::write(&tmp_path, &json) {
            warn!(path = %tmp_path.display(), error = %e, "failed to write cache file");
            return;
        }
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to replace cache file");
        }
    }

    #[cfg(test)]
    fn backdate(&self, query: &str, secs: u64) {
        let key = Self::query_hash(query);
        let mut store = self.lock();
        if let Some(entry) = store.entries.get_mut(&key) {
            entry.created_at -= secs;
        }
    }
}

/// Aggregate cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of entries currently stored.
    pub total: usize,
    /// Entries past their TTL but not yet evicted.
    pub expired: usize,
    /// Entries still servable.
    pub valid: usize,
    /// Size of the cache file on disk, in bytes.
    pub storage_bytes: u64,
}
