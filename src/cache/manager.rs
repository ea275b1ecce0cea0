//! Call response cache.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

use super::key::CacheKey;
use crate::types::{FunctionResponse, Parameters};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries before least-recently-used eviction.
    /// Zero disables the cache, like `enabled = false`.
    pub max_size: usize,
    pub default_ttl: Duration,
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 100,
            default_ttl: Duration::from_secs(300),
            enabled: true,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl AtomicStats {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }
}

struct CacheEntry {
    response: FunctionResponse,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Bounded TTL + LRU cache of function responses, keyed by call.
///
/// A `get` refreshes recency but never extends the TTL. Expired entries are
/// dropped when a read finds them. Safe to share behind an `Arc`.
pub struct ToolCache {
    config: CacheConfig,
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
    stats: AtomicStats,
}

impl ToolCache {
    pub fn new(config: CacheConfig) -> Self {
        // A zero-sized cache never stores; the LRU still needs a non-zero bound.
        let capacity = NonZeroUsize::new(config.max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            config,
            entries: Mutex::new(LruCache::new(capacity)),
            stats: AtomicStats::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled && self.config.max_size > 0
    }

    /// Cached response for a call, if present and not expired.
    pub fn get(&self, name: &str, parameters: &Parameters) -> Option<FunctionResponse> {
        if !self.is_enabled() {
            return None;
        }
        let key = CacheKey::for_call(name, parameters);
        let mut entries = self.lock();

        match entries.get(&key) {
            None => {
                AtomicStats::bump(&self.stats.misses);
                return None;
            }
            Some(entry) if !entry.is_expired() => {
                AtomicStats::bump(&self.stats.hits);
                debug!(function = %name, "Cache hit");
                return Some(entry.response.clone());
            }
            Some(_) => {}
        }

        entries.pop(&key);
        AtomicStats::bump(&self.stats.expirations);
        AtomicStats::bump(&self.stats.misses);
        None
    }

    /// Store a response. `ttl` of `None` uses the configured default.
    pub fn set(
        &self,
        name: &str,
        parameters: &Parameters,
        response: FunctionResponse,
        ttl: Option<Duration>,
    ) {
        if !self.is_enabled() {
            return;
        }
        let key = CacheKey::for_call(name, parameters);
        let entry = CacheEntry {
            response,
            expires_at: Instant::now() + ttl.unwrap_or(self.config.default_ttl),
        };

        let mut entries = self.lock();
        let is_new = !entries.contains(&key);
        // For a new key at capacity `push` hands back the evicted entry.
        if entries.push(key, entry).is_some() && is_new {
            AtomicStats::bump(&self.stats.evictions);
        }
        AtomicStats::bump(&self.stats.sets);
    }

    /// Remove one call's entry. Returns whether it was present.
    pub fn invalidate(&self, name: &str, parameters: &Parameters) -> bool {
        let key = CacheKey::for_call(name, parameters);
        self.lock().pop(&key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ToolCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl std::fmt::Debug for ToolCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCache")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
